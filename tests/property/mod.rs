//! Property-based tests for validator invariants and the generation loop

mod orchestrator;
