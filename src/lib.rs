//! Lessonforge: LLM-generated interactive lessons
//!
//! Turns a short natural-language outline into a self-contained UI component.
//! Generation runs as a supervised background job: title extraction, code
//! generation, structural validation and a bounded repair/retry loop. Lesson
//! records persist in sled so callers can poll for the terminal state.

pub mod cli;
pub mod config;
pub mod error;
pub mod generation;
pub mod lesson;
pub mod logging;
pub mod provider;
