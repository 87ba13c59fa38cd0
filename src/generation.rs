//! Lesson generation: prompts, model seam, structural validation and the
//! bounded generate-validate-repair loop.

pub mod model;
pub mod orchestrator;
pub mod prompts;
pub mod validator;

pub use model::{LessonModel, ProviderModel};
pub use orchestrator::{GenerationAttempt, GenerationResult, LessonGenerator};
pub use validator::{validate, CodeIssue, ValidationResult};
