//! Lesson records, their persistence and the background generation lifecycle.

pub mod jobs;
pub mod record;
pub mod service;
pub mod store;

pub use jobs::GenerationJobs;
pub use record::{new_lesson_id, LessonOutline, LessonRecord, LessonStatus};
pub use service::{LessonService, INTERRUPTED_MESSAGE};
pub use store::LessonStore;
