//! Property-based tests for the bounded generation loop

use async_trait::async_trait;
use lessonforge::config::GenerationSettings;
use lessonforge::error::ApiError;
use lessonforge::generation::prompts::CLIENT_DIRECTIVE;
use lessonforge::generation::{GenerationResult, LessonGenerator, LessonModel};
use lessonforge::lesson::LessonOutline;
use parking_lot::Mutex;
use proptest::prelude::*;
use std::collections::VecDeque;
use std::sync::Arc;

const VALID: &str =
    "\"use client\";\nexport default function LessonComponent() {\n  return (<p>ok</p>);\n}";
const INVALID: &str = "export default function LessonComponent() {\n  eval(\"x\");\n}";

#[derive(Debug, Clone, Copy)]
enum Reply {
    Valid,
    Invalid,
    Error,
}

fn reply() -> impl Strategy<Value = Reply> {
    prop_oneof![Just(Reply::Valid), Just(Reply::Invalid), Just(Reply::Error)]
}

struct CountingModel {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<usize>,
    fixed: Option<&'static str>,
}

impl CountingModel {
    fn scripted(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(0),
            fixed: None,
        }
    }

    fn fixed(text: &'static str) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            calls: Mutex::new(0),
            fixed: Some(text),
        }
    }

    fn calls(&self) -> usize {
        *self.calls.lock()
    }
}

#[async_trait]
impl LessonModel for CountingModel {
    async fn complete(&self, _prompt: &str) -> Result<String, ApiError> {
        *self.calls.lock() += 1;
        if let Some(text) = self.fixed {
            return Ok(text.to_string());
        }
        match self.replies.lock().pop_front().unwrap_or(Reply::Invalid) {
            Reply::Valid => Ok(VALID.to_string()),
            Reply::Invalid => Ok(INVALID.to_string()),
            Reply::Error => Err(ApiError::ProviderRequestFailed("flaky".to_string())),
        }
    }
}

/// Outer attempts stay within the retry ceiling whatever the model does
#[test]
fn test_attempts_are_bounded() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut runner = proptest::test_runner::TestRunner::new(proptest::test_runner::Config {
        cases: 64,
        ..Default::default()
    });

    runner
        .run(&proptest::collection::vec(reply(), 0..12), |replies| {
            let first = replies.first().copied();
            let title = Arc::new(CountingModel::fixed("Title"));
            let code = Arc::new(CountingModel::scripted(replies));
            let generator =
                LessonGenerator::new(title.clone(), code.clone(), GenerationSettings::default());
            let outline = LessonOutline::parse("bounded").unwrap();

            let result = runtime.block_on(generator.generate(&outline));

            assert!(title.calls() <= 3, "title calls {}", title.calls());
            assert!(code.calls() <= 5, "code calls {}", code.calls());
            if matches!(first, Some(Reply::Valid)) {
                assert_eq!(code.calls(), 1, "valid first attempt needs no repair");
                assert_eq!(title.calls(), 1);
            }
            match &result {
                GenerationResult::Generated { code, .. } => {
                    assert!(code.starts_with(CLIENT_DIRECTIVE));
                }
                GenerationResult::Failed { error } => {
                    assert!(!error.is_empty());
                    assert_eq!(title.calls(), 3, "failure only after every attempt");
                }
            }
            Ok(())
        })
        .unwrap();
}
