//! End-to-end lesson lifecycle through `LessonService` with a scripted model.

use crate::integration::test_utils::{ScriptedModel, VALID_COMPONENT};
use lessonforge::config::GenerationSettings;
use lessonforge::error::ApiError;
use lessonforge::generation::prompts::CLIENT_DIRECTIVE;
use lessonforge::generation::LessonGenerator;
use lessonforge::lesson::{LessonService, LessonStatus, LessonStore};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const EVAL_COMPONENT: &str = "\"use client\";\nexport default function LessonComponent() {\n  const n = eval(\"1 + 1\");\n  return (<p>{n}</p>);\n}";

fn service_with(
    dir: &TempDir,
    title: Arc<ScriptedModel>,
    code: Arc<ScriptedModel>,
) -> LessonService {
    let store = LessonStore::shared(sled::open(dir.path().join("store")).unwrap()).unwrap();
    let settings = GenerationSettings::default();
    let generator = Arc::new(LessonGenerator::new(title, code, settings.clone()));
    LessonService::new(store, settings).with_generator(generator)
}

#[tokio::test]
async fn binary_search_outline_generates_on_first_attempt() {
    let dir = TempDir::new().unwrap();
    let title = Arc::new(ScriptedModel::new(vec!["Binary Search"]));
    let code = Arc::new(ScriptedModel::new(vec![VALID_COMPONENT]));
    let service = service_with(&dir, title.clone(), code.clone());

    let created = service.create_lesson("explain binary search").unwrap();
    assert_eq!(created.status, LessonStatus::Generating);
    assert_eq!(created.title, "Generating...");

    let done = service.wait_for(&created.id).await.unwrap();
    assert_eq!(done.status, LessonStatus::Generated);
    assert_eq!(done.title, "Binary Search");
    assert_eq!(done.generated_content.as_deref(), Some(VALID_COMPONENT));
    assert!(done.error_message.is_none());
    assert!(done.updated_at >= done.created_at);

    let content = done.generated_content.as_deref().unwrap();
    assert!(content.starts_with(CLIENT_DIRECTIVE));
    assert!(content.contains("export default function "));
    assert!(!content.contains("```"));

    assert_eq!(title.calls(), 1);
    assert_eq!(code.calls(), 1, "no repair and no second attempt");
}

#[tokio::test]
async fn empty_outline_is_rejected_without_model_calls() {
    let dir = TempDir::new().unwrap();
    let title = Arc::new(ScriptedModel::new(vec![]));
    let code = Arc::new(ScriptedModel::new(vec![]));
    let service = service_with(&dir, title.clone(), code.clone());

    let err = service.create_lesson("").unwrap_err();
    assert!(matches!(err, ApiError::InvalidOutline));
    assert!(service.list_lessons().unwrap().is_empty());
    assert_eq!(title.calls() + code.calls(), 0);
}

#[tokio::test]
async fn persistent_eval_ends_failed_after_three_attempts() {
    let dir = TempDir::new().unwrap();
    let title = Arc::new(ScriptedModel::new(vec!["Math", "Math", "Math"]));
    let code = Arc::new(ScriptedModel::new(vec![EVAL_COMPONENT; 5]));
    let service = service_with(&dir, title.clone(), code.clone());

    let created = service.create_lesson("add two numbers").unwrap();
    let done = service.wait_for(&created.id).await.unwrap();

    assert_eq!(done.status, LessonStatus::Failed);
    assert_eq!(done.title, "Generating...");
    assert!(done.generated_content.is_none());
    let message = done.error_message.unwrap();
    assert!(message.contains("dangerous code execution"), "{}", message);

    assert_eq!(title.calls(), 3, "three outer attempts");
    assert_eq!(code.calls(), 5, "three generations plus two repairs");
}

#[tokio::test]
async fn fenced_response_is_unwrapped_and_accepted() {
    let dir = TempDir::new().unwrap();
    let fenced = format!("```tsx\n{}\n```", VALID_COMPONENT);
    let title = Arc::new(ScriptedModel::new(vec!["Guessing Game"]));
    let code = Arc::new(ScriptedModel::new(vec![fenced.as_str()]));
    let service = service_with(&dir, title, code);

    let created = service.create_lesson("number guessing").unwrap();
    let done = service.wait_for(&created.id).await.unwrap();

    assert_eq!(done.status, LessonStatus::Generated);
    let content = done.generated_content.unwrap();
    assert!(!content.contains("```"));
    assert!(content.starts_with(CLIENT_DIRECTIVE));
}

#[tokio::test]
async fn provider_failure_then_success_recovers_on_retry() {
    let dir = TempDir::new().unwrap();
    let title = Arc::new(ScriptedModel::with_results(vec![
        Err(ApiError::ProviderRequestFailed("connection reset".to_string())),
        Ok("Recovered".to_string()),
    ]));
    let code = Arc::new(ScriptedModel::new(vec![VALID_COMPONENT]));
    let service = service_with(&dir, title.clone(), code.clone());

    let created = service.create_lesson("retry me").unwrap();
    let done = service.wait_for(&created.id).await.unwrap();

    assert_eq!(done.status, LessonStatus::Generated);
    assert_eq!(done.title, "Recovered");
    assert_eq!(title.calls(), 2);
    assert_eq!(code.calls(), 1);
}

#[tokio::test]
async fn list_returns_newest_first_and_lookup_is_verbatim() {
    let dir = TempDir::new().unwrap();
    let title = Arc::new(ScriptedModel::new(vec!["One", "Two"]));
    let code = Arc::new(ScriptedModel::new(vec![VALID_COMPONENT, VALID_COMPONENT]));
    let service = service_with(&dir, title, code);

    let first = service.create_lesson("first").unwrap();
    service.wait_for(&first.id).await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = service.create_lesson("second").unwrap();
    service.wait_all().await.unwrap();

    let listed = service.list_lessons().unwrap();
    let ids: Vec<&str> = listed.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);

    let fetched = service.get_lesson(&first.id).unwrap();
    assert_eq!(&fetched, &listed[1]);
    assert!(matches!(
        service.get_lesson("lesson-does-not-exist"),
        Err(ApiError::LessonNotFound(_))
    ));
}

#[tokio::test]
async fn terminal_record_is_not_rewritten() {
    let dir = TempDir::new().unwrap();
    let title = Arc::new(ScriptedModel::new(vec!["Done"]));
    let code = Arc::new(ScriptedModel::new(vec![VALID_COMPONENT]));
    let service = service_with(&dir, title, code);

    let created = service.create_lesson("finish once").unwrap();
    service.wait_for(&created.id).await.unwrap();

    let second_write = service.store().complete(
        &created.id,
        &lessonforge::generation::GenerationResult::Failed {
            error: "late duplicate".to_string(),
        },
        chrono::Utc::now(),
    );
    assert!(matches!(
        second_write,
        Err(ApiError::LessonAlreadyCompleted(_))
    ));
    assert_eq!(
        service.get_lesson(&created.id).unwrap().status,
        LessonStatus::Generated
    );

    // fresh lessons are never reconciled away
    assert!(service.reconcile(Duration::from_secs(60)).unwrap().is_empty());
}
