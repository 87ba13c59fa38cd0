//! Integration tests for layered configuration loading.

use crate::integration::test_utils::{with_isolated_env, xdg_config_home};
use lessonforge::config::{ConfigLoader, ProviderType};
use std::fs;
use tempfile::TempDir;

fn write_workspace_config(workspace: &std::path::Path, name: &str, body: &str) {
    let config_dir = workspace.join("config");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join(name), body).unwrap();
}

#[test]
fn global_file_is_overridden_by_workspace_file() {
    let test_dir = TempDir::new().unwrap();
    let workspace = test_dir.path().join("ws");
    fs::create_dir_all(&workspace).unwrap();

    let global_dir = xdg_config_home(&test_dir).join("lessonforge");
    fs::create_dir_all(&global_dir).unwrap();
    fs::write(
        global_dir.join("config.toml"),
        r#"
[generation]
max_attempts = 4
fallback_title = "From Global"

[providers.default]
provider_type = "gemini"
model = "gemini-2.0-flash"
api_key = "global-key"
"#,
    )
    .unwrap();
    write_workspace_config(
        &workspace,
        "config.toml",
        r#"
[generation]
fallback_title = "From Workspace"
"#,
    );

    let config = with_isolated_env(&test_dir, &[], || ConfigLoader::load(&workspace).unwrap());

    assert_eq!(config.generation.max_attempts, 4);
    assert_eq!(config.generation.fallback_title, "From Workspace");
    let provider = config.providers.get("default").unwrap();
    assert_eq!(provider.provider_type, ProviderType::Gemini);
    assert_eq!(provider.provider_name.as_deref(), Some("default"));
    assert!(config.validate().is_ok());
}

#[test]
fn environment_specific_file_and_env_vars_win() {
    let test_dir = TempDir::new().unwrap();
    let workspace = test_dir.path().join("ws");
    fs::create_dir_all(&workspace).unwrap();
    write_workspace_config(
        &workspace,
        "config.toml",
        r#"
[generation]
placeholder_title = "Base"
stale_after_secs = 60
"#,
    );
    write_workspace_config(
        &workspace,
        "staging.toml",
        r#"
[generation]
placeholder_title = "Staging"
"#,
    );

    let config = with_isolated_env(
        &test_dir,
        &[
            ("LESSONFORGE_ENV", "staging"),
            ("LESSONFORGE__GENERATION__STALE_AFTER_SECS", "120"),
        ],
        || ConfigLoader::load(&workspace).unwrap(),
    );

    assert_eq!(config.generation.placeholder_title, "Staging");
    assert_eq!(config.generation.stale_after_secs, 120);
    assert_eq!(config.generation.max_attempts, 3);
}

#[test]
fn invalid_provider_entries_are_all_reported() {
    let test_dir = TempDir::new().unwrap();
    let config_file = test_dir.path().join("lessonforge.toml");
    fs::write(
        &config_file,
        r#"
[generation]
title_provider = "fast"
code_provider = "missing"

[providers.fast]
provider_type = "local"
model = ""
"#,
    )
    .unwrap();

    let config = with_isolated_env(&test_dir, &[], || {
        ConfigLoader::load_from_file(&config_file).unwrap()
    });
    let errors = config.validate().unwrap_err();
    let rendered: Vec<String> = errors.iter().map(|e| e.to_string()).collect();

    assert!(rendered.iter().any(|e| e.contains("Provider 'fast'")));
    assert!(rendered
        .iter()
        .any(|e| e.contains("code_provider refers to unknown provider 'missing'")));
}
