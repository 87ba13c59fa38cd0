//! Shared test utilities for integration tests
//!
//! Centralizes XDG environment isolation, CLI invocation and a scripted
//! `LessonModel` so tests stay deterministic and never touch the network.

use async_trait::async_trait;
use lessonforge::error::ApiError;
use lessonforge::generation::LessonModel;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::Mutex;
use tempfile::TempDir;

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Environment variable state to restore after test
struct EnvState {
    vars: Vec<(&'static str, Option<String>)>,
}

impl EnvState {
    fn capture(names: &[&'static str]) -> Self {
        Self {
            vars: names
                .iter()
                .map(|name| (*name, std::env::var(name).ok()))
                .collect(),
        }
    }

    fn restore(self) {
        for (name, value) in self.vars {
            match value {
                Some(orig) => std::env::set_var(name, orig),
                None => std::env::remove_var(name),
            }
        }
    }
}

/// Run `f` with HOME and XDG_CONFIG_HOME pointed into `test_dir` plus the
/// given extra variables set; everything is restored afterwards.
pub fn with_isolated_env<F, R>(test_dir: &TempDir, extra: &[(&'static str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

    let mut names = vec!["HOME", "XDG_CONFIG_HOME"];
    names.extend(extra.iter().map(|(name, _)| *name));
    let env_state = EnvState::capture(&names);

    let test_config_home = test_dir.path().join("xdg-config");
    let test_home = test_dir.path().join("home");
    std::fs::create_dir_all(&test_config_home).unwrap();
    std::fs::create_dir_all(&test_home).unwrap();

    std::env::set_var("HOME", &test_home);
    std::env::set_var("XDG_CONFIG_HOME", &test_config_home);
    for (name, value) in extra {
        std::env::set_var(name, value);
    }

    let result = f();

    env_state.restore();

    result
}

/// Directory `with_isolated_env` uses as XDG_CONFIG_HOME.
pub fn xdg_config_home(test_dir: &TempDir) -> PathBuf {
    test_dir.path().join("xdg-config")
}

/// Run the `lessonforge` binary against `workspace` with isolated XDG dirs.
pub fn run_cli(test_dir: &TempDir, workspace: &Path, args: &[&str]) -> Output {
    let state_home = test_dir.path().join("state");
    let config_home = test_dir.path().join("cli-config");
    let home = test_dir.path().join("cli-home");
    for dir in [&state_home, &config_home, &home] {
        std::fs::create_dir_all(dir).unwrap();
    }

    Command::new(env!("CARGO_BIN_EXE_lessonforge"))
        .env("XDG_STATE_HOME", &state_home)
        .env("XDG_CONFIG_HOME", &config_home)
        .env("HOME", &home)
        .env_remove("LESSONFORGE_LOG")
        .env_remove("LESSONFORGE_LOG_OUTPUT")
        .arg("--workspace")
        .arg(workspace)
        .args(args)
        .output()
        .unwrap()
}

/// Deterministic model: replays scripted replies in order, records prompts.
pub struct ScriptedModel {
    replies: parking_lot::Mutex<VecDeque<Result<String, ApiError>>>,
    prompts: parking_lot::Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<&str>) -> Self {
        Self {
            replies: parking_lot::Mutex::new(replies.into_iter().map(|r| Ok(r.to_string())).collect()),
            prompts: parking_lot::Mutex::new(Vec::new()),
        }
    }

    pub fn with_results(replies: Vec<Result<String, ApiError>>) -> Self {
        Self {
            replies: parking_lot::Mutex::new(replies.into_iter().collect()),
            prompts: parking_lot::Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }
}

#[async_trait]
impl LessonModel for ScriptedModel {
    async fn complete(&self, prompt: &str) -> Result<String, ApiError> {
        self.prompts.lock().push(prompt.to_string());
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::ProviderError("script exhausted".to_string())))
    }
}

/// A component that passes every validator check.
pub const VALID_COMPONENT: &str = r#""use client";
import { useState, useEffect, useMemo } from "react";
export default function LessonComponent() {
  const [low, setLow] = useState(0);
  const [high, setHigh] = useState(100);
  const mid = useMemo(() => Math.floor((low + high) / 2), [low, high]);
  useEffect(() => {}, [mid]);
  return (
    <div className="p-4">
      <p>Is your number above {mid}?</p>
      <button onClick={() => setLow(mid + 1)}>Higher</button>
      <button onClick={() => setHigh(mid)}>Lower</button>
    </div>
  );
}"#;
