//! Mock implementations for testing
//!
//! Provides a scripted [`HelpRunner`] so tests can drive discovery over a
//! deterministic fake command tree, inject timeouts and spawn failures per
//! node, and count how often each path was invoked.

use crate::model::CommandPath;
use crate::runner::{HelpRunner, RunOutput};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

type FallbackFn = Box<dyn Fn(&CommandPath) -> RunOutput + Send + Sync>;

/// Deterministic scripted help runner.
///
/// Responses are keyed by the space-joined command path. Unscripted paths
/// hit the fallback if one is set, otherwise report an empty output with
/// exit code 1 (an unusable invocation, i.e. a failed leaf).
#[derive(Default)]
pub struct MockHelpRunner {
    responses: Mutex<HashMap<String, RunOutput>>,
    calls: Mutex<HashMap<String, usize>>,
    fallback: Mutex<Option<FallbackFn>>,
}

impl MockHelpRunner {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(parts: &[&str]) -> String {
        parts.join(" ")
    }

    /// Script a successful help text for a path.
    pub fn respond(&self, parts: &[&str], help: &str) {
        self.respond_with(
            parts,
            RunOutput {
                output: help.to_string(),
                exit_code: Some(0),
                ..RunOutput::default()
            },
        );
    }

    /// Script an arbitrary raw result for a path.
    pub fn respond_with(&self, parts: &[&str], output: RunOutput) {
        self.responses
            .lock()
            .unwrap()
            .insert(Self::key(parts), output);
    }

    /// Script a timeout for a path.
    pub fn time_out(&self, parts: &[&str]) {
        self.respond_with(
            parts,
            RunOutput {
                timed_out: true,
                ..RunOutput::default()
            },
        );
    }

    /// Script a spawn failure for a path.
    pub fn fail_spawn(&self, parts: &[&str], message: &str) {
        self.respond_with(
            parts,
            RunOutput {
                spawn_error: Some(message.to_string()),
                ..RunOutput::default()
            },
        );
    }

    /// Handler for paths with no scripted response. Useful for synthetic
    /// trees such as infinite fan-out.
    pub fn with_fallback(
        self,
        handler: impl Fn(&CommandPath) -> RunOutput + Send + Sync + 'static,
    ) -> Self {
        *self.fallback.lock().unwrap() = Some(Box::new(handler));
        self
    }

    /// Number of times a specific path was invoked.
    pub fn calls_for(&self, parts: &[&str]) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(&Self::key(parts))
            .copied()
            .unwrap_or(0)
    }

    /// Total number of invocations across all paths.
    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl HelpRunner for MockHelpRunner {
    async fn run_help(&self, path: &CommandPath) -> RunOutput {
        let key = path.to_string();
        *self.calls.lock().unwrap().entry(key.clone()).or_insert(0) += 1;

        if let Some(output) = self.responses.lock().unwrap().get(&key) {
            return output.clone();
        }

        if let Some(handler) = self.fallback.lock().unwrap().as_ref() {
            return handler(path);
        }

        RunOutput {
            exit_code: Some(1),
            ..RunOutput::default()
        }
    }
}
