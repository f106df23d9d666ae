//! External process invocation.
//!
//! The target program is opaque: we invoke it with its help flag, capture
//! whatever it prints on either stream, and report exit status and timeout
//! state without judging them. Callers decide what counts as failure based
//! on whether usable text came back.

use crate::model::{CommandPath, NodeError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// How a target tool exposes help for its subcommands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HelpStyle {
    /// `<program> <sub...> --help` (the common convention).
    #[default]
    Flag,
    /// `<program> help <sub...>` for tools without a per-command flag.
    Subcommand,
}

impl HelpStyle {
    /// Argument vector used to request help for `path`. Also the literal
    /// invocation the generated document shows for each node.
    pub fn argv(&self, path: &CommandPath) -> Vec<String> {
        match self {
            HelpStyle::Flag => {
                let mut argv = path.tokens().to_vec();
                argv.push("--help".to_string());
                argv
            }
            HelpStyle::Subcommand => {
                let mut argv = vec![path.program().to_string(), "help".to_string()];
                argv.extend(path.tokens().iter().skip(1).cloned());
                argv
            }
        }
    }
}

/// Captured result of one help invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutput {
    /// Combined output text. Stdout is preferred; stderr is used when
    /// stdout is blank, since help commonly lands on either stream.
    pub output: String,
    /// Exit code if the process ran to completion.
    pub exit_code: Option<i32>,
    /// Whether the wall-clock deadline fired.
    pub timed_out: bool,
    /// Message when the process could not be started at all.
    pub spawn_error: Option<String>,
}

impl RunOutput {
    /// Whether this invocation produced parseable help text. A non-zero
    /// exit with real output still counts; many CLIs exit 2 on `--help`.
    pub fn usable(&self) -> bool {
        self.spawn_error.is_none() && !self.timed_out && !self.output.trim().is_empty()
    }

    /// Classify an unusable invocation for the node record.
    pub fn node_error(&self) -> Option<NodeError> {
        if let Some(msg) = &self.spawn_error {
            return Some(NodeError::Spawn(msg.clone()));
        }
        if self.timed_out {
            return Some(NodeError::Timeout);
        }
        if self.output.trim().is_empty() {
            return Some(NodeError::EmptyOutput {
                exit_code: self.exit_code,
            });
        }
        None
    }
}

/// Capability interface for obtaining help output for a command path.
///
/// Discovery depends on this trait, not on [`ProcessRunner`], so tests can
/// substitute a deterministic fake without spawning real processes.
#[async_trait]
pub trait HelpRunner: Send + Sync {
    async fn run_help(&self, path: &CommandPath) -> RunOutput;
}

#[async_trait]
impl<T: HelpRunner + ?Sized> HelpRunner for std::sync::Arc<T> {
    async fn run_help(&self, path: &CommandPath) -> RunOutput {
        (**self).run_help(path).await
    }
}

/// Runner that spawns the real target program.
///
/// Exactly one child process per call, no retries: help queries are
/// expected to be deterministic and idempotent.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Duration,
    help_style: HelpStyle,
}

impl ProcessRunner {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            help_style: HelpStyle::default(),
        }
    }

    pub fn with_help_style(mut self, style: HelpStyle) -> Self {
        self.help_style = style;
        self
    }

    fn argv(&self, path: &CommandPath) -> Vec<String> {
        self.help_style.argv(path)
    }
}

#[async_trait]
impl HelpRunner for ProcessRunner {
    async fn run_help(&self, path: &CommandPath) -> RunOutput {
        let argv = self.argv(path);
        debug!(command = %argv.join(" "), "invoking help");

        let mut cmd = Command::new(&argv[0]);
        cmd.args(&argv[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Guarantees cleanup when the timeout drops the wait future.
            .kill_on_drop(true);

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                return RunOutput {
                    spawn_error: Some(e.to_string()),
                    ..RunOutput::default()
                };
            }
        };

        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(out)) => {
                let stdout = String::from_utf8_lossy(&out.stdout);
                let output = if stdout.trim().is_empty() {
                    String::from_utf8_lossy(&out.stderr).into_owned()
                } else {
                    stdout.into_owned()
                };
                RunOutput {
                    output,
                    exit_code: out.status.code(),
                    ..RunOutput::default()
                }
            }
            Ok(Err(e)) => RunOutput {
                spawn_error: Some(e.to_string()),
                ..RunOutput::default()
            },
            Err(_) => {
                warn!(command = %path, timeout_secs = self.timeout.as_secs(), "help invocation timed out");
                RunOutput {
                    timed_out: true,
                    ..RunOutput::default()
                }
            }
        }
    }
}
