use crate::model::NodeError;
use thiserror::Error;

/// Top-level error type for helpdoc.
///
/// Only conditions that abort a run live here. Per-node failures during
/// discovery (timeouts, spawn failures on subcommands) are recorded on the
/// affected [`HelpRecord`](crate::model::HelpRecord) and never propagate.
#[derive(Error, Debug)]
pub enum HelpdocError {
    #[error("could not get help for '{command}': {cause}")]
    RootCommand { command: String, cause: NodeError },

    #[error("executable not found: {0}")]
    ExecutableNotFound(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HelpdocError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Get user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::RootCommand { command, cause } => match cause {
                NodeError::Timeout => format!(
                    "Getting help for '{}' timed out. Try a larger --timeout value.",
                    command
                ),
                _ => format!(
                    "Could not get help for '{}': {}. If the tool uses a 'help' subcommand \
                     instead of --help, try --help-style subcommand.",
                    command, cause
                ),
            },
            Self::ExecutableNotFound(name) => {
                format!(
                    "Executable '{}' not found. Check that it is installed and on your PATH.",
                    name
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Convenient result type for helpdoc
pub type Result<T> = std::result::Result<T, HelpdocError>;
