use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration settings for the helpdoc CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Default timeout for each help invocation in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Default maximum depth for subcommand discovery
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Show progress during discovery by default
    #[serde(default)]
    pub verbose: bool,

    /// Suppress status output by default
    #[serde(default)]
    pub quiet: bool,

    /// Markdown output preferences
    #[serde(default)]
    pub markdown: MarkdownDefaults,
}

/// Markdown rendering defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownDefaults {
    /// Include the generation timestamp in documents
    #[serde(default = "default_true")]
    pub timestamp: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            max_depth: default_max_depth(),
            verbose: false,
            quiet: false,
            markdown: MarkdownDefaults::default(),
        }
    }
}

impl Default for MarkdownDefaults {
    fn default() -> Self {
        Self {
            timestamp: default_true(),
        }
    }
}

impl Config {
    /// Load configuration from file, with fallback to defaults
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            crate::error::HelpdocError::Configuration(format!(
                "failed to parse config file: {}",
                e
            ))
        })?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            crate::error::HelpdocError::Configuration(format!(
                "failed to serialize config: {}",
                e
            ))
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("", "", "helpdoc")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".helpdoc")
                    .join("config.toml")
            })
    }

    /// Load configuration from the default location
    pub fn load_default() -> Result<Self> {
        Self::load_from_file(Self::default_path())
    }

    /// Merge with command-line arguments, giving priority to CLI args
    pub fn merge_with_cli_args(mut self, cli_args: &crate::cli::Cli) -> Self {
        if cli_args.verbose {
            self.verbose = true;
        }
        if cli_args.quiet {
            self.quiet = true;
        }
        if cli_args.timeout != crate::DEFAULT_TIMEOUT_SECS {
            self.timeout_secs = cli_args.timeout;
        }
        if cli_args.max_depth != crate::DEFAULT_MAX_DEPTH {
            self.max_depth = cli_args.max_depth;
        }
        if cli_args.no_timestamp {
            self.markdown.timestamp = false;
        }

        self
    }
}

// Helper functions for default values
fn default_timeout() -> u64 {
    crate::DEFAULT_TIMEOUT_SECS
}

fn default_max_depth() -> usize {
    crate::DEFAULT_MAX_DEPTH
}

fn default_true() -> bool {
    true
}
