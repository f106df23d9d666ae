//! Recursively capture a CLI's `--help` output and render it as markdown.
//!
//! `helpdoc` walks the command tree of an arbitrary external program by
//! invoking its help output node by node, parses each help text into a
//! structured record, and serializes the aggregated tree into a single
//! markdown document with a table of contents.
//!
//! ## Usage
//!
//! ```bash
//! # Document a tool into <program>-help.md
//! helpdoc git
//!
//! # Custom output file and depth
//! helpdoc docker -o docker-docs.md --max-depth 3
//!
//! # Start from a subcommand, print to stdout
//! helpdoc git remote --stdout
//! ```
//!
//! As a library:
//!
//! ```rust,no_run
//! use helpdoc::{CommandPath, Discovery, MarkdownGenerator, ProcessRunner};
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> helpdoc::Result<()> {
//! let runner = ProcessRunner::new(Duration::from_secs(30));
//! let discovery = Discovery::new(runner, 5);
//! let tree = discovery.discover(CommandPath::root("git")).await?;
//! let doc = MarkdownGenerator::new().generate(&tree);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod markdown;
pub mod model;
pub mod parser;
pub mod runner;
pub mod testing;

#[cfg(test)]
mod discovery_test;

// Re-export commonly used types
pub use discovery::Discovery;
pub use error::{HelpdocError, Result};
pub use markdown::{output_path, MarkdownGenerator};
pub use model::{CommandPath, CommandTree, HelpRecord, NodeError};
pub use parser::{HelpParser, ParsedHelp};
pub use runner::{HelpRunner, HelpStyle, ProcessRunner, RunOutput};

/// Version information for the CLI
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default per-invocation timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default maximum recursion depth for subcommand discovery
pub const DEFAULT_MAX_DEPTH: usize = 5;
