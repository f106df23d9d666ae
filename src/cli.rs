//! Command-line surface.
//!
//! Thin wiring only: argument parsing, config merge, and orchestration of
//! discovery plus markdown rendering. Policy lives in the library modules.

use crate::config::Config;
use crate::discovery::Discovery;
use crate::error::{HelpdocError, Result};
use crate::markdown::{output_path, MarkdownGenerator};
use crate::model::CommandPath;
use crate::runner::{HelpStyle, ProcessRunner};
use clap::Parser;
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

/// Capture a command's --help output recursively and save it as markdown
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Command to document: program plus optional starting subcommand path
    #[arg(value_name = "COMMAND", required = true, num_args = 1..)]
    pub command: Vec<String>,

    /// Output markdown file path. Defaults to <program>-help.md
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write the document to stdout instead of a file
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,

    /// Maximum depth for subcommand discovery
    #[arg(short = 'd', long, default_value_t = crate::DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Timeout in seconds for each help invocation
    #[arg(short = 't', long, default_value_t = crate::DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// How the target tool exposes help for subcommands
    #[arg(long, value_enum, default_value_t = HelpStyle::Flag)]
    pub help_style: HelpStyle,

    /// Omit the generation timestamp from the document
    #[arg(long)]
    pub no_timestamp: bool,

    /// Show progress during discovery
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress status output (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        self.run(&mut stdout).await
    }

    /// Body of [`execute`](Self::execute) with the document stream
    /// injected. Status and progress lines go to stderr; with `--stdout`
    /// the stream carries the markdown document and nothing else.
    async fn run(self, out: &mut impl Write) -> Result<()> {
        // Load configuration from file, then merge with CLI args
        let config = Config::load_default()
            .unwrap_or_else(|_| Config::default())
            .merge_with_cli_args(&self);

        let root = CommandPath::new(self.command.clone())?;

        // Fail fast with a clear message when the root executable is
        // missing; every deeper failure is absorbed into the tree.
        if which::which(root.program()).is_err() {
            return Err(HelpdocError::ExecutableNotFound(root.program().to_string()));
        }

        let quiet = config.quiet;
        if !quiet {
            eprintln!("{} {}", "Discovering commands for:".cyan(), root);
        }

        let runner = ProcessRunner::new(Duration::from_secs(config.timeout_secs))
            .with_help_style(self.help_style);
        let verbose = config.verbose && !quiet;
        let discovery =
            Discovery::new(runner, config.max_depth).with_progress(move |path, depth| {
                if verbose {
                    eprintln!("{}Discovering: {}", "  ".repeat(depth), path);
                }
            });

        let tree = discovery.discover(root.clone()).await?;

        if !quiet {
            eprintln!("Found {} command(s)", tree.count());
        }

        let generator = MarkdownGenerator::new()
            .include_timestamp(config.markdown.timestamp)
            .help_style(self.help_style);
        let document = generator.generate(&tree);

        if self.stdout {
            write!(out, "{}", document)?;
        } else {
            let path = output_path(root.program(), self.output);
            std::fs::write(&path, &document)?;
            if !quiet {
                eprintln!(
                    "Documentation saved to: {}",
                    path.display().to_string().green()
                );
            }
        }

        Ok(())
    }
}
