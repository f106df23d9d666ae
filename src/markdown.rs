//! Markdown rendering of a completed command tree.
//!
//! A pure serialization pass: identical trees always produce byte-identical
//! output (when the generation timestamp is disabled), with a table of
//! contents in discovery pre-order followed by one section per node.

use crate::model::CommandTree;
use crate::runner::HelpStyle;
use chrono::Local;
use std::path::{Path, PathBuf};

/// Generates markdown documentation from a discovered command tree.
#[derive(Debug, Clone)]
pub struct MarkdownGenerator {
    include_timestamp: bool,
    help_style: HelpStyle,
}

impl Default for MarkdownGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownGenerator {
    pub fn new() -> Self {
        Self {
            include_timestamp: true,
            help_style: HelpStyle::default(),
        }
    }

    /// Whether to stamp the document with the generation time. Disable for
    /// byte-reproducible output.
    pub fn include_timestamp(mut self, include: bool) -> Self {
        self.include_timestamp = include;
        self
    }

    /// Help style the tree was discovered with; the invocation fences in
    /// the document show the matching command lines.
    pub fn help_style(mut self, style: HelpStyle) -> Self {
        self.help_style = style;
        self
    }

    /// Render the complete document.
    pub fn generate(&self, tree: &CommandTree) -> String {
        let mut doc = String::new();

        doc.push_str(&format!("# {} Documentation\n", tree.record.path.program()));
        if self.include_timestamp {
            doc.push_str(&format!(
                "\nGenerated on: {}\n",
                Local::now().format("%Y-%m-%d %H:%M:%S")
            ));
        }
        doc.push_str(&format!("\nTotal commands documented: {}\n", tree.count()));

        doc.push_str("\n## Table of Contents\n\n");
        Self::toc(tree, 0, &mut doc);

        doc.push_str("\n---\n\n");
        self.sections(tree, 2, &mut doc);

        doc
    }

    fn toc(node: &CommandTree, indent: usize, out: &mut String) {
        let path = &node.record.path;
        out.push_str(&format!(
            "{}- [{}](#{})\n",
            "  ".repeat(indent),
            path,
            path.anchor()
        ));
        for child in &node.children {
            Self::toc(child, indent + 1, out);
        }
    }

    fn sections(&self, node: &CommandTree, level: usize, out: &mut String) {
        let record = &node.record;
        let heading = "#".repeat(level.min(6));
        out.push_str(&format!("{} {}\n\n", heading, record.path));

        if !record.description.is_empty() {
            out.push_str(&format!("{}\n\n", record.description));
        }
        if !record.usage.is_empty() {
            out.push_str(&format!("**Usage:** `{}`\n\n", record.usage));
        }

        out.push_str(&format!(
            "```\n{}\n```\n\n",
            self.help_style.argv(&record.path).join(" ")
        ));

        match &record.error {
            Some(error) => {
                out.push_str(&format!("> Failed: {}\n\n", error));
            }
            None => {
                out.push_str(&format!("```\n{}\n```\n\n", record.raw_text.trim_end()));
            }
        }

        if !record.children.is_empty() {
            out.push_str("Subcommands:\n\n");
            for name in &record.children {
                // Skipped or depth-truncated children have no section of
                // their own, so they are listed without a link.
                if node.child(name).is_some() {
                    let child_path = record.path.child(name);
                    out.push_str(&format!("- [{}](#{})\n", name, child_path.anchor()));
                } else {
                    out.push_str(&format!("- {}\n", name));
                }
            }
            out.push('\n');
        }

        for child in &node.children {
            self.sections(child, level + 1, out);
        }
    }
}

/// Determine the output file path: explicit path wins, otherwise
/// `<program>-help.md` next to the working directory.
pub fn output_path(program: &str, explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    let name = Path::new(program)
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.to_string());
    PathBuf::from(format!("{}-help.md", name))
}
