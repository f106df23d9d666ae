//! Heuristic help-text parsing.
//!
//! Help output is not machine-readable and varies per tool, so parsing is a
//! small ordered rule list with graceful fallback rather than a grammar.
//! Unrecognized input never fails; it degrades to a leaf with empty
//! metadata, which is indistinguishable from a command with no subcommands.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Section headers that introduce a subcommand listing. Extend this list to
/// teach the parser new help dialects.
const SECTION_HEADERS: &[&str] = &["commands", "subcommands", "available commands"];

/// Words that commonly lead lines in help text but are never command names.
const SKIP_WORDS: &[&str] = &["use", "see", "for", "the", "and", "options", "usage"];

static COMMANDS_SECTION: Lazy<Regex> = Lazy::new(|| {
    let alternatives = SECTION_HEADERS.join("|");
    Regex::new(&format!(r"(?i)^({}):?\s*$", alternatives)).expect("valid section header pattern")
});

static COMMAND_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([A-Za-z][A-Za-z0-9_-]*)(\s|$)").expect("valid name pattern"));

static USAGE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^usage\b:?\s*(.*)$").expect("valid usage pattern"));

/// Structured result of parsing one help text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedHelp {
    /// Usage line, possibly empty.
    pub usage: String,
    /// Short description line, possibly empty.
    pub description: String,
    /// Subcommand names in listing order, deduplicated.
    pub children: Vec<String>,
}

/// Parses raw help output into a [`ParsedHelp`].
#[derive(Debug, Clone, Default)]
pub struct HelpParser;

impl HelpParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a help text. Never fails; unparseable input yields empty fields.
    pub fn parse(&self, raw_text: &str) -> ParsedHelp {
        let lines: Vec<&str> = raw_text.lines().collect();
        let (usage, usage_line) = Self::find_usage(&lines);
        let description = Self::find_description(&lines, usage_line);
        let children = Self::parse_children(&lines);

        ParsedHelp {
            usage,
            description,
            children,
        }
    }

    /// Rule 1: the first line starting with a case-insensitive "usage"
    /// marker; otherwise the first non-blank line verbatim.
    fn find_usage(lines: &[&str]) -> (String, Option<usize>) {
        for (i, line) in lines.iter().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if let Some(caps) = USAGE_PREFIX.captures(trimmed) {
                return (caps[1].trim().to_string(), Some(i));
            }
        }
        for (i, line) in lines.iter().enumerate() {
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                return (trimmed.to_string(), Some(i));
            }
        }
        (String::new(), None)
    }

    /// Rule 2: the first non-blank line that is not the usage line and
    /// precedes any recognized section header.
    fn find_description(lines: &[&str], usage_line: Option<usize>) -> String {
        for (i, line) in lines.iter().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || Some(i) == usage_line {
                continue;
            }
            if Self::is_section_header(trimmed) {
                return String::new();
            }
            return trimmed.to_string();
        }
        String::new()
    }

    /// Rules 3-5: locate a commands section, extract the leading token of
    /// each entry line, deduplicate preserving first-seen order.
    fn parse_children(lines: &[&str]) -> Vec<String> {
        let mut children = Vec::new();
        let mut seen = HashSet::new();
        let mut in_section = false;

        for line in lines {
            let trimmed = line.trim();

            if COMMANDS_SECTION.is_match(trimmed) {
                in_section = true;
                continue;
            }

            if !in_section {
                continue;
            }

            if Self::ends_section(trimmed) {
                in_section = false;
                continue;
            }

            if trimmed.is_empty() {
                continue;
            }

            if let Some(name) = Self::entry_name(line) {
                if seen.insert(name.clone()) {
                    children.push(name);
                }
            }
        }

        children
    }

    fn is_section_header(line: &str) -> bool {
        COMMANDS_SECTION.is_match(line)
            || (line.ends_with(':')
                && line.chars().next().is_some_and(|c| c.is_uppercase()))
    }

    /// A new header-like line or an options/border marker closes the
    /// commands section. Another commands header keeps it open (tools
    /// sometimes list aliases under several headers).
    fn ends_section(line: &str) -> bool {
        if line.is_empty() || COMMANDS_SECTION.is_match(line) {
            return false;
        }
        if line.ends_with(':') && line.chars().next().is_some_and(|c| c.is_uppercase()) {
            return true;
        }
        line.starts_with('-') || line.starts_with('\u{256d}') || line.starts_with('\u{2570}')
    }

    fn entry_name(line: &str) -> Option<String> {
        let caps = COMMAND_NAME.captures(line)?;
        let name = caps[1].to_string();
        if SKIP_WORDS.contains(&name.to_lowercase().as_str()) {
            None
        } else {
            Some(name)
        }
    }
}
