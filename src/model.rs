//! Data model for discovered command trees.
//!
//! A [`CommandPath`] identifies one node (and doubles as the argument vector
//! used to invoke it), a [`HelpRecord`] holds what was captured and parsed
//! for that node, and a [`CommandTree`] nests records in help-listing order.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Ordered sequence of tokens from the root program down to a subcommand,
/// e.g. `["git", "remote", "add"]`.
///
/// Immutable once created. Used both as an identity key (hash/equality over
/// the exact token sequence) and as the literal argv for invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandPath(Vec<String>);

impl CommandPath {
    /// Create a path from raw tokens. The first token is the executable.
    pub fn new(tokens: Vec<String>) -> crate::Result<Self> {
        if tokens.is_empty() || tokens.iter().all(|t| t.trim().is_empty()) {
            return Err(crate::HelpdocError::invalid_input(
                "command path must contain at least one token",
            ));
        }
        Ok(Self(tokens))
    }

    /// Create a single-token path for a root program.
    pub fn root(program: impl Into<String>) -> Self {
        Self(vec![program.into()])
    }

    /// Derive the path of a child subcommand by appending its name.
    pub fn child(&self, name: &str) -> Self {
        let mut tokens = self.0.clone();
        tokens.push(name.to_string());
        Self(tokens)
    }

    /// The executable token (first element).
    pub fn program(&self) -> &str {
        self.0.first().map(String::as_str).unwrap_or("")
    }

    /// The last token, i.e. the name of this (sub)command.
    pub fn leaf_name(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or("")
    }

    /// All tokens in order.
    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    /// Number of subcommand hops below the root program.
    pub fn depth(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// Whether any token of this path equals `name`. Used to refuse
    /// descending into a child that names this command or an ancestor.
    pub fn contains_token(&self, name: &str) -> bool {
        self.0.iter().any(|t| t == name)
    }

    /// Markdown heading anchor for this path.
    pub fn anchor(&self) -> String {
        self.to_string().to_lowercase().replace(' ', "-")
    }
}

impl fmt::Display for CommandPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

/// Node-local failure recorded on a [`HelpRecord`].
///
/// These never abort discovery; a failed node becomes a leaf and its
/// siblings are still processed.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeError {
    /// The process could not be started (missing executable, permissions).
    #[error("failed to start process: {0}")]
    Spawn(String),

    /// The process exceeded the wall-clock deadline and was killed.
    #[error("help invocation timed out")]
    Timeout,

    /// The process ran but produced no usable help text.
    #[error("produced no help output (exit code {})", .exit_code.map_or_else(|| String::from("unknown"), |c| c.to_string()))]
    EmptyOutput { exit_code: Option<i32> },
}

/// Help information captured for one command path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HelpRecord {
    /// Identity of this node.
    pub path: CommandPath,
    /// Raw captured help output; empty when the invocation failed.
    pub raw_text: String,
    /// Short summary line extracted from the help text, possibly empty.
    pub description: String,
    /// Usage line extracted from the help text, possibly empty.
    pub usage: String,
    /// Subcommand names listed by the help text, in listing order,
    /// deduplicated. Empty for leaf commands and failed nodes.
    pub children: Vec<String>,
    /// Failure indicator; `Some` iff the invocation produced nothing usable.
    pub error: Option<NodeError>,
}

impl HelpRecord {
    /// A record for a node whose invocation failed.
    pub fn failed(path: CommandPath, error: NodeError) -> Self {
        Self {
            path,
            error: Some(error),
            ..Self::default()
        }
    }

    /// Whether this node's invocation produced usable help text.
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// The recursively nested command tree rooted at the top-level invocation.
///
/// Built incrementally by [`Discovery`](crate::Discovery) and immutable
/// afterwards. Child order matches the help-listing order of the parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandTree {
    /// The record for this node.
    pub record: HelpRecord,
    /// Recursion depth at which this node was discovered (root = 0). A node
    /// at the configured depth limit is a truncated leaf: its record may
    /// list children that were never descended into.
    pub depth: usize,
    /// Child subtrees in discovery order.
    pub children: Vec<CommandTree>,
}

impl CommandTree {
    /// Total number of nodes in this subtree, including self.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(CommandTree::count).sum::<usize>()
    }

    /// Look up a direct child subtree by subcommand name.
    pub fn child(&self, name: &str) -> Option<&CommandTree> {
        self.children
            .iter()
            .find(|c| c.record.path.leaf_name() == name)
    }

    /// All nodes of this subtree in pre-order.
    pub fn nodes(&self) -> Vec<&CommandTree> {
        let mut out = Vec::with_capacity(self.count());
        self.collect(&mut out);
        out
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a CommandTree>) {
        out.push(self);
        for child in &self.children {
            child.collect(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(tokens: &[&str]) -> CommandPath {
        CommandPath::new(tokens.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_path_construction() {
        let root = CommandPath::root("git");
        assert_eq!(root.program(), "git");
        assert_eq!(root.leaf_name(), "git");
        assert_eq!(root.depth(), 0);

        let remote = root.child("remote");
        let add = remote.child("add");
        assert_eq!(add.tokens(), &["git", "remote", "add"]);
        assert_eq!(add.program(), "git");
        assert_eq!(add.leaf_name(), "add");
        assert_eq!(add.depth(), 2);

        // The original is untouched
        assert_eq!(root.tokens(), &["git"]);
    }

    #[test]
    fn test_path_rejects_empty() {
        assert!(CommandPath::new(vec![]).is_err());
        assert!(CommandPath::new(vec!["  ".to_string()]).is_err());
    }

    #[test]
    fn test_path_display_and_anchor() {
        let p = path(&["git", "remote", "add"]);
        assert_eq!(p.to_string(), "git remote add");
        assert_eq!(p.anchor(), "git-remote-add");

        let upper = path(&["MyTool", "Sub"]);
        assert_eq!(upper.anchor(), "mytool-sub");
    }

    #[test]
    fn test_path_identity() {
        use std::collections::HashSet;

        let mut visited = HashSet::new();
        assert!(visited.insert(path(&["git", "remote"])));
        assert!(!visited.insert(path(&["git", "remote"])));
        // Exact token-sequence equality: a different prefix is a new path
        assert!(visited.insert(path(&["git", "remote", "remote"])));
    }

    #[test]
    fn test_contains_token() {
        let p = path(&["git", "remote"]);
        assert!(p.contains_token("git"));
        assert!(p.contains_token("remote"));
        assert!(!p.contains_token("add"));
    }

    #[test]
    fn test_record_failed_is_leaf() {
        let record = HelpRecord::failed(path(&["git", "broken"]), NodeError::Timeout);
        assert!(!record.succeeded());
        assert!(record.raw_text.is_empty());
        assert!(record.children.is_empty());
        assert_eq!(record.error, Some(NodeError::Timeout));
    }

    #[test]
    fn test_tree_count_and_lookup() {
        let leaf = |p: CommandPath, depth| CommandTree {
            record: HelpRecord {
                path: p,
                ..HelpRecord::default()
            },
            depth,
            children: vec![],
        };

        let tree = CommandTree {
            record: HelpRecord {
                path: path(&["git"]),
                children: vec!["remote".to_string(), "status".to_string()],
                ..HelpRecord::default()
            },
            depth: 0,
            children: vec![
                CommandTree {
                    record: HelpRecord {
                        path: path(&["git", "remote"]),
                        children: vec!["add".to_string()],
                        ..HelpRecord::default()
                    },
                    depth: 1,
                    children: vec![leaf(path(&["git", "remote", "add"]), 2)],
                },
                leaf(path(&["git", "status"]), 1),
            ],
        };

        assert_eq!(tree.count(), 4);
        assert!(tree.child("remote").is_some());
        assert!(tree.child("add").is_none());
        assert_eq!(
            tree.child("remote").and_then(|r| r.child("add")).map(|n| n.depth),
            Some(2)
        );

        let nodes = tree.nodes();
        let order: Vec<String> = nodes.iter().map(|n| n.record.path.to_string()).collect();
        assert_eq!(
            order,
            vec!["git", "git remote", "git remote add", "git status"]
        );
    }

    #[test]
    fn test_node_error_display() {
        assert_eq!(
            NodeError::Spawn("no such file".to_string()).to_string(),
            "failed to start process: no such file"
        );
        assert_eq!(NodeError::Timeout.to_string(), "help invocation timed out");
        assert_eq!(
            NodeError::EmptyOutput { exit_code: Some(2) }.to_string(),
            "produced no help output (exit code 2)"
        );
        assert_eq!(
            NodeError::EmptyOutput { exit_code: None }.to_string(),
            "produced no help output (exit code unknown)"
        );
    }

    #[test]
    fn test_record_serialization_round_trip() {
        let record = HelpRecord {
            path: path(&["git", "remote"]),
            raw_text: "Usage: git remote\n".to_string(),
            description: "Manage remotes".to_string(),
            usage: "git remote".to_string(),
            children: vec!["add".to_string()],
            error: None,
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: HelpRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
