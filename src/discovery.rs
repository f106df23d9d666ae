//! Recursive command discovery.
//!
//! Walks an externally-defined command tree whose shape and depth are
//! unknown up front. The traversal is an explicit worklist over an
//! index-addressed node store rather than call-stack recursion, so the
//! depth bound is enforced directly and pathological trees cannot blow the
//! stack. A visited-set and an ancestor-name guard keep self-referential
//! help output from looping; per-node failures are recorded locally and
//! never abort the rest of the walk.

use crate::error::{HelpdocError, Result};
use crate::model::{CommandPath, CommandTree, HelpRecord};
use crate::parser::HelpParser;
use crate::runner::HelpRunner;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Progress callback invoked before each help invocation with the path and
/// its depth. Drives `--verbose` output in the CLI.
pub type ProgressFn = Box<dyn Fn(&CommandPath, usize) + Send + Sync>;

/// Arena node used while the tree is under construction.
#[derive(Debug, Default)]
struct Node {
    record: HelpRecord,
    depth: usize,
    children: Vec<usize>,
}

/// Discovers a command and all its subcommands.
pub struct Discovery<R: HelpRunner> {
    runner: R,
    parser: HelpParser,
    max_depth: usize,
    on_discover: Option<ProgressFn>,
}

impl<R: HelpRunner> Discovery<R> {
    pub fn new(runner: R, max_depth: usize) -> Self {
        Self {
            runner,
            parser: HelpParser::new(),
            max_depth,
            on_discover: None,
        }
    }

    /// Register a progress callback fired once per invoked node.
    pub fn with_progress(
        mut self,
        callback: impl Fn(&CommandPath, usize) + Send + Sync + 'static,
    ) -> Self {
        self.on_discover = Some(Box::new(callback));
        self
    }

    /// Discover the full tree reachable from `root` within the depth bound.
    ///
    /// Only a failed root is fatal; every other failing node becomes a
    /// failed leaf inside the returned tree.
    pub async fn discover(&self, root: CommandPath) -> Result<CommandTree> {
        let mut arena: Vec<Node> = Vec::new();
        let mut visited: HashSet<CommandPath> = HashSet::new();
        // LIFO worklist of (parent arena index, path, depth). Children are
        // pushed in reverse so traversal follows help-listing order.
        let mut work: Vec<(Option<usize>, CommandPath, usize)> =
            vec![(None, root.clone(), 0)];

        while let Some((parent, path, depth)) = work.pop() {
            if !visited.insert(path.clone()) {
                debug!(command = %path, "already visited, skipping");
                continue;
            }

            if let Some(callback) = &self.on_discover {
                callback(&path, depth);
            }
            debug!(command = %path, depth, "discovering");

            let out = self.runner.run_help(&path).await;
            let record = match out.node_error() {
                Some(error) => {
                    warn!(command = %path, %error, "help invocation failed");
                    HelpRecord::failed(path.clone(), error)
                }
                None => {
                    let parsed = self.parser.parse(&out.output);
                    HelpRecord {
                        path: path.clone(),
                        raw_text: out.output,
                        description: parsed.description,
                        usage: parsed.usage,
                        children: parsed.children,
                        error: None,
                    }
                }
            };

            let index = arena.len();
            if let Some(parent) = parent {
                arena[parent].children.push(index);
            }

            if depth < self.max_depth {
                for name in record.children.iter().rev() {
                    // A child naming this command or an ancestor would
                    // recurse forever; such listings are treated as noise.
                    if path.contains_token(name) {
                        debug!(command = %path, child = %name, "self/ancestor reference, skipping");
                        continue;
                    }
                    let child = path.child(name);
                    if visited.contains(&child) {
                        debug!(command = %child, "already visited, skipping");
                        continue;
                    }
                    work.push((Some(index), child, depth + 1));
                }
            } else if !record.children.is_empty() {
                debug!(command = %path, max_depth = self.max_depth, "depth limit reached, emitting as leaf");
            }

            arena.push(Node {
                record,
                depth,
                children: Vec::new(),
            });
        }

        let root_failed = arena
            .first()
            .and_then(|node| node.record.error.clone());
        if let Some(cause) = root_failed {
            return Err(HelpdocError::RootCommand {
                command: root.to_string(),
                cause,
            });
        }

        let tree = assemble(&mut arena, 0);
        info!(
            command = %root,
            total = tree.count(),
            "discovery complete"
        );
        Ok(tree)
    }
}

/// Convert the arena into the nested tree, preserving child order.
/// Recursion here is bounded by the configured depth limit.
fn assemble(arena: &mut Vec<Node>, index: usize) -> CommandTree {
    let child_indices = std::mem::take(&mut arena[index].children);
    let record = std::mem::take(&mut arena[index].record);
    let depth = arena[index].depth;
    let children = child_indices
        .into_iter()
        .map(|child| assemble(arena, child))
        .collect();

    CommandTree {
        record,
        depth,
        children,
    }
}
