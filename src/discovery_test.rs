//! Discovery behavior tests over a scripted runner: traversal order, cycle
//! and depth guards, failure isolation, and idempotence.

use crate::model::{CommandPath, NodeError};
use crate::runner::RunOutput;
use crate::testing::MockHelpRunner;
use crate::{Discovery, HelpdocError};
use std::sync::Arc;

fn help_with_children(children: &[&str]) -> String {
    let mut text = String::from("Usage: tool <COMMAND>\n\nA scripted tool\n\nCommands:\n");
    for child in children {
        text.push_str(&format!("  {:<10} Scripted subcommand\n", child));
    }
    text
}

fn git_like_runner() -> MockHelpRunner {
    let runner = MockHelpRunner::new();
    runner.respond(&["git"], &help_with_children(&["remote", "status"]));
    runner.respond(&["git", "remote"], &help_with_children(&["add", "rm"]));
    runner.respond(&["git", "remote", "add"], "Usage: git remote add <name> <url>\n");
    runner.respond(&["git", "remote", "rm"], "Usage: git remote rm <name>\n");
    runner.respond(&["git", "status"], "Usage: git status\n\nShow the working tree status\n");
    runner
}

#[tokio::test]
async fn discovers_full_tree_in_listing_order() {
    let runner = Arc::new(git_like_runner());
    let discovery = Discovery::new(runner.clone(), 5);
    let tree = discovery.discover(CommandPath::root("git")).await.unwrap();

    assert_eq!(tree.count(), 5);
    let order: Vec<String> = tree
        .nodes()
        .iter()
        .map(|n| n.record.path.to_string())
        .collect();
    assert_eq!(
        order,
        vec![
            "git",
            "git remote",
            "git remote add",
            "git remote rm",
            "git status",
        ]
    );

    let status = tree.child("status").unwrap();
    assert_eq!(status.record.description, "Show the working tree status");
    assert!(status.children.is_empty());
}

#[tokio::test]
async fn each_path_is_invoked_at_most_once() {
    let runner = Arc::new(git_like_runner());
    let discovery = Discovery::new(runner.clone(), 5);
    discovery.discover(CommandPath::root("git")).await.unwrap();

    for parts in [
        vec!["git"],
        vec!["git", "remote"],
        vec!["git", "remote", "add"],
        vec!["git", "remote", "rm"],
        vec!["git", "status"],
    ] {
        assert_eq!(runner.calls_for(&parts), 1, "path {:?}", parts);
    }
    assert_eq!(runner.total_calls(), 5);
}

#[tokio::test]
async fn discovery_is_idempotent() {
    let runner = Arc::new(git_like_runner());
    let discovery = Discovery::new(runner, 5);

    let first = discovery.discover(CommandPath::root("git")).await.unwrap();
    let second = discovery.discover(CommandPath::root("git")).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn self_reference_is_skipped() {
    let runner = Arc::new(MockHelpRunner::new());
    runner.respond(&["selfish"], &help_with_children(&["selfish"]));

    let discovery = Discovery::new(runner.clone(), 5);
    let tree = discovery
        .discover(CommandPath::root("selfish"))
        .await
        .unwrap();

    assert_eq!(tree.count(), 1);
    assert!(tree.children.is_empty());
    // The listing itself is preserved on the record
    assert_eq!(tree.record.children, vec!["selfish"]);
    assert_eq!(runner.total_calls(), 1);
}

#[tokio::test]
async fn ancestor_reference_is_skipped() {
    let runner = Arc::new(MockHelpRunner::new());
    runner.respond(&["a"], &help_with_children(&["b"]));
    runner.respond(&["a", "b"], &help_with_children(&["a"]));

    let discovery = Discovery::new(runner.clone(), 10);
    let tree = discovery.discover(CommandPath::root("a")).await.unwrap();

    assert_eq!(tree.count(), 2);
    assert_eq!(runner.total_calls(), 2);
}

#[tokio::test]
async fn depth_bound_truncates_infinite_fan_out() {
    // Every node reports one child, ad infinitum.
    let runner = Arc::new(MockHelpRunner::new().with_fallback(|path| {
        let next = format!("n{}", path.tokens().len());
        RunOutput {
            output: help_with_children(&[&next]),
            exit_code: Some(0),
            ..RunOutput::default()
        }
    }));

    let discovery = Discovery::new(runner.clone(), 3);
    let tree = discovery.discover(CommandPath::root("inf")).await.unwrap();

    let max_depth = tree.nodes().iter().map(|n| n.depth).max().unwrap();
    assert_eq!(max_depth, 3);
    assert_eq!(tree.count(), 4);
    assert_eq!(runner.total_calls(), 4);

    // The boundary node is a truncated leaf: its help listed a child, but
    // none was descended into.
    let boundary = tree.nodes().into_iter().find(|n| n.depth == 3).unwrap();
    assert!(boundary.children.is_empty());
    assert!(!boundary.record.children.is_empty());
}

#[tokio::test]
async fn sibling_failure_is_isolated() {
    let runner = Arc::new(MockHelpRunner::new());
    runner.respond(&["tool"], &help_with_children(&["b", "c"]));
    runner.time_out(&["tool", "b"]);
    runner.respond(&["tool", "c"], &help_with_children(&["d"]));
    runner.respond(&["tool", "c", "d"], "Usage: tool c d\n");

    let discovery = Discovery::new(runner, 5);
    let tree = discovery.discover(CommandPath::root("tool")).await.unwrap();

    let b = tree.child("b").unwrap();
    assert_eq!(b.record.error, Some(NodeError::Timeout));
    assert!(b.children.is_empty());
    assert!(b.record.raw_text.is_empty());

    // The failed sibling did not stop c's subtree from being populated
    let c = tree.child("c").unwrap();
    assert!(c.record.succeeded());
    assert!(c.child("d").is_some());
    assert_eq!(tree.count(), 4);
}

#[tokio::test]
async fn failed_subcommand_spawn_is_a_failed_leaf() {
    let runner = Arc::new(MockHelpRunner::new());
    runner.respond(&["tool"], &help_with_children(&["gone"]));
    runner.fail_spawn(&["tool", "gone"], "no such file or directory");

    let discovery = Discovery::new(runner, 5);
    let tree = discovery.discover(CommandPath::root("tool")).await.unwrap();

    let gone = tree.child("gone").unwrap();
    assert_eq!(
        gone.record.error,
        Some(NodeError::Spawn("no such file or directory".to_string()))
    );
}

#[tokio::test]
async fn root_spawn_failure_is_fatal() {
    let runner = MockHelpRunner::new();
    runner.fail_spawn(&["missing"], "no such file or directory");

    let discovery = Discovery::new(runner, 5);
    let err = discovery
        .discover(CommandPath::root("missing"))
        .await
        .unwrap_err();

    match err {
        HelpdocError::RootCommand { command, cause } => {
            assert_eq!(command, "missing");
            assert!(matches!(cause, NodeError::Spawn(_)));
        }
        other => panic!("expected RootCommand error, got {:?}", other),
    }
}

#[tokio::test]
async fn root_empty_output_is_fatal() {
    // Unscripted root: ran, exit 1, nothing printed.
    let discovery = Discovery::new(MockHelpRunner::new(), 5);
    let err = discovery
        .discover(CommandPath::root("silent"))
        .await
        .unwrap_err();

    match err {
        HelpdocError::RootCommand { cause, .. } => {
            assert_eq!(cause, NodeError::EmptyOutput { exit_code: Some(1) });
        }
        other => panic!("expected RootCommand error, got {:?}", other),
    }
}

#[tokio::test]
async fn progress_callback_reports_paths_and_depths() {
    use std::sync::Mutex;

    let seen: Arc<Mutex<Vec<(String, usize)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();

    let discovery = Discovery::new(git_like_runner(), 5)
        .with_progress(move |path, depth| {
            sink.lock().unwrap().push((path.to_string(), depth));
        });
    discovery.discover(CommandPath::root("git")).await.unwrap();

    let events = seen.lock().unwrap();
    assert_eq!(events[0], ("git".to_string(), 0));
    assert!(events.contains(&("git remote add".to_string(), 2)));
    assert_eq!(events.len(), 5);
}

#[tokio::test]
async fn unparseable_help_yields_leaf_with_empty_metadata() {
    let runner = MockHelpRunner::new();
    runner.respond(&["odd"], "no recognizable structure whatsoever");

    let discovery = Discovery::new(runner, 5);
    let tree = discovery.discover(CommandPath::root("odd")).await.unwrap();

    assert!(tree.record.succeeded());
    assert!(tree.record.children.is_empty());
    assert!(tree.children.is_empty());
}
