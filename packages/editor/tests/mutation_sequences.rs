//! Tests for longer edit sequences
//!
//! This tests:
//! - Move + edit + delete chains
//! - Undo/redo sequences
//! - Stack bound and redo invalidation
//! - Document integrity after operations

use pagecraft_editor::{
    Command, DeleteCommand, EditSession, EditorConfig, EditorError, Mutation, NodeDefinition,
};
use pretty_assertions::assert_eq;

fn session_with(config: &EditorConfig) -> EditSession {
    let root = NodeDefinition::new("div")
        .with_id("root")
        .with_child(
            NodeDefinition::new("div")
                .with_id("child1")
                .with_child(NodeDefinition::new("span").with_id("text1").with_content("Child 1")),
        )
        .with_child(
            NodeDefinition::new("div")
                .with_id("child2")
                .with_child(NodeDefinition::new("span").with_id("text2").with_content("Child 2")),
        );
    EditSession::from_definition("sequences", &root, config).unwrap()
}

fn session() -> EditSession {
    session_with(&EditorConfig::default())
}

#[test]
fn test_move_then_delete_sequence() {
    let mut session = session();

    session.move_node("child2", "child1", 1).unwrap();
    assert_eq!(session.tree().children_of("child1"), ["text1", "child2"]);

    session.delete("child1").unwrap();
    assert_eq!(session.tree().len(), 1);

    session.undo();
    assert_eq!(session.tree().children_of("child1"), ["text1", "child2"]);
    assert_eq!(session.tree().get("text2").unwrap().content(), "Child 2");

    session.undo();
    assert_eq!(session.tree().children_of("root"), ["child1", "child2"]);
    session.canvas().check_integrity().unwrap();
}

#[test]
fn test_undo_redo_chain_returns_to_each_state() {
    let mut session = session();
    let mut states = vec![session.tree().to_json_with_ids("root").unwrap()];

    session.edit_text("text1", "First").unwrap();
    states.push(session.tree().to_json_with_ids("root").unwrap());
    session.move_child("root", 1, 0).unwrap();
    states.push(session.tree().to_json_with_ids("root").unwrap());
    session.duplicate("child1").unwrap();
    states.push(session.tree().to_json_with_ids("root").unwrap());

    for expected in states.iter().rev().skip(1) {
        assert!(session.undo());
        assert_eq!(&session.tree().to_json_with_ids("root").unwrap(), expected);
    }
    assert!(!session.undo());

    for expected in states.iter().skip(1) {
        assert!(session.redo());
        assert_eq!(&session.tree().to_json_with_ids("root").unwrap(), expected);
    }
    assert!(!session.redo());
}

#[test]
fn test_stack_bound() {
    let config = EditorConfig {
        max_undo_levels: 3,
        ..EditorConfig::default()
    };
    let mut session = session_with(&config);

    for i in 0..5 {
        session.edit_text("text1", &format!("v{}", i)).unwrap();
    }
    assert_eq!(session.history().undo_levels(), 3);

    let mut undone = 0;
    while session.undo() {
        undone += 1;
    }
    assert_eq!(undone, 3);
    // The first two edits were evicted, so v1 is as far back as it goes.
    assert_eq!(session.tree().get("text1").unwrap().content(), "v1");
}

#[test]
fn test_redo_invalidation() {
    let mut session = session();
    session.edit_text("text1", "a").unwrap();
    session.undo();
    assert!(session.history().can_redo());

    session.edit_text("text2", "b").unwrap();
    assert!(!session.redo());
    assert_eq!(session.tree().get("text1").unwrap().content(), "Child 1");
}

#[test]
fn test_freed_id_reuse_undoes_cleanly() {
    let mut session = session();
    session.delete("text1").unwrap();

    session
        .add_component(NodeDefinition::new("em").with_id("text1"), "child2", None)
        .unwrap();
    session.undo(); // removes the em
    assert!(session.tree().get("text1").is_none());
    session.undo(); // restores the original text1
    assert_eq!(session.tree().parent_of("text1"), Some("child1"));
    assert_eq!(session.history().replay_failures(), 0);
}

#[test]
fn test_batched_script_is_one_step() {
    let mut session = session();
    let commands: Vec<Box<dyn Command>> = vec![
        Box::new(DeleteCommand::new("child2")),
        Box::new(DeleteCommand::new("missing")),
        Box::new(DeleteCommand::new("child1")),
    ];

    let changes = session.apply_batch("Clear", commands);
    assert_eq!(changes.len(), 2);
    assert!(session.tree().children_of("root").is_empty());

    assert!(session.undo());
    assert_eq!(session.tree().children_of("root"), ["child1", "child2"]);
    assert_eq!(session.history().replay_failures(), 1);
    assert!(!session.undo());
}

#[test]
fn test_script_errors_surface_per_mutation() {
    let mut session = session();
    let script = Mutation::parse_script(
        r#"[
            { "type": "editText", "nodeId": "nope", "content": "x" },
            { "type": "moveNode", "nodeId": "child1", "parentId": "text1", "index": 0 },
            { "type": "moveChild", "parentId": "root", "from": 0, "to": 5 }
        ]"#,
    )
    .unwrap();

    let errors: Vec<EditorError> = script
        .iter()
        .filter_map(|m| m.apply(&mut session).err())
        .collect();

    assert_eq!(errors.len(), 3);
    assert!(matches!(errors[1], EditorError::CyclicDrop { .. }));
    // Only the out-of-range move got far enough to be recorded.
    assert_eq!(session.history().undo_levels(), 1);
    session.canvas().check_integrity().unwrap();
}
