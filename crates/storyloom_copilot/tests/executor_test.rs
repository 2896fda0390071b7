//! Tests for applying action batches to a document.

use storyloom_copilot::{ActionExecutor, AssetQueue};
use storyloom_core::{AgentAction, AssetType, CursorSelection, DocumentState};

fn append(content: &str) -> AgentAction {
    AgentAction::ScriptAppend {
        content: content.to_string(),
    }
}

fn replace(content: &str) -> AgentAction {
    AgentAction::ScriptReplace {
        content: content.to_string(),
    }
}

fn insert(content: &str) -> AgentAction {
    AgentAction::ScriptInsertAtCursor {
        content: content.to_string(),
    }
}

fn suggest(name: &str, asset_type: AssetType) -> AgentAction {
    AgentAction::AssetCreateSuggestion {
        asset_name: name.to_string(),
        asset_type,
        description: format!("{name} description"),
    }
}

#[test]
fn test_later_replace_wins_over_earlier_append() {
    let mut doc = DocumentState::new("X");
    let result = ActionExecutor::new().apply(&[append("A"), replace("B")], &mut doc);

    assert_eq!(doc.script_text(), "B");
    assert!(result.script_modified);
    assert_eq!(doc.undo_snapshot().as_deref(), Some("X"));
}

#[test]
fn test_insert_at_caret() {
    let mut doc = DocumentState::new("hello world");
    doc.set_cursor(Some(CursorSelection::caret(5)));

    ActionExecutor::new().apply(&[insert(" there")], &mut doc);

    assert_eq!(doc.script_text(), "hello there world");
    assert_eq!(*doc.cursor_selection(), Some(CursorSelection::caret(11)));
}

#[test]
fn test_insert_replaces_selection() {
    let mut doc = DocumentState::new("the red fox");
    doc.set_cursor(Some(CursorSelection::new(4, 7)));

    ActionExecutor::new().apply(&[insert("silver")], &mut doc);

    assert_eq!(doc.script_text(), "the silver fox");
}

#[test]
fn test_consecutive_inserts_follow_the_cursor() {
    let mut doc = DocumentState::new("ab");
    doc.set_cursor(Some(CursorSelection::caret(1)));

    ActionExecutor::new().apply(&[insert("1"), insert("2")], &mut doc);

    assert_eq!(doc.script_text(), "a12b");
}

#[test]
fn test_insert_without_selection_appends() {
    let mut doc = DocumentState::new("FADE IN:");
    ActionExecutor::new().apply(&[insert("INT. BARN - DAY")], &mut doc);
    assert_eq!(doc.script_text(), "FADE IN:\nINT. BARN - DAY");
}

#[test]
fn test_append_separator_policy() {
    let executor = ActionExecutor::new();

    let mut doc = DocumentState::new("");
    executor.apply(&[append("first")], &mut doc);
    assert_eq!(doc.script_text(), "first");

    executor.apply(&[append("second")], &mut doc);
    assert_eq!(doc.script_text(), "first\nsecond");

    let mut doc = DocumentState::new("line\n");
    executor.apply(&[append("next")], &mut doc);
    assert_eq!(doc.script_text(), "line\nnext");

    let mut doc = DocumentState::new("line");
    executor.apply(&[append("\n\nnext")], &mut doc);
    assert_eq!(doc.script_text(), "line\n\nnext");
}

#[test]
fn test_replace_clears_cursor() {
    let mut doc = DocumentState::new("old text");
    doc.set_cursor(Some(CursorSelection::new(0, 3)));

    ActionExecutor::new().apply(&[replace("new")], &mut doc);

    assert_eq!(*doc.cursor_selection(), None);
}

#[test]
fn test_one_suggestion_and_one_unknown() {
    let mut doc = DocumentState::new("");
    let actions = vec![
        suggest("Vera", AssetType::Character),
        AgentAction::Unknown {
            action_type: "PLAY_MUSIC".to_string(),
            reason: "unsupported action type".to_string(),
        },
    ];

    let result = ActionExecutor::new().apply(&actions, &mut doc);

    assert_eq!(result.new_assets_count, 1);
    assert_eq!(doc.discovered_assets().len(), 1);
    assert_eq!(doc.discovered_assets()[0].asset_name, "Vera");
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].index, 1);
    assert_eq!(result.warnings[0].action_type, "PLAY_MUSIC");
    assert!(!result.script_modified);
}

#[test]
fn test_unresolved_queue_assigns_ids() {
    let mut doc = DocumentState::new("");
    let executor = ActionExecutor::with_asset_queue(AssetQueue::Unresolved);

    executor.apply(
        &[
            suggest("Lantern", AssetType::Object),
            suggest("Lantern", AssetType::Object),
        ],
        &mut doc,
    );

    assert!(doc.discovered_assets().is_empty());
    let ids: Vec<u64> = doc.unresolved_assets().iter().map(|a| *a.id()).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids[0] < ids[1]);
}

#[test]
fn test_highlight_never_touches_script() {
    let mut doc = DocumentState::new("The door creaks.");
    let result = ActionExecutor::new().apply(
        &[AgentAction::UiHighlight {
            text_to_highlight: "creaks".to_string(),
        }],
        &mut doc,
    );

    assert_eq!(doc.script_text(), "The door creaks.");
    assert_eq!(result.highlights, vec!["creaks".to_string()]);
    assert!(!result.script_modified);
    assert!(!doc.can_undo());
}

#[test]
fn test_asset_only_batch_keeps_previous_snapshot() {
    let mut doc = DocumentState::new("one");
    let executor = ActionExecutor::new();

    executor.apply(&[replace("two")], &mut doc);
    executor.apply(&[suggest("Fox", AssetType::Character)], &mut doc);

    assert_eq!(doc.undo_snapshot().as_deref(), Some("one"));
    assert!(doc.undo());
    assert_eq!(doc.script_text(), "one");
}

#[test]
fn test_snapshot_taken_once_per_batch() {
    let mut doc = DocumentState::new("start");
    ActionExecutor::new().apply(&[append("a"), append("b"), replace("c")], &mut doc);

    assert_eq!(doc.script_text(), "c");
    assert_eq!(doc.undo_snapshot().as_deref(), Some("start"));
}

#[test]
fn test_empty_batch_is_noop() {
    let mut doc = DocumentState::new("same");
    let result = ActionExecutor::new().apply(&[], &mut doc);
    assert!(result.is_noop());
    assert_eq!(doc.script_text(), "same");
}
