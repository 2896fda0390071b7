//! Applying co-pilot actions to the document.
//!
//! The executor is synchronous and infallible: it runs once per resumed
//! turn, while the session lock is held, and anything it cannot interpret is
//! skipped with a warning rather than aborting the batch.

use serde::{Deserialize, Serialize};
use storyloom_core::{
    ActionWarning, AgentAction, AssetSuggestion, DocumentState, ExecutionResult,
};
use tracing::{debug, warn};

/// Which document queue receives asset suggestions.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AssetQueue {
    /// Plain discovered list
    #[default]
    Discovered,
    /// Id-tagged unresolved list, for an asset manager that resolves entries
    Unresolved,
}

/// Interprets an ordered action batch against a [`DocumentState`].
///
/// # Semantics
///
/// - The undo snapshot is taken once, immediately before the first
///   script-mutating action of the batch. A batch with no script mutation
///   leaves the previous snapshot alone.
/// - Actions apply strictly in order, so a later replace wins over an
///   earlier append.
/// - Appends are newline-separated: one `\n` is inserted when the script is
///   non-empty, does not already end in a newline, and the content does not
///   start with one.
/// - Insert-at-cursor splices over the current selection and collapses the
///   cursor to the end of the inserted text. With no selection it appends.
/// - A replace clears the cursor selection, whose offsets no longer refer to
///   anything.
///
/// # Examples
///
/// ```
/// use storyloom_copilot::ActionExecutor;
/// use storyloom_core::{AgentAction, DocumentState};
///
/// let mut doc = DocumentState::new("X");
/// let result = ActionExecutor::new().apply(
///     &[
///         AgentAction::ScriptAppend { content: "A".to_string() },
///         AgentAction::ScriptReplace { content: "B".to_string() },
///     ],
///     &mut doc,
/// );
///
/// assert_eq!(doc.script_text(), "B");
/// assert!(result.script_modified);
/// assert_eq!(doc.undo_snapshot().as_deref(), Some("X"));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionExecutor {
    asset_queue: AssetQueue,
}

impl ActionExecutor {
    /// Executor routing suggestions to the discovered list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Executor routing suggestions to `asset_queue`.
    pub fn with_asset_queue(asset_queue: AssetQueue) -> Self {
        Self { asset_queue }
    }

    /// Where suggestions go.
    pub fn asset_queue(&self) -> AssetQueue {
        self.asset_queue
    }

    /// Apply `actions` to `doc` in order.
    #[tracing::instrument(skip_all, fields(action_count = actions.len()))]
    pub fn apply(&self, actions: &[AgentAction], doc: &mut DocumentState) -> ExecutionResult {
        let mut result = ExecutionResult::default();
        let mut snapshot_taken = false;

        for (index, action) in actions.iter().enumerate() {
            if action.mutates_script() && !snapshot_taken {
                doc.snapshot();
                snapshot_taken = true;
            }

            match action {
                AgentAction::ScriptAppend { content } => {
                    append_separated(doc, content);
                    result.script_modified = true;
                }
                AgentAction::ScriptReplace { content } => {
                    doc.replace_script(content.clone());
                    doc.set_cursor(None);
                    result.script_modified = true;
                }
                AgentAction::ScriptInsertAtCursor { content } => {
                    match *doc.cursor_selection() {
                        Some(selection) => doc.splice(selection, content),
                        None => append_separated(doc, content),
                    }
                    result.script_modified = true;
                }
                AgentAction::AssetCreateSuggestion {
                    asset_name,
                    asset_type,
                    description,
                } => {
                    let suggestion = AssetSuggestion {
                        asset_name: asset_name.clone(),
                        asset_type: *asset_type,
                        description: description.clone(),
                    };
                    match self.asset_queue {
                        AssetQueue::Discovered => doc.push_discovered(suggestion),
                        AssetQueue::Unresolved => {
                            doc.push_unresolved(suggestion);
                        }
                    }
                    result.new_assets_count += 1;
                }
                AgentAction::UiHighlight { text_to_highlight } => {
                    result.highlights.push(text_to_highlight.clone());
                }
                AgentAction::Unknown {
                    action_type,
                    reason,
                } => {
                    warn!(index, action_type = %action_type, reason = %reason, "Skipping unknown action");
                    result.warnings.push(ActionWarning {
                        index,
                        action_type: action_type.clone(),
                        reason: reason.clone(),
                    });
                }
            }
        }

        debug!(
            script_modified = result.script_modified,
            new_assets = result.new_assets_count,
            highlights = result.highlights.len(),
            warnings = result.warnings.len(),
            "Applied action batch"
        );

        result
    }
}

fn append_separated(doc: &mut DocumentState, content: &str) {
    let script = doc.script_text();
    if !script.is_empty() && !script.ends_with('\n') && !content.starts_with('\n') {
        doc.push_script("\n");
    }
    doc.push_script(content);
}
