//! The live script buffer and everything the co-pilot hangs off it.

use crate::AssetType;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Selection in the script, in character (not byte) offsets.
///
/// The constructor orders the bounds so `start <= end`. Offsets beyond the
/// end of the script are clamped when the selection is used.
///
/// # Examples
///
/// ```
/// use storyloom_core::CursorSelection;
///
/// let selection = CursorSelection::new(9, 4);
/// assert_eq!(selection.start(), 4);
/// assert_eq!(selection.end(), 9);
/// assert!(!selection.is_collapsed());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CursorSelection {
    start: usize,
    end: usize,
}

impl CursorSelection {
    /// Create a selection, swapping the bounds if given in reverse.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    /// A caret with no selected text.
    pub fn caret(at: usize) -> Self {
        Self { start: at, end: at }
    }

    /// First selected character.
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last selected character.
    pub fn end(&self) -> usize {
        self.end
    }

    /// True when nothing is selected.
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// An asset the co-pilot mentioned that has no saved record yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetSuggestion {
    /// Display name
    pub asset_name: String,
    /// Category
    pub asset_type: AssetType,
    /// Short description from the co-pilot
    pub description: String,
}

/// A suggestion queued for the asset manager to resolve.
///
/// The id is assigned by the document and is the only stable identity, since
/// suggestions are not deduplicated by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct UnresolvedAsset {
    id: u64,
    suggestion: AssetSuggestion,
}

/// The editing session's document.
///
/// # Examples
///
/// ```
/// use storyloom_core::DocumentState;
///
/// let mut doc = DocumentState::new("INT. KITCHEN - NIGHT");
/// doc.snapshot();
/// doc.replace_script("EXT. ROOFTOP - DAY");
///
/// assert!(doc.undo());
/// assert_eq!(doc.script_text(), "INT. KITCHEN - NIGHT");
/// assert!(!doc.undo());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct DocumentState {
    script_text: String,
    undo_snapshot: Option<String>,
    cursor_selection: Option<CursorSelection>,
    discovered_assets: Vec<AssetSuggestion>,
    unresolved_assets: Vec<UnresolvedAsset>,
    #[getter(skip)]
    next_asset_id: u64,
}

impl DocumentState {
    /// Create a document holding `script_text`.
    pub fn new(script_text: impl Into<String>) -> Self {
        Self {
            script_text: script_text.into(),
            ..Self::default()
        }
    }

    /// Save the current script as the single undo level, replacing any
    /// older snapshot.
    pub fn snapshot(&mut self) {
        self.undo_snapshot = Some(self.script_text.clone());
    }

    /// Restore the snapshot and clear it.
    ///
    /// Returns `false` (and changes nothing) when there is no snapshot.
    pub fn undo(&mut self) -> bool {
        match self.undo_snapshot.take() {
            Some(previous) => {
                self.script_text = previous;
                self.cursor_selection = None;
                true
            }
            None => false,
        }
    }

    /// Whether [`undo`](Self::undo) would do anything.
    pub fn can_undo(&self) -> bool {
        self.undo_snapshot.is_some()
    }

    /// Writer edit from the editor. Does not touch the undo snapshot.
    pub fn set_script(&mut self, script_text: impl Into<String>) {
        self.script_text = script_text.into();
    }

    /// Set or clear the cursor selection supplied by the editor.
    pub fn set_cursor(&mut self, selection: Option<CursorSelection>) {
        self.cursor_selection = selection;
    }

    /// Append `content` verbatim to the end of the script.
    pub fn push_script(&mut self, content: &str) {
        self.script_text.push_str(content);
    }

    /// Replace the whole script.
    pub fn replace_script(&mut self, content: impl Into<String>) {
        self.script_text = content.into();
    }

    /// Splice `content` over `selection` and collapse the cursor to the end
    /// of the inserted text.
    pub fn splice(&mut self, selection: CursorSelection, content: &str) {
        let char_len = self.script_text.chars().count();
        let start = selection.start().min(char_len);
        let end = selection.end().min(char_len);

        let start_byte = byte_offset(&self.script_text, start);
        let end_byte = byte_offset(&self.script_text, end);
        self.script_text.replace_range(start_byte..end_byte, content);

        let caret = start + content.chars().count();
        self.cursor_selection = Some(CursorSelection::caret(caret));
    }

    /// Queue a suggestion on the discovered list.
    pub fn push_discovered(&mut self, suggestion: AssetSuggestion) {
        self.discovered_assets.push(suggestion);
    }

    /// Queue a suggestion on the unresolved list and return its id.
    pub fn push_unresolved(&mut self, suggestion: AssetSuggestion) -> u64 {
        let id = self.next_asset_id;
        self.next_asset_id += 1;
        self.unresolved_assets.push(UnresolvedAsset { id, suggestion });
        id
    }

    /// Remove the first discovered suggestion named `asset_name`.
    ///
    /// Called by the asset manager once it has created (or dismissed) the
    /// asset. Name comparison ignores ASCII case.
    pub fn resolve_discovered(&mut self, asset_name: &str) -> Option<AssetSuggestion> {
        let index = self
            .discovered_assets
            .iter()
            .position(|a| a.asset_name.eq_ignore_ascii_case(asset_name))?;
        Some(self.discovered_assets.remove(index))
    }

    /// Remove the unresolved entry with `id`.
    pub fn resolve_unresolved(&mut self, id: u64) -> Option<UnresolvedAsset> {
        let index = self.unresolved_assets.iter().position(|a| a.id == id)?;
        Some(self.unresolved_assets.remove(index))
    }
}

fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}
