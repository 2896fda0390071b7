//! What applying a batch of actions did.

use serde::{Deserialize, Serialize};

/// An action entry that was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("action #{} ({}) skipped: {}", index, action_type, reason)]
pub struct ActionWarning {
    /// Position of the entry in the batch
    pub index: usize,
    /// The entry's `type` tag as received
    pub action_type: String,
    /// Why it was skipped
    pub reason: String,
}

/// Summary returned by the action executor.
///
/// The caller uses this to decide on UI focus changes (e.g. switching to the
/// asset panel when `new_assets_count > 0`); the executor itself never
/// navigates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// True when any action changed the script text
    pub script_modified: bool,
    /// Number of asset suggestions queued
    pub new_assets_count: usize,
    /// Passages the co-pilot asked to highlight, in order
    pub highlights: Vec<String>,
    /// Entries skipped as unknown or malformed
    pub warnings: Vec<ActionWarning>,
}

impl ExecutionResult {
    /// True when nothing at all happened.
    pub fn is_noop(&self) -> bool {
        !self.script_modified && self.new_assets_count == 0 && self.highlights.is_empty()
    }
}
