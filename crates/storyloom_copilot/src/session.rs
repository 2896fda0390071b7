//! The explicitly owned per-editing-session state.

use std::sync::{Arc, Mutex, MutexGuard};
use storyloom_core::{
    AssetSuggestion, Conversation, ConversationMessage, CursorSelection, DocumentState,
    UnresolvedAsset,
};
use tracing::debug;
use uuid::Uuid;

/// Where the single in-flight turn is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::Display)]
pub enum TurnState {
    /// Ready to accept a submit
    #[default]
    Idle,
    /// A turn is awaiting the Agent Client
    Sending,
}

/// Document, conversation and turn state for one editing session.
///
/// Sessions are created by the caller and shared through a
/// [`SessionHandle`]; there is no process-wide instance.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    pub(crate) document: DocumentState,
    pub(crate) conversation: Conversation,
    pub(crate) turn_state: TurnState,
    pub(crate) active: bool,
}

impl Session {
    /// Session over an initial script with an empty conversation.
    pub fn new(script_text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            document: DocumentState::new(script_text),
            conversation: Conversation::new(),
            turn_state: TurnState::Idle,
            active: true,
        }
    }

    /// Session whose conversation opens with a welcome message.
    ///
    /// The welcome is displayed but never sent to the model as history.
    pub fn with_welcome(script_text: impl Into<String>, welcome: impl Into<String>) -> Self {
        Self {
            conversation: Conversation::with_welcome(welcome),
            ..Self::new(script_text)
        }
    }

    /// Session identifier, used in logs.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The document.
    pub fn document(&self) -> &DocumentState {
        &self.document
    }

    /// The conversation.
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Current turn state.
    pub fn turn_state(&self) -> TurnState {
        self.turn_state
    }

    /// False once the session has been closed.
    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Shared, cloneable access to a [`Session`].
///
/// Every method takes the lock for the duration of one synchronous step.
/// Nothing holds it across an await.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<Session>>,
}

impl SessionHandle {
    /// Wrap a session.
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run `f` with shared access.
    pub fn read<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        f(&self.lock())
    }

    /// Run `f` with exclusive access.
    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        f(&mut self.lock())
    }

    /// Session identifier.
    pub fn id(&self) -> Uuid {
        self.read(Session::id)
    }

    /// Copy of the current script.
    pub fn script_text(&self) -> String {
        self.read(|session| session.document.script_text().clone())
    }

    /// Copy of the whole document.
    pub fn document(&self) -> DocumentState {
        self.read(|session| session.document.clone())
    }

    /// Copy of every conversation entry, welcome included.
    pub fn messages(&self) -> Vec<ConversationMessage> {
        self.read(|session| session.conversation.messages().to_vec())
    }

    /// Current turn state.
    pub fn turn_state(&self) -> TurnState {
        self.read(Session::turn_state)
    }

    /// False once [`close`](Self::close) has been called.
    pub fn is_active(&self) -> bool {
        self.read(Session::is_active)
    }

    /// Writer edit: replace the script. Does not touch the undo snapshot.
    pub fn set_script(&self, script_text: impl Into<String>) {
        let script_text = script_text.into();
        self.update(|session| session.document.set_script(script_text));
    }

    /// Set or clear the writer's selection. The value present when a turn is
    /// applied is the one used.
    pub fn set_cursor(&self, selection: Option<CursorSelection>) {
        self.update(|session| session.document.set_cursor(selection));
    }

    /// Restore the snapshot taken before the last mutating turn.
    ///
    /// Returns false when there is nothing to undo.
    pub fn undo(&self) -> bool {
        self.update(|session| {
            let restored = session.document.undo();
            debug!(session_id = %session.id, restored, "Undo");
            restored
        })
    }

    /// Mark the session closed. A turn still in flight is discarded when it
    /// returns.
    pub fn close(&self) {
        self.update(|session| {
            session.active = false;
            debug!(session_id = %session.id, "Session closed");
        });
    }

    /// Remove the first discovered suggestion named `asset_name`, once the
    /// asset manager has handled it.
    pub fn resolve_asset(&self, asset_name: &str) -> Option<AssetSuggestion> {
        self.update(|session| session.document.resolve_discovered(asset_name))
    }

    /// Remove an unresolved suggestion by id.
    pub fn resolve_unresolved(&self, id: u64) -> Option<UnresolvedAsset> {
        self.update(|session| session.document.resolve_unresolved(id))
    }
}

impl From<Session> for SessionHandle {
    fn from(session: Session) -> Self {
        Self::new(session)
    }
}
