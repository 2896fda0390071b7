//! The conversation controller: single-flight turns over a shared session.
//!
//! A turn moves `Idle -> Sending -> {Applied | Failed} -> Idle`. The session
//! lock is held for the synchronous begin and finish steps only; the Agent
//! Client call in between runs unlocked, so the writer can keep editing and
//! moving the cursor while the co-pilot thinks.

use crate::executor::ActionExecutor;
use crate::session::{Session, SessionHandle, TurnState};
use std::sync::Arc;
use storyloom_core::{ConversationMessage, ExecutionResult};
use storyloom_error::{StoryloomErrorKind, StoryloomResult};
use storyloom_interface::CopilotAgent;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

/// Model entry appended when a turn fails for any reason.
pub const FALLBACK_MESSAGE: &str = "Sorry, I encountered an error. Please try again.";

/// Why a submit was refused without any state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum RejectReason {
    /// Input was blank after trimming
    EmptyInput,
    /// Another turn is still awaiting the agent
    TurnInFlight,
    /// The session has been closed
    SessionClosed,
}

/// What became of one submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Refused up front; nothing changed
    Rejected(RejectReason),
    /// The reply was recorded and its actions applied
    Applied(ExecutionResult),
    /// The agent failed; the fallback message was recorded, the document is
    /// untouched
    Failed,
    /// The session closed while the turn was in flight; nothing applied
    Discarded,
}

impl SubmitOutcome {
    /// The execution result, for applied turns.
    pub fn execution(&self) -> Option<&ExecutionResult> {
        match self {
            SubmitOutcome::Applied(result) => Some(result),
            _ => None,
        }
    }
}

/// Drives turns between a [`SessionHandle`] and a [`CopilotAgent`].
///
/// # Example
///
/// ```no_run
/// use storyloom_copilot::{Copilot, ConversationController, Session, SessionHandle};
/// use storyloom_models::GeminiClient;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let session = SessionHandle::new(Session::new(""));
/// let controller = ConversationController::new(Copilot::new(GeminiClient::new()?), session.clone());
///
/// let outcome = controller.submit("Outline a 3-act story about a fox").await;
/// println!("{:?}\n{}", outcome, session.script_text());
/// # Ok(())
/// # }
/// ```
pub struct ConversationController<A: CopilotAgent> {
    agent: Arc<A>,
    session: SessionHandle,
    executor: ActionExecutor,
}

impl<A: CopilotAgent> Clone for ConversationController<A> {
    fn clone(&self) -> Self {
        Self {
            agent: Arc::clone(&self.agent),
            session: self.session.clone(),
            executor: self.executor,
        }
    }
}

impl<A: CopilotAgent> ConversationController<A> {
    /// Controller with a default executor.
    pub fn new(agent: A, session: SessionHandle) -> Self {
        Self {
            agent: Arc::new(agent),
            session,
            executor: ActionExecutor::new(),
        }
    }

    /// Use a specific executor, e.g. one routing to the unresolved queue.
    pub fn with_executor(mut self, executor: ActionExecutor) -> Self {
        self.executor = executor;
        self
    }

    /// The session this controller drives.
    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Run one turn to completion.
    ///
    /// Never fails: agent errors are logged and turned into
    /// [`SubmitOutcome::Failed`].
    #[instrument(name = "copilot_submit", skip_all, fields(session_id = %self.session.id()))]
    pub async fn submit(&self, user_text: &str) -> SubmitOutcome {
        let text = user_text.trim();

        let (history, script_snapshot) = match self.session.update(|session| begin_turn(session, text)) {
            Ok(captured) => captured,
            Err(reason) => {
                debug!(%reason, "Submit rejected");
                return SubmitOutcome::Rejected(reason);
            }
        };

        let mut guard = TurnGuard::new(&self.session);
        let reply = self.agent.send_turn(text, &script_snapshot, &history).await;
        guard.disarm();

        self.session
            .update(|session| finish_turn(session, reply, &self.executor))
    }

    /// Fire-and-forget form of [`submit`](Self::submit).
    pub fn spawn_submit(&self, user_text: impl Into<String>) -> JoinHandle<SubmitOutcome>
    where
        A: 'static,
    {
        let controller = self.clone();
        let user_text = user_text.into();
        tokio::spawn(async move { controller.submit(&user_text).await })
    }
}

/// Validate and move to `Sending`: record the user message and capture the
/// history before it plus the script snapshot.
fn begin_turn(
    session: &mut Session,
    text: &str,
) -> Result<(Vec<ConversationMessage>, String), RejectReason> {
    if !session.active {
        return Err(RejectReason::SessionClosed);
    }
    if text.is_empty() {
        return Err(RejectReason::EmptyInput);
    }
    if session.turn_state == TurnState::Sending {
        return Err(RejectReason::TurnInFlight);
    }

    let history = session.conversation.history().to_vec();
    session.conversation.push(ConversationMessage::user(text));
    session.turn_state = TurnState::Sending;

    debug!(history_len = history.len(), "Turn sending");
    Ok((history, session.document.script_text().clone()))
}

/// Resolve a returned turn and go back to `Idle`.
fn finish_turn(
    session: &mut Session,
    reply: StoryloomResult<storyloom_core::AgentResponse>,
    executor: &ActionExecutor,
) -> SubmitOutcome {
    session.turn_state = TurnState::Idle;

    if !session.active {
        info!("Session closed during turn; reply discarded");
        return SubmitOutcome::Discarded;
    }

    match reply {
        Ok(response) => {
            session
                .conversation
                .push(ConversationMessage::model(response.display_text));
            let result = executor.apply(&response.actions, &mut session.document);
            info!(
                action_count = response.actions.len(),
                script_modified = result.script_modified,
                new_assets = result.new_assets_count,
                "Turn applied"
            );
            SubmitOutcome::Applied(result)
        }
        Err(err) => {
            match err.kind() {
                StoryloomErrorKind::Protocol(protocol) => {
                    error!(error = %protocol, "Co-pilot reply could not be used")
                }
                StoryloomErrorKind::Transport(transport) => warn!(
                    error = %transport,
                    service_unavailable = transport.kind.is_service_unavailable(),
                    "Co-pilot request failed"
                ),
                other => warn!(error = %other, "Co-pilot turn failed"),
            }
            session
                .conversation
                .push(ConversationMessage::model(FALLBACK_MESSAGE));
            SubmitOutcome::Failed
        }
    }
}

/// Returns the session to `Idle` if a turn future is dropped mid-flight.
struct TurnGuard<'a> {
    session: &'a SessionHandle,
    armed: bool,
}

impl<'a> TurnGuard<'a> {
    fn new(session: &'a SessionHandle) -> Self {
        Self {
            session,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.session.update(|session| {
                session.turn_state = TurnState::Idle;
                warn!("Turn abandoned before the agent replied");
            });
        }
    }
}
