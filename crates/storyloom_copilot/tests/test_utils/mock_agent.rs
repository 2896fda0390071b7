//! Mock co-pilot agent.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use storyloom_core::{AgentResponse, ConversationMessage};
use storyloom_error::{
    AgentProtocolError, AgentProtocolErrorKind, AgentTransportError, AgentTransportErrorKind,
    StoryloomResult,
};
use storyloom_interface::CopilotAgent;
use tokio::sync::Notify;

/// One scripted agent result.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum MockReply {
    Respond(AgentResponse),
    Transport(AgentTransportErrorKind),
    Protocol(AgentProtocolErrorKind),
}

/// Arguments of one `send_turn` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedTurn {
    pub user_text: String,
    pub script_snapshot: String,
    pub history: Vec<ConversationMessage>,
}

/// Agent returning scripted replies in order. The last one repeats.
///
/// With [`gated`](MockAgent::gated), every call signals `started` on entry
/// and waits for [`release`](MockAgent::release) before replying.
#[derive(Clone)]
pub struct MockAgent {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    turns: Arc<Mutex<Vec<RecordedTurn>>>,
    gate: Option<Arc<Notify>>,
    started: Arc<Notify>,
}

#[allow(dead_code)]
impl MockAgent {
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into())),
            turns: Arc::new(Mutex::new(Vec::new())),
            gate: None,
            started: Arc::new(Notify::new()),
        }
    }

    pub fn responding(response: AgentResponse) -> Self {
        Self::new(vec![MockReply::Respond(response)])
    }

    /// Hold every call until released.
    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Notify::new()));
        self
    }

    /// Let one held call reply.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    /// Wait until a call has entered `send_turn`.
    pub async fn wait_started(&self) {
        self.started.notified().await;
    }

    pub fn call_count(&self) -> usize {
        self.turns.lock().unwrap().len()
    }

    pub fn turns(&self) -> Vec<RecordedTurn> {
        self.turns.lock().unwrap().clone()
    }

    fn next_reply(&self) -> Option<MockReply> {
        let mut replies = self.replies.lock().unwrap();
        if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().cloned()
        }
    }
}

#[async_trait]
impl CopilotAgent for MockAgent {
    async fn send_turn(
        &self,
        user_text: &str,
        script_snapshot: &str,
        history: &[ConversationMessage],
    ) -> StoryloomResult<AgentResponse> {
        self.turns.lock().unwrap().push(RecordedTurn {
            user_text: user_text.to_string(),
            script_snapshot: script_snapshot.to_string(),
            history: history.to_vec(),
        });
        self.started.notify_one();

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        match self.next_reply() {
            Some(MockReply::Respond(response)) => Ok(response),
            Some(MockReply::Transport(kind)) => Err(AgentTransportError::new(kind).into()),
            Some(MockReply::Protocol(kind)) => Err(AgentProtocolError::new(kind).into()),
            None => Ok(AgentResponse::new("", Vec::new())),
        }
    }
}
