//! Mock text driver.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use storyloom_core::{GenerateRequest, GenerateResponse};
use storyloom_error::{
    AgentTransportError, AgentTransportErrorKind, BuilderError, BuilderErrorKind,
    StoryloomResult,
};
use storyloom_interface::TextDriver;

/// One scripted driver result.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum MockResponse {
    /// Reply with this text
    Text(String),
    /// Fail with a transport error
    Transport(AgentTransportErrorKind),
    /// Fail with a non-transport error
    Other(String),
    /// Sleep, then reply with this text
    Delayed(Duration, String),
}

/// Driver returning scripted responses in order. The last one repeats.
#[derive(Clone)]
pub struct MockDriver {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    requests: Arc<Mutex<Vec<GenerateRequest>>>,
}

#[allow(dead_code)]
impl MockDriver {
    pub fn new(responses: Vec<MockResponse>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always reply with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(vec![MockResponse::Text(text.into())])
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next_response(&self) -> MockResponse {
        let mut responses = self.responses.lock().unwrap();
        if responses.len() > 1 {
            responses.pop_front().unwrap()
        } else {
            responses
                .front()
                .cloned()
                .unwrap_or_else(|| MockResponse::Text(String::new()))
        }
    }
}

#[async_trait]
impl TextDriver for MockDriver {
    async fn generate(&self, req: &GenerateRequest) -> StoryloomResult<GenerateResponse> {
        self.requests.lock().unwrap().push(req.clone());
        match self.next_response() {
            MockResponse::Text(text) => Ok(GenerateResponse::new(text)),
            MockResponse::Transport(kind) => Err(AgentTransportError::new(kind).into()),
            MockResponse::Other(reason) => {
                Err(BuilderError::new(BuilderErrorKind::ValidationFailed(reason)).into())
            }
            MockResponse::Delayed(delay, text) => {
                tokio::time::sleep(delay).await;
                Ok(GenerateResponse::new(text))
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}
