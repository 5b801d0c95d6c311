//! In-memory transport for tests
//!
//! Records every request it receives and answers from a queue of canned
//! responses. An empty queue answers with a transport failure, so an
//! unexpected call shows up as `HTTP_ERROR` rather than a hang.

use std::collections::VecDeque;
use std::sync::Mutex;

use super::http::{ApiRequest, RawResponse, Transport};
use crate::errors::{ApiError, ApiResult};

#[derive(Debug)]
enum Reply {
    Response(RawResponse),
    Failure(String),
}

/// Transport that never touches the network
#[derive(Debug, Default)]
pub struct StubTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response with the given status and body
    pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
        self.push(Reply::Response(RawResponse::new(status, body)));
        self
    }

    /// Queues a `200` response whose body is `value`
    pub fn respond_json(self, value: serde_json::Value) -> Self {
        self.respond(200, value.to_string())
    }

    /// Queues a network-level failure
    pub fn fail_with(self, message: impl Into<String>) -> Self {
        self.push(Reply::Failure(message.into()));
        self
    }

    /// Requests received so far, in order
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }

    fn push(&self, reply: Reply) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }
}

impl Transport for StubTransport {
    async fn send(&self, request: ApiRequest) -> ApiResult<RawResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        let reply = self
            .replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front());

        match reply {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::Failure(message)) => Err(ApiError::Transport(message)),
            None => Err(ApiError::Transport("no stubbed response queued".to_string())),
        }
    }
}
