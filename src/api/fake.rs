use super::transport::{Method, Transport};
use crate::error::ApiError;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// In-memory transport with canned replies. Unknown paths answer 404.
#[derive(Default)]
pub(crate) struct FakeTransport {
    replies: Mutex<HashMap<(Method, String), Result<Value, String>>>,
    calls: Mutex<Vec<(Method, String)>>,
    gate: Option<Arc<Notify>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request waits on `gate` before replying.
    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn reply(self, method: Method, path: &str, body: Value) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert((method, path.to_string()), Ok(body));
        self
    }

    pub fn fail(self, method: Method, path: &str, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert((method, path.to_string()), Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<(Method, String)> {
        self.calls.lock().unwrap().clone()
    }

    async fn respond(&self, method: Method, path: &str) -> Result<Value, ApiError> {
        self.calls.lock().unwrap().push((method, path.to_string()));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get(&(method, path.to_string()))
            .cloned();
        match reply {
            Some(Ok(body)) => Ok(body),
            Some(Err(message)) => Err(ApiError::Connection(message)),
            None => Err(ApiError::Status {
                status: 404,
                body: "not found".to_string(),
            }),
        }
    }
}

impl Transport for FakeTransport {
    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.respond(Method::Get, path).await
    }

    async fn post(&self, path: &str, _body: Option<Value>) -> Result<Value, ApiError> {
        self.respond(Method::Post, path).await
    }
}
