use crate::error::ApiError;
use serde_json::Value;
use std::future::Future;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// JSON-over-HTTP access to the meeting backend.
///
/// Implementations return the parsed response body, or an error on a
/// non-2xx status or network failure. Paths are relative to the backend's
/// API root and start with `/`.
pub trait Transport: Send + Sync {
    fn get(&self, path: &str) -> impl Future<Output = Result<Value, ApiError>> + Send;

    fn post(
        &self,
        path: &str,
        body: Option<Value>,
    ) -> impl Future<Output = Result<Value, ApiError>> + Send;

    fn request(
        &self,
        method: Method,
        path: &str,
    ) -> impl Future<Output = Result<Value, ApiError>> + Send {
        async move {
            match method {
                Method::Get => self.get(path).await,
                Method::Post => self.post(path, None).await,
            }
        }
    }
}
