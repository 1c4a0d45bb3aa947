//! The two call policies used against the backend.
//!
//! `must_fetch` is for requests the caller cannot do without: failures are
//! logged and returned. `try_fetch` is for opportunistic reads: failures are
//! logged and turned into `None`.

use crate::api::{Method, Transport};
use crate::error::ApiError;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub async fn must_fetch<T, R>(transport: &T, method: Method, path: &str) -> Result<R, ApiError>
where
    T: Transport,
    R: DeserializeOwned,
{
    let outcome = match transport.request(method, path).await {
        Ok(value) => decode(path, value),
        Err(e) => Err(e),
    };
    if let Err(e) = &outcome {
        log::error!("{} {} failed: {}", method.as_str(), path, e);
    }
    outcome
}

pub async fn try_fetch<T, R>(transport: &T, path: &str) -> Option<R>
where
    T: Transport,
    R: DeserializeOwned,
{
    let value = match transport.get(path).await {
        Ok(value) => value,
        Err(e) => {
            log::warn!("GET {} failed, continuing without it: {}", path, e);
            return None;
        }
    };
    if value.is_null() {
        log::debug!("GET {} returned no content", path);
        return None;
    }
    match decode(path, value) {
        Ok(result) => Some(result),
        Err(e) => {
            log::warn!("Ignoring malformed response: {}", e);
            None
        }
    }
}

fn decode<R: DeserializeOwned>(path: &str, value: Value) -> Result<R, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode {
        path: path.to_string(),
        message: e.to_string(),
    })
}
