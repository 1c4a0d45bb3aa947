use super::transport::Transport;
use crate::error::ApiError;
use crate::settings::ClientSettings;
use reqwest::RequestBuilder;
use serde_json::Value;
use std::time::Duration;

/// reqwest-backed [`Transport`]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpTransport {
    pub fn new(settings: &ClientSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_seconds))
            .user_agent(settings.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            auth_token: settings.auth_token.clone(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    async fn send(&self, path: &str, request: RequestBuilder) -> Result<Value, ApiError> {
        let request = match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::debug!("Backend returned {} for {}: {}", status, path, body);
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        let url = self.url(path);
        log::debug!("GET {}", url);
        self.send(path, self.client.get(url)).await
    }

    async fn post(&self, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        let url = self.url(path);
        log::debug!("POST {}", url);
        let request = self.client.post(url);
        let request = match body {
            Some(body) => request.json(&body),
            None => request,
        };
        self.send(path, request).await
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
