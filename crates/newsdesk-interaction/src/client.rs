//! Shared JSON-over-HTTP client.

use newsdesk_core::ApiError;
use newsdesk_core::config::ClientConfig;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Thin wrapper around [`reqwest::Client`] bound to one API base URL.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            timeout,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            config.api_base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POSTs `body` as JSON and decodes a JSON response.
    pub async fn post_json<B, R>(
        &self,
        path: &str,
        body: &B,
        bearer: Option<&str>,
    ) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = self.client.post(self.url(path)).json(body);
        self.send_request(path, request, bearer).await
    }

    /// POSTs without a body and decodes a JSON response.
    pub async fn post_empty<R>(&self, path: &str, bearer: Option<&str>) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        let request = self.client.post(self.url(path));
        self.send_request(path, request, bearer).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send_request<R>(
        &self,
        path: &str,
        request: RequestBuilder,
        bearer: Option<&str>,
    ) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        let request = match bearer {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        tracing::debug!("[ApiClient] POST {}", path);
        let response = request
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|err| {
                tracing::debug!("[ApiClient] POST {} failed: {}", path, err);
                ApiError::transport(err.to_string())
            })?;

        let status = response.status();
        tracing::debug!("[ApiClient] POST {} -> {}", path, status);

        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, &body_text));
        }

        response
            .json::<R>()
            .await
            .map_err(|err| ApiError::decode(err.to_string()))
    }
}

/// FastAPI error body: `detail` is a string for raised errors and a list of
/// `{loc, msg, type}` entries for request validation failures.
#[derive(Deserialize)]
struct ErrorBody {
    detail: Value,
}

fn map_http_error(status: StatusCode, body: &str) -> ApiError {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|error| detail_text(&error.detail));

    ApiError::Status {
        status: status.as_u16(),
        detail,
    }
}

fn detail_text(detail: &Value) -> Option<String> {
    match detail {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Array(entries) => {
            let messages: Vec<&str> = entries
                .iter()
                .filter_map(|entry| entry.get("msg").and_then(Value::as_str))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}
