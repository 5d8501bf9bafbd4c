// src/infrastructure/http.rs
use crate::domain::link::normalize_base_url;
use crate::domain::ApiError;
use anyhow::{Context, Result};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

const MAX_ERROR_BODY: usize = 200;

/// Base URL plus a configured blocking client for one remote service.
#[derive(Debug, Clone)]
pub struct ServiceEndpoint {
    service: &'static str,
    base_url: String,
    client: Client,
}

impl ServiceEndpoint {
    pub fn new(service: &'static str, base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("tagsmith/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| format!("Failed to build HTTP client for {service}"))?;
        Ok(Self {
            service,
            base_url: normalize_base_url(base_url).to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }

    pub fn patch(&self, path: &str) -> RequestBuilder {
        self.client.patch(self.url(path))
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.client.delete(self.url(path))
    }

    /// Send `request` and return the JSON body of a successful response.
    ///
    /// An empty success body yields `Value::Null`. 401 maps to
    /// `ApiError::Unauthorized`, other non-2xx statuses to `Rejected`.
    #[instrument(level = "debug", skip(self, request), fields(service = self.service))]
    pub fn execute(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let response = request.send().map_err(|e| self.transport_error(&e))?;
        let status = response.status();
        let body = response.text().map_err(|e| self.transport_error(&e))?;
        debug!(%status, bytes = body.len(), "Response received");

        let json = if body.trim().is_empty() {
            Some(Value::Null)
        } else {
            serde_json::from_str::<Value>(&body).ok()
        };

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized(error_message(json.as_ref(), &body, status)));
        }
        if !status.is_success() {
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message: error_message(json.as_ref(), &body, status),
            });
        }
        json.ok_or_else(|| {
            ApiError::InvalidResponse(format!("{} returned a non-JSON body", self.service))
        })
    }

    fn transport_error(&self, error: &reqwest::Error) -> ApiError {
        let reason = if error.is_timeout() {
            "request timed out".to_string()
        } else if error.is_connect() {
            "connection failed, is the server running?".to_string()
        } else {
            error.to_string()
        };
        ApiError::Unreachable {
            service: format!("{} at {}", self.service, self.base_url),
            reason,
        }
    }
}

/// Server-provided `message`/`error` field, else a trimmed body, else the status text.
pub fn error_message(json: Option<&Value>, body: &str, status: StatusCode) -> String {
    if let Some(json) = json {
        for key in ["message", "error", "detail"] {
            if let Some(text) = json.get(key).and_then(Value::as_str) {
                return text.to_string();
            }
        }
    }
    let body = body.trim();
    if !body.is_empty() && json.is_none() {
        return body.chars().take(MAX_ERROR_BODY).collect();
    }
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}
