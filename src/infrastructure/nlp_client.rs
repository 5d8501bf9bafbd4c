// src/infrastructure/nlp_client.rs
use crate::application::TagGenerator;
use crate::domain::ApiError;
use crate::infrastructure::http::ServiceEndpoint;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

#[derive(Debug, Serialize)]
struct TagRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct TagResponse {
    #[serde(default)]
    pub tags: Vec<String>,
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// Client for the NLP tag-generation service.
#[derive(Debug, Clone)]
pub struct NlpClient {
    endpoint: ServiceEndpoint,
}

impl NlpClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            endpoint: ServiceEndpoint::new("tag generation service", base_url, timeout_secs)?,
        })
    }

    pub fn base_url(&self) -> &str {
        self.endpoint.base_url()
    }

    pub fn health(&self) -> Result<String, ApiError> {
        let body = self.endpoint.execute(self.endpoint.get("/health"))?;
        Ok(health_status(&body))
    }
}

impl TagGenerator for NlpClient {
    #[instrument(level = "debug", skip(self, text), fields(chars = text.len()))]
    fn generate(&self, text: &str) -> Result<Vec<String>, ApiError> {
        let request = self
            .endpoint
            .post("/api/generate-tags")
            .json(&TagRequest { text });
        let body = self.endpoint.execute(request)?;
        parse_tag_response(body)
    }
}

pub fn parse_tag_response(body: Value) -> Result<Vec<String>, ApiError> {
    let response: TagResponse = serde_json::from_value(body)
        .map_err(|e| ApiError::InvalidResponse(format!("tag response: {e}")))?;
    if !response.success {
        let message = if response.message.is_empty() {
            "Failed to generate tags".to_string()
        } else {
            response.message
        };
        return Err(ApiError::Generation(message));
    }
    Ok(response.tags)
}

/// `status` field of a health document, `"ok"` when absent.
pub fn health_status(body: &Value) -> String {
    body.get("status")
        .and_then(Value::as_str)
        .unwrap_or("ok")
        .to_string()
}
