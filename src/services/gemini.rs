// src/services/gemini.rs
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::errors::LeafscanError;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One-shot multimodal completion. Behind a trait so handlers can be
/// exercised against a stub.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Send one request body and return the raw completion text.
    async fn generate(&self, body: Value) -> Result<String, LeafscanError>;
}

pub struct GeminiClient {
    api_key: Option<String>,
    model: String,
    client: Client,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, model: Option<String>) -> Self {
        Self {
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            client: Client::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(
            std::env::var("GEMINI_API_KEY").ok(),
            std::env::var("GEMINI_MODEL").ok(),
        )
    }
}

#[async_trait]
impl VisionModel for GeminiClient {
    async fn generate(&self, body: Value) -> Result<String, LeafscanError> {
        // Fail closed before touching the network.
        let api_key = match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => key,
            _ => {
                return Err(LeafscanError::Configuration(
                    "GEMINI_API_KEY is not set".to_string(),
                ));
            }
        };

        let url = format!("{}/{}:generateContent?key={}", API_BASE, self.model, api_key);

        let response = self
            .client
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| LeafscanError::Upstream {
                status: 0,
                message: format!("Request failed: {}", e),
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| LeafscanError::Upstream {
            status: status.as_u16(),
            message: format!("Failed to read response body: {}", e),
        })?;

        if !status.is_success() {
            return Err(upstream_error(status.as_u16(), &text));
        }

        let envelope: Value = serde_json::from_str(&text).map_err(|e| LeafscanError::Upstream {
            status: status.as_u16(),
            message: format!("Invalid response envelope: {}", e),
        })?;

        debug!("Gemini responded with {} bytes", text.len());
        extract_text(&envelope)
    }
}

/// First textual completion from the Gemini response envelope.
fn extract_text(envelope: &Value) -> Result<String, LeafscanError> {
    envelope["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or(LeafscanError::EmptyResponse)
}

/// Map a non-2xx reply to an UpstreamError, preferring the message inside
/// the Gemini error envelope over the raw body.
fn upstream_error(status: u16, body: &str) -> LeafscanError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(|s| s.to_string()))
        .unwrap_or_else(|| {
            if body.is_empty() {
                format!("HTTP {}", status)
            } else {
                body.to_string()
            }
        });
    LeafscanError::Upstream { status, message }
}
