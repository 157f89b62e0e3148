use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::Value;
use thiserror::Error;

use crate::settings::AppSettings;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Gemini API request failed: {0}")]
    Request(reqwest::Error),
    #[error("Gemini API error {status}: {body}")]
    Status { status: u16, body: String },
    #[error("No text in Gemini response")]
    EmptyResponse,
}

impl From<reqwest::Error> for GeminiError {
    // Request URLs never reach logs or fallback reasons
    fn from(err: reqwest::Error) -> Self {
        GeminiError::Request(err.without_url())
    }
}

/// A file handed to the model next to the prompt
#[derive(Debug, Clone)]
pub struct Attachment {
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Gemini `generateContent` client.
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    max_output_tokens: u32,
}

impl GeminiClient {
    /// Build a client from settings, or `None` when no usable key is configured
    pub fn from_settings(settings: &AppSettings) -> Result<Option<Self>, GeminiError> {
        let Some(api_key) = settings.gemini_key() else {
            return Ok(None);
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        Ok(Some(Self {
            http,
            api_key: api_key.to_string(),
            model: settings.gemini_model.clone(),
            base_url: settings.gemini_api_base.trim_end_matches('/').to_string(),
            temperature: 0.1,
            max_output_tokens: 4096,
        }))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one prompt (plus an optional inline file) and return the reply text
    pub async fn generate(
        &self,
        prompt: &str,
        attachment: Option<&Attachment>,
    ) -> Result<String, GeminiError> {
        let mut parts = vec![serde_json::json!({ "text": prompt })];
        if let Some(file) = attachment {
            parts.push(serde_json::json!({
                "inline_data": {
                    "mime_type": file.mime_type,
                    "data": BASE64.encode(&file.data)
                }
            }));
        }

        let body = serde_json::json!({
            "contents": [{ "parts": parts }],
            "generationConfig": {
                "temperature": self.temperature,
                "maxOutputTokens": self.max_output_tokens
            }
        });

        let response = self
            .http
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::Status { status, body });
        }

        let reply: Value = response.json().await?;
        reply_text(&reply)
            .map(str::to_string)
            .ok_or(GeminiError::EmptyResponse)
    }
}

fn reply_text(reply: &Value) -> Option<&str> {
    reply["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .filter(|text| !text.trim().is_empty())
}
