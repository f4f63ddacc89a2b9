//! Hosted AI services that turn a request into an avatar.

mod gemini;
mod openai;

pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

use async_trait::async_trait;

use crate::error::GenerationError;
use crate::selfie::Selfie;

/// A validated generation request.
#[derive(Debug, Clone)]
pub struct AvatarJob {
    pub anime_title: String,
    pub anime_character: Option<String>,
    pub selfie: Option<Selfie>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedAvatar {
    /// Hosted by the provider.
    Url(String),
    Inline { mime_type: String, data: Vec<u8> },
}

#[async_trait]
pub trait AvatarProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn generate(&self, job: &AvatarJob) -> Result<GeneratedAvatar, GenerationError>;
}

/// Sends a JSON request and returns the parsed body, or the raw body on a non-2xx status.
async fn send_json(
    request: reqwest::RequestBuilder,
    payload: &serde_json::Value,
) -> Result<serde_json::Value, GenerationError> {
    let response = request
        .header("Content-Type", "application/json")
        .json(payload)
        .send()
        .await
        .map_err(GenerationError::transport)?;

    let status = response.status();
    let response_text = response.text().await.map_err(GenerationError::transport)?;

    if !status.is_success() {
        tracing::warn!(
            status = status.as_u16(),
            body = %crate::prompt::preview(&response_text, 500),
            "provider rejected request"
        );
        return Err(GenerationError::Provider {
            status: status.as_u16(),
            body: response_text,
        });
    }

    serde_json::from_str(&response_text)
        .map_err(|e| GenerationError::InvalidResponse(format!("body is not JSON: {e}")))
}
