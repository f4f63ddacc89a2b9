use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use serde_json::{json, Value};

use super::{send_json, AvatarJob, AvatarProvider, GeneratedAvatar};
use crate::config::Config;
use crate::error::GenerationError;
use crate::prompt;

/// Multimodal image generation: the selfie and the instruction go out in one
/// request and the avatar comes back inline.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            api_key: config.gemini_api_key.clone(),
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            model: config.gemini_model.clone(),
        }
    }

    fn payload(job: &AvatarJob) -> Value {
        let instruction = prompt::selfie_instruction(&job.anime_title, job.anime_character.as_deref());

        let mut parts = vec![json!({ "text": instruction })];
        if let Some(selfie) = &job.selfie {
            parts.push(json!({
                "inline_data": {
                    "mime_type": selfie.mime_type,
                    "data": selfie.to_base64()
                }
            }));
        }

        json!({
            "contents": [{ "role": "user", "parts": parts }],
            "generationConfig": { "responseModalities": ["IMAGE"] }
        })
    }
}

#[async_trait]
impl AvatarProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, job: &AvatarJob) -> Result<GeneratedAvatar, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingApiKey("Gemini"))?;

        tracing::info!("📤 Sending request to Google Gemini ({})", self.model);

        let request = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, self.model))
            .header("x-goog-api-key", api_key);
        let result = send_json(request, &Self::payload(job)).await?;

        extract_inline_image(&result)
    }
}

fn extract_inline_image(result: &Value) -> Result<GeneratedAvatar, GenerationError> {
    let candidate = result["candidates"]
        .as_array()
        .and_then(|c| c.first())
        .ok_or_else(|| {
            GenerationError::NoImage(with_block_reason("No candidates returned", result))
        })?;

    let parts = candidate["content"]["parts"]
        .as_array()
        .map(Vec::as_slice)
        .unwrap_or_default();

    for part in parts {
        let Some(inline) = part.get("inlineData").or_else(|| part.get("inline_data")) else {
            continue;
        };
        let data = inline["data"].as_str().unwrap_or_default();
        if data.is_empty() {
            continue;
        }

        let mime_type = inline
            .get("mimeType")
            .or_else(|| inline.get("mime_type"))
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or("image/png")
            .to_string();
        let data = general_purpose::STANDARD
            .decode(data)
            .map_err(|e| GenerationError::InvalidResponse(format!("inline image is not base64: {e}")))?;

        return Ok(GeneratedAvatar::Inline { mime_type, data });
    }

    Err(GenerationError::NoImage(with_block_reason(
        "No image generated",
        result,
    )))
}

fn with_block_reason(message: &str, result: &Value) -> String {
    let reason = result["promptFeedback"]["blockReason"]
        .as_str()
        .or_else(|| result["candidates"][0]["finishReason"].as_str())
        .filter(|r| *r != "STOP");

    match reason {
        Some(reason) => format!("{message} (blocked: {reason})"),
        None => message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::provider::mock::{closed_base_url, MockApi};
    use crate::selfie::Selfie;
    use axum::http::StatusCode;

    fn provider_at(base_url: &str) -> GeminiProvider {
        let config = Config::for_tests(&[
            ("GEMINI_API_KEY", "SECRET-KEY-123"),
            ("GEMINI_BASE_URL", base_url),
        ])
        .unwrap();
        GeminiProvider::new(reqwest::Client::new(), &config)
    }

    fn bleach_job() -> AvatarJob {
        AvatarJob {
            anime_title: "Bleach".into(),
            anime_character: None,
            selfie: Some(Selfie {
                mime_type: "image/jpeg".into(),
                bytes: b"hello".to_vec(),
            }),
        }
    }

    #[test]
    fn payload_carries_instruction_and_selfie() {
        let job = AvatarJob {
            anime_title: "Naruto".into(),
            anime_character: Some("Sakura".into()),
            selfie: Some(Selfie {
                mime_type: "image/jpeg".into(),
                bytes: b"hello".to_vec(),
            }),
        };
        let payload = GeminiProvider::payload(&job);
        let parts = &payload["contents"][0]["parts"];
        assert!(parts[0]["text"].as_str().unwrap().contains("'Naruto'"));
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/jpeg");
        assert_eq!(parts[1]["inline_data"]["data"], "aGVsbG8=");
        assert_eq!(payload["generationConfig"]["responseModalities"][0], "IMAGE");
    }

    #[test]
    fn picks_first_inline_image() {
        let body = json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "Here is your avatar" },
                    { "inlineData": { "mimeType": "image/webp", "data": "aGVsbG8=" } },
                    { "inlineData": { "mimeType": "image/png", "data": "d29ybGQ=" } }
                ]}
            }]
        });
        assert_eq!(
            extract_inline_image(&body).unwrap(),
            GeneratedAvatar::Inline {
                mime_type: "image/webp".into(),
                data: b"hello".to_vec(),
            }
        );
    }

    #[test]
    fn inline_mime_defaults_to_png() {
        let body = json!({
            "candidates": [{ "content": { "parts": [{ "inline_data": { "data": "aGVsbG8=" } }] } }]
        });
        match extract_inline_image(&body).unwrap() {
            GeneratedAvatar::Inline { mime_type, .. } => assert_eq!(mime_type, "image/png"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_candidates_report_block_reason() {
        let body = json!({ "promptFeedback": { "blockReason": "PROHIBITED_CONTENT" } });
        let err = extract_inline_image(&body).unwrap_err();
        assert_eq!(
            err.to_string(),
            "No candidates returned (blocked: PROHIBITED_CONTENT)"
        );
        assert_eq!(err.code(), ErrorCode::ContentPolicyError);
    }

    #[test]
    fn text_only_answer_is_no_image() {
        let body = json!({
            "candidates": [{
                "finishReason": "STOP",
                "content": { "parts": [{ "text": "I can't draw that." }] }
            }]
        });
        let err = extract_inline_image(&body).unwrap_err();
        assert_eq!(err.to_string(), "No image generated");
        assert_eq!(err.code(), ErrorCode::UnknownError);
    }

    #[tokio::test]
    async fn calls_generate_content_with_key_header() {
        let api = MockApi::start(
            "/v1beta",
            vec![(
                ":generateContent",
                StatusCode::OK,
                json!({
                    "candidates": [{
                        "content": { "parts": [{ "inlineData": { "mimeType": "image/png", "data": "d29ybGQ=" } }] }
                    }]
                }),
            )],
        )
        .await;

        let avatar = provider_at(&api.base_url).generate(&bleach_job()).await.unwrap();
        assert_eq!(
            avatar,
            GeneratedAvatar::Inline {
                mime_type: "image/png".into(),
                data: b"world".to_vec(),
            }
        );

        let requests = api.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(
            request.path,
            "/v1beta/models/gemini-2.5-flash-image-preview:generateContent"
        );
        assert_eq!(request.query, None);
        assert_eq!(request.headers["x-goog-api-key"], "SECRET-KEY-123");
        assert_eq!(request.body["contents"][0]["parts"][1]["inline_data"]["data"], "aGVsbG8=");
    }

    #[tokio::test]
    async fn rejected_key_is_classified() {
        let api = MockApi::start(
            "/v1beta",
            vec![(
                ":generateContent",
                StatusCode::BAD_REQUEST,
                json!({ "error": { "status": "INVALID_ARGUMENT", "details": [{ "reason": "API_KEY_INVALID" }] } }),
            )],
        )
        .await;

        let err = provider_at(&api.base_url).generate(&bleach_job()).await.unwrap_err();
        assert!(matches!(err, GenerationError::Provider { status: 400, .. }));
        assert_eq!(err.code(), ErrorCode::InvalidApiKey);
    }

    #[tokio::test]
    async fn connection_errors_do_not_expose_the_key() {
        let base_url = closed_base_url("/v1beta").await;

        let err = provider_at(&base_url).generate(&bleach_job()).await.unwrap_err();
        assert!(matches!(err, GenerationError::Transport(_)));
        let message = err.to_string();
        assert!(!message.contains("SECRET-KEY-123"), "{message}");
        assert!(!message.contains("generateContent"), "{message}");
    }
}
