use async_trait::async_trait;
use serde_json::{json, Value};

use super::{send_json, AvatarJob, AvatarProvider, GeneratedAvatar};
use crate::config::Config;
use crate::error::GenerationError;
use crate::prompt;
use crate::selfie::Selfie;

/// DALL·E style text-to-image generation, optionally preceded by a vision
/// model describing the selfie.
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    image_model: String,
    vision_model: Option<String>,
}

impl OpenAiProvider {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            image_model: config.openai_image_model.clone(),
            vision_model: config.openai_vision_model.clone(),
        }
    }

    async fn describe(
        &self,
        api_key: &str,
        model: &str,
        selfie: &Selfie,
    ) -> Result<Option<String>, GenerationError> {
        let payload = json!({
            "model": model,
            "max_tokens": 300,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": prompt::describe_instruction() },
                    { "type": "image_url", "image_url": { "url": selfie.to_data_url() } }
                ]
            }]
        });

        tracing::info!("👁️ Describing selfie with {}", model);
        let request = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key);
        let result = send_json(request, &payload).await?;

        Ok(extract_description(&result))
    }
}

#[async_trait]
impl AvatarProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn generate(&self, job: &AvatarJob) -> Result<GeneratedAvatar, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingApiKey("OpenAI"))?;

        let appearance = match (&self.vision_model, &job.selfie) {
            (Some(model), Some(selfie)) => self.describe(api_key, model, selfie).await?,
            _ => None,
        };

        let dalle_prompt = prompt::image_prompt(
            &job.anime_title,
            job.anime_character.as_deref(),
            appearance.as_deref(),
        );
        tracing::info!("🎨 DALL-E prompt prepared: {}", prompt::preview(&dalle_prompt, 200));

        let payload = json!({
            "model": self.image_model,
            "prompt": dalle_prompt,
            "n": 1,
            "size": "1024x1024",
            "quality": "hd",
            "style": "vivid"
        });

        let request = self
            .client
            .post(format!("{}/images/generations", self.base_url))
            .bearer_auth(api_key);
        let result = send_json(request, &payload).await?;

        extract_image_url(&result).map(GeneratedAvatar::Url)
    }
}

fn extract_image_url(result: &Value) -> Result<String, GenerationError> {
    result["data"][0]["url"]
        .as_str()
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .ok_or_else(|| GenerationError::NoImage("No image URL received from DALL-E".to_string()))
}

fn extract_description(result: &Value) -> Option<String> {
    result["choices"][0]["message"]["content"]
        .as_str()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
