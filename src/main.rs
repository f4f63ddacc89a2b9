// Anime avatar generator: turns a selfie and an anime title into a stylized
// portrait by way of hosted image-generation APIs.

mod config;
mod error;
mod i18n;
mod prompt;
mod provider;
mod routes;
mod selfie;

use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::provider::{GeminiProvider, OpenAiProvider};
use crate::routes::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "anime_avatar_generator=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.openai_api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; /api/generate-avatar will report INVALID_API_KEY");
    }
    if config.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; /api/generate_google will report INVALID_API_KEY");
    }
    if let Some(model) = &config.openai_vision_model {
        tracing::info!("Selfies sent to /api/generate-avatar are described by {}", model);
    }

    let client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()
        .context("Failed to create HTTP client")?;

    let state = AppState {
        openai: Arc::new(OpenAiProvider::new(client.clone(), &config)),
        gemini: Arc::new(GeminiProvider::new(client, &config)),
    };

    let app = routes::router(state, config.max_body_bytes);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    tracing::info!("🚀 Server running on http://{}", addr);
    tracing::info!("🎌 Open in your browser to start generating avatars!");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
