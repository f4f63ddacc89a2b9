use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State},
    http::{header, Method, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::error::{ApiError, ErrorCode, MissingField};
use crate::i18n::Language;
use crate::provider::{AvatarJob, AvatarProvider, GeneratedAvatar};
use crate::selfie::{self, Selfie};

#[derive(Clone)]
pub struct AppState {
    pub openai: Arc<dyn AvatarProvider>,
    pub gemini: Arc<dyn AvatarProvider>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AvatarResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<InlineImage>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineImage {
    data_url: String,
    mime_type: String,
}

impl From<GeneratedAvatar> for AvatarResponse {
    fn from(avatar: GeneratedAvatar) -> Self {
        match avatar {
            GeneratedAvatar::Url(url) => Self {
                success: true,
                image_url: Some(url),
                image: None,
            },
            GeneratedAvatar::Inline { mime_type, data } => Self {
                success: true,
                image_url: None,
                image: Some(InlineImage {
                    data_url: selfie::data_url(&mime_type, &data),
                    mime_type,
                }),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SelfieRule {
    Optional,
    Required,
}

pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/translations/:lang", get(translations))
        .route(
            "/api/generate-avatar",
            post(generate_avatar)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/generate_google",
            post(generate_google)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(cors)
        .with_state(state)
}

async fn generate_avatar(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AvatarResponse>, ApiError> {
    generate(state.openai.as_ref(), SelfieRule::Optional, &body).await
}

async fn generate_google(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AvatarResponse>, ApiError> {
    generate(state.gemini.as_ref(), SelfieRule::Required, &body).await
}

async fn generate(
    provider: &dyn AvatarProvider,
    rule: SelfieRule,
    body: &[u8],
) -> Result<Json<AvatarResponse>, ApiError> {
    // Unparsable bodies fall through to the missing-field checks. Fields are
    // read one by one so a mistyped field never hides the others.
    let request: Value = serde_json::from_slice(body).unwrap_or(Value::Null);

    let language = text_field(&request, "language")
        .as_deref()
        .and_then(Language::from_code)
        .unwrap_or_default();
    let anime_title = text_field(&request, "animeTitle");
    let anime_character = text_field(&request, "animeCharacter");
    let image_base64 = text_field(&request, "imageBase64");

    if rule == SelfieRule::Required && (image_base64.is_none() || anime_title.is_none()) {
        return Err(ApiError::MissingFields(MissingField::ImageAndTitle, language));
    }
    let anime_title =
        anime_title.ok_or(ApiError::MissingFields(MissingField::AnimeTitle, language))?;

    let selfie = match image_base64 {
        Some(encoded) => Some(prepare_selfie(encoded, language).await?),
        None => None,
    };

    tracing::info!(
        provider = provider.name(),
        anime_title = %anime_title,
        anime_character = anime_character.as_deref().unwrap_or(""),
        with_selfie = selfie.is_some(),
        "🎌 Starting avatar generation"
    );

    let job = AvatarJob {
        anime_title,
        anime_character,
        selfie,
    };

    match provider.generate(&job).await {
        Ok(avatar) => {
            tracing::info!(provider = provider.name(), "✅ Image generated successfully!");
            Ok(Json(avatar.into()))
        }
        Err(e) => {
            let code = e.code();
            tracing::error!(provider = provider.name(), error_code = ?code, "❌ Generation error: {}", e);
            Err(ApiError::Generation(code, language))
        }
    }
}

async fn prepare_selfie(encoded: String, language: Language) -> Result<Selfie, ApiError> {
    let normalized = tokio::task::spawn_blocking(move || {
        Selfie::from_base64(&encoded).and_then(|selfie| selfie.normalized())
    })
    .await
    .map_err(|e| {
        tracing::error!("selfie normalization task failed: {}", e);
        ApiError::Generation(ErrorCode::UnknownError, language)
    })?;

    normalized.map_err(|e| {
        tracing::warn!("rejecting selfie: {}", e);
        ApiError::InvalidImage(language)
    })
}

/// A non-blank string field of the request body, trimmed.
fn text_field(request: &Value, key: &str) -> Option<String> {
    request
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Always English: the body of a non-POST request is never read.
async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn translations(Path(lang): Path<String>) -> Response {
    match Language::from_code(&lang) {
        Some(language) => Json(language.translations()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "error": format!("Translations not found for: {}", lang)
            })),
        )
            .into_response(),
    }
}

async fn index() -> Html<&'static str> {
    Html(include_str!("../assets/index.html"))
}
