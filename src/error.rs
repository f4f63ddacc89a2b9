use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::i18n::Language;

/// Failure while talking to an avatar provider.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid_api_key: {0} API key is not configured")]
    MissingApiKey(&'static str),
    #[error("provider returned {status}: {body}")]
    Provider { status: u16, body: String },
    /// Built with the URL stripped, see [`GenerationError::transport`].
    #[error("request to provider failed: {0}")]
    Transport(reqwest::Error),
    #[error("unexpected provider response: {0}")]
    InvalidResponse(String),
    #[error("{0}")]
    NoImage(String),
}

impl GenerationError {
    /// Request URLs can carry credentials, so they never reach the message.
    pub fn transport(err: reqwest::Error) -> Self {
        Self::Transport(err.without_url())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MissingApiKey(_) => ErrorCode::InvalidApiKey,
            other => ErrorCode::classify(&other.to_string()),
        }
    }
}

/// Coarse error category reported to the client as `errorCode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    BillingError,
    RateLimitError,
    InvalidApiKey,
    ContentPolicyError,
    UnknownError,
}

impl ErrorCode {
    /// Maps a provider error message onto a code by substring, first match wins.
    pub fn classify(message: &str) -> Self {
        let has = |needle: &str| message.contains(needle);

        if has("billing") || has("insufficient_quota") {
            Self::BillingError
        } else if has("rate_limit") || has("RESOURCE_EXHAUSTED") {
            Self::RateLimitError
        } else if has("invalid_api_key") || has("API_KEY_INVALID") {
            Self::InvalidApiKey
        } else if has("content_policy") || has("SAFETY") || has("PROHIBITED_CONTENT") {
            Self::ContentPolicyError
        } else {
            Self::UnknownError
        }
    }

    pub fn message(self, language: Language) -> &'static str {
        let errors = &language.translations().errors;
        match self {
            Self::BillingError => errors.billing,
            Self::RateLimitError => errors.rate_limit,
            Self::InvalidApiKey => errors.invalid_api_key,
            Self::ContentPolicyError => errors.content_policy,
            Self::UnknownError => errors.unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    AnimeTitle,
    ImageAndTitle,
}

/// Everything a generation endpoint can answer with besides success.
#[derive(Debug)]
pub enum ApiError {
    /// Not localized.
    MethodNotAllowed,
    MissingFields(MissingField, Language),
    InvalidImage(Language),
    Generation(ErrorCode, Language),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    success: Option<bool>,
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<ErrorCode>,
}

impl ErrorBody {
    fn plain(error: &'static str) -> Self {
        Self {
            success: None,
            error,
            error_code: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                ErrorBody::plain("Method not allowed"),
            ),
            Self::MissingFields(field, lang) => {
                let errors = &lang.translations().errors;
                let message = match field {
                    MissingField::AnimeTitle => errors.missing_title,
                    MissingField::ImageAndTitle => errors.missing_image_and_title,
                };
                (StatusCode::BAD_REQUEST, ErrorBody::plain(message))
            }
            Self::InvalidImage(lang) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::plain(lang.translations().errors.invalid_image),
            ),
            Self::Generation(code, lang) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    success: Some(false),
                    error: code.message(lang),
                    error_code: Some(code),
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}
