//! API error type and JSON error response formatting.
//!
//! Every failure leaves the server as `{"error": <message>, "status": "error"}`
//! with a status code chosen by the variant.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use solace_chat::ChatError;
use solace_speech::SpeechError;
use solace_storage::StoreError;

/// Message used for 500 responses whose detail stays in the logs.
pub const INTERNAL_ERROR: &str = "Internal server error";

pub const NO_AUDIO: &str = "No audio file provided";

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub status: &'static str,
}

/// API error type that maps to HTTP status codes and JSON responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 400 - missing or invalid input.
    #[error("{0}")]
    BadRequest(String),
    /// 401 - credentials did not match.
    #[error("{0}")]
    Unauthorized(String),
    /// 404 - no such route.
    #[error("{0}")]
    NotFound(String),
    /// 500 - the message is shown to the client as-is.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Log `cause` and return a 500 carrying only `message`.
    pub fn internal(message: &str, cause: impl std::fmt::Display) -> Self {
        tracing::error!(error = %cause, "{}", message);
        ApiError::Internal(message.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_string(),
            status: "error",
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected request body");
        ApiError::BadRequest("Request body must be valid JSON".to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        tracing::debug!(error = %err.body_text(), "Rejected multipart body");
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::BadRequest("Audio file is too large".to_string())
        } else {
            ApiError::BadRequest("Invalid multipart body".to_string())
        }
    }
}

/// A request that is not multipart at all carries no audio file.
impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Request is not multipart");
        ApiError::BadRequest(NO_AUDIO.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(msg) => ApiError::BadRequest(msg),
            StoreError::DuplicateEmail => {
                ApiError::BadRequest("Email already registered".to_string())
            }
            StoreError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid credentials".to_string())
            }
            other => ApiError::internal(INTERNAL_ERROR, other),
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::EmptyMessage => ApiError::BadRequest(err.to_string()),
            ChatError::MessageTooLong(limit) => ApiError::BadRequest(format!(
                "Message cannot exceed {} characters",
                limit
            )),
            other => ApiError::internal(INTERNAL_ERROR, other),
        }
    }
}

impl From<SpeechError> for ApiError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::EmptyAudio | SpeechError::Unintelligible => {
                ApiError::BadRequest(err.to_string())
            }
            SpeechError::Provider(ref detail) => {
                tracing::error!(error = %detail, "Transcription provider failed");
                ApiError::Internal(err.to_string())
            }
        }
    }
}
