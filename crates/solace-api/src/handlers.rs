//! Route handler functions for all API endpoints.
//!
//! Each handler extracts its input via axum extractors, calls into the
//! stores or services on AppState, and returns a JSON response. Success
//! bodies carry `"status": "success"`; failures go through `ApiError`.

use axum::extract::{Multipart, Query, State};
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use solace_chat::orchestrator::READ_RECEIPT;
use solace_chat::HistoryEntry;
use solace_core::time::now_iso8601;
use solace_core::types::UserSummary;
use solace_speech::AudioUpload;
use solace_storage::StoreError;

use crate::error::{ApiError, NO_AUDIO};
use crate::state::AppState;

const SUCCESS: &str = "success";

/// Multipart field carrying the uploaded recording.
pub const AUDIO_FIELD: &str = "audio";

// =============================================================================
// Request types
// =============================================================================

// Absent and null fields are read as empty strings by the handlers.

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    pub session_id: Option<String>,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserSummary,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub status: &'static str,
    pub timestamp: String,
    pub read_receipt: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub transcript: String,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryEntry>,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

/// Client-caused store errors keep their message; anything else is logged
/// and reported with `context`.
fn store_failure(err: StoreError, context: &str) -> ApiError {
    match err {
        StoreError::Validation(_) | StoreError::DuplicateEmail | StoreError::InvalidCredentials => {
            err.into()
        }
        other => ApiError::internal(context, other),
    }
}

// =============================================================================
// Auth
// =============================================================================

/// POST /auth/register - create an account.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    const CONTEXT: &str = "An error occurred during registration";
    let Json(req) = payload?;

    let users = state.users.clone();
    // Argon2 is CPU-bound.
    let id = tokio::task::spawn_blocking(move || {
        users.register(
            req.name.as_deref().unwrap_or_default(),
            req.email.as_deref().unwrap_or_default(),
            req.password.as_deref().unwrap_or_default(),
        )
    })
    .await
    .map_err(|e| ApiError::internal(CONTEXT, e))?
    .map_err(|e| store_failure(e, CONTEXT))?;

    info!(user_id = %id, "User registered");
    Ok(Json(MessageResponse {
        message: "User registered successfully".to_string(),
        status: SUCCESS,
    }))
}

/// POST /auth/login - check credentials and return the public profile.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    const CONTEXT: &str = "An error occurred during login";
    let Json(req) = payload?;

    let users = state.users.clone();
    let user = tokio::task::spawn_blocking(move || {
        users.authenticate(
            req.email.as_deref().unwrap_or_default(),
            req.password.as_deref().unwrap_or_default(),
        )
    })
    .await
    .map_err(|e| ApiError::internal(CONTEXT, e))?
    .map_err(|e| store_failure(e, CONTEXT))?;

    debug!(user_id = %user.id, "User logged in");
    Ok(Json(LoginResponse {
        user,
        status: SUCCESS,
    }))
}

// =============================================================================
// Chat
// =============================================================================

/// POST /chat - send one message and get the assistant's reply.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(req) = payload?;
    let session = state.session_or_default(req.session_id.as_deref());
    let message = req.message.unwrap_or_default();

    let exchange = state.chat.handle_message(&session, &message).await?;

    Ok(Json(ChatResponse {
        response: exchange.reply,
        status: SUCCESS,
        timestamp: exchange.timestamp,
        read_receipt: READ_RECEIPT,
    }))
}

/// GET /history - the session's conversation, oldest first.
pub async fn history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let session = state.session_or_default(params.session_id.as_deref());
    let history = state.chat.history(&session)?;

    Ok(Json(HistoryResponse {
        history,
        status: SUCCESS,
    }))
}

// =============================================================================
// Speech
// =============================================================================

/// POST /speech-to-text - transcribe the multipart `audio` field.
pub async fn speech_to_text(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TranscriptResponse>, ApiError> {
    let mut multipart = multipart?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;
        upload = Some(AudioUpload {
            bytes: bytes.to_vec(),
            file_name,
            content_type,
        });
        break;
    }
    let upload = upload.ok_or_else(|| ApiError::BadRequest(NO_AUDIO.to_string()))?;

    debug!(
        bytes = upload.bytes.len(),
        content_type = upload.content_type.as_deref().unwrap_or("-"),
        "Audio received"
    );

    let transcript = state.transcriber.transcribe(&upload).await.map_err(|e| {
        warn!(error = %e, "Transcription failed");
        ApiError::from(e)
    })?;

    Ok(Json(TranscriptResponse {
        transcript,
        status: SUCCESS,
    }))
}

// =============================================================================
// Misc
// =============================================================================

/// GET /health - liveness check.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: now_iso8601(),
    })
}

/// Any unmatched route.
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}
