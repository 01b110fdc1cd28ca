use axum::{Json, Router, extract::{Path, State}, http::StatusCode, response::{IntoResponse, Response}, routing::{get, post}};
use std::{collections::HashMap, sync::Arc};
use parking_lot::RwLock;
use thiserror::Error;
use uuid::Uuid;
use chrono::Utc;

use crate::{form::FormError, gemini::{GeminiClient, GeminiError}, models::{FieldUpdate, FormState, Session, SuggestionResponse}};

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    pub gemini: Arc<GeminiClient>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("session not found")]
    SessionNotFound,
    #[error(transparent)]
    Form(#[from] FormError),
    #[error("suggestion generation failed: {0}")]
    Generation(#[from] GeminiError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::SessionNotFound => StatusCode::NOT_FOUND,
            ApiError::Form(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Generation(_) => StatusCode::BAD_GATEWAY,
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/session", post(create_session))
        .route("/api/session/:id", get(get_session).delete(delete_session))
        .route("/api/session/:id/field", post(update_field))
        .route("/api/session/:id/reset", post(reset_session))
        .route("/api/session/:id/suggest", post(request_suggestion))
        .with_state(state)
}

pub async fn create_session(State(state): State<AppState>) -> Json<Session> {
    let session = Session::new();
    tracing::info!("🚀 New form session {}", session.id);
    state.sessions.write().insert(session.id, session.clone());
    Json(session)
}

pub async fn get_session(Path(id): Path<Uuid>, State(state): State<AppState>) -> Result<Json<Session>, ApiError> {
    state.sessions.read().get(&id).cloned().map(Json).ok_or(ApiError::SessionNotFound)
}

pub async fn update_field(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(update): Json<FieldUpdate>,
) -> Result<Json<Session>, ApiError> {
    let mut guard = state.sessions.write();
    let session = guard.get_mut(&id).ok_or(ApiError::SessionNotFound)?;
    session.form.apply(update);
    session.updated_at = Utc::now();
    Ok(Json(session.clone()))
}

pub async fn reset_session(Path(id): Path<Uuid>, State(state): State<AppState>) -> Result<Json<Session>, ApiError> {
    let mut guard = state.sessions.write();
    let session = guard.get_mut(&id).ok_or(ApiError::SessionNotFound)?;
    session.form.reset();
    session.updated_at = Utc::now();
    tracing::info!("Session {} cleared", id);
    Ok(Json(session.clone()))
}

pub async fn delete_session(Path(id): Path<Uuid>, State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.sessions.write().remove(&id).ok_or(ApiError::SessionNotFound)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Submission flow: validate, then one call to Gemini. Validation failures
/// never reach the network; either failure leaves the session untouched so
/// the user can edit and resubmit.
pub async fn request_suggestion(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<SuggestionResponse>, ApiError> {
    // Snapshot the form so the Gemini call happens outside the lock
    let form: FormState = {
        let guard = state.sessions.read();
        guard.get(&id).ok_or(ApiError::SessionNotFound)?.form.clone()
    };

    form.validate_for_submit()?;

    let prompt = GeminiClient::build_prompt(&form);
    tracing::info!("🎯 Requesting suggestion for session {} ({}, {})", id, form.occasion.as_str(), form.location);

    let suggestion = state.gemini.request_suggestion(&prompt).await?;
    tracing::info!("✅ Suggestion ready for session {} ({} chars)", id, suggestion.len());
    Ok(Json(SuggestionResponse { suggestion }))
}
