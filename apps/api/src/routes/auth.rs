use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::auth::{AuthError, Credentials, Session};
use crate::errors::AppError;
use crate::state::AppState;

/// POST /auth/sign-in
pub async fn handle_sign_in(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<Session>, AppError> {
    let Json(credentials) = payload?;
    let session = state
        .sessions
        .sign_in(credentials)
        .await
        .map_err(|e: AuthError| {
            tracing::debug!("Sign-in failed: {e}");
            AppError::Unauthorized
        })?;
    Ok(Json(session))
}

/// POST /auth/sign-out
pub async fn handle_sign_out(State(state): State<AppState>) -> StatusCode {
    state.sessions.sign_out().await;
    StatusCode::NO_CONTENT
}

/// GET /auth/session
pub async fn handle_session(State(state): State<AppState>) -> Json<Option<Session>> {
    Json(state.sessions.current_session())
}
