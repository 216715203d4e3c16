use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, info};

use crate::mail::{Mailer, OutgoingMail};

const RESET_SUBJECT: &str = "Password recovery";
const RESET_TEXT: &str = "Here is the link to reset your password.";

#[derive(Clone)]
pub struct MailState {
    pub mailer: Arc<dyn Mailer>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: Option<String>,
}

/// Errors from the reset endpoint render as a flat `{"error": "..."}` body.
#[derive(Debug, Error)]
pub enum ResetError {
    #[error("Email is required")]
    MissingEmail,

    #[error("Failed to send email")]
    SendFailed,
}

impl IntoResponse for ResetError {
    fn into_response(self) -> Response {
        let status = match self {
            ResetError::MissingEmail => StatusCode::BAD_REQUEST,
            ResetError::SendFailed => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// POST /api/forgot-password
pub async fn handle_forgot_password(
    State(state): State<MailState>,
    payload: Result<Json<ForgotPasswordRequest>, JsonRejection>,
) -> Result<Json<Value>, ResetError> {
    let email = payload
        .ok()
        .and_then(|Json(req)| req.email)
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .ok_or(ResetError::MissingEmail)?;

    let mail = OutgoingMail {
        from: state.mailer.sender().to_string(),
        to: email,
        subject: RESET_SUBJECT.to_string(),
        text: RESET_TEXT.to_string(),
    };

    state.mailer.send(&mail).await.map_err(|e| {
        error!("Password reset mail to {} failed: {e}", mail.to);
        ResetError::SendFailed
    })?;

    info!("Password reset mail sent to {}", mail.to);
    Ok(Json(json!({ "ok": true })))
}

pub fn build_mail_router(state: MailState) -> Router {
    Router::new()
        .route("/api/forgot-password", post(handle_forgot_password))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::MailError;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::sync::Mutex;
    use tower::ServiceExt;

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<OutgoingMail>>,
        fail: bool,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        fn sender(&self) -> &str {
            "hub@example.com"
        }

        async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
            if self.fail {
                return Err(MailError::Rejected {
                    status: 535,
                    message: "bad credentials".into(),
                });
            }
            self.sent.lock().unwrap().push(mail.clone());
            Ok(())
        }
    }

    async fn send_request(mailer: Arc<RecordingMailer>, body: &str) -> (StatusCode, Value) {
        let app = build_mail_router(MailState { mailer });
        let response = app
            .oneshot(
                Request::post("/api/forgot-password")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_sends_reset_mail() {
        let mailer = Arc::new(RecordingMailer::default());
        let (status, body) = send_request(mailer.clone(), r#"{"email":"julia@example.com"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": true}));
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "julia@example.com");
        assert_eq!(sent[0].from, "hub@example.com");
    }

    #[tokio::test]
    async fn test_missing_email_is_bad_request() {
        let mailer = Arc::new(RecordingMailer::default());
        let (status, body) = send_request(mailer.clone(), r#"{}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Email is required"}));

        let (status, _) = send_request(mailer.clone(), r#"{"email":"   "}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_relay_failure_is_generic_500() {
        let mailer = Arc::new(RecordingMailer {
            fail: true,
            ..Default::default()
        });
        let (status, body) = send_request(mailer, r#"{"email":"julia@example.com"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Failed to send email"}));
    }
}
