//! Session handling for the single dashboard user.
//!
//! The CRUD layer treats authentication as a collaborator behind
//! [`SessionProvider`]; the only implementation shipped here compares a
//! configured email and SHA-256 password digest.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    pub email: String,
    pub signed_in_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Sign-in is not configured")]
    NotConfigured,
}

#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn sign_in(&self, credentials: Credentials) -> Result<Session, AuthError>;

    async fn sign_out(&self);

    fn current_session(&self) -> Option<Session>;

    /// Yields the new session (or `None`) every time it changes.
    fn subscribe(&self) -> watch::Receiver<Option<Session>>;
}

/// Checks credentials against a fixed email and password digest.
pub struct StaticCredentialProvider {
    email: Option<String>,
    password_sha256: Option<String>,
    session: watch::Sender<Option<Session>>,
}

impl StaticCredentialProvider {
    pub fn new(email: Option<String>, password_sha256: Option<String>) -> Self {
        if password_sha256.is_none() {
            warn!("AUTH_PASSWORD_SHA256 not set; sign-in is disabled");
        }
        let (session, _) = watch::channel(None);
        Self {
            email,
            password_sha256,
            session,
        }
    }
}

pub fn sha256_hex(input: &str) -> String {
    format!("{:x}", Sha256::digest(input.as_bytes()))
}

#[async_trait]
impl SessionProvider for StaticCredentialProvider {
    async fn sign_in(&self, credentials: Credentials) -> Result<Session, AuthError> {
        let expected = self
            .password_sha256
            .as_deref()
            .ok_or(AuthError::NotConfigured)?;

        let email = credentials.email.trim().to_ascii_lowercase();
        let email_ok = self
            .email
            .as_deref()
            .map_or(true, |e| e.eq_ignore_ascii_case(&email));
        if !email_ok || sha256_hex(&credentials.password) != expected {
            warn!("Rejected sign-in for {email}");
            return Err(AuthError::InvalidCredentials);
        }

        let session = Session {
            user_id: email.clone(),
            email,
            signed_in_at: Utc::now(),
        };
        info!("Signed in {}", session.email);
        self.session.send_replace(Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) {
        if self.session.send_replace(None).is_some() {
            info!("Signed out");
        }
    }

    fn current_session(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.session.subscribe()
    }
}
