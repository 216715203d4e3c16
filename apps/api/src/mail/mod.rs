//! Outbound email for the password-reset flow.
//!
//! Messages are handed to an external HTTP mail relay authenticated with the
//! `EMAIL_USER` / `EMAIL_PASS` pair. Nothing is queued or retried; a failed
//! send is reported straight back to the caller.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::config::MailConfig;

pub mod handlers;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Relay rejected message (status {status}): {message}")]
    Rejected { status: u16, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Address messages are sent from.
    fn sender(&self) -> &str;

    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}

#[derive(Clone)]
pub struct HttpMailRelay {
    client: Client,
    config: MailConfig,
}

impl HttpMailRelay {
    pub fn new(config: MailConfig) -> Result<Self, MailError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()?,
            config,
        })
    }
}

#[async_trait]
impl Mailer for HttpMailRelay {
    fn sender(&self) -> &str {
        &self.config.user
    }

    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let response = self
            .client
            .post(&self.config.relay_url)
            .basic_auth(&self.config.user, Some(&self.config.pass))
            .json(mail)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        debug!("Relay accepted mail to {}", mail.to);
        Ok(())
    }
}
