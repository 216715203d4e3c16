use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default or is optional; a malformed value fails startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub mail_port: u16,
    /// When set, records live in PostgreSQL instead of the JSON file.
    pub database_url: Option<String>,
    pub data_file: PathBuf,
    pub mail: Option<MailConfig>,
    pub auth_email: Option<String>,
    pub auth_password_sha256: Option<String>,
    pub rust_log: String,
}

/// Credentials for the external mail relay used by the password-reset sender.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub relay_url: String,
    pub user: String,
    pub pass: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: port_from_env("PORT", 3000)?,
            mail_port: port_from_env("MAIL_PORT", 3001)?,
            database_url: optional_env("DATABASE_URL"),
            data_file: optional_env("DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("db.json")),
            mail: match (
                optional_env("MAIL_RELAY_URL"),
                optional_env("EMAIL_USER"),
                optional_env("EMAIL_PASS"),
            ) {
                (Some(relay_url), Some(user), Some(pass)) => Some(MailConfig {
                    relay_url,
                    user,
                    pass,
                }),
                _ => None,
            },
            auth_email: optional_env("AUTH_EMAIL"),
            auth_password_sha256: optional_env("AUTH_PASSWORD_SHA256")
                .map(|h| h.to_ascii_lowercase()),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn port_from_env(key: &str, default: u16) -> Result<u16> {
    match optional_env(key) {
        Some(raw) => raw
            .parse::<u16>()
            .with_context(|| format!("{key} must be a valid port number")),
        None => Ok(default),
    }
}

/// Reads a variable, treating blank values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
