use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hub_api::auth::StaticCredentialProvider;
use hub_api::config::Config;
use hub_api::db::{create_pool, ensure_schema};
use hub_api::mail::handlers::{build_mail_router, MailState};
use hub_api::mail::HttpMailRelay;
use hub_api::repository::Repository;
use hub_api::routes::build_router;
use hub_api::state::AppState;
use hub_api::store::{JsonFileStore, PgStore, Store};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "hub_api={level},tower_http={level}",
                level = &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting hub API v{}", env!("CARGO_PKG_VERSION"));

    let store = open_store(&config).await?;
    let repo = Repository::new(store);
    info!("Using {}", repo.describe());

    let sessions = Arc::new(StaticCredentialProvider::new(
        config.auth_email.clone(),
        config.auth_password_sha256.clone(),
    ));

    let state = AppState {
        repo,
        sessions,
        config: config.clone(),
    };

    let api = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());
    let api_server = serve(api, config.port);

    match config.mail.clone() {
        Some(mail_config) => {
            let mailer = Arc::new(HttpMailRelay::new(mail_config)?);
            let mail = build_mail_router(MailState { mailer })
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive());
            tokio::try_join!(api_server, serve(mail, config.mail_port))?;
        }
        None => {
            warn!("MAIL_RELAY_URL, EMAIL_USER or EMAIL_PASS not set; password reset sender disabled");
            api_server.await?;
        }
    }

    Ok(())
}

async fn open_store(config: &Config) -> Result<Arc<dyn Store>> {
    match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            ensure_schema(&pool).await?;
            Ok(Arc::new(PgStore::new(pool)))
        }
        None => Ok(Arc::new(JsonFileStore::open(&config.data_file).await?)),
    }
}

async fn serve(app: Router, port: u16) -> Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
