use std::sync::Arc;

use crate::auth::SessionProvider;
use crate::config::Config;
use crate::repository::Repository;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub repo: Repository,
    pub sessions: Arc<dyn SessionProvider>,
    pub config: Config,
}
