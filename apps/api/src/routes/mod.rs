pub mod auth;
pub mod health;
pub mod resources;

use axum::{
    routing::{get, post},
    Router,
};

use crate::models::{Book, Event, Habit, HomeSummary, Note, NotebookPage, Settings};
use crate::state::AppState;
use resources::{collection_routes, singleton_routes};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Collections
        .merge(collection_routes::<Note>())
        .merge(collection_routes::<Habit>())
        .merge(collection_routes::<Event>())
        .merge(collection_routes::<NotebookPage>())
        .merge(collection_routes::<Book>())
        // Singletons
        .merge(singleton_routes::<Settings>())
        .merge(singleton_routes::<HomeSummary>())
        // Session
        .route("/auth/sign-in", post(auth::handle_sign_in))
        .route("/auth/sign-out", post(auth::handle_sign_out))
        .route("/auth/session", get(auth::handle_session))
        .with_state(state)
}
