use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::errors::AppError;
use crate::models::{Resource, Singleton};
use crate::state::AppState;

/// GET /{collection}
pub async fn handle_list<R: Resource>(
    State(state): State<AppState>,
) -> Result<Json<Vec<R>>, AppError> {
    Ok(Json(state.repo.list::<R>().await?))
}

/// GET /{collection}/:id
pub async fn handle_get<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<R>, AppError> {
    Ok(Json(state.repo.get::<R>(&id).await?))
}

/// POST /{collection}
pub async fn handle_create<R: Resource>(
    State(state): State<AppState>,
    payload: Result<Json<R::Patch>, JsonRejection>,
) -> Result<(StatusCode, Json<R>), AppError> {
    let Json(patch) = payload?;
    let record = state.repo.create::<R>(patch).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /{collection}/:id
pub async fn handle_update<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<R::Patch>, JsonRejection>,
) -> Result<Json<R>, AppError> {
    let Json(patch) = payload?;
    Ok(Json(state.repo.update::<R>(&id, patch).await?))
}

/// DELETE /{collection}/:id
pub async fn handle_delete<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<R>, AppError> {
    Ok(Json(state.repo.delete::<R>(&id).await?))
}

/// GET /{key}
pub async fn handle_get_singleton<S: Singleton>(
    State(state): State<AppState>,
) -> Result<Json<S>, AppError> {
    Ok(Json(state.repo.singleton::<S>().await?))
}

/// PUT /{key}
pub async fn handle_update_singleton<S: Singleton>(
    State(state): State<AppState>,
    payload: Result<Json<S::Patch>, JsonRejection>,
) -> Result<Json<S>, AppError> {
    let Json(patch) = payload?;
    Ok(Json(state.repo.update_singleton::<S>(patch).await?))
}

/// Mounts the five collection routes for `R` under `/{R::COLLECTION}`.
pub fn collection_routes<R: Resource>() -> Router<AppState> {
    let base = format!("/{}", R::COLLECTION);
    let item = format!("/{}/:id", R::COLLECTION);
    Router::new()
        .route(&base, get(handle_list::<R>).post(handle_create::<R>))
        .route(
            &item,
            get(handle_get::<R>)
                .put(handle_update::<R>)
                .delete(handle_delete::<R>),
        )
}

pub fn singleton_routes<S: Singleton>() -> Router<AppState> {
    Router::new().route(
        &format!("/{}", S::KEY),
        get(handle_get_singleton::<S>).put(handle_update_singleton::<S>),
    )
}
