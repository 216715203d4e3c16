//! HTTP client for the hub API and the local list mirror built on it.

use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use tracing::debug;

use crate::models::{Resource, Singleton};

pub mod sync;

pub use sync::{ListFilter, SyncedList};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// One request per call. No retries and no caching.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    pub async fn list<R: Resource>(&self) -> Result<Vec<R>, ClientError> {
        let response = self.client.get(self.url(R::COLLECTION)).send().await?;
        decode(response).await
    }

    pub async fn get<R: Resource>(&self, id: &str) -> Result<R, ClientError> {
        let url = self.url(&format!("{}/{id}", R::COLLECTION));
        decode(self.client.get(url).send().await?).await
    }

    pub async fn create<R: Resource>(&self, patch: &R::Patch) -> Result<R, ClientError> {
        let response = self
            .client
            .post(self.url(R::COLLECTION))
            .json(patch)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn update<R: Resource>(&self, id: &str, patch: &R::Patch) -> Result<R, ClientError> {
        let url = self.url(&format!("{}/{id}", R::COLLECTION));
        decode(self.client.put(url).json(patch).send().await?).await
    }

    pub async fn delete<R: Resource>(&self, id: &str) -> Result<R, ClientError> {
        let url = self.url(&format!("{}/{id}", R::COLLECTION));
        decode(self.client.delete(url).send().await?).await
    }

    pub async fn singleton<S: Singleton>(&self) -> Result<S, ClientError> {
        decode(self.client.get(self.url(S::KEY)).send().await?).await
    }

    pub async fn update_singleton<S: Singleton>(&self, patch: &S::Patch) -> Result<S, ClientError> {
        let response = self
            .client
            .put(self.url(S::KEY))
            .json(patch)
            .send()
            .await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    debug!("API returned {status}: {message}");

    if status == StatusCode::NOT_FOUND {
        Err(ClientError::NotFound(message))
    } else {
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
