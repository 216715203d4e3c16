use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::{Resource, Singleton};
use crate::store::Store;

/// List/get/create/update/delete over any collection in the document, plus
/// get/update for the singletons.
///
/// Each call loads the whole document from the store and mutations write the
/// whole document back. Mutations hold `write_lock` across that
/// read-modify-write so concurrent requests cannot drop each other's changes.
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn Store>,
    write_lock: Arc<Mutex<()>>,
}

impl Repository {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn describe(&self) -> String {
        self.store.describe()
    }

    pub async fn list<R: Resource>(&self) -> Result<Vec<R>, AppError> {
        let doc = self.store.load().await?;
        let items = R::collection(&doc).clone();
        debug!("Listed {} {}", items.len(), R::COLLECTION);
        Ok(items)
    }

    pub async fn get<R: Resource>(&self, id: &str) -> Result<R, AppError> {
        let doc = self.store.load().await?;
        R::collection(&doc)
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or_else(|| AppError::not_found(R::LABEL))
    }

    pub async fn create<R: Resource>(&self, patch: R::Patch) -> Result<R, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.store.load().await?;
        let now = Utc::now();
        let items = R::collection_mut(&mut doc);
        let record = R::create(next_id::<R>(items, now), patch, now);
        items.push(record.clone());
        self.store.save(&doc).await?;
        info!("Created {} {}", R::LABEL, record.id());
        Ok(record)
    }

    pub async fn update<R: Resource>(&self, id: &str, patch: R::Patch) -> Result<R, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.store.load().await?;
        let record = R::collection_mut(&mut doc)
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| AppError::not_found(R::LABEL))?;
        record.apply(patch, Utc::now());
        let updated = record.clone();
        self.store.save(&doc).await?;
        info!("Updated {} {id}", R::LABEL);
        Ok(updated)
    }

    pub async fn delete<R: Resource>(&self, id: &str) -> Result<R, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.store.load().await?;
        let items = R::collection_mut(&mut doc);
        let index = items
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| AppError::not_found(R::LABEL))?;
        let removed = items.remove(index);
        self.store.save(&doc).await?;
        info!("Deleted {} {id}", R::LABEL);
        Ok(removed)
    }

    pub async fn singleton<S: Singleton>(&self) -> Result<S, AppError> {
        let doc = self.store.load().await?;
        Ok(S::get(&doc).clone())
    }

    pub async fn update_singleton<S: Singleton>(&self, patch: S::Patch) -> Result<S, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.store.load().await?;
        let value = S::get_mut(&mut doc);
        value.apply(patch);
        let updated = value.clone();
        self.store.save(&doc).await?;
        info!("Updated {}", S::KEY);
        Ok(updated)
    }
}

/// Millisecond timestamp as a string, bumped past any id already taken so two
/// creates within the same millisecond still get distinct ids.
fn next_id<R: Resource>(existing: &[R], now: DateTime<Utc>) -> String {
    let mut candidate = now.timestamp_millis();
    loop {
        let id = candidate.to_string();
        if !existing.iter().any(|r| r.id() == id) {
            return id;
        }
        candidate += 1;
    }
}
