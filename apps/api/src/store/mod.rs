pub mod json_file;
pub mod postgres;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Book, Event, Habit, HomeSummary, Note, NotebookPage, Settings};

pub use json_file::JsonFileStore;
pub use postgres::PgStore;

/// The whole persisted state: one array per collection plus the singletons.
/// Missing keys load as empty collections or defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    pub notes: Vec<Note>,
    pub habits: Vec<Habit>,
    pub events: Vec<Event>,
    pub pages: Vec<NotebookPage>,
    pub books: Vec<Book>,
    pub settings: Settings,
    pub home: HomeSummary,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Background write failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Backing storage for the document. Every call moves the entire document;
/// there is no partial read or incremental write.
#[async_trait]
pub trait Store: Send + Sync {
    async fn load(&self) -> Result<Document, StoreError>;

    async fn save(&self, doc: &Document) -> Result<(), StoreError>;

    /// Short human-readable location for logs.
    fn describe(&self) -> String;
}
