use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::store::{Document, Store, StoreError};

/// Stores the document as one pretty-printed JSON file.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target, so readers never observe a half-written document.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Opens the store, writing an empty document if the file does not exist.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self { path: path.into() };
        if tokio::fs::try_exists(&store.path).await? {
            // Fail at startup rather than on the first request.
            store.load().await?;
        } else {
            info!("Initializing new data file at {}", store.path.display());
            store.save(&Document::default()).await?;
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Store for JsonFileStore {
    async fn load(&self) -> Result<Document, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Document::default()),
            Err(e) => return Err(e.into()),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Document::default());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn save(&self, doc: &Document) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(doc)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomically(&path, &bytes)).await??;
        debug!("Wrote {}", self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        format!("json file {}", self.path.display())
    }
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}
