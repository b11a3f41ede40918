//! Single-document JSON file store
//!
//! All keys live in one JSON object on disk. The document is loaded lazily
//! on first access and every mutation rewrites it through a sibling temp
//! file followed by a rename, so a crash never leaves a torn file behind.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use clicktick_core::storage_ports::KeyValueStore;
use clicktick_domain::{ClickTickError, Result};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::errors::InfraError;

type Document = BTreeMap<String, Value>;

/// Key/value store persisted as one JSON object in a file.
pub struct JsonFileStore {
    path: PathBuf,
    // `None` until the file has been read.
    document: Mutex<Option<Document>>,
}

impl JsonFileStore {
    /// The file is created on the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), document: Mutex::new(None) }
    }

    /// Path of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<Document> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "State file absent, starting empty");
                return Ok(Document::new());
            }
            Err(err) => return Err(InfraError::from(err).into()),
        };

        if raw.trim().is_empty() {
            return Ok(Document::new());
        }

        match serde_json::from_str::<Document>(&raw) {
            Ok(document) => Ok(document),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "State file is corrupt, starting empty");
                Ok(Document::new())
            }
        }
    }

    async fn write_document(&self, document: &Document) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(InfraError::from)?;
        }

        let encoded = serde_json::to_vec_pretty(document).map_err(InfraError::from)?;
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, encoded).await.map_err(InfraError::from)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(InfraError::from)?;
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn mutate<F>(&self, apply: F) -> Result<()>
    where
        F: FnOnce(&mut Document) -> bool + Send,
    {
        let mut guard = self.document.lock().await;
        if guard.is_none() {
            *guard = Some(self.read_document().await?);
        }
        let document = guard
            .as_mut()
            .ok_or_else(|| ClickTickError::Internal("state document not loaded".into()))?;

        if apply(document) {
            self.write_document(document).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let mut guard = self.document.lock().await;
        if guard.is_none() {
            *guard = Some(self.read_document().await?);
        }
        Ok(guard.as_ref().and_then(|document| document.get(key).cloned()))
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let key = key.to_string();
        self.mutate(move |document| {
            document.insert(key, value);
            true
        })
        .await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.mutate(|document| document.remove(key).is_some()).await
    }
}
