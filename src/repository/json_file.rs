//! File-backed collection backend.
//!
//! Each collection is one pretty-printed JSON array stored as
//! `<data_dir>/<collection>.json`. A missing file is an empty collection.
//! Writes go to `<collection>.json.tmp` first and are renamed into place, so
//! the collection file always holds a complete array.

use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{BackofficeError, BackofficeResult};

use super::{Entity, Repository};

/// A collection stored as a JSON file.
#[derive(Debug)]
pub struct JsonFileRepository<T: Entity> {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Arc<Mutex<()>>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> Clone for JsonFileRepository<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            lock: Arc::clone(&self.lock),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> JsonFileRepository<T> {
    /// Creates a repository for `T::COLLECTION` inside `data_dir`.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(format!("{}.json", T::COLLECTION)),
            lock: Arc::new(Mutex::new(())),
            _entity: PhantomData,
        }
    }

    /// Returns the path of the collection file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn failure(message: impl std::fmt::Display) -> BackofficeError {
        BackofficeError::persistence(T::COLLECTION, message.to_string())
    }

    async fn read_all(&self) -> BackofficeResult<Vec<T>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(Self::failure(err)),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let mut documents: Vec<T> = serde_json::from_str(&content).map_err(Self::failure)?;
        documents.sort_by_key(|doc| doc.id());
        Ok(documents)
    }

    async fn write_all(&self, documents: &[T]) -> BackofficeResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(Self::failure)?;
        }
        let content = serde_json::to_string_pretty(documents).map_err(Self::failure)?;
        let staging = self.staging_path();
        fs::write(&staging, content).await.map_err(Self::failure)?;
        fs::rename(&staging, &self.path).await.map_err(Self::failure)?;
        debug!(
            collection = T::COLLECTION,
            documents = documents.len(),
            "Collection file written"
        );
        Ok(())
    }
}

impl<T: Entity> Repository<T> for JsonFileRepository<T> {
    async fn list(&self) -> BackofficeResult<Vec<T>> {
        let _guard = self.lock.lock().await;
        self.read_all().await
    }

    async fn save(&self, item: T) -> BackofficeResult<()> {
        let _guard = self.lock.lock().await;
        let mut documents = self.read_all().await?;
        let id = item.id();
        match documents.iter_mut().find(|doc| doc.id() == id) {
            Some(existing) => *existing = item,
            None => documents.push(item),
        }
        self.write_all(&documents).await
    }

    async fn delete(&self, id: &T::Id) -> BackofficeResult<()> {
        let _guard = self.lock.lock().await;
        let mut documents = self.read_all().await?;
        let before = documents.len();
        documents.retain(|doc| doc.id() != *id);
        if documents.len() == before {
            return Ok(());
        }
        self.write_all(&documents).await
    }
}
