//! In-process collection backend.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::BackofficeResult;

use super::{Entity, Repository};

/// A collection held in memory.
///
/// Clones share the same underlying documents.
#[derive(Debug)]
pub struct MemoryRepository<T: Entity> {
    documents: Arc<RwLock<BTreeMap<T::Id, T>>>,
}

impl<T: Entity> Clone for MemoryRepository<T> {
    fn clone(&self) -> Self {
        Self {
            documents: Arc::clone(&self.documents),
        }
    }
}

impl<T: Entity> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> MemoryRepository<T> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self {
            documents: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Creates a collection pre-populated with documents.
    pub fn with_documents(documents: impl IntoIterator<Item = T>) -> Self {
        let map = documents.into_iter().map(|doc| (doc.id(), doc)).collect();
        Self {
            documents: Arc::new(RwLock::new(map)),
        }
    }
}

impl<T: Entity> Repository<T> for MemoryRepository<T> {
    async fn list(&self) -> BackofficeResult<Vec<T>> {
        Ok(self.documents.read().await.values().cloned().collect())
    }

    async fn save(&self, item: T) -> BackofficeResult<()> {
        self.documents.write().await.insert(item.id(), item);
        Ok(())
    }

    async fn delete(&self, id: &T::Id) -> BackofficeResult<()> {
        self.documents.write().await.remove(id);
        Ok(())
    }

    async fn get(&self, id: &T::Id) -> BackofficeResult<Option<T>> {
        Ok(self.documents.read().await.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Keep;

    fn keep(id: i64) -> Keep {
        Keep {
            id,
            customer_id: 1,
            product_id: 2,
        }
    }

    #[tokio::test]
    async fn test_save_then_list() {
        let repo = MemoryRepository::new();
        repo.save(keep(2)).await.unwrap();
        repo.save(keep(1)).await.unwrap();

        let ids: Vec<i64> = repo.list().await.unwrap().iter().map(|k| k.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_save_replaces_same_id() {
        let repo = MemoryRepository::with_documents([keep(1)]);
        repo.save(Keep {
            id: 1,
            customer_id: 9,
            product_id: 9,
        })
        .await
        .unwrap();

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].customer_id, 9);
    }

    #[tokio::test]
    async fn test_delete_missing_id_is_ok() {
        let repo = MemoryRepository::with_documents([keep(1)]);
        repo.delete(&42).await.unwrap();
        repo.delete(&1).await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clones_share_documents() {
        let repo = MemoryRepository::new();
        let other = repo.clone();
        repo.save(keep(3)).await.unwrap();
        assert_eq!(other.get(&3).await.unwrap(), Some(keep(3)));
    }
}
