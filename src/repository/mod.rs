//! Persistence adapters for the document collections.
//!
//! Every entity type lives in its own collection keyed by id and is reached
//! through the [`Repository`] trait: `list`, `save` (upsert) and `delete`.
//! Two backends are provided: [`MemoryRepository`] keeps documents in
//! process, [`JsonFileRepository`] keeps one JSON file per collection.
//!
//! Writes are plain last-write-wins upserts. There is no optimistic
//! concurrency token and no retry; a failed call is returned to the caller.

mod json_file;
mod memory;
mod store;

use std::fmt::{Debug, Display};
use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::BackofficeResult;

pub use json_file::JsonFileRepository;
pub use memory::MemoryRepository;
pub use store::{Backend, Store};

/// A document type stored in a collection.
pub trait Entity: Debug + Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The document key.
    type Id: Debug + Clone + Ord + Display + Send + Sync + 'static;

    /// Name of the collection holding this entity.
    const COLLECTION: &'static str;

    /// Returns the document key.
    fn id(&self) -> Self::Id;
}

/// List/save/delete access to one collection.
pub trait Repository<T: Entity>: Send + Sync {
    /// Returns every document in the collection, ordered by id.
    fn list(&self) -> impl Future<Output = BackofficeResult<Vec<T>>> + Send;

    /// Inserts the document, or replaces the one with the same id.
    fn save(&self, item: T) -> impl Future<Output = BackofficeResult<()>> + Send;

    /// Removes the document with the given id. Removing a missing id is not an error.
    fn delete(&self, id: &T::Id) -> impl Future<Output = BackofficeResult<()>> + Send;

    /// Returns the document with the given id, if present.
    fn get(&self, id: &T::Id) -> impl Future<Output = BackofficeResult<Option<T>>> + Send {
        async move {
            Ok(self
                .list()
                .await?
                .into_iter()
                .find(|item| item.id() == *id))
        }
    }
}
