//! The set of collections the service works with.

use std::path::Path;

use crate::config::StorageConfig;
use crate::error::BackofficeResult;
use crate::models::{AttendanceRecord, Bill, Customer, Keep, Product, User};

use super::{Entity, JsonFileRepository, MemoryRepository, Repository};

/// A collection backend chosen at startup.
#[derive(Debug)]
pub enum Backend<T: Entity> {
    /// Documents kept in process.
    Memory(MemoryRepository<T>),
    /// Documents kept in a JSON file.
    JsonFile(JsonFileRepository<T>),
}

impl<T: Entity> Clone for Backend<T> {
    fn clone(&self) -> Self {
        match self {
            Backend::Memory(repo) => Backend::Memory(repo.clone()),
            Backend::JsonFile(repo) => Backend::JsonFile(repo.clone()),
        }
    }
}

impl<T: Entity> Backend<T> {
    fn from_config(storage: &StorageConfig) -> Self {
        match storage {
            StorageConfig::Memory => Backend::Memory(MemoryRepository::new()),
            StorageConfig::JsonFile { data_dir } => Backend::JsonFile(JsonFileRepository::new(data_dir)),
        }
    }
}

impl<T: Entity> Repository<T> for Backend<T> {
    async fn list(&self) -> BackofficeResult<Vec<T>> {
        match self {
            Backend::Memory(repo) => repo.list().await,
            Backend::JsonFile(repo) => repo.list().await,
        }
    }

    async fn save(&self, item: T) -> BackofficeResult<()> {
        match self {
            Backend::Memory(repo) => repo.save(item).await,
            Backend::JsonFile(repo) => repo.save(item).await,
        }
    }

    async fn delete(&self, id: &T::Id) -> BackofficeResult<()> {
        match self {
            Backend::Memory(repo) => repo.delete(id).await,
            Backend::JsonFile(repo) => repo.delete(id).await,
        }
    }

    async fn get(&self, id: &T::Id) -> BackofficeResult<Option<T>> {
        match self {
            Backend::Memory(repo) => repo.get(id).await,
            Backend::JsonFile(repo) => repo.get(id).await,
        }
    }
}

/// One adapter per entity type.
#[derive(Debug, Clone)]
pub struct Store {
    /// Registered users.
    pub users: Backend<User>,
    /// Customers.
    pub customers: Backend<Customer>,
    /// Product master.
    pub products: Backend<Product>,
    /// Bottle keeps.
    pub keeps: Backend<Keep>,
    /// Sales bills.
    pub bills: Backend<Bill>,
    /// Attendance records.
    pub attendance: Backend<AttendanceRecord>,
}

impl Store {
    /// Builds the store described by the storage configuration.
    pub fn from_config(storage: &StorageConfig) -> Self {
        Self {
            users: Backend::from_config(storage),
            customers: Backend::from_config(storage),
            products: Backend::from_config(storage),
            keeps: Backend::from_config(storage),
            bills: Backend::from_config(storage),
            attendance: Backend::from_config(storage),
        }
    }

    /// Builds an empty in-memory store.
    pub fn in_memory() -> Self {
        Self::from_config(&StorageConfig::Memory)
    }

    /// Builds a store backed by JSON files in `data_dir`.
    pub fn json_files(data_dir: impl AsRef<Path>) -> Self {
        Self::from_config(&StorageConfig::JsonFile {
            data_dir: data_dir.as_ref().to_path_buf(),
        })
    }
}
