use super::InMemoryStore;
use crate::{
    config::{StorageConfig, StorageType},
    error::StoreResult,
    geo::{GeoPoint, Location},
    Storage,
};

pub enum StorageEngine {
    Memory(InMemoryStore),
}

impl StorageEngine {
    pub fn insert(&self, name: &str, point: GeoPoint) -> StoreResult<Location> {
        match self {
            StorageEngine::Memory(store) => store.insert(name, point),
        }
    }

    pub fn fetch_all(&self) -> StoreResult<Vec<Location>> {
        match self {
            StorageEngine::Memory(store) => store.fetch_all(),
        }
    }

    /// Initialize storage engine based on the passed configuration.
    pub fn initialize(config: &StorageConfig) -> StoreResult<Self> {
        match &config.storage_type {
            StorageType::Memory => Ok(Self::Memory(InMemoryStore::new())),
        }
    }

    /// Gets a reference to a specific storage via the `Storage` common trait.
    pub fn get_store(&self) -> &dyn Storage {
        match self {
            Self::Memory(store) => store,
        }
    }
}

impl Storage for StorageEngine {
    fn insert(&self, name: &str, point: GeoPoint) -> StoreResult<Location> {
        StorageEngine::insert(self, name, point)
    }

    fn fetch_all(&self) -> StoreResult<Vec<Location>> {
        StorageEngine::fetch_all(self)
    }
}
