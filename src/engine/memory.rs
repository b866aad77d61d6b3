use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use dashmap::DashMap;

use super::storage::Storage;
use crate::{
    error::StoreResult,
    geo::{GeoPoint, Location},
};

pub struct InMemoryStore {
    pub data: Arc<DashMap<u64, Location>>,
    next_id: AtomicU64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            data: Arc::new(DashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for InMemoryStore {
    fn insert(&self, name: &str, point: GeoPoint) -> StoreResult<Location> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let location = Location {
            id,
            name: name.to_string(),
            point,
        };
        self.data.insert(id, location.clone());
        Ok(location)
    }

    fn fetch_all(&self) -> StoreResult<Vec<Location>> {
        let mut records: Vec<Location> = self.data.iter().map(|entry| entry.value().clone()).collect();
        // DashMap не упорядочен, восстанавливаем порядок вставки по id
        records.sort_by_key(|loc| loc.id);
        Ok(records)
    }
}
