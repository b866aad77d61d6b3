use crate::{
    error::StoreResult,
    geo::{GeoPoint, Location},
};

pub trait Storage: Send + Sync {
    /// Persists a record and assigns it a unique identifier.
    /// Coordinates are validated by the caller.
    fn insert(&self, name: &str, point: GeoPoint) -> StoreResult<Location>;

    /// Returns the full record set, in insertion order.
    fn fetch_all(&self) -> StoreResult<Vec<Location>>;
}
