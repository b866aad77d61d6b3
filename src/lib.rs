/// Server configuration loading.
pub mod config;
/// Storage engine abstraction and implementations (InMemory).
pub mod engine;
/// Common error types: storage, service taxonomy.
pub mod error;
/// Geo primitives: points, records, haversine, spatial index snapshot.
pub mod geo;
/// Index manager: current snapshot ownership and rebuild coordination.
pub mod index;
/// Console logging via tracing.
pub mod logging;
/// Query and ingestion services over the index and the storage.
pub mod service;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// config
pub use config::{Settings, StorageConfig, StorageType};
/// Storage engines: InMemoryStore and the dispatch enum.
pub use engine::{InMemoryStore, Storage, StorageEngine};
/// Operation errors and result types.
pub use error::{ServiceError, ServiceResult, StoreError, StoreResult};
/// Geo data types and functions.
pub use geo::{
    haversine_km, validate_coords, GeoPoint, GeoSnapshot, Location, SnapshotStats,
    EARTH_RADIUS_KM,
};
/// Index manager and its stats.
pub use index::{IndexManager, IndexStats};
/// Services: nearest-neighbor queries and record ingestion.
pub use service::{IngestionService, NearbyLocation, QueryService, DEFAULT_LIMIT};
