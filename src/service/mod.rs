pub mod ingest;
pub mod query;

// Publicly re-export the service types to simplify access from
// external code.
pub use ingest::*;
pub use query::*;
