pub mod geo_base;
pub mod geo_distance;
pub mod geo_index;

// Publicly re-export all types and functions from the submodules to
// simplify access from external code.
pub use geo_base::*;
pub use geo_distance::*;
pub use geo_index::*;
