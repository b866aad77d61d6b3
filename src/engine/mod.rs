//! Storage abstractions for the location catalog.
//!
//! The persistence collaborator is deliberately narrow: insert a
//! record (the store assigns the identifier) and fetch the full
//! record set. Index rebuilds read through `fetch_all`; they tolerate
//! a stale read, so read-committed consistency is enough.

pub mod memory;
pub mod storage;
pub mod store;

pub use memory::*;
pub use storage::*;
pub use store::*;
