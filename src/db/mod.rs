//! Database layer (single JSON document).

pub mod store;

pub use store::{DocumentStore, IdAllocator, StoreError, StoreSession};
