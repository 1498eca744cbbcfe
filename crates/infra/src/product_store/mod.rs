//! Product persistence boundary.
//!
//! This module defines the storage abstraction for product records and the
//! self-referential `sources` relation, with an in-memory backend (tests/dev)
//! and a Postgres backend (production).

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryProductStore;
pub use postgres::PostgresProductStore;
pub use r#trait::{ProductStore, StoreError, StoreResult};
