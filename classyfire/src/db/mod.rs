//! Database access for the classification cache

pub mod cache;

pub use cache::SqliteCacheStore;
