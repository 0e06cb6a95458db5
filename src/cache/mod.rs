//! Cache Module
//!
//! Provides the in-process cache engine with TTL expiration, capacity
//! enforcement and background sweeping.

mod engine;
mod entry;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use engine::Cache;
pub use entry::CacheEntry;
pub use stats::{CacheMetrics, CacheStats};
pub use store::CacheStore;
