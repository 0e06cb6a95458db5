//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache engine.
///
/// No variant is fatal: the cache stays usable after returning any of them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key not present in the cache
    #[error("Key not found")]
    NotFound,

    /// Key was present but its TTL had elapsed
    #[error("Key expired")]
    Expired,

    /// A new key was rejected because the cache holds `max_size` live entries
    #[error("Cache full: capacity of {0} entries reached")]
    CacheFull(usize),

    /// Configuration rejected at construction
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Environment problem, such as constructing outside a Tokio runtime
    #[error("Internal error: {0}")]
    Internal(String),
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
