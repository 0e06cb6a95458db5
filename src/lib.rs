//! Mini Cache - An embeddable in-process key/value cache
//!
//! Provides a thread-safe table with per-entry TTL, an optional capacity
//! bound, a stoppable background sweeper and hit/miss statistics.
//!
//! ```
//! use std::time::Duration;
//! use mini_cache::{Cache, CacheConfig, CacheError};
//!
//! # #[tokio::main]
//! # async fn main() -> mini_cache::Result<()> {
//! let cache: Cache<String, String> = Cache::new(CacheConfig::default())?;
//!
//! cache
//!     .set("user:1".to_string(), "Alice".to_string(), Duration::from_secs(60))
//!     .await?;
//! assert_eq!(cache.get("user:1").await?, "Alice");
//! assert_eq!(cache.get("user:2").await, Err(CacheError::NotFound));
//!
//! cache.stop().await;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, CacheStats};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use tasks::spawn_cleanup_task;
