//! LRU Cache Core
//!
//! This crate provides a fixed-capacity, least-recently-used key/value
//! cache with O(1) lookup, insertion and eviction, along with its
//! configuration, statistics and a lock-guarded handle for shared use.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheStats, LruCache, SharedLruCache};
pub use config::CacheConfig;
pub use error::CoreError;
