//! LRU cache module

mod list;
mod lru;
mod shared;
mod stats;

pub use lru::LruCache;
pub use shared::SharedLruCache;
pub use stats::CacheStats;
