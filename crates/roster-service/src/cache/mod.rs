//! Caching infrastructure for the service layer.
//!
//! Member lookups by id are cached in process. Set-based writes do not pass
//! through the cache, so callers invalidate after them.

mod cache_interface;
pub mod cache_keys;
mod memory_cache;

pub use cache_interface::{CacheExt, CacheInterface};
pub use memory_cache::{CacheEntry, MemoryCacheService, MemoryCacheServiceParameters, DEFAULT_TTL};
