//! Cache key generators for consistent key naming.

use roster_core::MemberId;

/// Prefix for all cache keys to namespace them.
const CACHE_PREFIX: &str = "roster:cache";

/// Generate a cache key for a member by ID.
#[must_use]
pub fn member_by_id(id: MemberId) -> String {
    format!("{}:member:id:{}", CACHE_PREFIX, id)
}

/// Pattern matching every cached member entry.
#[must_use]
pub fn member_pattern() -> String {
    format!("{}:member:*", CACHE_PREFIX)
}
