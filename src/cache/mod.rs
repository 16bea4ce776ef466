// Cache module for local filesystem caching.
// Stores search results per key with a TTL chosen by the key's family.

pub mod fetch;
pub mod key;
pub mod paths;
pub mod store;

pub use fetch::{Fetched, cached_or_fetch, maybe_cached};
pub use key::{
    CacheKey, KeyFamily, PULL_REQUEST_SEARCH_TTL, REPO_SEARCH_TTL, pull_request_key,
    repo_search_key, split_keywords,
};
pub use store::{CacheInfo, CacheRead, CacheStore, CachedData, ClearStats};
