// Cache-or-fetch orchestration.
// Serves valid entries from the store and falls back to a fetch operation on a miss.

use std::future::Future;
use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::error::Result;

use super::key::CacheKey;
use super::store::{CacheRead, CacheStore};

/// Data together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub data: T,
    pub from_cache: bool,
}

impl<T> Fetched<T> {
    pub fn fresh(data: T) -> Self {
        Self {
            data,
            from_cache: false,
        }
    }

    pub fn cached(data: T) -> Self {
        Self {
            data,
            from_cache: true,
        }
    }
}

/// Return the cached value for `key`, or run `fetch` once and cache its result.
///
/// Fetch errors propagate. Cache errors never do: a failed write is logged and
/// the fresh data is still returned, and a failed read falls back to `fetch`
/// without attempting a write.
pub async fn cached_or_fetch<T, F, Fut>(
    store: &CacheStore,
    key: &CacheKey,
    ttl: Option<Duration>,
    fetch: F,
) -> Result<Fetched<T>>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match store.lookup::<T>(key) {
        CacheRead::Hit(data) => Ok(Fetched::cached(data)),
        CacheRead::Miss => {
            debug!(key = %key, "cache miss, fetching");
            let data = fetch().await?;
            if let Err(err) = store.write(key, &data, ttl) {
                warn!(key = %key, error = %err, "failed to write cache entry");
            }
            Ok(Fetched::fresh(data))
        }
        CacheRead::Unavailable(err) => {
            warn!(key = %key, error = %err, "cache unavailable, fetching without caching");
            fetch().await.map(Fetched::fresh)
        }
    }
}

/// Like [`cached_or_fetch`], but runs `fetch` directly when no store is given.
pub async fn maybe_cached<T, F, Fut>(
    store: Option<&CacheStore>,
    key: &CacheKey,
    ttl: Option<Duration>,
    fetch: F,
) -> Result<Fetched<T>>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match store {
        Some(store) => cached_or_fetch(store, key, ttl, fetch).await,
        None => fetch().await.map(Fetched::fresh),
    }
}
