// Cache store for reading and writing cached search results.
// Handles JSON serialization, TTL checking, and filesystem operations.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned, de::IgnoredAny};
use tracing::{debug, info, warn};

use crate::error::{Result, SearchError};

use super::key::CacheKey;
use super::paths;

/// Wrapper for cached data with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    /// The full cache key. Distinct keys can share a sanitized file name.
    pub key: String,
    /// The cached data.
    pub data: T,
    /// When the data was cached.
    pub stored_at: DateTime<Utc>,
    /// Lifetime of the entry in seconds.
    pub ttl_seconds: f64,
}

impl<T> CachedData<T> {
    /// Create a new cached data entry stamped with the current time.
    pub fn new(key: &CacheKey, data: T, ttl: Duration) -> Self {
        Self {
            key: key.as_str().to_string(),
            data,
            stored_at: Utc::now(),
            ttl_seconds: ttl.as_secs_f64(),
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::try_from_secs_f64(self.ttl_seconds).unwrap_or(Duration::ZERO)
    }

    /// Check if this cached data has expired. Evaluated against the clock on every call.
    pub fn is_expired(&self) -> bool {
        let elapsed = Utc::now()
            .signed_duration_since(self.stored_at)
            .to_std()
            .unwrap_or(Duration::MAX);

        elapsed >= self.ttl()
    }

    /// Check if this cached data is still valid (not expired).
    pub fn is_valid(&self) -> bool {
        !self.is_expired()
    }
}

/// Result of looking a key up in the store.
#[derive(Debug)]
pub enum CacheRead<T> {
    /// A valid entry was found.
    Hit(T),
    /// No entry, an expired entry, or an entry that failed to decode.
    Miss,
    /// The storage layer itself failed.
    Unavailable(SearchError),
}

/// Diagnostic summary of the cache directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheInfo {
    pub location: PathBuf,
    pub entry_count: usize,
    pub total_bytes: u64,
}

/// Counts reported by [`CacheStore::clear_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearStats {
    pub removed_count: usize,
    pub error_count: usize,
}

/// One-file-per-key TTL store rooted at a directory.
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the platform cache directory.
    pub fn open_default() -> Option<Self> {
        paths::cache_dir().map(Self::new)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &CacheKey) -> PathBuf {
        paths::entry_path(&self.dir, key.as_str())
    }

    /// Look up a key, distinguishing a miss from a storage failure.
    pub fn lookup<T: DeserializeOwned>(&self, key: &CacheKey) -> CacheRead<T> {
        let path = self.path_for(key);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return CacheRead::Miss,
            Err(err) => return CacheRead::Unavailable(err.into()),
        };

        match serde_json::from_str::<CachedData<T>>(&contents) {
            Ok(cached) if cached.key != key.as_str() => {
                debug!(key = %key, stored = %cached.key, "cache file holds another key");
                CacheRead::Miss
            }
            Ok(cached) if cached.is_valid() => {
                debug!(key = %key, "cache hit");
                CacheRead::Hit(cached.data)
            }
            Ok(_) => {
                debug!(key = %key, "cache entry expired");
                CacheRead::Miss
            }
            Err(err) => {
                debug!(key = %key, error = %err, "unreadable cache entry");
                CacheRead::Miss
            }
        }
    }

    /// Read a valid entry. Any failure is reported as absent.
    pub fn read<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        match self.lookup(key) {
            CacheRead::Hit(data) => Some(data),
            CacheRead::Miss => None,
            CacheRead::Unavailable(err) => {
                warn!(key = %key, error = %err, "cache read failed");
                None
            }
        }
    }

    /// Write an entry, replacing any previous one for the key.
    /// Without an override the key family's default TTL applies.
    pub fn write<T: Serialize>(
        &self,
        key: &CacheKey,
        data: &T,
        ttl: Option<Duration>,
    ) -> Result<()> {
        let ttl = ttl.unwrap_or_else(|| key.family().default_ttl());
        let path = self.path_for(key);

        fs::create_dir_all(&self.dir)?;

        let cached = CachedData::new(key, data, ttl);
        let json = serde_json::to_string_pretty(&cached)?;

        // Write atomically via temp file
        let temp_path = path.with_extension("tmp");
        if let Err(err) = write_file(&temp_path, json.as_bytes()) {
            let _ = fs::remove_file(&temp_path);
            return Err(err.into());
        }
        if let Err(err) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(err.into());
        }

        debug!(key = %key, ttl_secs = ttl.as_secs_f64(), "cache entry written");
        Ok(())
    }

    /// Whether a valid entry exists for the key.
    pub fn is_valid(&self, key: &CacheKey) -> bool {
        matches!(self.lookup::<IgnoredAny>(key), CacheRead::Hit(_))
    }

    /// Delete one entry. Returns whether a file was removed.
    pub fn remove(&self, key: &CacheKey) -> bool {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => true,
            Err(err) if err.kind() == io::ErrorKind::NotFound => false,
            Err(err) => {
                warn!(key = %key, error = %err, "failed to remove cache entry");
                false
            }
        }
    }

    /// Remove every entry in the directory, counting failures instead of stopping on them.
    pub fn clear_all(&self) -> ClearStats {
        let mut stats = ClearStats::default();

        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return stats,
            Err(err) => {
                warn!(dir = %self.dir.display(), error = %err, "failed to list cache directory");
                stats.error_count += 1;
                return stats;
            }
        };

        for entry in entries {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(_) => {
                    stats.error_count += 1;
                    continue;
                }
            };
            if !paths::is_entry_file(&path) {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => stats.removed_count += 1,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "failed to remove cache entry");
                    stats.error_count += 1;
                }
            }
        }

        info!(
            removed = stats.removed_count,
            errors = stats.error_count,
            "cache cleared"
        );
        stats
    }

    /// Count entries and their total size on disk.
    pub fn info(&self) -> Result<CacheInfo> {
        let mut info = CacheInfo {
            location: self.dir.clone(),
            entry_count: 0,
            total_bytes: 0,
        };

        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(info),
            Err(err) => return Err(err.into()),
        };

        for entry in entries {
            let entry = entry?;
            if !paths::is_entry_file(&entry.path()) {
                continue;
            }
            info.entry_count += 1;
            info.total_bytes += entry.metadata()?.len();
        }

        Ok(info)
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::key::{KeyFamily, PULL_REQUEST_SEARCH_TTL, REPO_SEARCH_TTL};
    use tempfile::TempDir;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct TestData {
        name: String,
        value: i32,
    }

    fn sample() -> TestData {
        TestData {
            name: "test".to_string(),
            value: 42,
        }
    }

    fn read_raw(store: &CacheStore, key: &CacheKey) -> CachedData<TestData> {
        let contents = fs::read_to_string(store.path_for(key)).unwrap();
        serde_json::from_str(&contents).unwrap()
    }

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path());
        let key = CacheKey::new(KeyFamily::RepoSearch, "repos:acme:");

        store.write(&key, &sample(), None).unwrap();

        assert_eq!(store.read::<TestData>(&key), Some(sample()));
        assert!(store.is_valid(&key));
    }

    #[test]
    fn test_read_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path().join("missing"));
        let key = CacheKey::from_raw("repos:nobody:");

        assert!(store.read::<TestData>(&key).is_none());
        assert!(matches!(store.lookup::<TestData>(&key), CacheRead::Miss));
        assert!(!store.is_valid(&key));
    }

    #[test]
    fn test_ttl_boundary() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path());
        let key = CacheKey::from_raw("repos:short-lived:");

        store
            .write(&key, &sample(), Some(Duration::from_millis(100)))
            .unwrap();
        assert_eq!(store.read::<TestData>(&key), Some(sample()));

        std::thread::sleep(Duration::from_millis(200));
        assert!(store.read::<TestData>(&key).is_none());
        assert!(!store.is_valid(&key));

        // Expired entries stay on disk until cleared.
        assert!(store.path_for(&key).exists());
    }

    #[test]
    fn test_family_default_ttl() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path());

        let repo_key = CacheKey::from_raw("repos:acme:");
        let pr_key = CacheKey::from_raw("prs:o/r:");
        let other_key = CacheKey::from_raw("unrecognized");
        store.write(&repo_key, &sample(), None).unwrap();
        store.write(&pr_key, &sample(), None).unwrap();
        store.write(&other_key, &sample(), None).unwrap();

        assert_eq!(read_raw(&store, &repo_key).ttl(), REPO_SEARCH_TTL);
        assert_eq!(read_raw(&store, &pr_key).ttl(), PULL_REQUEST_SEARCH_TTL);
        assert_eq!(read_raw(&store, &other_key).ttl(), REPO_SEARCH_TTL);

        store
            .write(&pr_key, &sample(), Some(Duration::from_secs(30)))
            .unwrap();
        assert_eq!(read_raw(&store, &pr_key).ttl(), Duration::from_secs(30));
    }

    #[test]
    fn test_overwrite_replaces_entry() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path());
        let key = CacheKey::from_raw("repos:acme:");

        store.write(&key, &sample(), None).unwrap();
        let updated = TestData {
            name: "updated".to_string(),
            value: 7,
        };
        store.write(&key, &updated, None).unwrap();

        assert_eq!(store.read::<TestData>(&key), Some(updated));
        assert!(!store.path_for(&key).with_extension("tmp").exists());
    }

    #[test]
    fn test_corrupt_entry_is_a_miss() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path());
        let key = CacheKey::from_raw("repos:acme:");

        fs::write(store.path_for(&key), "{ not json").unwrap();

        assert!(matches!(store.lookup::<TestData>(&key), CacheRead::Miss));
        assert!(store.read::<TestData>(&key).is_none());
    }

    #[test]
    fn test_unreadable_entry_is_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path());
        let key = CacheKey::from_raw("repos:acme:");

        // A directory where the entry file should be cannot be read as a file.
        fs::create_dir_all(store.path_for(&key)).unwrap();

        assert!(matches!(
            store.lookup::<TestData>(&key),
            CacheRead::Unavailable(_)
        ));
        assert!(store.read::<TestData>(&key).is_none());
    }

    #[test]
    fn test_keys_sharing_a_file_name_do_not_collide() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path());
        let dotted = CacheKey::from_raw("repos:acme:node.js");
        let spaced = CacheKey::from_raw("repos:acme:node js");
        assert_eq!(store.path_for(&dotted), store.path_for(&spaced));

        store.write(&dotted, &sample(), None).unwrap();

        assert_eq!(store.read::<TestData>(&dotted), Some(sample()));
        assert!(matches!(store.lookup::<TestData>(&spaced), CacheRead::Miss));
        assert!(!store.is_valid(&spaced));
        assert_eq!(read_raw(&store, &dotted).key, "repos:acme:node.js");
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path());
        let key = CacheKey::from_raw("repos:acme:");
        // A non-empty directory at the entry path cannot be replaced by a file.
        let entry = store.path_for(&key);
        fs::create_dir_all(entry.join("occupied")).unwrap();

        assert!(store.write(&key, &sample(), None).is_err());
        assert!(!entry.with_extension("tmp").exists());
        assert!(entry.is_dir());
    }

    #[test]
    fn test_remove() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path());
        let key = CacheKey::from_raw("prs:o/r:");

        store.write(&key, &sample(), None).unwrap();
        assert!(store.remove(&key));
        assert!(!store.remove(&key));
        assert!(store.read::<TestData>(&key).is_none());
    }

    #[test]
    fn test_clear_all_and_info() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path());

        for raw in ["repos:a:", "repos:b:", "prs:o/r:"] {
            store.write(&CacheKey::from_raw(raw), &sample(), None).unwrap();
        }
        fs::write(temp_dir.path().join("notes.txt"), "not a cache entry").unwrap();

        let info = store.info().unwrap();
        assert_eq!(info.location, temp_dir.path());
        assert_eq!(info.entry_count, 3);
        assert!(info.total_bytes > 0);

        let stats = store.clear_all();
        assert_eq!(stats.removed_count, 3);
        assert_eq!(stats.error_count, 0);
        assert_eq!(store.info().unwrap().entry_count, 0);
        assert!(temp_dir.path().join("notes.txt").exists());
    }

    #[test]
    fn test_clear_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path().join("never-created"));

        assert_eq!(store.clear_all(), ClearStats::default());
        assert_eq!(store.info().unwrap().entry_count, 0);
    }

    #[test]
    fn test_expired_data() {
        let key = CacheKey::from_raw("repos:acme:");
        let mut data = CachedData::new(&key, "test", Duration::from_secs(300));
        assert!(data.is_valid());

        // Set stored_at to the past
        data.stored_at = Utc::now() - chrono::Duration::seconds(600);
        assert!(data.is_expired());
    }
}
