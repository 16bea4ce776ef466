// Cache key derivation.
// Builds deterministic, order-independent keys for each search family.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::time::Duration;

/// Default TTL for repository search results: one week.
pub const REPO_SEARCH_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Default TTL for pull request search results: one day.
pub const PULL_REQUEST_SEARCH_TTL: Duration = Duration::from_secs(24 * 60 * 60);

const USER_SCOPE_MARKER: &str = "with-user";
const PAIR_SEPARATOR: &str = "|";

/// Family a cache key belongs to. Each family carries its own default TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyFamily {
    RepoSearch,
    PullRequestSearch,
}

impl KeyFamily {
    /// Prefix written at the start of every key in this family.
    pub fn tag(&self) -> &'static str {
        match self {
            KeyFamily::RepoSearch => "repos",
            KeyFamily::PullRequestSearch => "prs",
        }
    }

    /// TTL applied when a write supplies no override.
    pub fn default_ttl(&self) -> Duration {
        match self {
            KeyFamily::RepoSearch => REPO_SEARCH_TTL,
            KeyFamily::PullRequestSearch => PULL_REQUEST_SEARCH_TTL,
        }
    }

    /// Recover the family of a raw key from its prefix.
    /// Keys with no recognized prefix belong to the repository family.
    pub fn from_key(raw: &str) -> Self {
        let tag = raw.split(':').next().unwrap_or_default();
        if tag == KeyFamily::PullRequestSearch.tag() {
            KeyFamily::PullRequestSearch
        } else {
            KeyFamily::RepoSearch
        }
    }
}

/// A cache key tagged with its family.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    family: KeyFamily,
    key: String,
}

impl CacheKey {
    pub fn new(family: KeyFamily, key: impl Into<String>) -> Self {
        Self {
            family,
            key: key.into(),
        }
    }

    /// Wrap an untyped key, inferring its family from the prefix.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        let key = raw.into();
        Self {
            family: KeyFamily::from_key(&key),
            key,
        }
    }

    pub fn family(&self) -> KeyFamily {
        self.family
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

/// Split a comma-separated keyword string into trimmed, non-empty tokens.
/// Input order is preserved.
pub fn split_keywords(keywords: &str) -> Vec<String> {
    keywords
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Key for a repository search over a set of organizations.
///
/// Organizations are compared case-insensitively and keywords are compared as a
/// set, so reordering either list or padding keywords with whitespace yields the
/// same key.
pub fn repo_search_key<S: AsRef<str>>(
    orgs: &[S],
    keywords: Option<&str>,
    include_user: bool,
) -> CacheKey {
    let orgs: BTreeSet<String> = orgs
        .iter()
        .map(|org| org.as_ref().trim().to_lowercase())
        .filter(|org| !org.is_empty())
        .collect();
    let keywords: BTreeSet<String> = keywords
        .map(split_keywords)
        .unwrap_or_default()
        .into_iter()
        .collect();

    let mut key = format!(
        "{}:{}:{}",
        KeyFamily::RepoSearch.tag(),
        join(&orgs, ","),
        join(&keywords, ",")
    );
    if include_user {
        key.push(':');
        key.push_str(USER_SCOPE_MARKER);
    }

    CacheKey::new(KeyFamily::RepoSearch, key)
}

/// Key for a pull request search in one repository.
///
/// Filters are rendered as `name:value` pairs sorted by name. Callers pass only
/// the filters they set; an omitted filter never appears in the key.
pub fn pull_request_key<I, K, V>(owner: &str, repo: &str, filters: I) -> CacheKey
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let filters: BTreeMap<String, String> = filters
        .into_iter()
        .map(|(name, value)| (name.into(), value.into()))
        .collect();
    let pairs: Vec<String> = filters
        .iter()
        .map(|(name, value)| format!("{}:{}", name, value))
        .collect();

    let key = format!(
        "{}:{}/{}:{}",
        KeyFamily::PullRequestSearch.tag(),
        owner,
        repo,
        pairs.join(PAIR_SEPARATOR)
    );
    CacheKey::new(KeyFamily::PullRequestSearch, key)
}

fn join(set: &BTreeSet<String>, separator: &str) -> String {
    set.iter().map(String::as_str).collect::<Vec<_>>().join(separator)
}
