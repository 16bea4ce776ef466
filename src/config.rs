// Runtime configuration.
// Reads GHSEARCH_* environment variables into search parameters and cache settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::CacheStore;
use crate::search::{MAX_PAGES, PullRequestSearchParams, RepoSearchParams};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Organizations searched for repositories, in priority order
    pub orgs: Vec<String>,
    /// Comma-separated keywords applied to organization searches
    pub keywords: Option<String>,
    /// Also list the authenticated user's repositories
    pub include_user: bool,
    /// Read and write the local cache
    pub cache_enabled: bool,
    /// TTL override in seconds (family defaults apply when unset)
    pub cache_ttl_secs: Option<u64>,
    /// Cache location (platform cache directory when unset)
    pub cache_dir: Option<PathBuf>,
    /// Maximum number of results returned
    pub max_results: Option<usize>,
    /// Maximum pages fetched per organization (capped at 10)
    pub max_pages: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            orgs: Vec::new(),
            keywords: None,
            include_user: false,
            cache_enabled: true,
            cache_ttl_secs: None,
            cache_dir: None,
            max_results: None,
            max_pages: MAX_PAGES,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable lookup (the process environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(orgs) = lookup("GHSEARCH_ORGS") {
            config.orgs = orgs
                .split(',')
                .map(str::trim)
                .filter(|org| !org.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(keywords) = lookup("GHSEARCH_KEYWORDS").filter(|v| !v.trim().is_empty()) {
            config.keywords = Some(keywords);
        }
        if let Some(flag) = lookup("GHSEARCH_INCLUDE_USER").and_then(|v| parse_bool(&v)) {
            config.include_user = flag;
        }
        if let Some(flag) = lookup("GHSEARCH_CACHE_ENABLED").and_then(|v| parse_bool(&v)) {
            config.cache_enabled = flag;
        }
        if let Some(ttl) = lookup("GHSEARCH_CACHE_TTL").and_then(|v| v.trim().parse().ok()) {
            config.cache_ttl_secs = Some(ttl);
        }
        if let Some(dir) = lookup("GHSEARCH_CACHE_DIR").filter(|v| !v.trim().is_empty()) {
            config.cache_dir = Some(PathBuf::from(dir));
        }
        if let Some(max) = lookup("GHSEARCH_MAX_RESULTS").and_then(|v| v.trim().parse().ok()) {
            config.max_results = Some(max);
        }
        let max_pages = lookup("GHSEARCH_MAX_PAGES").and_then(|v| v.trim().parse::<u32>().ok());
        if let Some(pages) = max_pages {
            config.max_pages = pages.clamp(1, MAX_PAGES);
        }

        config
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_secs.map(Duration::from_secs)
    }

    /// Cache store at the configured or platform location.
    pub fn cache_store(&self) -> Option<CacheStore> {
        match &self.cache_dir {
            Some(dir) => Some(CacheStore::new(dir)),
            None => CacheStore::open_default(),
        }
    }

    pub fn repo_params(&self) -> RepoSearchParams {
        RepoSearchParams {
            orgs: self.orgs.clone(),
            keywords: self.keywords.clone(),
            include_user: self.include_user,
            cache_enabled: self.cache_enabled,
            cache_ttl: self.cache_ttl(),
            max_results: self.max_results,
            max_pages: Some(self.max_pages),
        }
    }

    pub fn pull_request_params(&self, owner: &str, repo: &str) -> PullRequestSearchParams {
        PullRequestSearchParams {
            cache_enabled: self.cache_enabled,
            cache_ttl: self.cache_ttl(),
            max_results: self.max_results,
            ..PullRequestSearchParams::for_repo(owner, repo)
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
