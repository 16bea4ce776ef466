// Search service.
// Wires the credential provider, GitHub client, and cache into the public search operations.

use async_trait::async_trait;
use tracing::warn;

use crate::cache::{CacheInfo, CacheStore, ClearStats};
use crate::config::Config;
use crate::error::{Result, SearchError};
use crate::github::client::GITHUB_API_BASE;
use crate::github::{GitHubClient, Issue, Repository, SearchPage, TokenProvider};
use crate::search::{
    PullRequestSearchParams, RepoSearchParams, SearchBackend, SearchOutcome, pulls, repos,
};

/// Entry point for front ends. Every search returns an outcome; nothing is raised.
#[derive(Debug)]
pub struct SearchService {
    tokens: TokenProvider,
    cache: Option<CacheStore>,
    base_url: String,
}

impl SearchService {
    pub fn new(tokens: TokenProvider, cache: Option<CacheStore>) -> Self {
        Self {
            tokens,
            cache,
            base_url: GITHUB_API_BASE.to_string(),
        }
    }

    /// Service using the default token sources and the configured cache location.
    pub fn from_config(config: &Config) -> Self {
        let cache = config.cache_store();
        if cache.is_none() {
            warn!("no cache directory available, caching disabled");
        }
        Self::new(TokenProvider::new(), cache)
    }

    /// Point the service at a different API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn tokens(&self) -> &TokenProvider {
        &self.tokens
    }

    pub fn cache(&self) -> Option<&CacheStore> {
        self.cache.as_ref()
    }

    fn backend(&self) -> Result<AuthenticatedBackend<'_, GitHubClient>> {
        let token = self.tokens.token()?;
        let client = GitHubClient::with_base_url(&token, &self.base_url)?;
        Ok(AuthenticatedBackend {
            inner: client,
            tokens: &self.tokens,
        })
    }

    pub async fn search_repositories(
        &self,
        params: &RepoSearchParams,
    ) -> SearchOutcome<Repository> {
        if let Err(err) = params.validate() {
            return SearchOutcome::failure(&err);
        }
        let backend = match self.backend() {
            Ok(backend) => backend,
            Err(err) => return SearchOutcome::failure(&err),
        };
        repos::search_repositories(&backend, self.cache(), params).await
    }

    pub async fn search_pull_requests(
        &self,
        params: &PullRequestSearchParams,
    ) -> SearchOutcome<Issue> {
        if let Err(err) = params.validate() {
            return SearchOutcome::failure(&err);
        }
        let backend = match self.backend() {
            Ok(backend) => backend,
            Err(err) => return SearchOutcome::failure(&err),
        };
        pulls::search_pull_requests(&backend, self.cache(), params).await
    }

    /// Remove every cache entry.
    pub fn clear_all_cache(&self) -> ClearStats {
        self.cache
            .as_ref()
            .map(CacheStore::clear_all)
            .unwrap_or_default()
    }

    pub fn cache_info(&self) -> Result<CacheInfo> {
        match &self.cache {
            Some(cache) => cache.info(),
            None => Err(SearchError::Config(
                "no cache directory available".to_string(),
            )),
        }
    }
}

/// Backend that drops the cached token when GitHub rejects it.
struct AuthenticatedBackend<'a, B> {
    inner: B,
    tokens: &'a TokenProvider,
}

impl<B> AuthenticatedBackend<'_, B> {
    fn observe<T>(&self, result: Result<T>) -> Result<T> {
        if matches!(result, Err(SearchError::Unauthorized)) {
            self.tokens.invalidate();
        }
        result
    }
}

#[async_trait]
impl<'a, B: SearchBackend> SearchBackend for AuthenticatedBackend<'a, B> {
    async fn search_repositories(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<SearchPage<Repository>> {
        let result = self.inner.search_repositories(query, page, per_page).await;
        self.observe(result)
    }

    async fn user_repositories(&self, page: u32, per_page: u32) -> Result<Vec<Repository>> {
        let result = self.inner.user_repositories(page, per_page).await;
        self.observe(result)
    }

    async fn search_issues(
        &self,
        query: &str,
        sort: &str,
        order: &str,
        page: u32,
        per_page: u32,
    ) -> Result<SearchPage<Issue>> {
        let result = self
            .inner
            .search_issues(query, sort, order, page, per_page)
            .await;
        self.observe(result)
    }
}
