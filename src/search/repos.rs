// Multi-scope repository search.
// Runs one cached, paginated query per organization (plus the user scope),
// then merges and deduplicates the results.

use std::collections::HashSet;
use std::time::Duration;

use tracing::{debug, warn};

use crate::cache::{CacheStore, Fetched, maybe_cached, repo_search_key, split_keywords};
use crate::error::{ErrorKind, Result, SearchError};
use crate::github::Repository;

use super::backend::SearchBackend;
use super::outcome::SearchOutcome;
use super::paginate::{PageLimits, paginate};
use super::query::{QueryScope, SearchFilters, build_query};

/// Parameters for a repository search.
#[derive(Debug, Clone, PartialEq)]
pub struct RepoSearchParams {
    /// Organizations to search, in priority order.
    pub orgs: Vec<String>,
    /// Comma-separated keywords.
    pub keywords: Option<String>,
    /// Also list the authenticated user's own repositories (unfiltered).
    pub include_user: bool,
    pub cache_enabled: bool,
    /// Overrides the repository family's default TTL.
    pub cache_ttl: Option<Duration>,
    pub max_results: Option<usize>,
    pub max_pages: Option<u32>,
}

impl Default for RepoSearchParams {
    fn default() -> Self {
        Self {
            orgs: Vec::new(),
            keywords: None,
            include_user: false,
            cache_enabled: true,
            cache_ttl: None,
            max_results: None,
            max_pages: None,
        }
    }
}

impl RepoSearchParams {
    pub fn for_orgs<I, S>(orgs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            orgs: orgs.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    fn org_scopes(&self) -> Vec<&str> {
        self.orgs
            .iter()
            .map(|org| org.trim())
            .filter(|org| !org.is_empty())
            .collect()
    }

    /// Keywords rendered as free text for the query.
    fn keyword_text(&self) -> Option<String> {
        let tokens = split_keywords(self.keywords.as_deref().unwrap_or_default());
        if tokens.is_empty() {
            None
        } else {
            Some(tokens.join(" "))
        }
    }

    /// Reject requests with nothing to search.
    pub fn validate(&self) -> Result<()> {
        if self.org_scopes().is_empty() && !self.include_user {
            return Err(SearchError::Config(
                "no organizations configured; set GHSEARCH_ORGS or enable the user scope"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Search every scope in order and merge the results.
///
/// A failing scope is logged and contributes nothing; the others still run.
/// Earlier scopes win when the same repository appears more than once.
pub async fn search_repositories<B>(
    backend: &B,
    cache: Option<&CacheStore>,
    params: &RepoSearchParams,
) -> SearchOutcome<Repository>
where
    B: SearchBackend + ?Sized,
{
    if let Err(err) = params.validate() {
        return SearchOutcome::failure(&err);
    }

    let cache = cache.filter(|_| params.cache_enabled);
    let limits = PageLimits::new(params.max_pages, params.max_results);
    let keyword_text = params.keyword_text();

    let mut scopes: Vec<Result<Fetched<Vec<Repository>>>> = Vec::new();
    for org in params.org_scopes() {
        let keywords = keyword_text.as_deref();
        let result = search_org(backend, cache, params, limits, org, keywords).await;
        if let Err(err) = &result {
            warn!(org, error = %err, "organization search failed");
        }
        scopes.push(result);
    }
    if params.include_user {
        let result = search_user(backend, cache, params, limits).await;
        if let Err(err) = &result {
            warn!(error = %err, "user repository listing failed");
        }
        scopes.push(result);
    }

    merge_scopes(scopes, params.max_results)
}

async fn search_org<B>(
    backend: &B,
    cache: Option<&CacheStore>,
    params: &RepoSearchParams,
    limits: PageLimits,
    org: &str,
    keyword_text: Option<&str>,
) -> Result<Fetched<Vec<Repository>>>
where
    B: SearchBackend + ?Sized,
{
    let key = repo_search_key(&[org], params.keywords.as_deref(), false);
    let query = build_query(&SearchFilters {
        scope: Some(QueryScope::Org(org.to_string())),
        text: keyword_text.map(str::to_string),
        ..Default::default()
    });
    debug!(org, query = %query, key = %key, "searching organization");

    let query = query.as_str();
    maybe_cached(cache, &key, params.cache_ttl, move || {
        paginate(limits, move |page| async move {
            backend
                .search_repositories(query, page, limits.per_page)
                .await
                .map(|page| page.items)
        })
    })
    .await
}

async fn search_user<B>(
    backend: &B,
    cache: Option<&CacheStore>,
    params: &RepoSearchParams,
    limits: PageLimits,
) -> Result<Fetched<Vec<Repository>>>
where
    B: SearchBackend + ?Sized,
{
    let key = repo_search_key::<&str>(&[], None, true);
    debug!(key = %key, "listing user repositories");

    maybe_cached(cache, &key, params.cache_ttl, move || {
        paginate(limits, move |page| async move {
            backend.user_repositories(page, limits.per_page).await
        })
    })
    .await
}

/// Concatenate scope results in scope order, dedup by `full_name`, and apply the result cap.
///
/// When no scope succeeded and one was rejected for its credentials, the
/// search fails with that error so the caller can ask for a new login.
fn merge_scopes(
    scopes: Vec<Result<Fetched<Vec<Repository>>>>,
    max_results: Option<usize>,
) -> SearchOutcome<Repository> {
    if !scopes.iter().any(Result::is_ok) {
        let auth_failure = scopes.iter().find_map(|scope| match scope {
            Err(err) if err.kind() == ErrorKind::Authentication => Some(err),
            _ => None,
        });
        if let Some(err) = auth_failure {
            return SearchOutcome::failure(err);
        }
    }

    let served_from_cache = !scopes.is_empty()
        && scopes
            .iter()
            .all(|scope| matches!(scope, Ok(fetched) if fetched.from_cache));

    let mut seen = HashSet::new();
    let mut items: Vec<Repository> = scopes
        .into_iter()
        .filter_map(|scope| scope.ok())
        .flat_map(|fetched| fetched.data)
        .filter(|repo| seen.insert(repo.full_name.clone()))
        .collect();

    if let Some(max) = max_results {
        items.truncate(max);
    }

    let total_count = items.len() as u64;
    SearchOutcome::success(items, total_count, false, served_from_cache)
}
