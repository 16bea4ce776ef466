// Pull request search in a single repository.

use std::collections::HashSet;
use std::time::Duration;

use tracing::debug;

use crate::cache::{CacheKey, CacheStore, maybe_cached, pull_request_key};
use crate::error::{Result, SearchError};
use crate::github::{Issue, SearchPage};

use super::backend::SearchBackend;
use super::outcome::SearchOutcome;
use super::paginate::PER_PAGE;
use super::query::{QueryScope, SearchFilters, build_query};

pub const DEFAULT_SORT: &str = "updated";
pub const DEFAULT_ORDER: &str = "desc";

/// Parameters for a pull request search.
#[derive(Debug, Clone, PartialEq)]
pub struct PullRequestSearchParams {
    pub owner: String,
    pub repo: String,
    /// Alternative states; `all` disables state filtering.
    pub states: Vec<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub author: Option<String>,
    pub assignee: Option<String>,
    pub labels: Vec<String>,
    pub query: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub max_results: Option<usize>,
    pub cache_enabled: bool,
    /// Overrides the pull request family's default TTL.
    pub cache_ttl: Option<Duration>,
}

impl Default for PullRequestSearchParams {
    fn default() -> Self {
        Self {
            owner: String::new(),
            repo: String::new(),
            states: vec!["open".to_string()],
            sort: None,
            order: None,
            author: None,
            assignee: None,
            labels: Vec::new(),
            query: None,
            date_from: None,
            date_to: None,
            max_results: None,
            cache_enabled: true,
            cache_ttl: None,
        }
    }
}

impl PullRequestSearchParams {
    pub fn for_repo(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.owner.trim().is_empty() || self.repo.trim().is_empty() {
            return Err(SearchError::Config(
                "pull request search needs both an owner and a repository".to_string(),
            ));
        }
        Ok(())
    }

    pub fn sort(&self) -> &str {
        self.sort.as_deref().unwrap_or(DEFAULT_SORT)
    }

    pub fn order(&self) -> &str {
        self.order.as_deref().unwrap_or(DEFAULT_ORDER)
    }

    /// Page size for the single request: the result cap, bounded by the API maximum.
    pub fn per_page(&self) -> u32 {
        self.max_results
            .map_or(PER_PAGE, |max| max.clamp(1, PER_PAGE as usize) as u32)
    }

    pub fn filters(&self) -> SearchFilters {
        SearchFilters {
            scope: Some(QueryScope::Repo {
                owner: self.owner.trim().to_string(),
                repo: self.repo.trim().to_string(),
            }),
            pull_requests: true,
            states: self.states.clone(),
            author: self.author.clone(),
            assignee: self.assignee.clone(),
            labels: self.labels.clone(),
            date_from: self.date_from.clone(),
            date_to: self.date_to.clone(),
            text: self.query.clone(),
        }
    }

    /// Cache key built from the filters that were actually set.
    pub fn cache_key(&self) -> CacheKey {
        let mut filters: Vec<(&str, String)> = Vec::new();
        if !self.states.is_empty() {
            filters.push(("state", self.states.join(",")));
        }
        let optional = [
            ("sort", &self.sort),
            ("order", &self.order),
            ("author", &self.author),
            ("assignee", &self.assignee),
            ("query", &self.query),
            ("from", &self.date_from),
            ("to", &self.date_to),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                filters.push((name, value.clone()));
            }
        }
        if !self.labels.is_empty() {
            filters.push(("labels", self.labels.join(",")));
        }
        if let Some(max) = self.max_results {
            filters.push(("limit", max.to_string()));
        }

        pull_request_key(self.owner.trim(), self.repo.trim(), filters)
    }
}

/// Search pull requests in one repository with a single request.
pub async fn search_pull_requests<B>(
    backend: &B,
    cache: Option<&CacheStore>,
    params: &PullRequestSearchParams,
) -> SearchOutcome<Issue>
where
    B: SearchBackend + ?Sized,
{
    match run(backend, cache, params).await {
        Ok(outcome) => outcome,
        Err(err) => {
            debug!(
                owner = %params.owner,
                repo = %params.repo,
                error = %err,
                "pull request search failed"
            );
            SearchOutcome::failure(&err)
        }
    }
}

async fn run<B>(
    backend: &B,
    cache: Option<&CacheStore>,
    params: &PullRequestSearchParams,
) -> Result<SearchOutcome<Issue>>
where
    B: SearchBackend + ?Sized,
{
    params.validate()?;

    let cache = cache.filter(|_| params.cache_enabled);
    let query = build_query(&params.filters());
    let key = params.cache_key();
    debug!(query = %query, key = %key, "searching pull requests");

    let (sort, order, per_page) = (params.sort(), params.order(), params.per_page());
    let query = query.as_str();
    let fetched = maybe_cached(cache, &key, params.cache_ttl, move || async move {
        backend.search_issues(query, sort, order, 1, per_page).await
    })
    .await?;

    let SearchPage {
        total_count,
        incomplete_results,
        items,
    } = fetched.data;

    let mut seen = HashSet::new();
    let mut items: Vec<Issue> = items
        .into_iter()
        .filter(|issue| seen.insert(issue.number))
        .collect();
    if let Some(max) = params.max_results {
        items.truncate(max);
    }

    Ok(SearchOutcome::success(
        items,
        total_count,
        incomplete_results,
        fetched.from_cache,
    ))
}
