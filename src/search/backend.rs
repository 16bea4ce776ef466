// Search backend abstraction.
// The aggregator talks to GitHub through this trait so it can run against test doubles.

use async_trait::async_trait;

use crate::error::Result;
use crate::github::{GitHubClient, Issue, Repository, SearchPage};

/// Remote search operations used by the aggregator.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// One page of repository search results.
    async fn search_repositories(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<SearchPage<Repository>>;

    /// One page of the authenticated user's own repositories.
    async fn user_repositories(&self, page: u32, per_page: u32) -> Result<Vec<Repository>>;

    /// One page of issue/pull request search results.
    async fn search_issues(
        &self,
        query: &str,
        sort: &str,
        order: &str,
        page: u32,
        per_page: u32,
    ) -> Result<SearchPage<Issue>>;
}

#[async_trait]
impl SearchBackend for GitHubClient {
    async fn search_repositories(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<SearchPage<Repository>> {
        GitHubClient::search_repositories(self, query, page, per_page).await
    }

    async fn user_repositories(&self, page: u32, per_page: u32) -> Result<Vec<Repository>> {
        self.get_user_repos(page, per_page).await
    }

    async fn search_issues(
        &self,
        query: &str,
        sort: &str,
        order: &str,
        page: u32,
        per_page: u32,
    ) -> Result<SearchPage<Issue>> {
        GitHubClient::search_issues(self, query, sort, order, page, per_page).await
    }
}
