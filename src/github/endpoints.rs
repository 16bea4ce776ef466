// GitHub API endpoint functions.
// Provides typed methods for the search and repository listing endpoints.

use crate::error::Result;

use super::client::GitHubClient;
use super::types::{Issue, Repository, SearchPage};

impl GitHubClient {
    /// Search repositories with a query string.
    pub async fn search_repositories(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<SearchPage<Repository>> {
        let params = [
            ("q", query),
            ("sort", "updated"),
            ("order", "desc"),
            ("page", &page.to_string()),
            ("per_page", &per_page.to_string()),
        ];
        let response = self.get_with_params("/search/repositories", &params).await?;
        let page: SearchPage<Repository> = response.json().await?;
        Ok(page)
    }

    /// Search issues and pull requests with a query string.
    pub async fn search_issues(
        &self,
        query: &str,
        sort: &str,
        order: &str,
        page: u32,
        per_page: u32,
    ) -> Result<SearchPage<Issue>> {
        let params = [
            ("q", query),
            ("sort", sort),
            ("order", order),
            ("page", &page.to_string()),
            ("per_page", &per_page.to_string()),
        ];
        let response = self.get_with_params("/search/issues", &params).await?;
        let page: SearchPage<Issue> = response.json().await?;
        Ok(page)
    }

    /// Get repositories owned by the authenticated user.
    pub async fn get_user_repos(&self, page: u32, per_page: u32) -> Result<Vec<Repository>> {
        let params = [
            ("affiliation", "owner"),
            ("sort", "updated"),
            ("direction", "desc"),
            ("page", &page.to_string()),
            ("per_page", &per_page.to_string()),
        ];
        let response = self.get_with_params("/user/repos", &params).await?;
        let repos: Vec<Repository> = response.json().await?;
        Ok(repos)
    }
}
