// Search module.
// Query building, pagination, and the repository and pull request searches.

pub mod backend;
pub mod outcome;
pub mod paginate;
pub mod pulls;
pub mod query;
pub mod repos;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::SearchBackend;
pub use outcome::SearchOutcome;
pub use paginate::{MAX_PAGES, PER_PAGE, PageLimits, paginate};
pub use pulls::{PullRequestSearchParams, search_pull_requests};
pub use query::{QueryScope, SearchFilters, build_query};
pub use repos::{RepoSearchParams, search_repositories};
