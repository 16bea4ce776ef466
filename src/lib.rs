// ghsearch: cached GitHub repository and pull request search.
// Exposes the search service plus the cache, query, and client layers it is built from.

pub mod cache;
pub mod config;
pub mod error;
pub mod github;
pub mod search;
pub mod service;

pub use config::Config;
pub use error::{ErrorKind, Result, SearchError};
pub use search::{PullRequestSearchParams, RepoSearchParams, SearchOutcome};
pub use service::SearchService;
