// GitHub API module.
// Provides the credential provider, client, and types for the GitHub REST API.

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod types;

pub use auth::TokenProvider;
pub use client::GitHubClient;
pub use types::*;
