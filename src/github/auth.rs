// GitHub credential provider.
// Resolves a bearer token once and keeps it until explicitly invalidated.

use std::process::Command;
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::error::{Result, SearchError};

/// Environment variables checked for a token, in order.
pub const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Where a token comes from.
#[derive(Debug, Clone)]
enum TokenSource {
    /// Environment variables first, then `gh auth token`.
    Default,
    Fixed(String),
    Command { program: String, args: Vec<String> },
}

/// Token provider holding a single cached credential.
#[derive(Debug)]
pub struct TokenProvider {
    source: TokenSource,
    cached: Mutex<Option<String>>,
}

impl Default for TokenProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenProvider {
    /// Provider reading `GITHUB_TOKEN`/`GH_TOKEN`, falling back to the GitHub CLI.
    pub fn new() -> Self {
        Self::with_source(TokenSource::Default)
    }

    /// Provider that always yields the given token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self::with_source(TokenSource::Fixed(token.into()))
    }

    /// Provider that runs a command and uses its trimmed stdout as the token.
    pub fn from_command<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_source(TokenSource::Command {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        })
    }

    fn with_source(source: TokenSource) -> Self {
        Self {
            source,
            cached: Mutex::new(None),
        }
    }

    /// Get the cached token, acquiring it on first use.
    pub fn token(&self) -> Result<String> {
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }

        let token = self.acquire()?;
        *cached = Some(token.clone());
        Ok(token)
    }

    /// Drop the cached token so the next call re-acquires it.
    pub fn invalidate(&self) {
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        if cached.take().is_some() {
            debug!("cached GitHub token invalidated");
        }
    }

    /// Whether a token is currently cached.
    pub fn is_cached(&self) -> bool {
        self.cached
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn acquire(&self) -> Result<String> {
        match &self.source {
            TokenSource::Fixed(token) => Ok(token.clone()),
            TokenSource::Command { program, args } => run_token_command(program, args),
            TokenSource::Default => {
                for var in TOKEN_ENV_VARS {
                    if let Ok(token) = std::env::var(var) {
                        let token = token.trim();
                        if !token.is_empty() {
                            debug!(source = var, "using GitHub token from environment");
                            return Ok(token.to_string());
                        }
                    }
                }
                run_token_command("gh", &["auth".to_string(), "token".to_string()]).map_err(
                    |err| match err {
                        SearchError::Auth(_) => SearchError::MissingToken,
                        other => other,
                    },
                )
            }
        }
    }
}

fn run_token_command(program: &str, args: &[String]) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| SearchError::Auth(format!("failed to run `{}`: {}", program, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SearchError::Auth(format!(
            "`{}` exited with {}: {}",
            program,
            output.status,
            stderr.trim()
        )));
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(SearchError::Auth(format!("`{}` printed no token", program)));
    }

    debug!(program, "using GitHub token from command");
    Ok(token)
}
