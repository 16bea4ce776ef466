// ghsearch command line entry point.
// Prints search outcomes as JSON on stdout; logs go to stderr.

use std::process::ExitCode;

use serde::Serialize;
use tracing_subscriber::EnvFilter;

use ghsearch::{Config, SearchService};

const USAGE: &str = "usage: ghsearch repos [keywords...]
       ghsearch prs <owner>/<repo> [query...]
       ghsearch cache clear|info";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    let service = SearchService::from_config(&config);
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        Some("repos") => {
            let mut params = config.repo_params();
            let keywords = args[1..].join(",");
            if !keywords.trim().is_empty() {
                params.keywords = Some(keywords);
            }
            let outcome = service.search_repositories(&params).await;
            emit(&outcome, outcome.success)
        }
        Some("prs") => {
            let Some((owner, repo)) = args.get(1).and_then(|target| target.split_once('/')) else {
                eprintln!("{}", USAGE);
                return ExitCode::from(2);
            };
            let mut params = config.pull_request_params(owner, repo);
            let query = args[2..].join(" ");
            if !query.trim().is_empty() {
                params.query = Some(query);
            }
            let outcome = service.search_pull_requests(&params).await;
            emit(&outcome, outcome.success)
        }
        Some("cache") => match args.get(1).map(String::as_str) {
            Some("clear") => {
                let stats = service.clear_all_cache();
                emit(&stats, stats.error_count == 0)
            }
            Some("info") => match service.cache_info() {
                Ok(info) => emit(&info, true),
                Err(err) => {
                    eprintln!("{}", err);
                    ExitCode::FAILURE
                }
            },
            _ => {
                eprintln!("{}", USAGE);
                ExitCode::from(2)
            }
        },
        _ => {
            eprintln!("{}", USAGE);
            ExitCode::from(2)
        }
    }
}

fn emit<T: Serialize>(value: &T, success: bool) -> ExitCode {
    match serde_json::to_string(value) {
        Ok(json) => println!("{}", json),
        Err(err) => {
            eprintln!("failed to serialize output: {}", err);
            return ExitCode::FAILURE;
        }
    }
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
