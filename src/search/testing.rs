// In-memory search backend for tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::error::{Result, SearchError};
use crate::github::{Issue, IssueState, Owner, OwnerType, Repository, SearchPage};

use super::backend::SearchBackend;

type RepoResponder = Box<dyn Fn(&str, u32) -> Result<SearchPage<Repository>> + Send + Sync>;
type UserResponder = Box<dyn Fn(u32) -> Result<Vec<Repository>> + Send + Sync>;
type IssueResponder = Box<dyn Fn(&str) -> Result<SearchPage<Issue>> + Send + Sync>;

/// Backend whose responses come from closures, with call counters.
pub struct MockBackend {
    repos: RepoResponder,
    user: UserResponder,
    issues: IssueResponder,
    pub repo_calls: AtomicUsize,
    pub user_calls: AtomicUsize,
    pub issue_calls: AtomicUsize,
    pub repo_queries: Mutex<Vec<String>>,
    pub issue_requests: Mutex<Vec<(String, String, String, u32)>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            repos: Box::new(|_, _| Ok(SearchPage::empty())),
            user: Box::new(|_| Ok(Vec::new())),
            issues: Box::new(|_| Ok(SearchPage::empty())),
            repo_calls: AtomicUsize::new(0),
            user_calls: AtomicUsize::new(0),
            issue_calls: AtomicUsize::new(0),
            repo_queries: Mutex::new(Vec::new()),
            issue_requests: Mutex::new(Vec::new()),
        }
    }
}

impl MockBackend {
    pub fn with_repos(
        mut self,
        f: impl Fn(&str, u32) -> Result<SearchPage<Repository>> + Send + Sync + 'static,
    ) -> Self {
        self.repos = Box::new(f);
        self
    }

    pub fn with_user(
        mut self,
        f: impl Fn(u32) -> Result<Vec<Repository>> + Send + Sync + 'static,
    ) -> Self {
        self.user = Box::new(f);
        self
    }

    pub fn with_issues(
        mut self,
        f: impl Fn(&str) -> Result<SearchPage<Issue>> + Send + Sync + 'static,
    ) -> Self {
        self.issues = Box::new(f);
        self
    }

    pub fn repo_calls(&self) -> usize {
        self.repo_calls.load(Ordering::SeqCst)
    }

    pub fn user_calls(&self) -> usize {
        self.user_calls.load(Ordering::SeqCst)
    }

    pub fn issue_calls(&self) -> usize {
        self.issue_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchBackend for MockBackend {
    async fn search_repositories(
        &self,
        query: &str,
        page: u32,
        _per_page: u32,
    ) -> Result<SearchPage<Repository>> {
        self.repo_calls.fetch_add(1, Ordering::SeqCst);
        self.repo_queries.lock().unwrap().push(query.to_string());
        (self.repos)(query, page)
    }

    async fn user_repositories(&self, page: u32, _per_page: u32) -> Result<Vec<Repository>> {
        self.user_calls.fetch_add(1, Ordering::SeqCst);
        (self.user)(page)
    }

    async fn search_issues(
        &self,
        query: &str,
        sort: &str,
        order: &str,
        _page: u32,
        per_page: u32,
    ) -> Result<SearchPage<Issue>> {
        self.issue_calls.fetch_add(1, Ordering::SeqCst);
        self.issue_requests.lock().unwrap().push((
            query.to_string(),
            sort.to_string(),
            order.to_string(),
            per_page,
        ));
        (self.issues)(query)
    }
}

pub fn repo(full_name: &str) -> Repository {
    let (owner, name) = full_name.split_once('/').unwrap_or(("owner", full_name));
    Repository {
        id: full_name.len() as u64,
        name: name.to_string(),
        full_name: full_name.to_string(),
        owner: Owner {
            id: 1,
            login: owner.to_string(),
            owner_type: OwnerType::Organization,
            avatar_url: None,
        },
        private: false,
        description: None,
        html_url: format!("https://github.com/{}", full_name),
        language: None,
        stargazers_count: 0,
        fork: false,
        archived: false,
        updated_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        pushed_at: None,
    }
}

pub fn page_of(items: Vec<Repository>) -> SearchPage<Repository> {
    SearchPage {
        total_count: items.len() as u64,
        incomplete_results: false,
        items,
    }
}

pub fn issue(number: u64, title: &str) -> Issue {
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    Issue {
        id: number * 10,
        number,
        title: title.to_string(),
        state: IssueState::Open,
        html_url: format!("https://github.com/o/r/pull/{}", number),
        user: None,
        labels: Vec::new(),
        draft: false,
        comments: 0,
        created_at: at,
        updated_at: at,
        closed_at: None,
        pull_request: None,
    }
}

pub fn unauthorized<T>() -> Result<T> {
    Err(SearchError::Unauthorized)
}
