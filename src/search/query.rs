// Search query string builder.
// Renders structured filters into GitHub search syntax.

/// Sentinel state meaning "no state filter".
pub const ALL_STATES: &str = "all";

/// What a query is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryScope {
    Org(String),
    Repo { owner: String, repo: String },
}

impl QueryScope {
    fn clause(&self) -> String {
        match self {
            QueryScope::Org(org) => format!("org:{}", org),
            QueryScope::Repo { owner, repo } => format!("repo:{}/{}", owner, repo),
        }
    }
}

/// Structured search filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub scope: Option<QueryScope>,
    /// Restrict issue search to pull requests.
    pub pull_requests: bool,
    /// Alternative states (`open`, `closed`, `merged`, `draft`, or `all`).
    pub states: Vec<String>,
    pub author: Option<String>,
    pub assignee: Option<String>,
    pub labels: Vec<String>,
    /// Lower creation date bound, `YYYY-MM-DD`.
    pub date_from: Option<String>,
    /// Upper creation date bound, `YYYY-MM-DD`.
    pub date_to: Option<String>,
    pub text: Option<String>,
}

/// Build the query string. Clauses appear in a fixed order:
/// scope, type, state, author, assignee, labels, date-from, date-to, free text.
pub fn build_query(filters: &SearchFilters) -> String {
    let mut clauses: Vec<String> = Vec::new();

    if let Some(scope) = &filters.scope {
        clauses.push(scope.clause());
    }
    if filters.pull_requests {
        clauses.push("is:pr".to_string());
    }
    if let Some(states) = state_clause(&filters.states) {
        clauses.push(states);
    }
    if let Some(author) = non_empty(&filters.author) {
        clauses.push(format!("author:{}", author));
    }
    if let Some(assignee) = non_empty(&filters.assignee) {
        clauses.push(format!("assignee:{}", assignee));
    }
    for label in filters.labels.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
        clauses.push(label_clause(label));
    }
    if let Some(from) = non_empty(&filters.date_from) {
        clauses.push(format!("created:>={}", from));
    }
    if let Some(to) = non_empty(&filters.date_to) {
        clauses.push(format!("created:<={}", to));
    }
    if let Some(text) = non_empty(&filters.text) {
        clauses.push(text.to_string());
    }

    clauses.join(" ")
}

fn state_clause(states: &[String]) -> Option<String> {
    let states: Vec<&str> = states
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if states.is_empty() || states.iter().any(|s| s.eq_ignore_ascii_case(ALL_STATES)) {
        return None;
    }

    let terms: Vec<String> = states.iter().map(|s| format!("is:{}", s)).collect();
    if terms.len() == 1 {
        terms.into_iter().next()
    } else {
        Some(format!("({})", terms.join(" OR ")))
    }
}

fn label_clause(label: &str) -> String {
    if label.chars().any(char::is_whitespace) {
        format!("label:\"{}\"", label)
    } else {
        format!("label:{}", label)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_pull_request_query_literal() {
        let filters = SearchFilters {
            scope: Some(QueryScope::Repo {
                owner: "o".to_string(),
                repo: "r".to_string(),
            }),
            pull_requests: true,
            states: strings(&["open", "draft"]),
            author: Some("u".to_string()),
            labels: strings(&["bug", "needs review"]),
            ..Default::default()
        };

        assert_eq!(
            build_query(&filters),
            r#"repo:o/r is:pr (is:open OR is:draft) author:u label:bug label:"needs review""#
        );
    }

    #[test]
    fn test_state_rendering() {
        let mut filters = SearchFilters {
            states: strings(&["open"]),
            ..Default::default()
        };
        assert_eq!(build_query(&filters), "is:open");

        filters.states = strings(&["open", "all"]);
        assert_eq!(build_query(&filters), "");

        filters.states.clear();
        assert_eq!(build_query(&filters), "");
    }

    #[test]
    fn test_full_clause_order() {
        let filters = SearchFilters {
            scope: Some(QueryScope::Repo {
                owner: "o".to_string(),
                repo: "r".to_string(),
            }),
            pull_requests: true,
            states: strings(&["merged"]),
            author: Some("a".to_string()),
            assignee: Some("b".to_string()),
            labels: strings(&["x"]),
            date_from: Some("2024-01-01".to_string()),
            date_to: Some("2024-12-31".to_string()),
            text: Some("  fix cache  ".to_string()),
        };

        assert_eq!(
            build_query(&filters),
            "repo:o/r is:pr is:merged author:a assignee:b label:x created:>=2024-01-01 created:<=2024-12-31 fix cache"
        );
    }

    #[test]
    fn test_org_scope_with_text() {
        let filters = SearchFilters {
            scope: Some(QueryScope::Org("acme".to_string())),
            text: Some("cli tui".to_string()),
            ..Default::default()
        };
        assert_eq!(build_query(&filters), "org:acme cli tui");
    }

    #[test]
    fn test_blank_values_are_skipped() {
        let filters = SearchFilters {
            author: Some("  ".to_string()),
            labels: strings(&["", " "]),
            text: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(build_query(&filters), "");
    }
}
