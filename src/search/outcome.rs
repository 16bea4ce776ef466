// Aggregate search result returned to front ends.

use serde::Serialize;

use crate::error::{ErrorKind, SearchError};

/// Result of a search operation. Failures are carried in `error`, never raised.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome<T> {
    pub success: bool,
    pub items: Vec<T>,
    pub total_count: u64,
    pub incomplete_results: bool,
    pub served_from_cache: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl<T> SearchOutcome<T> {
    pub fn success(
        items: Vec<T>,
        total_count: u64,
        incomplete_results: bool,
        served_from_cache: bool,
    ) -> Self {
        Self {
            success: true,
            items,
            total_count,
            incomplete_results,
            served_from_cache,
            error: None,
            error_kind: None,
        }
    }

    pub fn failure(err: &SearchError) -> Self {
        Self {
            success: false,
            items: Vec::new(),
            total_count: 0,
            incomplete_results: false,
            served_from_cache: false,
            error: Some(err.user_message()),
            error_kind: Some(err.kind()),
        }
    }
}
