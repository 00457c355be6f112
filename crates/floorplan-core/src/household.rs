//! Household search and invite requests.
//!
//! The HTTP side is a collaborator behind [`HouseholdTransport`]; this module
//! owns the paths, the wire format and the type-ahead debounce.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Delay between the last keystroke and the search request.
pub const SEARCH_DELAY: Duration = Duration::from_millis(400);

/// Characters that would change the meaning of the search path.
const RESERVED_QUERY_CHARS: [char; 3] = ['/', '?', '#'];

/// A household as returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Household {
    pub id: u64,
    pub household_name: String,
}

/// Body of `GET /household/search/{query}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub result: Vec<Household>,
}

/// Errors from the household endpoints.
#[derive(Debug, Error)]
pub enum HouseholdError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("search query is empty")]
    EmptyQuery,
    #[error("search query contains reserved character {0:?}")]
    ReservedCharacter(char),
}

/// Result of a household search.
#[derive(Debug)]
pub enum SearchOutcome {
    /// At least one household matched.
    Found(Vec<Household>),
    /// The search ran and nothing matched.
    Empty,
    /// The search could not be completed.
    Failed(HouseholdError),
}

/// Issues GET requests against the household service and returns the body.
pub trait HouseholdTransport {
    fn get(&self, path: &str) -> Result<String, HouseholdError>;
}

/// Path of the search endpoint for a query.
pub fn search_path(query: &str) -> Result<String, HouseholdError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(HouseholdError::EmptyQuery);
    }
    if let Some(c) = query.chars().find(|c| RESERVED_QUERY_CHARS.contains(c)) {
        return Err(HouseholdError::ReservedCharacter(c));
    }
    Ok(format!("/household/search/{query}"))
}

/// Path of the invite request endpoint for a household.
pub fn request_path(id: u64) -> String {
    format!("/household/request/{id}")
}

/// Client for the household search and invite endpoints.
#[derive(Debug, Clone)]
pub struct HouseholdClient<T> {
    transport: T,
}

impl<T: HouseholdTransport> HouseholdClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Search households by name.
    pub fn search(&self, query: &str) -> SearchOutcome {
        match self.fetch(query) {
            Ok(households) if households.is_empty() => SearchOutcome::Empty,
            Ok(households) => SearchOutcome::Found(households),
            Err(err) => {
                log::warn!("Household search for {query:?} failed: {err}");
                SearchOutcome::Failed(err)
            }
        }
    }

    /// Ask to join a household.
    pub fn request_invite(&self, id: u64) -> Result<(), HouseholdError> {
        self.transport.get(&request_path(id))?;
        log::info!("Requested invite to household {id}");
        Ok(())
    }

    fn fetch(&self, query: &str) -> Result<Vec<Household>, HouseholdError> {
        let body = self.transport.get(&search_path(query)?)?;
        let response: SearchResponse = serde_json::from_str(&body)?;
        Ok(response.result)
    }
}

/// What a keystroke in the search field asks the UI to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keystroke {
    /// Call [`SearchDebouncer::evaluate`] after [`SearchDebouncer::delay`].
    Scheduled,
    /// The field is empty; clear the result list.
    Cleared,
}

/// Collapses a burst of keystrokes into one search.
///
/// Every non-empty keystroke schedules one evaluation. Only the evaluation
/// that finds no others still pending lets the search through.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    pending: u32,
    delay: Duration,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self {
            pending: 0,
            delay: SEARCH_DELAY,
        }
    }
}

impl SearchDebouncer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Evaluations scheduled but not yet run.
    pub fn pending(&self) -> u32 {
        self.pending
    }

    /// The search field changed.
    pub fn keystroke(&mut self, query: &str) -> Keystroke {
        if query.is_empty() {
            return Keystroke::Cleared;
        }
        self.pending += 1;
        Keystroke::Scheduled
    }

    /// A scheduled evaluation fired. Returns the query to search for, if this
    /// was the last one and the field is not empty.
    pub fn evaluate<'a>(&mut self, query: &'a str) -> Option<&'a str> {
        self.pending = self.pending.saturating_sub(1);
        if self.pending != 0 || query.is_empty() {
            return None;
        }
        Some(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct MockTransport {
        response: Result<String, String>,
        requested: RefCell<Vec<String>>,
    }

    impl MockTransport {
        fn ok(body: &str) -> Self {
            Self {
                response: Ok(body.to_string()),
                requested: RefCell::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                response: Err(message.to_string()),
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    impl HouseholdTransport for MockTransport {
        fn get(&self, path: &str) -> Result<String, HouseholdError> {
            self.requested.borrow_mut().push(path.to_string());
            self.response.clone().map_err(HouseholdError::Transport)
        }
    }

    #[test]
    fn test_search_found() {
        let client = HouseholdClient::new(MockTransport::ok(
            r#"{"result": [{"id": 3, "household_name": "Maple Street"}]}"#,
        ));
        match client.search("maple") {
            SearchOutcome::Found(households) => {
                assert_eq!(households.len(), 1);
                assert_eq!(households[0].id, 3);
                assert_eq!(households[0].household_name, "Maple Street");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(*client.transport.requested.borrow(), vec!["/household/search/maple"]);
    }

    #[test]
    fn test_search_empty() {
        let client = HouseholdClient::new(MockTransport::ok(r#"{"result": []}"#));
        assert!(matches!(client.search("nobody"), SearchOutcome::Empty));
    }

    #[test]
    fn test_search_transport_failure() {
        let client = HouseholdClient::new(MockTransport::failing("connection refused"));
        assert!(matches!(
            client.search("maple"),
            SearchOutcome::Failed(HouseholdError::Transport(_))
        ));
    }

    #[test]
    fn test_search_malformed() {
        let client = HouseholdClient::new(MockTransport::ok("<html>"));
        assert!(matches!(
            client.search("maple"),
            SearchOutcome::Failed(HouseholdError::Malformed(_))
        ));
    }

    #[test]
    fn test_search_rejects_reserved_characters() {
        let client = HouseholdClient::new(MockTransport::ok(r#"{"result": []}"#));
        assert!(matches!(
            client.search("a/b"),
            SearchOutcome::Failed(HouseholdError::ReservedCharacter('/'))
        ));
        assert!(matches!(
            client.search("   "),
            SearchOutcome::Failed(HouseholdError::EmptyQuery)
        ));
        assert!(client.transport.requested.borrow().is_empty());
    }

    #[test]
    fn test_request_invite() {
        let client = HouseholdClient::new(MockTransport::ok(""));
        client.request_invite(12).unwrap();
        assert_eq!(*client.transport.requested.borrow(), vec!["/household/request/12"]);
    }

    #[test]
    fn test_debounce_burst() {
        let mut debouncer = SearchDebouncer::new();
        assert_eq!(debouncer.delay(), Duration::from_millis(400));

        for query in ["m", "ma", "map"] {
            assert_eq!(debouncer.keystroke(query), Keystroke::Scheduled);
        }
        assert_eq!(debouncer.pending(), 3);

        assert_eq!(debouncer.evaluate("map"), None);
        assert_eq!(debouncer.evaluate("map"), None);
        assert_eq!(debouncer.evaluate("map"), Some("map"));
        assert_eq!(debouncer.pending(), 0);
    }

    #[test]
    fn test_debounce_cleared_field() {
        let mut debouncer = SearchDebouncer::new();
        assert_eq!(debouncer.keystroke("m"), Keystroke::Scheduled);
        assert_eq!(debouncer.keystroke(""), Keystroke::Cleared);
        assert_eq!(debouncer.evaluate(""), None);
        assert_eq!(debouncer.pending(), 0);
    }
}
