//! Search round-trip state machine.
//!
//! `Idle → Searching → (Populated | Empty | Failed)`; any terminal state
//! re-enters `Searching` on the next accepted submission. Each accepted
//! submission gets a [`SearchTicket`] with a strictly increasing sequence
//! number, and only the latest ticket may complete the search.

use pricecompare_core::{DomainError, DomainResult, Product};

use crate::api::ApiError;

/// Handle for one accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
    query: String,
}

impl SearchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// The trimmed query that was submitted.
    pub fn query(&self) -> &str {
        &self.query
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchState {
    #[default]
    Idle,
    Searching {
        ticket: SearchTicket,
    },
    Populated {
        query: String,
        results: Vec<Product>,
    },
    Empty {
        query: String,
    },
    Failed {
        query: String,
        error: ApiError,
    },
}

impl SearchState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SearchState::Populated { .. } | SearchState::Empty { .. } | SearchState::Failed { .. }
        )
    }

    pub fn query(&self) -> Option<&str> {
        match self {
            SearchState::Idle => None,
            SearchState::Searching { ticket } => Some(ticket.query()),
            SearchState::Populated { query, .. }
            | SearchState::Empty { query }
            | SearchState::Failed { query, .. } => Some(query),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchClient {
    state: SearchState,
    issued: u64,
}

impl SearchClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Accept a submission. Blank queries are rejected and leave the state
    /// untouched.
    pub fn begin(&mut self, raw_query: &str) -> DomainResult<SearchTicket> {
        let query = raw_query.trim();
        if query.is_empty() {
            return Err(DomainError::validation("search query is blank"));
        }

        self.issued += 1;
        let ticket = SearchTicket {
            seq: self.issued,
            query: query.to_string(),
        };
        self.state = SearchState::Searching {
            ticket: ticket.clone(),
        };
        tracing::info!(seq = ticket.seq, query = %ticket.query, "search started");
        Ok(ticket)
    }

    /// Whether `ticket` is the one the client is currently waiting on.
    pub fn is_current(&self, ticket: &SearchTicket) -> bool {
        matches!(&self.state, SearchState::Searching { ticket: t } if t.seq == ticket.seq)
    }

    /// Settle the search for `ticket`. Returns `None` and changes nothing if
    /// the ticket is stale.
    pub fn complete(
        &mut self,
        ticket: &SearchTicket,
        result: Result<Vec<Product>, ApiError>,
    ) -> Option<&SearchState> {
        if !self.is_current(ticket) {
            tracing::debug!(
                seq = ticket.seq,
                latest = self.issued,
                "discarding stale search response"
            );
            return None;
        }

        let query = ticket.query.clone();
        self.state = match result {
            Ok(results) if results.is_empty() => {
                tracing::info!(seq = ticket.seq, %query, "search returned no results");
                SearchState::Empty { query }
            }
            Ok(results) => {
                tracing::info!(seq = ticket.seq, %query, count = results.len(), "search completed");
                SearchState::Populated { query, results }
            }
            Err(error) => {
                tracing::error!(seq = ticket.seq, %query, %error, "search failed");
                SearchState::Failed { query, error }
            }
        };

        Some(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_query_is_rejected_without_transition() {
        let mut client = SearchClient::new();
        assert!(client.begin("   ").is_err());
        assert!(client.begin("").is_err());
        assert_eq!(client.state(), &SearchState::Idle);
    }

    #[test]
    fn query_is_trimmed() {
        let mut client = SearchClient::new();
        let ticket = client.begin("  iphone ").unwrap();
        assert_eq!(ticket.query(), "iphone");
    }

    #[test]
    fn outcomes_map_to_terminal_states() {
        let mut client = SearchClient::new();

        let t = client.begin("iphone").unwrap();
        let state = client.complete(&t, Ok(vec![])).unwrap();
        assert_eq!(state, &SearchState::Empty { query: "iphone".into() });

        let t = client.begin("iphone").unwrap();
        let state = client.complete(&t, Ok(vec![Product::new("iPhone 15")])).unwrap();
        assert!(matches!(state, SearchState::Populated { results, .. } if results.len() == 1));

        let t = client.begin("iphone").unwrap();
        let state = client.complete(&t, Err(ApiError::Parse("eof".into()))).unwrap();
        assert!(matches!(state, SearchState::Failed { .. }));
        assert!(state.is_terminal());
    }

    #[test]
    fn tickets_are_strictly_increasing() {
        let mut client = SearchClient::new();
        let a = client.begin("a").unwrap();
        let b = client.begin("b").unwrap();
        assert!(b.seq() > a.seq());
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut client = SearchClient::new();
        let old = client.begin("old").unwrap();
        let new = client.begin("new").unwrap();

        assert!(client.complete(&old, Ok(vec![Product::new("x")])).is_none());
        assert!(client.is_current(&new));

        client.complete(&new, Ok(vec![])).unwrap();
        assert!(client.complete(&old, Ok(vec![Product::new("x")])).is_none());
        assert_eq!(client.state(), &SearchState::Empty { query: "new".into() });
    }

    #[test]
    fn a_ticket_completes_only_once() {
        let mut client = SearchClient::new();
        let t = client.begin("tv").unwrap();
        assert!(client.complete(&t, Ok(vec![])).is_some());
        assert!(client.complete(&t, Ok(vec![Product::new("late")])).is_none());
    }
}
