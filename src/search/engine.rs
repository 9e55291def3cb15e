//! In-memory filter pass over the three collections

use crate::models::{ErrorLog, Session, Snippet};
use crate::search::document::SearchDocument;
use crate::search::query::{SearchFilter, SearchQuery, TypeScope};
use crate::search::results::SearchResults;
use serde::{Deserialize, Serialize};

/// Snapshot of one user's collections, as handed over by the record store
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecordSet {
    #[serde(default)]
    pub sessions: Vec<Session>,

    #[serde(default)]
    pub snippets: Vec<Snippet>,

    #[serde(default)]
    pub errors: Vec<ErrorLog>,
}

impl RecordSet {
    pub fn new(sessions: Vec<Session>, snippets: Vec<Snippet>, errors: Vec<ErrorLog>) -> Self {
        Self {
            sessions,
            snippets,
            errors,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty() && self.snippets.is_empty() && self.errors.is_empty()
    }

    /// Run a query against this snapshot
    pub fn search(&self, query: &SearchQuery) -> SearchResults {
        search(
            &query.query,
            &query.filters,
            &self.sessions,
            &self.snippets,
            &self.errors,
        )
    }
}

impl SearchQuery {
    pub fn execute(&self, records: &RecordSet) -> SearchResults {
        records.search(self)
    }
}

/// Filter the three collections by free text and structured constraints.
///
/// The query is trimmed before matching and a blank query returns empty
/// results. Every constraint is ANDed, each
/// collection is filtered independently, and input order is preserved.
pub fn search(
    query: &str,
    filters: &SearchFilter,
    sessions: &[Session],
    snippets: &[Snippet],
    errors: &[ErrorLog],
) -> SearchResults {
    let query = query.trim();
    if query.is_empty() {
        return SearchResults::default();
    }

    let needle = query.to_lowercase();
    let scope = filters.scope();

    SearchResults {
        sessions: filter_collection(sessions, &needle, filters, scope),
        snippets: filter_collection(snippets, &needle, filters, scope),
        errors: filter_collection(errors, &needle, filters, scope),
    }
}

fn filter_collection<T: SearchDocument>(
    records: &[T],
    needle: &str,
    filters: &SearchFilter,
    scope: TypeScope,
) -> Vec<T> {
    if !scope.includes(T::CONTENT_TYPE) {
        return Vec::new();
    }

    records
        .iter()
        .filter(|record| record.matches_text(needle) && passes_filters(*record, filters))
        .cloned()
        .collect()
}

fn passes_filters<T: SearchDocument>(record: &T, filters: &SearchFilter) -> bool {
    // Axes a record kind does not carry leave it unconstrained.
    let status_match = match (filters.status(), record.status_name()) {
        (Some(wanted), Some(actual)) => wanted == actual,
        _ => true,
    };

    let severity_match = match (filters.severity(), record.severity_name()) {
        (Some(wanted), Some(actual)) => wanted == actual,
        _ => true,
    };

    let date_match = filters
        .date_range
        .map_or(true, |range| range.contains(record.created_at()));

    status_match && severity_match && date_match
}
