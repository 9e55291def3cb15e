//! Search results and facet aggregation

use crate::models::{ErrorLog, Session, Snippet};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Aggregation request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Aggregation {
    /// Count sessions by status
    BySessionStatus,

    /// Count error logs by severity
    BySeverity,

    /// Count error logs by status
    ByErrorStatus,

    /// Count error logs by error type
    ByErrorType,

    /// Count snippets by language
    ByLanguage,
}

impl Aggregation {
    pub fn name(&self) -> &'static str {
        match self {
            Aggregation::BySessionStatus => "session_status",
            Aggregation::BySeverity => "severity",
            Aggregation::ByErrorStatus => "error_status",
            Aggregation::ByErrorType => "error_type",
            Aggregation::ByLanguage => "language",
        }
    }
}

/// Facet count result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FacetCount {
    pub name: String,
    pub count: u64,
}

/// Filtered, categorised output of a search
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchResults {
    pub sessions: Vec<Session>,
    pub snippets: Vec<Snippet>,
    pub errors: Vec<ErrorLog>,
}

impl SearchResults {
    /// Sum of all three result lists
    pub fn total_count(&self) -> usize {
        self.sessions.len() + self.snippets.len() + self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_count() == 0
    }

    /// Count results by one facet, highest count first
    pub fn aggregate(&self, aggregation: Aggregation) -> Vec<FacetCount> {
        let names: Vec<&str> = match aggregation {
            Aggregation::BySessionStatus => {
                self.sessions.iter().map(|s| s.status.as_str()).collect()
            }
            Aggregation::BySeverity => self.errors.iter().map(|e| e.severity.as_str()).collect(),
            Aggregation::ByErrorStatus => self.errors.iter().map(|e| e.status.as_str()).collect(),
            Aggregation::ByErrorType => {
                self.errors.iter().map(|e| e.error_type.as_str()).collect()
            }
            Aggregation::ByLanguage => self.snippets.iter().map(|s| s.language.as_str()).collect(),
        };

        count_facets(names)
    }

    /// Compute several aggregations at once, keyed by facet name
    pub fn facets(&self, aggregations: &[Aggregation]) -> HashMap<String, Vec<FacetCount>> {
        aggregations
            .iter()
            .map(|aggregation| (aggregation.name().to_string(), self.aggregate(*aggregation)))
            .collect()
    }
}

fn count_facets<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<FacetCount> {
    let mut totals: HashMap<&str, u64> = HashMap::new();
    for name in names {
        *totals.entry(name).or_insert(0) += 1;
    }

    let mut counts: Vec<FacetCount> = totals
        .into_iter()
        .map(|(name, count)| FacetCount {
            name: name.to_string(),
            count,
        })
        .collect();

    // Sort by count descending, ties by name
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ErrorStatus, ErrorType, Severity};

    fn results() -> SearchResults {
        SearchResults {
            sessions: vec![Session::new("u-1", "a"), Session::new("u-1", "b")],
            snippets: vec![
                Snippet::new("s-1", "u-1", "q", "SELECT 1", "sql"),
                Snippet::new("s-1", "u-1", "r", "fn main() {}", "rust"),
                Snippet::new("s-1", "u-1", "s", "SELECT 2", "sql"),
            ],
            errors: vec![
                ErrorLog::new("s-1", "u-1", "x", "m", ErrorType::Network, Severity::High),
                ErrorLog::new("s-1", "u-1", "y", "m", ErrorType::Network, Severity::Low)
                    .with_status(ErrorStatus::Resolved),
                ErrorLog::new("s-1", "u-1", "z", "m", ErrorType::Database, Severity::High),
            ],
        }
    }

    #[test]
    fn test_total_count() {
        assert_eq!(results().total_count(), 8);
        assert!(SearchResults::default().is_empty());
    }

    #[test]
    fn test_severity_facets() {
        let counts = results().aggregate(Aggregation::BySeverity);

        assert_eq!(
            counts,
            vec![
                FacetCount { name: "high".to_string(), count: 2 },
                FacetCount { name: "low".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_facets_sum_to_collection_size() {
        let results = results();
        let facets = results.facets(&[
            Aggregation::BySessionStatus,
            Aggregation::ByErrorStatus,
            Aggregation::ByLanguage,
        ]);

        let sum = |name: &str| facets[name].iter().map(|f| f.count).sum::<u64>();
        assert_eq!(sum("session_status"), 2);
        assert_eq!(sum("error_status"), 3);
        assert_eq!(sum("language"), 3);
        assert_eq!(facets["language"][0].name, "sql");
    }
}
