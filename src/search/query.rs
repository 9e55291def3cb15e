//! Search query building

use crate::search::document::ContentType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Inclusive `created_at` window
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// An inverted range (`start > end`) contains nothing
    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.is_valid() && self.start <= timestamp && timestamp <= self.end
    }
}

/// Structured constraints applied on top of the text match.
///
/// Fields hold raw strings as chosen in a filter picker. `None` and the
/// empty string both mean "no constraint on this axis"; a value that names
/// no known variant matches nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilter {
    /// Restrict results to one collection (`sessions`, `snippets`, `errors`)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// Filter sessions and error logs by status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Filter error logs by severity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,

    /// Filter every collection by creation date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
}

impl SearchFilter {
    pub fn content_type(&self) -> Option<&str> {
        non_empty(&self.content_type)
    }

    pub fn status(&self) -> Option<&str> {
        non_empty(&self.status)
    }

    pub fn severity(&self) -> Option<&str> {
        non_empty(&self.severity)
    }

    /// Whether any axis is constrained
    pub fn is_active(&self) -> bool {
        self.content_type().is_some()
            || self.status().is_some()
            || self.severity().is_some()
            || self.date_range.is_some()
    }

    /// Which collections survive the type filter
    pub fn scope(&self) -> TypeScope {
        match self.content_type() {
            None => TypeScope::All,
            Some(name) => match ContentType::from_str(name) {
                Ok(content_type) => TypeScope::Only(content_type),
                Err(_) => TypeScope::Nothing,
            },
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Outcome of the content type filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeScope {
    All,
    Only(ContentType),
    /// The requested type is unknown
    Nothing,
}

impl TypeScope {
    pub fn includes(&self, content_type: ContentType) -> bool {
        match self {
            TypeScope::All => true,
            TypeScope::Only(selected) => *selected == content_type,
            TypeScope::Nothing => false,
        }
    }
}

/// Main search query structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchQuery {
    /// Free text, matched case-insensitively as a substring
    pub query: String,

    /// Filters to apply
    #[serde(default)]
    pub filters: SearchFilter,
}

impl SearchQuery {
    /// Create a new search query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            filters: SearchFilter::default(),
        }
    }

    /// A blank query yields no results
    pub fn is_blank(&self) -> bool {
        self.query.trim().is_empty()
    }

    /// Set filters
    pub fn with_filters(mut self, filters: SearchFilter) -> Self {
        self.filters = filters;
        self
    }

    /// Restrict to one collection
    pub fn with_type(mut self, content_type: impl Into<String>) -> Self {
        self.filters.content_type = Some(content_type.into());
        self
    }

    /// Filter by status
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.filters.status = Some(status.into());
        self
    }

    /// Filter by severity
    pub fn with_severity(mut self, severity: impl Into<String>) -> Self {
        self.filters.severity = Some(severity.into());
        self
    }

    /// Filter by date range (created_at)
    pub fn with_date_range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.filters.date_range = Some(DateRange::new(start, end));
        self
    }
}
