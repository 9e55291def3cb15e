//! Searchable view over the three record kinds

use crate::models::{ErrorLog, Session, Snippet};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The collection a record belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, EnumString, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ContentType {
    Sessions,
    Snippets,
    Errors,
}

/// Trait for records the search engine can match
pub trait SearchDocument: Clone {
    /// Collection this kind of record lives in
    const CONTENT_TYPE: ContentType;

    /// Get document ID
    fn document_id(&self) -> &str;

    /// Text fields that take part in free-text matching. Absent optional
    /// fields are simply not returned.
    fn searchable_fields(&self) -> Vec<&str>;

    /// Timestamp used by date-range filtering
    fn created_at(&self) -> DateTime<Utc>;

    /// Status name, `None` when the kind has no status
    fn status_name(&self) -> Option<&str> {
        None
    }

    /// Severity name, `None` when the kind has no severity
    fn severity_name(&self) -> Option<&str> {
        None
    }

    /// Case-insensitive substring match. `needle` must already be lower-cased.
    fn matches_text(&self, needle: &str) -> bool {
        self.searchable_fields()
            .into_iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

impl SearchDocument for Session {
    const CONTENT_TYPE: ContentType = ContentType::Sessions;

    fn document_id(&self) -> &str {
        &self.id
    }

    fn searchable_fields(&self) -> Vec<&str> {
        let mut fields = Vec::with_capacity(2 + self.tags.len());
        fields.push(self.title.as_str());
        if let Some(ref description) = self.description {
            fields.push(description.as_str());
        }
        fields.extend(self.tags.iter().map(String::as_str));
        fields
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn status_name(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
}

impl SearchDocument for Snippet {
    const CONTENT_TYPE: ContentType = ContentType::Snippets;

    fn document_id(&self) -> &str {
        &self.id
    }

    fn searchable_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.code.as_str()];
        if let Some(ref file_path) = self.file_path {
            fields.push(file_path.as_str());
        }
        fields
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl SearchDocument for ErrorLog {
    const CONTENT_TYPE: ContentType = ContentType::Errors;

    fn document_id(&self) -> &str {
        &self.id
    }

    fn searchable_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.message.as_str()];
        if let Some(ref stack_trace) = self.stack_trace {
            fields.push(stack_trace.as_str());
        }
        fields
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn status_name(&self) -> Option<&str> {
        Some(self.status.as_str())
    }

    fn severity_name(&self) -> Option<&str> {
        Some(self.severity.as_str())
    }
}
