use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A code excerpt saved against a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    /// Unique identifier
    pub id: String,

    /// Session this snippet belongs to
    pub session_id: String,

    /// Owning user
    pub user_id: String,

    /// Human-readable title
    #[validate(length(min = 1, max = 500))]
    pub title: String,

    /// Source text
    pub code: String,

    /// Language tag used for highlighting and export fences
    pub language: String,

    /// File the excerpt came from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,

    /// First line of the excerpt within `file_path`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Snippet {
    pub fn new(
        session_id: impl Into<String>,
        user_id: impl Into<String>,
        title: impl Into<String>,
        code: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.into(),
            user_id: user_id.into(),
            title: title.into(),
            code: code.into(),
            language: language.into(),
            file_path: None,
            line_number: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_location(mut self, file_path: impl Into<String>, line_number: Option<u32>) -> Self {
        self.file_path = Some(file_path.into());
        self.line_number = line_number;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}
