pub mod store;

pub use store::InMemoryStore;

use crate::error::Result;
use crate::models::{ErrorLog, Session, Snippet};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Trait for record storage operations.
///
/// Implementations front the hosted document store; the crate only ever
/// receives one as an injected dependency.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Save a new session
    async fn create_session(&self, session: Session) -> Result<Session>;

    /// Get a session by ID
    async fn get_session(&self, id: &str) -> Result<Option<Session>>;

    /// Replace a stored session
    async fn update_session(&self, session: &Session) -> Result<()>;

    /// Delete a session together with its snippets and error logs
    async fn delete_session(&self, id: &str) -> Result<()>;

    /// List sessions
    async fn list_sessions(&self, options: &ListOptions) -> Result<Vec<Session>>;

    /// Save a new snippet
    async fn create_snippet(&self, snippet: Snippet) -> Result<Snippet>;

    /// Get a snippet by ID
    async fn get_snippet(&self, id: &str) -> Result<Option<Snippet>>;

    /// Replace a stored snippet
    async fn update_snippet(&self, snippet: &Snippet) -> Result<()>;

    /// Delete a snippet
    async fn delete_snippet(&self, id: &str) -> Result<()>;

    /// List snippets
    async fn list_snippets(&self, options: &ListOptions) -> Result<Vec<Snippet>>;

    /// Save a new error log
    async fn create_error_log(&self, error: ErrorLog) -> Result<ErrorLog>;

    /// Get an error log by ID
    async fn get_error_log(&self, id: &str) -> Result<Option<ErrorLog>>;

    /// Replace a stored error log
    async fn update_error_log(&self, error: &ErrorLog) -> Result<()>;

    /// Delete an error log
    async fn delete_error_log(&self, id: &str) -> Result<()>;

    /// List error logs
    async fn list_error_logs(&self, options: &ListOptions) -> Result<Vec<ErrorLog>>;
}

/// Sort order on `created_at`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// `where` / `orderBy` / `limit` options for list calls
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub order: SortOrder,
    pub limit: Option<usize>,
}

impl ListOptions {
    /// Records owned by one user, newest first
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Default::default()
        }
    }

    /// Records attached to one session, newest first
    pub fn for_session(session_id: impl Into<String>) -> Self {
        Self {
            session_id: Some(session_id.into()),
            ..Default::default()
        }
    }

    /// Narrow to records attached to one session
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
