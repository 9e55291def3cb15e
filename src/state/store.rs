use crate::error::{AppError, Result};
use crate::models::{ErrorLog, Session, Snippet};
use crate::state::{ListOptions, RecordStore, SortOrder};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use validator::Validate;

/// Fields the in-memory store needs to index and order a record
trait StoredRecord: Clone + Validate {
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn user_id(&self) -> &str;
    fn session_id(&self) -> Option<&str>;
    fn created_at(&self) -> DateTime<Utc>;
}

impl StoredRecord for Session {
    const KIND: &'static str = "Session";

    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn session_id(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl StoredRecord for Snippet {
    const KIND: &'static str = "Snippet";

    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn session_id(&self) -> Option<&str> {
        Some(&self.session_id)
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl StoredRecord for ErrorLog {
    const KIND: &'static str = "Error log";

    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn session_id(&self) -> Option<&str> {
        Some(&self.session_id)
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// One keyed collection of records
struct Collection<T> {
    records: Arc<DashMap<String, T>>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            records: self.records.clone(),
        }
    }
}

impl<T: StoredRecord> Collection<T> {
    fn new() -> Self {
        Self {
            records: Arc::new(DashMap::new()),
        }
    }

    fn create(&self, record: T) -> Result<T> {
        record.validate()?;

        match self.records.entry(record.id().to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(AppError::Validation(format!(
                "{} {} already exists",
                T::KIND,
                record.id()
            ))),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(record.clone());
                tracing::debug!(kind = T::KIND, record_id = %record.id(), "Record created");
                Ok(record)
            }
        }
    }

    fn get(&self, id: &str) -> Option<T> {
        self.records.get(id).map(|entry| entry.clone())
    }

    fn update(&self, record: &T) -> Result<()> {
        record.validate()?;

        match self.records.get_mut(record.id()) {
            Some(mut entry) => {
                *entry = record.clone();
                tracing::debug!(kind = T::KIND, record_id = %record.id(), "Record updated");
                Ok(())
            }
            None => Err(AppError::NotFound(format!("{} {} not found", T::KIND, record.id()))),
        }
    }

    fn delete(&self, id: &str) -> Result<T> {
        match self.records.remove(id) {
            Some((_, record)) => {
                tracing::debug!(kind = T::KIND, record_id = %id, "Record deleted");
                Ok(record)
            }
            None => Err(AppError::NotFound(format!("{} {} not found", T::KIND, id))),
        }
    }

    /// Remove every record attached to a session, returning how many went
    fn delete_by_session(&self, session_id: &str) -> usize {
        let before = self.records.len();
        self.records
            .retain(|_, record| record.session_id() != Some(session_id));
        before.saturating_sub(self.records.len())
    }

    fn list(&self, options: &ListOptions) -> Vec<T> {
        let mut records: Vec<T> = self
            .records
            .iter()
            .map(|entry| entry.value().clone())
            .filter(|record| {
                let user_match = options
                    .user_id
                    .as_deref()
                    .map_or(true, |user_id| record.user_id() == user_id);

                let session_match = options
                    .session_id
                    .as_deref()
                    .map_or(true, |session_id| record.session_id() == Some(session_id));

                user_match && session_match
            })
            .collect();

        // Ties broken by id so listings are deterministic
        records.sort_by(|a, b| {
            let by_time = a.created_at().cmp(&b.created_at()).then_with(|| a.id().cmp(b.id()));
            match options.order {
                SortOrder::Ascending => by_time,
                SortOrder::Descending => by_time.reverse(),
            }
        });

        if let Some(limit) = options.limit {
            records.truncate(limit);
        }

        records
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

/// In-memory record store (for the CLI snapshot and testing)
#[derive(Clone)]
pub struct InMemoryStore {
    sessions: Collection<Session>,
    snippets: Collection<Snippet>,
    errors: Collection<ErrorLog>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            sessions: Collection::new(),
            snippets: Collection::new(),
            errors: Collection::new(),
        }
    }

    /// Build a store pre-populated from a snapshot of the three collections
    pub fn from_records(records: crate::search::RecordSet) -> Result<Self> {
        let store = Self::new();
        for session in records.sessions {
            store.sessions.create(session)?;
        }
        for snippet in records.snippets {
            store.snippets.create(snippet)?;
        }
        for error in records.errors {
            store.errors.create(error)?;
        }
        Ok(store)
    }

    /// Number of records held, per collection
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.sessions.len(), self.snippets.len(), self.errors.len())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn create_session(&self, session: Session) -> Result<Session> {
        self.sessions.create(session)
    }

    async fn get_session(&self, id: &str) -> Result<Option<Session>> {
        Ok(self.sessions.get(id))
    }

    async fn update_session(&self, session: &Session) -> Result<()> {
        self.sessions.update(session)
    }

    async fn delete_session(&self, id: &str) -> Result<()> {
        self.sessions.delete(id)?;

        let snippets = self.snippets.delete_by_session(id);
        let errors = self.errors.delete_by_session(id);
        tracing::debug!(
            session_id = %id,
            snippets_removed = snippets,
            errors_removed = errors,
            "Session children removed"
        );

        Ok(())
    }

    async fn list_sessions(&self, options: &ListOptions) -> Result<Vec<Session>> {
        Ok(self.sessions.list(options))
    }

    async fn create_snippet(&self, snippet: Snippet) -> Result<Snippet> {
        self.snippets.create(snippet)
    }

    async fn get_snippet(&self, id: &str) -> Result<Option<Snippet>> {
        Ok(self.snippets.get(id))
    }

    async fn update_snippet(&self, snippet: &Snippet) -> Result<()> {
        self.snippets.update(snippet)
    }

    async fn delete_snippet(&self, id: &str) -> Result<()> {
        self.snippets.delete(id).map(|_| ())
    }

    async fn list_snippets(&self, options: &ListOptions) -> Result<Vec<Snippet>> {
        Ok(self.snippets.list(options))
    }

    async fn create_error_log(&self, error: ErrorLog) -> Result<ErrorLog> {
        self.errors.create(error)
    }

    async fn get_error_log(&self, id: &str) -> Result<Option<ErrorLog>> {
        Ok(self.errors.get(id))
    }

    async fn update_error_log(&self, error: &ErrorLog) -> Result<()> {
        self.errors.update(error)
    }

    async fn delete_error_log(&self, id: &str) -> Result<()> {
        self.errors.delete(id).map(|_| ())
    }

    async fn list_error_logs(&self, options: &ListOptions) -> Result<Vec<ErrorLog>> {
        Ok(self.errors.list(options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ErrorStatus, ErrorType, Severity};

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    async fn seeded_store() -> InMemoryStore {
        let store = InMemoryStore::new();
        for (id, user, day) in [("s-1", "u-1", 1), ("s-2", "u-1", 3), ("s-3", "u-2", 2)] {
            store
                .create_session(
                    Session::new(user, format!("Session {}", id))
                        .with_id(id)
                        .with_created_at(ts(&format!("2024-01-0{}T00:00:00Z", day))),
                )
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_list_is_user_scoped_newest_first() {
        let store = seeded_store().await;

        let sessions = store.list_sessions(&ListOptions::for_user("u-1")).await.unwrap();
        let ids: Vec<_> = sessions.iter().map(|s| s.id.as_str()).collect();

        assert_eq!(ids, vec!["s-2", "s-1"]);
    }

    #[tokio::test]
    async fn test_list_order_and_limit() {
        let store = seeded_store().await;

        let options = ListOptions::default()
            .with_order(SortOrder::Ascending)
            .with_limit(2);
        let sessions = store.list_sessions(&options).await.unwrap();
        let ids: Vec<_> = sessions.iter().map(|s| s.id.as_str()).collect();

        assert_eq!(ids, vec!["s-1", "s-3"]);
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let store = seeded_store().await;
        let result = store.create_session(Session::new("u-1", "Again").with_id("s-1")).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_invalid_title_rejected() {
        let store = InMemoryStore::new();
        let result = store.create_session(Session::new("u-1", "")).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = InMemoryStore::new();
        let error = ErrorLog::new("s-1", "u-1", "Boom", "m", ErrorType::Logic, Severity::Low);

        let result = store.update_error_log(&error).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_error_status() {
        let store = InMemoryStore::new();
        let error = store
            .create_error_log(ErrorLog::new("s-1", "u-1", "Boom", "m", ErrorType::Logic, Severity::Low))
            .await
            .unwrap();

        let resolved = error.clone().with_status(ErrorStatus::Resolved);
        store.update_error_log(&resolved).await.unwrap();

        let stored = store.get_error_log(&error.id).await.unwrap().unwrap();
        assert!(stored.is_resolved());
    }

    #[tokio::test]
    async fn test_delete_session_cascades() {
        let store = seeded_store().await;
        store
            .create_snippet(Snippet::new("s-1", "u-1", "a", "x", "rust"))
            .await
            .unwrap();
        store
            .create_snippet(Snippet::new("s-2", "u-1", "b", "y", "rust"))
            .await
            .unwrap();
        store
            .create_error_log(ErrorLog::new("s-1", "u-1", "c", "z", ErrorType::Logic, Severity::Low))
            .await
            .unwrap();

        store.delete_session("s-1").await.unwrap();

        assert_eq!(store.counts(), (2, 1, 0));
        let remaining = store.list_snippets(&ListOptions::for_session("s-2")).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert!(matches!(
            store.delete_session("s-1").await,
            Err(AppError::NotFound(_))
        ));
    }
}
