mod common;

use bugtrail::models::{ErrorStatus, Severity};
use bugtrail::search::{RecordSet, SearchQuery};
use bugtrail::service::SearchService;
use bugtrail::state::{InMemoryStore, ListOptions, RecordStore, SortOrder};
use bugtrail::AppError;
use common::*;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

const SNAPSHOT: &str = r#"{
  "sessions": [
    {
      "id": "s-1",
      "userId": "user-1",
      "title": "Checkout crash",
      "tags": "[\"payments\", \"prod\"]",
      "status": "active",
      "createdAt": "2024-03-01T09:00:00Z",
      "updatedAt": "2024-03-01T09:00:00Z"
    },
    {
      "id": "s-2",
      "userId": "user-1",
      "title": "Flaky login",
      "description": "Intermittent 401s",
      "status": "resolved",
      "createdAt": "2024-03-05T09:00:00Z",
      "updatedAt": "2024-03-06T09:00:00Z"
    }
  ],
  "snippets": [
    {
      "id": "c-1",
      "sessionId": "s-1",
      "userId": "user-1",
      "title": "Cart total",
      "code": "let total = cart.sum();",
      "language": "rust",
      "filePath": "src/cart.rs",
      "lineNumber": 42,
      "createdAt": "2024-03-01T10:00:00Z"
    }
  ],
  "errors": [
    {
      "id": "e-1",
      "sessionId": "s-1",
      "userId": "user-1",
      "title": "Overflow",
      "message": "attempt to add with overflow",
      "errorType": "runtime",
      "severity": "critical",
      "status": "open",
      "createdAt": "2024-03-01T10:05:00Z"
    }
  ]
}"#;

fn load_snapshot(contents: &str) -> RecordSet {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();

    let raw = std::fs::read_to_string(file.path()).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[tokio::test]
async fn test_snapshot_round_trip_through_store() {
    let records = load_snapshot(SNAPSHOT);
    assert_eq!(records.sessions[0].tags, vec!["payments", "prod"]);
    assert!(records.sessions[1].tags.is_empty());

    let store = InMemoryStore::from_records(records).unwrap();
    assert_eq!(store.counts(), (2, 1, 1));

    let service = SearchService::new(Arc::new(store));
    let results = service.search(USER, &SearchQuery::new("PROD")).await.unwrap();
    assert_eq!(results.sessions.len(), 1);
    assert_eq!(results.sessions[0].id, "s-1");

    let results = service.search(USER, &SearchQuery::new("overflow")).await.unwrap();
    assert_eq!(results.errors[0].severity, Severity::Critical);
}

#[test]
fn test_snapshot_missing_collections_default_to_empty() {
    let records = load_snapshot(r#"{ "sessions": [] }"#);
    assert!(records.is_empty());
}

#[test]
fn test_snapshot_with_duplicate_ids_is_rejected() {
    let mut records = debugging_records();
    let duplicate = records.sessions[0].clone();
    records.sessions.push(duplicate);

    let result = InMemoryStore::from_records(records);
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_crud_lifecycle() {
    let store = seeded_store().await;

    let mut error = store.get_error_log("e-3").await.unwrap().unwrap();
    error.status = ErrorStatus::Resolved;
    store.update_error_log(&error).await.unwrap();
    assert!(store.get_error_log("e-3").await.unwrap().unwrap().is_resolved());

    store.delete_snippet("c-2").await.unwrap();
    assert!(store.get_snippet("c-2").await.unwrap().is_none());

    let service = SearchService::new(Arc::new(store));
    let dashboard = service.dashboard(USER, 2).await.unwrap();
    assert_eq!(dashboard.stats.total_sessions, 3);
    assert_eq!(dashboard.stats.total_snippets, 1);
    assert_eq!(dashboard.stats.resolved_errors, 2);
    assert_eq!(dashboard.stats.resolution_rate(), 67);

    let recent: Vec<_> = dashboard.recent_sessions.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(recent, vec!["s-2", "s-3"]);
}

#[tokio::test]
async fn test_deleting_session_removes_its_records() {
    let store = seeded_store().await;

    store.delete_session("s-1").await.unwrap();

    let options = ListOptions::for_session("s-1");
    assert!(store.list_snippets(&options).await.unwrap().is_empty());
    assert!(store.list_error_logs(&options).await.unwrap().is_empty());

    let remaining = store
        .list_sessions(&ListOptions::for_user(USER).with_order(SortOrder::Ascending))
        .await
        .unwrap();
    let ids: Vec<_> = remaining.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["s-3", "s-2"]);
}

#[tokio::test]
async fn test_export_from_store() {
    let service = SearchService::new(Arc::new(seeded_store().await));

    let export = service.export_session(USER, "s-1").await.unwrap();
    let markdown = export.markdown;

    assert_eq!(export.file_name, "auth_bug.md");

    assert!(markdown.starts_with("# Auth bug"));
    assert!(markdown.contains("**Tags:** auth, JWT"));
    assert!(markdown.contains("Login fails after token refresh"));
    assert!(markdown.contains("**File:** src/auth/refresh.rs"));
    assert!(markdown.contains("```\nat decode (jwt.rs:88)\n```"));
}

#[tokio::test]
async fn test_export_is_scoped_to_the_caller() {
    let service = SearchService::new(Arc::new(seeded_store().await));

    let foreign = service.export_session(USER, "s-other").await;
    assert!(matches!(foreign, Err(AppError::NotFound(_))));

    let own = service.export_session("user-2", "s-other").await.unwrap();
    assert!(own.markdown.starts_with("# Auth bug from another account"));
}
