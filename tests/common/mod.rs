//! Shared fixtures for integration tests

#![allow(dead_code)]

use bugtrail::models::{
    ErrorLog, ErrorStatus, ErrorType, Session, SessionStatus, Severity, Snippet,
};
use bugtrail::search::RecordSet;
use bugtrail::state::{InMemoryStore, RecordStore};
use chrono::{DateTime, Utc};

pub const USER: &str = "user-1";

/// Parse a `YYYY-MM-DD` date as midnight UTC
pub fn day(date: &str) -> DateTime<Utc> {
    format!("{}T00:00:00Z", date).parse().unwrap()
}

/// Helper to create test session
pub fn session(id: &str, title: &str, status: SessionStatus, created: &str) -> Session {
    Session::new(USER, title)
        .with_id(id)
        .with_status(status)
        .with_created_at(day(created))
}

/// Helper to create test snippet
pub fn snippet(id: &str, session_id: &str, title: &str, code: &str, created: &str) -> Snippet {
    Snippet::new(session_id, USER, title, code, "rust")
        .with_id(id)
        .with_created_at(day(created))
}

/// Helper to create test error log
pub fn error_log(
    id: &str,
    session_id: &str,
    title: &str,
    message: &str,
    severity: Severity,
    status: ErrorStatus,
    created: &str,
) -> ErrorLog {
    ErrorLog::new(session_id, USER, title, message, ErrorType::Runtime, severity)
        .with_id(id)
        .with_status(status)
        .with_created_at(day(created))
}

/// A small, mixed data set used across the search tests
pub fn debugging_records() -> RecordSet {
    RecordSet::new(
        vec![
            session("s-1", "Auth bug", SessionStatus::Active, "2024-01-01")
                .with_description("Login fails after token refresh")
                .with_tags(["auth", "JWT"]),
            session("s-2", "UI glitch", SessionStatus::Resolved, "2024-02-01")
                .with_tags(["frontend"]),
            session("s-3", "Slow report query", SessionStatus::Archived, "2024-01-20"),
        ],
        vec![
            snippet("c-1", "s-1", "Token refresh", "fn refresh(token: &str) {}", "2024-01-02")
                .with_location("src/auth/refresh.rs", Some(10)),
            snippet("c-2", "s-3", "Report SQL", "SELECT * FROM reports", "2024-01-21"),
        ],
        vec![
            error_log(
                "e-1",
                "s-1",
                "Token rejected",
                "NPE while decoding claims",
                Severity::Critical,
                ErrorStatus::Open,
                "2024-01-03",
            )
            .with_stack_trace("at decode (jwt.rs:88)"),
            error_log(
                "e-2",
                "s-2",
                "Button misaligned",
                "typo in css class",
                Severity::Low,
                ErrorStatus::Resolved,
                "2024-02-02",
            ),
            error_log(
                "e-3",
                "s-3",
                "Query timeout",
                "statement timeout after 30s",
                Severity::High,
                ErrorStatus::Investigating,
                "2024-01-22",
            ),
        ],
    )
}

/// Store seeded with [`debugging_records`] plus one record owned by someone else
pub async fn seeded_store() -> InMemoryStore {
    let store = InMemoryStore::from_records(debugging_records()).unwrap();
    store
        .create_session(
            Session::new("user-2", "Auth bug from another account").with_id("s-other"),
        )
        .await
        .unwrap();
    store
}
