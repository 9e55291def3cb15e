use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use uuid::Uuid;
use validator::Validate;

/// An error captured while debugging a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ErrorLog {
    /// Unique identifier
    pub id: String,

    /// Session this error belongs to
    pub session_id: String,

    /// Owning user
    pub user_id: String,

    /// Human-readable title
    #[validate(length(min = 1, max = 500))]
    pub title: String,

    /// Error message as reported
    pub message: String,

    /// Captured stack trace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,

    /// Error category
    pub error_type: ErrorType,

    /// Severity level
    pub severity: Severity,

    /// Triage status
    pub status: ErrorStatus,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl ErrorLog {
    /// Create a new open error log
    pub fn new(
        session_id: impl Into<String>,
        user_id: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
        error_type: ErrorType,
        severity: Severity,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.into(),
            user_id: user_id.into(),
            title: title.into(),
            message: message.into(),
            stack_trace: None,
            error_type,
            severity,
            status: ErrorStatus::Open,
            created_at: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_stack_trace(mut self, stack_trace: impl Into<String>) -> Self {
        self.stack_trace = Some(stack_trace.into());
        self
    }

    pub fn with_status(mut self, status: ErrorStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn is_resolved(&self) -> bool {
        self.status == ErrorStatus::Resolved
    }
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, EnumString, Display, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ErrorType {
    Syntax,
    Runtime,
    Logic,
    Network,
    Database,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, EnumString, Display,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Check if severity needs attention before anything else
    pub fn is_urgent(&self) -> bool {
        matches!(self, Severity::High | Severity::Critical)
    }
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, EnumString, Display, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ErrorStatus {
    Open,
    Investigating,
    Resolved,
}

impl ErrorStatus {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}
