//! Dashboard figures and the per-view list filters

use crate::models::{ErrorLog, Session, Snippet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Headline counts shown on the dashboard
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_sessions: usize,
    pub total_snippets: usize,
    pub total_errors: usize,
    pub resolved_errors: usize,
}

impl DashboardStats {
    pub fn compute(sessions: &[Session], snippets: &[Snippet], errors: &[ErrorLog]) -> Self {
        Self {
            total_sessions: sessions.len(),
            total_snippets: snippets.len(),
            total_errors: errors.len(),
            resolved_errors: errors.iter().filter(|e| e.is_resolved()).count(),
        }
    }

    /// Share of error logs resolved, as a rounded percentage. Zero when
    /// there are no error logs.
    pub fn resolution_rate(&self) -> u32 {
        if self.total_errors == 0 {
            return 0;
        }
        ((self.resolved_errors as f64 / self.total_errors as f64) * 100.0).round() as u32
    }
}

/// Dashboard payload: counts plus the latest sessions
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub recent_sessions: Vec<Session>,
}

/// The `limit` newest sessions, newest first
pub fn recent_sessions(sessions: &[Session], limit: usize) -> Vec<Session> {
    let mut recent = sessions.to_vec();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.truncate(limit);
    recent
}

/// Filter used by the error log list view.
///
/// Each field is optional; an empty string means unset. Values compare by
/// exact name, so an unknown name matches nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorLogFilter {
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl ErrorLogFilter {
    pub fn matches(&self, error: &ErrorLog) -> bool {
        axis_matches(&self.error_type, error.error_type.as_str())
            && axis_matches(&self.severity, error.severity.as_str())
            && axis_matches(&self.status, error.status.as_str())
    }

    pub fn apply(&self, errors: &[ErrorLog]) -> Vec<ErrorLog> {
        errors.iter().filter(|e| self.matches(e)).cloned().collect()
    }
}

/// Filter used by the snippet list view
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnippetFilter {
    #[serde(default)]
    pub language: Option<String>,
}

impl SnippetFilter {
    pub fn matches(&self, snippet: &Snippet) -> bool {
        axis_matches(&self.language, &snippet.language)
    }

    pub fn apply(&self, snippets: &[Snippet]) -> Vec<Snippet> {
        snippets.iter().filter(|s| self.matches(s)).cloned().collect()
    }
}

/// Distinct snippet languages, sorted
pub fn languages(snippets: &[Snippet]) -> Vec<String> {
    snippets
        .iter()
        .map(|s| s.language.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn axis_matches(wanted: &Option<String>, actual: &str) -> bool {
    match wanted.as_deref() {
        None | Some("") => true,
        Some(wanted) => wanted == actual,
    }
}
