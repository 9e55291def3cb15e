//! Markdown export of a session with its snippets and error logs

use crate::models::{ErrorLog, Session, Snippet};

const NO_DESCRIPTION: &str = "No description provided";

/// A rendered session and the file name it is saved under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionExport {
    pub file_name: String,
    pub markdown: String,
}

/// Render a session and its attached records as a Markdown document
pub fn session_to_markdown(session: &Session, snippets: &[Snippet], errors: &[ErrorLog]) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {}\n\n", session.title));
    out.push_str(&format!(
        "**Created:** {}\n",
        session.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!("**Status:** {}\n", session.status));
    out.push_str(&format!("**Tags:** {}\n\n", session.tags.join(", ")));

    out.push_str("## Description\n");
    out.push_str(session.description.as_deref().unwrap_or(NO_DESCRIPTION));
    out.push_str("\n\n");

    out.push_str(&format!("## Code Snippets ({})\n", snippets.len()));
    for snippet in snippets {
        render_snippet(&mut out, snippet);
    }

    out.push_str(&format!("\n## Error Logs ({})\n", errors.len()));
    for error in errors {
        render_error(&mut out, error);
    }

    out.push_str("\n---\n*Exported from bugtrail*\n");
    out
}

fn render_snippet(out: &mut String, snippet: &Snippet) {
    out.push_str(&format!("\n### {}\n", snippet.title));
    out.push_str(&format!("**Language:** {}\n", snippet.language));
    if let Some(ref file_path) = snippet.file_path {
        out.push_str(&format!("**File:** {}\n", file_path));
    }
    if let Some(line_number) = snippet.line_number {
        out.push_str(&format!("**Line:** {}\n", line_number));
    }
    out.push_str(&format!("\n```{}\n{}\n```\n", snippet.language, snippet.code));
}

fn render_error(out: &mut String, error: &ErrorLog) {
    out.push_str(&format!("\n### {}\n", error.title));
    out.push_str(&format!("**Type:** {}\n", error.error_type));
    out.push_str(&format!("**Severity:** {}\n", error.severity));
    out.push_str(&format!("**Status:** {}\n", error.status));
    out.push_str(&format!("\n**Message:** {}\n", error.message));
    if let Some(ref stack_trace) = error.stack_trace {
        out.push_str(&format!("\n**Stack Trace:**\n```\n{}\n```\n", stack_trace));
    }
}

/// File name for an exported session: the title lower-cased with every
/// character outside `[a-z0-9]` replaced by `_`.
pub fn export_filename(session: &Session) -> String {
    let stem: String = session
        .title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();

    format!("{}.md", stem)
}
