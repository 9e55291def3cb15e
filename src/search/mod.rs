//! Query-driven search across sessions, snippets and error logs
//!
//! This module filters already-fetched collections in memory:
//!
//! - **Free text**: case-insensitive substring match over each record
//!   kind's text fields (session title/description/tags, snippet
//!   title/code/file path, error title/message/stack trace)
//! - **Filters**: content type, status, severity and an inclusive
//!   `created_at` window, all ANDed with the text match
//! - **Aggregations**: counts by status, severity, error type, language
//!
//! A blank query yields no results; search is never a browse-all mode.
//! Results keep the input order of each collection.
//!
//! # Example
//!
//! ```no_run
//! use bugtrail::search::{RecordSet, SearchQuery};
//!
//! let records = RecordSet::default();
//! let query = SearchQuery::new("timeout")
//!     .with_type("errors")
//!     .with_severity("critical");
//!
//! let results = records.search(&query);
//! println!("Found {} records", results.total_count());
//! ```

mod config;
mod document;
mod engine;
mod query;
mod results;

pub use config::{SearchConfig, SearchConfigBuilder};
pub use document::{ContentType, SearchDocument};
pub use engine::{search, RecordSet};
pub use query::{DateRange, SearchFilter, SearchQuery, TypeScope};
pub use results::{Aggregation, FacetCount, SearchResults};
