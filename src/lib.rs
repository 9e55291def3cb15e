//! Search, filter and export recorded debugging sessions, code snippets
//! and error logs.
//!
//! The records themselves live in an external document store, reached
//! through the [`state::RecordStore`] trait. This crate filters snapshots
//! of those collections in memory ([`search`]), debounces search-as-you-type
//! input ([`debounce`]), and derives dashboard figures and Markdown exports.

pub mod config;
pub mod debounce;
pub mod error;
pub mod export;
pub mod models;
pub mod search;
pub mod service;
pub mod state;
pub mod stats;
pub mod telemetry;

pub use error::{AppError, Result};
