//! Search service wiring the record store, the filter engine and the debouncer

use crate::debounce::Debouncer;
use crate::error::{AppError, Result};
use crate::export::{self, SessionExport};
use crate::search::{RecordSet, SearchConfig, SearchFilter, SearchQuery, SearchResults};
use crate::state::{ListOptions, RecordStore, SortOrder};
use crate::stats::{self, Dashboard, DashboardStats};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Main search service
pub struct SearchService {
    store: Arc<dyn RecordStore>,
}

impl SearchService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Fetch the user's three collections, newest first
    pub async fn load(&self, user_id: &str) -> Result<RecordSet> {
        let options = ListOptions::for_user(user_id);

        let (sessions, snippets, errors) = futures::try_join!(
            self.store.list_sessions(&options),
            self.store.list_snippets(&options),
            self.store.list_error_logs(&options),
        )?;

        Ok(RecordSet::new(sessions, snippets, errors))
    }

    /// Search the user's records. A blank query never reaches the store.
    pub async fn search(&self, user_id: &str, query: &SearchQuery) -> Result<SearchResults> {
        if query.is_blank() {
            return Ok(SearchResults::default());
        }

        let start_time = std::time::Instant::now();
        let records = self.load(user_id).await?;
        let results = records.search(query);

        debug!(
            user_id = %user_id,
            query = %query.query,
            sessions = results.sessions.len(),
            snippets = results.snippets.len(),
            errors = results.errors.len(),
            elapsed_us = start_time.elapsed().as_micros() as u64,
            "Search completed"
        );

        Ok(results)
    }

    /// Dashboard counts plus the `recent_limit` newest sessions
    pub async fn dashboard(&self, user_id: &str, recent_limit: usize) -> Result<Dashboard> {
        let records = self.load(user_id).await?;

        Ok(Dashboard {
            stats: DashboardStats::compute(&records.sessions, &records.snippets, &records.errors),
            recent_sessions: stats::recent_sessions(&records.sessions, recent_limit),
        })
    }

    /// Render one of the user's sessions and its attached records as
    /// Markdown. Another user's session is reported as not found.
    pub async fn export_session(&self, user_id: &str, session_id: &str) -> Result<SessionExport> {
        let session = self
            .store
            .get_session(session_id)
            .await?
            .filter(|session| session.user_id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("Session {} not found", session_id)))?;

        let options = ListOptions::for_user(user_id)
            .with_session(session_id)
            .with_order(SortOrder::Ascending);
        let (snippets, errors) = futures::try_join!(
            self.store.list_snippets(&options),
            self.store.list_error_logs(&options),
        )?;

        debug!(
            user_id = %user_id,
            session_id = %session_id,
            snippets = snippets.len(),
            errors = errors.len(),
            "Session exported"
        );

        Ok(SessionExport {
            file_name: export::export_filename(&session),
            markdown: export::session_to_markdown(&session, &snippets, &errors),
        })
    }
}

/// Latest results published by a [`SearchSession`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchUpdate {
    /// Query the results were computed for
    pub query: SearchQuery,
    pub results: SearchResults,
}

/// Transient search-as-you-type state for one user.
///
/// Every change to the query text or the filters schedules a debounced
/// search; only the last change in a quiet window runs. Results are
/// published on a watch channel, and a search that finishes after a newer
/// change was made is discarded.
pub struct SearchSession {
    service: Arc<SearchService>,
    user_id: String,
    current: Mutex<SearchQuery>,
    debouncer: Debouncer,
    updates: Arc<watch::Sender<SearchUpdate>>,
    generation: Arc<AtomicU64>,
}

impl SearchSession {
    pub fn new(service: Arc<SearchService>, user_id: impl Into<String>, config: &SearchConfig) -> Self {
        let (updates, _) = watch::channel(SearchUpdate::default());

        Self {
            service,
            user_id: user_id.into(),
            current: Mutex::new(SearchQuery::default()),
            debouncer: Debouncer::new(config.debounce()),
            updates: Arc::new(updates),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Receive every published result set
    pub fn subscribe(&self) -> watch::Receiver<SearchUpdate> {
        self.updates.subscribe()
    }

    /// Most recently published results
    pub fn latest(&self) -> SearchUpdate {
        self.updates.borrow().clone()
    }

    pub fn current_query(&self) -> SearchQuery {
        self.current.lock().clone()
    }

    pub fn has_active_filters(&self) -> bool {
        self.current.lock().filters.is_active()
    }

    /// Whether a search is waiting for input to settle
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn set_query(&self, text: impl Into<String>) {
        self.current.lock().query = text.into();
        self.schedule();
    }

    pub fn set_filter(&self, filters: SearchFilter) {
        self.current.lock().filters = filters;
        self.schedule();
    }

    /// Drop all filters, keeping the query text
    pub fn clear_filters(&self) {
        self.set_filter(SearchFilter::default());
    }

    /// Forget the query and filters, cancel any pending search and publish
    /// empty results
    pub fn reset(&self) {
        *self.current.lock() = SearchQuery::default();
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.debouncer.cancel();
        self.updates.send_replace(SearchUpdate::default());
    }

    fn schedule(&self) {
        let query = self.current_query();
        let service = self.service.clone();
        let user_id = self.user_id.clone();
        let updates = self.updates.clone();
        let generation = self.generation.clone();
        let scheduled = generation.fetch_add(1, Ordering::AcqRel) + 1;

        self.debouncer.schedule(async move {
            match service.search(&user_id, &query).await {
                Ok(results) => {
                    // Checked under the channel lock so a newer change always wins
                    let published = updates.send_if_modified(|latest| {
                        if generation.load(Ordering::Acquire) != scheduled {
                            return false;
                        }
                        *latest = SearchUpdate { query, results };
                        true
                    });
                    if !published {
                        debug!(user_id = %user_id, "Discarded stale search results");
                    }
                }
                Err(e) => {
                    // Previous results stay published
                    warn!(user_id = %user_id, error = %e, "Search failed");
                }
            }
        });
    }
}
