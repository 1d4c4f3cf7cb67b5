use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::core::config::SearchConfig;
use crate::features::map::client::session::SessionEvent;
use crate::features::map::models::SearchResult;
use crate::features::map::services::PlaceSearch;
use crate::shared::constants::EMPTY_SEARCH_MESSAGE;

/// Read-only view of the search box state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchSnapshot {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub is_searching: bool,
    pub empty_message: Option<String>,
    pub error: Option<String>,
}

#[derive(Default)]
struct SearchState {
    query: String,
    results: Vec<SearchResult>,
    is_searching: bool,
    empty_message: Option<String>,
    error: Option<String>,
    /// Generation of the newest request that actually went out
    active: Option<u64>,
}

impl SearchState {
    fn reset_results(&mut self) {
        self.results.clear();
        self.is_searching = false;
        self.empty_message = None;
        self.error = None;
    }
}

/// Everything a spawned request needs
#[derive(Clone)]
struct SearchTask {
    provider: Arc<dyn PlaceSearch>,
    state: Arc<RwLock<SearchState>>,
    generation: Arc<AtomicU64>,
    events: UnboundedSender<SessionEvent>,
    discard_stale: bool,
}

impl SearchTask {
    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    async fn run(self, keyword: String, generation: u64, auto_select: bool) {
        {
            let mut state = self.state.write().await;
            if !self.is_current(generation) {
                debug!("Query changed before {:?} was sent, skipping", keyword);
                return;
            }
            state.is_searching = true;
            state.active = Some(generation);
        }
        debug!("Searching places for {:?}", keyword);

        let outcome = self.provider.search(&keyword).await;

        let mut state = self.state.write().await;

        if self.discard_stale && !self.is_current(generation) {
            debug!("Discarding stale results for {:?}", keyword);
            // No newer request went out after this one, so nothing else will clear it
            if state.active == Some(generation) {
                state.is_searching = false;
            }
            return;
        }

        state.is_searching = false;

        match outcome {
            Ok(results) if results.is_empty() => {
                state.results.clear();
                state.empty_message = Some(EMPTY_SEARCH_MESSAGE.to_string());
                state.error = None;
            }
            Ok(mut results) if auto_select => {
                let first = results.swap_remove(0);
                self.commit(first.clone());
                state.query = first.name;
                state.results.clear();
                state.empty_message = None;
                state.error = None;
            }
            Ok(results) => {
                debug!("{} places found for {:?}", results.len(), keyword);
                state.results = results;
                state.empty_message = None;
                state.error = None;
            }
            Err(e) => {
                warn!("Place search for {:?} failed: {}", keyword, e);
                state.results.clear();
                state.empty_message = Some(EMPTY_SEARCH_MESSAGE.to_string());
                state.error = Some(e.to_string());
            }
        }
    }

    fn commit(&self, result: SearchResult) {
        debug!("Search result selected: {:?}", result.name);
        if self.events.send(SessionEvent::SearchSelected(result.location)).is_err() {
            debug!("Search selection dropped, session closed");
        }
    }
}

/// Debounced place search behind the search box.
///
/// Each keystroke restarts the debounce timer. Requests that already left
/// keep running; when stale discarding is on, only the newest request may
/// write results.
pub struct SearchCoordinator {
    task: SearchTask,
    config: SearchConfig,
    timer: Option<JoinHandle<()>>,
}

impl SearchCoordinator {
    pub fn new(
        provider: Arc<dyn PlaceSearch>,
        events: UnboundedSender<SessionEvent>,
        config: SearchConfig,
    ) -> Self {
        Self {
            task: SearchTask {
                provider,
                state: Arc::new(RwLock::new(SearchState::default())),
                generation: Arc::new(AtomicU64::new(0)),
                events,
                discard_stale: config.discard_stale_responses,
            },
            config,
            timer: None,
        }
    }

    /// Keystroke in the search box
    pub async fn on_query_change(&mut self, text: &str) {
        self.cancel_timer();
        let generation = self.next_generation();

        let mut state = self.task.state.write().await;
        state.query = text.to_string();

        let Some(keyword) = self.searchable(text) else {
            state.reset_results();
            return;
        };
        drop(state);

        let task = self.task.clone();
        let debounce = self.config.debounce;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            // Detached from the timer so aborting the timer never cancels a request
            tokio::spawn(task.run(keyword, generation, false));
        }));
    }

    /// Enter pressed: search now and take the first hit.
    ///
    /// Returns the request task, or `None` when the query is too short.
    pub async fn on_confirm(&mut self, text: &str) -> Option<JoinHandle<()>> {
        self.cancel_timer();
        let generation = self.next_generation();

        let mut state = self.task.state.write().await;
        state.query = text.to_string();

        let Some(keyword) = self.searchable(text) else {
            state.reset_results();
            return None;
        };
        drop(state);

        Some(tokio::spawn(self.task.clone().run(keyword, generation, true)))
    }

    /// Pick a result from the list: commit it and clear the box
    pub async fn select_result(&mut self, index: usize) -> Option<SearchResult> {
        let mut state = self.task.state.write().await;
        let result = state.results.get(index).cloned()?;

        state.query.clear();
        state.reset_results();
        drop(state);

        self.cancel_timer();
        self.next_generation();
        self.task.commit(result.clone());
        Some(result)
    }

    pub async fn snapshot(&self) -> SearchSnapshot {
        let state = self.task.state.read().await;
        SearchSnapshot {
            query: state.query.clone(),
            results: state.results.clone(),
            is_searching: state.is_searching,
            empty_message: state.empty_message.clone(),
            error: state.error.clone(),
        }
    }

    /// Trimmed keyword, if long enough to send
    fn searchable(&self, text: &str) -> Option<String> {
        let trimmed = text.trim();
        (trimmed.chars().count() >= self.config.min_query_chars).then(|| trimmed.to_string())
    }

    fn next_generation(&self) -> u64 {
        self.task.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for SearchCoordinator {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
