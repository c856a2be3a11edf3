// Pagination Engine
// Owns the accumulated tweets of one analysis session and merges "load more" pages into it

use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{AnalysisPage, AnalyzedItem};
use crate::services::client::AnalysisService;

use super::flow::{lock_state, FlowState, LoadingGuard};
use super::verdict::Verdict;

pub const LOAD_MORE_FAILED_MESSAGE: &str = "Failed to load more tweets. Please try again.";

/// Tweets requested by each "load more"
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Aggregate root of one results view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSession {
    pub id: Uuid,
    pub subject: String,
    /// Append-only, oldest first.
    pub items: Vec<AnalyzedItem>,
    pub cursor: Option<String>,
    pub exhausted: bool,
    pub verdict: Verdict,
}

impl AnalysisSession {
    fn seed(subject: String, seed: AnalysisPage) -> Self {
        let verdict = Verdict::seed(seed.message.as_deref(), &seed.items);
        Self {
            id: Uuid::new_v4(),
            subject,
            items: seed.items,
            cursor: seed.cursor,
            exhausted: false,
            verdict,
        }
    }

    /// Append a non-empty page and advance the cursor.
    fn merge(&mut self, page: AnalysisPage) {
        let start = self.items.len();
        self.items.extend(page.items);
        self.cursor = page.cursor;
        self.verdict.merge(&self.items[start..], &self.items);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Another page request is still outstanding.
    InFlight,
    Exhausted,
    /// The service issued no cursor for a further page.
    NoCursor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Skipped(SkipReason),
    Appended { count: usize },
    /// The service returned an empty page; no further fetches will be made.
    Exhausted,
    Failed { message: String },
}

/// Read-only view of the engine for rendering.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session: AnalysisSession,
    pub fetch: FlowState,
    pub has_more: bool,
}

struct EngineState {
    session: AnalysisSession,
    fetch: FlowState,
}

fn fetch_flow(state: &mut EngineState) -> &mut FlowState {
    &mut state.fetch
}

pub struct PaginationEngine {
    service: Arc<dyn AnalysisService>,
    page_size: u32,
    state: Mutex<EngineState>,
}

impl PaginationEngine {
    /// Establish a session from its first page. One engine serves exactly one session.
    pub fn initialize(
        service: Arc<dyn AnalysisService>,
        subject: impl Into<String>,
        seed: AnalysisPage,
        page_size: u32,
    ) -> Self {
        let session = AnalysisSession::seed(subject.into(), seed);
        info!(
            session_id = %session.id,
            username = %session.subject,
            items = session.items.len(),
            has_cursor = session.cursor.is_some(),
            verdict = %session.verdict.message,
            "session.initialized"
        );

        Self {
            service,
            page_size,
            state: Mutex::new(EngineState {
                session,
                fetch: FlowState::Idle,
            }),
        }
    }

    /// Fetch and merge the next page.
    ///
    /// Ignored while another fetch is outstanding, after the stream is exhausted,
    /// or when there is no cursor to continue from. A failure leaves the items,
    /// cursor and exhausted flag untouched. Dropping the returned future before
    /// it completes releases the in-flight guard without merging anything.
    pub async fn fetch_next_page(&self) -> FetchOutcome {
        let (session_id, subject, cursor) = {
            let mut state = lock_state(&self.state);
            if state.session.exhausted {
                return FetchOutcome::Skipped(SkipReason::Exhausted);
            }
            if state.fetch.is_loading() {
                return FetchOutcome::Skipped(SkipReason::InFlight);
            }
            let Some(cursor) = state.session.cursor.clone() else {
                return FetchOutcome::Skipped(SkipReason::NoCursor);
            };
            state.fetch.begin();
            (state.session.id, state.session.subject.clone(), cursor)
        };
        let _loading = LoadingGuard::new(&self.state, fetch_flow);

        let result = self
            .service
            .fetch_page(&subject, self.page_size, Some(&cursor))
            .await;

        let mut state = lock_state(&self.state);
        match result {
            Ok(page) if page.items.is_empty() => {
                state.session.exhausted = true;
                state.fetch.succeed();
                info!(session_id = %session_id, "pagination.exhausted");
                FetchOutcome::Exhausted
            }
            Ok(page) => {
                let count = page.items.len();
                state.session.merge(page);
                state.fetch.succeed();
                info!(
                    session_id = %session_id,
                    appended = count,
                    total = state.session.items.len(),
                    has_cursor = state.session.cursor.is_some(),
                    verdict = %state.session.verdict.message,
                    "pagination.merged"
                );
                FetchOutcome::Appended { count }
            }
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "pagination.failed");
                let message = e.user_message(LOAD_MORE_FAILED_MESSAGE);
                state.fetch.fail(message.clone());
                FetchOutcome::Failed { message }
            }
        }
    }

    /// Snapshot of the accumulated items.
    pub async fn current_items(&self) -> Vec<AnalyzedItem> {
        lock_state(&self.state).session.items.clone()
    }

    pub async fn verdict(&self) -> Verdict {
        lock_state(&self.state).session.verdict.clone()
    }

    pub async fn is_fetching(&self) -> bool {
        lock_state(&self.state).fetch.is_loading()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = lock_state(&self.state);
        SessionSnapshot {
            session: state.session.clone(),
            fetch: state.fetch.clone(),
            has_more: !state.session.exhausted && state.session.cursor.is_some(),
        }
    }
}
