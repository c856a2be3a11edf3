// Deep Analysis Coordinator
// Sends the accumulated tweets for a narrative analysis, independent of pagination

use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use crate::models::{AnalyzedItem, DeepAnalysisItem};
use crate::services::client::AnalysisService;

use super::flow::{lock_state, FlowState, LoadingGuard};

pub const DEEP_ANALYSIS_FAILED_MESSAGE: &str = "Failed to fetch analysis. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeepAnalysisOutcome {
    /// Nothing to analyze yet.
    NoItems,
    /// A request is already running.
    InFlight,
    Completed,
    Failed { message: String },
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeepAnalysisSnapshot {
    pub flow: FlowState,
    pub narrative: Option<String>,
}

fn deep_analysis_flow(state: &mut DeepAnalysisSnapshot) -> &mut FlowState {
    &mut state.flow
}

pub struct DeepAnalysisCoordinator {
    service: Arc<dyn AnalysisService>,
    state: Mutex<DeepAnalysisSnapshot>,
}

impl DeepAnalysisCoordinator {
    pub fn new(service: Arc<dyn AnalysisService>) -> Self {
        Self {
            service,
            state: Mutex::new(DeepAnalysisSnapshot::default()),
        }
    }

    /// Request a narrative over `items`.
    ///
    /// The previous narrative is dropped when the request starts and replaced
    /// only on success. Failures are not retried. An abandoned request leaves
    /// the coordinator idle with no narrative.
    pub async fn request(&self, items: &[AnalyzedItem]) -> DeepAnalysisOutcome {
        if items.is_empty() {
            return DeepAnalysisOutcome::NoItems;
        }

        {
            let mut state = lock_state(&self.state);
            if !state.flow.begin() {
                return DeepAnalysisOutcome::InFlight;
            }
            state.narrative = None;
        }
        let _loading = LoadingGuard::new(&self.state, deep_analysis_flow);

        let records: Vec<DeepAnalysisItem> = items.iter().map(DeepAnalysisItem::from).collect();
        info!(items = records.len(), "deep_analysis.start");
        let result = self.service.deep_analysis(&records).await;

        let mut state = lock_state(&self.state);
        match result {
            Ok(narrative) => {
                info!(chars = narrative.chars().count(), "deep_analysis.done");
                state.narrative = Some(narrative);
                state.flow.succeed();
                DeepAnalysisOutcome::Completed
            }
            Err(e) => {
                warn!(error = %e, "deep_analysis.failed");
                let message = e.user_message(DEEP_ANALYSIS_FAILED_MESSAGE);
                state.flow.fail(message.clone());
                DeepAnalysisOutcome::Failed { message }
            }
        }
    }

    pub async fn is_loading(&self) -> bool {
        lock_state(&self.state).flow.is_loading()
    }

    pub async fn snapshot(&self) -> DeepAnalysisSnapshot {
        lock_state(&self.state).clone()
    }
}
