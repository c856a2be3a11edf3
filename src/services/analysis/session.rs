// Results Session
// Seeds a session from the submission payload and runs its three independent flows

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::models::AnalysisPage;
use crate::services::client::AnalysisService;

use super::deep_analysis::{DeepAnalysisCoordinator, DeepAnalysisOutcome, DeepAnalysisSnapshot};
use super::engine::{FetchOutcome, PaginationEngine, SessionSnapshot};
use super::profile::{ProfileLoader, ProfileOutcome, ProfileSnapshot};

#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("bootstrap payload carries no username")]
    MissingUsername,
}

/// Everything the results view renders.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsSnapshot {
    pub pagination: SessionSnapshot,
    pub profile: ProfileSnapshot,
    pub deep_analysis: DeepAnalysisSnapshot,
}

/// One results view: pagination, profile and deep analysis, each with its own
/// loading and error state.
pub struct ResultsSession {
    username: String,
    pagination: PaginationEngine,
    profile: ProfileLoader,
    deep_analysis: DeepAnalysisCoordinator,
}

impl ResultsSession {
    /// Build a session from the page produced by the submission step.
    pub fn bootstrap(
        service: Arc<dyn AnalysisService>,
        payload: AnalysisPage,
        page_size: u32,
    ) -> Result<Self, BootstrapError> {
        let username = payload
            .username
            .clone()
            .filter(|u| !u.trim().is_empty())
            .ok_or(BootstrapError::MissingUsername)?;

        Ok(Self {
            pagination: PaginationEngine::initialize(service.clone(), username.clone(), payload, page_size),
            profile: ProfileLoader::new(service.clone()),
            deep_analysis: DeepAnalysisCoordinator::new(service),
            username,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn pagination(&self) -> &PaginationEngine {
        &self.pagination
    }

    pub async fn load_more(&self) -> FetchOutcome {
        self.pagination.fetch_next_page().await
    }

    pub async fn load_profile(&self) -> ProfileOutcome {
        self.profile.load(&self.username).await
    }

    /// Deep analysis over the tweets accumulated so far.
    pub async fn request_deep_analysis(&self) -> DeepAnalysisOutcome {
        let items = self.pagination.current_items().await;
        self.deep_analysis.request(&items).await
    }

    pub async fn snapshot(&self) -> ResultsSnapshot {
        ResultsSnapshot {
            pagination: self.pagination.snapshot().await,
            profile: self.profile.snapshot().await,
            deep_analysis: self.deep_analysis.snapshot().await,
        }
    }
}
