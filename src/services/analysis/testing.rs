// Scripted analysis service for unit tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::models::{AnalysisPage, AnalyzedItem, ConfidenceScore, DeepAnalysisItem, ProfileInfo};
use crate::services::client::{AnalysisService, ClientError};

type Script<T> = Mutex<VecDeque<Result<T, ClientError>>>;

/// Replays queued responses and records every call.
#[derive(Default)]
pub struct ScriptedService {
    analyze: Script<AnalysisPage>,
    pages: Script<AnalysisPage>,
    profiles: Script<ProfileInfo>,
    narratives: Script<String>,
    analyze_calls: AtomicUsize,
    page_calls: AtomicUsize,
    profile_calls: AtomicUsize,
    deep_calls: AtomicUsize,
    page_requests: Mutex<Vec<(String, u32, Option<String>)>>,
    deep_requests: Mutex<Vec<Vec<DeepAnalysisItem>>>,
    page_gate: Mutex<Option<RequestGate>>,
    profile_gate: Mutex<Option<RequestGate>>,
    narrative_gate: Mutex<Option<RequestGate>>,
}

/// Holds requests open until released.
#[derive(Clone)]
pub struct RequestGate {
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item(text: &str, label: &str) -> AnalyzedItem {
        AnalyzedItem {
            text: text.to_string(),
            emotion_label: "Neutral".to_string(),
            analysis_label: label.to_string(),
            confidence_score: ConfidenceScore::from("75.5%"),
        }
    }

    pub fn page(items: Vec<AnalyzedItem>, cursor: Option<&str>) -> AnalysisPage {
        AnalysisPage {
            username: None,
            items,
            cursor: cursor.map(str::to_string),
            message: None,
        }
    }

    pub fn api_error(status: u16, body: &str) -> ClientError {
        ClientError::ApiError {
            status,
            message: body.to_string(),
        }
    }

    pub fn push_analyze(&self, response: Result<AnalysisPage, ClientError>) {
        self.analyze.lock().unwrap().push_back(response);
    }

    pub fn push_page(&self, response: Result<AnalysisPage, ClientError>) {
        self.pages.lock().unwrap().push_back(response);
    }

    pub fn push_profile(&self, response: Result<ProfileInfo, ClientError>) {
        self.profiles.lock().unwrap().push_back(response);
    }

    pub fn push_narrative(&self, response: Result<String, ClientError>) {
        self.narratives.lock().unwrap().push_back(response);
    }

    pub fn gate_pages(&self) -> RequestGate {
        Self::install_gate(&self.page_gate)
    }

    pub fn gate_profiles(&self) -> RequestGate {
        Self::install_gate(&self.profile_gate)
    }

    pub fn gate_narratives(&self) -> RequestGate {
        Self::install_gate(&self.narrative_gate)
    }

    fn install_gate(slot: &Mutex<Option<RequestGate>>) -> RequestGate {
        let gate = RequestGate {
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        };
        *slot.lock().unwrap() = Some(gate.clone());
        gate
    }

    async fn pass_gate(slot: &Mutex<Option<RequestGate>>) {
        let gate = slot.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
    }

    pub fn analyze_calls(&self) -> usize {
        self.analyze_calls.load(Ordering::SeqCst)
    }

    pub fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }

    pub fn profile_calls(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
    }

    pub fn deep_calls(&self) -> usize {
        self.deep_calls.load(Ordering::SeqCst)
    }

    pub fn page_requests(&self) -> Vec<(String, u32, Option<String>)> {
        self.page_requests.lock().unwrap().clone()
    }

    pub fn deep_requests(&self) -> Vec<Vec<DeepAnalysisItem>> {
        self.deep_requests.lock().unwrap().clone()
    }

    fn next<T>(script: &Script<T>) -> Result<T, ClientError> {
        script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ClientError::MissingContent))
    }
}

#[async_trait]
impl AnalysisService for ScriptedService {
    async fn analyze(&self, _username: &str, _num_tweets: u32) -> Result<AnalysisPage, ClientError> {
        self.analyze_calls.fetch_add(1, Ordering::SeqCst);
        Self::next(&self.analyze)
    }

    async fn fetch_page(
        &self,
        username: &str,
        page_size: u32,
        cursor: Option<&str>,
    ) -> Result<AnalysisPage, ClientError> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        self.page_requests
            .lock()
            .unwrap()
            .push((username.to_string(), page_size, cursor.map(str::to_string)));

        Self::pass_gate(&self.page_gate).await;
        Self::next(&self.pages)
    }

    async fn fetch_profile(&self, _username: &str) -> Result<ProfileInfo, ClientError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        Self::pass_gate(&self.profile_gate).await;
        Self::next(&self.profiles)
    }

    async fn deep_analysis(&self, items: &[DeepAnalysisItem]) -> Result<String, ClientError> {
        self.deep_calls.fetch_add(1, Ordering::SeqCst);
        self.deep_requests.lock().unwrap().push(items.to_vec());
        Self::pass_gate(&self.narrative_gate).await;
        Self::next(&self.narratives)
    }
}
