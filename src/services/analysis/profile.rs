// Profile Loader
// Fetches the analyzed account's profile once per session, independent of pagination

use chrono::{DateTime, NaiveDateTime};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use crate::models::ProfileInfo;
use crate::services::client::AnalysisService;

use super::flow::{lock_state, FlowState, LoadingGuard};

pub const PROFILE_FAILED_MESSAGE: &str = "Failed to load profile information.";
const NO_BIO: &str = "No bio available.";

impl ProfileInfo {
    pub fn bio_or_default(&self) -> &str {
        self.bio
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or(NO_BIO)
    }

    /// Join date as "Tue Mar 21 2006"; unparsable timestamps are returned as-is.
    pub fn joined_display(&self) -> String {
        let raw = self.created_at.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return dt.format("%a %b %d %Y").to_string();
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return dt.format("%a %b %d %Y").to_string();
        }
        raw.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileOutcome {
    InFlight,
    Loaded,
    Failed { message: String },
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSnapshot {
    pub flow: FlowState,
    pub profile: Option<ProfileInfo>,
}

fn profile_flow(state: &mut ProfileSnapshot) -> &mut FlowState {
    &mut state.flow
}

pub struct ProfileLoader {
    service: Arc<dyn AnalysisService>,
    state: Mutex<ProfileSnapshot>,
}

impl ProfileLoader {
    pub fn new(service: Arc<dyn AnalysisService>) -> Self {
        Self {
            service,
            state: Mutex::new(ProfileSnapshot::default()),
        }
    }

    /// Fetch the profile of `username`. The last successful fetch wins.
    pub async fn load(&self, username: &str) -> ProfileOutcome {
        let started = lock_state(&self.state).flow.begin();
        if !started {
            return ProfileOutcome::InFlight;
        }
        let _loading = LoadingGuard::new(&self.state, profile_flow);

        let result = self.service.fetch_profile(username).await;

        let mut state = lock_state(&self.state);
        match result {
            Ok(profile) => {
                info!(
                    username,
                    followers = profile.followers_count,
                    following = profile.following_count,
                    "profile.loaded"
                );
                state.profile = Some(profile);
                state.flow.succeed();
                ProfileOutcome::Loaded
            }
            Err(e) => {
                warn!(username, error = %e, "profile.failed");
                let message = e.user_message(PROFILE_FAILED_MESSAGE);
                state.flow.fail(message.clone());
                ProfileOutcome::Failed { message }
            }
        }
    }

    pub async fn snapshot(&self) -> ProfileSnapshot {
        lock_state(&self.state).clone()
    }
}
