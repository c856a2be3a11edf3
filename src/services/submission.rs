// Submission Service
// Validates a Twitter handle and runs the initial analysis request

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::AnalysisPage;
use crate::services::client::{AnalysisService, ClientError};

pub const EMPTY_INPUT_MESSAGE: &str = "Please enter a value before submitting.";
pub const INVALID_USERNAME_MESSAGE: &str =
    "Invalid username. It must be 1-15 characters long and contain only letters, numbers, or underscores.";
pub const SUBMIT_FAILED_MESSAGE: &str = "Something went wrong.";

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("empty input")]
    EmptyInput,
    #[error("invalid username: {0}")]
    InvalidUsername(String),
    #[error("analysis request failed: {0}")]
    Service(#[from] ClientError),
}

impl SubmitError {
    /// Inline message for the submission form.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyInput => EMPTY_INPUT_MESSAGE.to_string(),
            Self::InvalidUsername(_) => INVALID_USERNAME_MESSAGE.to_string(),
            Self::Service(e) => e.user_message(SUBMIT_FAILED_MESSAGE),
        }
    }
}

fn username_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]{1,15}$").expect("valid username regex"))
}

/// Validate a handle, returning it without surrounding whitespace or a leading `@`.
pub fn validate_username(input: &str) -> Result<String, SubmitError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SubmitError::EmptyInput);
    }

    let handle = trimmed.strip_prefix('@').unwrap_or(trimmed);
    if !username_pattern().is_match(handle) {
        return Err(SubmitError::InvalidUsername(handle.to_string()));
    }
    Ok(handle.to_string())
}

/// Validate `input` and fetch the first analyzed page.
///
/// The returned page always carries the submitted username, so it can be
/// handed straight to [`crate::services::analysis::ResultsSession::bootstrap`].
pub async fn submit<S>(service: &S, input: &str, num_tweets: u32) -> Result<AnalysisPage, SubmitError>
where
    S: AnalysisService + ?Sized,
{
    let username = validate_username(input)?;
    info!(username = %username, num_tweets, "submission.start");

    let mut page = service.analyze(&username, num_tweets).await.map_err(|e| {
        warn!(username = %username, error = %e, "submission.failed");
        SubmitError::from(e)
    })?;

    info!(
        username = %username,
        items = page.items.len(),
        has_cursor = page.cursor.is_some(),
        "submission.done"
    );
    page.username = Some(username);
    Ok(page)
}
