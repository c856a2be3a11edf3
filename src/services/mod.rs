// Sentanal Core Services

pub mod config_store;
pub mod client;
pub mod submission;
pub mod analysis;

pub use config_store::*;
pub use client::{AnalysisClient, AnalysisService, ClientError};
pub use submission::{submit, validate_username, SubmitError};

pub use analysis::{
    compute_verdict,
    confidence_tier,
    ConfidenceTier,
    FetchOutcome,
    PaginationEngine,
    ResultsSession,
    ResultsSnapshot,
};
