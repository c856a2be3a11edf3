// Analysis Module
// Results-view core organized into specialized submodules:
// - flow: per-flow loading/error state machine
// - verdict: overall depression verdict and confidence tiers
// - engine: pagination and merging of analyzed tweets
// - deep_analysis: narrative analysis requests
// - profile: account profile fetch
// - session: bootstrap and wiring of the three flows

pub mod flow;
pub mod verdict;
pub mod engine;
pub mod deep_analysis;
pub mod profile;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use flow::FlowState;
pub use verdict::{
    compute_verdict,
    confidence_tier,
    item_confidence_tier,
    is_depression_label,
    ConfidenceTier,
    Verdict,
    VerdictSource,
    DEPRESSION_VERDICT,
    NO_DEPRESSION_VERDICT,
    PENDING_VERDICT,
};
pub use engine::{
    AnalysisSession,
    FetchOutcome,
    PaginationEngine,
    SessionSnapshot,
    SkipReason,
    DEFAULT_PAGE_SIZE,
    LOAD_MORE_FAILED_MESSAGE,
};
pub use deep_analysis::{
    DeepAnalysisCoordinator,
    DeepAnalysisOutcome,
    DeepAnalysisSnapshot,
    DEEP_ANALYSIS_FAILED_MESSAGE,
};
pub use profile::{ProfileLoader, ProfileOutcome, ProfileSnapshot, PROFILE_FAILED_MESSAGE};
pub use session::{BootstrapError, ResultsSession, ResultsSnapshot};
