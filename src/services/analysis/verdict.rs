// Verdict Logic
// Derives the session-level depression verdict and per-tweet confidence tiers

use crate::models::AnalyzedItem;
use serde::Serialize;

pub const DEPRESSION_VERDICT: &str = "The user shows signs of depression.";
pub const NO_DEPRESSION_VERDICT: &str = "No signs of depression detected.";
pub const PENDING_VERDICT: &str = "Analysis pending...";

/// Classifier labels that count as a depression signal.
/// The results view labels with "Shows signs of depression"; the classifier itself
/// emits severities, of which "Moderate" and "Severe" are signals.
pub const DEPRESSION_LABELS: &[&str] = &["Shows signs of depression", "Moderate", "Severe"];

const HIGH_CONFIDENCE_MIN: f64 = 80.0;
const MEDIUM_CONFIDENCE_MIN: f64 = 50.0;

pub fn is_depression_label(label: &str) -> bool {
    DEPRESSION_LABELS.contains(&label)
}

pub fn has_depression_signal(items: &[AnalyzedItem]) -> bool {
    items.iter().any(|item| is_depression_label(&item.analysis_label))
}

/// Verdict over a whole collection: any signal item flips it.
pub fn compute_verdict(items: &[AnalyzedItem]) -> &'static str {
    if has_depression_signal(items) {
        DEPRESSION_VERDICT
    } else {
        NO_DEPRESSION_VERDICT
    }
}

/// Where the current verdict came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum VerdictSource {
    /// Supplied by the service with the first page; only ever upgraded.
    Authoritative,
    /// Recomputed from the accumulated items after every merge.
    Derived,
}

/// Running verdict of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub message: String,
    pub source: VerdictSource,
}

impl Verdict {
    /// Initial verdict from a seed page.
    ///
    /// A non-empty seed message is authoritative, but seed items carrying a
    /// depression signal still upgrade it. Without a message the verdict is
    /// derived, and stays pending until there is at least one item.
    pub fn seed(message: Option<&str>, items: &[AnalyzedItem]) -> Self {
        match message.filter(|m| !m.trim().is_empty()) {
            Some(message) => {
                let mut verdict = Self {
                    message: message.to_string(),
                    source: VerdictSource::Authoritative,
                };
                verdict.absorb(items);
                verdict
            }
            None => {
                let message = if items.is_empty() {
                    PENDING_VERDICT
                } else {
                    compute_verdict(items)
                };
                Self {
                    message: message.to_string(),
                    source: VerdictSource::Derived,
                }
            }
        }
    }

    /// Update after `new_items` were appended, `all_items` being the full collection.
    pub fn merge(&mut self, new_items: &[AnalyzedItem], all_items: &[AnalyzedItem]) {
        match self.source {
            VerdictSource::Authoritative => self.absorb(new_items),
            VerdictSource::Derived => {
                // Sticky: a derived depression verdict never regresses either.
                if !self.shows_depression() && !all_items.is_empty() {
                    self.message = compute_verdict(all_items).to_string();
                }
            }
        }
    }

    pub fn shows_depression(&self) -> bool {
        self.message.trim() == DEPRESSION_VERDICT
    }

    fn absorb(&mut self, items: &[AnalyzedItem]) {
        if has_depression_signal(items) && !self.shows_depression() {
            self.message = DEPRESSION_VERDICT.to_string();
        }
    }
}

// ============ Confidence Tiers ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High Confidence",
            Self::Medium => "Medium Confidence",
            Self::Low => "Low Confidence",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::High => "green",
            Self::Medium => "amber",
            Self::Low => "red",
        }
    }
}

/// Bucket a 0-100 score. Boundaries belong to the higher tier; NaN is Low.
pub fn confidence_tier(score: f64) -> ConfidenceTier {
    if score >= HIGH_CONFIDENCE_MIN {
        ConfidenceTier::High
    } else if score >= MEDIUM_CONFIDENCE_MIN {
        ConfidenceTier::Medium
    } else {
        ConfidenceTier::Low
    }
}

/// Tier of an item, unparsable scores counting as Low.
pub fn item_confidence_tier(item: &AnalyzedItem) -> ConfidenceTier {
    item.confidence_score
        .value()
        .map(confidence_tier)
        .unwrap_or(ConfidenceTier::Low)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConfidenceScore;

    fn item(label: &str) -> AnalyzedItem {
        AnalyzedItem {
            text: "tweet".to_string(),
            emotion_label: "Neutral".to_string(),
            analysis_label: label.to_string(),
            confidence_score: ConfidenceScore::from("70%"),
        }
    }

    #[test]
    fn test_confidence_tier_boundaries() {
        assert_eq!(confidence_tier(79.9), ConfidenceTier::Medium);
        assert_eq!(confidence_tier(80.0), ConfidenceTier::High);
        assert_eq!(confidence_tier(49.99), ConfidenceTier::Low);
        assert_eq!(confidence_tier(50.0), ConfidenceTier::Medium);
        assert_eq!(confidence_tier(f64::NAN), ConfidenceTier::Low);
        assert_eq!(ConfidenceTier::Medium.color(), "amber");
    }

    #[test]
    fn test_item_tier_parses_percent() {
        let mut it = item("Not depression");
        it.confidence_score = ConfidenceScore::from("80%");
        assert_eq!(item_confidence_tier(&it), ConfidenceTier::High);
        it.confidence_score = ConfidenceScore::from("unknown");
        assert_eq!(item_confidence_tier(&it), ConfidenceTier::Low);
    }

    #[test]
    fn test_compute_verdict_any_item() {
        assert_eq!(compute_verdict(&[]), NO_DEPRESSION_VERDICT);
        assert_eq!(
            compute_verdict(&[item("Not depression"), item("Not depression")]),
            NO_DEPRESSION_VERDICT
        );
        assert_eq!(
            compute_verdict(&[item("Not depression"), item("Shows signs of depression")]),
            DEPRESSION_VERDICT
        );
        assert_eq!(compute_verdict(&[item("Severe")]), DEPRESSION_VERDICT);
    }

    #[test]
    fn test_compute_verdict_is_monotonic() {
        let mut items = vec![item("Moderate")];
        for _ in 0..5 {
            items.push(item("Not depression"));
            assert_eq!(compute_verdict(&items), DEPRESSION_VERDICT);
        }
    }

    #[test]
    fn test_seed_without_message() {
        let v = Verdict::seed(None, &[item("Shows signs of depression")]);
        assert_eq!(v.message, DEPRESSION_VERDICT);
        assert_eq!(v.source, VerdictSource::Derived);

        let v = Verdict::seed(Some(""), &[item("Not depression"), item("Not depression")]);
        assert_eq!(v.message, NO_DEPRESSION_VERDICT);

        let v = Verdict::seed(None, &[]);
        assert_eq!(v.message, PENDING_VERDICT);
    }

    #[test]
    fn test_authoritative_seed_kept_unless_upgrade() {
        let v = Verdict::seed(Some("No signs of depression detected."), &[item("Not depression")]);
        assert_eq!(v.message, NO_DEPRESSION_VERDICT);
        assert_eq!(v.source, VerdictSource::Authoritative);

        let v = Verdict::seed(Some("No signs of depression detected."), &[item("Severe")]);
        assert_eq!(v.message, DEPRESSION_VERDICT);

        // Stale depression message is never downgraded.
        let v = Verdict::seed(Some(DEPRESSION_VERDICT), &[item("Not depression")]);
        assert_eq!(v.message, DEPRESSION_VERDICT);
    }

    #[test]
    fn test_authoritative_seed_stored_verbatim() {
        let raw = "  No signs of depression detected.\n";
        let v = Verdict::seed(Some(raw), &[item("Not depression")]);
        assert_eq!(v.message, raw);
        assert_eq!(v.source, VerdictSource::Authoritative);

        let padded = format!(" {} ", DEPRESSION_VERDICT);
        let v = Verdict::seed(Some(&padded), &[item("Severe")]);
        assert!(v.shows_depression());
        assert_eq!(v.message, padded);

        // Whitespace-only counts as absent.
        let v = Verdict::seed(Some("   "), &[]);
        assert_eq!(v.message, PENDING_VERDICT);
        assert_eq!(v.source, VerdictSource::Derived);
    }

    #[test]
    fn test_merge_upgrades_and_sticks() {
        let mut items = vec![item("Not depression")];
        let mut v = Verdict::seed(Some(NO_DEPRESSION_VERDICT), &items);

        let page = vec![item("Shows signs of depression")];
        items.extend(page.iter().cloned());
        v.merge(&page, &items);
        assert!(v.shows_depression());

        let page = vec![item("Not depression")];
        items.extend(page.iter().cloned());
        v.merge(&page, &items);
        assert!(v.shows_depression());
    }

    #[test]
    fn test_derived_pending_resolves_on_first_items() {
        let mut v = Verdict::seed(None, &[]);
        let page = vec![item("Not depression")];
        v.merge(&page, &page);
        assert_eq!(v.message, NO_DEPRESSION_VERDICT);
    }
}
