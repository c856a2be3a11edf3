// Sentanal Data Models
// Wire shapes exchanged with the tweet analysis service

use serde::{Deserialize, Serialize};

// ============ Analyzed Items ============

/// Confidence score as delivered by the service.
///
/// The classifier reports scores as percentage strings (`"87.5%"`), but plain
/// numbers are accepted too. The raw form is kept so it can be echoed back
/// unchanged in a deep-analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfidenceScore {
    Number(f64),
    Text(String),
}

impl ConfidenceScore {
    /// Numeric value on the 0-100 scale, `None` when the text has no leading number.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => parse_leading_float(s),
        }
    }
}

impl Default for ConfidenceScore {
    fn default() -> Self {
        Self::Number(0.0)
    }
}

impl From<f64> for ConfidenceScore {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for ConfidenceScore {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Parse the longest numeric prefix of `s`, ignoring leading whitespace.
/// `"87.25%"` → 87.25, `"abc"` → None.
fn parse_leading_float(s: &str) -> Option<f64> {
    let trimmed = s.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;

    for (i, c) in trimmed.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }

    if !seen_digit {
        return None;
    }
    trimmed[..end].trim_end_matches('.').parse().ok()
}

/// One analyzed tweet. Never mutated once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedItem {
    pub text: String,
    /// Sentiment label (Positive / Negative / Neutral), passed through as-is.
    #[serde(rename = "emotion")]
    pub emotion_label: String,
    /// Depression label from the classifier, passed through as-is.
    #[serde(rename = "analysis")]
    pub analysis_label: String,
    #[serde(default)]
    pub confidence_score: ConfidenceScore,
}

// ============ Pages ============

/// A page of analyzed items.
///
/// The initial `/analyze` response and every `/load-more-tweets` response share
/// this shape, so the first page seeds a session exactly like later pages extend it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisPage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(rename = "results", default)]
    pub items: Vec<AnalyzedItem>,
    #[serde(rename = "pagination_token", default)]
    pub cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRequest {
    pub username: String,
    pub num_tweets: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadMoreRequest {
    pub username: String,
    pub num_tweets: u32,
    pub pagination_token: Option<String>,
}

// ============ Profile ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileInfo {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub following_count: u64,
    /// ISO-8601 timestamp, or "Unknown" when the service has none.
    #[serde(default)]
    pub created_at: String,
}

// ============ Deep Analysis ============

/// Reduced item record sent for narrative analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeepAnalysisItem {
    pub text: String,
    pub emotion: String,
    pub analysis: String,
    pub confidence_score: ConfidenceScore,
}

impl From<&AnalyzedItem> for DeepAnalysisItem {
    fn from(item: &AnalyzedItem) -> Self {
        Self {
            text: item.text.clone(),
            emotion: item.emotion_label.clone(),
            analysis: item.analysis_label.clone(),
            confidence_score: item.confidence_score.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeepAnalysisRequest {
    pub tweet_data: Vec<DeepAnalysisItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeepAnalysisResponse {
    pub response: Option<String>,
}

// ============ Service Errors ============

/// Structured failure body: `{"error": "..."}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_score_from_percent_string() {
        let score = ConfidenceScore::from("87.25%");
        assert_eq!(score.value(), Some(87.25));
        assert_eq!(ConfidenceScore::from(" 50%").value(), Some(50.0));
        assert_eq!(ConfidenceScore::from("n/a").value(), None);
    }

    #[test]
    fn test_item_deserializes_service_shape() {
        let json = r#"{"text":"hello","emotion":"Positive","analysis":"Not depression","confidence_score":"91.3%"}"#;
        let item: AnalyzedItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.emotion_label, "Positive");
        assert_eq!(item.analysis_label, "Not depression");
        assert_eq!(item.confidence_score.value(), Some(91.3));

        let numeric = r#"{"text":"x","emotion":"Neutral","analysis":"Moderate","confidence_score":64.5}"#;
        let item: AnalyzedItem = serde_json::from_str(numeric).unwrap();
        assert_eq!(item.confidence_score, ConfidenceScore::Number(64.5));
    }

    #[test]
    fn test_page_with_null_cursor() {
        let json = r#"{"results":[],"pagination_token":null}"#;
        let page: AnalysisPage = serde_json::from_str(json).unwrap();
        assert!(page.items.is_empty());
        assert!(page.cursor.is_none());
        assert!(page.message.is_none());
    }

    #[test]
    fn test_deep_analysis_item_keeps_raw_score() {
        let item = AnalyzedItem {
            text: "t".to_string(),
            emotion_label: "Negative".to_string(),
            analysis_label: "Severe".to_string(),
            confidence_score: ConfidenceScore::from("77.1%"),
        };
        let value = serde_json::to_value(DeepAnalysisItem::from(&item)).unwrap();
        assert_eq!(value["emotion"], "Negative");
        assert_eq!(value["analysis"], "Severe");
        assert_eq!(value["confidence_score"], "77.1%");
    }
}
