//! Analysis result model and the score to risk mapping.

use serde::{Serialize, Serializer};

use crate::constants::{EXPLANATION, INDICATOR_DESCRIPTION, INDICATOR_NAME, MEDIA_TYPE_IMAGE};

/// Scores below this are low risk
pub const MEDIUM_RISK_THRESHOLD: u8 = 30;
/// Scores at or above this are high risk
pub const HIGH_RISK_THRESHOLD: u8 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Bucket a score with half-open intervals: [0, 30), [30, 60), [60, 100].
    pub fn classify(score: u8) -> Self {
        if score < MEDIUM_RISK_THRESHOLD {
            RiskLevel::Low
        } else if score < HIGH_RISK_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low (Likely Real)",
            RiskLevel::Medium => "Medium (Inconclusive)",
            RiskLevel::High => "High (Possible Deepfake)",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for RiskLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Convert a class probability into an integer percentage.
///
/// Truncates rather than rounds, so 0.599 becomes 59. The product is taken in
/// f64, so an f32 probability of 0.29 (really 0.28999999...) scores 28. Out of
/// range and NaN inputs are clamped into [0, 100].
pub fn score_from_probability(probability: f32) -> u8 {
    if probability.is_nan() {
        return 0;
    }
    let percent = (f64::from(probability) * 100.0).trunc();
    percent.clamp(0.0, 100.0) as u8
}

#[derive(Debug, Clone, Serialize)]
pub struct Indicator {
    pub name: &'static str,
    pub score: u8,
    pub description: &'static str,
}

/// Per-request result returned by `POST /analyze`. Never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub media_type: &'static str,
    pub overall_score: u8,
    pub risk_level: RiskLevel,
    pub indicators: Vec<Indicator>,
    pub explanation: &'static str,
}

impl AnalysisResult {
    pub fn from_score(score: u8) -> Self {
        let score = score.min(100);
        Self {
            media_type: MEDIA_TYPE_IMAGE,
            overall_score: score,
            risk_level: RiskLevel::classify(score),
            indicators: vec![Indicator {
                name: INDICATOR_NAME,
                score,
                description: INDICATOR_DESCRIPTION,
            }],
            explanation: EXPLANATION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_respects_boundaries() {
        assert_eq!(RiskLevel::classify(0), RiskLevel::Low);
        assert_eq!(RiskLevel::classify(29), RiskLevel::Low);
        assert_eq!(RiskLevel::classify(30), RiskLevel::Medium);
        assert_eq!(RiskLevel::classify(59), RiskLevel::Medium);
        assert_eq!(RiskLevel::classify(60), RiskLevel::High);
        assert_eq!(RiskLevel::classify(100), RiskLevel::High);
    }

    #[test]
    fn classify_matches_thresholds_for_every_score() {
        for score in 0..=100u8 {
            let expected = if score < 30 {
                "Low (Likely Real)"
            } else if score < 60 {
                "Medium (Inconclusive)"
            } else {
                "High (Possible Deepfake)"
            };
            assert_eq!(RiskLevel::classify(score).label(), expected, "score {}", score);
        }
    }

    #[test]
    fn probability_is_truncated_not_rounded() {
        assert_eq!(score_from_probability(0.599), 59);
        assert_eq!(score_from_probability(0.2999), 29);
        assert_eq!(score_from_probability(0.0), 0);
        assert_eq!(score_from_probability(1.0), 100);
        assert_eq!(score_from_probability(0.29), 28);
        assert_eq!(score_from_probability(0.3), 30);
    }

    #[test]
    fn probability_outside_unit_range_is_clamped() {
        assert_eq!(score_from_probability(-0.5), 0);
        assert_eq!(score_from_probability(1.7), 100);
        assert_eq!(score_from_probability(f32::NAN), 0);
    }

    #[test]
    fn result_serializes_with_label_and_single_indicator() {
        let result = AnalysisResult::from_score(72);
        let json = serde_json::to_value(&result).expect("serialize result");

        assert_eq!(json["media_type"], "Image");
        assert_eq!(json["overall_score"], 72);
        assert_eq!(json["risk_level"], "High (Possible Deepfake)");
        assert_eq!(json["indicators"].as_array().map(Vec::len), Some(1));
        assert_eq!(json["indicators"][0]["name"], "AI Model Confidence");
        assert_eq!(json["indicators"][0]["score"], 72);
        assert_eq!(
            json["explanation"],
            "This result is probabilistic and based on a pretrained deepfake detection model. It is not definitive proof."
        );
    }
}
