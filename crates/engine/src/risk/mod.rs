//! Workforce risk scoring.
//!
//! Risk rises with automation exposure and falls with forecast demand and
//! with the employee's proficiency. Scores live in `[0, 100]` and map onto a
//! fixed set of labels through [`RiskThresholds`].

mod scorer;

pub use scorer::{score_risk, RiskScorer};

use crate::types::SkillId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorical risk band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLabel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower bounds (inclusive) of the medium, high, and critical bands.
///
/// Anything below `medium` is low.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    pub medium: f64,
    pub high: f64,
    pub critical: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            medium: 25.0,
            high: 55.0,
            critical: 80.0,
        }
    }
}

impl RiskThresholds {
    /// Band for `score`.
    #[must_use]
    pub fn label(&self, score: f64) -> RiskLabel {
        if score >= self.critical {
            RiskLabel::Critical
        } else if score >= self.high {
            RiskLabel::High
        } else if score >= self.medium {
            RiskLabel::Medium
        } else {
            RiskLabel::Low
        }
    }

    /// Thresholds must be strictly increasing within `(0, 100]`.
    pub fn is_valid(&self) -> bool {
        let bounds = [self.medium, self.high, self.critical];
        bounds.iter().all(|b| b.is_finite() && *b > 0.0 && *b <= 100.0)
            && self.medium < self.high
            && self.high < self.critical
    }
}

/// Risk for one skill of one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScore {
    pub skill_id: SkillId,
    /// Score in `[0, 100]`.
    pub score: f64,
    pub label: RiskLabel,
}

/// Number of skills per risk band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub critical: usize,
}

impl LabelCounts {
    fn record(&mut self, label: RiskLabel) {
        match label {
            RiskLabel::Low => self.low += 1,
            RiskLabel::Medium => self.medium += 1,
            RiskLabel::High => self.high += 1,
            RiskLabel::Critical => self.critical += 1,
        }
    }
}

/// Per-employee roll-up of skill risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskSummary {
    /// Weight-averaged score across the considered skills.
    pub score: f64,
    pub label: RiskLabel,
    pub counts: LabelCounts,
}

/// Roll individual skill scores up into one employee-level score.
///
/// Each score is weighted by `weight_of(skill)`; skills with a zero total
/// weight fall back to a plain mean. An empty input is low risk.
pub fn summarize_risk<'a, I, F>(scores: I, thresholds: &RiskThresholds, weight_of: F) -> RiskSummary
where
    I: IntoIterator<Item = &'a RiskScore>,
    F: Fn(&SkillId) -> f64,
{
    let mut counts = LabelCounts::default();
    let mut weighted = 0.0;
    let mut total_weight = 0.0;
    let mut plain = 0.0;
    let mut n = 0usize;

    for risk in scores {
        counts.record(risk.label);
        let w = weight_of(&risk.skill_id);
        weighted += risk.score * w;
        total_weight += w;
        plain += risk.score;
        n += 1;
    }

    let score = if n == 0 {
        0.0
    } else if total_weight > 0.0 {
        weighted / total_weight
    } else {
        plain / n as f64
    };
    let score = score.clamp(0.0, 100.0);

    RiskSummary {
        score,
        label: thresholds.label(score),
        counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn risk(id: &str, score: f64) -> RiskScore {
        let thresholds = RiskThresholds::default();
        RiskScore {
            skill_id: SkillId::from(id),
            score,
            label: thresholds.label(score),
        }
    }

    #[test]
    fn test_label_boundaries_are_lower_inclusive() {
        let t = RiskThresholds::default();
        assert_eq!(t.label(0.0), RiskLabel::Low);
        assert_eq!(t.label(24.999), RiskLabel::Low);
        assert_eq!(t.label(25.0), RiskLabel::Medium);
        assert_eq!(t.label(54.9), RiskLabel::Medium);
        assert_eq!(t.label(55.0), RiskLabel::High);
        assert_eq!(t.label(79.99), RiskLabel::High);
        assert_eq!(t.label(80.0), RiskLabel::Critical);
        assert_eq!(t.label(100.0), RiskLabel::Critical);
    }

    #[test]
    fn test_threshold_validation() {
        assert!(RiskThresholds::default().is_valid());
        let inverted = RiskThresholds {
            medium: 60.0,
            high: 50.0,
            critical: 80.0,
        };
        assert!(!inverted.is_valid());
        let too_high = RiskThresholds {
            critical: 120.0,
            ..Default::default()
        };
        assert!(!too_high.is_valid());
    }

    #[test]
    fn test_label_order() {
        assert!(RiskLabel::Low < RiskLabel::Medium);
        assert!(RiskLabel::High < RiskLabel::Critical);
        assert_eq!(serde_json::to_string(&RiskLabel::Critical).unwrap(), "\"critical\"");
    }

    #[test]
    fn test_summary_weighted_mean() {
        let scores = [risk("a", 90.0), risk("b", 10.0)];
        let summary = summarize_risk(&scores, &RiskThresholds::default(), |id| {
            if id.as_str() == "a" {
                3.0
            } else {
                1.0
            }
        });
        // (90*3 + 10*1) / 4 = 70
        assert!((summary.score - 70.0).abs() < 1e-9);
        assert_eq!(summary.label, RiskLabel::High);
        assert_eq!(summary.counts.critical, 1);
        assert_eq!(summary.counts.low, 1);
    }

    #[test]
    fn test_summary_zero_weights_fall_back_to_mean() {
        let scores = [risk("a", 40.0), risk("b", 20.0)];
        let summary = summarize_risk(&scores, &RiskThresholds::default(), |_| 0.0);
        assert!((summary.score - 30.0).abs() < 1e-9);
        assert_eq!(summary.label, RiskLabel::Medium);
    }

    #[test]
    fn test_summary_empty() {
        let none: [RiskScore; 0] = [];
        let summary = summarize_risk(&none, &RiskThresholds::default(), |_| 1.0);
        assert_eq!(summary.score, 0.0);
        assert_eq!(summary.label, RiskLabel::Low);
        assert_eq!(summary.counts, LabelCounts::default());
    }
}
