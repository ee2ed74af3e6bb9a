//! Ranked learning plans built from gap and risk outputs.

mod builder;
mod explainer;

pub use builder::{build_plan, PlanBuilder};
pub use explainer::{describe_item, summarize_plan};

use crate::risk::RiskLabel;
use crate::types::SkillId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Remediation suggested for one skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestedAction {
    /// Formal training.
    Train,
    /// Pair with a more experienced colleague.
    Mentor,
    /// Move to a different role. Never chosen by [`PlanBuilder`]; reserved
    /// for callers that override actions by hand.
    Reassign,
    /// Keep an eye on it; no immediate action.
    Monitor,
}

impl SuggestedAction {
    /// Deterministic choice from gap size and risk band.
    #[must_use]
    pub fn select(delta: i8, label: RiskLabel) -> Self {
        if delta <= 0 {
            return Self::Monitor;
        }
        match label {
            RiskLabel::Critical | RiskLabel::High => Self::Train,
            RiskLabel::Medium => Self::Mentor,
            RiskLabel::Low => Self::Monitor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Mentor => "mentor",
            Self::Reassign => "reassign",
            Self::Monitor => "monitor",
        }
    }
}

impl fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Additive urgency bonus per risk band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskWeightFactors {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
    pub critical: f64,
}

impl Default for RiskWeightFactors {
    fn default() -> Self {
        Self {
            low: 0.0,
            medium: 10.0,
            high: 25.0,
            critical: 45.0,
        }
    }
}

impl RiskWeightFactors {
    #[must_use]
    pub fn factor(&self, label: RiskLabel) -> f64 {
        match label {
            RiskLabel::Low => self.low,
            RiskLabel::Medium => self.medium,
            RiskLabel::High => self.high,
            RiskLabel::Critical => self.critical,
        }
    }

    /// Factors must be finite and non-decreasing from low to critical.
    pub fn is_valid(&self) -> bool {
        let f = [self.low, self.medium, self.high, self.critical];
        f.iter().all(|v| v.is_finite()) && f.windows(2).all(|w| w[0] <= w[1])
    }
}

/// Structured reasons behind an item's priority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rationale {
    pub delta: i8,
    pub weight: f64,
    /// `delta * weight`.
    pub weighted_gap: f64,
    pub risk_score: f64,
    pub risk_label: RiskLabel,
}

/// One ranked entry of a learning plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPlanItem {
    pub skill_id: SkillId,
    /// Rank, 1 = highest.
    pub priority: usize,
    pub priority_score: f64,
    pub rationale: Rationale,
    pub suggested_action: SuggestedAction,
    /// Locally generated one-line explanation.
    pub summary: String,
    /// Optional text from the narrative collaborator.
    pub narrative: Option<String>,
}
