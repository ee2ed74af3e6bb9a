//! Per-skill risk scoring.

use super::{RiskScore, RiskThresholds};
use crate::error::{EngineError, Result};
use crate::gap::GapEntry;
use crate::profile::RiskSignal;
use crate::types::{SkillId, SkillLevel};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

const SIGNAL_MAX: f64 = 100.0;

/// Pure, stateless risk scorer.
///
/// `raw = exposure * exposure_weight * (1 - demand/100) * (1 - level/5)`,
/// clamped to `[0, 100]` and labelled through the configured thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskScorer {
    pub thresholds: RiskThresholds,
    /// Multiplier on automation exposure. Must be finite and non-negative.
    pub exposure_weight: f64,
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self {
            thresholds: RiskThresholds::default(),
            exposure_weight: 1.0,
        }
    }
}

fn check_signal_field(skill_id: &SkillId, field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && (0.0..=SIGNAL_MAX).contains(&value) {
        Ok(value)
    } else {
        Err(EngineError::InvalidSignal {
            skill_id: skill_id.clone(),
            field,
            value,
        })
    }
}

impl RiskScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(mut self, thresholds: RiskThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_exposure_weight(mut self, weight: f64) -> Self {
        self.exposure_weight = weight;
        self
    }

    /// Score one skill.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidSignal`] when either signal field is outside
    /// `[0, 100]` (or NaN) or `current_level` is above 5. Out-of-range inputs
    /// are rejected, never clamped.
    pub fn score(
        &self,
        skill_id: &SkillId,
        current_level: u8,
        signal: &RiskSignal,
    ) -> Result<RiskScore> {
        let exposure = check_signal_field(skill_id, "automation_exposure", signal.automation_exposure)?;
        let demand = check_signal_field(skill_id, "future_demand", signal.future_demand)?;
        if current_level > SkillLevel::MAX {
            return Err(EngineError::InvalidSignal {
                skill_id: skill_id.clone(),
                field: "current_level",
                value: f64::from(current_level),
            });
        }

        let normalized_demand = demand / SIGNAL_MAX;
        let normalized_proficiency = f64::from(current_level) / f64::from(SkillLevel::MAX);
        let raw = exposure
            * self.exposure_weight
            * (1.0 - normalized_demand)
            * (1.0 - normalized_proficiency);
        let score = raw.clamp(0.0, SIGNAL_MAX);

        Ok(RiskScore {
            skill_id: skill_id.clone(),
            score,
            label: self.thresholds.label(score),
        })
    }

    /// Score every gap entry that has a signal.
    ///
    /// Skills are scored in parallel since none depends on another. Entries
    /// without a signal are skipped; the plan builder reports them as
    /// incomplete input. When several signals are invalid, the error for the
    /// first entry in gap order is returned.
    pub fn score_all(
        &self,
        gaps: &[GapEntry],
        signals: &BTreeMap<SkillId, RiskSignal>,
    ) -> Result<BTreeMap<SkillId, RiskScore>> {
        let results: Vec<Option<Result<RiskScore>>> = gaps
            .par_iter()
            .map(|gap| {
                signals
                    .get(&gap.skill_id)
                    .map(|signal| self.score(&gap.skill_id, gap.current_level.ordinal(), signal))
            })
            .collect();

        let mut scores = BTreeMap::new();
        let mut missing = 0usize;
        for result in results {
            match result {
                Some(score) => {
                    let score = score?;
                    scores.insert(score.skill_id.clone(), score);
                }
                None => missing += 1,
            }
        }

        if missing > 0 {
            debug!(
                target: "skillgap::risk",
                missing,
                scored = scores.len(),
                "Some gapped skills have no risk signal"
            );
        }

        Ok(scores)
    }
}

/// Score one skill with the default coefficients.
pub fn score_risk(skill_id: &SkillId, current_level: u8, signal: &RiskSignal) -> Result<RiskScore> {
    RiskScorer::default().score(skill_id, current_level, signal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::RiskLabel;

    fn id() -> SkillId {
        SkillId::from("welding")
    }

    #[test]
    fn test_boundary_zero_risk() {
        let risk = score_risk(&id(), 5, &RiskSignal::new(0.0, 100.0)).unwrap();
        assert_eq!(risk.score, 0.0);
        assert_eq!(risk.label, RiskLabel::Low);
    }

    #[test]
    fn test_boundary_full_risk() {
        let risk = score_risk(&id(), 0, &RiskSignal::new(100.0, 0.0)).unwrap();
        assert_eq!(risk.score, 100.0);
        assert_eq!(risk.label, RiskLabel::Critical);
    }

    #[test]
    fn test_formula() {
        // 80 * (1 - 0.5) * (1 - 2/5) = 80 * 0.5 * 0.6 = 24
        let risk = score_risk(&id(), 2, &RiskSignal::new(80.0, 50.0)).unwrap();
        assert!((risk.score - 24.0).abs() < 1e-9);
        assert_eq!(risk.label, RiskLabel::Low);

        // 100 * 0.9 * 0.8 = 72
        let risk = score_risk(&id(), 1, &RiskSignal::new(100.0, 10.0)).unwrap();
        assert!((risk.score - 72.0).abs() < 1e-9);
        assert_eq!(risk.label, RiskLabel::High);
    }

    #[test]
    fn test_any_mitigating_factor_dampens() {
        let strong_demand = score_risk(&id(), 0, &RiskSignal::new(100.0, 100.0)).unwrap();
        assert_eq!(strong_demand.score, 0.0);
        let full_mastery = score_risk(&id(), 5, &RiskSignal::new(100.0, 0.0)).unwrap();
        assert_eq!(full_mastery.score, 0.0);
    }

    #[test]
    fn test_exposure_weight_is_clamped() {
        let scorer = RiskScorer::new().with_exposure_weight(2.0);
        let risk = scorer.score(&id(), 0, &RiskSignal::new(90.0, 0.0)).unwrap();
        assert_eq!(risk.score, 100.0);
    }

    #[test]
    fn test_custom_thresholds() {
        let scorer = RiskScorer::new().with_thresholds(RiskThresholds {
            medium: 10.0,
            high: 20.0,
            critical: 30.0,
        });
        let risk = scorer.score(&id(), 2, &RiskSignal::new(80.0, 50.0)).unwrap();
        assert_eq!(risk.label, RiskLabel::High);
    }

    #[test]
    fn test_rejects_out_of_range_signals() {
        let cases = [
            (RiskSignal::new(-0.1, 50.0), "automation_exposure"),
            (RiskSignal::new(100.1, 50.0), "automation_exposure"),
            (RiskSignal::new(50.0, 101.0), "future_demand"),
            (RiskSignal::new(50.0, f64::NAN), "future_demand"),
        ];
        for (signal, expected_field) in cases {
            match score_risk(&id(), 2, &signal) {
                Err(EngineError::InvalidSignal { field, skill_id, .. }) => {
                    assert_eq!(field, expected_field);
                    assert_eq!(skill_id, id());
                }
                other => panic!("expected InvalidSignal, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_rejects_out_of_range_level() {
        let err = score_risk(&id(), 6, &RiskSignal::new(50.0, 50.0)).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidSignal {
                field: "current_level",
                ..
            }
        ));
    }

    #[test]
    fn test_score_all_skips_missing_signals() {
        let gaps = vec![
            GapEntry::new(SkillId::from("a"), SkillLevel::Absent, SkillLevel::Expert, 1.0),
            GapEntry::new(SkillId::from("b"), SkillLevel::Basic, SkillLevel::Advanced, 1.0),
        ];
        let mut signals = BTreeMap::new();
        signals.insert(SkillId::from("a"), RiskSignal::new(100.0, 0.0));

        let scores = RiskScorer::new().score_all(&gaps, &signals).unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores["a"].label, RiskLabel::Critical);
    }

    #[test]
    fn test_score_all_reports_first_invalid_in_gap_order() {
        let gaps = vec![
            GapEntry::new(SkillId::from("z"), SkillLevel::Absent, SkillLevel::Expert, 1.0),
            GapEntry::new(SkillId::from("a"), SkillLevel::Absent, SkillLevel::Basic, 1.0),
        ];
        let mut signals = BTreeMap::new();
        signals.insert(SkillId::from("z"), RiskSignal::new(150.0, 0.0));
        signals.insert(SkillId::from("a"), RiskSignal::new(50.0, 500.0));

        let err = RiskScorer::new().score_all(&gaps, &signals).unwrap_err();
        assert!(matches!(err, EngineError::InvalidSignal { ref skill_id, .. } if skill_id.as_str() == "z"));
    }
}
