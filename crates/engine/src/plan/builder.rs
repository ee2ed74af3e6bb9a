//! Multi-signal plan ranking.

use super::{explainer, LearningPlanItem, Rationale, RiskWeightFactors, SuggestedAction};
use crate::error::{EngineError, Result};
use crate::gap::GapEntry;
use crate::risk::RiskScore;
use crate::types::SkillId;
use std::collections::BTreeMap;
use tracing::debug;

/// Ranks gap entries into a bounded learning plan.
#[derive(Debug, Clone, Default)]
pub struct PlanBuilder {
    factors: RiskWeightFactors,
}

impl PlanBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_factors(mut self, factors: RiskWeightFactors) -> Self {
        self.factors = factors;
        self
    }

    /// `delta * weight + factor(label)`.
    #[must_use]
    pub fn priority_score(&self, gap: &GapEntry, risk: &RiskScore) -> f64 {
        gap.weighted_shortfall() + self.factors.factor(risk.label)
    }

    /// Build a plan with one item per gap entry, truncated to `max_items`.
    ///
    /// Items are ordered by priority score descending, ties broken by skill id
    /// ascending, and numbered `1..=N` without gaps.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidArgument`] when `max_items` is `Some(0)`.
    /// - [`EngineError::IncompleteInput`] when any gap entry has no risk score.
    pub fn build(
        &self,
        gaps: &[GapEntry],
        risks: &BTreeMap<SkillId, RiskScore>,
        max_items: Option<usize>,
    ) -> Result<Vec<LearningPlanItem>> {
        if max_items == Some(0) {
            return Err(EngineError::invalid_argument(
                "max_items",
                "must be at least 1",
            ));
        }

        let mut ranked = Vec::with_capacity(gaps.len());
        for gap in gaps {
            let risk = risks
                .get(&gap.skill_id)
                .ok_or_else(|| EngineError::IncompleteInput {
                    skill_id: gap.skill_id.clone(),
                })?;
            ranked.push((self.priority_score(gap, risk), gap, risk));
        }

        ranked.sort_by(|(score_a, gap_a, _), (score_b, gap_b, _)| {
            score_b
                .total_cmp(score_a)
                .then_with(|| gap_a.skill_id.cmp(&gap_b.skill_id))
        });
        ranked.truncate(max_items.unwrap_or(usize::MAX));

        let items: Vec<LearningPlanItem> = ranked
            .into_iter()
            .enumerate()
            .map(|(idx, (priority_score, gap, risk))| {
                let rationale = Rationale {
                    delta: gap.delta,
                    weight: gap.weight,
                    weighted_gap: gap.weighted_shortfall(),
                    risk_score: risk.score,
                    risk_label: risk.label,
                };
                let suggested_action = SuggestedAction::select(gap.delta, risk.label);
                LearningPlanItem {
                    skill_id: gap.skill_id.clone(),
                    priority: idx + 1,
                    priority_score,
                    summary: explainer::describe_item(&rationale, suggested_action),
                    rationale,
                    suggested_action,
                    narrative: None,
                }
            })
            .collect();

        debug!(
            target: "skillgap::plan",
            considered = gaps.len(),
            planned = items.len(),
            "Built learning plan"
        );

        Ok(items)
    }
}

/// Build a plan with the default risk weight factors.
pub fn build_plan(
    gaps: &[GapEntry],
    risks: &BTreeMap<SkillId, RiskScore>,
    max_items: Option<usize>,
) -> Result<Vec<LearningPlanItem>> {
    PlanBuilder::default().build(gaps, risks, max_items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::{RiskLabel, RiskThresholds};
    use crate::types::SkillLevel;

    fn gap(id: &str, current: SkillLevel, required: SkillLevel, weight: f64) -> GapEntry {
        GapEntry::new(SkillId::from(id), current, required, weight)
    }

    fn risk(id: &str, score: f64) -> (SkillId, RiskScore) {
        let skill_id = SkillId::from(id);
        (
            skill_id.clone(),
            RiskScore {
                skill_id,
                score,
                label: RiskThresholds::default().label(score),
            },
        )
    }

    #[test]
    fn test_risk_dominates_similar_gaps() {
        let gaps = vec![
            gap("a", SkillLevel::Basic, SkillLevel::Expert, 1.0),  // 3
            gap("b", SkillLevel::Intermediate, SkillLevel::Expert, 1.0), // 2
        ];
        let risks = BTreeMap::from([risk("a", 10.0), risk("b", 85.0)]);

        let plan = build_plan(&gaps, &risks, None).unwrap();
        assert_eq!(plan[0].skill_id.as_str(), "b");
        assert_eq!(plan[0].priority_score, 47.0);
        assert_eq!(plan[0].suggested_action, SuggestedAction::Train);
        assert_eq!(plan[1].skill_id.as_str(), "a");
        assert_eq!(plan[1].priority_score, 3.0);
        // Large gap but low risk: flagged, deprioritized.
        assert_eq!(plan[1].suggested_action, SuggestedAction::Monitor);
    }

    #[test]
    fn test_ties_break_by_skill_id() {
        let gaps = vec![
            gap("c", SkillLevel::Basic, SkillLevel::Advanced, 1.0),
            gap("a", SkillLevel::Basic, SkillLevel::Advanced, 1.0),
            gap("b", SkillLevel::Basic, SkillLevel::Advanced, 1.0),
        ];
        let risks = BTreeMap::from([risk("a", 30.0), risk("b", 30.0), risk("c", 30.0)]);

        let plan = build_plan(&gaps, &risks, None).unwrap();
        let ids: Vec<_> = plan.iter().map(|i| i.skill_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(plan.iter().all(|i| i.suggested_action == SuggestedAction::Mentor));
    }

    #[test]
    fn test_priorities_are_dense() {
        let gaps = vec![
            gap("a", SkillLevel::Absent, SkillLevel::Expert, 1.0),
            gap("b", SkillLevel::Expert, SkillLevel::Basic, 1.0),
            gap("c", SkillLevel::Basic, SkillLevel::Basic, 2.0),
        ];
        let risks = BTreeMap::from([risk("a", 90.0), risk("b", 0.0), risk("c", 60.0)]);

        let plan = build_plan(&gaps, &risks, None).unwrap();
        let priorities: Vec<_> = plan.iter().map(|i| i.priority).collect();
        assert_eq!(priorities, vec![1, 2, 3]);
        // Surplus skills are always monitored, even at high risk.
        let c = plan.iter().find(|i| i.skill_id.as_str() == "c").unwrap();
        assert_eq!(c.suggested_action, SuggestedAction::Monitor);
    }

    #[test]
    fn test_max_items_keeps_top_entry() {
        let gaps = vec![
            gap("a", SkillLevel::Basic, SkillLevel::Expert, 1.0),
            gap("b", SkillLevel::Absent, SkillLevel::Expert, 2.0),
        ];
        let risks = BTreeMap::from([risk("a", 50.0), risk("b", 50.0)]);

        let plan = build_plan(&gaps, &risks, Some(1)).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].skill_id.as_str(), "b");
        assert_eq!(plan[0].priority, 1);
    }

    #[test]
    fn test_max_items_larger_than_input() {
        let gaps = vec![gap("a", SkillLevel::Basic, SkillLevel::Expert, 1.0)];
        let risks = BTreeMap::from([risk("a", 50.0)]);
        assert_eq!(build_plan(&gaps, &risks, Some(10)).unwrap().len(), 1);
    }

    #[test]
    fn test_zero_max_items_rejected() {
        let err = build_plan(&[], &BTreeMap::new(), Some(0)).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidArgument {
                argument: "max_items",
                ..
            }
        ));
    }

    #[test]
    fn test_missing_risk_is_incomplete_input() {
        let gaps = vec![
            gap("a", SkillLevel::Basic, SkillLevel::Expert, 1.0),
            gap("b", SkillLevel::Basic, SkillLevel::Expert, 1.0),
        ];
        let risks = BTreeMap::from([risk("a", 50.0)]);

        let err = build_plan(&gaps, &risks, None).unwrap_err();
        assert_eq!(
            err,
            EngineError::IncompleteInput {
                skill_id: SkillId::from("b")
            }
        );
    }

    #[test]
    fn test_empty_input_gives_empty_plan() {
        assert!(build_plan(&[], &BTreeMap::new(), None).unwrap().is_empty());
    }

    #[test]
    fn test_custom_factors() {
        let builder = PlanBuilder::new().with_factors(RiskWeightFactors {
            low: 0.0,
            medium: 0.0,
            high: 0.0,
            critical: 0.0,
        });
        let gaps = vec![
            gap("a", SkillLevel::Basic, SkillLevel::Expert, 1.0),
            gap("b", SkillLevel::Intermediate, SkillLevel::Expert, 1.0),
        ];
        let risks = BTreeMap::from([risk("a", 10.0), risk("b", 85.0)]);
        let plan = builder.build(&gaps, &risks, None).unwrap();
        assert_eq!(plan[0].skill_id.as_str(), "a");
        assert_eq!(plan[1].rationale.risk_label, RiskLabel::Critical);
    }

    #[test]
    fn test_items_carry_summary_and_no_narrative() {
        let gaps = vec![gap("a", SkillLevel::Basic, SkillLevel::Expert, 1.0)];
        let risks = BTreeMap::from([risk("a", 60.0)]);
        let plan = build_plan(&gaps, &risks, None).unwrap();
        assert!(plan[0].summary.contains("Gap of 3 levels"));
        assert!(plan[0].narrative.is_none());
    }
}
