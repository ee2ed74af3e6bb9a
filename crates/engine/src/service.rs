//! The gap-and-plan request: profile lookup, gap, risk, plan, enrichment.

use crate::config::EngineConfig;
use crate::enrich::{Enricher, NarrativeError};
use crate::error::Result;
use crate::gap::{compute_gaps, fitness, GapEntry};
use crate::plan::{summarize_plan, LearningPlanItem};
use crate::risk::{summarize_risk, RiskScore, RiskSummary};
use crate::source::ProfileSource;
use serde::Serialize;
use std::collections::HashMap;
use tracing::info;

/// Full response of one gap-and-plan request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapPlanReport {
    pub employee_id: String,
    pub role_id: String,
    pub gaps: Vec<GapEntry>,
    /// One score per gap entry, in gap order.
    pub risks: Vec<RiskScore>,
    pub plan: Vec<LearningPlanItem>,
    /// Weighted coverage of the role, in percent.
    pub fitness_percent: f64,
    pub risk_summary: RiskSummary,
    pub plan_summary: String,
    /// Set when narrative enrichment was attempted and failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrichment_warning: Option<NarrativeError>,
}

/// Computes [`GapPlanReport`]s from a [`ProfileSource`].
#[derive(Debug, Clone)]
pub struct GapPlanService<S> {
    source: S,
    config: EngineConfig,
}

impl<S: ProfileSource> GapPlanService<S> {
    pub fn new(source: S) -> Self {
        Self::with_config(source, EngineConfig::default())
    }

    pub fn with_config(source: S, config: EngineConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute gaps for one (employee, role) pair without scoring risk.
    pub fn gaps(&self, employee_id: &str, role_id: &str) -> Result<Vec<GapEntry>> {
        let catalog = self.source.skill_catalog()?;
        let employee = self.source.employee_profile(employee_id)?;
        let role = self.source.role_profile(role_id)?;
        compute_gaps(&catalog, &employee, &role)
    }

    /// Deterministic gap-and-plan report.
    ///
    /// `max_items` falls back to the configured default; `None` in both
    /// places means unlimited.
    pub fn gap_and_plan(
        &self,
        employee_id: &str,
        role_id: &str,
        max_items: Option<usize>,
    ) -> Result<GapPlanReport> {
        let gaps = self.gaps(employee_id, role_id)?;
        let signals = self.source.risk_signals(employee_id)?;

        let scorer = self.config.scorer();
        let scored = scorer.score_all(&gaps, &signals)?;
        let max_items = max_items.or(self.config.plan.default_max_items);
        let plan = self.config.plan_builder().build(&gaps, &scored, max_items)?;

        // build() has already checked every gap entry has a score.
        let risks: Vec<RiskScore> = gaps
            .iter()
            .filter_map(|g| scored.get(&g.skill_id).cloned())
            .collect();
        let weights: HashMap<_, _> = gaps.iter().map(|g| (&g.skill_id, g.weight)).collect();
        let risk_summary = summarize_risk(&risks, &scorer.thresholds, |id| {
            weights.get(id).copied().unwrap_or(0.0)
        });
        let fitness_percent = (fitness(&gaps) * 1000.0).round() / 10.0;

        info!(
            target: "skillgap::service",
            employee = employee_id,
            role = role_id,
            gaps = gaps.len(),
            planned = plan.len(),
            fitness = fitness_percent,
            risk = %risk_summary.label,
            "Computed gap-and-plan report"
        );

        Ok(GapPlanReport {
            employee_id: employee_id.to_string(),
            role_id: role_id.to_string(),
            plan_summary: summarize_plan(&plan),
            gaps,
            risks,
            plan,
            fitness_percent,
            risk_summary,
            enrichment_warning: None,
        })
    }

    /// [`gap_and_plan`](Self::gap_and_plan) followed by best-effort
    /// enrichment. Enrichment failures never turn into errors.
    pub async fn gap_and_plan_enriched(
        &self,
        employee_id: &str,
        role_id: &str,
        max_items: Option<usize>,
        enricher: &Enricher,
    ) -> Result<GapPlanReport> {
        let mut report = self.gap_and_plan(employee_id, role_id, max_items)?;
        let enriched = enricher.enrich(std::mem::take(&mut report.plan)).await;
        report.plan = enriched.items;
        report.enrichment_warning = enriched.warning;
        Ok(report)
    }
}
