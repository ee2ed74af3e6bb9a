//! Skill-gap and workforce-risk engine.
//!
//! This crate provides:
//! - Gap calculation between an employee's skills and a role's requirements
//! - Per-skill and per-employee risk scoring from automation and demand forecasts
//! - Ranked, bounded learning plans with deterministic suggested actions
//! - Best-effort narrative enrichment through an external text generator
//!
//! Every stage except enrichment is a pure function of its inputs.

pub mod catalog;
pub mod config;
pub mod enrich;
pub mod error;
pub mod gap;
pub mod plan;
pub mod profile;
pub mod risk;
pub mod service;
pub mod source;
mod types;

pub use catalog::SkillCatalog;
pub use config::{load_config, EngineConfig, EnrichConfig, PlanConfig};
pub use enrich::{EnrichedPlan, Enricher, HttpNarrativeClient, NarrativeError, NarrativeGenerator};
pub use error::{EngineError, Result};
pub use gap::{compute_gaps, fitness, GapEntry};
pub use plan::{
    build_plan, summarize_plan, LearningPlanItem, PlanBuilder, Rationale, RiskWeightFactors,
    SuggestedAction,
};
pub use profile::{EmployeeProfile, Requirement, RiskSignal, RoleRequirementProfile};
pub use risk::{
    score_risk, summarize_risk, LabelCounts, RiskLabel, RiskScore, RiskScorer, RiskSummary,
    RiskThresholds,
};
pub use service::{GapPlanReport, GapPlanService};
pub use source::{DataSet, InMemorySource, ProfileSource};
pub use types::{Skill, SkillCategory, SkillId, SkillLevel};
