//! Gap calculation between an employee profile and a role profile.
//!
//! The role's required skills define the universe: skills the employee holds
//! but the role doesn't need never appear in the output. Gaps are recomputed
//! on every call and never cached.

use crate::catalog::SkillCatalog;
use crate::error::{EngineError, Result};
use crate::profile::{EmployeeProfile, RoleRequirementProfile};
use crate::types::{SkillId, SkillLevel};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

/// Shortfall (or surplus) for one required skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapEntry {
    pub skill_id: SkillId,
    pub current_level: SkillLevel,
    pub required_level: SkillLevel,
    /// `required_level - current_level`; zero or negative means surplus.
    pub delta: i8,
    pub weight: f64,
    /// True when the employee already meets the requirement.
    pub surplus: bool,
}

impl GapEntry {
    pub fn new(
        skill_id: SkillId,
        current_level: SkillLevel,
        required_level: SkillLevel,
        weight: f64,
    ) -> Self {
        let delta = required_level.ordinal() as i8 - current_level.ordinal() as i8;
        Self {
            skill_id,
            current_level,
            required_level,
            delta,
            weight,
            surplus: delta <= 0,
        }
    }

    /// `delta * weight`, the primary sort key.
    #[must_use]
    pub fn weighted_shortfall(&self) -> f64 {
        f64::from(self.delta) * self.weight
    }

    /// Whether this entry needs remediation.
    #[must_use]
    pub fn needs_remediation(&self) -> bool {
        !self.surplus
    }
}

/// Largest weighted shortfall first, then skill id ascending.
pub(crate) fn gap_order(a: &GapEntry, b: &GapEntry) -> Ordering {
    b.weighted_shortfall()
        .total_cmp(&a.weighted_shortfall())
        .then_with(|| a.skill_id.cmp(&b.skill_id))
}

/// Accept only whole numbers in 0-5.
fn validate_level(owner: &str, skill_id: &SkillId, raw: f64) -> Result<SkillLevel> {
    if raw.fract() != 0.0 || !(0.0..=f64::from(SkillLevel::MAX)).contains(&raw) {
        return Err(EngineError::invalid_profile(
            owner,
            skill_id,
            format!("has level {raw}, expected a whole number in 0-{}", SkillLevel::MAX),
        ));
    }
    SkillLevel::try_from(raw as u8)
        .map_err(|reason| EngineError::invalid_profile(owner, skill_id, reason))
}

fn validate_employee<'a>(
    catalog: &SkillCatalog,
    employee: &'a EmployeeProfile,
) -> Result<BTreeMap<&'a SkillId, SkillLevel>> {
    employee
        .levels
        .iter()
        .map(|(skill_id, &raw)| {
            if !catalog.contains(skill_id.as_str()) {
                return Err(EngineError::invalid_profile(
                    &employee.employee_id,
                    skill_id,
                    "is not in the skill catalog",
                ));
            }
            validate_level(&employee.employee_id, skill_id, raw).map(|level| (skill_id, level))
        })
        .collect()
}

/// Compare `employee` against `role` and return one entry per required skill.
///
/// Both profiles are validated in full against `catalog` first, so a bad entry
/// anywhere rejects the whole request.
///
/// # Errors
///
/// Returns [`EngineError::InvalidProfile`] when either profile references a
/// skill that is not in the catalog, carries a level outside 0-5, or (for the
/// role) a weight that is negative or not finite.
pub fn compute_gaps(
    catalog: &SkillCatalog,
    employee: &EmployeeProfile,
    role: &RoleRequirementProfile,
) -> Result<Vec<GapEntry>> {
    let held = validate_employee(catalog, employee)?;

    let mut gaps = Vec::with_capacity(role.requirements.len());
    for (skill_id, requirement) in &role.requirements {
        if !catalog.contains(skill_id.as_str()) {
            return Err(EngineError::invalid_profile(
                &role.role_id,
                skill_id,
                "is not in the skill catalog",
            ));
        }
        let required = validate_level(&role.role_id, skill_id, requirement.level)?;
        if !requirement.weight.is_finite() || requirement.weight < 0.0 {
            return Err(EngineError::invalid_profile(
                &role.role_id,
                skill_id,
                format!("has invalid weight {}", requirement.weight),
            ));
        }
        let current = held.get(skill_id).copied().unwrap_or(SkillLevel::Absent);
        gaps.push(GapEntry::new(
            skill_id.clone(),
            current,
            required,
            requirement.weight,
        ));
    }

    gaps.sort_by(gap_order);

    debug!(
        target: "skillgap::gap",
        employee = %employee.employee_id,
        role = %role.role_id,
        required = gaps.len(),
        open = gaps.iter().filter(|g| g.needs_remediation()).count(),
        "Computed skill gaps"
    );

    Ok(gaps)
}

/// Weighted coverage of the role's requirements in `[0.0, 1.0]`.
///
/// `sum(min(current, required) * w) / sum(required * w)`; a role that
/// requires nothing is fully covered.
#[must_use]
pub fn fitness(gaps: &[GapEntry]) -> f64 {
    let (covered, required) = gaps.iter().fold((0.0, 0.0), |(covered, required), g| {
        let req = f64::from(g.required_level.ordinal());
        let cur = f64::from(g.current_level.ordinal()).min(req);
        (covered + cur * g.weight, required + req * g.weight)
    });
    if required <= 0.0 {
        1.0
    } else {
        (covered / required).clamp(0.0, 1.0)
    }
}
