//! Employee and role skill profiles plus per-skill risk signals.
//!
//! Profiles are the data source's loosely-typed view: levels are kept as the
//! numbers that were read (possibly negative, fractional or above 5) and
//! nothing here checks them against the catalog. Validation happens in
//! [`crate::gap::compute_gaps`], which rejects bad entries deterministically.

use crate::types::{SkillId, SkillLevel};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Default relative importance of a required skill.
pub const DEFAULT_WEIGHT: f64 = 1.0;

fn default_weight() -> f64 {
    DEFAULT_WEIGHT
}

/// A level as it appears in data files: an ordinal or a label.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawLevel {
    Number(f64),
    Label(String),
}

impl RawLevel {
    fn into_value(self) -> Result<f64, String> {
        match self {
            Self::Number(n) => Ok(n),
            Self::Label(label) => SkillLevel::ordinal_for_label(&label)
                .map(f64::from)
                .ok_or_else(|| format!("unknown skill level label '{label}'")),
        }
    }
}

fn deserialize_levels<'de, D>(deserializer: D) -> Result<BTreeMap<SkillId, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    BTreeMap::<SkillId, RawLevel>::deserialize(deserializer)?
        .into_iter()
        .map(|(id, raw)| Ok((id, raw.into_value().map_err(D::Error::custom)?)))
        .collect()
}

/// An employee's current proficiency per skill.
///
/// A skill missing from `levels` is implicitly level 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeProfile {
    pub employee_id: String,
    #[serde(default, deserialize_with = "deserialize_levels")]
    pub levels: BTreeMap<SkillId, f64>,
}

impl EmployeeProfile {
    pub fn new(employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: employee_id.into(),
            levels: BTreeMap::new(),
        }
    }

    /// Builder-style level assignment.
    pub fn with_level(mut self, skill: impl Into<SkillId>, level: impl Into<f64>) -> Self {
        self.levels.insert(skill.into(), level.into());
        self
    }

    /// Raw level for `skill`, 0 when absent.
    pub fn level_of(&self, skill: &str) -> f64 {
        self.levels.get(skill).copied().unwrap_or(0.0)
    }
}

/// Required level and relative importance of one skill for a role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Requirement {
    pub level: f64,
    pub weight: f64,
}

impl Requirement {
    pub fn new(level: impl Into<f64>) -> Self {
        Self::weighted(level, DEFAULT_WEIGHT)
    }

    pub fn weighted(level: impl Into<f64>, weight: f64) -> Self {
        Self {
            level: level.into(),
            weight,
        }
    }
}

// Accepts either `"skill": 4` / `"skill": "advanced"` or
// `"skill": { "level": 4, "weight": 2.0 }`.
impl<'de> Deserialize<'de> for Requirement {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawRequirement {
            Detailed {
                level: RawLevel,
                #[serde(default = "default_weight")]
                weight: f64,
            },
            Bare(RawLevel),
        }

        let (level, weight) = match RawRequirement::deserialize(deserializer)? {
            RawRequirement::Detailed { level, weight } => (level, weight),
            RawRequirement::Bare(level) => (level, DEFAULT_WEIGHT),
        };
        let level = level.into_value().map_err(D::Error::custom)?;
        Ok(Self { level, weight })
    }
}

/// Required skill profile for a job role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleRequirementProfile {
    pub role_id: String,
    #[serde(default)]
    pub requirements: BTreeMap<SkillId, Requirement>,
}

impl RoleRequirementProfile {
    pub fn new(role_id: impl Into<String>) -> Self {
        Self {
            role_id: role_id.into(),
            requirements: BTreeMap::new(),
        }
    }

    /// Require `skill` at `level` with the default weight.
    pub fn require(self, skill: impl Into<SkillId>, level: impl Into<f64>) -> Self {
        self.require_weighted(skill, level, DEFAULT_WEIGHT)
    }

    pub fn require_weighted(
        mut self,
        skill: impl Into<SkillId>,
        level: impl Into<f64>,
        weight: f64,
    ) -> Self {
        self.requirements
            .insert(skill.into(), Requirement::weighted(level, weight));
        self
    }
}

/// Externally forecast risk inputs for one (employee, skill) pair.
///
/// Both fields are expected in `[0, 100]`; the scorer rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskSignal {
    /// How exposed the skill is to automation (higher = more exposed).
    pub automation_exposure: f64,
    /// Forecast demand for the skill (higher = more demand).
    pub future_demand: f64,
}

impl RiskSignal {
    pub fn new(automation_exposure: f64, future_demand: f64) -> Self {
        Self {
            automation_exposure,
            future_demand,
        }
    }
}
