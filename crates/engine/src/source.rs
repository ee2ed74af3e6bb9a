//! Data-access boundary: skill catalog, profiles, and risk signals.

use crate::catalog::SkillCatalog;
use crate::error::{EngineError, Result};
use crate::profile::{EmployeeProfile, RiskSignal, RoleRequirementProfile};
use crate::types::{Skill, SkillId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Synchronous read access to HR data.
///
/// Implementations own any caching or staleness policy; the engine treats
/// every call as a pure read.
pub trait ProfileSource: Send + Sync {
    fn skill_catalog(&self) -> Result<SkillCatalog>;
    fn employee_profile(&self, employee_id: &str) -> Result<EmployeeProfile>;
    fn role_profile(&self, role_id: &str) -> Result<RoleRequirementProfile>;
    fn risk_signals(&self, employee_id: &str) -> Result<BTreeMap<SkillId, RiskSignal>>;
}

/// Serialized data set, as read from a JSON file.
///
/// ```json
/// {
///   "skills": [{"id": "welding", "name": "Welding", "category": "manufacturing"}],
///   "employees": [{"employee_id": "e1", "levels": {"welding": "basic"}}],
///   "roles": [{"role_id": "r1", "requirements": {"welding": {"level": 4, "weight": 2.0}}}],
///   "signals": {"e1": {"welding": {"automation_exposure": 70, "future_demand": 20}}}
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataSet {
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub employees: Vec<EmployeeProfile>,
    #[serde(default)]
    pub roles: Vec<RoleRequirementProfile>,
    #[serde(default)]
    pub signals: BTreeMap<String, BTreeMap<SkillId, RiskSignal>>,
}

/// In-memory [`ProfileSource`] backed by a [`DataSet`].
#[derive(Debug, Clone)]
pub struct InMemorySource {
    catalog: SkillCatalog,
    employees: BTreeMap<String, EmployeeProfile>,
    roles: BTreeMap<String, RoleRequirementProfile>,
    signals: BTreeMap<String, BTreeMap<SkillId, RiskSignal>>,
}

impl InMemorySource {
    /// Index a data set. Duplicate skill, employee, or role ids are rejected.
    pub fn new(data: DataSet) -> Result<Self> {
        let catalog = SkillCatalog::new(data.skills)?;

        let mut employees = BTreeMap::new();
        for profile in data.employees {
            let id = profile.employee_id.clone();
            if employees.insert(id.clone(), profile).is_some() {
                return Err(EngineError::invalid_argument(
                    "employees",
                    format!("duplicate employee id '{id}'"),
                ));
            }
        }

        let mut roles = BTreeMap::new();
        for profile in data.roles {
            let id = profile.role_id.clone();
            if roles.insert(id.clone(), profile).is_some() {
                return Err(EngineError::invalid_argument(
                    "roles",
                    format!("duplicate role id '{id}'"),
                ));
            }
        }

        Ok(Self {
            catalog,
            employees,
            roles,
            signals: data.signals,
        })
    }

    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let data: DataSet = serde_json::from_str(json)?;
        Ok(Self::new(data)?)
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read data file {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("failed to load data file {}", path.display()))
    }
}

impl ProfileSource for InMemorySource {
    fn skill_catalog(&self) -> Result<SkillCatalog> {
        Ok(self.catalog.clone())
    }

    fn employee_profile(&self, employee_id: &str) -> Result<EmployeeProfile> {
        self.employees
            .get(employee_id)
            .cloned()
            .ok_or_else(|| EngineError::UnknownEntity {
                kind: "employee",
                id: employee_id.to_string(),
            })
    }

    fn role_profile(&self, role_id: &str) -> Result<RoleRequirementProfile> {
        self.roles
            .get(role_id)
            .cloned()
            .ok_or_else(|| EngineError::UnknownEntity {
                kind: "role",
                id: role_id.to_string(),
            })
    }

    fn risk_signals(&self, employee_id: &str) -> Result<BTreeMap<SkillId, RiskSignal>> {
        self.signals
            .get(employee_id)
            .cloned()
            .ok_or_else(|| EngineError::SourceUnavailable {
                what: "risk signals",
                reason: format!("no forecasts for employee '{employee_id}'"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SkillCategory;

    const DATA: &str = r#"{
        "skills": [
            {"id": "welding", "name": "Welding", "category": "manufacturing"},
            {"id": "python", "name": "Python", "category": "software"}
        ],
        "employees": [{"employee_id": "e1", "levels": {"welding": "basic"}}],
        "roles": [{"role_id": "r1", "requirements": {"welding": 4, "python": {"level": 2, "weight": 0.5}}}],
        "signals": {"e1": {"welding": {"automation_exposure": 70, "future_demand": 20}}}
    }"#;

    #[test]
    fn test_reads_json_data_set() {
        let source = InMemorySource::from_json_str(DATA).unwrap();
        let catalog = source.skill_catalog().unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.get("python").map(|s| s.category),
            Some(SkillCategory::Software)
        );
        assert_eq!(source.employee_profile("e1").unwrap().level_of("welding"), 2.0);
        assert_eq!(source.role_profile("r1").unwrap().requirements.len(), 2);
        let signals = source.risk_signals("e1").unwrap();
        assert_eq!(signals["welding"].automation_exposure, 70.0);
    }

    #[test]
    fn test_unknown_ids() {
        let source = InMemorySource::from_json_str(DATA).unwrap();
        assert!(matches!(
            source.employee_profile("nobody"),
            Err(EngineError::UnknownEntity { kind: "employee", .. })
        ));
        assert!(matches!(
            source.role_profile("astronaut"),
            Err(EngineError::UnknownEntity { kind: "role", .. })
        ));
    }

    #[test]
    fn test_missing_signals_are_upstream_failure() {
        let source = InMemorySource::from_json_str(DATA).unwrap();
        let err = source.risk_signals("e2").unwrap_err();
        assert_eq!(err.status_code(), 424);
    }

    #[test]
    fn test_duplicate_employee_rejected() {
        let data = DataSet {
            employees: vec![EmployeeProfile::new("e1"), EmployeeProfile::new("e1")],
            ..Default::default()
        };
        assert!(InMemorySource::new(data).is_err());
    }

    #[test]
    fn test_from_path_reports_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = InMemorySource::from_path(&path).unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }
}
