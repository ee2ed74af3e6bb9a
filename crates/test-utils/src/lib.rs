//! Shared test utilities for skillgap crates.
//!
//! This crate provides common fixtures (a sample catalog, profiles, signals,
//! and on-disk data sets) used across the skillgap workspace.

use serde_json::json;
use skillgap_engine::{
    DataSet, EmployeeProfile, RiskSignal, RoleRequirementProfile, Skill, SkillCatalog,
    SkillCategory, SkillId,
};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Skills used by the sample fixtures.
pub fn sample_skills() -> Vec<Skill> {
    vec![
        Skill::new("cnc", "CNC machining", SkillCategory::Manufacturing),
        Skill::new("welding", "Welding", SkillCategory::Manufacturing),
        Skill::new("plc", "PLC programming", SkillCategory::Software),
        Skill::new("python", "Python", SkillCategory::Software),
        Skill::new("spc", "Statistical process control", SkillCategory::Quality),
        Skill::new("lockout", "Lockout/tagout", SkillCategory::Safety),
    ]
}

pub fn sample_catalog() -> SkillCatalog {
    SkillCatalog::new(sample_skills()).expect("sample skills have unique ids")
}

/// Employee profile from `(skill, level)` pairs.
pub fn employee(id: &str, levels: &[(&str, u8)]) -> EmployeeProfile {
    levels
        .iter()
        .fold(EmployeeProfile::new(id), |p, &(skill, level)| {
            p.with_level(skill, level)
        })
}

/// Role profile from `(skill, level, weight)` triples.
pub fn role(id: &str, requirements: &[(&str, u8, f64)]) -> RoleRequirementProfile {
    requirements
        .iter()
        .fold(RoleRequirementProfile::new(id), |r, &(skill, level, weight)| {
            r.require_weighted(skill, level, weight)
        })
}

/// Signal map from `(skill, exposure, demand)` triples.
pub fn signals(entries: &[(&str, f64, f64)]) -> BTreeMap<SkillId, RiskSignal> {
    entries
        .iter()
        .map(|&(skill, exposure, demand)| (SkillId::from(skill), RiskSignal::new(exposure, demand)))
        .collect()
}

/// A small plant-floor data set: two employees and two roles.
///
/// - `op-1` is a machine operator moving towards automation technician. No
///   forecast exists for `lockout`, so `op-1` against `welder` is incomplete.
/// - `op-2` has no risk forecasts on file.
pub fn sample_data_set() -> DataSet {
    let mut all_signals = BTreeMap::new();
    all_signals.insert(
        "op-1".to_string(),
        signals(&[
            ("cnc", 85.0, 15.0),
            ("welding", 70.0, 40.0),
            ("plc", 60.0, 20.0),
            ("python", 10.0, 95.0),
            ("spc", 100.0, 0.0),
        ]),
    );

    DataSet {
        skills: sample_skills(),
        employees: vec![
            employee("op-1", &[("cnc", 4), ("welding", 3), ("spc", 2), ("lockout", 5)]),
            employee("op-2", &[("cnc", 2)]),
        ],
        roles: vec![
            role(
                "automation-tech",
                &[
                    ("plc", 4, 2.0),
                    ("python", 3, 1.0),
                    ("cnc", 3, 1.0),
                    ("spc", 3, 1.5),
                ],
            ),
            role("welder", &[("welding", 4, 1.0), ("lockout", 3, 1.0)]),
        ],
        signals: all_signals,
    }
}

/// Temporary directory holding data and config files.
pub struct TestFixture {
    pub tempdir: tempfile::TempDir,
}

impl TestFixture {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            tempdir: tempfile::tempdir()?,
        })
    }

    /// Write `data` as pretty JSON and return its path.
    pub fn write_data_set(&self, name: &str, data: &DataSet) -> std::io::Result<PathBuf> {
        let path = self.tempdir.path().join(name);
        let json = serde_json::to_string_pretty(data)?;
        std::fs::write(&path, json)?;
        Ok(path)
    }

    /// Write raw file content and return its path.
    pub fn write_file(&self, name: &str, content: &str) -> std::io::Result<PathBuf> {
        let path = self.tempdir.path().join(name);
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Data set with a level outside 0-5 for `op-1`.
    pub fn write_invalid_level_data_set(&self, name: &str) -> std::io::Result<PathBuf> {
        let mut value = serde_json::to_value(sample_data_set())?;
        value["employees"][0]["levels"]["cnc"] = json!(9);
        self.write_file(name, &value.to_string())
    }
}
