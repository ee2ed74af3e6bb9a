//! Immutable skill catalog snapshot.
//!
//! The catalog is built once per request from whatever the data source
//! returns and is only ever read afterwards, so it can be shared freely
//! across threads without synchronization.

use crate::error::{EngineError, Result};
use crate::types::{Skill, SkillCategory, SkillId};
use std::collections::BTreeMap;

/// Canonical registry of skills keyed by id.
#[derive(Debug, Clone, Default)]
pub struct SkillCatalog {
    skills: BTreeMap<SkillId, Skill>,
}

impl SkillCatalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn new(skills: impl IntoIterator<Item = Skill>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for skill in skills {
            if map.contains_key(&skill.id) {
                return Err(EngineError::invalid_argument(
                    "catalog",
                    format!("duplicate skill id '{}'", skill.id),
                ));
            }
            map.insert(skill.id.clone(), skill);
        }
        Ok(Self { skills: map })
    }

    pub fn get(&self, id: &str) -> Option<&Skill> {
        self.skills.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.skills.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Skills in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Skill> {
        self.skills.values()
    }

    /// Skills belonging to `category`, in id order.
    pub fn by_category(&self, category: SkillCategory) -> impl Iterator<Item = &Skill> {
        self.skills.values().filter(move |s| s.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> SkillCatalog {
        SkillCatalog::new(vec![
            Skill::new("welding", "Welding", SkillCategory::Manufacturing),
            Skill::new("rust", "Rust programming", SkillCategory::Software),
            Skill::new("spc", "Statistical process control", SkillCategory::Quality),
            Skill::new("cnc", "CNC machining", SkillCategory::Manufacturing),
        ])
        .unwrap()
    }

    #[test]
    fn test_lookup() {
        let cat = catalog();
        assert_eq!(cat.len(), 4);
        assert!(cat.contains("rust"));
        assert!(!cat.contains("cobol"));
        assert_eq!(cat.get("spc").map(|s| s.category), Some(SkillCategory::Quality));
    }

    #[test]
    fn test_iter_is_id_ordered() {
        let ids: Vec<_> = catalog().iter().map(|s| s.id.to_string()).collect();
        assert_eq!(ids, vec!["cnc", "rust", "spc", "welding"]);
    }

    #[test]
    fn test_by_category() {
        let cat = catalog();
        let ids: Vec<_> = cat
            .by_category(SkillCategory::Manufacturing)
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["cnc", "welding"]);
        assert_eq!(cat.by_category(SkillCategory::Safety).count(), 0);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = SkillCatalog::new(vec![
            Skill::new("a", "A", SkillCategory::Other),
            Skill::new("a", "A again", SkillCategory::Other),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidArgument {
                argument: "catalog",
                ..
            }
        ));
    }

    #[test]
    fn test_empty_catalog() {
        let cat = SkillCatalog::default();
        assert!(cat.is_empty());
    }
}
