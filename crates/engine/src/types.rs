//! Common types shared across engine modules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical skill identifier.
///
/// Ordering is lexicographic on the raw id, which is what every tie-break in
/// the engine relies on.
///
/// # Examples
///
/// ```
/// use skillgap_engine::SkillId;
///
/// let a = SkillId::from("cnc-milling");
/// let b = SkillId::from("welding");
/// assert!(a < b);
/// assert_eq!(a.as_str(), "cnc-milling");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillId(String);

impl SkillId {
    /// Create a skill id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SkillId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SkillId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::borrow::Borrow<str> for SkillId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Broad grouping used by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Manufacturing,
    Software,
    Quality,
    Safety,
    Management,
    Other,
}

impl SkillCategory {
    /// Lowercase label used in data files.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Manufacturing => "manufacturing",
            Self::Software => "software",
            Self::Quality => "quality",
            Self::Safety => "safety",
            Self::Management => "management",
            Self::Other => "other",
        }
    }
}

impl FromStr for SkillCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manufacturing" => Ok(Self::Manufacturing),
            "software" => Ok(Self::Software),
            "quality" => Ok(Self::Quality),
            "safety" => Ok(Self::Safety),
            "management" => Ok(Self::Management),
            "other" => Ok(Self::Other),
            other => Err(format!("unknown skill category '{other}'")),
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A catalog entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    pub category: SkillCategory,
}

impl Skill {
    pub fn new(id: impl Into<SkillId>, name: impl Into<String>, category: SkillCategory) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
        }
    }
}

/// Ordinal proficiency level.
///
/// `Absent` (0) stands for a skill missing from a profile; the rated levels
/// run from `None` (1) to `Expert` (5). Comparisons always go through the
/// ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum SkillLevel {
    Absent = 0,
    None = 1,
    Basic = 2,
    Intermediate = 3,
    Advanced = 4,
    Expert = 5,
}

impl SkillLevel {
    /// Highest ordinal.
    pub const MAX: u8 = 5;

    /// Numeric ordinal (0-5).
    #[must_use]
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Absent => "Absent",
            Self::None => "None",
            Self::Basic => "Basic",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Expert => "Expert",
        }
    }

    /// Map a label (case-insensitive) to its ordinal.
    pub fn ordinal_for_label(label: &str) -> Option<u8> {
        let level = match label.trim().to_ascii_lowercase().as_str() {
            "absent" => Self::Absent,
            "none" => Self::None,
            "basic" => Self::Basic,
            "intermediate" => Self::Intermediate,
            "advanced" => Self::Advanced,
            "expert" => Self::Expert,
            _ => return Option::None,
        };
        Some(level.ordinal())
    }
}

impl TryFrom<u8> for SkillLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Absent),
            1 => Ok(Self::None),
            2 => Ok(Self::Basic),
            3 => Ok(Self::Intermediate),
            4 => Ok(Self::Advanced),
            5 => Ok(Self::Expert),
            other => Err(format!("level {other} is outside 0-{}", Self::MAX)),
        }
    }
}

impl From<SkillLevel> for u8 {
    fn from(level: SkillLevel) -> Self {
        level.ordinal()
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.ordinal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering_uses_ordinal() {
        assert!(SkillLevel::Absent < SkillLevel::None);
        assert!(SkillLevel::Basic < SkillLevel::Intermediate);
        assert!(SkillLevel::Advanced < SkillLevel::Expert);
        // "Expert" sorts before "Intermediate" as a string but not as a level
        assert!(SkillLevel::Expert.label() < SkillLevel::Intermediate.label());
        assert!(SkillLevel::Expert > SkillLevel::Intermediate);
    }

    #[test]
    fn test_level_try_from_rejects_out_of_range() {
        assert_eq!(SkillLevel::try_from(3), Ok(SkillLevel::Intermediate));
        assert!(SkillLevel::try_from(6).is_err());
    }

    #[test]
    fn test_level_labels() {
        assert_eq!(SkillLevel::ordinal_for_label("expert"), Some(5));
        assert_eq!(SkillLevel::ordinal_for_label(" Basic "), Some(2));
        assert_eq!(SkillLevel::ordinal_for_label("none"), Some(1));
        assert_eq!(SkillLevel::ordinal_for_label("guru"), Option::None);
    }

    #[test]
    fn test_level_serde_as_ordinal() {
        let json = serde_json::to_string(&SkillLevel::Advanced).unwrap();
        assert_eq!(json, "4");
        let parsed: SkillLevel = serde_json::from_str("2").unwrap();
        assert_eq!(parsed, SkillLevel::Basic);
        assert!(serde_json::from_str::<SkillLevel>("9").is_err());
    }

    #[test]
    fn test_category_parse_and_display() {
        assert_eq!(
            "Manufacturing".parse::<SkillCategory>(),
            Ok(SkillCategory::Manufacturing)
        );
        assert!("astrology".parse::<SkillCategory>().is_err());
        assert_eq!(SkillCategory::Quality.to_string(), "quality");
    }

    #[test]
    fn test_skill_id_display_and_order() {
        let a = SkillId::from("a");
        let b = SkillId::new(String::from("b"));
        assert!(a < b);
        assert_eq!(b.to_string(), "b");
    }
}
