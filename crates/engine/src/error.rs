//! Error taxonomy for the engine.
//!
//! Every variant is scoped to a single request and carries enough detail
//! (offending skill id, field, value) for the caller to retry with corrected
//! input. Enrichment failures live in [`crate::enrich::NarrativeError`] and are
//! absorbed rather than propagated.

use crate::types::SkillId;
use thiserror::Error;

/// Result alias used throughout the engine.
pub type Result<T, E = EngineError> = std::result::Result<T, E>;

/// Errors produced by the gap, risk, and plan stages.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// A profile references an unknown skill or carries an out-of-range value.
    #[error("Invalid profile '{owner}': skill '{skill_id}' {reason}")]
    InvalidProfile {
        /// Employee or role id owning the profile.
        owner: String,
        /// The offending skill id.
        skill_id: SkillId,
        /// What is wrong with the entry.
        reason: String,
    },

    /// A risk signal (or the level it is scored against) is out of range.
    #[error("Invalid risk signal for skill '{skill_id}': {field} = {value} is out of range")]
    InvalidSignal {
        /// The skill whose signal was rejected.
        skill_id: SkillId,
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A gapped skill has no risk score.
    #[error("Missing risk score for skill '{skill_id}'")]
    IncompleteInput {
        /// The skill without a risk score.
        skill_id: SkillId,
    },

    /// The caller passed a bad argument.
    #[error("Invalid argument '{argument}': {reason}")]
    InvalidArgument {
        /// Argument name.
        argument: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// The data source has no record for the requested id.
    #[error("Unknown {kind} '{id}'")]
    UnknownEntity {
        /// Entity kind ("employee", "role").
        kind: &'static str,
        /// The requested id.
        id: String,
    },

    /// The data source could not supply a required input.
    #[error("{what} unavailable: {reason}")]
    SourceUnavailable {
        /// What was being fetched.
        what: &'static str,
        /// Upstream failure description.
        reason: String,
    },
}

impl EngineError {
    /// HTTP-style status code for the request surface.
    ///
    /// Caller mistakes map to `400`; missing upstream data maps to `424`.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidProfile { .. }
            | Self::InvalidSignal { .. }
            | Self::InvalidArgument { .. }
            | Self::UnknownEntity { .. } => 400,
            Self::IncompleteInput { .. } | Self::SourceUnavailable { .. } => 424,
        }
    }

    pub(crate) fn invalid_profile(
        owner: &str,
        skill_id: &SkillId,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidProfile {
            owner: owner.to_string(),
            skill_id: skill_id.clone(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_argument(argument: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument,
            reason: reason.into(),
        }
    }
}
