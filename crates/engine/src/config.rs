//! Configuration file support for skillgap.
//!
//! Loads tunable coefficients from a TOML file with the following precedence:
//! environment variables > config file > built-in defaults.
//!
//! ## Configuration File Format
//!
//! ```toml
//! # ~/.skillgap/config.toml
//!
//! [risk]
//! # Multiplier on automation exposure before clamping to [0, 100]
//! exposure_weight = 1.0
//!
//! [risk.thresholds]
//! # Inclusive lower bounds of each band; anything below `medium` is low
//! medium = 25.0
//! high = 55.0
//! critical = 80.0
//!
//! [plan]
//! # Cap on plan length when the caller gives none
//! default_max_items = 10
//!
//! [plan.risk_weight_factors]
//! low = 0.0
//! medium = 10.0
//! high = 25.0
//! critical = 45.0
//!
//! [enrich]
//! # OpenAI-compatible API base; enrichment is disabled when unset
//! endpoint = "https://api.example.com/v1"
//! model = "gpt-4o-mini"
//! # Name of the env var holding the API key
//! api_key_env = "SKILLGAP_NARRATIVE_API_KEY"
//! timeout_ms = 8000
//! ```

use crate::enrich::HttpNarrativeClient;
use crate::error::{EngineError, Result as EngineResult};
use crate::plan::{PlanBuilder, RiskWeightFactors};
use crate::risk::RiskScorer;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Env var overriding `enrich.endpoint`.
pub const ENV_NARRATIVE_URL: &str = "SKILLGAP_NARRATIVE_URL";
/// Env var overriding `enrich.model`.
pub const ENV_NARRATIVE_MODEL: &str = "SKILLGAP_NARRATIVE_MODEL";
/// Env var overriding `enrich.timeout_ms`.
pub const ENV_ENRICH_TIMEOUT_MS: &str = "SKILLGAP_ENRICH_TIMEOUT_MS";

/// Top-level configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub risk: RiskScorer,
    #[serde(default)]
    pub plan: PlanConfig,
    #[serde(default)]
    pub enrich: EnrichConfig,
}

/// Plan ranking settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    pub risk_weight_factors: RiskWeightFactors,
    pub default_max_items: Option<usize>,
}

/// Narrative enrichment settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EnrichConfig {
    pub endpoint: Option<String>,
    pub model: String,
    pub api_key_env: String,
    pub timeout_ms: u64,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            model: "gpt-4o-mini".to_string(),
            api_key_env: "SKILLGAP_NARRATIVE_API_KEY".to_string(),
            timeout_ms: crate::enrich::DEFAULT_TIMEOUT.as_millis() as u64,
        }
    }
}

impl EnrichConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// HTTP client for the configured endpoint, if any.
    pub fn client(&self) -> Option<HttpNarrativeClient> {
        let endpoint = self.endpoint.as_deref()?.trim();
        if endpoint.is_empty() {
            return None;
        }
        let api_key = std::env::var(&self.api_key_env).ok();
        Some(
            HttpNarrativeClient::new(endpoint, self.model.clone())
                .with_api_key(api_key)
                .with_timeout(self.timeout()),
        )
    }
}

impl EngineConfig {
    /// Reject coefficient sets that would break the scoring contracts.
    pub fn validate(&self) -> EngineResult<()> {
        if !self.risk.thresholds.is_valid() {
            return Err(EngineError::invalid_argument(
                "risk.thresholds",
                "must be strictly increasing within (0, 100]",
            ));
        }
        if !self.risk.exposure_weight.is_finite() || self.risk.exposure_weight < 0.0 {
            return Err(EngineError::invalid_argument(
                "risk.exposure_weight",
                format!("must be finite and >= 0, got {}", self.risk.exposure_weight),
            ));
        }
        if !self.plan.risk_weight_factors.is_valid() {
            return Err(EngineError::invalid_argument(
                "plan.risk_weight_factors",
                "must be finite and non-decreasing from low to critical",
            ));
        }
        if self.plan.default_max_items == Some(0) {
            return Err(EngineError::invalid_argument(
                "plan.default_max_items",
                "must be at least 1",
            ));
        }
        if self.enrich.timeout_ms == 0 {
            return Err(EngineError::invalid_argument(
                "enrich.timeout_ms",
                "must be greater than 0",
            ));
        }
        Ok(())
    }

    pub fn scorer(&self) -> RiskScorer {
        self.risk
    }

    pub fn plan_builder(&self) -> PlanBuilder {
        PlanBuilder::new().with_factors(self.plan.risk_weight_factors)
    }

    /// Parse a TOML document and validate it.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay environment variables on top of file settings.
    pub fn apply_env_overrides(&mut self) {
        if let Some(url) = non_empty_env(ENV_NARRATIVE_URL) {
            self.enrich.endpoint = Some(url);
        }
        if let Some(model) = non_empty_env(ENV_NARRATIVE_MODEL) {
            self.enrich.model = model;
        }
        if let Some(raw) = non_empty_env(ENV_ENRICH_TIMEOUT_MS) {
            match raw.parse::<u64>() {
                Ok(ms) if ms > 0 => self.enrich.timeout_ms = ms,
                _ => tracing::warn!(
                    target: "skillgap::config",
                    value = %raw,
                    "Invalid SKILLGAP_ENRICH_TIMEOUT_MS value, keeping configured timeout"
                ),
            }
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    let raw = std::env::var(key).ok()?;
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Returns the default config path (~/.skillgap/config.toml).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".skillgap").join("config.toml"))
}

/// Load configuration.
///
/// An explicit `path` must exist. Without one, the default path is used when
/// present and built-in defaults otherwise. Environment overrides are applied
/// last and the result is validated.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => default_config_path().filter(|p| p.exists()),
    };

    let mut config = match path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            let config: EngineConfig = toml::from_str(&content)
                .with_context(|| format!("failed to parse config file {}", path.display()))?;
            tracing::debug!(
                target: "skillgap::config",
                path = %path.display(),
                "Loaded configuration file"
            );
            config
        }
        None => EngineConfig::default(),
    };

    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}
