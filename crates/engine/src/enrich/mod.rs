//! Best-effort narrative enrichment of learning plans.
//!
//! The structured plan is always complete before enrichment starts. The
//! narrative collaborator runs on its own task under a timeout; any failure
//! (timeout, service error, unparseable response) leaves the plan exactly as
//! it was and is reported as a warning.

mod http;

pub use http::HttpNarrativeClient;

use crate::plan::LearningPlanItem;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Default bound on a single enrichment call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

/// Failures of the narrative collaborator. Always absorbed by [`Enricher`].
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum NarrativeError {
    #[error("narrative generation timed out after {0} ms")]
    Timeout(u64),
    #[error("narrative service error: {0}")]
    Service(String),
    #[error("malformed narrative response: {0}")]
    Malformed(String),
}

/// External text generator.
///
/// Implementations return free text; [`Enricher`] expects it to contain a
/// JSON object mapping skill ids to narrative strings.
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    async fn generate_narrative(&self, plan: &[LearningPlanItem]) -> Result<String, NarrativeError>;
}

/// Plan after an enrichment attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedPlan {
    pub items: Vec<LearningPlanItem>,
    /// Why enrichment was skipped, if it was.
    pub warning: Option<NarrativeError>,
}

/// Aborts the wrapped task when dropped, so a timed-out or cancelled
/// enrichment never outlives its request.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Decorates plans with narrative text from a [`NarrativeGenerator`].
#[derive(Clone)]
pub struct Enricher {
    generator: Arc<dyn NarrativeGenerator>,
    timeout: Duration,
}

impl std::fmt::Debug for Enricher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enricher")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Enricher {
    pub fn new(generator: Arc<dyn NarrativeGenerator>) -> Self {
        Self {
            generator,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Attach narratives to `plan`, or return it unchanged with a warning.
    ///
    /// Only the `narrative` field of each item is ever written.
    pub async fn enrich(&self, plan: Vec<LearningPlanItem>) -> EnrichedPlan {
        if plan.is_empty() {
            return EnrichedPlan {
                items: plan,
                warning: None,
            };
        }

        let generator = Arc::clone(&self.generator);
        let request = plan.clone();
        let mut task = AbortOnDrop(tokio::spawn(async move {
            generator.generate_narrative(&request).await
        }));

        let outcome = match tokio::time::timeout(self.timeout, &mut task.0).await {
            Err(_) => Err(NarrativeError::Timeout(self.timeout.as_millis() as u64)),
            Ok(Err(join_err)) => Err(NarrativeError::Service(format!(
                "narrative task failed: {join_err}"
            ))),
            Ok(Ok(result)) => result,
        };

        match outcome.and_then(|text| parse_narratives(&text)) {
            Ok(narratives) => match apply_narratives(plan.clone(), &narratives) {
                Some(items) => {
                    debug!(
                        target: "skillgap::enrich",
                        items = items.len(),
                        narrated = narratives.len(),
                        "Attached plan narratives"
                    );
                    EnrichedPlan {
                        items,
                        warning: None,
                    }
                }
                None => degrade(
                    plan,
                    NarrativeError::Malformed("no narrative matched a plan item".into()),
                ),
            },
            Err(err) => degrade(plan, err),
        }
    }
}

fn degrade(plan: Vec<LearningPlanItem>, err: NarrativeError) -> EnrichedPlan {
    warn!(
        target: "skillgap::enrich",
        error = %err,
        items = plan.len(),
        "Plan enrichment failed, returning structured plan without narrative"
    );
    EnrichedPlan {
        items: plan,
        warning: Some(err),
    }
}

/// Pull a JSON object out of the generator's text, tolerating code fences
/// and surrounding prose.
fn extract_json_object(response: &str) -> Option<&str> {
    let response = response.trim();
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    (end > start).then(|| &response[start..=end])
}

fn parse_narratives(response: &str) -> Result<BTreeMap<String, String>, NarrativeError> {
    let json = extract_json_object(response)
        .ok_or_else(|| NarrativeError::Malformed("response contains no JSON object".into()))?;
    serde_json::from_str(json).map_err(|e| NarrativeError::Malformed(e.to_string()))
}

/// `None` when no narrative matches any item.
fn apply_narratives(
    mut items: Vec<LearningPlanItem>,
    narratives: &BTreeMap<String, String>,
) -> Option<Vec<LearningPlanItem>> {
    let mut matched = 0usize;
    for item in &mut items {
        if let Some(text) = narratives.get(item.skill_id.as_str()) {
            let text = text.trim();
            if !text.is_empty() {
                item.narrative = Some(text.to_string());
                matched += 1;
            }
        }
    }
    (matched > 0).then_some(items)
}
