//! Narrative generation via an OpenAI-compatible chat-completions endpoint.

use super::{NarrativeError, NarrativeGenerator};
use crate::plan::LearningPlanItem;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const SYSTEM_PROMPT: &str = "You are an HR learning advisor. You explain workforce learning plans \
to managers in plain, encouraging language. You never change priorities or actions.";

/// Prompt template for plan narratives.
const NARRATIVE_PROMPT: &str = r#"Explain each item of the following learning plan in one or two sentences.

Plan (JSON, highest priority first):
{plan}

Requirements:
1. Keep the given priority and suggested action; only explain them
2. Mention the size of the gap and the risk label where relevant
3. Do not invent skills that are not in the plan

Output ONLY a JSON object mapping each skill_id to its explanation string.
Do not include any text before or after the JSON object."#;

/// Subset of a plan item that is sent to the service.
#[derive(Serialize)]
struct PromptItem<'a> {
    skill_id: &'a str,
    priority: usize,
    suggested_action: &'a str,
    delta: i8,
    weight: f64,
    risk_label: &'a str,
    risk_score: f64,
}

fn build_prompt(plan: &[LearningPlanItem]) -> Result<String, NarrativeError> {
    let items: Vec<PromptItem<'_>> = plan
        .iter()
        .map(|item| PromptItem {
            skill_id: item.skill_id.as_str(),
            priority: item.priority,
            suggested_action: item.suggested_action.as_str(),
            delta: item.rationale.delta,
            weight: item.rationale.weight,
            risk_label: item.rationale.risk_label.as_str(),
            risk_score: (item.rationale.risk_score * 10.0).round() / 10.0,
        })
        .collect();
    let plan_json = serde_json::to_string_pretty(&items)
        .map_err(|e| NarrativeError::Service(format!("failed to encode plan: {e}")))?;
    Ok(NARRATIVE_PROMPT.replace("{plan}", &plan_json))
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// HTTP client for the narrative collaborator.
#[derive(Debug, Clone)]
pub struct HttpNarrativeClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl HttpNarrativeClient {
    /// `endpoint` is the API base, e.g. `https://api.example.com/v1`.
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: None,
            timeout: super::DEFAULT_TIMEOUT,
        }
    }

    /// Bearer token; blank values are ignored.
    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint.trim_end_matches('/'))
    }

    fn apply_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header(AUTHORIZATION, format!("Bearer {key}")),
            None => builder,
        }
    }

    fn map_transport_error(&self, err: reqwest::Error) -> NarrativeError {
        if err.is_timeout() {
            NarrativeError::Timeout(self.timeout.as_millis() as u64)
        } else {
            NarrativeError::Service(err.to_string())
        }
    }
}

#[async_trait]
impl NarrativeGenerator for HttpNarrativeClient {
    async fn generate_narrative(&self, plan: &[LearningPlanItem]) -> Result<String, NarrativeError> {
        let prompt = build_prompt(plan)?;
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: 0.0,
        };

        debug!(
            target: "skillgap::enrich",
            url = %self.completions_url(),
            model = %self.model,
            items = plan.len(),
            "Requesting plan narrative"
        );

        let response = self
            .apply_auth(
                self.client
                    .post(self.completions_url())
                    .timeout(self.timeout)
                    .json(&body),
            )
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = match status.as_u16() {
                401 | 403 => "authentication failed; check the narrative API key".to_string(),
                429 => "rate limited".to_string(),
                _ => body.chars().take(200).collect(),
            };
            return Err(NarrativeError::Service(format!("HTTP {status}: {detail}")));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| NarrativeError::Malformed(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| NarrativeError::Malformed("response has no message content".into()))
    }
}
