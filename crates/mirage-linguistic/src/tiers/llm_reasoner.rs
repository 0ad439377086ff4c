//! Tier 3 — external model verdict.
//!
//! Packages the question and tier evidence into a chat-completions request
//! and parses the strict JSON reply. Two providers are tried in order with
//! two attempts each and exponential backoff; a malformed reply counts as
//! a failed call (no repair is attempted). With no provider configured or
//! every attempt exhausted, the caller falls back to the rule verdict.

use std::time::Duration;

use mirage_core::config::ProvidersConfig;
use mirage_core::errors::ReasonError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Candidate, Question};

/// One resolved provider: endpoint, model, and bearer token.
#[derive(Debug, Clone)]
struct Provider {
    name: String,
    endpoint: String,
    model: String,
    api_key: String,
}

/// The reply schema required from the model. Anything else is a failure.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmVerdict {
    pub found: bool,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub severity: u8,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub confidence: Option<f32>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

pub struct LlmReasoner {
    providers: Vec<Provider>,
    client: reqwest::Client,
    attempts_per_provider: u32,
}

impl LlmReasoner {
    /// Resolve providers from configuration. Providers whose bearer token
    /// is absent from the environment are dropped; with none left the
    /// reasoner is disabled and every detector uses its fallback verdict.
    pub fn from_config(providers: &ProvidersConfig, timeout_s: u64) -> Self {
        let resolved: Vec<Provider> = providers
            .chain()
            .into_iter()
            .filter_map(|endpoint| {
                let api_key = endpoint.api_key()?;
                Some(Provider {
                    name: endpoint.name.clone(),
                    endpoint: endpoint.endpoint.clone(),
                    model: endpoint.model.clone(),
                    api_key,
                })
            })
            .collect();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_s))
            .build()
            .unwrap_or_default();

        Self {
            providers: resolved,
            client,
            attempts_per_provider: 2,
        }
    }

    pub fn enabled(&self) -> bool {
        !self.providers.is_empty()
    }

    /// Ask the provider chain for a verdict on one detector question.
    pub async fn verdict(
        &self,
        question: Question,
        prompt: &str,
        code: &str,
        tier1: &[Candidate],
        tier2: &[Candidate],
    ) -> Result<LlmVerdict, ReasonError> {
        if self.providers.is_empty() {
            return Err(ReasonError::NoProviders);
        }

        let packaged = package_question(question, prompt, code, tier1, tier2);
        let mut last: Option<ReasonError> = None;

        for provider in &self.providers {
            let mut backoff = Duration::from_millis(500);
            for attempt in 0..self.attempts_per_provider {
                if attempt > 0 {
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
                match self.ask(provider, &packaged).await {
                    Ok(verdict) => return Ok(verdict),
                    Err(e) => {
                        warn!(
                            provider = %provider.name,
                            attempt,
                            error = %e,
                            "model verdict attempt failed"
                        );
                        last = Some(e);
                    }
                }
            }
            debug!(provider = %provider.name, "provider exhausted, trying next");
        }

        Err(last.unwrap_or(ReasonError::Exhausted))
    }

    async fn ask(&self, provider: &Provider, packaged: &str) -> Result<LlmVerdict, ReasonError> {
        let body = ChatRequest {
            model: &provider.model,
            messages: vec![ChatMessage {
                role: "user",
                content: packaged,
            }],
        };

        let response = self
            .client
            .post(&provider.endpoint)
            .bearer_auth(&provider.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ReasonError::RequestFailed {
                provider: provider.name.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReasonError::BadStatus {
                provider: provider.name.clone(),
                status: status.as_u16(),
            });
        }

        let chat: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| ReasonError::MalformedVerdict {
                    provider: provider.name.clone(),
                    message: e.to_string(),
                })?;
        let content = chat
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .unwrap_or("");

        parse_verdict(content).map_err(|message| ReasonError::MalformedVerdict {
            provider: provider.name.clone(),
            message,
        })
    }
}

/// Build the structured request text: prompt, code, evidence bullets from
/// both tiers, the question posed explicitly, and the reply schema.
pub fn package_question(
    question: Question,
    prompt: &str,
    code: &str,
    tier1: &[Candidate],
    tier2: &[Candidate],
) -> String {
    let mut text = String::new();
    text.push_str("You are auditing machine-generated code against the request it claims to satisfy.\n\n");
    text.push_str("ORIGINAL PROMPT:\n");
    text.push_str(prompt);
    text.push_str("\n\nGENERATED CODE:\n```python\n");
    text.push_str(code);
    text.push_str("\n```\n\n");

    text.push_str("PATTERN EVIDENCE (tier 1):\n");
    if tier1.is_empty() {
        text.push_str("- none\n");
    }
    for candidate in tier1.iter().take(8) {
        text.push_str(&format!("- {}\n", candidate.message));
    }
    text.push_str("\nSTRUCTURAL EVIDENCE (tier 2):\n");
    if tier2.is_empty() {
        text.push_str("- none\n");
    }
    for candidate in tier2.iter().take(8) {
        text.push_str(&format!("- {}\n", candidate.message));
    }

    text.push_str("\nQUESTION:\n");
    text.push_str(question.question_text());
    text.push_str(
        "\n\nReply with ONLY valid JSON in exactly this shape:\n\
         {\"found\": true|false, \"issues\": [\"...\"], \"severity\": 0-10, \"summary\": \"...\"}\n",
    );
    text
}

/// Parse the model reply, tolerating a markdown code fence around the JSON
/// but nothing else. No repair is attempted.
pub fn parse_verdict(content: &str) -> Result<LlmVerdict, String> {
    let trimmed = content.trim();
    let body = if let Some(rest) = trimmed.strip_prefix("```json") {
        rest.split("```").next().unwrap_or("")
    } else if let Some(rest) = trimmed.strip_prefix("```") {
        rest.split("```").next().unwrap_or("")
    } else {
        trimmed
    };
    serde_json::from_str::<LlmVerdict>(body.trim()).map_err(|e| e.to_string())
}
