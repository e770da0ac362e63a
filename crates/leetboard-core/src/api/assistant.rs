//! Analysis assistant client (llama.cpp-server compatible, consumed only)
//!
//! One completion call: prompt in, generated text out. Models routinely wrap
//! JSON output in Markdown code fences, so [`strip_code_fences`] runs before
//! any parsing. The structured prompt built here pairs with
//! [`crate::cache::ANALYSIS_VERSION`]; change one, bump the other.

use super::{bad_body, bad_status, connectivity};
use crate::error::CoreError;
use crate::models::Problem;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

const SERVICE: &str = "assistant";

/// Matches a whole response wrapped in one fence pair, with an optional
/// language tag after the opening backticks
static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^\s*```[a-zA-Z0-9_-]*\s*\n?(.*?)\n?\s*```\s*$").unwrap());

/// Connection and sampling settings for the assistant endpoint
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Base URL of the llama.cpp server
    pub endpoint: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8080".to_string(),
            max_tokens: 1024,
            temperature: 0.2,
        }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest {
    prompt: String,
    n_predict: u32,
    temperature: f32,
    stop: Vec<String>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    cache_prompt: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    content: String,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

/// Client for the local analysis model
pub struct AssistantClient {
    config: AssistantConfig,
    client: reqwest::Client,
}

impl AssistantClient {
    pub fn new(config: AssistantConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Whether the model server is up and answering
    pub async fn is_healthy(&self) -> bool {
        let url = format!("{}/health", self.config.endpoint);

        match self.client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => resp
                .json::<HealthResponse>()
                .await
                .map(|h| h.status == "ok")
                .unwrap_or(false),
            _ => false,
        }
    }

    /// One completion round trip, raw generated text out
    pub async fn generate(&self, prompt: String) -> Result<String, CoreError> {
        let url = format!("{}/completion", self.config.endpoint);
        debug!(endpoint = %url, prompt_len = prompt.len(), "Assistant completion");

        let request = CompletionRequest {
            prompt,
            n_predict: self.config.max_tokens,
            temperature: self.config.temperature,
            stop: vec!["</s>".to_string()],
            stream: false,
            cache_prompt: Some(true),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| connectivity(SERVICE, &self.config.endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(bad_status(SERVICE, status));
        }

        let completion: CompletionResponse =
            response.json().await.map_err(|e| bad_body(SERVICE, e))?;

        Ok(completion.content)
    }

    /// Generate a structured analysis for a problem and parse it as JSON
    pub async fn analyze_problem(&self, problem: &Problem) -> Result<Value, CoreError> {
        let raw = self.generate(build_analysis_prompt(problem)).await?;
        let cleaned = strip_code_fences(&raw);

        serde_json::from_str(cleaned).map_err(|_| CoreError::ExternalApi {
            service: SERVICE,
            message: "Model did not return valid JSON, try again".to_string(),
        })
    }
}

/// Render the analysis request for one problem.
///
/// The output shape here is what [`crate::cache::ANALYSIS_VERSION`] v2 means.
pub fn build_analysis_prompt(problem: &Problem) -> String {
    let mut context = format!(
        "Problem: {} (difficulty: {})",
        problem.title, problem.difficulty
    );
    if !problem.tags.is_empty() {
        context.push_str(&format!("\nTopics: {}", problem.tags.join(", ")));
    }
    if problem.attempts > 0 {
        context.push_str(&format!("\nMy attempts so far: {}", problem.attempts));
    }
    if !problem.notes.is_empty() {
        context.push_str(&format!("\nMy notes:\n{}", problem.notes));
    }

    format!(
        r#"You are an experienced coding-interview coach. Analyze the following LeetCode problem for a student tracking their practice.

{}

Respond with a single JSON object, no other text:
{{
  "summary": "one-paragraph restatement of what the problem asks",
  "approach": "the standard approach, step by step",
  "complexity": {{ "time": "big-O time", "space": "big-O space" }},
  "pitfalls": ["common mistake 1", "common mistake 2"]
}}"#,
        context
    )
}

/// Drop one surrounding Markdown fence pair, if present.
/// Unfenced input is only trimmed.
pub fn strip_code_fences(text: &str) -> &str {
    match CODE_FENCE.captures(text) {
        Some(caps) => caps.get(1).map_or(text, |m| m.as_str()),
        None => text.trim(),
    }
}
