//! Topic synthesis via a chat-completion service, plus sanitization.

mod sanitize;

pub use sanitize::{sanitize_topics, MAX_TOPICS, MAX_TOPIC_LEN};

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::github::api_error;

pub const OPENAI_API: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Low temperature and a small output budget: the reply should be a literal
/// comma-separated label list, not prose.
const MAX_COMPLETION_TOKENS: usize = 64;
const TEMPERATURE: f32 = 0.3;

/// Derives candidate topic labels from sampled code.
pub trait Synthesizer {
    fn suggest_topics(&self, code_sample: &str) -> Result<Vec<String>>;
}

pub struct OpenAiClient {
    http: Client,
    model: String,
    api_base: String,
}

impl OpenAiClient {
    pub fn new(api_key: &str, model: &str) -> Result<Self> {
        Self::with_api_base(api_key, model, OPENAI_API)
    }

    /// Build a client against a non-default API base. Tests point this at a
    /// local mock server.
    pub fn with_api_base(api_key: &str, model: &str, api_base: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", api_key.trim());
        let mut auth_value =
            HeaderValue::from_str(&auth).map_err(|_| Error::InvalidCredential("OPENAI_API_KEY"))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            http,
            model: model.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }
}

impl Synthesizer for OpenAiClient {
    fn suggest_topics(&self, code_sample: &str) -> Result<Vec<String>> {
        let prompt = build_prompt(code_sample);
        let body = ChatRequest {
            model: &self.model,
            temperature: TEMPERATURE,
            max_tokens: MAX_COMPLETION_TOKENS,
            messages: vec![ChatMessage { role: "user", content: &prompt }],
        };

        let url = format!("{}/chat/completions", self.api_base);
        let response = self.http.post(&url).json(&body).send()?;
        if !response.status().is_success() {
            return Err(api_error("completion service", response));
        }

        let parsed: ChatResponse = response.json()?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::MalformedCompletion("response had no choices".to_string()))?;

        Ok(parse_topic_list(&content))
    }
}

fn build_prompt(code_sample: &str) -> String {
    format!(
        "Given the following code snippets from a GitHub repository, suggest 3-8 relevant \
         GitHub topics (single words or short phrases) that best describe the repository. \
         Return only a comma-separated list of topics, no explanations.\n\n{}",
        code_sample
    )
}

/// Split the model reply on commas, trimming whitespace and dropping empty
/// pieces. Order is preserved; nothing is deduplicated here.
pub fn parse_topic_list(content: &str) -> Vec<String> {
    content
        .split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(|piece| piece.to_string())
        .collect()
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: usize,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: String,
}
