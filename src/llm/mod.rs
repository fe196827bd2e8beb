//! Completion-service boundary: one trait, one HTTP implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;

use crate::constants::{
    DEFAULT_MAX_TOKENS, LLM_CONCURRENCY_LIMIT, LLM_REQUEST_TIMEOUT_SECS, MAX_CACHE_SIZE,
};

pub mod prompts;

const GROQ_API_URL: &str = "https://api.groq.com";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("prompt must not be empty")]
    InvalidPrompt,
    #[error("completion service unavailable: {0}")]
    Unavailable(String),
    #[error("completion client configuration: {0}")]
    Configuration(String),
}

#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Response cache in front of the completion endpoint. Entries are admitted
/// on miss until capacity is reached; a full cache admits nothing further.
struct BoundedCache {
    capacity: usize,
    entries: Mutex<HashMap<String, String>>,
}

impl BoundedCache {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn insert(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            if entries.len() < self.capacity && !entries.contains_key(key) {
                entries.insert(key.to_string(), value.to_string());
            }
        }
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
    max_tokens: u32,
    model: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    text: String,
}

pub struct GroqLlmService {
    client: Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    base_url: String,
    gate: Semaphore,
    cache: BoundedCache,
}

impl GroqLlmService {
    pub fn new(api_key: String, model: String) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(LLM_REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Configuration(e.to_string()))?;
        Ok(Self {
            client,
            api_key,
            model,
            max_tokens: DEFAULT_MAX_TOKENS,
            base_url: GROQ_API_URL.to_string(),
            gate: Semaphore::new(LLM_CONCURRENCY_LIMIT),
            cache: BoundedCache::new(MAX_CACHE_SIZE),
        })
    }
}

#[async_trait]
impl CompletionService for GroqLlmService {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        if prompt.trim().is_empty() {
            return Err(LlmError::InvalidPrompt);
        }
        if let Some(hit) = self.cache.get(prompt) {
            return Ok(hit);
        }

        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| LlmError::Unavailable("request gate closed".to_string()))?;

        let request = CompletionRequest {
            prompt,
            max_tokens: self.max_tokens,
            model: &self.model,
        };
        let response = self
            .client
            .post(format!("{}/v1/llm", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Unavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::Unavailable(e.to_string()))?;
        if !status.is_success() {
            return Err(LlmError::Unavailable(format!("status {status}")));
        }

        let payload: CompletionResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::Unavailable(e.to_string()))?;
        let text = payload.text.trim().to_string();
        self.cache.insert(prompt, &text);
        Ok(text)
    }
}
