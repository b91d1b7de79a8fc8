// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `StreamingProvider`: one trait, three concrete backends (Anthropic,
//! OpenAI-compatible, Ollama). The AI streaming pipeline (engine crate)
//! depends only on the trait; provider selection is a configuration
//! concern, not a pipeline one (§4.5).

use std::pin::Pin;

use async_trait::async_trait;
use thiserror::Error;
use tokio_stream::Stream;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("provider returned an error body: {0}")]
    ErrorBody(String),
    #[error("unexpected response framing: {0}")]
    Framing(String),
}

pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String, ProviderError>> + Send>>;

#[async_trait]
pub trait StreamingProvider: Send + Sync {
    async fn stream(&self, system_prompt: &str, user_prompt: &str) -> Result<TokenStream, ProviderError>;
}

/// Splits a raw SSE body into `data:` payload lines, skipping keep-alive
/// comments and the terminal `[DONE]` marker shared by the Anthropic and
/// OpenAI-compatible wire formats.
fn sse_data_lines(body: &str) -> impl Iterator<Item = &str> {
    body.lines().filter_map(|line| {
        let data = line.strip_prefix("data:")?.trim();
        if data.is_empty() || data == "[DONE]" {
            None
        } else {
            Some(data)
        }
    })
}

pub struct AnthropicProvider {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl AnthropicProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl StreamingProvider for AnthropicProvider {
    async fn stream(&self, system_prompt: &str, user_prompt: &str) -> Result<TokenStream, ProviderError> {
        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&serde_json::json!({
                "model": self.model,
                "system": system_prompt,
                "messages": [{"role": "user", "content": user_prompt}],
                "stream": true,
                "max_tokens": 4096,
            }))
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        let chunks: Vec<Result<String, ProviderError>> = sse_data_lines(&body)
            .filter_map(|data| {
                let value: serde_json::Value = serde_json::from_str(data).ok()?;
                value
                    .get("delta")
                    .and_then(|d| d.get("text"))
                    .and_then(|t| t.as_str())
                    .map(|t| Ok(t.to_string()))
            })
            .collect();
        Ok(Box::pin(tokio_stream::iter(chunks)))
    }
}

pub struct OpenAiCompatibleProvider {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiCompatibleProvider {
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            api_key,
            base_url,
            model,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl StreamingProvider for OpenAiCompatibleProvider {
    async fn stream(&self, system_prompt: &str, user_prompt: &str) -> Result<TokenStream, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "model": self.model,
                "messages": [
                    {"role": "system", "content": system_prompt},
                    {"role": "user", "content": user_prompt},
                ],
                "stream": true,
            }))
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        let chunks: Vec<Result<String, ProviderError>> = sse_data_lines(&body)
            .filter_map(|data| {
                let value: serde_json::Value = serde_json::from_str(data).ok()?;
                value
                    .get("choices")?
                    .get(0)?
                    .get("delta")?
                    .get("content")?
                    .as_str()
                    .map(|t| Ok(t.to_string()))
            })
            .collect();
        Ok(Box::pin(tokio_stream::iter(chunks)))
    }
}

pub struct OllamaProvider {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            base_url,
            model,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl StreamingProvider for OllamaProvider {
    async fn stream(&self, system_prompt: &str, user_prompt: &str) -> Result<TokenStream, ProviderError> {
        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .json(&serde_json::json!({
                "model": self.model,
                "messages": [
                    {"role": "system", "content": system_prompt},
                    {"role": "user", "content": user_prompt},
                ],
                "stream": true,
            }))
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        // Ollama frames one JSON object per line, not SSE `data:` lines.
        let chunks: Vec<Result<String, ProviderError>> = body
            .lines()
            .filter_map(|line| {
                let value: serde_json::Value = serde_json::from_str(line).ok()?;
                value
                    .get("message")?
                    .get("content")?
                    .as_str()
                    .map(|t| Ok(t.to_string()))
            })
            .collect();
        Ok(Box::pin(tokio_stream::iter(chunks)))
    }
}
