//! HTTP text-generation clients

use super::TextGenerator;
use crate::config::{AdvisoryConfig, Provider};
use crate::error::{AdvisorError, AdvisoryError, Result};
use serde::Deserialize;
use std::time::Duration;

/// Generator used when advisories are switched off
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGenerator;

impl TextGenerator for DisabledGenerator {
    fn generate(&self, _prompt: &str) -> std::result::Result<String, AdvisoryError> {
        Err(AdvisoryError::Disabled)
    }

    fn name(&self) -> &str {
        "disabled"
    }
}

/// Build the client selected by `config`
pub fn client_from_config(config: &AdvisoryConfig) -> Result<Box<dyn TextGenerator>> {
    if !config.enabled {
        return Ok(Box::new(DisabledGenerator));
    }

    Ok(match config.provider {
        Provider::Gemini => Box::new(GeminiClient::new(config.clone())?),
        Provider::Ollama => Box::new(OllamaClient::new(config.clone())?),
    })
}

fn http_client(config: &AdvisoryConfig) -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| AdvisorError::Config(format!("Failed to create HTTP client: {}", e)))
}

fn send_error(err: reqwest::Error, timeout_secs: u64) -> AdvisoryError {
    if err.is_timeout() {
        AdvisoryError::Timeout(timeout_secs)
    } else {
        AdvisoryError::Http(format!("Request failed: {}", err))
    }
}

/// Google Gemini `generateContent` client
pub struct GeminiClient {
    config: AdvisoryConfig,
    client: reqwest::blocking::Client,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(config: AdvisoryConfig) -> Result<Self> {
        let client = http_client(&config)?;
        Ok(Self { config, client })
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> std::result::Result<String, AdvisoryError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| AdvisoryError::MissingApiKey(Provider::Gemini.as_str().to_string()))?;

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .map_err(|e| send_error(e, self.config.timeout_secs))?;

        if !response.status().is_success() {
            return Err(AdvisoryError::Http(format!(
                "HTTP {} from Gemini",
                response.status()
            )));
        }

        let reply: GeminiResponse = response
            .json()
            .map_err(|e| AdvisoryError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let text: String = reply
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AdvisoryError::EmptyResponse);
        }
        Ok(text)
    }

    fn name(&self) -> &str {
        Provider::Gemini.as_str()
    }
}

/// Ollama `/api/generate` client
pub struct OllamaClient {
    config: AdvisoryConfig,
    client: reqwest::blocking::Client,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: Option<String>,
}

impl OllamaClient {
    pub fn new(config: AdvisoryConfig) -> Result<Self> {
        let client = http_client(&config)?;
        Ok(Self { config, client })
    }
}

impl TextGenerator for OllamaClient {
    fn generate(&self, prompt: &str) -> std::result::Result<String, AdvisoryError> {
        let url = format!("{}/api/generate", self.config.endpoint.trim_end_matches('/'));

        let body = serde_json::json!({
            "model": self.config.model,
            "prompt": prompt,
            "stream": false,
        });

        let mut request = self.client.post(&url).json(&body);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .map_err(|e| send_error(e, self.config.timeout_secs))?;

        if !response.status().is_success() {
            return Err(AdvisoryError::Http(format!(
                "HTTP {} from Ollama",
                response.status()
            )));
        }

        let reply: OllamaResponse = response
            .json()
            .map_err(|e| AdvisoryError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        reply
            .response
            .filter(|text| !text.trim().is_empty())
            .ok_or(AdvisoryError::EmptyResponse)
    }

    fn name(&self) -> &str {
        Provider::Ollama.as_str()
    }
}
