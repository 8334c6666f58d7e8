//! HTTP text generator backed by the Hugging Face inference API

use crate::error::GeneratorError;
use crate::generators::TextGenerator;
use crate::types::GenerationParams;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_MODEL: &str = "AIDC-AI/Marco-LLM-ES";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Request body for the inference API
#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: &'a GenerationParams,
}

/// One element of the inference API response list
#[derive(Debug, Deserialize)]
struct GeneratedText {
    #[serde(default)]
    generated_text: String,
}

/// Text generator calling a hosted model over HTTP
pub struct HuggingFaceGenerator {
    endpoint: String,
    model: String,
    api_key: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HuggingFaceGenerator {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            timeout,
            client: reqwest::Client::new(),
        }
    }

    fn model_url(&self) -> String {
        format!("{}/models/{}", self.endpoint, self.model)
    }

    fn map_transport_error(&self, e: reqwest::Error) -> GeneratorError {
        if e.is_timeout() {
            GeneratorError::Timeout(self.timeout)
        } else {
            GeneratorError::Unreachable(e.to_string())
        }
    }

    /// Pull the first generated text out of the response body
    fn parse_body(body: &str) -> Result<String, GeneratorError> {
        let items: Vec<GeneratedText> = serde_json::from_str(body).map_err(|e| {
            GeneratorError::Malformed(format!("{} (body: {})", e, truncate(body, 200)))
        })?;

        let first = items
            .into_iter()
            .next()
            .ok_or_else(|| GeneratorError::Malformed("empty result list".to_string()))?;

        let text = first.generated_text.trim();
        if text.is_empty() {
            return Err(GeneratorError::Empty);
        }
        Ok(text.to_string())
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[async_trait]
impl TextGenerator for HuggingFaceGenerator {
    fn name(&self) -> &'static str {
        "huggingface"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, GeneratorError> {
        let request = InferenceRequest {
            inputs: prompt,
            parameters: params,
        };

        let response = self
            .client
            .post(self.model_url())
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            return Err(GeneratorError::Status {
                status: status.as_u16(),
                body: truncate(&body, 500).to_string(),
            });
        }

        let text = Self::parse_body(&body)?;
        tracing::debug!("Generator '{}' returned {} chars", self.model, text.len());
        Ok(text)
    }
}
