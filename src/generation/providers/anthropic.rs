use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::generation::ProviderResponse;
use crate::generation_error;

use super::{require_api_key, QuestionProvider};

const PROVIDER_NAME: &str = "Anthropic";
const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const SYSTEM_PROMPT: &str =
    "You are an education expert who writes high-quality assessment questions. \
Respond with a single JSON object only.";

#[derive(Debug)]
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl AnthropicProvider {
    pub fn new(api_key: Option<String>, model: Option<String>) -> Result<Self> {
        let api_key = require_api_key(PROVIDER_NAME, api_key)?;
        let model = model.unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Self {
            client: Client::new(),
            api_key,
            model,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        })
    }

    /// Points the adapter at a different messages URL, e.g. a gateway
    /// or a mock server in tests.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait::async_trait]
impl QuestionProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn send(&self, prompt: &str) -> Result<ProviderResponse> {
        let body = AnthropicRequest {
            model: self.model.clone(),
            max_tokens: 2000,
            system: SYSTEM_PROMPT.to_string(),
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        debug!(model = %self.model, "sending generation request to Anthropic");

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|err| Error::generation(PROVIDER_NAME, err))?
            .error_for_status()
            .map_err(|err| Error::generation(PROVIDER_NAME, err))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|err| Error::generation(PROVIDER_NAME, err))?;
        let parsed: AnthropicResponse = match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(err) => generation_error!(PROVIDER_NAME, "response was not valid JSON: {err}"),
        };

        if let Some(error) = parsed.error {
            let message = error
                .message
                .unwrap_or_else(|| "Anthropic API returned an error".to_string());
            generation_error!(PROVIDER_NAME, "Anthropic API error: {message}");
        }

        let raw_output = parsed
            .content
            .into_iter()
            .find_map(|block| block.text)
            .unwrap_or_default();

        if raw_output.trim().is_empty() {
            generation_error!(PROVIDER_NAME, "Anthropic did not return any content");
        }

        let tokens_used = parsed.usage.map(|usage| {
            usage.input_tokens.unwrap_or_default() + usage.output_tokens.unwrap_or_default()
        });

        Ok(ProviderResponse {
            raw_output,
            model: Some(self.model.clone()),
            tokens_used,
        })
    }
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<AnthropicMessage>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicContentBlock>,
    #[serde(default)]
    usage: Option<AnthropicUsage>,
    #[serde(default)]
    error: Option<AnthropicError>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContentBlock {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    #[serde(default)]
    input_tokens: Option<u32>,
    #[serde(default)]
    output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    message: Option<String>,
}
