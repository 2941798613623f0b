use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::generation::ProviderResponse;
use crate::generation_error;

use super::{require_api_key, QuestionProvider};

const PROVIDER_NAME: &str = "OpenAI";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const SYSTEM_PROMPT: &str =
    "You are an education expert who writes high-quality assessment questions. \
Respond with a single JSON object only.";

#[derive(Debug)]
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenAiProvider {
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

    /// Points the adapter at a different completions URL, e.g. a
    /// gateway or a mock server in tests.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait::async_trait]
impl QuestionProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn send(&self, prompt: &str) -> Result<ProviderResponse> {
        let body = OpenAiRequest {
            model: self.model.clone(),
            messages: vec![
                OpenAiMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                OpenAiMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            max_tokens: Some(2000),
            temperature: Some(0.7),
        };

        debug!(model = %self.model, "sending generation request to OpenAI");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
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
        let parsed: OpenAiResponse = match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(err) => generation_error!(PROVIDER_NAME, "response was not valid JSON: {err}"),
        };

        if let Some(error) = parsed.error {
            let message = error
                .message
                .unwrap_or_else(|| "OpenAI API returned an error".to_string());
            generation_error!(PROVIDER_NAME, "OpenAI API error: {message}");
        }

        let raw_output = parsed
            .choices
            .into_iter()
            .find_map(|choice| choice.message.map(|message| message.content))
            .unwrap_or_default();

        if raw_output.trim().is_empty() {
            generation_error!(PROVIDER_NAME, "OpenAI did not return any content");
        }

        Ok(ProviderResponse {
            raw_output,
            model: Some(self.model.clone()),
            tokens_used: parsed
                .usage
                .and_then(|usage| usage.total_tokens.map(|value| value as u32)),
        })
    }
}

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
    #[serde(default)]
    error: Option<OpenAiError>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: Option<OpenAiMessageResponse>,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessageResponse {
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    #[serde(default)]
    total_tokens: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    message: Option<String>,
}
