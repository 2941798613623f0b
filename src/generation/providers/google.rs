use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::generation::ProviderResponse;
use crate::generation_error;

use super::{require_api_key, QuestionProvider};

const PROVIDER_NAME: &str = "Google";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug)]
pub struct GoogleProvider {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GoogleProvider {
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

    /// Points the adapter at a different API root, e.g. a gateway or a
    /// mock server in tests.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait::async_trait]
impl QuestionProvider for GoogleProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn send(&self, prompt: &str) -> Result<ProviderResponse> {
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: Some(GeminiGenerationConfig {
                response_mime_type: "application/json".to_string(),
            }),
        };

        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);

        debug!(model = %self.model, "sending generation request to Gemini");

        let response = self
            .client
            .post(url)
            .query(&[("key", &self.api_key)])
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
        let gemini: GeminiResponse = match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(err) => generation_error!(PROVIDER_NAME, "response was not valid JSON: {err}"),
        };

        if let Some(error) = gemini.error {
            let message = error
                .message
                .unwrap_or_else(|| "Gemini API returned an unspecified error".to_string());
            generation_error!(PROVIDER_NAME, "Gemini API error: {message}");
        }

        let raw_output = gemini
            .candidates
            .into_iter()
            .find_map(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
            .unwrap_or_default();

        if raw_output.trim().is_empty() {
            generation_error!(PROVIDER_NAME, "Gemini did not return any content");
        }

        Ok(ProviderResponse {
            raw_output,
            model: Some(self.model.clone()),
            tokens_used: gemini
                .usage_metadata
                .and_then(|usage| usage.total_token_count),
        })
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default, rename = "usageMetadata")]
    usage_metadata: Option<GeminiUsage>,
    #[serde(default)]
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContentResponse>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
struct GeminiPartResponse {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiUsage {
    #[serde(rename = "totalTokenCount")]
    total_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: Option<String>,
}
