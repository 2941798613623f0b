use async_trait::async_trait;

use crate::config_error;
use crate::error::Result;
use crate::generation::{GenerationRequest, ProviderKind, ProviderResponse};

pub mod anthropic;
pub mod google;
pub mod openai;

/// One backend capable of answering a single prompt.
#[async_trait]
pub trait QuestionProvider: Send + Sync + std::fmt::Debug {
    /// Provider name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Sends one prompt and returns the raw response text plus
    /// whatever metadata the vendor reports. Exactly one request per
    /// call; no retry, no streaming.
    async fn send(&self, prompt: &str) -> Result<ProviderResponse>;
}

pub fn provider_factory(
    provider: &ProviderKind,
    api_key: Option<String>,
    model: Option<String>,
) -> Result<Box<dyn QuestionProvider>> {
    match provider {
        ProviderKind::Google => Ok(Box::new(google::GoogleProvider::new(api_key, model)?)),
        ProviderKind::OpenAi => Ok(Box::new(openai::OpenAiProvider::new(api_key, model)?)),
        ProviderKind::Anthropic => {
            Ok(Box::new(anthropic::AnthropicProvider::new(api_key, model)?))
        }
        ProviderKind::Custom(name) => config_error!(
            "unsupported provider: {name}. Please choose google, openai, or anthropic"
        ),
    }
}

pub(crate) fn require_api_key(provider_name: &str, api_key: Option<String>) -> Result<String> {
    match api_key
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
    {
        Some(value) => Ok(value),
        None => config_error!("{provider_name} API key is required"),
    }
}

/// Upper bound on how much document text is embedded in a prompt,
/// keeping requests bounded regardless of document size.
pub(crate) const MAX_PROMPT_SOURCE_CHARS: usize = 3000;

/// Builds the instruction string sent to every provider. Pure; equal
/// requests always produce equal prompts.
pub(crate) fn build_question_prompt(request: &GenerationRequest) -> String {
    let source = truncate_chars(&request.source_text, MAX_PROMPT_SOURCE_CHARS);

    let focus_line = request
        .topic_hint
        .as_deref()
        .map(|topic| topic.trim())
        .filter(|topic| !topic.is_empty())
        .map(|topic| format!("Focus the questions on: {topic}.\n\n"))
        .unwrap_or_default();

    format!(
        "Based on the text below, generate exactly {count} multiple-choice questions \
with 4 answer options each.\n\
\n\
TEXT:\n\
{source}\n\
\n\
{focus_line}Return the questions as a single JSON object with this structure:\n\
{{\n\
    \"questions\": [\n\
        {{\n\
            \"pregunta\": \"question text\",\n\
            \"opciones\": [\"option A\", \"option B\", \"option C\", \"option D\"],\n\
            \"respuesta_correcta\": 0,\n\
            \"explicacion\": \"why that option is correct\"\n\
        }}\n\
    ]\n\
}}\n\
\n\
Make sure that:\n\
1. The questions are clear and specific to the text\n\
2. The options are plausible but only one is correct\n\
3. The correct answer is identified by its 0-based index (0-3)\n\
4. The explanations are short and educational\n\
\n\
Respond ONLY with the JSON object, with no extra commentary.",
        count = request.num_questions,
    )
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
