use tracing::{debug, info};

use crate::config_error;
use crate::error::Result;
use crate::generation::config::GenerationConfig;
use crate::generation::providers::{build_question_prompt, provider_factory, QuestionProvider};
use crate::generation::question_parser;
use crate::generation::{GenerationRequest, ProviderKind, Question};

/// Provider-agnostic entry point for question generation.
#[derive(Debug)]
pub struct QuestionGenerator {
    provider: Box<dyn QuestionProvider>,
}

/// Builds a generator for the named provider, resolving a missing API
/// key from the environment. Configuration problems surface here
/// rather than at first use; no network traffic happens yet.
pub fn create_generator(
    provider_name: &str,
    api_key: Option<String>,
) -> Result<QuestionGenerator> {
    let kind = ProviderKind::from_name(provider_name);
    let api_key = api_key.or_else(|| {
        GenerationConfig::from_env()
            .api_key_for(&kind)
            .map(ToOwned::to_owned)
    });
    QuestionGenerator::new(&kind, api_key, None)
}

impl QuestionGenerator {
    pub fn new(
        kind: &ProviderKind,
        api_key: Option<String>,
        model: Option<String>,
    ) -> Result<Self> {
        Ok(Self {
            provider: provider_factory(kind, api_key, model)?,
        })
    }

    /// Wraps an already-built provider. The seam used by tests and by
    /// callers bringing their own backend.
    pub fn with_provider(provider: Box<dyn QuestionProvider>) -> Self {
        Self { provider }
    }

    pub async fn generate_questions(
        &self,
        text: &str,
        num_questions: u32,
    ) -> Result<Vec<Question>> {
        self.generate(&GenerationRequest::new(text).with_num_questions(num_questions))
            .await
    }

    /// One prompt, one request, one parse. The result is truncated to
    /// the requested count; a shortfall is reported but left to the
    /// caller to judge. The backing model is not deterministic, so
    /// repeated calls may yield different questions.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<Vec<Question>> {
        if request.num_questions == 0 {
            config_error!("at least one question must be requested");
        }

        let prompt = build_question_prompt(request);
        let response = self.provider.send(&prompt).await?;

        debug!(
            provider = self.provider.name(),
            model = response.model.as_deref().unwrap_or("unknown"),
            tokens = response.tokens_used,
            "received model response"
        );

        let mut questions = question_parser::parse_questions(&response.raw_output)?;
        if questions.len() > request.num_questions as usize {
            questions.truncate(request.num_questions as usize);
        }

        if questions.len() < request.num_questions as usize {
            info!(
                "backend produced {} of {} requested questions",
                questions.len(),
                request.num_questions
            );
        }

        Ok(questions)
    }
}
