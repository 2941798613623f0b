//! Provider-agnostic generation of multiple-choice questions from
//! document text.

use std::path::PathBuf;

use crate::error::Result;
use crate::malformed_response;

pub mod config;
pub mod input_processor;
pub mod providers;
pub mod question_parser;
pub mod service;

/// Number of questions requested when the caller does not say.
pub const DEFAULT_NUM_QUESTIONS: u32 = 5;

/// Providers that can be used for question generation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Google,
    OpenAi,
    Anthropic,
    /// Catch-all for names not known at compile time; rejected by the
    /// provider factory with the list of accepted names.
    Custom(String),
}

impl ProviderKind {
    pub fn as_str(&self) -> &str {
        match self {
            ProviderKind::Google => "google",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Custom(value) => value.as_str(),
        }
    }

    /// Case-insensitive lookup. Unknown names are preserved verbatim so
    /// the factory can name them in its error.
    pub fn from_name(value: &str) -> ProviderKind {
        match value.trim().to_ascii_lowercase().as_str() {
            "google" => ProviderKind::Google,
            "openai" => ProviderKind::OpenAi,
            "anthropic" => ProviderKind::Anthropic,
            _ => ProviderKind::Custom(value.trim().to_string()),
        }
    }
}

/// Input data supplied by the user.
#[derive(Debug, Clone)]
pub enum InputPayload {
    Text(String),
    File(PathBuf),
}

/// Complete request passed to the generation layer.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Already-extracted document text. The prompt builder applies its
    /// own character cap, so oversized input is safe here.
    pub source_text: String,
    pub num_questions: u32,
    /// Optional focus appended to the prompt.
    pub topic_hint: Option<String>,
}

impl GenerationRequest {
    pub fn new(source_text: impl Into<String>) -> Self {
        Self {
            source_text: source_text.into(),
            num_questions: DEFAULT_NUM_QUESTIONS,
            topic_hint: None,
        }
    }

    pub fn with_num_questions(mut self, num_questions: u32) -> Self {
        self.num_questions = num_questions;
        self
    }

    pub fn with_topic_hint(mut self, topic_hint: impl Into<String>) -> Self {
        self.topic_hint = Some(topic_hint.into());
        self
    }
}

/// Raw response returned by a provider before parsing into questions.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub raw_output: String,
    pub model: Option<String>,
    pub tokens_used: Option<u32>,
}

/// A validated multiple-choice question. Immutable once constructed;
/// produced only by the response parser (or tests).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    options: Vec<String>,
    correct_index: usize,
    explanation: String,
}

impl Question {
    /// The number of options every question is expected to carry.
    pub const EXPECTED_OPTIONS: usize = 4;

    /// Builds a question, enforcing the structural invariants: a
    /// non-empty stem, at least two options, and an in-bounds correct
    /// index.
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
        explanation: impl Into<String>,
    ) -> Result<Self> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            malformed_response!("question stem was empty");
        }
        if options.len() < 2 {
            malformed_response!("expected at least 2 options, got {}", options.len());
        }
        if correct_index >= options.len() {
            malformed_response!(
                "correct index {} is out of bounds for {} options",
                correct_index,
                options.len()
            );
        }

        Ok(Self {
            prompt,
            options,
            correct_index,
            explanation: explanation.into(),
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }
}
