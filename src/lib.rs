//! AI-assisted multiple-choice question generation from PDF documents.
//!
//! A thin orchestration layer: extract text from a document, build one
//! instruction prompt, send it to a configurable LLM backend, and
//! parse the loosely-structured reply into validated [`Question`]
//! values. Each generation is a single one-shot request; retrying is
//! the caller's decision.

pub mod error;
pub mod generation;
pub mod output;

pub use crate::error::{Error, Result};
pub use crate::generation::config::GenerationConfig;
pub use crate::generation::input_processor::{InputProcessor, ProcessedInput};
pub use crate::generation::providers::QuestionProvider;
pub use crate::generation::question_parser::parse_questions;
pub use crate::generation::service::{create_generator, QuestionGenerator};
pub use crate::generation::{
    GenerationRequest, InputPayload, ProviderKind, ProviderResponse, Question,
    DEFAULT_NUM_QUESTIONS,
};
