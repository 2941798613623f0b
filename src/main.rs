use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::{info, warn};

use quizgen::output;
use quizgen::{
    GenerationConfig, GenerationRequest, InputPayload, InputProcessor, ProviderKind,
    QuestionGenerator,
};

/// Documents shorter than this are rejected as not worth quizzing on.
const MIN_DOCUMENT_CHARS: usize = 50;
/// Extracted text beyond this is cut before generation.
const MAX_DOCUMENT_CHARS: usize = 4000;

#[derive(Parser, Debug)]
#[command(
    name = "quizgen",
    version,
    about = "Generate multiple-choice questions from a PDF with an LLM"
)]
struct Args {
    /// PDF or plain-text document to draw questions from
    input: PathBuf,

    /// How many questions to request
    #[arg(short = 'n', long)]
    num_questions: Option<u32>,

    /// Backend to use: google, openai or anthropic
    #[arg(short, long)]
    provider: Option<String>,

    /// Optional topic to focus the questions on
    #[arg(short, long)]
    topic: Option<String>,

    /// Model identifier override for the chosen backend
    #[arg(long)]
    model: Option<String>,

    /// Read at most this many PDF pages
    #[arg(long)]
    max_pages: Option<usize>,

    /// Directory question logs are written to
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Skip writing the question log
    #[arg(long)]
    no_log: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quizgen=info".into()),
        )
        .init();

    let args = Args::parse();
    let config = GenerationConfig::from_env();

    let kind = match &args.provider {
        Some(name) => ProviderKind::from_name(name),
        None => config.provider_selected(),
    };

    info!("reading {}", args.input.display());
    let payload = InputPayload::File(args.input.clone());
    let processed = InputProcessor::prepare(&payload, args.max_pages).await?;

    if processed.text.chars().count() < MIN_DOCUMENT_CHARS {
        bail!("document contains too little text to generate questions from");
    }

    let mut source_text = processed.text;
    if let Some((cut, _)) = source_text.char_indices().nth(MAX_DOCUMENT_CHARS) {
        source_text.truncate(cut);
        source_text.push_str("\n[truncated]");
    }

    let api_key = config.api_key_for(&kind).map(ToOwned::to_owned);
    let model = args.model.clone().or_else(|| config.preferred_model.clone());
    let generator = QuestionGenerator::new(&kind, api_key, model)?;

    let mut request = GenerationRequest::new(source_text)
        .with_num_questions(args.num_questions.unwrap_or_else(|| config.num_questions()));
    if let Some(topic) = &args.topic {
        request = request.with_topic_hint(topic);
    }

    info!(
        provider = kind.as_str(),
        "requesting {} questions", request.num_questions
    );
    let questions = generator.generate(&request).await?;

    if questions.is_empty() {
        bail!("the backend did not produce any usable questions");
    }

    print!("{}", output::format_questions(&questions));

    if !args.no_log {
        let label = args.input.display().to_string();
        match output::write_question_log(&args.log_dir, &label, &questions) {
            Ok(path) => info!("question log written to {}", path.display()),
            Err(err) => warn!("could not write question log: {err}"),
        }
    }

    Ok(())
}
