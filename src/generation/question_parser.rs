use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::Result;
use crate::generation::Question;
use crate::malformed_response;

/// Parses the raw output from a model into validated questions.
///
/// Providers are instructed to return a single JSON object, but output
/// is handled defensively: code-fenced JSON (tagged `json` or not) and
/// responses with surrounding prose are accepted. Individual malformed
/// items are skipped with a warning so valid siblings survive; an
/// undecodable response fails the whole attempt.
pub fn parse_questions(raw: &str) -> Result<Vec<Question>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        malformed_response!("model response was empty");
    }

    let value = decode_json(trimmed)?;

    let Some(items) = value.get("questions").and_then(Value::as_array) else {
        malformed_response!("response did not contain a `questions` array");
    };

    let mut questions = Vec::new();
    for (index, item) in items.iter().enumerate() {
        match validate_item(item) {
            Ok(question) => questions.push(question),
            Err(err) => warn!("discarding question {}: {err}", index + 1),
        }
    }

    Ok(questions)
}

/// The raw text is tried as-is first; the first fenced block is only
/// consulted when that fails. Stray backtick sequences inside a valid
/// unfenced response can therefore never truncate it.
fn decode_json(text: &str) -> Result<Value> {
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(unfenced_err) => match extract_code_block(text) {
            Some(block) => match serde_json::from_str(&block) {
                Ok(value) => Ok(value),
                Err(err) => malformed_response!(err, "fenced block was not valid JSON"),
            },
            None => malformed_response!(unfenced_err, "response was not valid JSON"),
        },
    }
}

/// Wire shape requested from every backend.
#[derive(Debug, Deserialize)]
struct RawQuestion {
    pregunta: String,
    opciones: Vec<String>,
    respuesta_correcta: i64,
    #[serde(default)]
    explicacion: String,
}

fn validate_item(item: &Value) -> Result<Question> {
    let raw: RawQuestion = match serde_json::from_value(item.clone()) {
        Ok(raw) => raw,
        Err(err) => malformed_response!(err, "item did not match the expected shape"),
    };

    if raw.opciones.len() != Question::EXPECTED_OPTIONS {
        warn!(
            "question offered {} options instead of {}",
            raw.opciones.len(),
            Question::EXPECTED_OPTIONS
        );
    }

    let correct_index = usize::try_from(raw.respuesta_correcta)
        .ok()
        .filter(|index| *index < raw.opciones.len());
    let Some(correct_index) = correct_index else {
        malformed_response!(
            "correct index {} is out of bounds for {} options",
            raw.respuesta_correcta,
            raw.opciones.len()
        );
    };

    Question::new(raw.pregunta, raw.opciones, correct_index, raw.explicacion)
}

/// Explicit fenced-block scanner: the interior between the first fence
/// (after its tag line, if any) and the next closing fence.
fn extract_code_block(text: &str) -> Option<String> {
    const FENCE: &str = "```";
    let start = text.find(FENCE)? + FENCE.len();
    let body_start = start + text[start..].find('\n')? + 1;
    let body_len = text[body_start..].find(FENCE)?;
    Some(text[body_start..body_start + body_len].trim().to_string())
}
