//! End-to-end generation tests against mock provider endpoints.

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use quizgen::generation::providers::anthropic::AnthropicProvider;
use quizgen::generation::providers::google::GoogleProvider;
use quizgen::generation::providers::openai::OpenAiProvider;
use quizgen::{Error, QuestionGenerator};

const QUESTIONS_JSON: &str = r#"{"questions":[{"pregunta":"What is 2+2?","opciones":["3","4","5","6"],"respuesta_correcta":1,"explicacion":"Basic arithmetic"}]}"#;

#[tokio::test]
async fn google_round_trip_parses_fenced_output() {
    let server = MockServer::start().await;
    let fenced = format!("```json\n{QUESTIONS_JSON}\n```");

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": fenced}]}}],
            "usageMetadata": {"totalTokenCount": 42}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = GoogleProvider::new(Some("test-key".to_string()), None)
        .unwrap()
        .with_endpoint(server.uri());
    let generator = QuestionGenerator::with_provider(Box::new(provider));

    let questions = generator.generate_questions("source text", 5).await.unwrap();
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].correct_index(), 1);
    assert_eq!(questions[0].correct_option(), "4");
}

#[tokio::test]
async fn openai_round_trip_uses_bearer_auth() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": QUESTIONS_JSON}}],
            "usage": {"total_tokens": 55}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(Some("test-key".to_string()), None)
        .unwrap()
        .with_endpoint(format!("{}/v1/chat/completions", server.uri()));
    let generator = QuestionGenerator::with_provider(Box::new(provider));

    let questions = generator.generate_questions("source text", 5).await.unwrap();
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].prompt(), "What is 2+2?");
}

#[tokio::test]
async fn anthropic_round_trip_sends_version_header() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "test-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "text", "text": QUESTIONS_JSON}],
            "usage": {"input_tokens": 10, "output_tokens": 20}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = AnthropicProvider::new(Some("test-key".to_string()), None)
        .unwrap()
        .with_endpoint(format!("{}/v1/messages", server.uri()));
    let generator = QuestionGenerator::with_provider(Box::new(provider));

    let questions = generator.generate_questions("source text", 5).await.unwrap();
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].explanation(), "Basic arithmetic");
}

#[tokio::test]
async fn http_failures_surface_as_generation_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(Some("test-key".to_string()), None)
        .unwrap()
        .with_endpoint(format!("{}/v1/chat/completions", server.uri()));
    let generator = QuestionGenerator::with_provider(Box::new(provider));

    let err = generator.generate_questions("source text", 5).await.unwrap_err();
    assert!(matches!(err, Error::Generation { .. }));
}

#[tokio::test]
async fn embedded_api_errors_surface_with_their_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": {"message": "quota exceeded"}
        })))
        .mount(&server)
        .await;

    let provider = GoogleProvider::new(Some("test-key".to_string()), None)
        .unwrap()
        .with_endpoint(server.uri());
    let generator = QuestionGenerator::with_provider(Box::new(provider));

    let err = generator.generate_questions("source text", 5).await.unwrap_err();
    assert!(matches!(err, Error::Generation { .. }));
    assert!(err.to_string().contains("quota exceeded"));
}

#[tokio::test]
async fn responses_without_content_are_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": []
        })))
        .mount(&server)
        .await;

    let provider = GoogleProvider::new(Some("test-key".to_string()), None)
        .unwrap()
        .with_endpoint(server.uri());
    let generator = QuestionGenerator::with_provider(Box::new(provider));

    let err = generator.generate_questions("source text", 5).await.unwrap_err();
    assert!(matches!(err, Error::Generation { .. }));
}

#[tokio::test]
async fn unparseable_model_output_is_a_malformed_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "sorry, no JSON today"}}]
        })))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(Some("test-key".to_string()), None)
        .unwrap()
        .with_endpoint(format!("{}/v1/chat/completions", server.uri()));
    let generator = QuestionGenerator::with_provider(Box::new(provider));

    let err = generator.generate_questions("source text", 5).await.unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { .. }));
}
