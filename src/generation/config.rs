//! Runtime configuration, resolved once at the composition root.

use serde::Deserialize;

use crate::generation::{ProviderKind, DEFAULT_NUM_QUESTIONS};

/// API key for one provider.
#[derive(Debug, Clone)]
pub struct ProviderApiKey {
    pub provider: ProviderKind,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct GenerationConfig {
    pub selected_provider: Option<ProviderKind>,
    pub api_keys: Vec<ProviderApiKey>,
    pub preferred_model: Option<String>,
    pub default_num_questions: Option<u32>,
}

impl GenerationConfig {
    /// Reads the vendor key variables (GOOGLE_API_KEY, OPENAI_API_KEY,
    /// ANTHROPIC_API_KEY) and the QUIZGEN_* defaults from the process
    /// environment. Nothing else in the crate consults the
    /// environment; explicit values always win over this lookup.
    pub fn from_env() -> Self {
        let env: EnvConfig = envy::from_env().unwrap_or_default();

        let api_keys = vec![
            ProviderApiKey {
                provider: ProviderKind::Google,
                api_key: non_blank(env.google_api_key),
            },
            ProviderApiKey {
                provider: ProviderKind::OpenAi,
                api_key: non_blank(env.openai_api_key),
            },
            ProviderApiKey {
                provider: ProviderKind::Anthropic,
                api_key: non_blank(env.anthropic_api_key),
            },
        ];

        GenerationConfig {
            selected_provider: non_blank(env.quizgen_provider)
                .as_deref()
                .map(ProviderKind::from_name),
            api_keys,
            preferred_model: non_blank(env.quizgen_model),
            default_num_questions: env.quizgen_questions,
        }
    }

    pub fn api_key_for(&self, provider: &ProviderKind) -> Option<&str> {
        self.api_keys
            .iter()
            .find(|key| &key.provider == provider)
            .and_then(|entry| entry.api_key.as_deref())
    }

    pub fn provider_selected(&self) -> ProviderKind {
        self.selected_provider
            .clone()
            .unwrap_or(ProviderKind::Google)
    }

    pub fn num_questions(&self) -> u32 {
        self.default_num_questions
            .filter(|count| *count > 0)
            .unwrap_or(DEFAULT_NUM_QUESTIONS)
    }
}

#[derive(Debug, Default, Deserialize)]
struct EnvConfig {
    google_api_key: Option<String>,
    openai_api_key: Option<String>,
    anthropic_api_key: Option<String>,
    quizgen_provider: Option<String>,
    quizgen_model: Option<String>,
    quizgen_questions: Option<u32>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_google_key() -> GenerationConfig {
        GenerationConfig {
            api_keys: vec![
                ProviderApiKey {
                    provider: ProviderKind::Google,
                    api_key: Some("g-key".to_string()),
                },
                ProviderApiKey {
                    provider: ProviderKind::OpenAi,
                    api_key: None,
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn api_key_lookup_matches_the_provider() {
        let config = config_with_google_key();
        assert_eq!(config.api_key_for(&ProviderKind::Google), Some("g-key"));
        assert_eq!(config.api_key_for(&ProviderKind::OpenAi), None);
        assert_eq!(config.api_key_for(&ProviderKind::Anthropic), None);
    }

    #[test]
    fn google_is_the_default_provider() {
        assert_eq!(
            GenerationConfig::default().provider_selected(),
            ProviderKind::Google
        );
    }

    #[test]
    fn question_count_falls_back_to_the_default() {
        assert_eq!(
            GenerationConfig::default().num_questions(),
            DEFAULT_NUM_QUESTIONS
        );
        let zero = GenerationConfig {
            default_num_questions: Some(0),
            ..Default::default()
        };
        assert_eq!(zero.num_questions(), DEFAULT_NUM_QUESTIONS);
        let three = GenerationConfig {
            default_num_questions: Some(3),
            ..Default::default()
        };
        assert_eq!(three.num_questions(), 3);
    }
}
