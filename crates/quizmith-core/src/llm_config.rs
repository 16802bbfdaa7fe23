use async_openai::config::OpenAIConfig;
use quizmith_utils::args::llm::LlmService as LlmServiceArgs;

const DEFAULT_MODEL: &str = "gpt-4.1-mini";

#[derive(Debug, Clone)]
pub struct LlmServiceConfig {
    pub key: Option<String>,
    pub api_base: Option<String>,
    pub default_model: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LlmFeatureConfig {
    pub model: Option<String>,
}

/// Which model and endpoint each feature talks to. One shared
/// OpenAI-compatible service, with per-feature model overrides.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    service: LlmServiceConfig,
    pub quiz_config: LlmFeatureConfig,
    pub explain_config: LlmFeatureConfig,
}

impl From<LlmServiceArgs> for LlmConfig {
    fn from(args: LlmServiceArgs) -> LlmConfig {
        Self {
            service: LlmServiceConfig {
                key: args.llm_key,
                api_base: args.llm_api_base,
                default_model: args.llm_default_model,
            },
            quiz_config: LlmFeatureConfig { model: args.quiz_model },
            explain_config: LlmFeatureConfig {
                model: args.explain_model,
            },
        }
    }
}

impl LlmConfig {
    #[must_use]
    pub fn new(service: LlmServiceConfig, quiz: LlmFeatureConfig, explain: LlmFeatureConfig) -> Self {
        Self {
            service,
            quiz_config: quiz,
            explain_config: explain,
        }
    }

    #[must_use]
    pub fn get_default_model(&self) -> &str {
        self.service.default_model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    #[must_use]
    pub fn get_openai_config(&self) -> OpenAIConfig {
        let mut openai_config = OpenAIConfig::default();
        if let Some(api_base) = self.service.api_base.as_deref() {
            openai_config = openai_config.with_api_base(api_base);
        }
        if let Some(api_key) = self.service.key.as_deref() {
            openai_config = openai_config.with_api_key(api_key);
        }
        openai_config
    }

    #[must_use]
    pub fn get_quiz_model(&self) -> &str {
        if let Some(model) = &self.quiz_config.model {
            model.as_str()
        } else {
            tracing::debug!("Using default model for quiz generation");
            self.get_default_model()
        }
    }

    #[must_use]
    pub fn get_quiz_openai_config(&self) -> OpenAIConfig {
        self.get_openai_config()
    }

    #[must_use]
    pub fn get_explain_model(&self) -> &str {
        if let Some(model) = &self.explain_config.model {
            model.as_str()
        } else {
            tracing::debug!("Using default model for answer explanation");
            self.get_default_model()
        }
    }

    #[must_use]
    pub fn get_explain_openai_config(&self) -> OpenAIConfig {
        self.get_openai_config()
    }
}
