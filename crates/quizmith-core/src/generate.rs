use async_openai::Client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessage, ChatCompletionRequestUserMessageContent,
    CreateChatCompletionRequestArgs,
};
use backoff::ExponentialBackoffBuilder;
use quizmith_model::quiz::generated::GeneratedQuestionSet;
use std::error::Error;
use std::time::Duration;
use thiserror::Error;
use tracing::instrument;
use typed_builder::TypedBuilder;

use crate::llm_config::LlmConfig;
use crate::generate::interpret::{GenerationFailure, interpret};
use crate::generate::prompt::PromptSpec;

pub mod interpret;
pub mod prompt;

#[derive(TypedBuilder, Debug, Clone)]
pub struct CallConfig {
    total_timeout: Duration,
    iteration_timeout: Duration,
    #[builder(default = Duration::from_millis(100))]
    min_retry_interval: Duration,
    #[builder(default = Duration::from_secs(2))]
    max_retry_interval: Duration,
}

impl CallConfig {
    #[must_use]
    pub fn total_timeout(&self) -> Duration {
        self.total_timeout
    }

    #[must_use]
    pub fn iteration_timeout(&self) -> Duration {
        self.iteration_timeout
    }

    #[must_use]
    pub fn min_retry_interval(&self) -> Duration {
        self.min_retry_interval
    }

    #[must_use]
    pub fn max_retry_interval(&self) -> Duration {
        self.max_retry_interval
    }
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Api(#[from] async_openai::error::OpenAIError),

    #[error(transparent)]
    HttpClientBuild(#[from] reqwest::Error),

    #[error("No response from the model")]
    EmptyResponse,

    #[error(transparent)]
    Interpretation(#[from] GenerationFailure),
}

/// One full generation round: send the prepared prompt, interpret whatever
/// comes back. Transient transport failures are retried with backoff until
/// the total timeout. A reply that fails interpretation is not retried;
/// retrying the nondeterministic call is caller-level policy.
#[instrument(skip(llm_config, spec), fields(question_count = spec.question_count))]
pub async fn generate_questions(
    llm_config: &LlmConfig,
    config: CallConfig,
    spec: &PromptSpec,
) -> Result<GeneratedQuestionSet, GenerateError> {
    let request = CreateChatCompletionRequestArgs::default()
        .model(llm_config.get_quiz_model())
        .messages(vec![ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(spec.text.clone()),
                name: None,
            },
        )])
        .max_tokens(4096_u32)
        .build()?;

    let http_client = reqwest::Client::builder()
        .timeout(config.iteration_timeout)
        .build()
        .map_err(|error| {
            tracing::error!(error = &error as &dyn Error, "failed to build http client for the model");
            GenerateError::HttpClientBuild(error)
        })?;

    let mut backoff_builder = ExponentialBackoffBuilder::default();
    backoff_builder
        .with_max_interval(config.max_retry_interval)
        .with_initial_interval(config.min_retry_interval)
        .with_max_elapsed_time(Some(config.total_timeout));

    let client = Client::with_config(llm_config.get_quiz_openai_config())
        .with_http_client(http_client)
        .with_backoff(backoff_builder.build());

    tracing::debug!("sending generation request");
    let chat_completion = client.chat().create(request).await.inspect_err(|error| {
        tracing::warn!(error = error as &dyn Error, "generation call failed");
    })?;

    let reply = chat_completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(GenerateError::EmptyResponse)?;

    let set = interpret(&reply, spec.question_count, spec.difficulty)?;
    tracing::info!(
        requested = set.metadata.requested_count,
        actual = set.metadata.actual_count,
        "generated question set"
    );
    Ok(set)
}
