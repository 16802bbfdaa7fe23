use async_openai::Client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessage, ChatCompletionRequestUserMessageContent,
    CreateChatCompletionRequestArgs,
};
use backoff::ExponentialBackoffBuilder;
use std::error::Error;
use std::fmt::Write;
use thiserror::Error;
use tracing::instrument;

use crate::generate::CallConfig;
use crate::llm_config::LlmConfig;

#[derive(Debug, Error)]
pub enum ExplainError {
    #[error("correct index {correct_index} is out of range for {options} options")]
    CorrectIndexOutOfRange { correct_index: usize, options: usize },

    #[error(transparent)]
    Api(#[from] async_openai::error::OpenAIError),

    #[error(transparent)]
    HttpClientBuild(#[from] reqwest::Error),

    #[error("No response from the model")]
    EmptyResponse,
}

/// Tutor-style prompt for one answered question. Pure; the model call
/// lives in [`explain_answer`].
pub fn build_explain_prompt(
    question_text: &str,
    options: &[String],
    correct_index: usize,
    user_answer_index: Option<usize>,
) -> Result<String, ExplainError> {
    let correct_answer = options.get(correct_index).ok_or(ExplainError::CorrectIndexOutOfRange {
        correct_index,
        options: options.len(),
    })?;
    let user_answer = user_answer_index.and_then(|index| options.get(index));

    let mut prompt = format!(
        "You are a helpful tutor explaining quiz answers to students.\n\n\
Question: {question_text}\n\nOptions:\n"
    );
    for (index, option) in options.iter().enumerate() {
        let _ = writeln!(prompt, "{}. {option}", index + 1);
    }
    let _ = write!(prompt, "\nCorrect Answer: {correct_answer}\n");
    if let Some(user_answer) = user_answer {
        let _ = write!(prompt, "Student's Answer: {user_answer}\n");
    }
    let _ = write!(
        prompt,
        "\nProvide a clear, educational explanation of why \"{correct_answer}\" is the correct answer.\n"
    );
    if let Some(user_answer) = user_answer
        && user_answer != correct_answer
    {
        let _ = write!(prompt, "Also briefly explain why \"{user_answer}\" is incorrect.\n");
    }
    let _ = write!(
        prompt,
        "\nKeep your explanation:\n\
- Clear and concise (2-4 sentences)\n\
- Educational and encouraging\n\
- Easy to understand for beginners\n"
    );

    Ok(prompt)
}

/// Free-text explanation of a quiz answer. The reply is passed through as
/// text; there is nothing structured to interpret here.
#[instrument(skip_all)]
pub async fn explain_answer(
    llm_config: &LlmConfig,
    config: CallConfig,
    prompt: String,
) -> Result<String, ExplainError> {
    let request = CreateChatCompletionRequestArgs::default()
        .model(llm_config.get_explain_model())
        .messages(vec![ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(prompt),
                name: None,
            },
        )])
        .max_tokens(512_u32)
        .build()?;

    let http_client = reqwest::Client::builder()
        .timeout(config.iteration_timeout())
        .build()
        .map_err(|error| {
            tracing::error!(error = &error as &dyn Error, "failed to build http client for the model");
            ExplainError::HttpClientBuild(error)
        })?;

    let mut backoff_builder = ExponentialBackoffBuilder::default();
    backoff_builder
        .with_max_interval(config.max_retry_interval())
        .with_initial_interval(config.min_retry_interval())
        .with_max_elapsed_time(Some(config.total_timeout()));

    let client = Client::with_config(llm_config.get_explain_openai_config())
        .with_http_client(http_client)
        .with_backoff(backoff_builder.build());

    tracing::debug!("sending explanation request");
    let chat_completion = client.chat().create(request).await.inspect_err(|error| {
        tracing::warn!(error = error as &dyn Error, "explanation call failed");
    })?;

    chat_completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(ExplainError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<String> {
        vec!["3".to_owned(), "4".to_owned(), "5".to_owned()]
    }

    #[test]
    fn test_prompt_names_the_correct_answer() {
        let prompt = build_explain_prompt("What is 2+2?", &options(), 1, None).unwrap();
        assert!(prompt.contains("Correct Answer: 4"));
        assert!(!prompt.contains("Student's Answer"));
    }

    #[test]
    fn test_prompt_mentions_a_wrong_student_answer() {
        let prompt = build_explain_prompt("What is 2+2?", &options(), 1, Some(0)).unwrap();
        assert!(prompt.contains("Student's Answer: 3"));
        assert!(prompt.contains("why \"3\" is incorrect"));
    }

    #[test]
    fn test_prompt_skips_incorrect_section_for_right_answer() {
        let prompt = build_explain_prompt("What is 2+2?", &options(), 1, Some(1)).unwrap();
        assert!(prompt.contains("Student's Answer: 4"));
        assert!(!prompt.contains("is incorrect"));
    }

    #[test]
    fn test_out_of_range_correct_index() {
        let result = build_explain_prompt("What is 2+2?", &options(), 3, None);
        assert!(matches!(result, Err(ExplainError::CorrectIndexOutOfRange { .. })));
    }
}
