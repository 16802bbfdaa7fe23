use chrono::Utc;
use quizmith_model::quiz::generated::{Difficulty, GeneratedQuestionSet, GenerationMetadata};
use serde_json::Value;
use thiserror::Error;

use crate::validate::{QuestionPayload, normalize_question, question_failures};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerationFailure {
    /// The cleaned reply is kept for diagnostics; it must only be surfaced
    /// in a development environment, never to end users.
    #[error("model reply is not valid JSON")]
    MalformedOutput { raw: String },

    #[error("model reply is missing the questions array")]
    MissingQuestionsField,

    #[error("generated question {index} is invalid: {reason}")]
    InvalidQuestion { index: usize, reason: String },
}

/// Turns the model's free-text reply into a validated question set.
///
/// Unlike the validation gate this fails fast at the first bad question:
/// the caller is not editing the payload, it is deciding whether to trust
/// an untrusted generator, and a pinpoint index is all it needs.
pub fn interpret(
    raw_text: &str,
    requested_count: usize,
    difficulty: Difficulty,
) -> Result<GeneratedQuestionSet, GenerationFailure> {
    let cleaned = strip_fence(raw_text);

    let parsed: Value = serde_json::from_str(cleaned).map_err(|error| {
        tracing::debug!(error = &error as &dyn std::error::Error, "model reply failed to parse");
        GenerationFailure::MalformedOutput {
            raw: cleaned.to_owned(),
        }
    })?;

    let Some(raw_questions) = parsed.get("questions").and_then(Value::as_array) else {
        return Err(GenerationFailure::MissingQuestionsField);
    };

    let mut questions = Vec::with_capacity(raw_questions.len());
    for (index, raw_question) in raw_questions.iter().enumerate() {
        let payload = coerce_question(raw_question).ok_or_else(|| GenerationFailure::InvalidQuestion {
            index,
            reason: "does not match the question shape".to_owned(),
        })?;

        if let Some(failure) = question_failures(&payload, index).into_iter().next() {
            return Err(GenerationFailure::InvalidQuestion {
                index,
                reason: failure.message,
            });
        }

        questions.push(normalize_question(payload));
    }

    // The generator is not forced to honor the count; a short reply is not
    // a failure.
    let actual_count = questions.len();
    Ok(GeneratedQuestionSet {
        questions,
        metadata: GenerationMetadata {
            generated_at: Utc::now(),
            requested_count,
            actual_count,
            difficulty,
        },
    })
}

/// Strips exactly one leading/trailing fence pair, optionally tagged with a
/// format name. Some generators wrap structured output in presentational
/// fencing despite being told not to; anything left after one strip is
/// treated as payload and will fail the JSON parse.
fn strip_fence(raw: &str) -> &str {
    let text = raw.trim();
    let Some(inner) = text.strip_prefix("```").and_then(|rest| rest.strip_suffix("```")) else {
        return text;
    };
    let inner = match inner.split_once('\n') {
        Some((tag, body)) if tag.trim().chars().all(|c| c.is_ascii_alphanumeric()) => body,
        _ => inner,
    };
    inner.trim()
}

/// Best-effort reshaping of one raw question record. A non-string
/// `explanation` is coerced to its string representation; it is advisory
/// text, the one place where looseness beats strictness. Everything else
/// must already have the right type.
fn coerce_question(raw: &Value) -> Option<QuestionPayload> {
    let mut raw = raw.clone();
    if let Some(explanation) = raw.get_mut("explanation")
        && !explanation.is_string()
        && !explanation.is_null()
    {
        *explanation = Value::String(explanation.to_string());
    }
    serde_json::from_value(raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_REPLY: &str =
        r#"{"questions":[{"text":"Q1 about it?","options":["a","b","c","d"],"correctIndex":0}]}"#;

    #[test]
    fn test_plain_json_reply() {
        let set = interpret(VALID_REPLY, 1, Difficulty::Medium).unwrap();
        assert_eq!(set.questions.len(), 1);
        assert_eq!(set.metadata.actual_count, 1);
        assert_eq!(set.metadata.requested_count, 1);
    }

    #[test]
    fn test_fenced_reply_is_unwrapped() {
        let fenced = format!("```json\n{VALID_REPLY}\n```");
        let set = interpret(&fenced, 1, Difficulty::Easy).unwrap();
        assert_eq!(set.metadata.actual_count, 1);
    }

    #[test]
    fn test_fence_without_tag() {
        let fenced = format!("```\n{VALID_REPLY}\n```");
        assert!(interpret(&fenced, 1, Difficulty::Easy).is_ok());
    }

    #[test]
    fn test_strip_fence_is_noop_without_fencing() {
        assert_eq!(strip_fence("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn test_double_fencing_is_not_unwrapped_twice() {
        let double = format!("```json\n```json\n{VALID_REPLY}\n```\n```");
        let result = interpret(&double, 1, Difficulty::Easy);
        assert!(matches!(result, Err(GenerationFailure::MalformedOutput { .. })));
    }

    #[test]
    fn test_not_json_at_all() {
        let result = interpret("not json at all", 5, Difficulty::Medium);
        let Err(GenerationFailure::MalformedOutput { raw }) = result else {
            panic!("expected MalformedOutput");
        };
        assert_eq!(raw, "not json at all");
    }

    #[test]
    fn test_missing_questions_field() {
        assert_eq!(
            interpret(r#"{"items":[]}"#, 5, Difficulty::Medium),
            Err(GenerationFailure::MissingQuestionsField)
        );
        assert_eq!(
            interpret(r#"{"questions":"nope"}"#, 5, Difficulty::Medium),
            Err(GenerationFailure::MissingQuestionsField)
        );
    }

    #[test]
    fn test_short_circuits_at_first_invalid_question() {
        let reply = r#"{"questions":[
            {"text":"Fine question?","options":["a","b","c","d"],"correctIndex":3},
            {"text":"Broken question?","options":["a","b","c","d"],"correctIndex":5},
            {"text":"Also broken","options":[],"correctIndex":0}
        ]}"#;
        let result = interpret(reply, 3, Difficulty::Hard);
        assert!(matches!(result, Err(GenerationFailure::InvalidQuestion { index: 1, .. })));
    }

    #[test]
    fn test_wrong_shape_question() {
        let reply = r#"{"questions":[{"text":42,"options":["a","b"],"correctIndex":0}]}"#;
        assert!(matches!(
            interpret(reply, 1, Difficulty::Easy),
            Err(GenerationFailure::InvalidQuestion { index: 0, .. })
        ));
    }

    #[test]
    fn test_non_string_explanation_is_coerced() {
        let reply = r#"{"questions":[{"text":"Q1 about it?","options":["a","b"],"correctIndex":1,"explanation":42}]}"#;
        let set = interpret(reply, 1, Difficulty::Easy).unwrap();
        assert_eq!(set.questions[0].explanation.as_deref(), Some("42"));
    }

    #[test]
    fn test_fewer_questions_than_requested_is_not_a_failure() {
        let set = interpret(VALID_REPLY, 5, Difficulty::Medium).unwrap();
        assert_eq!(set.metadata.requested_count, 5);
        assert_eq!(set.metadata.actual_count, 1);
    }

    #[test]
    fn test_empty_questions_array_is_accepted() {
        let set = interpret(r#"{"questions":[]}"#, 5, Difficulty::Medium).unwrap();
        assert_eq!(set.metadata.actual_count, 0);
    }
}
