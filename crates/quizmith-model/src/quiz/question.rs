use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single multiple-choice question, embedded in its quiz. Questions have
/// no identity of their own; they live and die with the aggregate.
#[derive(Debug, Deserialize, Serialize, ToSchema, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub explanation: Option<String>,
}

impl Question {
    /// True iff picking `selected_index` answers this question correctly.
    #[must_use]
    pub fn is_correct(&self, selected_index: usize) -> bool {
        self.correct_index == selected_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize() {
        let question = Question {
            text: "What is 2+2?".to_owned(),
            options: vec!["3".to_owned(), "4".to_owned()],
            correct_index: 1,
            explanation: None,
        };
        assert_eq!(
            r#"{"text":"What is 2+2?","options":["3","4"],"correctIndex":1}"#,
            serde_json::to_string(&question).unwrap()
        );
    }

    #[test]
    fn test_is_correct() {
        let question = Question {
            text: "What is 2+2?".to_owned(),
            options: vec!["3".to_owned(), "4".to_owned(), "5".to_owned()],
            correct_index: 1,
            explanation: Some("Basic math".to_owned()),
        };
        assert!(question.is_correct(1));
        assert!(!question.is_correct(0));
        assert!(!question.is_correct(7));
    }
}
