use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::quiz::question::Question;

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// The quiz aggregate as served to clients. `owner_id` is always taken from
/// the authenticated identity at creation time, never from the payload.
#[derive(Debug, Deserialize, Serialize, ToSchema, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub questions: Vec<Question>,
    pub visibility: Visibility,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<String>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl Quiz {
    #[must_use]
    pub fn as_summary(&self, is_owner: bool) -> QuizSummary {
        QuizSummary {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            visibility: self.visibility,
            tags: self.tags.clone(),
            question_count: self.questions.len(),
            created_at: self.created_at,
            is_owner,
        }
    }
}

/// Listing view: everything except the questions themselves.
#[derive(Debug, Serialize, ToSchema, Clone)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub visibility: Visibility,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub question_count: usize,
    pub created_at: chrono::NaiveDateTime,
    pub is_owner: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuizPage {
    pub quizzes: Vec<QuizSummary>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_serialize() {
        assert_eq!(r#""public""#, serde_json::to_string(&Visibility::Public).unwrap());
        assert_eq!(r#""private""#, serde_json::to_string(&Visibility::Private).unwrap());
        assert_eq!(Visibility::default(), Visibility::Public);
    }

    #[test]
    fn test_summary_counts_questions() {
        let quiz = Quiz {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "JS".to_owned(),
            description: None,
            questions: vec![Question {
                text: "What is 2+2?".to_owned(),
                options: vec!["3".to_owned(), "4".to_owned(), "5".to_owned()],
                correct_index: 1,
                explanation: None,
            }],
            visibility: Visibility::Public,
            tags: vec![],
            created_at: chrono::NaiveDateTime::default(),
            updated_at: chrono::NaiveDateTime::default(),
        };
        let summary = quiz.as_summary(true);
        assert_eq!(summary.question_count, 1);
        assert!(summary.is_owner);
    }
}
