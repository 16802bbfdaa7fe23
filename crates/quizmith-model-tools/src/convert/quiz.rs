use quizmith_entity::quiz::{Model as QuizModel, Visibility as VisibilityModel};
use quizmith_model::quiz::question::Question;
use quizmith_model::quiz::quiz::{Quiz, Visibility};

use crate::convert::{FromDbModel, FromModel, TryFromDbModel};
use crate::error::ConvertError;

impl FromDbModel<VisibilityModel> for Visibility {
    fn from_db_model(model: VisibilityModel) -> Self {
        match model {
            VisibilityModel::Public => Visibility::Public,
            VisibilityModel::Private => Visibility::Private,
        }
    }
}

impl FromModel<Visibility> for VisibilityModel {
    fn from_model(model: Visibility) -> Self {
        match model {
            Visibility::Public => VisibilityModel::Public,
            Visibility::Private => VisibilityModel::Private,
        }
    }
}

impl TryFromDbModel<QuizModel> for Quiz {
    type Error = ConvertError;

    fn try_from_db_model(model: QuizModel) -> Result<Self, Self::Error> {
        let questions: Vec<Question> = serde_json::from_value(model.questions)?;
        let tags: Vec<String> = serde_json::from_value(model.tags)?;
        Ok(Self {
            id: model.id,
            owner_id: model.owner_id,
            title: model.title,
            description: model.description,
            questions,
            visibility: Visibility::from_db_model(model.visibility),
            tags,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::TryIntoModel;
    use serde_json::json;
    use uuid::Uuid;

    fn db_quiz(questions: serde_json::Value) -> QuizModel {
        QuizModel {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "JS".to_owned(),
            description: None,
            questions,
            visibility: VisibilityModel::Public,
            tags: json!(["javascript"]),
            created_at: chrono::NaiveDateTime::default(),
            updated_at: chrono::NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_quiz_roundtrip() {
        let model = db_quiz(json!([{
            "text": "What is 2+2?",
            "options": ["3", "4", "5"],
            "correctIndex": 1,
            "explanation": "Basic math"
        }]));
        let quiz: Quiz = model.try_into_model().unwrap();
        assert_eq!(quiz.questions.len(), 1);
        assert_eq!(quiz.questions[0].correct_index, 1);
        assert_eq!(quiz.tags, vec!["javascript".to_owned()]);
        assert_eq!(quiz.visibility, Visibility::Public);
    }

    #[test]
    fn test_malformed_questions_column() {
        let model = db_quiz(json!({"not": "an array"}));
        let quiz: Result<Quiz, _> = model.try_into_model();
        assert!(quiz.is_err());
    }
}
