use quizmith_entity::attempt::Model as AttemptModel;
use quizmith_model::quiz::attempt::{Attempt, AttemptAnswer};

use crate::convert::TryFromDbModel;
use crate::error::ConvertError;

impl TryFromDbModel<AttemptModel> for Attempt {
    type Error = ConvertError;

    fn try_from_db_model(model: AttemptModel) -> Result<Self, Self::Error> {
        let answers: Vec<AttemptAnswer> = serde_json::from_value(model.answers)?;
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            quiz_id: model.quiz_id,
            answers,
            score: u32::try_from(model.score)?,
            total: u32::try_from(model.total)?,
            started_at: model.started_at,
            finished_at: model.finished_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::TryIntoModel;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn test_attempt_conversion() {
        let model = AttemptModel {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            quiz_id: Uuid::new_v4(),
            answers: json!([{"questionIndex": 0, "selectedIndex": 1}]),
            score: 1,
            total: 1,
            started_at: chrono::NaiveDateTime::default(),
            finished_at: chrono::NaiveDateTime::default(),
        };
        let attempt: Attempt = model.try_into_model().unwrap();
        assert_eq!(attempt.answers.len(), 1);
        assert_eq!(attempt.answers[0].selected_index, 1);
        assert_eq!(attempt.score, 1);
    }
}
