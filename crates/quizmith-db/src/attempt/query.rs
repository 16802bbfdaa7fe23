use quizmith_entity::attempt::{Column, Entity as Attempt, Model as AttemptModel};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};
use std::error::Error;
use uuid::Uuid;

pub struct Query;

impl Query {
    pub async fn get_attempts_by_user<C: ConnectionTrait>(
        db: &C,
        user_id: &Uuid,
    ) -> Result<Vec<AttemptModel>, DbErr> {
        Attempt::find()
            .filter(Column::UserId.eq(*user_id))
            .order_by_desc(Column::FinishedAt)
            .all(db)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, "failed to load attempts");
            })
    }

    pub async fn get_attempts_by_quiz<C: ConnectionTrait>(
        db: &C,
        quiz_id: &Uuid,
    ) -> Result<Vec<AttemptModel>, DbErr> {
        Attempt::find()
            .filter(Column::QuizId.eq(*quiz_id))
            .order_by_desc(Column::FinishedAt)
            .all(db)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, "failed to load attempts for quiz");
            })
    }
}
