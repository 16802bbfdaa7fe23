use chrono::Utc;
use quizmith_entity::attempt;
use sea_orm::ActiveValue::Set;
use sea_orm::prelude::Json;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr};
use std::error::Error;
use uuid::Uuid;

pub struct Mutation;

impl Mutation {
    pub async fn create_attempt<C: ConnectionTrait>(
        db: &C,
        user_id: &Uuid,
        quiz_id: &Uuid,
        answers: Json,
        score: i32,
        total: i32,
    ) -> Result<attempt::Model, DbErr> {
        let now = Utc::now().naive_utc();
        let new_attempt = attempt::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(*user_id),
            quiz_id: Set(*quiz_id),
            answers: Set(answers),
            score: Set(score),
            total: Set(total),
            started_at: Set(now),
            finished_at: Set(now),
        };

        new_attempt.insert(db).await.inspect_err(|error| {
            tracing::error!(error = error as &dyn Error, "failed to record attempt");
        })
    }
}
