use chrono::Utc;
use quizmith_entity::quiz;
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::prelude::Json;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait};
use std::error::Error;
use uuid::Uuid;

pub struct Mutation;

impl Mutation {
    #[allow(clippy::too_many_arguments)]
    pub async fn create_quiz<C: ConnectionTrait>(
        db: &C,
        owner_id: &Uuid,
        title: &str,
        description: Option<&str>,
        questions: Json,
        visibility: quiz::Visibility,
        tags: Json,
    ) -> Result<quiz::Model, DbErr> {
        let now = Utc::now().naive_utc();
        let new_quiz = quiz::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(*owner_id),
            title: Set(title.to_owned()),
            description: Set(description.map(ToOwned::to_owned)),
            questions: Set(questions),
            visibility: Set(visibility),
            tags: Set(tags),
            created_at: Set(now),
            updated_at: Set(now),
        };

        new_quiz.insert(db).await.inspect_err(|error| {
            tracing::error!(error = error as &dyn Error, "failed to create quiz");
        })
    }

    /// Full field replacement. Partial updates are merged with the stored
    /// quiz and re-validated before they reach this point, so the mutation
    /// always writes the whole aggregate.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_quiz<C: ConnectionTrait>(
        db: &C,
        quiz_id: &Uuid,
        title: &str,
        description: Option<&str>,
        questions: Json,
        visibility: quiz::Visibility,
        tags: Json,
    ) -> Result<quiz::Model, DbErr> {
        let updated = quiz::ActiveModel {
            id: Unchanged(*quiz_id),
            title: Set(title.to_owned()),
            description: Set(description.map(ToOwned::to_owned)),
            questions: Set(questions),
            visibility: Set(visibility),
            tags: Set(tags),
            updated_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        updated.update(db).await.inspect_err(|error| {
            tracing::error!(error = error as &dyn Error, "failed to update quiz");
        })
    }

    pub async fn delete_quiz<C: ConnectionTrait>(db: &C, quiz_id: &Uuid) -> Result<(), DbErr> {
        quiz::Entity::delete_by_id(*quiz_id)
            .exec(db)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, "failed to delete quiz");
            })?;
        Ok(())
    }
}
