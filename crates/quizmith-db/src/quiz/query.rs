use quizmith_entity::quiz;
use quizmith_entity::quiz::{Entity as Quiz, Model as QuizModel};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, FromQueryResult, QueryFilter, QueryOrder, QuerySelect,
};
use std::error::Error;
use uuid::Uuid;

#[derive(Debug, FromQueryResult)]
pub struct OwnerQuizCount {
    pub owner_id: Uuid,
    pub count: i64,
}

pub struct Query;

impl Query {
    pub async fn get_quiz_by_id<C: ConnectionTrait>(db: &C, quiz_id: &Uuid) -> Result<Option<QuizModel>, DbErr> {
        Quiz::find_by_id(*quiz_id).one(db).await.inspect_err(|error| {
            tracing::error!(error = error as &dyn Error, "failed to load quiz by id");
        })
    }

    /// Everything the viewer may see: public quizzes plus, for an
    /// authenticated viewer, their own private ones. Newest first.
    pub async fn get_visible_quizzes<C: ConnectionTrait>(
        db: &C,
        viewer_id: Option<&Uuid>,
    ) -> Result<Vec<QuizModel>, DbErr> {
        let mut condition = Condition::any().add(quiz::Column::Visibility.eq(quiz::Visibility::Public));
        if let Some(viewer_id) = viewer_id {
            condition = condition.add(quiz::Column::OwnerId.eq(*viewer_id));
        }

        Quiz::find()
            .filter(condition)
            .order_by_desc(quiz::Column::CreatedAt)
            .all(db)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, "failed to load visible quizzes");
            })
    }

    pub async fn get_all_quizzes<C: ConnectionTrait>(db: &C) -> Result<Vec<QuizModel>, DbErr> {
        Quiz::find()
            .order_by_desc(quiz::Column::CreatedAt)
            .all(db)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, "failed to load all quizzes");
            })
    }

    /// Quiz totals per owner, for the admin user listing.
    pub async fn count_by_owner<C: ConnectionTrait>(db: &C) -> Result<Vec<OwnerQuizCount>, DbErr> {
        Quiz::find()
            .select_only()
            .column(quiz::Column::OwnerId)
            .column_as(quiz::Column::Id.count(), "count")
            .group_by(quiz::Column::OwnerId)
            .into_model::<OwnerQuizCount>()
            .all(db)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, "failed to count quizzes by owner");
            })
    }
}
