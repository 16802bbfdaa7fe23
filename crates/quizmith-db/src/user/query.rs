use quizmith_entity::access_tokens::{Column as AccessTokenColumn, Entity as AccessToken};
use quizmith_entity::user::{Column as UserColumn, Entity as UserEntity, Model as User};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};
use std::error::Error;
use uuid::Uuid;

pub struct Query;

impl Query {
    pub async fn find_user_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Option<User>, DbErr> {
        UserEntity::find_by_id(id).one(conn).await.inspect_err(|error| {
            tracing::error!(error = error as &dyn Error, "error loading user");
        })
    }

    pub async fn find_by_email<C: ConnectionTrait>(conn: &C, email: &str) -> Result<Option<User>, DbErr> {
        UserEntity::find()
            .filter(UserColumn::Email.eq(email))
            .one(conn)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, "error loading user by email");
            })
    }

    pub async fn find_by_token<C: ConnectionTrait>(conn: &C, token: &str) -> Result<Option<User>, DbErr> {
        UserEntity::find()
            .inner_join(AccessToken)
            .filter(AccessTokenColumn::AccessToken.eq(token))
            .one(conn)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, "error finding user by token");
            })
    }

    pub async fn get_all_users<C: ConnectionTrait>(conn: &C) -> Result<Vec<User>, DbErr> {
        UserEntity::find()
            .order_by_desc(UserColumn::CreatedAt)
            .all(conn)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, "error loading users");
            })
    }
}
