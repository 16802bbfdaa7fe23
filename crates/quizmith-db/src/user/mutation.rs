use chrono::Utc;
use quizmith_entity::user::{ActiveModel, Model, Role};
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait};
use std::error::Error;
use uuid::Uuid;

pub struct Mutation;

impl Mutation {
    pub async fn create_user<C: ConnectionTrait>(
        conn: &C,
        email: &str,
        name: Option<&str>,
        password_hash: &str,
        role: Role,
    ) -> Result<Model, DbErr> {
        let new_user = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email.to_owned()),
            name: Set(name.map(ToOwned::to_owned)),
            password_hash: Set(Some(password_hash.to_owned())),
            role: Set(role),
            created_at: Set(Utc::now().naive_utc()),
        };

        new_user.insert(conn).await.inspect_err(|error| {
            tracing::error!(error = error as &dyn Error, "failed to create user");
        })
    }

    pub async fn delete<C: ConnectionTrait>(conn: &C, user_id: Uuid) -> Result<(), DbErr> {
        let res = quizmith_entity::user::Entity::delete_by_id(user_id).exec(conn).await;
        if let Err(error) = res {
            tracing::error!(error = &error as &dyn Error, "failed to delete user");
            return Err(error);
        }
        Ok(())
    }
}
