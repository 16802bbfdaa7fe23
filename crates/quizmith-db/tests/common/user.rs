use quizmith_db::user;
use quizmith_entity::user::{Model, Role};
use sea_orm::DbConn;
use uuid::Uuid;

pub async fn create_test_user(db: &DbConn) -> Model {
    user::Mutation::create_user(
        db,
        &format!("{}@example.org", Uuid::new_v4().as_simple()),
        Some("Test User"),
        "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHQ$not-a-real-hash",
        Role::User,
    )
    .await
    .unwrap()
}
