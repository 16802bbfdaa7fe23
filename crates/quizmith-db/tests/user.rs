mod common;

use crate::common::setup_schema;
use crate::common::user::create_test_user;
use quizmith_db::{access_tokens, user};
use quizmith_entity::user::Role;
use sea_orm::Database;
use test_log::test;

#[test(tokio::test)]
async fn test_create_and_find_user() {
    let db = &Database::connect("sqlite::memory:").await.unwrap();
    setup_schema(db).await.unwrap();

    let created = user::Mutation::create_user(db, "ada@example.org", Some("Ada"), "hash", Role::Admin)
        .await
        .unwrap();

    let by_id = user::Query::find_user_by_id(db, created.id).await.unwrap().unwrap();
    assert_eq!(by_id.email, "ada@example.org");
    assert_eq!(by_id.role, Role::Admin);

    let by_email = user::Query::find_by_email(db, "ada@example.org").await.unwrap().unwrap();
    assert_eq!(by_email.id, created.id);

    assert!(user::Query::find_by_email(db, "nobody@example.org").await.unwrap().is_none());
}

#[test(tokio::test)]
async fn test_duplicate_email_rejected() {
    let db = &Database::connect("sqlite::memory:").await.unwrap();
    setup_schema(db).await.unwrap();

    user::Mutation::create_user(db, "ada@example.org", None, "hash", Role::User)
        .await
        .unwrap();
    let duplicate = user::Mutation::create_user(db, "ada@example.org", None, "hash", Role::User).await;
    assert!(duplicate.is_err());
}

#[test(tokio::test)]
async fn test_token_roundtrip() {
    let db = &Database::connect("sqlite::memory:").await.unwrap();
    setup_schema(db).await.unwrap();
    let created = create_test_user(db).await;

    let token = access_tokens::Mutation::create_access_token(db, created.id).await.unwrap();

    let found = user::Query::find_by_token(db, &token.access_token).await.unwrap().unwrap();
    assert_eq!(found.id, created.id);

    // A second issue for the same user returns the existing token
    let again = access_tokens::Mutation::create_access_token(db, created.id).await.unwrap();
    assert_eq!(again.access_token, token.access_token);

    access_tokens::Mutation::delete_access_token(db, created.id).await.unwrap();
    assert!(user::Query::find_by_token(db, &token.access_token).await.unwrap().is_none());
}

#[test(tokio::test)]
async fn test_find_by_bogus_token() {
    let db = &Database::connect("sqlite::memory:").await.unwrap();
    setup_schema(db).await.unwrap();
    create_test_user(db).await;

    assert!(user::Query::find_by_token(db, "not-a-token").await.unwrap().is_none());
}
