mod common;

use crate::common::setup_schema;
use crate::common::user::create_test_user;
use quizmith_db::quiz;
use quizmith_entity::quiz::Visibility;
use quizmith_test_helpers::{SqliteDb, TestDb};
use sea_orm::Database;
use serde_json::json;
use test_log::test;
use uuid::Uuid;

fn question_json() -> serde_json::Value {
    json!([{
        "text": "What is 2+2?",
        "options": ["3", "4", "5"],
        "correctIndex": 1
    }])
}

#[test(tokio::test)]
async fn test_create_and_get_quiz() {
    let db = &Database::connect("sqlite::memory:").await.unwrap();
    setup_schema(db).await.unwrap();
    let user = create_test_user(db).await;

    let created = quiz::Mutation::create_quiz(
        db,
        &user.id,
        "JS",
        Some("Test your JS knowledge"),
        question_json(),
        Visibility::Public,
        json!(["javascript", "basics"]),
    )
    .await
    .unwrap();

    let loaded = quiz::Query::get_quiz_by_id(db, &created.id).await.unwrap().unwrap();
    assert_eq!(loaded.title, "JS");
    assert_eq!(loaded.owner_id, user.id);
    assert_eq!(loaded.questions, question_json());
    assert_eq!(loaded.created_at, loaded.updated_at);
}

#[test(tokio::test)]
async fn test_visibility_filters() {
    let db = &Database::connect("sqlite::memory:").await.unwrap();
    setup_schema(db).await.unwrap();
    let owner = create_test_user(db).await;
    let stranger = create_test_user(db).await;

    quiz::Mutation::create_quiz(db, &owner.id, "Public quiz", None, question_json(), Visibility::Public, json!([]))
        .await
        .unwrap();
    quiz::Mutation::create_quiz(db, &owner.id, "Private quiz", None, question_json(), Visibility::Private, json!([]))
        .await
        .unwrap();

    let anonymous = quiz::Query::get_visible_quizzes(db, None).await.unwrap();
    assert_eq!(anonymous.len(), 1);
    assert_eq!(anonymous[0].title, "Public quiz");

    let for_stranger = quiz::Query::get_visible_quizzes(db, Some(&stranger.id)).await.unwrap();
    assert_eq!(for_stranger.len(), 1);

    let for_owner = quiz::Query::get_visible_quizzes(db, Some(&owner.id)).await.unwrap();
    assert_eq!(for_owner.len(), 2);
}

#[test(tokio::test)]
async fn test_update_quiz_touches_updated_at() {
    let db = &Database::connect("sqlite::memory:").await.unwrap();
    setup_schema(db).await.unwrap();
    let user = create_test_user(db).await;

    let created = quiz::Mutation::create_quiz(
        db,
        &user.id,
        "Before",
        None,
        question_json(),
        Visibility::Public,
        json!([]),
    )
    .await
    .unwrap();

    let updated = quiz::Mutation::update_quiz(
        db,
        &created.id,
        "After",
        Some("now with a description"),
        question_json(),
        Visibility::Private,
        json!(["changed"]),
    )
    .await
    .unwrap();

    assert_eq!(updated.title, "After");
    assert_eq!(updated.visibility, Visibility::Private);
    assert_eq!(updated.owner_id, user.id);
    assert!(updated.updated_at >= created.updated_at);
}

#[test(tokio::test)]
async fn test_delete_quiz() {
    let db = &Database::connect("sqlite::memory:").await.unwrap();
    setup_schema(db).await.unwrap();
    let user = create_test_user(db).await;

    let created =
        quiz::Mutation::create_quiz(db, &user.id, "Doomed", None, question_json(), Visibility::Public, json!([]))
            .await
            .unwrap();

    quiz::Mutation::delete_quiz(db, &created.id).await.unwrap();
    assert!(quiz::Query::get_quiz_by_id(db, &created.id).await.unwrap().is_none());

    // Deleting again is a no-op, not an error
    quiz::Mutation::delete_quiz(db, &created.id).await.unwrap();
}

#[test(tokio::test)]
async fn test_get_unknown_quiz() {
    let db = &Database::connect("sqlite::memory:").await.unwrap();
    setup_schema(db).await.unwrap();

    let missing = quiz::Query::get_quiz_by_id(db, &Uuid::new_v4()).await.unwrap();
    assert!(missing.is_none());
}

#[test(tokio::test)]
async fn test_count_by_owner() {
    let sqlite = SqliteDb::new().unwrap();
    let db = &Database::connect(sqlite.db_uri().as_ref()).await.unwrap();
    setup_schema(db).await.unwrap();
    let prolific = create_test_user(db).await;
    let quiet = create_test_user(db).await;

    for title in ["One", "Two", "Three"] {
        quiz::Mutation::create_quiz(db, &prolific.id, title, None, question_json(), Visibility::Public, json!([]))
            .await
            .unwrap();
    }
    quiz::Mutation::create_quiz(db, &quiet.id, "Only", None, question_json(), Visibility::Private, json!([]))
        .await
        .unwrap();

    let counts = quiz::Query::count_by_owner(db).await.unwrap();
    let find = |id: &Uuid| counts.iter().find(|c| c.owner_id == *id).map(|c| c.count);
    assert_eq!(find(&prolific.id), Some(3));
    assert_eq!(find(&quiet.id), Some(1));
}
