mod common;

use crate::common::setup_schema;
use crate::common::user::create_test_user;
use quizmith_db::{attempt, quiz};
use quizmith_entity::quiz::Visibility;
use sea_orm::Database;
use serde_json::json;
use test_log::test;

#[test(tokio::test)]
async fn test_record_and_list_attempts() {
    let db = &Database::connect("sqlite::memory:").await.unwrap();
    setup_schema(db).await.unwrap();
    let user = create_test_user(db).await;

    let quiz = quiz::Mutation::create_quiz(
        db,
        &user.id,
        "Scored",
        None,
        json!([{"text": "What is 2+2?", "options": ["3", "4"], "correctIndex": 1}]),
        Visibility::Public,
        json!([]),
    )
    .await
    .unwrap();

    let answers = json!([{"questionIndex": 0, "selectedIndex": 1}]);
    let recorded = attempt::Mutation::create_attempt(db, &user.id, &quiz.id, answers.clone(), 1, 1)
        .await
        .unwrap();
    assert_eq!(recorded.score, 1);
    assert_eq!(recorded.total, 1);
    assert_eq!(recorded.answers, answers);

    attempt::Mutation::create_attempt(db, &user.id, &quiz.id, json!([]), 0, 1)
        .await
        .unwrap();

    let by_user = attempt::Query::get_attempts_by_user(db, &user.id).await.unwrap();
    assert_eq!(by_user.len(), 2);

    let by_quiz = attempt::Query::get_attempts_by_quiz(db, &quiz.id).await.unwrap();
    assert_eq!(by_quiz.len(), 2);
}
