use crate::permissions::Permission;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use http::StatusCode;
use protect_axum::protect;
use quizmith_db::{quiz, user};
use quizmith_model::quiz::quiz::{Quiz, Visibility};
use quizmith_model::user::{Role, User};
use quizmith_model_tools::convert::{IntoModel, TryIntoModel};
use quizmith_model_tools::error::ConvertError;
use sea_orm::DatabaseConnection;
use serde_derive::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use tokio::try_join;
use utoipa::ToSchema;
use uuid::Uuid;

pub(crate) fn create_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/users", get(list_users))
        .route("/quizzes", get(list_quizzes))
        .with_state(())
}

#[derive(Error, Debug)]
pub(crate) enum AdminError {
    #[error(transparent)]
    SeaOrmError(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Convert(#[from] ConvertError),
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        match self {
            AdminError::SeaOrmError(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Database error: {e}")).into_response()
            }
            AdminError::Convert(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to decode stored record: {e}"),
            )
                .into_response(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AdminUser {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub role: Role,
    pub created_at: chrono::NaiveDateTime,
    pub quiz_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct AdminUserPage {
    pub users: Vec<AdminUser>,
    pub total: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AdminQuiz {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub visibility: Visibility,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub question_count: usize,
    pub created_at: chrono::NaiveDateTime,
    pub owner_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct AdminQuizPage {
    pub quizzes: Vec<AdminQuiz>,
    pub total: usize,
}

#[utoipa::path(
    get,
    path = "/api/v0/admin/users",
    responses(
        (status = OK, body = AdminUserPage, description = "All users with their quiz counts, newest first"),
        (status = FORBIDDEN, description = "Caller is not an administrator"),
    ),
    tag = "v0/admin",
    security(
        ("token" = [])
    )
)]
#[protect("Permission::Admin", ty = "Permission")]
pub(crate) async fn list_users(Extension(conn): Extension<DatabaseConnection>) -> Result<Response, AdminError> {
    let (users, counts) = try_join!(
        user::Query::get_all_users(&conn),
        quiz::Query::count_by_owner(&conn),
    )?;

    let counts: HashMap<Uuid, i64> = counts.into_iter().map(|count| (count.owner_id, count.count)).collect();

    let users: Vec<AdminUser> = users
        .into_iter()
        .map(|model| {
            let user: User = model.into_model();
            let quiz_count = counts.get(&user.id).copied().unwrap_or(0);
            AdminUser {
                id: user.id,
                email: user.email,
                name: user.name,
                role: user.role,
                created_at: user.created_at,
                quiz_count,
            }
        })
        .collect();

    let total = users.len();
    Ok(Json(AdminUserPage { users, total }).into_response())
}

#[utoipa::path(
    get,
    path = "/api/v0/admin/quizzes",
    responses(
        (status = OK, body = AdminQuizPage, description = "All quizzes with owner info, newest first"),
        (status = FORBIDDEN, description = "Caller is not an administrator"),
    ),
    tag = "v0/admin",
    security(
        ("token" = [])
    )
)]
#[protect("Permission::Admin", ty = "Permission")]
pub(crate) async fn list_quizzes(Extension(conn): Extension<DatabaseConnection>) -> Result<Response, AdminError> {
    let (quizzes, users) = try_join!(quiz::Query::get_all_quizzes(&conn), user::Query::get_all_users(&conn))?;

    let owners: HashMap<Uuid, User> = users.into_iter().map(|model| {
        let user: User = model.into_model();
        (user.id, user)
    }).collect();

    let quizzes: Vec<AdminQuiz> = quizzes
        .into_iter()
        .map(|model| {
            let quiz: Quiz = model.try_into_model()?;
            let owner = owners.get(&quiz.owner_id);
            Ok(AdminQuiz {
                id: quiz.id,
                title: quiz.title,
                description: quiz.description,
                visibility: quiz.visibility,
                tags: quiz.tags,
                question_count: quiz.questions.len(),
                created_at: quiz.created_at,
                owner_id: quiz.owner_id,
                owner_name: owner.and_then(|owner| owner.name.clone()),
                owner_email: owner.map(|owner| owner.email.clone()),
            })
        })
        .collect::<Result<_, ConvertError>>()?;

    let total = quizzes.len();
    Ok(Json(AdminQuizPage { quizzes, total }).into_response())
}
