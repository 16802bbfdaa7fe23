use crate::permissions::Permission;
use crate::user::ExtractUserId;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use http::StatusCode;
use protect_axum::protect;
use quizmith_db::attempt;
use quizmith_model::quiz::attempt::Attempt;
use quizmith_model_tools::convert::TryIntoModel;
use quizmith_model_tools::error::ConvertError;
use sea_orm::DatabaseConnection;
use thiserror::Error;

pub(crate) fn create_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/", get(get_attempts)).with_state(())
}

#[derive(Error, Debug)]
pub(crate) enum AttemptError {
    #[error(transparent)]
    SeaOrmError(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Convert(#[from] ConvertError),
}

impl IntoResponse for AttemptError {
    fn into_response(self) -> Response {
        match self {
            AttemptError::SeaOrmError(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Database error: {e}")).into_response()
            }
            AttemptError::Convert(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to decode stored attempt: {e}"),
            )
                .into_response(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v0/attempts",
    responses(
        (status = OK, body = Vec<Attempt>, description = "The caller's attempt history, newest first"),
    ),
    tag = "v0/attempts",
    security(
        ("token" = [])
    )
)]
#[protect("Permission::Basic", ty = "Permission")]
pub(crate) async fn get_attempts(
    ExtractUserId(user_id): ExtractUserId,
    Extension(conn): Extension<DatabaseConnection>,
) -> Result<Response, AttemptError> {
    let attempts = attempt::Query::get_attempts_by_user(&conn, &user_id).await?;

    let attempts: Vec<Attempt> = attempts
        .into_iter()
        .map(TryIntoModel::try_into_model)
        .collect::<Result<_, _>>()?;

    Ok(Json(attempts).into_response())
}
