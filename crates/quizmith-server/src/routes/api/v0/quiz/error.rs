use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use quizmith_core::validate::ValidationFailure;
use quizmith_model_tools::error::ConvertError;
use thiserror::Error;

#[derive(Error, Debug)]
pub(crate) enum QuizError {
    #[error(transparent)]
    SeaOrmError(#[from] sea_orm::DbErr),

    #[error("The requested quiz was not found.")]
    QuizNotFound,

    #[error("You can only modify your own quizzes.")]
    Forbidden,

    #[error("The quiz payload violates one or more validation rules.")]
    Validation(Vec<ValidationFailure>),

    #[error("Invalid answer: {0}")]
    InvalidAnswer(&'static str),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error(transparent)]
    SerializeError(#[from] serde_json::Error),
}

impl IntoResponse for QuizError {
    fn into_response(self) -> Response {
        match self {
            QuizError::SeaOrmError(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Database error: {e}")).into_response()
            }
            QuizError::QuizNotFound => (StatusCode::NOT_FOUND, "Quiz not found").into_response(),
            QuizError::Forbidden => {
                (StatusCode::FORBIDDEN, "You can only modify your own quizzes").into_response()
            }
            // The full list, never a prefix: the client renders every bad
            // field at once.
            QuizError::Validation(failures) => (StatusCode::BAD_REQUEST, Json(failures)).into_response(),
            QuizError::InvalidAnswer(reason) => (StatusCode::BAD_REQUEST, reason).into_response(),
            QuizError::Convert(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to decode stored quiz: {e}"),
            )
                .into_response(),
            QuizError::SerializeError(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to serialize response: {e}"),
            )
                .into_response(),
        }
    }
}
