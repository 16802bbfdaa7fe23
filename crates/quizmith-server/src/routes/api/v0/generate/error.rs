use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use quizmith_core::extract::ExtractionError;
use quizmith_core::generate::prompt::BuildError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub(crate) enum GenerateRouteError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Multipart(#[from] MultipartError),

    #[error("No document was uploaded")]
    MissingFile,

    #[error("Field {0} is invalid")]
    InvalidField(&'static str),

    /// `details` carries the offending model output and is only populated
    /// in a development environment.
    #[error("Failed to generate quiz")]
    Generation { details: Option<String> },
}

impl IntoResponse for GenerateRouteError {
    fn into_response(self) -> Response {
        match self {
            GenerateRouteError::Build(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
            GenerateRouteError::Extraction(e) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Could not read the uploaded document", "reason": e.to_string() })),
            )
                .into_response(),
            GenerateRouteError::Multipart(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
            GenerateRouteError::MissingFile => (StatusCode::BAD_REQUEST, "No document was uploaded").into_response(),
            GenerateRouteError::InvalidField(field) => {
                (StatusCode::BAD_REQUEST, format!("Field {field} is invalid")).into_response()
            }
            GenerateRouteError::Generation { details } => (
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "error": "Failed to generate quiz. Please try again.",
                    "details": details,
                })),
            )
                .into_response(),
        }
    }
}
