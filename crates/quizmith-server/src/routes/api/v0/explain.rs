use crate::AppConfig;
use crate::permissions::Permission;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Extension, Json, Router};
use http::StatusCode;
use protect_axum::protect;
use quizmith_core::explain::{ExplainError, build_explain_prompt, explain_answer};
use quizmith_core::generate::CallConfig;
use serde::Deserialize;
use serde_derive::Serialize;
use std::time::Duration;
use thiserror::Error;
use utoipa::ToSchema;

pub(crate) fn create_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/", post(explain)).with_state(())
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExplainRequest {
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub user_answer_index: Option<usize>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ExplainResponse {
    pub explanation: String,
}

#[derive(Error, Debug)]
pub(crate) enum ExplainRouteError {
    #[error(transparent)]
    Explain(#[from] ExplainError),
}

impl IntoResponse for ExplainRouteError {
    fn into_response(self) -> Response {
        let ExplainRouteError::Explain(error) = self;
        match error {
            ExplainError::CorrectIndexOutOfRange { .. } => (StatusCode::BAD_REQUEST, error.to_string()).into_response(),
            ExplainError::Api(_) | ExplainError::HttpClientBuild(_) | ExplainError::EmptyResponse => {
                (StatusCode::BAD_GATEWAY, "Failed to generate explanation").into_response()
            }
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v0/explain",
    request_body = ExplainRequest,
    responses(
        (status = OK, body = ExplainResponse, description = "Tutor-style explanation of the correct answer"),
        (status = BAD_REQUEST, description = "The correct index does not point at an option"),
        (status = BAD_GATEWAY, description = "The model did not return an explanation"),
    ),
    tag = "v0/explain",
    security(
        ("token" = [])
    )
)]
#[protect("Permission::Basic", ty = "Permission")]
pub(crate) async fn explain(
    Extension(app_config): Extension<AppConfig>,
    Json(payload): Json<ExplainRequest>,
) -> Result<Response, ExplainRouteError> {
    let prompt = build_explain_prompt(
        &payload.question_text,
        &payload.options,
        payload.correct_index,
        payload.user_answer_index,
    )?;

    let config = CallConfig::builder()
        .total_timeout(Duration::from_secs(60))
        .iteration_timeout(Duration::from_secs(20))
        .build();

    let explanation = explain_answer(app_config.llm_config(), config, prompt).await?;
    Ok(Json(ExplainResponse { explanation }).into_response())
}
