use crate::AppConfig;
use crate::permissions::Permission;
use crate::routes::api::v0::generate::error::GenerateRouteError;
use crate::user::ExtractUserId;
use axum::extract::Multipart;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Extension, Json, Router};
use protect_axum::protect;
use quizmith_core::extract::{DocumentKind, extract_text};
use quizmith_core::generate::prompt::build_prompt;
use quizmith_core::generate::{CallConfig, GenerateError, generate_questions};
use quizmith_core::generate::interpret::GenerationFailure;
use quizmith_model::quiz::generated::{Difficulty, GeneratedQuestionSet};
use serde::Deserialize;
use std::time::Duration;
use utoipa::ToSchema;
use uuid::Uuid;

mod error;

const DEFAULT_QUESTION_COUNT: usize = 5;

pub(crate) fn create_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", post(generate))
        .route("/document", post(generate_from_document))
        .with_state(())
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateRequest {
    pub content: String,
    pub question_count: Option<usize>,
    pub difficulty: Option<Difficulty>,
}

fn call_config() -> CallConfig {
    CallConfig::builder()
        .total_timeout(Duration::from_secs(120))
        .iteration_timeout(Duration::from_secs(30))
        .build()
}

async fn run_generation(
    app_config: &AppConfig,
    user_id: &Uuid,
    content: &str,
    question_count: Option<usize>,
    difficulty: Option<Difficulty>,
) -> Result<GeneratedQuestionSet, GenerateRouteError> {
    let question_count = question_count.unwrap_or(DEFAULT_QUESTION_COUNT);
    let difficulty = difficulty.unwrap_or(Difficulty::Medium);

    let spec = build_prompt(content, question_count, difficulty)?;

    tracing::info!(user = %user_id, question_count, %difficulty, "generating quiz");
    let set = generate_questions(app_config.llm_config(), call_config(), &spec)
        .await
        .map_err(|error| match error {
            // The offending model output is diagnostic data; it leaves the
            // server only in a development environment.
            GenerateError::Interpretation(GenerationFailure::MalformedOutput { raw }) if app_config.is_dev() => {
                GenerateRouteError::Generation { details: Some(raw) }
            }
            error => {
                tracing::warn!(error = %error, "quiz generation failed");
                GenerateRouteError::Generation { details: None }
            }
        })?;

    Ok(set)
}

#[utoipa::path(
    post,
    path = "/api/v0/quizzes/generate",
    request_body = GenerateRequest,
    responses(
        (status = OK, body = GeneratedQuestionSet, description = "Generated questions for client-side review; nothing is persisted"),
        (status = BAD_REQUEST, description = "Content too short or question count out of range"),
        (status = BAD_GATEWAY, description = "The model produced output that could not be interpreted"),
    ),
    tag = "v0/generate",
    security(
        ("token" = [])
    )
)]
#[protect("Permission::Basic", ty = "Permission")]
pub(crate) async fn generate(
    ExtractUserId(user_id): ExtractUserId,
    Extension(app_config): Extension<AppConfig>,
    Json(payload): Json<GenerateRequest>,
) -> Result<Response, GenerateRouteError> {
    let set = run_generation(
        &app_config,
        &user_id,
        &payload.content,
        payload.question_count,
        payload.difficulty,
    )
    .await?;
    Ok(Json(set).into_response())
}

#[utoipa::path(
    post,
    path = "/api/v0/quizzes/generate/document",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = OK, body = GeneratedQuestionSet, description = "Generated questions from the uploaded document"),
        (status = BAD_REQUEST, description = "The document could not be converted to text, or parameters are invalid"),
        (status = BAD_GATEWAY, description = "The model produced output that could not be interpreted"),
    ),
    tag = "v0/generate",
    security(
        ("token" = [])
    )
)]
#[protect("Permission::Basic", ty = "Permission")]
pub(crate) async fn generate_from_document(
    ExtractUserId(user_id): ExtractUserId,
    Extension(app_config): Extension<AppConfig>,
    mut multipart: Multipart,
) -> Result<Response, GenerateRouteError> {
    let mut content: Option<String> = None;
    let mut question_count: Option<usize> = None;
    let mut difficulty: Option<Difficulty> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("file") => {
                let kind = field
                    .file_name()
                    .map_or(DocumentKind::Text, DocumentKind::from_file_name);
                let bytes = field.bytes().await?;
                tracing::debug!(len = bytes.len(), "extracting uploaded document");
                content = Some(extract_text(&bytes, kind)?);
            }
            Some("questionCount") => {
                let text = field.text().await?;
                question_count = Some(
                    text.trim()
                        .parse()
                        .map_err(|_| GenerateRouteError::InvalidField("questionCount"))?,
                );
            }
            Some("difficulty") => {
                let text = field.text().await?;
                difficulty = Some(
                    serde_json::from_value(serde_json::Value::String(text.trim().to_owned()))
                        .map_err(|_| GenerateRouteError::InvalidField("difficulty"))?,
                );
            }
            _ => {}
        }
    }

    let content = content.ok_or(GenerateRouteError::MissingFile)?;
    let set = run_generation(&app_config, &user_id, &content, question_count, difficulty).await?;
    Ok(Json(set).into_response())
}
