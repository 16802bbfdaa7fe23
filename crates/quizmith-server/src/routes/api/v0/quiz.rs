use crate::permissions::{Permission, can_modify};
use crate::routes::api::v0::quiz::error::QuizError;
use crate::user::{ExtractUser, ExtractUserId};
use axum::Json;
use axum::extract::{Path, Query};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Router};
use http::StatusCode;
use protect_axum::protect;
use quizmith_core::validate::{QuestionPayload, QuizPayload, ValidatedQuiz, validate};
use quizmith_db::{attempt, quiz};
use quizmith_model::quiz::attempt::AttemptAnswer;
use quizmith_model::quiz::question::Question;
use quizmith_model::quiz::quiz::{Pagination, Quiz, QuizPage, QuizSummary, Visibility};
use quizmith_model::user::User;
use quizmith_model_tools::convert::{IntoDbModel, TryIntoModel};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

mod error;

const DEFAULT_PAGE_SIZE: u64 = 20;
const MAX_PAGE_SIZE: u64 = 100;

pub(crate) fn create_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(get_quizzes).post(create_quiz))
        .nest(
            "/{quiz_id}",
            Router::new()
                .route("/", get(get_quiz).put(update_quiz).delete(delete_quiz))
                .route("/attempts", post(submit_attempt)),
        )
        .with_state(())
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub tags: Option<String>,
}

fn clamp_paging(page: Option<u64>, limit: Option<u64>) -> (u64, u64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (page, limit)
}

/// Match-any-of-set tag filtering; an empty filter matches everything.
fn matches_tags(quiz_tags: &[String], filter: &[String]) -> bool {
    filter.is_empty() || quiz_tags.iter().any(|tag| filter.contains(tag))
}

fn can_view(user: Option<&User>, quiz: &Quiz) -> bool {
    quiz.visibility == Visibility::Public || user.is_some_and(|user| can_modify(user, quiz))
}

/// Private quizzes are hidden, not forbidden: a caller that may not modify
/// a private quiz gets the same not-found as for a quiz that does not
/// exist. Public quizzes are plainly visible, so a rejected write on one
/// is a forbidden instead.
fn require_modify(user: &User, quiz: &Quiz) -> Result<(), QuizError> {
    if can_modify(user, quiz) {
        return Ok(());
    }
    if quiz.visibility == Visibility::Private {
        Err(QuizError::QuizNotFound)
    } else {
        Err(QuizError::Forbidden)
    }
}

#[utoipa::path(
    post,
    path = "/api/v0/quizzes",
    request_body = QuizPayload,
    responses(
        (status = CREATED, body = QuizSummary, description = "The created quiz"),
        (status = BAD_REQUEST, description = "The payload violates one or more validation rules; all violations are listed"),
    ),
    tag = "v0/quizzes",
    security(
        ("token" = [])
    )
)]
#[protect("Permission::Basic", ty = "Permission")]
pub(crate) async fn create_quiz(
    ExtractUserId(user_id): ExtractUserId,
    Extension(conn): Extension<DatabaseConnection>,
    Json(payload): Json<QuizPayload>,
) -> Result<Response, QuizError> {
    let validated = validate(payload).map_err(QuizError::Validation)?;

    let created = quiz::Mutation::create_quiz(
        &conn,
        &user_id,
        &validated.title,
        validated.description.as_deref(),
        serde_json::to_value(&validated.questions)?,
        validated.visibility.into_db_model(),
        serde_json::to_value(&validated.tags)?,
    )
    .await?;

    tracing::info!(quiz = %created.id, user = %user_id, "created quiz");
    let quiz: Quiz = created.try_into_model()?;
    Ok((StatusCode::CREATED, Json(quiz.as_summary(true))).into_response())
}

#[utoipa::path(
    get,
    path = "/api/v0/quizzes",
    params(
        ("page" = Option<u64>, Query, description = "1-based page number"),
        ("limit" = Option<u64>, Query, description = "page size, at most 100"),
        ("tags" = Option<String>, Query, description = "comma-separated tags, quizzes matching any are returned"),
    ),
    responses(
        (status = OK, body = QuizPage, description = "Public quizzes plus, for a signed-in caller, their own"),
    ),
    tag = "v0/quizzes"
)]
pub(crate) async fn get_quizzes(
    user_id: Option<ExtractUserId>,
    Extension(conn): Extension<DatabaseConnection>,
    Query(params): Query<ListParams>,
) -> Result<Response, QuizError> {
    let viewer_id = user_id.map(|ExtractUserId(id)| id);
    let (page, limit) = clamp_paging(params.page, params.limit);
    let filter: Vec<String> = params
        .tags
        .as_deref()
        .map(|tags| tags.split(',').map(|tag| tag.trim().to_owned()).filter(|tag| !tag.is_empty()).collect())
        .unwrap_or_default();

    let quizzes = quiz::Query::get_visible_quizzes(&conn, viewer_id.as_ref()).await?;

    let visible: Vec<Quiz> = quizzes
        .into_iter()
        .map(TryIntoModel::try_into_model)
        .collect::<Result<Vec<Quiz>, _>>()?
        .into_iter()
        .filter(|quiz| matches_tags(&quiz.tags, &filter))
        .collect();

    let total = visible.len() as u64;
    let pages = total.div_ceil(limit);

    let summaries: Vec<QuizSummary> = visible
        .into_iter()
        .skip(usize::try_from((page - 1) * limit).unwrap_or(usize::MAX))
        .take(usize::try_from(limit).unwrap_or(usize::MAX))
        .map(|quiz| {
            let is_owner = viewer_id.is_some_and(|viewer| viewer == quiz.owner_id);
            quiz.as_summary(is_owner)
        })
        .collect();

    Ok(Json(QuizPage {
        quizzes: summaries,
        pagination: Pagination {
            page,
            limit,
            total,
            pages,
        },
    })
    .into_response())
}

#[utoipa::path(
    get,
    path = "/api/v0/quizzes/{quiz_id}",
    responses(
        (status = OK, body = Quiz, description = "The quiz including its questions"),
        (status = NOT_FOUND, description = "Unknown quiz, or a private quiz of another user"),
    ),
    tag = "v0/quizzes"
)]
pub(crate) async fn get_quiz(
    user: Option<ExtractUser>,
    Extension(conn): Extension<DatabaseConnection>,
    Path(quiz_id): Path<Uuid>,
) -> Result<Response, QuizError> {
    let user = user.map(|ExtractUser(user)| user);
    let quiz = get_quiz_by_id(&conn, &quiz_id).await?;

    if !can_view(user.as_ref(), &quiz) {
        return Err(QuizError::QuizNotFound);
    }

    Ok(Json(quiz).into_response())
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateQuizPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub questions: Option<Vec<QuestionPayload>>,
    pub visibility: Option<Visibility>,
    pub tags: Option<Vec<String>>,
}

#[utoipa::path(
    put,
    path = "/api/v0/quizzes/{quiz_id}",
    request_body = UpdateQuizPayload,
    responses(
        (status = OK, body = QuizSummary, description = "The updated quiz"),
        (status = BAD_REQUEST, description = "The merged quiz violates one or more validation rules"),
        (status = FORBIDDEN, description = "Caller is neither the owner nor an admin"),
        (status = NOT_FOUND, description = "Unknown quiz, or a private quiz of another user"),
    ),
    tag = "v0/quizzes",
    security(
        ("token" = [])
    )
)]
#[protect("Permission::Basic", ty = "Permission")]
pub(crate) async fn update_quiz(
    ExtractUser(user): ExtractUser,
    Extension(conn): Extension<DatabaseConnection>,
    Path(quiz_id): Path<Uuid>,
    Json(payload): Json<UpdateQuizPayload>,
) -> Result<Response, QuizError> {
    let quiz = get_quiz_by_id(&conn, &quiz_id).await?;
    require_modify(&user, &quiz)?;

    // Replaced fields join the stored ones and the whole aggregate passes
    // the validation gate again.
    let merged = QuizPayload {
        title: payload.title.unwrap_or(quiz.title),
        description: payload.description.or(quiz.description),
        questions: payload
            .questions
            .unwrap_or_else(|| quiz.questions.into_iter().map(Into::into).collect()),
        visibility: Some(payload.visibility.unwrap_or(quiz.visibility)),
        tags: payload.tags.unwrap_or(quiz.tags),
    };
    let validated: ValidatedQuiz = validate(merged).map_err(QuizError::Validation)?;

    let updated = quiz::Mutation::update_quiz(
        &conn,
        &quiz_id,
        &validated.title,
        validated.description.as_deref(),
        serde_json::to_value(&validated.questions)?,
        validated.visibility.into_db_model(),
        serde_json::to_value(&validated.tags)?,
    )
    .await?;

    tracing::info!(quiz = %quiz_id, user = %user.id, "updated quiz");
    let updated: Quiz = updated.try_into_model()?;
    let is_owner = updated.owner_id == user.id;
    Ok(Json(updated.as_summary(is_owner)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/v0/quizzes/{quiz_id}",
    responses(
        (status = NO_CONTENT, description = "Quiz deleted"),
        (status = FORBIDDEN, description = "Caller is neither the owner nor an admin"),
        (status = NOT_FOUND, description = "Unknown quiz, or a private quiz of another user"),
    ),
    tag = "v0/quizzes",
    security(
        ("token" = [])
    )
)]
#[protect("Permission::Basic", ty = "Permission")]
pub(crate) async fn delete_quiz(
    ExtractUser(user): ExtractUser,
    Extension(conn): Extension<DatabaseConnection>,
    Path(quiz_id): Path<Uuid>,
) -> Result<Response, QuizError> {
    let quiz = get_quiz_by_id(&conn, &quiz_id).await?;
    require_modify(&user, &quiz)?;

    quiz::Mutation::delete_quiz(&conn, &quiz_id).await?;
    tracing::info!(quiz = %quiz_id, user = %user.id, "deleted quiz");
    Ok(StatusCode::NO_CONTENT.into_response())
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct AttemptPayload {
    answers: Vec<AttemptAnswer>,
}

#[derive(Debug, serde::Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnswerOutcome {
    pub question_index: usize,
    pub selected_index: usize,
    pub correct_index: usize,
    pub correct: bool,
}

#[derive(Debug, serde::Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AttemptOutcome {
    pub id: Uuid,
    pub score: u32,
    pub total: u32,
    pub results: Vec<AnswerOutcome>,
}

fn score_answers(questions: &[Question], answers: &[AttemptAnswer]) -> Result<Vec<AnswerOutcome>, QuizError> {
    let mut seen = vec![false; questions.len()];
    let mut outcomes = Vec::with_capacity(answers.len());

    for answer in answers {
        let question = questions
            .get(answer.question_index)
            .ok_or(QuizError::InvalidAnswer("questionIndex is out of range"))?;
        if answer.selected_index >= question.options.len() {
            return Err(QuizError::InvalidAnswer("selectedIndex is out of range"));
        }
        let first_answer = seen
            .get_mut(answer.question_index)
            .ok_or(QuizError::InvalidAnswer("questionIndex is out of range"))?;
        if *first_answer {
            return Err(QuizError::InvalidAnswer("question answered more than once"));
        }
        *first_answer = true;

        outcomes.push(AnswerOutcome {
            question_index: answer.question_index,
            selected_index: answer.selected_index,
            correct_index: question.correct_index,
            correct: question.is_correct(answer.selected_index),
        });
    }

    Ok(outcomes)
}

#[utoipa::path(
    post,
    path = "/api/v0/quizzes/{quiz_id}/attempts",
    request_body = AttemptPayload,
    responses(
        (status = OK, body = AttemptOutcome, description = "The scored attempt with per-question results"),
        (status = BAD_REQUEST, description = "An answer references a question or option that does not exist"),
        (status = NOT_FOUND, description = "Unknown quiz, or a private quiz of another user"),
    ),
    tag = "v0/quizzes",
    security(
        ("token" = [])
    )
)]
#[protect("Permission::Basic", ty = "Permission")]
pub(crate) async fn submit_attempt(
    ExtractUser(user): ExtractUser,
    Extension(conn): Extension<DatabaseConnection>,
    Path(quiz_id): Path<Uuid>,
    Json(payload): Json<AttemptPayload>,
) -> Result<Response, QuizError> {
    let quiz = get_quiz_by_id(&conn, &quiz_id).await?;
    if !can_view(Some(&user), &quiz) {
        return Err(QuizError::QuizNotFound);
    }

    let outcomes = score_answers(&quiz.questions, &payload.answers)?;
    let score = outcomes.iter().filter(|outcome| outcome.correct).count();
    let total = quiz.questions.len();

    let recorded = attempt::Mutation::create_attempt(
        &conn,
        &user.id,
        &quiz_id,
        serde_json::to_value(&payload.answers)?,
        i32::try_from(score).unwrap_or(i32::MAX),
        i32::try_from(total).unwrap_or(i32::MAX),
    )
    .await?;

    tracing::info!(quiz = %quiz_id, user = %user.id, score, total, "recorded attempt");
    Ok(Json(AttemptOutcome {
        id: recorded.id,
        score: u32::try_from(score).unwrap_or(u32::MAX),
        total: u32::try_from(total).unwrap_or(u32::MAX),
        results: outcomes,
    })
    .into_response())
}

async fn get_quiz_by_id(conn: &DatabaseConnection, quiz_id: &Uuid) -> Result<Quiz, QuizError> {
    let result = quiz::Query::get_quiz_by_id(conn, quiz_id)
        .await?
        .ok_or(QuizError::QuizNotFound)?
        .try_into_model()?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct_index: usize) -> Question {
        Question {
            text: "What is 2+2?".to_owned(),
            options: vec!["3".to_owned(), "4".to_owned(), "5".to_owned()],
            correct_index,
            explanation: None,
        }
    }

    #[test]
    fn test_clamp_paging() {
        assert_eq!(clamp_paging(None, None), (1, 20));
        assert_eq!(clamp_paging(Some(0), Some(0)), (1, 1));
        assert_eq!(clamp_paging(Some(3), Some(500)), (3, 100));
    }

    #[test]
    fn test_matches_tags() {
        let tags = vec!["javascript".to_owned(), "basics".to_owned()];
        assert!(matches_tags(&tags, &[]));
        assert!(matches_tags(&tags, &["basics".to_owned(), "rust".to_owned()]));
        assert!(!matches_tags(&tags, &["rust".to_owned()]));
    }

    #[test]
    fn test_score_answers() {
        let questions = vec![question(1), question(0)];
        let answers = vec![
            AttemptAnswer {
                question_index: 0,
                selected_index: 1,
            },
            AttemptAnswer {
                question_index: 1,
                selected_index: 2,
            },
        ];
        let outcomes = score_answers(&questions, &answers).unwrap();
        assert!(outcomes[0].correct);
        assert!(!outcomes[1].correct);
        assert_eq!(outcomes.iter().filter(|o| o.correct).count(), 1);
    }

    #[test]
    fn test_score_rejects_out_of_range_question() {
        let answers = vec![AttemptAnswer {
            question_index: 5,
            selected_index: 0,
        }];
        assert!(score_answers(&[question(0)], &answers).is_err());
    }

    #[test]
    fn test_score_rejects_double_answer() {
        let answers = vec![
            AttemptAnswer {
                question_index: 0,
                selected_index: 0,
            },
            AttemptAnswer {
                question_index: 0,
                selected_index: 1,
            },
        ];
        assert!(score_answers(&[question(0)], &answers).is_err());
    }
}
