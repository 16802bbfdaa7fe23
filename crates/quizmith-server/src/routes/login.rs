use crate::auth::{PASSWORD_MIN, hash_password, verify_password};
use crate::routes::error::{ErrorData, LoginError, LoginErrorType};
use crate::user::ExtractUserId;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use http::StatusCode;
use quizmith_db::{access_tokens, user};
use quizmith_entity::user::Role;
use quizmith_model::login::{Credentials, Registration, Token};
use quizmith_model::user::User;
use quizmith_model_tools::convert::IntoModel;
use sea_orm::DatabaseConnection;
use std::borrow::Cow;
use std::error::Error;

pub fn create_router<S: Clone + Send + Sync + 'static>() -> Router<S> {
    Router::new()
        .route("/whoami", get(whoami))
        .route("/logout", post(logout))
        .route("/register", post(register))
        .nest("/login", Router::new().route("/password", post(login_password)))
        .with_state(())
}

#[utoipa::path(
    post,
    path = "/register",
    request_body = Registration,
    responses(
        (status = CREATED, description = "Account created", body = User),
        (status = BAD_REQUEST, description = "Email or password does not meet the requirements", body = ErrorData<LoginErrorType>),
        (status = CONFLICT, description = "Email is already registered", body = ErrorData<LoginErrorType>),
    ),
    tag = "auth"
)]
pub(crate) async fn register(
    Extension(conn): Extension<DatabaseConnection>,
    Json(payload): Json<Registration>,
) -> Result<impl IntoResponse, LoginError> {
    let email = payload.email.trim().to_ascii_lowercase();
    if !email.contains('@') || email.len() < 3 {
        return Err(LoginError::InvalidRegistration("email address is not valid"));
    }
    if payload.password.len() < PASSWORD_MIN {
        return Err(LoginError::InvalidRegistration("password must be at least 8 characters"));
    }

    if user::Query::find_by_email(&conn, &email).await?.is_some() {
        return Err(LoginError::EmailTaken);
    }

    let password_hash = hash_password(&payload.password)?;
    let name = payload.name.as_deref().map(str::trim).filter(|name| !name.is_empty());
    let created = user::Mutation::create_user(&conn, &email, name, &password_hash, Role::User).await?;

    tracing::info!(user = %created.id, "registered new user");
    let user: User = created.into_model();
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    post,
    path = "/login/password",
    request_body = Credentials,
    responses(
        (status = OK, description = "Successful login, returns Bearer token", body = Token, example = json!( Token { access_token: "abcToken12345678".into() })),
        (status = UNAUTHORIZED, description = "Authentication failed", body = ErrorData<LoginErrorType>),
    ),
    tag = "auth"
)]
pub(crate) async fn login_password(
    Extension(conn): Extension<DatabaseConnection>,
    Json(payload): Json<Credentials>,
) -> Result<Json<Token>, LoginError> {
    let email = payload.email.trim().to_ascii_lowercase();

    let user = user::Query::find_by_email(&conn, &email)
        .await?
        .ok_or(LoginError::InvalidCredentials)?;

    let Some(password_hash) = user.password_hash.as_deref() else {
        tracing::warn!(user = %user.id, "login attempt for account without password");
        return Err(LoginError::InvalidCredentials);
    };
    verify_password(&payload.password, password_hash)?;

    let access_token = access_tokens::Mutation::create_access_token(&conn, user.id).await?;

    Ok(Json(Token {
        access_token: access_token.access_token,
    }))
}

async fn whoami(user: Option<ExtractUserId>) -> impl IntoResponse {
    match user {
        None => {
            tracing::debug!("no user found");
            (StatusCode::NOT_FOUND, Cow::Borrowed("no user"))
        }
        Some(user) => (StatusCode::OK, Cow::Owned(format!("Hello {}", user.0))),
    }
}

#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = NO_CONTENT, description = "User Logged out successfully"),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to delete access token")
    ),
    tag = "auth",
    security(
        ("token" = [])
    )
)]
pub(crate) async fn logout(
    ExtractUserId(user_id): ExtractUserId,
    Extension(conn): Extension<DatabaseConnection>,
) -> impl IntoResponse {
    if let Err(error) = access_tokens::Mutation::delete_access_token(&conn, user_id).await {
        tracing::error!(
            user = %user_id,
            error = &error as &dyn Error,
            "failed to delete access token"
        );
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    tracing::debug!(user = %user_id, "user logged out");
    StatusCode::NO_CONTENT
}
