use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::{Extension, RequestPartsExt};
use axum_auth::AuthBearer;
use axum_extra::extract::Cached;
use http::StatusCode;
use http::request::Parts;
use quizmith_db::user;
use quizmith_model::user::User;
use quizmith_model_tools::convert::IntoModel;
use sea_orm::DatabaseConnection;
use std::error::Error;
use uuid::Uuid;

type Rejection = (StatusCode, &'static str);

#[derive(Clone)]
struct Session {
    user: User,
}

#[derive(Clone)]
pub(crate) struct ExtractUser(pub User);

#[derive(Clone)]
pub(crate) struct ExtractUserId(pub Uuid);

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Ok(AuthBearer(token)) = parts.extract::<AuthBearer>().await else {
            return Err((StatusCode::UNAUTHORIZED, "No authentication token provided"));
        };

        let Extension::<DatabaseConnection>(conn) =
            parts
                .extract::<Extension<DatabaseConnection>>()
                .await
                .map_err(|error| {
                    tracing::error!(
                        error = &error as &dyn Error,
                        "database connection not found in app data"
                    );
                    (StatusCode::INTERNAL_SERVER_ERROR, "Database Connection not found")
                })?;

        let Ok(Some(user)) = user::Query::find_by_token(&conn, &token).await else {
            return Err((StatusCode::UNAUTHORIZED, "Authentication failed."));
        };

        sentry::configure_scope(|scope| {
            scope.set_user(Some(sentry::User {
                id: Some(user.id.as_hyphenated().to_string()),
                ..Default::default()
            }));
        });

        Ok(Self { user: user.into_model() })
    }
}

impl<S> OptionalFromRequestParts<S> for ExtractUser
where
    S: Send + Sync,
{
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Option<Self>, Self::Rejection> {
        let Ok(session) = Cached::<Session>::from_request_parts(parts, state).await else {
            return Ok(None);
        };
        Ok(Some(Self(session.0.user)))
    }
}

impl<S> FromRequestParts<S> for ExtractUser
where
    S: Send + Sync,
{
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session: Session = Cached::<Session>::from_request_parts(parts, state).await?.0;
        Ok(Self(session.user))
    }
}

impl<S> OptionalFromRequestParts<S> for ExtractUserId
where
    S: Send + Sync,
{
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Option<Self>, Self::Rejection> {
        let session: Session = match Cached::<Session>::from_request_parts(parts, state).await {
            Ok(session) => session.0,
            Err(_) => return Ok(None),
        };
        Ok(Some(Self(session.user.id)))
    }
}

impl<S> FromRequestParts<S> for ExtractUserId
where
    S: Send + Sync,
{
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session: Session = Cached::<Session>::from_request_parts(parts, state).await?.0;
        Ok(Self(session.user.id))
    }
}
