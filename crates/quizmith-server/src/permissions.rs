use crate::user::ExtractUser;
use axum::RequestExt;
use axum::extract::{FromRequestParts, Request};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::Cached;
use http::StatusCode;
use http::request::Parts;
use quizmith_model::quiz::quiz::Quiz;
use quizmith_model::user::User;
use serde_derive::Serialize;
use std::collections::HashSet;

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Serialize)]
pub(crate) enum Permission {
    Basic, // any signed-in user
    Admin, // moderation and aggregate listings
}

#[derive(PartialEq, Eq, Clone, Debug, Default)]
struct Session {
    permissions: HashSet<Permission>,
}

#[derive(PartialEq, Eq, Clone, Debug, Serialize)]
pub(crate) struct Permissions(HashSet<Permission>);

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = ExtractUser::from_request_parts(parts, state).await;
        let Ok(ExtractUser(user)) = user else {
            return Ok(Session::default());
        };
        let permissions: Permissions = (&user).into();
        Ok(Session {
            permissions: permissions.0,
        })
    }
}

impl From<&User> for Permissions {
    fn from(user: &User) -> Self {
        let mut permissions = HashSet::from([Permission::Basic]);
        if user.is_admin() {
            permissions.insert(Permission::Admin);
        }
        Self(permissions)
    }
}

impl<S> FromRequestParts<S> for Permissions
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Cached::<Session>::from_request_parts(parts, state).await?.0;
        Ok(Self(session.permissions))
    }
}

pub(crate) async fn extract(request: &mut Request) -> Result<HashSet<Permission>, Response> {
    request
        .extract_parts::<Permissions>()
        .await
        .map(|permissions| permissions.0)
        .map_err(IntoResponse::into_response)
}

/// The one owner-or-admin predicate every mutating quiz operation uses.
pub(crate) fn can_modify(user: &User, quiz: &Quiz) -> bool {
    quiz.owner_id == user.id || user.is_admin()
}
