use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

pub fn create_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/version", get(version)).with_state(())
}

#[utoipa::path(
    get,
    path = "/version",
    responses(
        (status = OK, description = "returns the running package name and version")
    ),
    tag = "util"
)]
pub(crate) async fn version() -> impl IntoResponse {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
    .into_response()
}
