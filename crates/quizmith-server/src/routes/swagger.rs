use super::api;
use super::global;
use super::login;

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder};
use utoipa::{Modify, OpenApi, openapi::security::SecurityScheme};
use utoipa_rapidoc::RapiDoc;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

struct SecurityAddon;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::v0::status::get_status,
        api::v0::quiz::create_quiz,
        api::v0::quiz::get_quizzes,
        api::v0::quiz::get_quiz,
        api::v0::quiz::update_quiz,
        api::v0::quiz::delete_quiz,
        api::v0::quiz::submit_attempt,
        api::v0::attempts::get_attempts,
        api::v0::generate::generate,
        api::v0::generate::generate_from_document,
        api::v0::explain::explain,
        api::v0::admin::list_users,
        api::v0::admin::list_quizzes,
        login::register,
        login::login_password,
        login::logout,
        global::version,
    ),
    modifiers(&SecurityAddon),
    tags()
)]
struct ApiDoc;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        // we can unwrap safely, since there already are components registered.
        let components = openapi.components.as_mut().expect("components not registered");
        components.add_security_scheme(
            "token",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some("Api Token"))
                    .build(),
            ),
        );
    }
}

pub fn create_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Redoc::with_url("/redoc", ApiDoc::openapi()))
        // There is no need to create `RapiDoc::with_openapi` because the OpenApi is served
        // via SwaggerUi instead we only make rapidoc to point to the existing doc.
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/rapidoc"))
}
