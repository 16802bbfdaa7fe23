use crate::{AppConfig, routes};
use axum::routing::get;
use axum::{Extension, Router};
use axum_prometheus::PrometheusMetricLayerBuilder;
use crate::permissions::extract;
use http::{Method, header};
use protect_axum::GrantsLayer;
use sea_orm::DatabaseConnection;
use sentry_tower::NewSentryLayer;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

pub async fn create_app(
    app_config: AppConfig,
    origins: Vec<String>,
    seaorm_pool: DatabaseConnection,
) -> anyhow::Result<Router> {
    let (prometheus_layer, metric_handle) = PrometheusMetricLayerBuilder::new()
        .with_prefix("api")
        .with_default_metrics()
        .build_pair();

    // CORS for account routes - users don't have credentials yet while
    // registering or signing in
    let login_cors = CorsLayer::new()
        .allow_origin(
            origins
                .iter()
                .map(|origin| origin.parse())
                .collect::<Result<Vec<_>, _>>()?,
        )
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE, header::ORIGIN])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    // CORS for API routes - users have credentials for authenticated endpoints
    let api_cors = CorsLayer::new()
        .allow_origin(
            origins
                .iter()
                .map(|origin| origin.parse())
                .collect::<Result<Vec<_>, _>>()?,
        )
        .allow_headers([
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ORIGIN,
        ])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .max_age(Duration::from_secs(3600));

    let mut app = Router::new()
        .merge(routes::swagger::create_router())
        .merge(routes::global::create_router());

    app = app.merge(routes::login::create_router().layer(login_cors));

    let app = app
        .nest(
            "/api/v0",
            Router::new()
                .nest("/status", routes::api::v0::status::create_router())
                .nest(
                    "/quizzes",
                    routes::api::v0::quiz::create_router()
                        .nest("/generate", routes::api::v0::generate::create_router()),
                )
                .nest("/attempts", routes::api::v0::attempts::create_router())
                .nest("/explain", routes::api::v0::explain::create_router())
                .nest("/admin", routes::api::v0::admin::create_router())
                .layer(api_cors),
        )
        .route("/metrics", get(|| async move { metric_handle.render() }))
        .layer(
            // Router layers are called bottom to top
            // ServiceBuilder layers are called top to bottom
            ServiceBuilder::new()
                .layer(NewSentryLayer::new_from_top())
                .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
                .layer(prometheus_layer)
                .layer(Extension(app_config))
                .layer(Extension(seaorm_pool))
                .layer(GrantsLayer::with_extractor(extract)),
        )
        .with_state(());
    Ok(app)
}
