use crate::db::error::DbError::UnknownDbType;
use crate::db::migration;
use crate::opt::{Commands, Db, Run};
use anyhow::{Result, anyhow};
use axum::serve;
use clap::Parser;

use quizmith_core::llm_config::LlmConfig;
use quizmith_db::sea_orm::{ConnectOptions, Database};
use quizmith_utils::net::create_listener;
use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use url::Url;

mod app;
mod auth;
mod db;
mod opt;
mod permissions;
mod routes;
mod user;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
const DEFAULT_PORT: u16 = 3030;

#[derive(Debug)]
pub(crate) struct InnerAppConfig {
    llm_config: LlmConfig,
    env: String,
}

#[derive(Clone, Debug)]
pub(crate) struct AppConfig(Arc<InnerAppConfig>);

impl AppConfig {
    fn new(llm_config: LlmConfig, env: String) -> Self {
        Self(Arc::new(InnerAppConfig { llm_config, env }))
    }

    pub fn llm_config(&self) -> &LlmConfig {
        &self.0.llm_config
    }

    /// Diagnostic payloads (raw model output) are only surfaced when this
    /// is true.
    pub fn is_dev(&self) -> bool {
        self.0.env == "dev"
    }
}

async fn run(opt: Run) -> Result<()> {
    let _guard = quizmith_utils::tracing::setup(
        quizmith_utils::tracing::TracingConfig::builder()
            .package(env!("CARGO_PKG_NAME"))
            .version(env!("CARGO_PKG_VERSION"))
            .otlp_endpoint(opt.otlp_endpoint)
            .sentry_dsn(opt.sentry_dsn)
            .env(opt.env.clone())
            .build(),
    );

    let db_engine_type = env::var("ENGINE_DB_TYPE").map_err(|e| anyhow!("Cant find env: \"ENGINE_DB_TYPE\" {e:?}"))?;
    let db_url_string = match db_engine_type.as_str() {
        #[cfg(feature = "sqlite")]
        "sqlite" => env::var("SQLITE_URL")?,

        #[cfg(feature = "postgres")]
        "postgresql" => env::var("POSTGRESQL_URL")?,

        _ => return Err(UnknownDbType(db_engine_type).into()),
    };
    let db_url = Url::parse(&db_url_string)?;
    migration(&db_url)
        .await
        .inspect_err(|error| tracing::error!(error = error as &dyn std::error::Error, "failed to run migrations"))?;

    let seaorm_pool_options = build_connect_options(&opt.db, db_url);
    let seaorm_pool = Database::connect(seaorm_pool_options).await?;

    let llm_config: LlmConfig = opt.llm_services.into();

    let Run {
        host, port, origins, env, ..
    } = opt;

    let app_config = AppConfig::new(llm_config, env);

    let app = app::create_app(app_config, origins, seaorm_pool).await?;

    let listener = create_listener((host, port), (DEFAULT_HOST, DEFAULT_PORT)).await?;

    let service = app.into_make_service();
    tracing::info!(local_addr = %listener.local_addr()?, "starting app");
    serve::serve(listener, service).await?;
    Ok(())
}

fn build_connect_options(db_options: &Db, db_url: Url) -> ConnectOptions {
    let mut seaorm_pool_options = ConnectOptions::new(db_url);
    if let Some(min_connections) = db_options.db_min_connections {
        seaorm_pool_options.min_connections(min_connections);
    }
    if let Some(max_connections) = db_options.db_max_connections {
        seaorm_pool_options.max_connections(max_connections);
    }
    seaorm_pool_options.sqlx_logging_level(log::LevelFilter::Debug);
    seaorm_pool_options
}

fn main() -> Result<()> {
    let main = async {
        let opt = opt::Cli::parse();

        match opt.command {
            Commands::Run(o) => run(o).await?,
        }
        Ok(())
    };

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(main)
}
