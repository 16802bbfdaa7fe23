use std::net::IpAddr;

use clap::{Args, Parser, Subcommand};
use quizmith_utils::args::llm::LlmService;

#[derive(Debug, Parser)]
#[command(name = "quizmith", about = "Run the quizmith quiz service")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    Run(Run),
}

#[derive(Debug, Clone, Args)]
#[group(multiple = true, required = false)]
pub(crate) struct Db {
    #[arg(long, help = "Min connections")]
    pub(crate) db_min_connections: Option<u32>,

    #[arg(long, help = "Max connections")]
    pub(crate) db_max_connections: Option<u32>,
}

#[derive(Debug, Clone, Parser)]
pub(crate) struct Run {
    #[arg(long)]
    pub(crate) host: Option<IpAddr>,

    #[arg(short, long)]
    pub(crate) port: Option<u16>,

    #[arg(long, help = "Allowed CORS origins")]
    pub(crate) origins: Vec<String>,

    #[command(flatten)]
    pub(crate) llm_services: LlmService,

    #[command(flatten)]
    pub(crate) db: Db,

    #[arg(long = "sentry-dsn", help = "Sentry url")]
    pub(crate) sentry_dsn: Option<String>,

    #[arg(
        long,
        default_value = "dev",
        help = "Set the environment used by sentry, prometheus and error reporting"
    )]
    pub(crate) env: String,

    #[arg(long)]
    pub(crate) otlp_endpoint: Option<String>,
}
