//! pnmock server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), optionally
//! seeds the record log from a JSON file, and serves the emulated
//! notification platform over HTTP.
//!
//! ```text
//! cargo run -p pnmock-server -- --config config.toml
//! ```

mod config;

use std::{path::Path, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use pnmock_core::{
  DomainEnv,
  env::SystemClock,
  record::{Record, parse_records},
};
use pnmock_store_memory::MemoryStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

#[derive(Parser)]
#[command(author, version, about = "Notification platform mock server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: std::path::PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = ::config::Config::builder()
    .add_source(::config::File::from(cli.config).required(false))
    .add_source(::config::Environment::with_prefix("PNMOCK"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Seed the log.
  let records = match &server_cfg.seed_path {
    Some(path) => load_seed(path)?,
    None => Vec::new(),
  };
  tracing::info!(records = records.len(), "record log ready");
  let store =
    MemoryStore::with_records(records).with_span(tracing::info_span!("pnmock_store"));

  let env = DomainEnv::new(
    server_cfg.api_key.clone(),
    server_cfg.sender_pa_id.clone(),
    Arc::new(SystemClock),
  );

  let app = pnmock_api::api_router(Arc::new(store), env).layer(TraceLayer::new_for_http());
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read a JSON array of records from `path`.
fn load_seed(path: &Path) -> anyhow::Result<Vec<Record>> {
  let json = std::fs::read_to_string(path)
    .with_context(|| format!("failed to read seed file {path:?}"))?;
  parse_records(&json).with_context(|| format!("failed to parse seed file {path:?}"))
}
