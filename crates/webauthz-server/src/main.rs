//! webauthz example server
//!
//! A resource server whose routes are protected by webauthz, backed by the
//! in-memory token store seeded from a TOML file.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod config;
mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use webauthz::Webauthz;
use webauthz_memory::MemoryValidator;

use crate::config::{ServerConfig, DEFAULT_BIND};

/// webauthz example resource server
#[derive(Parser, Debug)]
#[command(name = "webauthz-server")]
#[command(about = "Resource server protected by bearer-token scopes", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, env = "WEBAUTHZ_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address (overrides the config file)
    #[arg(short, long, env = "WEBAUTHZ_BIND")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = ServerConfig::load(args.config.as_deref())?;

    let store = Arc::new(MemoryValidator::new());
    config.seed(&store);

    let authz = Webauthz::builder()
        .validator(store)
        .settings(config.webauthz.clone())
        .build()?;

    if authz.settings().discovery_uri.is_none() {
        tracing::warn!("no discovery_uri configured; 401 responses will carry no challenge");
    }

    let bind = args
        .bind
        .or(config.bind)
        .unwrap_or_else(|| DEFAULT_BIND.to_string());
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    tracing::info!(%bind, realm = %authz.settings().realm, "webauthz-server listening");

    axum::serve(listener, routes::router(&authz))
        .await
        .context("server error")?;
    Ok(())
}
