//! Form validation server
//!
//! Serves registered forms over HTTP: fetch a schema, validate a
//! submission, send a valid submission to its handler.

use anyhow::{Context, Result};
use clap::Parser;
use formgate::{EngineConfig, FormEngine, FormRegistry, ValidationMode};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod forms;
mod routes;

use config::ServerConfig;

#[derive(Parser, Debug)]
#[command(name = "formgate-server")]
#[command(about = "HTTP server for declarative form validation")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind to
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Directory of JSON form schemas
    #[arg(long)]
    forms_dir: Option<PathBuf>,

    /// Stop checking values after the first failing field
    #[arg(long, default_value = "false")]
    fail_fast: bool,

    /// Do not register the built-in demo forms
    #[arg(long, default_value = "false")]
    no_builtin_forms: bool,
}

impl Args {
    fn apply(self, mut config: ServerConfig) -> ServerConfig {
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if let Some(dir) = self.forms_dir {
            config.forms_dir = Some(dir);
        }
        if self.fail_fast {
            config.validation_mode = ValidationMode::FailFast;
        }
        if self.no_builtin_forms {
            config.builtin_forms = false;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    let config = args.apply(config);

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("invalid log level")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let registry = Arc::new(FormRegistry::new());
    if config.builtin_forms {
        forms::register_builtin(&registry)?;
    }
    if let Some(dir) = &config.forms_dir {
        forms::register_dir(&registry, dir)?;
    }
    if registry.is_empty() {
        warn!("No forms registered");
    }
    info!("Forms: {:?}", registry.names());
    info!("Validation mode: {:?}", config.validation_mode);

    let engine = FormEngine::with_config(
        registry,
        EngineConfig::default().with_mode(config.validation_mode),
    );
    let app = routes::router(engine);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    info!("Starting form server on http://{}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(err) => warn!("Unable to listen for shutdown signal: {}", err),
    }
}
