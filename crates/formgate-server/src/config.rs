//! Server configuration
//!
//! Read from an optional TOML file; command-line flags override it.

use anyhow::{Context, Result};
use formgate::ValidationMode;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 50051))
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_builtin_forms() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,

    /// Fallback filter when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Directory of `*.json` form schemas to register at startup
    #[serde(default)]
    pub forms_dir: Option<PathBuf>,

    #[serde(default)]
    pub validation_mode: ValidationMode,

    /// Register the built-in demo forms
    #[serde(default = "default_builtin_forms")]
    pub builtin_forms: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            log_level: default_log_level(),
            forms_dir: None,
            validation_mode: ValidationMode::default(),
            builtin_forms: default_builtin_forms(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("parsing server config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("loading {}", path.display()))
    }
}
