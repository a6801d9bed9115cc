//! Exporter config loader (strict parsing).

pub mod schema;

use std::fs;
use std::path::Path;

use clap::Parser;
use vqmon_core::error::{MetricsError, Result};

pub use schema::{
    default_catalog, ExporterConfig, ExporterSection, LogFormat, LogSection, PushSection,
    SimulationSection,
};

/// Env var consulted when no path is given on the command line.
pub const CONFIG_ENV: &str = "VQMON_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "vqmon.yaml";

pub fn load_from_file(path: &str) -> Result<ExporterConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| MetricsError::Internal(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ExporterConfig> {
    let cfg: ExporterConfig = serde_yaml::from_str(s)
        .map_err(|e| MetricsError::InvalidConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load `path`, falling back to built-in defaults when the file does not exist.
/// Returns the config and whether the file was found.
pub fn load_or_default(path: &str) -> Result<(ExporterConfig, bool)> {
    if !Path::new(path).exists() {
        return Ok((ExporterConfig::default(), false));
    }
    Ok((load_from_file(path)?, true))
}

/// Command line shared by both binaries.
#[derive(Debug, Parser)]
#[command(version, about = "Video playback quality metrics exporter")]
pub struct Cli {
    /// Path to the YAML config file (missing file means built-in defaults).
    #[arg(short, long, env = CONFIG_ENV, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,
}
