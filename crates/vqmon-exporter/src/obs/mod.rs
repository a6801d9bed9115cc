//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins over `log.level` when set.

use tracing_subscriber::{fmt, EnvFilter};

use vqmon_core::error::{MetricsError, Result};

use crate::config::{LogFormat, LogSection};

pub fn init_tracing(cfg: &LogSection) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => EnvFilter::try_new(&cfg.level)
            .map_err(|_| MetricsError::InvalidConfig(format!("invalid log level: {}", cfg.level)))?,
    };

    let builder = fmt().with_env_filter(filter);
    let res = match cfg.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    res.map_err(|e| MetricsError::Internal(format!("tracing init failed: {e}")))
}
