//! vqmon push (push deployment)
//!
//! Sends a fixed batch of `videostutter` samples to the configured push
//! gateway, one POST per sample, and exits non-zero if any push failed.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use vqmon_exporter::{config, obs, push::PushClient};

const BATCH: [(&str, &str, &str, f64); 6] = [
    ("ARO-001", "byteplus", "HD", 8.0),
    ("ARO-002", "tencent", "Hi", 12.0),
    ("SBO-001", "cdnnetwork", "Me", 15.0),
    ("BCR-001", "byteplus", "Lo", 3.0),
    ("ARO-001", "tencent", "HD", 18.0),
    ("ARO-002", "cdnnetwork", "Hi", 7.0),
];

const SPACING: Duration = Duration::from_millis(100);

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let path = config::Cli::parse().config;
    let (cfg, found) = config::load_or_default(&path)?;
    obs::init_tracing(&cfg.log)?;
    if !found {
        tracing::warn!(%path, "config file not found, using built-in defaults");
    }

    let client = PushClient::new(&cfg.push)?.with_catalog(&cfg.catalog);
    tracing::info!(url = client.url(), job = client.job(), samples = BATCH.len(), "pushing stutter batch");

    let mut ok = 0;
    for (table_id, cdn_id, quality, value) in BATCH {
        if client.send_video_stutter(table_id, cdn_id, quality, value).await {
            ok += 1;
        }
        tokio::time::sleep(SPACING).await;
    }

    tracing::info!(ok, total = BATCH.len(), "push batch finished");
    if ok == BATCH.len() {
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::warn!("some metrics failed to push");
        Ok(ExitCode::FAILURE)
    }
}
