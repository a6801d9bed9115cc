//! Push client for an intermediary push gateway.
//!
//! Each call formats one sample into a single exposition line and POSTs it
//! to `{gateway_url}/metrics/job/{job}`. One attempt per call: no retry, no
//! backoff. The registry is never touched here.
//!
//! Label order: samples for metrics in the client's catalog are rendered in
//! the declared label order (the same order the scrape encoder uses) and
//! must carry exactly the declared labels. Metrics outside the catalog keep
//! the caller's order; their names are still checked and a label name may
//! appear only once.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

use vqmon_core::error::{MetricsError, Result};
use vqmon_core::exposition::format_sample;
use vqmon_core::model::{is_label_name, is_metric_name, resolve_named};
use vqmon_core::MetricDescriptor;

use crate::config::PushSection;

/// Transient sample for one push call.
#[derive(Debug, Clone, PartialEq)]
pub struct PushSample {
    pub name: String,
    pub value: f64,
    pub labels: Vec<(String, String)>,
}

impl PushSample {
    pub fn new(name: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            value,
            labels: Vec::new(),
        }
    }

    /// Append a label (insertion order is kept).
    pub fn label(mut self, name: &str, value: &str) -> Self {
        self.labels.push((name.to_string(), value.to_string()));
        self
    }
}

pub struct PushClient {
    http: reqwest::Client,
    url: String,
    job: String,
    catalog: HashMap<String, MetricDescriptor>,
}

impl PushClient {
    /// Build a client with the configured request timeout.
    pub fn new(cfg: &PushSection) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(|e| MetricsError::Internal(format!("http client build failed: {e}")))?;

        Ok(Self {
            http,
            url: format!(
                "{}/metrics/job/{}",
                cfg.gateway_url.trim_end_matches('/'),
                cfg.job
            ),
            job: cfg.job.clone(),
            catalog: HashMap::new(),
        })
    }

    /// Render catalogued metrics in their declared label order.
    pub fn with_catalog(mut self, catalog: &[MetricDescriptor]) -> Self {
        self.catalog = catalog
            .iter()
            .map(|d| (d.name.clone(), d.clone()))
            .collect();
        self
    }

    /// Full push URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn job(&self) -> &str {
        &self.job
    }

    /// One exposition line, no trailing newline.
    pub fn format(&self, sample: &PushSample) -> Result<String> {
        if !is_metric_name(&sample.name) {
            return Err(MetricsError::InvalidDescriptor(format!(
                "invalid metric name: {:?}",
                sample.name
            )));
        }
        match self.catalog.get(&sample.name) {
            Some(desc) => {
                let values = resolve_named(desc, &sample.labels)?;
                let ordered: Vec<(&str, &str)> = desc
                    .label_names
                    .iter()
                    .map(String::as_str)
                    .zip(values.iter().map(String::as_str))
                    .collect();
                Ok(format_sample(&sample.name, &ordered, sample.value))
            }
            None => {
                check_free_labels(sample)?;
                Ok(format_sample(&sample.name, &sample.labels, sample.value))
            }
        }
    }

    /// Push one sample; any failure comes back as an error value.
    pub async fn try_send(&self, sample: &PushSample) -> Result<()> {
        let mut body = self.format(sample)?;
        body.push('\n');

        let response = self
            .http
            .post(&self.url)
            .header(CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await
            .map_err(|e| MetricsError::Transport(format!("POST {} failed: {e}", self.url)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MetricsError::Transport(format!(
                "gateway answered {status} for {}",
                self.url
            )));
        }
        Ok(())
    }

    /// Push one sample. True iff the gateway answered 2xx; failures are
    /// logged, never raised.
    pub async fn send(&self, sample: &PushSample) -> bool {
        match self.try_send(sample).await {
            Ok(()) => {
                tracing::info!(metric = %sample.name, value = sample.value, job = %self.job, "metric pushed");
                true
            }
            Err(e) => {
                tracing::warn!(metric = %sample.name, code = e.code().as_str(), error = %e, "metric push failed");
                false
            }
        }
    }

    /// Push a `videostutter` sample for one table/CDN/quality combination.
    pub async fn send_video_stutter(&self, table_id: &str, cdn_id: &str, quality: &str, value: f64) -> bool {
        let sample = PushSample::new("videostutter", value)
            .label("table_id", table_id)
            .label("cdn_id", cdn_id)
            .label("quality", quality);
        self.send(&sample).await
    }
}

fn check_free_labels(sample: &PushSample) -> Result<()> {
    for (i, (name, _)) in sample.labels.iter().enumerate() {
        if !is_label_name(name) {
            return Err(MetricsError::InvalidDescriptor(format!(
                "invalid label name for {}: {name:?}",
                sample.name
            )));
        }
        if sample.labels[..i].iter().any(|(prev, _)| prev == name) {
            return Err(MetricsError::LabelArity {
                metric: sample.name.clone(),
                detail: format!("label {name} given twice"),
            });
        }
    }
    Ok(())
}
