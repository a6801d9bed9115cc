use serde::Deserialize;
use vqmon_core::error::{MetricsError, Result};
use vqmon_core::{MetricDescriptor, MetricKind};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    pub version: u32,

    #[serde(default)]
    pub exporter: ExporterSection,

    #[serde(default)]
    pub push: PushSection,

    #[serde(default)]
    pub log: LogSection,

    #[serde(default = "default_catalog")]
    pub catalog: Vec<MetricDescriptor>,

    #[serde(default)]
    pub simulation: SimulationSection,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            version: 1,
            exporter: ExporterSection::default(),
            push: PushSection::default(),
            log: LogSection::default(),
            catalog: default_catalog(),
            simulation: SimulationSection::default(),
        }
    }
}

impl ExporterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MetricsError::InvalidConfig(format!(
                "unsupported config version {}",
                self.version
            )));
        }
        if self.catalog.is_empty() {
            return Err(MetricsError::InvalidConfig("catalog must not be empty".into()));
        }
        for (i, desc) in self.catalog.iter().enumerate() {
            desc.validate()
                .map_err(|e| MetricsError::InvalidConfig(format!("catalog[{i}]: {e}")))?;
            if self.catalog[..i].iter().any(|d| d.name == desc.name) {
                return Err(MetricsError::InvalidConfig(format!(
                    "catalog declares {} twice",
                    desc.name
                )));
            }
        }

        self.exporter.validate()?;
        self.push.validate()?;
        self.simulation.validate(&self.catalog)?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_update_interval_ms")]
    pub update_interval_ms: u64,
}

impl Default for ExporterSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            update_interval_ms: default_update_interval_ms(),
        }
    }
}

impl ExporterSection {
    pub fn validate(&self) -> Result<()> {
        if self.listen.parse::<std::net::SocketAddr>().is_err() {
            return Err(MetricsError::InvalidConfig(format!(
                "exporter.listen is not a socket address: {}",
                self.listen
            )));
        }
        if !(100..=3_600_000).contains(&self.update_interval_ms) {
            return Err(MetricsError::InvalidConfig(
                "exporter.update_interval_ms must be between 100 and 3600000".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PushSection {
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,

    #[serde(default = "default_job")]
    pub job: String,

    #[serde(default = "default_push_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for PushSection {
    fn default() -> Self {
        Self {
            gateway_url: default_gateway_url(),
            job: default_job(),
            timeout_ms: default_push_timeout_ms(),
        }
    }
}

impl PushSection {
    pub fn validate(&self) -> Result<()> {
        if !(self.gateway_url.starts_with("http://") || self.gateway_url.starts_with("https://")) {
            return Err(MetricsError::InvalidConfig(format!(
                "push.gateway_url must be an http(s) url: {}",
                self.gateway_url
            )));
        }
        // Job becomes a URL path segment: unreserved characters only.
        let segment_safe = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~');
        if self.job.is_empty() || !self.job.chars().all(segment_safe) {
            return Err(MetricsError::InvalidConfig(format!(
                "push.job must be non-empty and use only [A-Za-z0-9._~-]: {:?}",
                self.job
            )));
        }
        if !(100..=60_000).contains(&self.timeout_ms) {
            return Err(MetricsError::InvalidConfig(
                "push.timeout_ms must be between 100 and 60000".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogSection {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationSection {
    #[serde(default = "default_sim_gauge")]
    pub gauge: String,

    #[serde(default = "default_sim_counter")]
    pub counter: String,

    #[serde(default = "default_tables")]
    pub tables: Vec<String>,

    #[serde(default = "default_cdns")]
    pub cdns: Vec<String>,

    #[serde(default = "default_qualities")]
    pub qualities: Vec<String>,

    #[serde(default = "default_max_stutter")]
    pub max_stutter: f64,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            gauge: default_sim_gauge(),
            counter: default_sim_counter(),
            tables: default_tables(),
            cdns: default_cdns(),
            qualities: default_qualities(),
            max_stutter: default_max_stutter(),
        }
    }
}

impl SimulationSection {
    /// The driven metrics must exist with the kind and arity the driver writes.
    pub fn validate(&self, catalog: &[MetricDescriptor]) -> Result<()> {
        check_driven(catalog, &self.gauge, MetricKind::Gauge, 3)?;
        check_driven(catalog, &self.counter, MetricKind::Counter, 2)?;

        if self.tables.is_empty() || self.cdns.is_empty() || self.qualities.is_empty() {
            return Err(MetricsError::InvalidConfig(
                "simulation.tables, cdns and qualities must not be empty".into(),
            ));
        }
        if !self.max_stutter.is_finite() || self.max_stutter <= 0.0 {
            return Err(MetricsError::InvalidConfig(
                "simulation.max_stutter must be a positive number".into(),
            ));
        }
        Ok(())
    }
}

fn check_driven(catalog: &[MetricDescriptor], name: &str, kind: MetricKind, arity: usize) -> Result<()> {
    let desc = catalog.iter().find(|d| d.name == name).ok_or_else(|| {
        MetricsError::InvalidConfig(format!("simulation metric {name} is not in the catalog"))
    })?;
    if desc.kind != kind || desc.label_names.len() != arity {
        return Err(MetricsError::InvalidConfig(format!(
            "simulation metric {name} must be a {} with {arity} labels",
            kind.as_str()
        )));
    }
    Ok(())
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_update_interval_ms() -> u64 {
    5000
}
fn default_gateway_url() -> String {
    "http://localhost:9091".into()
}
fn default_job() -> String {
    "studio-web-player".into()
}
fn default_push_timeout_ms() -> u64 {
    5000
}
fn default_log_level() -> String {
    "info".into()
}
fn default_sim_gauge() -> String {
    "videostutter".into()
}
fn default_sim_counter() -> String {
    "video_play_total".into()
}
fn default_tables() -> Vec<String> {
    ["ARO-001", "ARO-002", "SBO-001", "BCR-001"].map(String::from).to_vec()
}
fn default_cdns() -> Vec<String> {
    ["byteplus", "tencent", "cdnnetwork"].map(String::from).to_vec()
}
fn default_qualities() -> Vec<String> {
    ["HD", "Hi", "Me", "Lo"].map(String::from).to_vec()
}
fn default_max_stutter() -> f64 {
    20.0
}

pub fn default_catalog() -> Vec<MetricDescriptor> {
    vec![
        MetricDescriptor::gauge(
            "videostutter",
            "Video stutter metric for studio web player",
            &["table_id", "cdn_id", "quality"],
        ),
        MetricDescriptor::counter(
            "video_play_total",
            "Total number of video plays",
            &["table_id", "cdn_id"],
        ),
    ]
}
