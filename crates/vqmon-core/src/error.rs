//! Shared error type across vqmon crates.

use thiserror::Error;

/// Stable error codes (used in HTTP error bodies and log fields).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Metric name registered twice.
    DuplicateMetric,
    /// Metric name never registered.
    UnknownMetric,
    /// Gauge mutator used on a counter or vice versa.
    KindMismatch,
    /// Label values do not match the declared label names.
    LabelArity,
    /// NaN or infinite sample value.
    InvalidValue,
    /// Counter decrement attempt.
    NegativeDelta,
    /// Malformed metric or label name.
    InvalidDescriptor,
    /// Snapshot violates a registry invariant.
    Encoding,
    /// Push gateway unreachable or answered non-2xx.
    Transport,
    /// Configuration rejected at startup.
    InvalidConfig,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in responses and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::DuplicateMetric => "DUPLICATE_METRIC",
            ErrorCode::UnknownMetric => "UNKNOWN_METRIC",
            ErrorCode::KindMismatch => "KIND_MISMATCH",
            ErrorCode::LabelArity => "LABEL_ARITY",
            ErrorCode::InvalidValue => "INVALID_VALUE",
            ErrorCode::NegativeDelta => "NEGATIVE_DELTA",
            ErrorCode::InvalidDescriptor => "INVALID_DESCRIPTOR",
            ErrorCode::Encoding => "ENCODING",
            ErrorCode::Transport => "TRANSPORT",
            ErrorCode::InvalidConfig => "INVALID_CONFIG",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Unified error type used by core and exporter.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("metric already registered: {0}")]
    DuplicateMetric(String),
    #[error("unknown metric: {0}")]
    UnknownMetric(String),
    #[error("metric {metric} is a {actual}, not a {expected}")]
    KindMismatch {
        metric: String,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("label mismatch for {metric}: {detail}")]
    LabelArity { metric: String, detail: String },
    #[error("invalid value for {metric}: {value}")]
    InvalidValue { metric: String, value: f64 },
    #[error("negative delta for counter {metric}: {delta}")]
    NegativeDelta { metric: String, delta: f64 },
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),
    #[error("encoding failed: {0}")]
    Encoding(String),
    #[error("transport: {0}")]
    Transport(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl MetricsError {
    /// Map an error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            MetricsError::DuplicateMetric(_) => ErrorCode::DuplicateMetric,
            MetricsError::UnknownMetric(_) => ErrorCode::UnknownMetric,
            MetricsError::KindMismatch { .. } => ErrorCode::KindMismatch,
            MetricsError::LabelArity { .. } => ErrorCode::LabelArity,
            MetricsError::InvalidValue { .. } => ErrorCode::InvalidValue,
            MetricsError::NegativeDelta { .. } => ErrorCode::NegativeDelta,
            MetricsError::InvalidDescriptor(_) => ErrorCode::InvalidDescriptor,
            MetricsError::Encoding(_) => ErrorCode::Encoding,
            MetricsError::Transport(_) => ErrorCode::Transport,
            MetricsError::InvalidConfig(_) => ErrorCode::InvalidConfig,
            MetricsError::Internal(_) => ErrorCode::Internal,
        }
    }

    pub(crate) fn arity(metric: &str, detail: impl Into<String>) -> Self {
        MetricsError::LabelArity {
            metric: metric.to_string(),
            detail: detail.into(),
        }
    }
}
