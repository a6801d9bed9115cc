//! Metric model: descriptors, kinds, and label arguments.
//!
//! Descriptors are immutable once registered. Label arguments resolve
//! against a descriptor into values in the declared label order, which is
//! the only order the registry stores and the encoder renders.

use serde::Deserialize;

use crate::error::{MetricsError, Result};

/// Metric type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// Arbitrary settable value.
    Gauge,
    /// Monotonic value.
    Counter,
}

impl MetricKind {
    /// Lowercase type name as written in `# TYPE` lines.
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
            MetricKind::Counter => "counter",
        }
    }
}

/// Metric definition: name, kind, help text, and declared label names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricDescriptor {
    pub name: String,
    pub kind: MetricKind,
    #[serde(default)]
    pub help: String,
    #[serde(default, rename = "labels")]
    pub label_names: Vec<String>,
}

impl MetricDescriptor {
    pub fn new(name: &str, kind: MetricKind, help: &str, label_names: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            kind,
            help: help.to_string(),
            label_names: label_names.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn gauge(name: &str, help: &str, label_names: &[&str]) -> Self {
        Self::new(name, MetricKind::Gauge, help, label_names)
    }

    pub fn counter(name: &str, help: &str, label_names: &[&str]) -> Self {
        Self::new(name, MetricKind::Counter, help, label_names)
    }

    /// Check name syntax and label-name uniqueness.
    pub fn validate(&self) -> Result<()> {
        if !is_metric_name(&self.name) {
            return Err(MetricsError::InvalidDescriptor(format!(
                "bad metric name: {:?}",
                self.name
            )));
        }
        for (i, label) in self.label_names.iter().enumerate() {
            if !is_label_name(label) {
                return Err(MetricsError::InvalidDescriptor(format!(
                    "bad label name {:?} on {}",
                    label, self.name
                )));
            }
            if self.label_names[..i].contains(label) {
                return Err(MetricsError::InvalidDescriptor(format!(
                    "duplicate label name {:?} on {}",
                    label, self.name
                )));
            }
        }
        Ok(())
    }
}

/// `[a-zA-Z_:][a-zA-Z0-9_:]*`
pub fn is_metric_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

/// `[a-zA-Z_][a-zA-Z0-9_]*`, reserved `__` prefix excluded.
pub fn is_label_name(s: &str) -> bool {
    if s.starts_with("__") {
        return false;
    }
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Owned label name -> value mapping.
///
/// Keeps insertion order for iteration; equality ignores order.
#[derive(Debug, Clone, Default)]
pub struct LabelSet {
    pairs: Vec<(String, String)>,
}

impl LabelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or overwrite a label.
    pub fn insert(&mut self, name: &str, value: &str) {
        match self.pairs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.pairs.push((name.to_string(), value.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl PartialEq for LabelSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl Eq for LabelSet {}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for LabelSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = LabelSet::new();
        for (k, v) in iter {
            set.insert(k.as_ref(), v.as_ref());
        }
        set
    }
}

/// Empty positional label list, for metrics without labels.
pub const NO_LABELS: &[&str] = &[];

/// Anything that can be resolved into label values for a descriptor.
///
/// Positional slices must follow the declared order; named pairs may come
/// in any order but must name every declared label exactly once.
pub trait LabelArgs {
    fn resolve(&self, desc: &MetricDescriptor) -> Result<Vec<String>>;
}

impl LabelArgs for [&str] {
    fn resolve(&self, desc: &MetricDescriptor) -> Result<Vec<String>> {
        if self.len() != desc.label_names.len() {
            return Err(MetricsError::arity(
                &desc.name,
                format!(
                    "expected {} label values, got {}",
                    desc.label_names.len(),
                    self.len()
                ),
            ));
        }
        Ok(self.iter().map(|v| v.to_string()).collect())
    }
}

impl<const N: usize> LabelArgs for [&str; N] {
    fn resolve(&self, desc: &MetricDescriptor) -> Result<Vec<String>> {
        self.as_slice().resolve(desc)
    }
}

impl LabelArgs for [(&str, &str)] {
    fn resolve(&self, desc: &MetricDescriptor) -> Result<Vec<String>> {
        resolve_named(desc, self)
    }
}

impl<const N: usize> LabelArgs for [(&str, &str); N] {
    fn resolve(&self, desc: &MetricDescriptor) -> Result<Vec<String>> {
        resolve_named(desc, self.as_slice())
    }
}

impl LabelArgs for LabelSet {
    fn resolve(&self, desc: &MetricDescriptor) -> Result<Vec<String>> {
        resolve_named(desc, &self.pairs)
    }
}

/// Reorder named pairs into declared order; missing, extra, or repeated keys fail.
pub fn resolve_named<K, V>(desc: &MetricDescriptor, pairs: &[(K, V)]) -> Result<Vec<String>>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut slots: Vec<Option<String>> = vec![None; desc.label_names.len()];

    for (k, v) in pairs {
        let k = k.as_ref();
        let idx = desc
            .label_names
            .iter()
            .position(|n| n == k)
            .ok_or_else(|| MetricsError::arity(&desc.name, format!("unexpected label {k:?}")))?;
        if let Some(slot) = slots.get_mut(idx) {
            if slot.is_some() {
                return Err(MetricsError::arity(
                    &desc.name,
                    format!("label {k:?} given twice"),
                ));
            }
            *slot = Some(v.as_ref().to_string());
        }
    }

    slots
        .into_iter()
        .zip(&desc.label_names)
        .map(|(v, n)| v.ok_or_else(|| MetricsError::arity(&desc.name, format!("missing label {n:?}"))))
        .collect()
}
