//! Metric registry: descriptors plus the current value of every series.
//!
//! One `RwLock` guards the whole registry. Mutations take it exclusively for
//! the duration of a single update, snapshots take it shared, so a scrape
//! always sees one point in time and never a half-registered metric.
//!
//! Series are keyed by label values in declared order and kept in a
//! `BTreeMap`, which gives snapshots a stable series order for free.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{MetricsError, Result};
use crate::model::{LabelArgs, LabelSet, MetricDescriptor, MetricKind};

struct Family {
    desc: MetricDescriptor,
    series: BTreeMap<Vec<String>, f64>,
}

#[derive(Default)]
struct Inner {
    /// Registration order.
    families: Vec<Family>,
    index: HashMap<String, usize>,
}

impl Inner {
    fn family_mut(&mut self, name: &str, kind: MetricKind) -> Result<&mut Family> {
        let idx = *self
            .index
            .get(name)
            .ok_or_else(|| MetricsError::UnknownMetric(name.to_string()))?;
        let family = self
            .families
            .get_mut(idx)
            .ok_or_else(|| MetricsError::Internal(format!("dangling index for {name}")))?;
        if family.desc.kind != kind {
            return Err(MetricsError::KindMismatch {
                metric: name.to_string(),
                expected: kind.as_str(),
                actual: family.desc.kind.as_str(),
            });
        }
        Ok(family)
    }
}

/// Process-wide metric registry. Construct one and share it by reference.
#[derive(Default)]
pub struct Registry {
    inner: RwLock<Inner>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| MetricsError::Internal("registry lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| MetricsError::Internal("registry lock poisoned".into()))
    }

    /// Register a descriptor with an empty series map.
    pub fn register(&self, desc: MetricDescriptor) -> Result<()> {
        desc.validate()?;

        let mut inner = self.write()?;
        if inner.index.contains_key(&desc.name) {
            return Err(MetricsError::DuplicateMetric(desc.name));
        }

        tracing::debug!(metric = %desc.name, kind = desc.kind.as_str(), labels = ?desc.label_names, "metric registered");
        let idx = inner.families.len();
        inner.index.insert(desc.name.clone(), idx);
        inner.families.push(Family {
            desc,
            series: BTreeMap::new(),
        });
        Ok(())
    }

    /// Register every descriptor, stopping at the first failure.
    pub fn register_all<I>(&self, descs: I) -> Result<()>
    where
        I: IntoIterator<Item = MetricDescriptor>,
    {
        descs.into_iter().try_for_each(|d| self.register(d))
    }

    /// Descriptor for a registered metric.
    pub fn descriptor(&self, name: &str) -> Result<MetricDescriptor> {
        let inner = self.read()?;
        inner
            .index
            .get(name)
            .and_then(|&idx| inner.families.get(idx))
            .map(|f| f.desc.clone())
            .ok_or_else(|| MetricsError::UnknownMetric(name.to_string()))
    }

    /// Overwrite (or create) a gauge series.
    pub fn set_gauge<L>(&self, name: &str, labels: &L, value: f64) -> Result<()>
    where
        L: LabelArgs + ?Sized,
    {
        let mut inner = self.write()?;
        let family = inner.family_mut(name, MetricKind::Gauge)?;
        let key = labels.resolve(&family.desc)?;
        if !value.is_finite() {
            return Err(MetricsError::InvalidValue {
                metric: name.to_string(),
                value,
            });
        }
        family.series.insert(key, value);
        Ok(())
    }

    /// Add `delta` to a counter series (unseen series start at 0).
    /// Returns the new value.
    pub fn increment_counter<L>(&self, name: &str, labels: &L, delta: f64) -> Result<f64>
    where
        L: LabelArgs + ?Sized,
    {
        let mut inner = self.write()?;
        let family = inner.family_mut(name, MetricKind::Counter)?;
        let key = labels.resolve(&family.desc)?;
        if !delta.is_finite() {
            return Err(MetricsError::InvalidValue {
                metric: name.to_string(),
                value: delta,
            });
        }
        if delta < 0.0 {
            return Err(MetricsError::NegativeDelta {
                metric: name.to_string(),
                delta,
            });
        }

        let slot = family.series.entry(key).or_insert(0.0);
        let next = *slot + delta;
        if !next.is_finite() {
            return Err(MetricsError::InvalidValue {
                metric: name.to_string(),
                value: next,
            });
        }
        *slot = next;
        Ok(next)
    }

    /// Increment a counter series by one.
    pub fn inc_counter<L>(&self, name: &str, labels: &L) -> Result<f64>
    where
        L: LabelArgs + ?Sized,
    {
        self.increment_counter(name, labels, 1.0)
    }

    /// Copy of every descriptor and series value at one instant.
    pub fn snapshot(&self) -> Result<Snapshot> {
        let inner = self.read()?;
        let families = inner
            .families
            .iter()
            .map(|f| FamilySnapshot {
                descriptor: f.desc.clone(),
                series: f
                    .series
                    .iter()
                    .map(|(k, &v)| Series {
                        label_values: k.clone(),
                        value: v,
                    })
                    .collect(),
            })
            .collect();
        Ok(Snapshot { families })
    }
}

/// One series: label values in declared order and its current value.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label_values: Vec<String>,
    pub value: f64,
}

/// A metric's descriptor together with all of its series.
#[derive(Debug, Clone, PartialEq)]
pub struct FamilySnapshot {
    pub descriptor: MetricDescriptor,
    pub series: Vec<Series>,
}

impl FamilySnapshot {
    /// Named view of a series' labels.
    pub fn labels(&self, series: &Series) -> LabelSet {
        self.descriptor
            .label_names
            .iter()
            .zip(&series.label_values)
            .collect()
    }
}

/// Immutable point-in-time view of a registry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    families: Vec<FamilySnapshot>,
}

impl Snapshot {
    /// Build a snapshot directly (the encoder still checks its invariants).
    pub fn from_families(families: Vec<FamilySnapshot>) -> Self {
        Self { families }
    }

    /// Families in registration order.
    pub fn families(&self) -> &[FamilySnapshot] {
        &self.families
    }

    pub fn family(&self, name: &str) -> Option<&FamilySnapshot> {
        self.families.iter().find(|f| f.descriptor.name == name)
    }

    /// Current value of one series, if it exists.
    pub fn value<L>(&self, name: &str, labels: &L) -> Option<f64>
    where
        L: LabelArgs + ?Sized,
    {
        let family = self.family(name)?;
        let key = labels.resolve(&family.descriptor).ok()?;
        family
            .series
            .iter()
            .find(|s| s.label_values == key)
            .map(|s| s.value)
    }
}
