//! vqmon core: metric registry, label model, and text exposition encoding.
//!
//! This crate owns the stateful part of the exporter (the [`Registry`]) and
//! the pure serialization of its snapshots. It carries no transport or
//! runtime dependencies, so the scrape server and the push client in
//! `vqmon-exporter` both build on it.
//!
//! # Guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Every contract violation surfaces as a [`MetricsError`].

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod exposition;
pub mod model;
pub mod registry;

pub use error::{ErrorCode, MetricsError, Result};
pub use model::{LabelArgs, LabelSet, MetricDescriptor, MetricKind, NO_LABELS};
pub use registry::{FamilySnapshot, Registry, Series, Snapshot};
