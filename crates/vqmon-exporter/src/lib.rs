//! vqmon exporter library entry.
//!
//! Wires the metrics core into the deployable shell: config loading,
//! tracing setup, the scrape/health router, the simulation driver, and the
//! push client. Consumed by the two binaries and by integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod push;
pub mod router;
pub mod simulate;
