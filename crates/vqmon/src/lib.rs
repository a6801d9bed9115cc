//! Top-level facade crate for vqmon.
//!
//! Re-exports the metrics core and the exporter library so users can depend on a single crate.

pub mod core {
    pub use vqmon_core::*;
}

pub mod exporter {
    pub use vqmon_exporter::*;
}
