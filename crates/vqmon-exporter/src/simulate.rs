//! Simulated playback signals driving the registry.
//!
//! Every tick sets the stutter gauge for each (table, cdn, quality) to a
//! uniform value in `[0, max_stutter)` and bumps the play counter for the
//! (table, cdn) pair once per quality.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::task::JoinHandle;

use vqmon_core::error::Result;
use vqmon_core::Registry;

use crate::config::SimulationSection;

/// Run one simulation round. Returns the number of gauge series written.
pub fn tick<R>(registry: &Registry, cfg: &SimulationSection, rng: &mut R) -> Result<usize>
where
    R: Rng,
{
    let mut written = 0;
    for table in &cfg.tables {
        for cdn in &cfg.cdns {
            for quality in &cfg.qualities {
                let stutter = rng.gen_range(0.0..cfg.max_stutter);
                registry.set_gauge(&cfg.gauge, &[table.as_str(), cdn.as_str(), quality.as_str()], stutter)?;
                registry.inc_counter(&cfg.counter, &[table.as_str(), cdn.as_str()])?;
                written += 1;
            }
        }
    }
    Ok(written)
}

/// Spawn the update loop. The first round runs immediately.
pub fn spawn(registry: Arc<Registry>, cfg: SimulationSection, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut rng = StdRng::from_entropy();
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            match tick(&registry, &cfg, &mut rng) {
                Ok(n) => tracing::debug!(series = n, "simulation tick"),
                Err(e) => tracing::warn!(code = e.code().as_str(), error = %e, "simulation tick failed"),
            }
        }
    })
}
