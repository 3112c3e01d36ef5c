//! Drives the OSIRIS/SA304 preset engine forward in fixed `time_delta`
//! hops and prints a snapshot at every sample interval. A minimal stand-in
//! for the out-of-scope CLI/CSV-writer collaborator described in §6.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use cluster_dynamics_rs::{ClusterDynamicsConfig, Engine};

fn main() -> Result<()> {
    let config = ClusterDynamicsConfig::with_presets();
    let num_samples = (config.simulation_time / config.sample_interval).round() as u64;

    let mut engine = Engine::new(config.clone()).context("failed to construct engine")?;

    let pb = ProgressBar::new(num_samples);
    pb.set_style(
        ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap()
            .progress_chars("=>-"),
    );
    pb.set_message("OSIRIS/SA304");

    for sample in 1..=num_samples {
        let snapshot = engine
            .advance(config.time_delta)
            .with_context(|| format!("advance failed at sample {sample}"))?;
        pb.inc(1);

        if sample % 10 == 0 || sample == num_samples {
            println!(
                "t={:.3e}s dpa={:.3e} rho={:.3e} C_i(1)={:.3e} C_v(1)={:.3e}",
                snapshot.time,
                snapshot.dpa,
                snapshot.dislocation_density,
                snapshot.interstitials[0],
                snapshot.vacancies[0],
            );
        }
    }

    pb.finish_with_message("done");
    Ok(())
}
