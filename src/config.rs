//! The driving input to a cluster-dynamics engine (§4.3).

use serde::{Deserialize, Serialize};

use crate::material::{presets as material_presets, Material};
use crate::reactor::{presets as reactor_presets, Reactor};

/// Full configuration for a cluster-dynamics simulation.
///
/// `Default` reproduces the literal defaults of §4.3: a 10^8 s run sampled
/// every 10^6 s, `max_cluster_size = 1001`, tight relative tolerance and
/// loose absolute tolerance (concentrations start near zero and the
/// absolute floor must not mask that), data validation on, OSIRIS/SA304 as
/// the default reactor/material, and a perfect initial lattice (every
/// concentration zero).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClusterDynamicsConfig {
    /// Total simulated time across the run (s), for collaborators that want
    /// to drive `advance` in a loop until this much time has elapsed. The
    /// core does not enforce this itself; `advance` takes its own `dt`.
    pub simulation_time: f64,
    /// Suggested step between successive `advance` calls (s).
    pub time_delta: f64,
    /// Suggested interval between recorded snapshots (s), for a
    /// collaborator driving a sampling loop.
    pub sample_interval: f64,

    /// Number of cluster sizes tracked per species (N >= 4; see
    /// `Engine::new`'s `InvalidInput` on N < 5).
    pub max_cluster_size: usize,

    /// Whether `advance` scans the resulting state for NaN, infinity, or
    /// negative values after each successful step.
    pub data_validation_on: bool,

    /// Scalar relative tolerance for the stiff integrator.
    pub relative_tolerance: f64,
    /// Scalar absolute tolerance for the stiff integrator.
    pub absolute_tolerance: f64,
    /// Cap on interior integrator steps per `advance` call.
    pub max_num_integration_steps: usize,
    /// Minimum internal step size (s).
    pub min_integration_step: f64,
    /// Maximum internal step size (s).
    pub max_integration_step: f64,

    /// Irradiation environment.
    pub reactor: Reactor,
    /// Material-physics constants.
    pub material: Material,

    /// Initial interstitial concentrations (cm^-3), length
    /// `max_cluster_size + 1`, index 0 unused.
    pub init_interstitials: Vec<f64>,
    /// Initial vacancy concentrations (cm^-3), length
    /// `max_cluster_size + 1`, index 0 unused.
    pub init_vacancies: Vec<f64>,
}

impl ClusterDynamicsConfig {
    /// A `Default`-equivalent configuration built from explicit presets,
    /// useful when a caller wants the §4.3/§4.4 defaults without depending
    /// on the `Default` impl's field order.
    pub fn with_presets() -> Self {
        Self::default()
    }
}

impl Default for ClusterDynamicsConfig {
    fn default() -> Self {
        let max_cluster_size = 1001;
        let len = max_cluster_size + 1;
        Self {
            simulation_time: 1e8,
            time_delta: 1e6,
            sample_interval: 1e6,
            max_cluster_size,
            data_validation_on: true,
            relative_tolerance: 1e-6,
            absolute_tolerance: 1e1,
            max_num_integration_steps: 5000,
            min_integration_step: 1e-30,
            max_integration_step: 1e20,
            reactor: reactor_presets::osiris(),
            material: material_presets::sa304(),
            init_interstitials: vec![0.0; len],
            init_vacancies: vec![0.0; len],
        }
    }
}
