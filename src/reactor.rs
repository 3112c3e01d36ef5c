//! Irradiation-environment constants (C. Pokor et al. / J. Nucl. Mater. 326
//! (2004), Table 5) and the OSIRIS preset.

use serde::{Deserialize, Serialize};

use crate::sensitivity::SensitivityVariable;

/// Plain record of the irradiation environment driving a simulation.
///
/// Invariants, checked by [`Reactor::validate`]: all six cascade branching
/// fractions lie in `[0, 1]`, each species' fractions sum to at most 1
/// (size-1 production is the remainder), `flux > 0`, `temperature > 0`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reactor {
    /// Opaque identity, not part of the physics.
    pub name: String,
    /// Optional persistence id assigned by an external store.
    pub persistence_id: Option<i64>,

    /// Neutron flux (dpa/s).
    pub flux: f64,
    /// Temperature (K).
    pub temperature: f64,
    /// Cascade recombination factor.
    pub recombination: f64,

    /// Interstitial cascade branching fraction to size-2 clusters.
    pub i_bi: f64,
    /// Interstitial cascade branching fraction to size-3 clusters.
    pub i_tri: f64,
    /// Interstitial cascade branching fraction to size-4 clusters.
    pub i_quad: f64,

    /// Vacancy cascade branching fraction to size-2 clusters.
    pub v_bi: f64,
    /// Vacancy cascade branching fraction to size-3 clusters.
    pub v_tri: f64,
    /// Vacancy cascade branching fraction to size-4 clusters.
    pub v_quad: f64,

    /// Dislocation-density-evolution coefficient (K in §4.1's dρ/dt).
    pub dislocation_density_evolution: f64,
}

impl Reactor {
    /// Checks the invariants of §3: fractions in `[0,1]` summing to at most
    /// 1 per species, `flux > 0`, `temperature > 0`.
    pub fn validate(&self) -> Result<(), String> {
        let fractions = [
            ("i_bi", self.i_bi),
            ("i_tri", self.i_tri),
            ("i_quad", self.i_quad),
            ("v_bi", self.v_bi),
            ("v_tri", self.v_tri),
            ("v_quad", self.v_quad),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("reactor field {name} = {value} is not in [0, 1]"));
            }
        }
        if self.i_bi + self.i_tri + self.i_quad > 1.0 {
            return Err("interstitial branching fractions sum to more than 1".into());
        }
        if self.v_bi + self.v_tri + self.v_quad > 1.0 {
            return Err("vacancy branching fractions sum to more than 1".into());
        }
        if self.flux <= 0.0 {
            return Err(format!("reactor flux {} must be > 0", self.flux));
        }
        if self.temperature <= 0.0 {
            return Err(format!(
                "reactor temperature {} must be > 0",
                self.temperature
            ));
        }
        Ok(())
    }

    /// Implicit size-1 interstitial branching fraction: `1 - i_bi - i_tri - i_quad`.
    pub fn i_mono_fraction(&self) -> f64 {
        1.0 - self.i_bi - self.i_tri - self.i_quad
    }

    /// Implicit size-1 vacancy branching fraction: `1 - v_bi - v_tri - v_quad`.
    pub fn v_mono_fraction(&self) -> f64 {
        1.0 - self.v_bi - self.v_tri - self.v_quad
    }

    /// Adds `delta` to the named field, the building block a sensitivity
    /// sweep collaborator drives.
    pub fn apply_sensitivity_delta(&mut self, var: SensitivityVariable, delta: f64) {
        match var {
            SensitivityVariable::FluxDpaS => self.flux += delta,
            SensitivityVariable::TemperatureKelvin => self.temperature += delta,
            SensitivityVariable::DislocationDensityEvolution => {
                self.dislocation_density_evolution += delta
            }
            // Material-only variables: no-op on a Reactor.
            SensitivityVariable::InterstitialMigrationEv
            | SensitivityVariable::VacancyMigrationEv
            | SensitivityVariable::InterstitialFormationEv
            | SensitivityVariable::VacancyFormationEv
            | SensitivityVariable::InterstitialBindingEv
            | SensitivityVariable::VacancyBindingEv
            | SensitivityVariable::InitialDislocationDensityCm => {}
        }
    }
}

/// Named reactor presets, kept in the core for regression pinning (§4.4),
/// not as hard physics.
pub mod presets {
    use super::Reactor;

    /// OSIRIS research reactor, C. Pokor et al. / J. Nucl. Mater. 326 (2004),
    /// Table 5.
    pub fn osiris() -> Reactor {
        Reactor {
            name: "OSIRIS".to_string(),
            persistence_id: None,
            flux: 2.9e-7,
            temperature: 330.0 + 273.15, // 603.15 K
            recombination: 0.3,
            i_bi: 0.5,
            i_tri: 0.2,
            i_quad: 0.06,
            v_bi: 0.06,
            v_tri: 0.03,
            v_quad: 0.02,
            dislocation_density_evolution: 300.0,
        }
    }
}
