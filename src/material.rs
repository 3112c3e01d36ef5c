//! Material-physics constants (C. Pokor et al. / J. Nucl. Mater. 326 (2004),
//! Table 6) and the SA304 preset.

use serde::{Deserialize, Serialize};

use crate::sensitivity::SensitivityVariable;

/// Plain record of physical constants for a single material.
///
/// `burgers_vector` and `atomic_volume` are derived from `lattice_param` and
/// are not independently settable — they are recomputed whenever
/// `lattice_param` changes, via [`Material::set_lattice_param`] or
/// [`Material::from_lattice_param`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Opaque identity, not part of the physics.
    pub name: String,
    /// Optional persistence id assigned by an external store; `None` until
    /// a collaborator persists this record.
    pub persistence_id: Option<i64>,

    /// Interstitial migration energy (eV).
    pub i_migration: f64,
    /// Vacancy migration energy (eV).
    pub v_migration: f64,

    /// Interstitial preexponential diffusion constant (cm^2/s).
    pub i_diffusion_0: f64,
    /// Vacancy preexponential diffusion constant (cm^2/s).
    pub v_diffusion_0: f64,

    /// Interstitial formation energy (eV).
    pub i_formation: f64,
    /// Vacancy formation energy (eV).
    pub v_formation: f64,

    /// Size-2 interstitial binding energy (eV).
    pub i_binding: f64,
    /// Size-2 vacancy binding energy (eV).
    pub v_binding: f64,

    /// Recombination radius between an interstitial and a vacancy (cm).
    pub recombination_radius: f64,

    /// Interstitial loop-bias factor.
    pub i_loop_bias: f64,
    /// Interstitial dislocation-bias factor.
    pub i_dislocation_bias: f64,
    /// Interstitial dislocation-bias exponent parameter.
    pub i_dislocation_bias_param: f64,

    /// Vacancy loop-bias factor.
    pub v_loop_bias: f64,
    /// Vacancy dislocation-bias factor.
    pub v_dislocation_bias: f64,
    /// Vacancy dislocation-bias exponent parameter.
    pub v_dislocation_bias_param: f64,

    /// Initial dislocation density (cm^-2).
    pub dislocation_density_0: f64,

    /// Grain size (cm).
    pub grain_size: f64,

    /// Lattice parameter (cm). Changing this field directly leaves
    /// `burgers_vector`/`atomic_volume` stale; prefer
    /// [`Material::set_lattice_param`].
    pub lattice_param: f64,

    /// Derived: `lattice_param / sqrt(2)`.
    pub burgers_vector: f64,
    /// Derived: `lattice_param^3 / 4`.
    pub atomic_volume: f64,
}

impl Material {
    /// Builds a material from every independent field, deriving
    /// `burgers_vector` and `atomic_volume` from `lattice_param`.
    #[allow(clippy::too_many_arguments)]
    pub fn from_lattice_param(
        name: impl Into<String>,
        i_migration: f64,
        v_migration: f64,
        i_diffusion_0: f64,
        v_diffusion_0: f64,
        i_formation: f64,
        v_formation: f64,
        i_binding: f64,
        v_binding: f64,
        recombination_radius: f64,
        i_loop_bias: f64,
        i_dislocation_bias: f64,
        i_dislocation_bias_param: f64,
        v_loop_bias: f64,
        v_dislocation_bias: f64,
        v_dislocation_bias_param: f64,
        dislocation_density_0: f64,
        grain_size: f64,
        lattice_param: f64,
    ) -> Self {
        let (burgers_vector, atomic_volume) = derive_lattice_quantities(lattice_param);
        Self {
            name: name.into(),
            persistence_id: None,
            i_migration,
            v_migration,
            i_diffusion_0,
            v_diffusion_0,
            i_formation,
            v_formation,
            i_binding,
            v_binding,
            recombination_radius,
            i_loop_bias,
            i_dislocation_bias,
            i_dislocation_bias_param,
            v_loop_bias,
            v_dislocation_bias,
            v_dislocation_bias_param,
            dislocation_density_0,
            grain_size,
            lattice_param,
            burgers_vector,
            atomic_volume,
        }
    }

    /// Sets the lattice parameter and recomputes `burgers_vector` and
    /// `atomic_volume` from it. This is the only supported way to change the
    /// lattice parameter after construction — mutating `lattice_param`
    /// directly leaves the derived quantities stale.
    pub fn set_lattice_param(&mut self, lattice_param: f64) {
        self.lattice_param = lattice_param;
        let (burgers_vector, atomic_volume) = derive_lattice_quantities(lattice_param);
        self.burgers_vector = burgers_vector;
        self.atomic_volume = atomic_volume;
    }

    /// Adds `delta` to the named field, the building block a sensitivity
    /// sweep collaborator drives.
    pub fn apply_sensitivity_delta(&mut self, var: SensitivityVariable, delta: f64) {
        match var {
            SensitivityVariable::InterstitialMigrationEv => self.i_migration += delta,
            SensitivityVariable::VacancyMigrationEv => self.v_migration += delta,
            SensitivityVariable::InterstitialFormationEv => self.i_formation += delta,
            SensitivityVariable::VacancyFormationEv => self.v_formation += delta,
            SensitivityVariable::InterstitialBindingEv => self.i_binding += delta,
            SensitivityVariable::VacancyBindingEv => self.v_binding += delta,
            SensitivityVariable::InitialDislocationDensityCm => {
                self.dislocation_density_0 += delta
            }
            // Reactor-only variables: no-op on a Material.
            SensitivityVariable::FluxDpaS
            | SensitivityVariable::TemperatureKelvin
            | SensitivityVariable::DislocationDensityEvolution => {}
        }
    }
}

fn derive_lattice_quantities(lattice_param: f64) -> (f64, f64) {
    let burgers_vector = lattice_param / std::f64::consts::SQRT_2;
    let atomic_volume = lattice_param.powi(3) / 4.0;
    (burgers_vector, atomic_volume)
}

/// Named lattice parameters (cm), converted from picometers like the
/// original source's `lattice_params` namespace.
pub mod lattice_params {
    const fn pm_to_cm(pm: f64) -> f64 {
        pm * 1e-10
    }

    pub const CHROMIUM: f64 = pm_to_cm(291.0);
    pub const NICKEL: f64 = pm_to_cm(352.4);
    pub const FCC_NICKEL: f64 = pm_to_cm(360.0);
    pub const CARBON: f64 = pm_to_cm(246.4);
}

/// Named material presets, kept in the core for regression pinning (§4.4),
/// not as hard physics.
pub mod presets {
    use super::{lattice_params, Material};

    /// SA304 stainless steel, C. Pokor et al. / J. Nucl. Mater. 326 (2004),
    /// Table 6, with lattice parameter taken at FCC-nickel scale.
    pub fn sa304() -> Material {
        Material::from_lattice_param(
            "SA304",
            0.45,   // i_migration (eV)
            1.35,   // v_migration (eV)
            1e-3,   // i_diffusion_0 (cm^2/s)
            0.6,    // v_diffusion_0 (cm^2/s)
            4.1,    // i_formation (eV)
            1.7,    // v_formation (eV)
            0.6,    // i_binding (eV)
            0.5,    // v_binding (eV)
            0.7e-7, // recombination_radius (cm)
            63.0,   // i_loop_bias
            0.8,    // i_dislocation_bias
            1.1,    // i_dislocation_bias_param
            33.0,   // v_loop_bias
            0.65,   // v_dislocation_bias
            1.0,    // v_dislocation_bias_param
            1e-11,  // dislocation_density_0 (cm^-2)
            4e-3,   // grain_size (cm)
            lattice_params::FCC_NICKEL,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sa304_derives_burgers_vector_and_atomic_volume() {
        let m = presets::sa304();
        assert!((m.burgers_vector - m.lattice_param / std::f64::consts::SQRT_2).abs() < 1e-30);
        assert!((m.atomic_volume - m.lattice_param.powi(3) / 4.0).abs() < 1e-40);
    }

    #[test]
    fn set_lattice_param_recomputes_derived_quantities() {
        let mut m = presets::sa304();
        m.set_lattice_param(4e-8);
        assert!((m.burgers_vector - 4e-8 / std::f64::consts::SQRT_2).abs() < 1e-30);
        assert!((m.atomic_volume - (4e-8f64).powi(3) / 4.0).abs() < 1e-40);
    }

    #[test]
    fn sensitivity_delta_updates_named_field_only() {
        let mut m = presets::sa304();
        let before_v_migration = m.v_migration;
        m.apply_sensitivity_delta(SensitivityVariable::InterstitialMigrationEv, 1e-7);
        assert!((m.i_migration - (0.45 + 1e-7)).abs() < 1e-12);
        assert_eq!(m.v_migration, before_v_migration);
    }
}
