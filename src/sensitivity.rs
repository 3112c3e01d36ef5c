//! Named material/reactor parameters a sensitivity-sweep collaborator can
//! perturb by a fixed delta.
//!
//! Grounded in the original source's `sensitivity_variable.hpp`, which maps
//! CLI flag strings to an enum of sweepable fields. The sweep loop itself
//! (spawning N runs, choosing the delta) is a CLI concern; this enum and its
//! `apply_delta` methods are the typed building block the core exposes so
//! that concern has something safe to call.

use std::fmt;

/// A single material or reactor field that a sensitivity sweep may vary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SensitivityVariable {
    InterstitialMigrationEv,
    VacancyMigrationEv,
    InterstitialFormationEv,
    VacancyFormationEv,
    InterstitialBindingEv,
    VacancyBindingEv,
    InitialDislocationDensityCm,
    FluxDpaS,
    TemperatureKelvin,
    DislocationDensityEvolution,
}

impl fmt::Display for SensitivityVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InterstitialMigrationEv => "interstitial-migration-ev",
            Self::VacancyMigrationEv => "vacancy-migration-ev",
            Self::InterstitialFormationEv => "interstitial-formation-ev",
            Self::VacancyFormationEv => "vacancy-formation-ev",
            Self::InterstitialBindingEv => "interstitial-binding-ev",
            Self::VacancyBindingEv => "vacancy-binding-ev",
            Self::InitialDislocationDensityCm => "initial-dislocation-density-cm^-2",
            Self::FluxDpaS => "flux-dpa-s",
            Self::TemperatureKelvin => "temperature-kelvin",
            Self::DislocationDensityEvolution => "dislocation-density-evolution",
        };
        f.write_str(name)
    }
}
