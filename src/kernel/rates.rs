//! Closed-form physical rate coefficients (§4.1), C. Pokor / J. Nucl. Mater.
//! 326 (2004), equations 4a-6, and the cascade-production table (1a-1e).
//!
//! Every function here is pure in `(material, reactor, n)` plus whichever
//! step-cache value it needs (diffusion coefficients are threaded in
//! explicitly rather than recomputed, since `StepCache` owns them).

use std::f64::consts::PI;

use crate::kernel::constants::BOLTZMANN_EV_KELVIN;
use crate::material::Material;
use crate::reactor::Reactor;

/// Cluster radius r(n), G. Was / Fundamentals of Radiation Materials Science
/// (2nd ed., 2017), Eq. 7.63.
pub fn cluster_radius(material: &Material, n: usize) -> f64 {
    (3f64.sqrt() * material.lattice_param.powi(2) * n as f64 / (4.0 * PI)).sqrt()
}

/// Single-interstitial diffusion coefficient D_i(T).
pub fn i_diffusion(material: &Material, reactor: &Reactor) -> f64 {
    material.i_diffusion_0
        * (-material.i_migration / (BOLTZMANN_EV_KELVIN * reactor.temperature)).exp()
}

/// Single-vacancy diffusion coefficient D_v(T).
pub fn v_diffusion(material: &Material, reactor: &Reactor) -> f64 {
    material.v_diffusion_0
        * (-material.v_migration / (BOLTZMANN_EV_KELVIN * reactor.temperature)).exp()
}

/// Interstitial bias factor Z_i(n), Eq. 5.
pub fn i_bias_factor(material: &Material, n: usize) -> f64 {
    material.i_dislocation_bias
        + ((material.burgers_vector / (8.0 * PI * material.lattice_param)).sqrt()
            * material.i_loop_bias
            - material.i_dislocation_bias)
            / (n as f64).powf(material.i_dislocation_bias_param / 2.0)
}

/// Vacancy bias factor Z_v(n), Eq. 5.
pub fn v_bias_factor(material: &Material, n: usize) -> f64 {
    material.v_dislocation_bias
        + ((material.burgers_vector / (8.0 * PI * material.lattice_param)).sqrt()
            * material.v_loop_bias
            - material.v_dislocation_bias)
            / (n as f64).powf(material.v_dislocation_bias_param / 2.0)
}

/// Interstitial binding energy E_b,i(n), Eq. 6.
pub fn i_binding_energy(material: &Material, n: usize) -> f64 {
    material.i_formation
        + (material.i_binding - material.i_formation) / (2f64.powf(0.8) - 1.0)
            * ((n as f64).powf(0.8) - (n as f64 - 1.0).powf(0.8))
}

/// Vacancy binding energy E_b,v(n), Eq. 6.
pub fn v_binding_energy(material: &Material, n: usize) -> f64 {
    material.v_formation
        + (material.v_binding - material.v_formation) / (2f64.powf(0.8) - 1.0)
            * ((n as f64).powf(0.8) - (n as f64 - 1.0).powf(0.8))
}

/// Absorption of an interstitial by an interstitial cluster of size n,
/// β_ii(n), Eq. 4b.
pub fn ii_absorption(material: &Material, n: usize, i_diffusion: f64) -> f64 {
    2.0 * PI * cluster_radius(material, n) * i_bias_factor(material, n) * i_diffusion
}

/// Absorption of a vacancy by an interstitial cluster of size n, β_iv(n),
/// Eq. 4c.
pub fn iv_absorption(material: &Material, n: usize, v_diffusion: f64) -> f64 {
    2.0 * PI * cluster_radius(material, n) * v_bias_factor(material, n) * v_diffusion
}

/// Absorption of a vacancy by a vacancy cluster of size n, β_vv(n), Eq. 4e.
pub fn vv_absorption(material: &Material, n: usize, v_diffusion: f64) -> f64 {
    2.0 * PI * cluster_radius(material, n) * v_bias_factor(material, n) * v_diffusion
}

/// Absorption of an interstitial by a vacancy cluster of size n, β_vi(n),
/// Eq. 4f.
pub fn vi_absorption(material: &Material, n: usize, i_diffusion: f64) -> f64 {
    2.0 * PI * cluster_radius(material, n) * i_bias_factor(material, n) * i_diffusion
}

/// Emission of an interstitial by an interstitial cluster of size n,
/// α_ii(n), Eq. 4a.
pub fn ii_emission(material: &Material, reactor: &Reactor, n: usize, i_diffusion: f64) -> f64 {
    2.0 * PI
        * cluster_radius(material, n)
        * i_bias_factor(material, n)
        * i_diffusion
        / material.atomic_volume
        * (-i_binding_energy(material, n) / (BOLTZMANN_EV_KELVIN * reactor.temperature)).exp()
}

/// Emission of a vacancy by a vacancy cluster of size n, α_vv(n), Eq. 4a.
pub fn vv_emission(material: &Material, reactor: &Reactor, n: usize, v_diffusion: f64) -> f64 {
    2.0 * PI
        * cluster_radius(material, n)
        * v_bias_factor(material, n)
        * v_diffusion
        / material.atomic_volume
        * (-v_binding_energy(material, n) / (BOLTZMANN_EV_KELVIN * reactor.temperature)).exp()
}

/// Cascade defect production G_i(n), Eqs. 1a-1e. Zero for n > 4.
pub fn i_defect_production(reactor: &Reactor, n: usize) -> f64 {
    match n {
        1 => reactor.recombination * reactor.flux * reactor.i_mono_fraction(),
        2 => reactor.recombination * reactor.flux * reactor.i_bi,
        3 => reactor.recombination * reactor.flux * reactor.i_tri,
        4 => reactor.recombination * reactor.flux * reactor.i_quad,
        _ => 0.0,
    }
}

/// Cascade defect production G_v(n), Eqs. 1a-1e. Zero for n > 4.
pub fn v_defect_production(reactor: &Reactor, n: usize) -> f64 {
    match n {
        1 => reactor.recombination * reactor.flux * reactor.v_mono_fraction(),
        2 => reactor.recombination * reactor.flux * reactor.v_bi,
        3 => reactor.recombination * reactor.flux * reactor.v_tri,
        4 => reactor.recombination * reactor.flux * reactor.v_quad,
        _ => 0.0,
    }
}

/// Probability that a faulted interstitial dislocation loop of size n
/// unfaults into the dislocation network this step, via an Arrhenius
/// factor on the barrier `i_binding + i_migration` (§9, labeled "unfault
/// energy barrier"; no closed-form source beyond the original port).
pub fn i_dislocation_loop_unfault_probability(material: &Material, reactor: &Reactor) -> f64 {
    let energy_barrier = material.i_binding + material.i_migration;
    (-energy_barrier / (BOLTZMANN_EV_KELVIN * reactor.temperature)).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::presets::sa304;
    use crate::reactor::presets::osiris;

    #[test]
    fn cluster_radius_strictly_increases_with_size() {
        let material = sa304();
        for n in 1..20 {
            assert!(cluster_radius(&material, n + 1) > cluster_radius(&material, n));
        }
    }

    #[test]
    fn diffusion_strictly_increases_with_temperature() {
        let material = sa304();
        let mut reactor = osiris();
        reactor.temperature = 300.0;
        let lower = i_diffusion(&material, &reactor);
        reactor.temperature = 600.0;
        let higher = i_diffusion(&material, &reactor);
        assert!(higher > lower);
    }

    #[test]
    fn defect_production_vanishes_above_size_four() {
        let reactor = osiris();
        for n in 5..50 {
            assert_eq!(i_defect_production(&reactor, n), 0.0);
            assert_eq!(v_defect_production(&reactor, n), 0.0);
        }
    }

    #[test]
    fn defect_production_table_matches_osiris_sa304_reference() {
        let reactor = osiris();
        let expected_i = [2.088e-8, 4.35e-8, 1.74e-8, 5.22e-9];
        let expected_v = [7.743e-8, 5.22e-9, 2.61e-9, 1.74e-9];
        for (idx, &e) in expected_i.iter().enumerate() {
            let n = idx + 1;
            assert!(
                (i_defect_production(&reactor, n) - e).abs() < 1e-11,
                "G_i({n}) = {}, expected {e}",
                i_defect_production(&reactor, n)
            );
        }
        for (idx, &e) in expected_v.iter().enumerate() {
            let n = idx + 1;
            assert!(
                (v_defect_production(&reactor, n) - e).abs() < 1e-11,
                "G_v({n}) = {}, expected {e}",
                v_defect_production(&reactor, n)
            );
        }
    }

    #[test]
    fn absorption_coefficients_are_strictly_positive() {
        let material = sa304();
        let reactor = osiris();
        let i_d = i_diffusion(&material, &reactor);
        let v_d = v_diffusion(&material, &reactor);
        for n in 1..20 {
            assert!(ii_absorption(&material, n, i_d) > 0.0);
            assert!(iv_absorption(&material, n, v_d) > 0.0);
            assert!(vv_absorption(&material, n, v_d) > 0.0);
            assert!(vi_absorption(&material, n, i_d) > 0.0);
        }
    }
}
