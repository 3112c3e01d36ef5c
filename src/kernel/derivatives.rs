//! Ladder rates, size-1 equations, and dislocation-density derivative
//! (§4.1), C. Pokor / J. Nucl. Mater. 326 (2004), Eqs. 2a-3f and 8;
//! N. Sakaguchi / Acta Mat. 1131 (2001), Eq. 3.14.
//!
//! [`RateKernel`] bundles one evaluation's read-only inputs (material,
//! reactor, step-cache, state slices) so the per-size rate methods below
//! read like the closed-form equations they implement instead of threading
//! five parameters through every call.

use std::f64::consts::PI;

use crate::kernel::cache::StepCache;
use crate::kernel::rates;
use crate::material::Material;
use crate::reactor::Reactor;
use crate::state::StateLayout;

/// Read-only view over one right-hand-side evaluation's inputs.
pub struct RateKernel<'a> {
    pub material: &'a Material,
    pub reactor: &'a Reactor,
    pub cache: &'a StepCache,
    pub interstitials: &'a [f64],
    pub vacancies: &'a [f64],
    pub dislocation_density: f64,
    pub max_cluster_size: usize,
}

impl<'a> RateKernel<'a> {
    fn ii_absorption(&self, n: usize) -> f64 {
        rates::ii_absorption(self.material, n, self.cache.i_diffusion)
    }
    fn iv_absorption(&self, n: usize) -> f64 {
        rates::iv_absorption(self.material, n, self.cache.v_diffusion)
    }
    fn vv_absorption(&self, n: usize) -> f64 {
        rates::vv_absorption(self.material, n, self.cache.v_diffusion)
    }
    fn vi_absorption(&self, n: usize) -> f64 {
        rates::vi_absorption(self.material, n, self.cache.i_diffusion)
    }
    fn ii_emission(&self, n: usize) -> f64 {
        rates::ii_emission(self.material, self.reactor, n, self.cache.i_diffusion)
    }
    fn vv_emission(&self, n: usize) -> f64 {
        rates::vv_emission(self.material, self.reactor, n, self.cache.v_diffusion)
    }
    fn unfault_probability(&self) -> f64 {
        rates::i_dislocation_loop_unfault_probability(self.material, self.reactor)
    }

    /// "Demotion" rate a_i(n), Eq. 2b: a size-(n) interstitial cluster
    /// shrinks to size n-1 by absorbing a vacancy or emitting an
    /// interstitial.
    fn i_demotion_rate(&self, n: usize) -> f64 {
        self.iv_absorption(n) * self.vacancies[1] + self.ii_emission(n)
    }
    fn v_demotion_rate(&self, n: usize) -> f64 {
        self.vi_absorption(n) * self.interstitials[1] + self.vv_emission(n)
    }

    /// Combined rate leaving size n in either direction, Eq. 2c.
    fn i_combined_promotion_demotion_rate(&self, n: usize) -> f64 {
        self.iv_absorption(n) * self.vacancies[1]
            + self.ii_absorption(n) * self.interstitials[1]
            + self.ii_emission(n)
    }
    fn v_combined_promotion_demotion_rate(&self, n: usize) -> f64 {
        self.vi_absorption(n) * self.interstitials[1]
            + self.vv_absorption(n) * self.vacancies[1]
            + self.vv_emission(n)
    }

    /// "Promotion" rate c_i(n), Eq. 2d: a size-n cluster grows to size n+1
    /// by absorbing a monomer, discounted by the probability that growth
    /// instead unfaults it into the dislocation network (Sakaguchi Eq.
    /// 3.14).
    fn i_promotion_rate(&self, n: usize) -> f64 {
        self.ii_absorption(n) * self.interstitials[1] * (1.0 - self.unfault_probability())
    }
    fn v_promotion_rate(&self, n: usize) -> f64 {
        self.vv_absorption(n) * self.vacancies[1]
    }

    /// Mutual interstitial/vacancy annihilation rate R_iv, Eq. 3d.
    fn annihilation_rate(&self) -> f64 {
        4.0 * PI
            * (self.cache.i_diffusion + self.cache.v_diffusion)
            * self.material.recombination_radius
    }

    fn i_dislocation_annihilation_rate(&self) -> f64 {
        self.dislocation_density * self.cache.i_diffusion * self.material.i_dislocation_bias
    }
    fn v_dislocation_annihilation_rate(&self) -> f64 {
        self.dislocation_density * self.cache.v_diffusion * self.material.v_dislocation_bias
    }

    fn i_grain_boundary_annihilation_rate(&self) -> f64 {
        6.0 * self.cache.i_diffusion
            * (self.dislocation_density * self.material.i_dislocation_bias
                + self.cache.ii_sum_absorption
                + self.cache.vi_sum_absorption)
                .sqrt()
            / self.material.grain_size
    }
    fn v_grain_boundary_annihilation_rate(&self) -> f64 {
        6.0 * self.cache.v_diffusion
            * (self.dislocation_density * self.material.v_dislocation_bias
                + self.cache.vv_sum_absorption
                + self.cache.iv_sum_absorption)
                .sqrt()
            / self.material.grain_size
    }

    /// 1/τ^e_i, Eq. 3b: single interstitials returned to the size-1
    /// population by larger clusters dissociating or shrinking.
    fn i_emission_rate(&self) -> f64 {
        let mut rate = 0.0;
        for n in 3..(self.max_cluster_size - 1) {
            rate += self.ii_emission(n) * self.interstitials[n];
        }
        rate += 2.0 * self.ii_emission(2) * self.interstitials[2]
            + self.iv_absorption(2) * self.vacancies[1] * self.interstitials[2];
        rate
    }
    fn v_emission_rate(&self) -> f64 {
        let mut rate = 0.0;
        for n in 3..(self.max_cluster_size - 1) {
            rate += self.vv_emission(n) * self.vacancies[n];
        }
        rate += 2.0 * self.vv_emission(2) * self.vacancies[2]
            + self.vi_absorption(2) * self.interstitials[1] * self.vacancies[2];
        rate
    }

    /// 1/τ^a_i, Eq. 3c: single interstitials absorbed into the bulk
    /// population of size >= 1 clusters.
    fn i_absorption_rate(&self) -> f64 {
        let mut rate = self.ii_absorption(1) * self.interstitials[1];
        for n in 2..(self.max_cluster_size - 1) {
            rate += self.ii_absorption(n) * self.interstitials[n]
                + self.vi_absorption(n) * self.vacancies[n];
        }
        rate
    }
    fn v_absorption_rate(&self) -> f64 {
        let mut rate = self.vv_absorption(1) * self.vacancies[1];
        for n in 2..(self.max_cluster_size - 1) {
            rate += self.vv_absorption(n) * self.vacancies[n]
                + self.iv_absorption(n) * self.interstitials[n];
        }
        rate
    }

    /// dC_i(1)/dt, Eq. 3a.
    fn i1_concentration_derivative(&self) -> f64 {
        rates::i_defect_production(self.reactor, 1) / self.material.atomic_volume
            - self.annihilation_rate() * self.interstitials[1] * self.vacancies[1]
            - self.interstitials[1] * self.i_dislocation_annihilation_rate()
            - self.interstitials[1] * self.i_grain_boundary_annihilation_rate()
            - self.interstitials[1] * self.i_absorption_rate()
            + self.i_emission_rate()
    }
    /// dC_v(1)/dt, Eq. 3a.
    fn v1_concentration_derivative(&self) -> f64 {
        rates::v_defect_production(self.reactor, 1) / self.material.atomic_volume
            - self.annihilation_rate() * self.interstitials[1] * self.vacancies[1]
            - self.vacancies[1] * self.v_dislocation_annihilation_rate()
            - self.vacancies[1] * self.v_grain_boundary_annihilation_rate()
            - self.vacancies[1] * self.v_absorption_rate()
            + self.v_emission_rate()
    }

    /// dC_i(n)/dt for n >= 2, Eq. 2a.
    fn i_concentration_derivative(&self, n: usize) -> f64 {
        rates::i_defect_production(self.reactor, n) / self.material.atomic_volume
            + self.i_demotion_rate(n + 1) * self.interstitials[n + 1]
            - self.i_combined_promotion_demotion_rate(n) * self.interstitials[n]
            + self.i_promotion_rate(n - 1) * self.interstitials[n - 1]
    }
    /// dC_v(n)/dt for n >= 2, Eq. 2a.
    fn v_concentration_derivative(&self, n: usize) -> f64 {
        rates::v_defect_production(self.reactor, n) / self.material.atomic_volume
            + self.v_demotion_rate(n + 1) * self.vacancies[n + 1]
            - self.v_combined_promotion_demotion_rate(n) * self.vacancies[n]
            + self.v_promotion_rate(n - 1) * self.vacancies[n - 1]
    }

    /// dρ/dt, Eq. 8 + Sakaguchi Eq. 3.14: loop-unfaulting gain minus a
    /// climb/annihilation loss term.
    fn dislocation_density_derivative(&self) -> f64 {
        let mut gain = 0.0;
        for n in 1..self.max_cluster_size {
            gain += rates::cluster_radius(self.material, n)
                * self.ii_absorption(n)
                * self.interstitials[n]
                * self.unfault_probability();
        }
        gain *= 2.0 * PI / self.material.atomic_volume;

        gain - self.reactor.dislocation_density_evolution
            * self.material.burgers_vector.powi(2)
            * self.dislocation_density.powf(1.5)
    }
}

/// Fills `out` with the full right-hand side for the current `state`,
/// refreshing `cache` first. `state` and `out` are both laid out per
/// `layout`; padding indices (0 and N+1 per species) are left at zero.
///
/// No allocation: `cache` and `out` are caller-owned scratch reused across
/// every evaluation within one `advance` call.
pub fn evaluate_rhs(
    material: &Material,
    reactor: &Reactor,
    layout: &StateLayout,
    state: &[f64],
    cache: &mut StepCache,
    out: &mut [f64],
) {
    let n = layout.max_cluster_size;
    let i_lo = layout.interstitial_index(0);
    let i_hi = layout.interstitial_index(n + 1);
    let v_lo = layout.vacancy_index(0);
    let v_hi = layout.vacancy_index(n + 1);
    let rho_idx = layout.dislocation_density_index();

    let interstitials = &state[i_lo..=i_hi];
    let vacancies = &state[v_lo..=v_hi];
    let dislocation_density = state[rho_idx];

    *cache = StepCache::refresh(material, reactor, interstitials, vacancies, dislocation_density, n);

    out.iter_mut().for_each(|v| *v = 0.0);

    let kernel = RateKernel {
        material,
        reactor,
        cache,
        interstitials,
        vacancies,
        dislocation_density,
        max_cluster_size: n,
    };

    out[layout.interstitial_index(1)] = kernel.i1_concentration_derivative();
    for size in 2..=n {
        out[layout.interstitial_index(size)] = kernel.i_concentration_derivative(size);
    }

    out[layout.vacancy_index(1)] = kernel.v1_concentration_derivative();
    for size in 2..=n {
        out[layout.vacancy_index(size)] = kernel.v_concentration_derivative(size);
    }

    out[rho_idx] = kernel.dislocation_density_derivative();
}
