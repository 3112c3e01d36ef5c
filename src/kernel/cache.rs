//! Per-right-hand-side-evaluation memo (§3, "Step-cache").
//!
//! Four sink sums, two diffusion coefficients, and the mean dislocation
//! cell radius all depend on the whole current state and would otherwise
//! be recomputed O(N) times per evaluation if read naively from inside the
//! per-size rate functions. `StepCache` is a stack-local value, refreshed
//! once at the top of every RHS evaluation; it must never be read stale
//! across evaluations.

use crate::kernel::rates;
use crate::material::Material;
use crate::reactor::Reactor;

/// Memoized, per-evaluation quantities the rate kernel reuses across every
/// cluster size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepCache {
    pub i_diffusion: f64,
    pub v_diffusion: f64,
    pub ii_sum_absorption: f64,
    pub iv_sum_absorption: f64,
    pub vv_sum_absorption: f64,
    pub vi_sum_absorption: f64,
    pub mean_dislocation_cell_radius: f64,
}

impl StepCache {
    /// Recomputes every cached quantity from the current state. `max_cluster_size`
    /// is N; `interstitials`/`vacancies` are dense slices indexed `0..=N+1`
    /// (the padding convention of §3).
    pub fn refresh(
        material: &Material,
        reactor: &Reactor,
        interstitials: &[f64],
        vacancies: &[f64],
        dislocation_density: f64,
        max_cluster_size: usize,
    ) -> Self {
        let i_diffusion = rates::i_diffusion(material, reactor);
        let v_diffusion = rates::v_diffusion(material, reactor);

        let mut ii_sum_absorption = 0.0;
        let mut iv_sum_absorption = 0.0;
        let mut vv_sum_absorption = 0.0;
        let mut vi_sum_absorption = 0.0;
        for n in 1..(max_cluster_size - 1) {
            ii_sum_absorption += rates::ii_absorption(material, n, i_diffusion) * interstitials[n];
            iv_sum_absorption += rates::iv_absorption(material, n, v_diffusion) * interstitials[n];
            vv_sum_absorption += rates::vv_absorption(material, n, v_diffusion) * vacancies[n];
            vi_sum_absorption += rates::vi_absorption(material, n, i_diffusion) * vacancies[n];
        }

        let mut r0_factor = 0.0;
        for n in 1..max_cluster_size {
            r0_factor += rates::cluster_radius(material, n) * interstitials[n];
        }
        let mean_dislocation_cell_radius = 1.0
            / ((2.0 * std::f64::consts::PI * std::f64::consts::PI / material.atomic_volume)
                * r0_factor
                + std::f64::consts::PI * dislocation_density)
                .sqrt();

        Self {
            i_diffusion,
            v_diffusion,
            ii_sum_absorption,
            iv_sum_absorption,
            vv_sum_absorption,
            vi_sum_absorption,
            mean_dislocation_cell_radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::presets::sa304;
    use crate::reactor::presets::osiris;

    #[test]
    fn refresh_produces_finite_positive_diffusion() {
        let material = sa304();
        let reactor = osiris();
        let n = 10;
        let interstitials = vec![0.0; n + 2];
        let vacancies = vec![0.0; n + 2];
        let cache = StepCache::refresh(
            &material,
            &reactor,
            &interstitials,
            &vacancies,
            material.dislocation_density_0,
            n,
        );
        assert!(cache.i_diffusion > 0.0 && cache.i_diffusion.is_finite());
        assert!(cache.v_diffusion > 0.0 && cache.v_diffusion.is_finite());
        assert_eq!(cache.ii_sum_absorption, 0.0);
        assert!(cache.mean_dislocation_cell_radius > 0.0);
    }
}
