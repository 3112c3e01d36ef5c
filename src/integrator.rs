//! The stiff integrator driver (§4.2).
//!
//! The original's CVODE (SUNDIALS) BDF/Newton/dense-linear-solver stack has
//! no pure-Rust equivalent available here, so this is a from-scratch stiff
//! driver rather than an explicit (non-stiff-capable) method: an L-stable
//! backward-Euler step, Newton iteration against a finite-difference
//! Jacobian (never analytical — matching the Non-goal that the integrator
//! synthesizes its own), factored with `ndarray_linalg`'s dense `Solve`
//! (LU) of dimension `2*(N+2)+1`. Step doubling (one step of `h` against
//! two of `h/2`, Richardson-extrapolated into a second-order corrector)
//! drives adaptive step growth/shrink against `atol + rtol*|y|`.

use ndarray::{Array1, Array2};
use ndarray_linalg::Solve;
use tracing::{debug, warn};

use crate::error::{ClusterDynamicsError, Result};
use crate::kernel::{evaluate_rhs, StepCache};
use crate::material::Material;
use crate::reactor::Reactor;
use crate::state::{StateLayout, StateSnapshot};

const MAX_NEWTON_ITERATIONS: usize = 12;
const NEWTON_CONVERGENCE_FACTOR: f64 = 1e-3;
const INITIAL_STEP_HINT: f64 = 1e-5;
const STEP_SAFETY: f64 = 0.9;
const STEP_GROWTH_CAP: f64 = 5.0;
const STEP_SHRINK_FLOOR: f64 = 0.1;

/// Owns the contiguous state vector and drives it forward in time against
/// the rate kernel (§4.1).
pub struct Engine {
    layout: StateLayout,
    state: Array1<f64>,
    time: f64,

    material: Material,
    reactor: Reactor,

    data_validation_on: bool,
    relative_tolerance: f64,
    absolute_tolerance: f64,
    max_num_integration_steps: usize,
    min_integration_step: f64,
    max_integration_step: f64,

    step_hint: f64,
    cache: StepCache,
}

impl Engine {
    /// Allocates the state vector from `config`, writes the initial
    /// concentrations and dislocation density, and configures the
    /// integrator. Fails with `InvalidInput` if any tolerance is <= 0, if
    /// `max_cluster_size` < 5, or if the initial concentration arrays are
    /// the wrong length.
    pub fn new(config: crate::config::ClusterDynamicsConfig) -> Result<Self> {
        let n = config.max_cluster_size;
        if n < 5 {
            return Err(ClusterDynamicsError::InvalidInput {
                message: format!("max_cluster_size = {n} must be >= 5"),
                last_valid_state: StateSnapshot::default(),
            });
        }
        if config.relative_tolerance <= 0.0 || config.absolute_tolerance <= 0.0 {
            return Err(ClusterDynamicsError::InvalidInput {
                message: "relative_tolerance and absolute_tolerance must be > 0".into(),
                last_valid_state: StateSnapshot::default(),
            });
        }
        if config.min_integration_step <= 0.0
            || config.max_integration_step <= config.min_integration_step
        {
            return Err(ClusterDynamicsError::InvalidInput {
                message: "min_integration_step must be > 0 and < max_integration_step".into(),
                last_valid_state: StateSnapshot::default(),
            });
        }
        let expected_len = n + 1;
        if config.init_interstitials.len() != expected_len
            || config.init_vacancies.len() != expected_len
        {
            return Err(ClusterDynamicsError::InvalidInput {
                message: format!(
                    "initial concentration arrays must have length {expected_len} (N+1)"
                ),
                last_valid_state: StateSnapshot::default(),
            });
        }

        let layout = StateLayout::new(n);
        let mut state = Array1::<f64>::zeros(layout.state_len());
        for size in 1..=n {
            state[layout.interstitial_index(size)] = config.init_interstitials[size];
            state[layout.vacancy_index(size)] = config.init_vacancies[size];
        }
        state[layout.dislocation_density_index()] = config.material.dislocation_density_0;

        let step_hint = INITIAL_STEP_HINT
            .clamp(config.min_integration_step, config.max_integration_step);

        Ok(Self {
            layout,
            state,
            time: 0.0,
            material: config.material,
            reactor: config.reactor,
            data_validation_on: config.data_validation_on,
            relative_tolerance: config.relative_tolerance,
            absolute_tolerance: config.absolute_tolerance,
            max_num_integration_steps: config.max_num_integration_steps,
            min_integration_step: config.min_integration_step,
            max_integration_step: config.max_integration_step,
            step_hint,
            cache: StepCache::default(),
        })
    }

    pub fn material(&self) -> &Material {
        &self.material
    }
    pub fn set_material(&mut self, material: Material) {
        self.material = material;
    }

    pub fn reactor(&self) -> &Reactor {
        &self.reactor
    }
    pub fn set_reactor(&mut self, reactor: Reactor) {
        self.reactor = reactor;
    }

    pub fn relative_tolerance(&self) -> f64 {
        self.relative_tolerance
    }
    pub fn set_relative_tolerance(&mut self, value: f64) {
        self.relative_tolerance = value;
    }

    pub fn absolute_tolerance(&self) -> f64 {
        self.absolute_tolerance
    }
    pub fn set_absolute_tolerance(&mut self, value: f64) {
        self.absolute_tolerance = value;
    }

    pub fn max_num_integration_steps(&self) -> usize {
        self.max_num_integration_steps
    }
    pub fn set_max_num_integration_steps(&mut self, value: usize) {
        self.max_num_integration_steps = value;
    }

    pub fn min_integration_step(&self) -> f64 {
        self.min_integration_step
    }
    pub fn set_min_integration_step(&mut self, value: f64) {
        self.min_integration_step = value;
    }

    pub fn max_integration_step(&self) -> f64 {
        self.max_integration_step
    }
    pub fn set_max_integration_step(&mut self, value: f64) {
        self.max_integration_step = value;
    }

    pub fn data_validation_on(&self) -> bool {
        self.data_validation_on
    }
    pub fn set_data_validation_on(&mut self, value: bool) {
        self.data_validation_on = value;
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Advances simulated time by exactly `dt` seconds and returns the
    /// resulting snapshot. See §4.2 for the full contract.
    pub fn advance(&mut self, dt: f64) -> Result<StateSnapshot> {
        let last_valid_state = self.snapshot();

        if !(dt > 0.0) {
            return Err(ClusterDynamicsError::InvalidInput {
                message: format!("advance(dt) requires dt > 0, got {dt}"),
                last_valid_state,
            });
        }

        let target_time = self.time + dt;
        let mut interior_steps = 0usize;

        while self.time < target_time {
            if interior_steps >= self.max_num_integration_steps {
                return Err(ClusterDynamicsError::IntegratorFailure {
                    message: format!(
                        "exceeded max_num_integration_steps = {}",
                        self.max_num_integration_steps
                    ),
                    last_valid_state,
                });
            }

            let mut h = self
                .step_hint
                .min(target_time - self.time)
                .clamp(self.min_integration_step, self.max_integration_step);

            let (accepted_state, accepted_h) = loop {
                match self.attempt_step(h) {
                    Some((candidate, error_norm)) if error_norm <= 1.0 => {
                        let growth = (STEP_SAFETY * error_norm.powf(-0.5))
                            .clamp(STEP_SHRINK_FLOOR, STEP_GROWTH_CAP);
                        self.step_hint =
                            (h * growth).clamp(self.min_integration_step, self.max_integration_step);
                        break (candidate, h);
                    }
                    Some((_, error_norm)) => {
                        debug!(error_norm, h, "step rejected by error control, shrinking");
                        let shrink = (STEP_SAFETY * error_norm.powf(-0.5))
                            .clamp(STEP_SHRINK_FLOOR, 1.0);
                        h *= shrink;
                        if h < self.min_integration_step {
                            return Err(ClusterDynamicsError::IntegratorFailure {
                                message: "step size underflowed min_integration_step".into(),
                                last_valid_state,
                            });
                        }
                    }
                    None => {
                        warn!(h, "Newton iteration failed to converge, halving step");
                        h *= 0.5;
                        if h < self.min_integration_step {
                            return Err(ClusterDynamicsError::IntegratorFailure {
                                message: "Newton iteration did not converge at min_integration_step"
                                    .into(),
                                last_valid_state,
                            });
                        }
                    }
                }
            };

            self.state = accepted_state;
            self.time += accepted_h;
            interior_steps += 1;
        }
        self.time = target_time;

        if self.data_validation_on {
            if let Some(offending_size) = self.first_invalid_size() {
                return Err(ClusterDynamicsError::ValidationFailure {
                    offending_size,
                    last_valid_state,
                });
            }
        }

        Ok(self.snapshot())
    }

    /// One adaptive step attempt: backward Euler over `h`, backward Euler
    /// over two `h/2` half-steps, and a Richardson-extrapolated corrector.
    /// Returns `None` if Newton iteration fails to converge for any of the
    /// three sub-steps; otherwise the corrected state and the weighted
    /// error norm between the full step and the half-step pair.
    fn attempt_step(&mut self, h: f64) -> Option<(Array1<f64>, f64)> {
        let y0 = self.state.clone();
        let y_full = self.backward_euler_step(&y0, h)?;
        let y_half1 = self.backward_euler_step(&y0, h / 2.0)?;
        let y_half2 = self.backward_euler_step(&y_half1, h / 2.0)?;

        let error_norm = self.weighted_error_norm(&y_full, &y_half2);
        let corrected = &y_half2 * 2.0 - &y_full;
        Some((corrected, error_norm))
    }

    /// Solves `y = y0 + h*f(y)` for `y` by Newton iteration, factoring the
    /// residual Jacobian `I - h*J_f(y)` (finite-difference `J_f`) with a
    /// dense LU solve each iteration.
    fn backward_euler_step(&mut self, y0: &Array1<f64>, h: f64) -> Option<Array1<f64>> {
        let dim = y0.len();
        let mut y = y0.clone();
        let mut f_y = Array1::<f64>::zeros(dim);

        for _ in 0..MAX_NEWTON_ITERATIONS {
            evaluate_rhs(
                &self.material,
                &self.reactor,
                &self.layout,
                y.as_slice().expect("state is contiguous"),
                &mut self.cache,
                f_y.as_slice_mut().expect("state is contiguous"),
            );

            let residual = &y - y0 - h * &f_y;
            let tol = self.newton_tolerance(&y);
            if residual.iter().all(|r| r.abs() <= tol) {
                return Some(y);
            }

            let jacobian_f = self.finite_difference_jacobian(&y, &f_y);
            let mut residual_jacobian = Array2::<f64>::eye(dim);
            residual_jacobian.scaled_add(-h, &jacobian_f);

            let delta = residual_jacobian.solve_into(-residual).ok()?;
            y += &delta;

            if delta.iter().any(|d| !d.is_finite()) {
                return None;
            }
        }
        None
    }

    /// Finite-difference Jacobian of the RHS at `y` (§1 Non-goal: the
    /// integrator never receives an analytical Jacobian). `f_y` is the
    /// already-evaluated RHS at `y`, reused as the base point. The caller
    /// scales this by `-h` (and adds the identity) to get the residual
    /// Jacobian `I - h*J_f(y)` for `y - y0 - h*f(y)`.
    fn finite_difference_jacobian(&mut self, y: &Array1<f64>, f_y: &Array1<f64>) -> Array2<f64> {
        let dim = y.len();
        let mut jacobian = Array2::<f64>::zeros((dim, dim));
        let mut perturbed = y.clone();
        let mut f_perturbed = Array1::<f64>::zeros(dim);

        for col in 0..dim {
            let eps = f64::EPSILON.sqrt() * y[col].abs().max(1.0);
            perturbed[col] += eps;
            evaluate_rhs(
                &self.material,
                &self.reactor,
                &self.layout,
                perturbed.as_slice().expect("state is contiguous"),
                &mut self.cache,
                f_perturbed.as_slice_mut().expect("state is contiguous"),
            );
            perturbed[col] = y[col];

            for row in 0..dim {
                jacobian[(row, col)] = (f_perturbed[row] - f_y[row]) / eps;
            }
        }
        jacobian
    }

    fn newton_tolerance(&self, y: &Array1<f64>) -> f64 {
        let scale = y.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        NEWTON_CONVERGENCE_FACTOR * (self.absolute_tolerance + self.relative_tolerance * scale)
    }

    /// Weighted RMS norm of `(a - b)` against `atol + rtol*|y|`, the
    /// standard adaptive-step error measure (>1.0 rejects the step).
    fn weighted_error_norm(&self, a: &Array1<f64>, b: &Array1<f64>) -> f64 {
        let dim = a.len();
        let sum_sq: f64 = (0..dim)
            .map(|i| {
                let scale = self.absolute_tolerance + self.relative_tolerance * b[i].abs();
                let e = (a[i] - b[i]) / scale;
                e * e
            })
            .sum();
        (sum_sq / dim as f64).sqrt()
    }

    /// Scans the current state for the first cluster size with a negative,
    /// NaN, or infinite concentration, or a negative dislocation density.
    fn first_invalid_size(&self) -> Option<usize> {
        let n = self.layout.max_cluster_size;
        let rho = self.state[self.layout.dislocation_density_index()];
        if !rho.is_finite() || rho < 0.0 {
            return Some(0);
        }
        for size in 1..=n {
            let i = self.state[self.layout.interstitial_index(size)];
            let v = self.state[self.layout.vacancy_index(size)];
            if !i.is_finite() || !v.is_finite() || i < 0.0 || v < 0.0 {
                return Some(size);
            }
        }
        None
    }

    fn snapshot(&self) -> StateSnapshot {
        let n = self.layout.max_cluster_size;
        let interstitials = (1..=n)
            .map(|size| self.state[self.layout.interstitial_index(size)])
            .collect();
        let vacancies = (1..=n)
            .map(|size| self.state[self.layout.vacancy_index(size)])
            .collect();
        StateSnapshot {
            time: self.time,
            dpa: self.time * self.reactor.flux,
            interstitials,
            vacancies,
            dislocation_density: self.state[self.layout.dislocation_density_index()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClusterDynamicsConfig;

    fn small_config() -> ClusterDynamicsConfig {
        let mut config = ClusterDynamicsConfig::with_presets();
        config.max_cluster_size = 10;
        let len = config.max_cluster_size + 1;
        config.init_interstitials = vec![0.0; len];
        config.init_vacancies = vec![0.0; len];
        config
    }

    #[test]
    fn new_rejects_max_cluster_size_below_five() {
        let mut config = small_config();
        config.max_cluster_size = 4;
        config.init_interstitials = vec![0.0; 5];
        config.init_vacancies = vec![0.0; 5];
        assert!(Engine::new(config).is_err());
    }

    #[test]
    fn new_rejects_mismatched_initial_array_length() {
        let mut config = small_config();
        config.init_interstitials = vec![0.0; 3];
        assert!(Engine::new(config).is_err());
    }

    #[test]
    fn advance_rejects_nonpositive_dt() {
        let engine = Engine::new(small_config());
        let mut engine = engine.expect("valid config");
        assert!(engine.advance(0.0).is_err());
        assert!(engine.advance(-1.0).is_err());
    }

    #[test]
    fn zero_flux_zero_state_stays_zero() {
        let mut config = small_config();
        config.reactor.flux = 0.0;
        let mut engine = Engine::new(config).expect("valid config");
        let snapshot = engine.advance(1.0).expect("advance succeeds");
        assert!(snapshot.interstitials.iter().all(|&c| c == 0.0));
        assert!(snapshot.vacancies.iter().all(|&c| c == 0.0));
    }

    #[test]
    fn setters_round_trip() {
        let mut engine = Engine::new(small_config()).expect("valid config");
        engine.set_relative_tolerance(1e-8);
        assert_eq!(engine.relative_tolerance(), 1e-8);
        engine.set_data_validation_on(false);
        assert!(!engine.data_validation_on());
    }
}
