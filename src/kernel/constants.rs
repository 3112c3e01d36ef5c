//! Numerical constants shared across the rate kernel.

/// Boltzmann constant in eV/K, used throughout the kernel's Arrhenius terms.
pub const BOLTZMANN_EV_KELVIN: f64 = 8.6173e-5;
