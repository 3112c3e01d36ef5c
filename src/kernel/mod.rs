//! The rate kernel (§4.1): pure physical rate coefficients and the
//! right-hand-side assembly the integrator drives.

pub mod cache;
pub mod constants;
pub mod derivatives;
pub mod rates;

pub use cache::StepCache;
pub use derivatives::evaluate_rhs;
