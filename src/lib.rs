//! Mean-field rate-theory simulation of point-defect cluster populations in
//! a crystalline metal lattice under neutron irradiation, after C. Pokor et
//! al. (J. Nucl. Mater. 326, 2004) augmented by N. Sakaguchi's dislocation
//! loop-unfaulting term (Acta Mat. 1131, 2001).
//!
//! The crate is the rate-equation engine only: the closed-form physical
//! rate coefficients ([`kernel`]), the stiff integrator driver
//! ([`integrator::Engine`]), and the configuration/snapshot surface
//! ([`config`], [`state`]) it exposes. Persistence, configuration loading,
//! progress reporting, and any CLI are external collaborators; see
//! `demos/` for a minimal, non-published exerciser.

pub mod config;
pub mod error;
pub mod kernel;
pub mod material;
pub mod reactor;
pub mod sensitivity;
pub mod state;

mod integrator;

pub use config::ClusterDynamicsConfig;
pub use error::{ClusterDynamicsError, Result};
pub use integrator::Engine;
pub use material::Material;
pub use reactor::Reactor;
pub use sensitivity::SensitivityVariable;
pub use state::StateSnapshot;

#[cfg(test)]
mod tests;
