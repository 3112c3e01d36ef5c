//! Error taxonomy for the cluster-dynamics engine.
//!
//! Every failure mode carries the last state the engine knew to be valid, so
//! a caller can report context without re-deriving it. No partial snapshot is
//! ever returned alongside an error (§7).

use thiserror::Error;

use crate::state::StateSnapshot;

/// Failure outcomes of [`crate::Engine::new`] and [`crate::Engine::advance`].
#[derive(Debug, Error)]
pub enum ClusterDynamicsError {
    /// A configuration or per-call argument violated a precondition.
    /// Retriable once the caller corrects the offending input; the engine is
    /// left untouched.
    #[error("invalid input: {message}")]
    InvalidInput {
        message: String,
        last_valid_state: StateSnapshot,
    },

    /// The stiff integrator could not make progress: step size underflowed
    /// below `min_integration_step`, the interior step budget
    /// (`max_num_integration_steps`) was exhausted, or Newton iteration
    /// failed to converge. Non-retriable on the same engine.
    #[error("integrator failed to advance: {message}")]
    IntegratorFailure {
        message: String,
        last_valid_state: StateSnapshot,
    },

    /// A post-step invariant scan found a negative, NaN, or infinite
    /// concentration, or a negative dislocation density. Non-retriable;
    /// `offending_size` is the cluster size index (0 for the dislocation
    /// density slot) that failed the scan.
    #[error("validation failed for cluster size {offending_size}")]
    ValidationFailure {
        offending_size: usize,
        last_valid_state: StateSnapshot,
    },
}

impl ClusterDynamicsError {
    /// The last state the engine is known to have validly reached, present
    /// on every variant.
    pub fn last_valid_state(&self) -> &StateSnapshot {
        match self {
            Self::InvalidInput {
                last_valid_state, ..
            } => last_valid_state,
            Self::IntegratorFailure {
                last_valid_state, ..
            } => last_valid_state,
            Self::ValidationFailure {
                last_valid_state, ..
            } => last_valid_state,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClusterDynamicsError>;
