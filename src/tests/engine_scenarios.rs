//! End-to-end scenarios and boundary behaviors from §8, run against the
//! full `Engine`.

use crate::config::ClusterDynamicsConfig;
use crate::state::StateSnapshot;
use crate::Engine;

fn small_config(max_cluster_size: usize) -> ClusterDynamicsConfig {
    let mut config = ClusterDynamicsConfig::with_presets();
    config.max_cluster_size = max_cluster_size;
    let len = max_cluster_size + 1;
    config.init_interstitials = vec![0.0; len];
    config.init_vacancies = vec![0.0; len];
    config
}

/// Boundary behavior: `max_cluster_size = 5` is the minimum legal N and
/// must construct successfully.
#[test]
fn minimum_legal_cluster_size_constructs() {
    let config = small_config(5);
    assert!(Engine::new(config).is_ok());
}

#[test]
fn cluster_size_below_minimum_is_rejected() {
    let mut config = small_config(5);
    config.max_cluster_size = 4;
    config.init_interstitials = vec![0.0; 5];
    config.init_vacancies = vec![0.0; 5];
    assert!(Engine::new(config).is_err());
}

/// Scenario 3: `advance` returns a snapshot whose time is exactly the
/// requested endpoint.
#[test]
fn advance_lands_exactly_on_the_requested_endpoint() {
    let mut engine = Engine::new(small_config(5)).expect("valid config");
    let snapshot = engine.advance(1.5e-3).expect("advance succeeds");
    assert_eq!(snapshot.time, 1.5e-3);
    assert_eq!(snapshot.dpa, 1.5e-3 * engine.reactor().flux);
}

/// Scenario 4: zero flux with a perfect initial lattice stays at zero.
#[test]
fn zero_flux_perfect_lattice_stays_at_zero() {
    let mut config = small_config(5);
    config.reactor.flux = 0.0;
    let mut engine = Engine::new(config).expect("valid config");
    let snapshot = engine.advance(1.0).expect("advance succeeds");

    assert!(snapshot.interstitials.iter().all(|&c| c == 0.0));
    assert!(snapshot.vacancies.iter().all(|&c| c == 0.0));
    assert_eq!(
        snapshot.dislocation_density,
        engine.material().dislocation_density_0
    );
}

/// Round-trip / composition: `advance(dt1)` then `advance(dt2)` agrees
/// with `advance(dt1+dt2)` up to the integrator's own tolerance.
#[test]
fn two_small_advances_agree_with_one_combined_advance() {
    let dt1 = 2e-6;
    let dt2 = 3e-6;

    let mut split = Engine::new(small_config(5)).expect("valid config");
    split.advance(dt1).expect("first half advances");
    let split_snapshot = split.advance(dt2).expect("second half advances");

    let mut combined = Engine::new(small_config(5)).expect("valid config");
    let combined_snapshot = combined.advance(dt1 + dt2).expect("combined advance");

    assert!((split_snapshot.time - combined_snapshot.time).abs() < 1e-15);

    let tolerance = 10.0 * combined.relative_tolerance() + combined.absolute_tolerance();
    for (a, b) in split_snapshot
        .interstitials
        .iter()
        .zip(&combined_snapshot.interstitials)
    {
        assert!((a - b).abs() <= tolerance, "a={a}, b={b}");
    }
    for (a, b) in split_snapshot.vacancies.iter().zip(&combined_snapshot.vacancies) {
        assert!((a - b).abs() <= tolerance, "a={a}, b={b}");
    }
}

/// Scenario 6: a snapshot produced by a real engine round-trips bitwise
/// through the length-prefixed binary blob a persistence collaborator
/// would store.
#[test]
fn engine_snapshot_round_trips_through_persistence_blob() {
    let mut engine = Engine::new(small_config(5)).expect("valid config");
    let snapshot = engine.advance(1e-4).expect("advance succeeds");

    let blob = snapshot.to_blob();
    let decoded = StateSnapshot::from_blob(&blob).expect("decodes");

    assert_eq!(decoded, snapshot);
}

/// Setting a tuning knob and reading it back yields the value set.
#[test]
fn setter_round_trip_on_integrator_tuning_knobs() {
    let mut engine = Engine::new(small_config(5)).expect("valid config");

    engine.set_relative_tolerance(1e-9);
    assert_eq!(engine.relative_tolerance(), 1e-9);

    engine.set_max_integration_step(1e-2);
    assert_eq!(engine.max_integration_step(), 1e-2);

    engine.set_data_validation_on(false);
    assert!(!engine.data_validation_on());
}

/// The OSIRIS/SA304 RHS is genuinely stiff (`G_i(1)/V_atom` alone is on the
/// order of 1e15, so even the first step's Newton residual is far outside
/// `newton_tolerance` at `y = y0 = 0`): a single `advance` call here forces
/// several real Newton iterations per interior step, not the trivial
/// zero-residual-at-iteration-0 case the zero-flux tests hit. This pins the
/// `I - h*J_f(y)` residual Jacobian (§4.2) actually converging rather than
/// step-halving to `IntegratorFailure`.
#[test]
fn nonzero_flux_preset_converges_through_many_newton_steps() {
    let mut engine = Engine::new(small_config(10)).expect("valid config");

    let first = engine.advance(1e-3).expect("first stiff advance converges");
    assert!(first.interstitials.iter().all(|&c| c.is_finite() && c >= 0.0));
    assert!(first.vacancies.iter().all(|&c| c.is_finite() && c >= 0.0));
    assert!(first.dislocation_density.is_finite() && first.dislocation_density >= 0.0);
    assert!(
        first.interstitials[0] > 0.0,
        "C_i(1) should have grown off zero under nonzero flux"
    );
    assert!(
        first.vacancies[0] > 0.0,
        "C_v(1) should have grown off zero under nonzero flux"
    );

    let second = engine.advance(1e-3).expect("second stiff advance converges");
    assert!(second.interstitials.iter().all(|&c| c.is_finite() && c >= 0.0));
    assert!(second.vacancies.iter().all(|&c| c.is_finite() && c >= 0.0));
    assert!(second.time > first.time);
}

/// Invariant: every reachable state has nonnegative, finite concentrations
/// and a nonnegative dislocation density.
#[test]
fn reachable_states_stay_within_the_physical_domain() {
    let mut engine = Engine::new(small_config(5)).expect("valid config");
    let snapshot = engine.advance(1e-4).expect("advance succeeds");

    assert!(snapshot
        .interstitials
        .iter()
        .all(|&c| c.is_finite() && c >= 0.0));
    assert!(snapshot.vacancies.iter().all(|&c| c.is_finite() && c >= 0.0));
    assert!(snapshot.dislocation_density.is_finite() && snapshot.dislocation_density >= 0.0);
}
