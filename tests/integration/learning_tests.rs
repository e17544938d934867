use hmmgraph::{IdentityRegistry, LearningConfig, StopReason};

use super::fixtures::{assert_close, biased_coins, three_coins, COIN_SEQUENCE};

#[test]
fn fifteen_rounds_reach_reference_parameters() {
    let mut reg = IdentityRegistry::new();
    let mut hmm = biased_coins(&mut reg);

    let report = hmm.update(&COIN_SEQUENCE, 0.0, 15).unwrap();
    assert_eq!(report.iterations, 14);
    assert_eq!(report.stop, StopReason::BudgetExhausted);

    let p = hmm.evaluate_forward(&COIN_SEQUENCE).unwrap();
    assert_close(p, 0.2479884, 1e-6);
    assert_close(report.likelihood, p, 1e-15);

    let start = hmm.start_probabilities();
    assert_close(start[0], 1.0, 1e-6);
    assert_close(start[1], 0.0, 1e-6);
    assert_close(start[2], 0.0, 1e-6);

    let expected_transitions = [
        ("Etat_1", "Etat_1", 0.0),
        ("Etat_1", "Etat_2", 0.0),
        ("Etat_1", "Etat_3", 1.0),
        ("Etat_2", "Etat_1", 0.2119321),
        ("Etat_2", "Etat_2", 0.788068),
        ("Etat_2", "Etat_3", 0.0),
        ("Etat_3", "Etat_1", 0.0),
        ("Etat_3", "Etat_2", 0.5147933),
        ("Etat_3", "Etat_3", 0.4852067),
    ];
    for (from, to, expected) in expected_transitions {
        assert_close(hmm.transition_by_name(from, to).unwrap(), expected, 1e-6);
    }

    let expected_emissions = [
        ("Etat_1", "Pile", 1.0),
        ("Etat_1", "Face", 0.0),
        ("Etat_2", "Pile", 0.9686517),
        ("Etat_2", "Face", 0.03134831),
        ("Etat_3", "Pile", 0.0),
        ("Etat_3", "Face", 1.0),
    ];
    for (state, symbol, expected) in expected_emissions {
        assert_close(hmm.emission_by_name(state, &symbol).unwrap(), expected, 1e-6);
    }
}

#[test]
fn likelihood_never_decreases_across_rounds() {
    let mut reg = IdentityRegistry::new();
    let mut hmm = three_coins(&mut reg);
    let mut previous = hmm.evaluate_forward(&COIN_SEQUENCE).unwrap();
    for _ in 0..5 {
        hmm.update(&COIN_SEQUENCE, 0.0, 2).unwrap();
        let current = hmm.evaluate_forward(&COIN_SEQUENCE).unwrap();
        assert!(current >= previous - 1e-12, "{} dropped to {}", previous, current);
        previous = current;
    }
}

#[test]
fn tolerance_stops_before_budget() {
    let mut reg = IdentityRegistry::new();
    let mut hmm = biased_coins(&mut reg);
    let config = LearningConfig::new().with_tolerance(1e-3).with_iterations(1000);
    let report = hmm.update_with(&COIN_SEQUENCE, &config).unwrap();
    assert_eq!(report.stop, StopReason::Converged);
    assert!(report.iterations < 999);
}

#[test]
fn learned_model_stays_stochastic() {
    let mut reg = IdentityRegistry::new();
    let mut hmm = biased_coins(&mut reg);
    hmm.update(&COIN_SEQUENCE, 0.0, 15).unwrap();
    assert!(hmm.check_values());
    assert!(hmm.validate_numerical_stability().unwrap().is_empty());
}

#[test]
fn skipped_run_leaves_model_as_is() {
    let mut reg = IdentityRegistry::new();
    let mut hmm = biased_coins(&mut reg);
    let before = hmm.clone();
    let report = hmm.update(&COIN_SEQUENCE, -1.0, -1).unwrap();
    assert_eq!(report.stop, StopReason::Skipped);
    assert_eq!(hmm.transitions(), before.transitions());
    assert_eq!(hmm.emissions(), before.emissions());
    assert_eq!(hmm.start_probabilities(), before.start_probabilities());
}

#[test]
fn non_finite_likelihood_stops_before_any_update() {
    let mut reg = IdentityRegistry::new();
    let mut hmm = biased_coins(&mut reg);
    hmm.set_emission(1, 0, f64::NAN).unwrap();
    let transitions = hmm.transitions().clone();
    let emissions: Vec<u64> = hmm.emissions().as_slice().iter().map(|v| v.to_bits()).collect();
    let start = hmm.start_probabilities();

    let report = hmm.update(&COIN_SEQUENCE, 1e-6, 15).unwrap();
    assert_eq!(report.stop, StopReason::NonFinite);
    assert_eq!(report.iterations, 0);
    assert!(report.likelihood.is_nan());

    assert_eq!(hmm.transitions(), &transitions);
    let after: Vec<u64> = hmm.emissions().as_slice().iter().map(|v| v.to_bits()).collect();
    assert_eq!(after, emissions);
    assert_eq!(hmm.start_probabilities(), start);
}
