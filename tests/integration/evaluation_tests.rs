use hmmgraph::{EvaluationMode, IdentityRegistry, ModelError};

use super::fixtures::{assert_close, three_coins, weekend, COIN_SEQUENCE, WEEKEND_SEQUENCE};

#[test]
fn weekend_likelihood_in_every_mode() {
    let mut reg = IdentityRegistry::new();
    let hmm = weekend(&mut reg);

    let expected = 0.0334125;
    assert_close(hmm.evaluate(&WEEKEND_SEQUENCE, EvaluationMode::Forward).unwrap(), expected, 1e-7);
    let backward = hmm.evaluate(&WEEKEND_SEQUENCE, EvaluationMode::Backward).unwrap();
    assert_close(backward, expected, 1e-7);
    for at in 0..WEEKEND_SEQUENCE.len() {
        let p = hmm
            .evaluate(&WEEKEND_SEQUENCE, EvaluationMode::ForwardBackward { at })
            .unwrap();
        assert_close(p, expected, 1e-7);
    }
}

#[test]
fn three_coin_likelihood_in_every_mode() {
    let mut reg = IdentityRegistry::new();
    let hmm = three_coins(&mut reg);

    let expected = 0.0277625;
    assert_close(hmm.evaluate_forward(&COIN_SEQUENCE).unwrap(), expected, 1e-7);
    assert_close(hmm.evaluate(&COIN_SEQUENCE, EvaluationMode::Backward).unwrap(), expected, 1e-7);
    for at in 0..COIN_SEQUENCE.len() {
        let p = hmm.evaluate(&COIN_SEQUENCE, EvaluationMode::ForwardBackward { at }).unwrap();
        assert_close(p, expected, 1e-7);
    }
}

#[test]
fn impossible_sequence_has_zero_likelihood() {
    let mut reg = IdentityRegistry::new();
    let mut silent = weekend(&mut reg);
    // no start mass anywhere
    silent.set_states(&[0.0, 0.0]).unwrap();
    assert_eq!(silent.evaluate_forward(&WEEKEND_SEQUENCE).unwrap(), 0.0);
    assert_eq!(silent.evaluate(&WEEKEND_SEQUENCE, EvaluationMode::Backward).unwrap(), 0.0);
}

#[test]
fn empty_and_invalid_inputs() {
    let mut reg = IdentityRegistry::new();
    let hmm = weekend(&mut reg);

    assert_eq!(hmm.evaluate_forward(&[]).unwrap(), 0.0);
    assert!(matches!(
        hmm.evaluate(&WEEKEND_SEQUENCE, EvaluationMode::ForwardBackward { at: 4 }),
        Err(ModelError::OutOfRange { index: 4, len: 4, .. })
    ));
    assert!(matches!(
        hmm.evaluate(&["Soleil", "Brouillard"], EvaluationMode::Backward),
        Err(ModelError::NotFound(_))
    ));
}

#[test]
fn emission_setters_by_name_and_index_agree() {
    let mut reg = IdentityRegistry::new();
    let mut by_name = weekend(&mut reg);
    let mut by_index = weekend(&mut reg);

    by_name.set_emission_by_name("Samedi", &"Soleil", 0.4).unwrap();
    by_name.set_emission_by_name("Samedi", &"Pluie", 0.6).unwrap();
    by_index.set_emission(0, 0, 0.4).unwrap();
    by_index.set_emission(0, 1, 0.6).unwrap();

    assert_eq!(by_name.emissions(), by_index.emissions());
    assert_eq!(
        by_name.evaluate_forward(&WEEKEND_SEQUENCE).unwrap(),
        by_index.evaluate_forward(&WEEKEND_SEQUENCE).unwrap()
    );
}
