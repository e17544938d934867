use hmmgraph::{IdentityRegistry, ModelError};

use super::fixtures::{biased_coins, weekend, COIN_SEQUENCE, WEEKEND_SEQUENCE};

#[test]
fn biased_coins_decode_to_reference_path() {
    let mut reg = IdentityRegistry::new();
    let hmm = biased_coins(&mut reg);
    assert_eq!(hmm.decode(&COIN_SEQUENCE).unwrap(), vec![0, 2, 2, 0, 0]);
}

#[test]
fn path_score_matches_path_probability() {
    let mut reg = IdentityRegistry::new();
    let hmm = biased_coins(&mut reg);
    let (path, score) = hmm.decode_with_score(&COIN_SEQUENCE).unwrap();

    let symbols = [0usize, 1, 1, 0, 0];
    let mut p =
        hmm.start_probability(path[0]).unwrap() * hmm.emission(path[0], symbols[0]).unwrap();
    for t in 1..path.len() {
        p *= hmm.transition(path[t - 1], path[t]).unwrap()
            * hmm.emission(path[t], symbols[t]).unwrap();
    }
    assert!((score - p).abs() < 1e-15, "score {} path probability {}", score, p);
}

#[test]
fn absorbing_state_is_never_left() {
    let mut reg = IdentityRegistry::new();
    let hmm = weekend(&mut reg);
    let path = hmm.decode(&WEEKEND_SEQUENCE).unwrap();
    assert_eq!(path.len(), 4);
    assert_eq!(path[0], 0);
    let first_sunday = path.iter().position(|&s| s == 1).unwrap_or(path.len());
    assert!(path[first_sunday..].iter().all(|&s| s == 1));
}

#[test]
fn empty_and_unknown_inputs() {
    let mut reg = IdentityRegistry::new();
    let hmm = biased_coins(&mut reg);
    assert!(hmm.decode(&[]).unwrap().is_empty());
    assert!(matches!(hmm.decode(&["Pile", "Tranche"]), Err(ModelError::NotFound(_))));
}
