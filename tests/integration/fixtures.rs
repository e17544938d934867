//! Reference models shared by the integration tests.

use hmmgraph::{HiddenMarkovModel, IdentityRegistry, MarkovModel};

pub const WEEKEND_SEQUENCE: [&str; 4] = ["Soleil", "Pluie", "Pluie", "Soleil"];
pub const COIN_SEQUENCE: [&str; 5] = ["Pile", "Face", "Face", "Pile", "Pile"];

/// Two-state weather chain: Pluie / Soleil.
pub fn weather_chain(reg: &mut IdentityRegistry) -> MarkovModel {
    let mut chain: MarkovModel = MarkovModel::new(reg, 2).unwrap();
    chain.set_states_named(&[0.6, 0.4], &["Pluie", "Soleil"]).unwrap();
    chain.set_transitions(&[[0.7, 0.3], [0.4, 0.6]]).unwrap();
    chain
}

/// Two-day model where Sunday is absorbing.
pub fn weekend(reg: &mut IdentityRegistry) -> HiddenMarkovModel<&'static str> {
    let mut hmm = HiddenMarkovModel::new(reg, 2, 2).unwrap();
    hmm.set_states_named(&[1.0, 0.0], &["Samedi", "Dimanche"]).unwrap();
    hmm.set_transitions(&[[0.5, 0.5], [0.0, 1.0]]).unwrap();
    hmm.set_observations(&["Soleil", "Pluie"]).unwrap();
    hmm.set_emissions(&[[0.3, 0.7], [0.8, 0.2]]).unwrap();
    hmm
}

/// Three coins: always heads, fair, always tails.
pub fn three_coins(reg: &mut IdentityRegistry) -> HiddenMarkovModel<&'static str> {
    let mut hmm = HiddenMarkovModel::new(reg, 3, 2).unwrap();
    hmm.set_states_named(&[0.5, 0.3, 0.2], &["Etat_1", "Etat_2", "Etat_3"]).unwrap();
    hmm.set_transitions(&[[0.45, 0.35, 0.2], [0.1, 0.5, 0.4], [0.15, 0.25, 0.6]])
        .unwrap();
    hmm.set_observations(&["Pile", "Face"]).unwrap();
    hmm.set_emissions(&[[1.0, 0.0], [0.5, 0.5], [0.0, 1.0]]).unwrap();
    hmm
}

/// Three-coin model with fitted-looking parameters, used for decoding and
/// learning.
pub fn biased_coins(reg: &mut IdentityRegistry) -> HiddenMarkovModel<&'static str> {
    let mut hmm = HiddenMarkovModel::new(reg, 3, 2).unwrap();
    hmm.set_states_named(&[0.656, 0.344, 0.0], &["Etat_1", "Etat_2", "Etat_3"]).unwrap();
    hmm.set_transitions(&[[0.346, 0.365, 0.289], [0.159, 0.514, 0.327], [0.377, 0.259, 0.364]])
        .unwrap();
    hmm.set_observations(&["Pile", "Face"]).unwrap();
    hmm.set_emissions(&[[1.0, 0.0], [0.631, 0.369], [0.0, 1.0]]).unwrap();
    hmm
}

pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() < tolerance,
        "expected {} got {} (tolerance {})",
        expected,
        actual,
        tolerance
    );
}
