use hmmgraph::{IdentityRegistry, MarkovModel, ModelError, State, Vertex};

use super::fixtures::weather_chain;

#[test]
fn three_ways_of_setting_a_chain_agree() {
    let mut reg = IdentityRegistry::new();
    let by_table = weather_chain(&mut reg);

    let mut by_index: MarkovModel = MarkovModel::new(&mut reg, 2).unwrap();
    by_index.set_state(0, State::new(0.6, "Pluie")).unwrap();
    by_index.set_state(1, State::new(0.4, "Soleil")).unwrap();
    by_index.set_transition(0, 0, 0.7).unwrap();
    by_index.set_transition(0, 1, 0.3).unwrap();
    by_index.set_transition(1, 0, 0.4).unwrap();
    by_index.set_transition(1, 1, 0.6).unwrap();

    let mut by_name: MarkovModel = MarkovModel::new(&mut reg, 2).unwrap();
    by_name.set_states_named(&[0.0, 0.0], &["Pluie", "Soleil"]).unwrap();
    by_name.set_state_by_name("Pluie", State::new(0.6, "Pluie")).unwrap();
    by_name.set_state_by_name("Soleil", State::new(0.4, "Soleil")).unwrap();
    by_name.set_transition_by_name("Pluie", "Pluie", 0.7).unwrap();
    by_name.set_transition_by_name("Pluie", "Soleil", 0.3).unwrap();
    by_name.set_transition_by_name("Soleil", "Pluie", 0.4).unwrap();
    by_name.set_transition_by_name("Soleil", "Soleil", 0.6).unwrap();

    for chain in [&by_index, &by_name] {
        assert_eq!(chain.start_probabilities(), by_table.start_probabilities());
        assert_eq!(chain.transitions(), by_table.transitions());
        assert!(chain.check_values());
    }
}

#[test]
fn chain_graph_holds_only_states() {
    let mut reg = IdentityRegistry::new();
    let chain = weather_chain(&mut reg);
    let graph = chain.graph();

    assert_eq!(graph.node_count(), 2);
    assert!(graph.nodes().iter().all(|n| n.value.is_state()));
    assert_eq!(graph.seek("state_1").unwrap().value, Vertex::State(State::new(0.4, "Soleil")));
    // every state reaches every state
    assert_eq!(graph.connected_nodes().len(), 2);
    for node in graph.nodes() {
        assert_eq!(node.successors().len(), 2);
    }
}

#[test]
fn flat_transition_index_is_row_major() {
    let mut reg = IdentityRegistry::new();
    let chain = weather_chain(&mut reg);
    let flat: Vec<f64> = (0..4).map(|k| chain.transition_at(k).unwrap()).collect();
    assert_eq!(flat, vec![0.7, 0.3, 0.4, 0.6]);
    assert!(matches!(chain.transition_at(4), Err(ModelError::OutOfRange { index: 4, len: 4, .. })));
}

#[test]
fn transition_edges_match_endpoints() {
    let mut reg = IdentityRegistry::new();
    let chain = weather_chain(&mut reg);
    let edge = chain.transition_edge(1, 0).unwrap();
    assert_eq!(edge.label, "edge_state_1_state_0");
    assert_eq!(edge.from, chain.state_node(1).unwrap().id);
}

#[test]
fn mismatched_bulk_setters_leave_chain_untouched() {
    let mut reg = IdentityRegistry::new();
    let mut chain = weather_chain(&mut reg);
    assert!(chain.set_states(&[0.2, 0.3, 0.5]).is_err());
    assert!(chain.set_states_from(&[State::new(1.0, "Seul")]).is_err());
    assert!(chain.set_transitions(&[vec![1.0, 0.0], vec![1.0]]).is_err());

    assert_eq!(chain.start_probabilities(), vec![0.6, 0.4]);
    assert_eq!(chain.transition(1, 1).unwrap(), 0.6);
}

#[test]
fn check_values_tracks_corruption_and_repair() {
    let mut reg = IdentityRegistry::new();
    let mut chain = weather_chain(&mut reg);
    assert!(chain.check_values());

    chain.set_transition(0, 1, 0.5).unwrap();
    assert!(!chain.check_values());

    chain.set_transition(0, 0, 0.5).unwrap();
    assert!(chain.check_values());
}

#[test]
fn cloned_chain_is_independent() {
    let mut reg = IdentityRegistry::new();
    let chain = weather_chain(&mut reg);
    let mut copy = chain.clone();
    copy.set_transition(0, 0, 0.0).unwrap();
    copy.set_start_probability(0, 0.0).unwrap();

    assert_eq!(chain.transition(0, 0).unwrap(), 0.7);
    assert_eq!(chain.start_probability(0).unwrap(), 0.6);
    assert_eq!(copy.id(), chain.id());
}
