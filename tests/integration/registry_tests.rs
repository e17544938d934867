use hmmgraph::{
    Graph, HiddenMarkovModel, IdentityRegistry, MarkovModel, ModelError, Node, ObjectId,
    ObjectKind,
};

#[test]
fn every_part_of_a_model_is_registered() {
    let mut reg = IdentityRegistry::new();
    let hmm: HiddenMarkovModel<char> =
        HiddenMarkovModel::with_label(&mut reg, 2, 3, "gesture").unwrap();

    // model + 2 states + 3 observations + 4 transitions + 6 emissions
    assert_eq!(reg.len(), 16);
    assert_eq!(reg.find_by_label("state_1").len(), 1);
    assert_eq!(reg.find_by_label("observation_2").len(), 1);
    assert_eq!(reg.find_by_label("edge_state_0_observation_2").len(), 1);

    let node = hmm.state_node(0).unwrap();
    let entry = reg.find_by_id(node.id.into()).unwrap();
    assert_eq!(entry.kind, ObjectKind::Node);
    assert_eq!(entry.label, "state_0");
}

#[test]
fn labels_are_shared_across_models() {
    let mut reg = IdentityRegistry::new();
    let _a: MarkovModel = MarkovModel::new(&mut reg, 1).unwrap();
    let _b: MarkovModel = MarkovModel::new(&mut reg, 1).unwrap();

    let states = reg.find_by_label("state_0");
    assert_eq!(states.len(), 2);
    assert!(states[0].id < states[1].id);
}

#[test]
fn explicit_ids_are_honored_and_skipped_by_allocation() {
    let mut reg = IdentityRegistry::new();
    let g: Graph<()> = Graph::with_id(&mut reg, ObjectId(0), "first").unwrap();
    assert_eq!(g.id(), ObjectId(0));

    let n = Node::new(&mut reg, "next", ());
    assert_ne!(ObjectId::from(n.id), ObjectId(0));

    let err = Graph::<()>::with_id(&mut reg, ObjectId(0), "again").unwrap_err();
    assert_eq!(err, ModelError::DuplicateId(ObjectId(0)));
}

#[test]
fn clearing_the_registry_forgets_everything() {
    let mut reg = IdentityRegistry::new();
    let chain: MarkovModel = MarkovModel::new(&mut reg, 2).unwrap();
    assert!(reg.contains(chain.id()));
    reg.clear();
    assert!(reg.is_empty());
    assert!(reg.find_by_id(chain.id()).is_none());
}

#[test]
fn forgetting_an_id_does_not_free_it() {
    let mut reg = IdentityRegistry::new();
    let first = reg.allocate(ObjectKind::Graph, "g");
    let entry = reg.forget(first).unwrap();
    assert_eq!(entry.label, "g");
    assert!(reg.find_by_label("g").is_empty());

    let second = reg.allocate(ObjectKind::Graph, "g");
    assert_ne!(first, second);
}
