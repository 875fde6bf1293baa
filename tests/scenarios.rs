use fsm_minimize::prelude::*;

fn classes_of(minimization: &Minimization) -> Vec<Vec<StateId>> {
    minimization
        .classes()
        .iter()
        .map(|class| class.iter().copied().collect())
        .collect()
}

#[test_log::test]
fn mutually_referential_states_are_equivalent() {
    // S0 --0/0--> S1, S1 --0/0--> S0
    let model = TransitionModel::from_rows(vec![vec![(1, 0)], vec![(0, 0)]]).unwrap();
    let minimization = minimize(&model).unwrap();

    assert_eq!(minimization.equivalent_pairs(), &[(0, 1)]);
    assert_eq!(classes_of(&minimization), vec![vec![0, 1]]);
}

#[test_log::test]
fn differing_outputs_are_never_equivalent() {
    // S0 --0/0--> S0, S1 --0/1--> S1
    let model = TransitionModel::from_rows(vec![vec![(0, 0)], vec![(1, 1)]]).unwrap();
    let minimization = minimize(&model).unwrap();

    assert!(minimization.equivalent_pairs().is_empty());
    assert!(minimization.is_minimal());
    assert_eq!(classes_of(&minimization), vec![vec![0], vec![1]]);
}

#[test_log::test]
fn elimination_follows_eliminated_successors() {
    // S0 and S2 emit the same output, but on input 0 they move to S0 and S1, which differ
    let model =
        TransitionModel::from_rows(vec![vec![(0, 0)], vec![(1, 1)], vec![(1, 0)]]).unwrap();

    let mut engine = EliminationEngine::new(&model).unwrap();
    assert_eq!(engine.mark_output_differences(), 2);
    assert!(!engine.table().lookup(2, 0).unwrap().is_eliminated());
    engine.record_dependencies();
    assert_eq!(
        engine.table().lookup(2, 0).unwrap().dependencies(),
        &[StatePair::new(1, 0).unwrap()]
    );
    engine.propagate();
    assert!(engine.table().lookup(2, 0).unwrap().is_eliminated());

    let minimization = minimize(&model).unwrap();
    assert!(minimization.equivalent_pairs().is_empty());
    assert_eq!(classes_of(&minimization), vec![vec![0], vec![1], vec![2]]);
}

#[test_log::test]
fn late_elimination_is_picked_up_in_later_pass() {
    // (S1, S0) is visited before (S2, S0), on which it depends
    let model = TransitionModel::from_rows(vec![
        vec![(0, 0)],
        vec![(2, 0)],
        vec![(3, 0)],
        vec![(3, 1)],
    ])
    .unwrap();
    let minimization = minimize(&model).unwrap();
    assert!(minimization.is_minimal());
    assert_eq!(minimization.classes().size(), 4);
}

#[test]
fn single_state_machine() {
    let model = TransitionModel::from_rows(vec![vec![(0, 3), (0, 4)]]).unwrap();
    let minimization = minimize(&model).unwrap();
    assert!(minimization.equivalent_pairs().is_empty());
    assert_eq!(classes_of(&minimization), vec![vec![0]]);
}

#[test]
fn classes_merge_through_chains_of_pairs() {
    // all four states loop on themselves with the same output, S3 visits S1 on input 1
    let model = TransitionModel::from_rows(vec![
        vec![(0, 7), (0, 7)],
        vec![(1, 7), (1, 7)],
        vec![(2, 7), (2, 7)],
        vec![(3, 7), (1, 7)],
    ])
    .unwrap();
    let minimization = minimize(&model).unwrap();
    assert_eq!(classes_of(&minimization), vec![vec![0, 1, 2, 3]]);
    assert_eq!(minimization.equivalent_pairs().len(), 6);
    assert_eq!(
        minimization.equivalent_pairs(),
        &[(0, 1), (0, 2), (1, 2), (0, 3), (1, 3), (2, 3)]
    );
}

#[test]
fn classes_are_numbered_by_lowest_member() {
    // S0 ~ S3 and S1 ~ S2, with differing outputs between the two groups
    let model = TransitionModel::from_rows(vec![
        vec![(3, 'a')],
        vec![(2, 'b')],
        vec![(1, 'b')],
        vec![(0, 'a')],
    ])
    .unwrap();
    let minimization = minimize(&model).unwrap();
    assert_eq!(classes_of(&minimization), vec![vec![0, 3], vec![1, 2]]);
    assert_eq!(minimization.class_of(3), Some(0));
    assert_eq!(minimization.class_of(2), Some(1));
    assert_eq!(minimization.equivalent_pairs(), &[(1, 2), (0, 3)]);
}

#[test]
fn parsed_description_minimizes() {
    let model = parse_description(
        "# the mutually referential machine\n\
         2 1\n\
         1 0\n\
         0 0\n",
    )
    .unwrap();
    let report = minimize(&model).unwrap().to_string();
    assert!(report.contains("S0 and S1 are equivalent."));
    assert!(report.contains("A0 = { 0, 1 }"));
}

#[test]
fn invalid_models_fail_before_minimization() {
    assert!(matches!(
        TransitionModel::from_rows(vec![vec![(0, 0)], vec![(5, 0)]]),
        Err(ValidationError::OutOfRangeTransition { .. })
    ));
    assert!(matches!(
        parse_description("3 0"),
        Err(ValidationError::InvalidCount { what: "inputs", .. })
    ));
}

#[test]
fn validation_errors_chain_into_anyhow() {
    use anyhow::Context;

    let run = |description: &str| -> anyhow::Result<Minimization> {
        let model = parse_description(description).context("could not parse machine description")?;
        Ok(minimize(&model)?)
    };

    assert!(run("2 1  1 0  0 0").is_ok());
    let err = run("2 1  1 0  2 0").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ValidationError>(),
        Some(ValidationError::OutOfRangeTransition { state: 1, .. })
    ));
    assert_eq!(
        format!("{err:#}"),
        "could not parse machine description: \
         transition from S1 on input 0 leads to 2, but there are only 2 states"
    );
}
