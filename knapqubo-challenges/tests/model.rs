use knapqubo_challenges::*;
use serde_json::json;

#[test]
fn test_var_names() {
    assert_eq!(Var::Item(12).to_string(), "x12");
    assert_eq!(Var::Slack(0).to_string(), "y0");
    assert_eq!("x3".parse::<Var>().unwrap(), Var::Item(3));
    assert_eq!("y41".parse::<Var>().unwrap(), Var::Slack(41));
    for bad in ["", "x", "z1", "x-1", "x+1", "y1a", "X1"] {
        assert!(
            matches!(bad.parse::<Var>(), Err(QuboError::InvalidVariable(_))),
            "{} should not parse",
            bad
        );
    }
}

#[test]
fn test_var_order() {
    assert!(Var::Item(10) < Var::Slack(0));
    assert!(Var::Slack(2) < Var::Slack(10));
    assert!(Var::Item(2) < Var::Item(10));
}

#[test]
fn test_set_overwrites() {
    let mut model = QuboModel::new();
    model.set_linear(Var::Item(0), 1.0);
    model.set_linear(Var::Item(0), -4.0);
    model
        .set_quadratic(Var::Slack(1), Var::Item(0), 2.0)
        .unwrap();
    model
        .set_quadratic(Var::Item(0), Var::Slack(1), 6.0)
        .unwrap();

    assert_eq!(model.linear(Var::Item(0)), Some(-4.0));
    assert_eq!(model.linear(Var::Slack(1)), Some(0.0));
    assert_eq!(model.num_interactions(), 1);
    assert_eq!(model.quadratic(Var::Slack(1), Var::Item(0)), Some(6.0));
}

#[test]
fn test_self_interaction_rejected() {
    let mut model = QuboModel::new();
    assert!(matches!(
        model.set_quadratic(Var::Slack(2), Var::Slack(2), 1.0),
        Err(QuboError::SelfInteraction(Var::Slack(2)))
    ));
    assert_eq!(model.num_variables(), 0);
}

#[test]
fn test_energy() {
    let model = knapsack_qubo(&[10.0], &[5], 7).unwrap();
    // -100 + 10*5^2 - 2*10*5*5
    assert_eq!(
        model.energy(&[Var::Item(0), Var::Slack(5)], &[1, 1]),
        -350.0
    );
    assert_eq!(model.energy(&[Var::Item(0)], &[0]), 0.0);
    assert_eq!(model.energy(&[], &[]), 0.0);
}

#[test]
fn test_indexed_matches_model() {
    let model = knapsack_qubo(&[4.0, 2.5, 9.0], &[3, 1, 4], 5).unwrap();
    let indexed = model.indexed();
    assert_eq!(indexed.num_variables(), model.num_variables());

    let n = indexed.num_variables();
    let patterns: Vec<Vec<u8>> = (0..16u32)
        .map(|seed| {
            (0..n)
                .map(|i| ((seed.wrapping_mul(2654435761) >> (i % 32)) & 1) as u8)
                .collect()
        })
        .collect();
    for sample in &patterns {
        let energy = indexed.energy(sample);
        assert!((energy - model.energy(&indexed.variables, sample)).abs() < 1e-9);
        for i in 0..n {
            let mut flipped = sample.clone();
            flipped[i] ^= 1;
            let delta = indexed.flip_delta(sample, i);
            assert!((indexed.energy(&flipped) - (energy + delta)).abs() < 1e-9);
        }
    }
}

#[test]
fn test_json() {
    let model = knapsack_qubo(&[3.0, 5.0], &[1, 2], 2).unwrap();
    let value = serde_json::to_value(&model).unwrap();
    assert_eq!(value["linear"]["x1"], json!(-25.0));
    assert_eq!(value["linear"]["y1"], json!(5.0));
    assert_eq!(value["quadratic"][0], json!(["x0", "x1", 20.0]));

    let parsed: QuboModel = serde_json::from_value(value).unwrap();
    assert_eq!(parsed, model);

    let self_loop = json!({ "linear": { "x0": 1.0 }, "quadratic": [["x0", "x0", 1.0]] });
    assert!(serde_json::from_value::<QuboModel>(self_loop).is_err());
    let bad_name = json!({ "linear": { "q0": 1.0 }, "quadratic": [] });
    assert!(serde_json::from_value::<QuboModel>(bad_name).is_err());
}
