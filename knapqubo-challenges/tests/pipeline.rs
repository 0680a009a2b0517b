use anyhow::{anyhow, Result};
use knapqubo_challenges::*;
use std::cell::RefCell;

/// Returns a fixed answer and remembers the model it was given.
struct StubSolver {
    answer: SampleSet,
    seen: RefCell<Option<QuboModel>>,
}

impl Solver for StubSolver {
    fn solve(&self, model: &QuboModel) -> Result<SampleSet> {
        *self.seen.borrow_mut() = Some(model.clone());
        Ok(self.answer.clone())
    }
}

struct FailingSolver;

impl Solver for FailingSolver {
    fn solve(&self, _model: &QuboModel) -> Result<SampleSet> {
        Err(anyhow!("service unavailable"))
    }
}

fn items() -> Vec<Item> {
    vec![
        Item {
            cost: 12.0,
            weight: 10,
        },
        Item {
            cost: 27.0,
            weight: 21,
        },
        Item {
            cost: 20.0,
            weight: 17,
        },
    ]
}

#[test]
fn test_solve_knapsack() {
    let mut answer = SampleSet::new(vec![Var::Item(2), Var::Slack(27), Var::Item(0)]);
    answer.push(vec![1, 1, 1], -270.0);
    answer.push(vec![0, 0, 1], -120.0);
    let solver = StubSolver {
        answer,
        seen: RefCell::new(None),
    };

    let solutions = solve_knapsack(&items(), 30, SlackEncoding::OneHot, &solver).unwrap();
    assert_eq!(solutions.len(), 2);
    assert_eq!(solutions[0].weights, vec![17, 10]);
    assert_eq!(solutions[0].energy, -270.0);
    assert!(solutions[0].feasible);
    assert_eq!(solutions[1].weights, vec![10]);

    let seen = solver.seen.into_inner().unwrap();
    assert_eq!(seen, build_model(&items(), 30, SlackEncoding::OneHot).unwrap());
    assert_eq!(seen.num_variables(), 33);
}

#[test]
fn test_solve_knapsack_binary_encoding() {
    let solver = StubSolver {
        answer: SampleSet::new(vec![Var::Item(0)]),
        seen: RefCell::new(None),
    };
    let solutions = solve_knapsack(&items(), 30, SlackEncoding::Binary, &solver).unwrap();
    assert!(solutions.is_empty());
    // 3 items plus floor(log2 30) + 1 slack variables
    assert_eq!(solver.seen.into_inner().unwrap().num_variables(), 8);
}

#[test]
fn test_solve_knapsack_errors() {
    assert!(solve_knapsack(&items(), 30, SlackEncoding::OneHot, &FailingSolver).is_err());
    assert!(solve_knapsack(&[], 30, SlackEncoding::OneHot, &FailingSolver).is_err());

    let boxed: Box<dyn Solver> = Box::new(FailingSolver);
    assert!(boxed.solve(&QuboModel::new()).is_err());
}
