use anyhow::{anyhow, Result};
use knapqubo_challenges::Solver;
use serde_json::{Map, Value};

pub mod exhaustive;
pub use exhaustive::ExhaustiveSolver;
pub mod simulated_annealing;
pub use simulated_annealing::SimulatedAnnealing;

/// Names accepted by [`get_solver`].
pub const SOLVER_NAMES: [&str; 2] = ["exhaustive", "annealing"];

/// Looks up a local solver by name, configured from `hyperparameters`.
pub fn get_solver(
    name: &str,
    hyperparameters: &Option<Map<String, Value>>,
) -> Result<Box<dyn Solver>> {
    match name {
        "exhaustive" => Ok(Box::new(ExhaustiveSolver::from_hyperparameters(
            hyperparameters,
        )?)),
        "annealing" => Ok(Box::new(SimulatedAnnealing::from_hyperparameters(
            hyperparameters,
        )?)),
        _ => Err(anyhow!(
            "Unknown solver '{}', expected one of {:?}",
            name,
            SOLVER_NAMES
        )),
    }
}

pub(crate) fn parse_hyperparameters<T>(hyperparameters: &Option<Map<String, Value>>) -> Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    match hyperparameters {
        Some(map) => serde_json::from_value(Value::Object(map.clone()))
            .map_err(|e| anyhow!("Invalid hyperparameters: {}", e)),
        None => Ok(T::default()),
    }
}
