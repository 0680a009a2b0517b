use crate::{
    costs, decode_sample_set, knapsack_qubo_with, weights, DecodedSolution, Item, QuboModel,
    SampleSet, SlackEncoding, Solver,
};
use anyhow::Result;
use tracing::{debug, info, warn};

pub fn build_model(items: &[Item], capacity: usize, encoding: SlackEncoding) -> Result<QuboModel> {
    let model = knapsack_qubo_with(&costs(items), &weights(items), capacity, encoding)?;
    info!(
        "Built {:?} model: {} variables, {} interactions",
        encoding,
        model.num_variables(),
        model.num_interactions()
    );
    Ok(model)
}

/// Decodes a sample set against `items`, warning about overweight selections.
pub fn decode_solutions(
    sample_set: &SampleSet,
    items: &[Item],
    capacity: usize,
) -> Result<Vec<DecodedSolution>> {
    let solutions = decode_sample_set(sample_set, items, capacity)?;
    for solution in &solutions {
        debug!(
            "Selection weighs {} for cost {} (energy {})",
            solution.total_weight, solution.total_cost, solution.energy
        );
        if !solution.feasible {
            warn!(
                "Selection weighs {} which exceeds capacity {}",
                solution.total_weight, capacity
            );
        }
    }
    Ok(solutions)
}

/// Builds the model for `items`, hands it to `solver` and decodes every
/// returned record.
pub fn solve_knapsack(
    items: &[Item],
    capacity: usize,
    encoding: SlackEncoding,
    solver: &dyn Solver,
) -> Result<Vec<DecodedSolution>> {
    let model = build_model(items, capacity, encoding)?;
    let sample_set = solver.solve(&model)?;
    info!("Solver returned {} records", sample_set.len());
    decode_solutions(&sample_set, items, capacity)
}
