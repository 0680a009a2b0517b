use crate::{QuboError, QuboModel, Var};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How the selected total weight is tied to the capacity through slack variables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlackEncoding {
    /// One slack variable per weight value `0..capacity`.
    #[default]
    OneHot,
    /// Lucas's logarithmic scheme: `floor(log2 capacity) + 1` slack variables.
    Binary,
}

impl FromStr for SlackEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "one_hot" => Ok(SlackEncoding::OneHot),
            "binary" => Ok(SlackEncoding::Binary),
            _ => Err(format!(
                "Unknown slack encoding '{}', expected one_hot or binary",
                s
            )),
        }
    }
}

/// Penalty weight for capacity violations: the largest cost.
///
/// This is a first guess, not a guarantee. For adversarial cost
/// distributions a single multiplier of this size may still let the
/// minimiser prefer an overweight selection; decoded solutions report
/// feasibility so callers can check.
pub fn lagrange_multiplier(costs: &[f64]) -> Result<f64, QuboError> {
    if costs.is_empty() {
        return Err(QuboError::NoItems);
    }
    if let Some((index, &cost)) = costs.iter().enumerate().find(|(_, c)| !c.is_finite()) {
        return Err(QuboError::NonFiniteCost { index, cost });
    }
    Ok(costs.iter().copied().fold(f64::NEG_INFINITY, f64::max))
}

fn check_inputs(costs: &[f64], weights: &[u32]) -> Result<f64, QuboError> {
    if costs.len() != weights.len() {
        return Err(QuboError::LengthMismatch {
            costs: costs.len(),
            weights: weights.len(),
        });
    }
    lagrange_multiplier(costs)
}

/// Builds the knapsack QUBO with the given slack encoding.
pub fn knapsack_qubo_with(
    costs: &[f64],
    weights: &[u32],
    capacity: usize,
    encoding: SlackEncoding,
) -> Result<QuboModel, QuboError> {
    match encoding {
        SlackEncoding::OneHot => knapsack_qubo(costs, weights, capacity),
        SlackEncoding::Binary => knapsack_qubo_binary(costs, weights, capacity),
    }
}

/// Builds the knapsack QUBO with one-hot slack variables `y0..y<capacity-1>`.
///
/// The passes below run in a fixed order and each one overwrites whatever an
/// earlier pass stored under the same key; contributions are not summed.
/// `capacity == 0` produces a model without slack variables.
pub fn knapsack_qubo(
    costs: &[f64],
    weights: &[u32],
    capacity: usize,
) -> Result<QuboModel, QuboError> {
    let lagrange = check_inputs(costs, weights)?;
    let num_items = costs.len();
    let mut model = QuboModel::new();

    // (sum y_n - 1)^2
    for n in 0..capacity {
        model.set_linear(Var::Slack(n), -lagrange);
    }
    for i in 0..capacity {
        for j in (i + 1)..capacity {
            model.set_quadratic(Var::Slack(i), Var::Slack(j), 2.0 * lagrange)?;
        }
    }

    // (sum n*y_n - sum w_a*x_a)^2
    for n in 0..capacity {
        model.set_linear(Var::Slack(n), lagrange * (n * n) as f64);
    }
    for i in 0..capacity {
        for j in (i + 1)..capacity {
            model.set_quadratic(
                Var::Slack(i),
                Var::Slack(j),
                2.0 * lagrange * i as f64 * j as f64,
            )?;
        }
    }
    for n in 0..capacity {
        for a in 0..num_items {
            model.set_quadratic(
                Var::Item(a),
                Var::Slack(n),
                -2.0 * lagrange * n as f64 * weights[a] as f64,
            )?;
        }
    }
    for n in 0..num_items {
        let w = weights[n] as f64;
        model.set_linear(Var::Item(n), lagrange * w * w);
    }
    for i in 0..num_items {
        for j in (i + 1)..num_items {
            model.set_quadratic(
                Var::Item(i),
                Var::Item(j),
                2.0 * lagrange * weights[i] as f64 * weights[j] as f64,
            )?;
        }
    }

    // -sum c_n*x_n, scaled by the multiplier
    for n in 0..num_items {
        model.set_linear(Var::Item(n), -lagrange * costs[n]);
    }

    Ok(model)
}

/// Slack coefficients for the logarithmic encoding: `1, 2, .., 2^(M-1)` and a
/// final `capacity + 1 - 2^M` with `M = floor(log2 capacity)`. Any total in
/// `0..=capacity` is reachable and the coefficients sum to `capacity`.
pub fn binary_slack_coefficients(capacity: usize) -> Vec<u64> {
    if capacity == 0 {
        return Vec::new();
    }
    let m = capacity.ilog2();
    let mut coefficients: Vec<u64> = (0..m).map(|k| 1u64 << k).collect();
    coefficients.push(capacity as u64 + 1 - (1u64 << m));
    coefficients
}

/// Builds the knapsack QUBO with logarithmic slack, encoding
/// `lagrange * (sum w_i*x_i - sum c_k*y_k)^2 - sum cost_i*x_i`.
pub fn knapsack_qubo_binary(
    costs: &[f64],
    weights: &[u32],
    capacity: usize,
) -> Result<QuboModel, QuboError> {
    let lagrange = check_inputs(costs, weights)?;
    let num_items = costs.len();
    let slack = binary_slack_coefficients(capacity);
    let mut model = QuboModel::new();

    for i in 0..num_items {
        let w = weights[i] as f64;
        model.set_linear(Var::Item(i), lagrange * w * w - costs[i]);
    }
    for i in 0..num_items {
        for j in (i + 1)..num_items {
            model.set_quadratic(
                Var::Item(i),
                Var::Item(j),
                2.0 * lagrange * weights[i] as f64 * weights[j] as f64,
            )?;
        }
    }
    for (k, &c) in slack.iter().enumerate() {
        let c = c as f64;
        model.set_linear(Var::Slack(k), lagrange * c * c);
    }
    for i in 0..slack.len() {
        for j in (i + 1)..slack.len() {
            model.set_quadratic(
                Var::Slack(i),
                Var::Slack(j),
                2.0 * lagrange * slack[i] as f64 * slack[j] as f64,
            )?;
        }
    }
    for i in 0..num_items {
        for (k, &c) in slack.iter().enumerate() {
            model.set_quadratic(
                Var::Item(i),
                Var::Slack(k),
                -2.0 * lagrange * weights[i] as f64 * c as f64,
            )?;
        }
    }

    Ok(model)
}
