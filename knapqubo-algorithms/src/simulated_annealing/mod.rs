use crate::parse_hyperparameters;
use anyhow::{anyhow, Result};
use knapqubo_challenges::{IndexedQubo, QuboModel, SampleSet, Solver};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

/// Single-flip Metropolis annealing on a geometric inverse-temperature schedule.
///
/// Each read starts from a random assignment and returns its final state.
/// Runs are reproducible for a fixed `seed`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SimulatedAnnealing {
    pub num_reads: usize,
    pub num_sweeps: usize,
    /// `(hot, cold)` inverse temperatures. Derived from the model when unset.
    pub beta_range: Option<(f64, f64)>,
    pub seed: u64,
}

impl Default for SimulatedAnnealing {
    fn default() -> Self {
        Self {
            num_reads: 10,
            num_sweeps: 1000,
            beta_range: None,
            seed: 0,
        }
    }
}

impl SimulatedAnnealing {
    pub fn from_hyperparameters(hyperparameters: &Option<Map<String, Value>>) -> Result<Self> {
        parse_hyperparameters(hyperparameters)
    }
}

/// Hot end lets the largest single-flip change through with probability 1/2,
/// cold end rejects the smallest one with probability 99/100.
fn default_beta_range(qubo: &IndexedQubo) -> (f64, f64) {
    let mut max_delta = 0.0f64;
    let mut min_delta = f64::INFINITY;
    for i in 0..qubo.num_variables() {
        let mut field = qubo.linear[i].abs();
        if qubo.linear[i] != 0.0 {
            min_delta = min_delta.min(qubo.linear[i].abs());
        }
        for &(_, bias) in &qubo.neighbours[i] {
            field += bias.abs();
            if bias != 0.0 {
                min_delta = min_delta.min(bias.abs());
            }
        }
        max_delta = max_delta.max(field);
    }
    if max_delta == 0.0 || !min_delta.is_finite() {
        return (1.0, 1.0);
    }
    (2f64.ln() / max_delta, 100f64.ln() / min_delta)
}

fn beta_schedule(num_sweeps: usize, (hot, cold): (f64, f64)) -> Vec<f64> {
    if num_sweeps <= 1 {
        return vec![cold; num_sweeps];
    }
    let ratio = cold / hot;
    (0..num_sweeps)
        .map(|k| hot * ratio.powf(k as f64 / (num_sweeps - 1) as f64))
        .collect()
}

fn anneal(qubo: &IndexedQubo, schedule: &[f64], rng: &mut SmallRng) -> Vec<u8> {
    let n = qubo.num_variables();
    let mut sample: Vec<u8> = (0..n).map(|_| rng.gen_range(0..=1)).collect();
    for &beta in schedule {
        for i in 0..n {
            let delta = qubo.flip_delta(&sample, i);
            if delta <= 0.0 || rng.gen::<f64>() < (-beta * delta).exp() {
                sample[i] ^= 1;
            }
        }
    }
    sample
}

impl Solver for SimulatedAnnealing {
    fn solve(&self, model: &QuboModel) -> Result<SampleSet> {
        let qubo = model.indexed();
        let (hot, cold) = self
            .beta_range
            .unwrap_or_else(|| default_beta_range(&qubo));
        if !(hot > 0.0 && cold > 0.0) {
            return Err(anyhow!(
                "Beta range ({}, {}) must be positive",
                hot,
                cold
            ));
        }
        let schedule = beta_schedule(self.num_sweeps, (hot, cold));
        debug!(
            "Annealing {} variables from beta {} to {} over {} sweeps",
            qubo.num_variables(),
            hot,
            cold,
            self.num_sweeps
        );

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut sample_set = SampleSet::new(qubo.variables.clone());
        for read in 0..self.num_reads {
            let sample = anneal(&qubo, &schedule, &mut rng);
            let energy = qubo.energy(&sample);
            debug!("Read {} finished at energy {}", read, energy);
            sample_set.push(sample, energy);
        }
        sample_set.sort_by_energy();
        if let Some(record) = sample_set.lowest() {
            info!(
                "Lowest energy {} over {} reads",
                record.energy, self.num_reads
            );
        }
        Ok(sample_set)
    }
}
