use crate::parse_hyperparameters;
use anyhow::{anyhow, Result};
use knapqubo_challenges::{QuboModel, SampleSet, Solver};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Largest model the enumerator accepts.
pub const MAX_VARIABLES: usize = 24;

/// Enumerates every assignment and keeps the `num_best` lowest energies.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ExhaustiveSolver {
    pub num_best: usize,
}

impl Default for ExhaustiveSolver {
    fn default() -> Self {
        Self { num_best: 1 }
    }
}

impl ExhaustiveSolver {
    pub fn from_hyperparameters(hyperparameters: &Option<Map<String, Value>>) -> Result<Self> {
        parse_hyperparameters(hyperparameters)
    }
}

impl Solver for ExhaustiveSolver {
    fn solve(&self, model: &QuboModel) -> Result<SampleSet> {
        let qubo = model.indexed();
        let n = qubo.num_variables();
        if n > MAX_VARIABLES {
            return Err(anyhow!(
                "Model has {} variables, exhaustive search supports at most {}",
                n,
                MAX_VARIABLES
            ));
        }
        let keep = self.num_best.max(1);

        // Gray code order: consecutive assignments differ in one bit
        let mut sample = vec![0u8; n];
        let mut energy = 0.0;
        let mut best: Vec<(f64, Vec<u8>)> = vec![(energy, sample.clone())];
        for k in 1u64..(1u64 << n) {
            let bit = k.trailing_zeros() as usize;
            energy += qubo.flip_delta(&sample, bit);
            sample[bit] ^= 1;
            if best.len() < keep || energy < best[best.len() - 1].0 {
                let pos = best.partition_point(|(e, _)| *e <= energy);
                best.insert(pos, (energy, sample.clone()));
                best.truncate(keep);
            }
        }

        let mut sample_set = SampleSet::new(qubo.variables.clone());
        for (_, sample) in best {
            // recompute to drop drift from the running sum
            let energy = qubo.energy(&sample);
            sample_set.push(sample, energy);
        }
        sample_set.sort_by_energy();
        debug!(
            "Enumerated {} assignments over {} variables",
            1u64 << n,
            n
        );
        Ok(sample_set)
    }
}
