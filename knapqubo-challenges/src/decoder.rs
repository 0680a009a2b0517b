use crate::{DecodeError, Item, SampleSet, Var};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One solver record read back as an item selection.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DecodedSolution {
    /// Weights of the selected items, in the order their variables were returned.
    pub weights: Vec<u32>,
    pub energy: f64,
    pub total_weight: u64,
    pub total_cost: f64,
    /// Whether the selection fits the capacity. The penalty multiplier does
    /// not guarantee this.
    pub feasible: bool,
}

/// Shortest round-trip rendering of `value` with a decimal point or a signed,
/// two-digit exponent: `-270.0`, `-1e+16`, `2.5e-05`, `nan`.
pub fn format_energy(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    let repr = format!("{:?}", value);
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => repr,
    }
}

impl fmt::Display for DecodedSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Found solution {:?} at energy {}.",
            self.weights,
            format_energy(self.energy)
        )
    }
}

/// Collects the items whose `x` bit is set. Slack bits are ignored.
pub fn decode_sample(
    variables: &[Var],
    sample: &[u8],
    energy: f64,
    items: &[Item],
    capacity: usize,
) -> Result<DecodedSolution, DecodeError> {
    let mut weights = Vec::new();
    let mut total_weight = 0u64;
    let mut total_cost = 0.0;
    for (&var, &bit) in variables.iter().zip(sample) {
        if bit == 0 {
            continue;
        }
        let Some(index) = var.item_index() else {
            continue;
        };
        let item = items.get(index).ok_or(DecodeError::UnknownItem {
            var,
            index,
            num_items: items.len(),
        })?;
        weights.push(item.weight);
        total_weight += item.weight as u64;
        total_cost += item.cost;
    }
    Ok(DecodedSolution {
        weights,
        energy,
        total_weight,
        total_cost,
        feasible: total_weight <= capacity as u64,
    })
}

/// Decodes every record of `sample_set`, in record order.
pub fn decode_sample_set(
    sample_set: &SampleSet,
    items: &[Item],
    capacity: usize,
) -> Result<Vec<DecodedSolution>, DecodeError> {
    sample_set
        .records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            if record.sample.len() != sample_set.variables.len() {
                return Err(DecodeError::ShapeMismatch {
                    record: i,
                    bits: record.sample.len(),
                    variables: sample_set.variables.len(),
                });
            }
            decode_sample(
                &sample_set.variables,
                &record.sample,
                record.energy,
                items,
                capacity,
            )
        })
        .collect()
}
