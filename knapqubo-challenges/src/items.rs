use crate::ItemsError;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub cost: f64,
    pub weight: u32,
}

/// Parses a headerless `cost,weight` table, one item per line.
/// Blank lines are skipped; line numbers in errors are 1-based.
pub fn parse_items<R: BufRead>(reader: R) -> Result<Vec<Item>, ItemsError> {
    let mut items = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = i + 1;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != 2 {
            return Err(ItemsError::ColumnCount {
                line: line_no,
                found: fields.len(),
            });
        }
        let cost = fields[0]
            .parse::<f64>()
            .map_err(|_| ItemsError::InvalidCost {
                line: line_no,
                value: fields[0].to_string(),
            })?;
        let weight = fields[1]
            .parse::<u32>()
            .map_err(|_| ItemsError::InvalidWeight {
                line: line_no,
                value: fields[1].to_string(),
            })?;
        items.push(Item { cost, weight });
    }
    Ok(items)
}

pub fn load_items(path: &Path) -> Result<Vec<Item>, ItemsError> {
    parse_items(BufReader::new(File::open(path)?))
}

pub fn costs(items: &[Item]) -> Vec<f64> {
    items.iter().map(|item| item.cost).collect()
}

pub fn weights(items: &[Item]) -> Vec<u32> {
    items.iter().map(|item| item.weight).collect()
}
