use crate::Var;
use thiserror::Error;

/// Errors raised while building or editing a QUBO model.
#[derive(Debug, Error)]
pub enum QuboError {
    /// The lagrange multiplier is the largest cost, so at least one item is required.
    #[error("No items given")]
    NoItems,

    /// NaN or infinite costs leave the multiplier undefined.
    #[error("Cost of item {index} is not finite ({cost})")]
    NonFiniteCost { index: usize, cost: f64 },

    #[error("Costs ({costs}) and weights ({weights}) have different lengths")]
    LengthMismatch { costs: usize, weights: usize },

    /// Quadratic terms always couple two distinct variables.
    #[error("Quadratic term on a single variable ({0})")]
    SelfInteraction(Var),

    #[error("Invalid variable name '{0}'")]
    InvalidVariable(String),
}

/// Errors raised while turning solver output back into item selections.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Variable {var} refers to item {index} but there are only {num_items} items")]
    UnknownItem {
        var: Var,
        index: usize,
        num_items: usize,
    },

    #[error("Record {record} has {bits} bits for {variables} variables")]
    ShapeMismatch {
        record: usize,
        bits: usize,
        variables: usize,
    },
}

/// Errors raised while reading the item table.
#[derive(Debug, Error)]
pub enum ItemsError {
    #[error("Line {line}: expected 2 columns, found {found}")]
    ColumnCount { line: usize, found: usize },

    #[error("Line {line}: invalid cost '{value}'")]
    InvalidCost { line: usize, value: String },

    #[error("Line {line}: invalid weight '{value}'")]
    InvalidWeight { line: usize, value: String },

    #[error("Failed to read items: {0}")]
    Io(#[from] std::io::Error),
}
