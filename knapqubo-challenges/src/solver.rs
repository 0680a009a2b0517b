use crate::{QuboModel, Var};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{from_value, Map, Value};

/// Something that minimises a [`QuboModel`].
///
/// Implementations may be local heuristics or a remote service. Callers only
/// rely on the returned records; their number, order of discovery and
/// determinism are up to the solver.
pub trait Solver {
    fn solve(&self, model: &QuboModel) -> Result<SampleSet>;
}

impl<S: Solver + ?Sized> Solver for Box<S> {
    fn solve(&self, model: &QuboModel) -> Result<SampleSet> {
        (**self).solve(model)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Record {
    pub sample: Vec<u8>,
    pub energy: f64,
}

/// Assignments returned by a solver. Every record's `sample` holds one bit
/// per entry of `variables`, in the same order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SampleSet {
    pub variables: Vec<Var>,
    pub records: Vec<Record>,
}

impl SampleSet {
    pub fn new(variables: Vec<Var>) -> Self {
        Self {
            variables,
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, sample: Vec<u8>, energy: f64) {
        self.records.push(Record { sample, energy });
    }

    /// Orders records by ascending energy, keeping discovery order for ties.
    pub fn sort_by_energy(&mut self) {
        self.records.sort_by(|a, b| a.energy.total_cmp(&b.energy));
    }

    pub fn lowest(&self) -> Option<&Record> {
        self.records
            .iter()
            .min_by(|a, b| a.energy.total_cmp(&b.energy))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl TryFrom<Map<String, Value>> for SampleSet {
    type Error = serde_json::Error;

    fn try_from(v: Map<String, Value>) -> Result<Self, Self::Error> {
        from_value(Value::Object(v))
    }
}
