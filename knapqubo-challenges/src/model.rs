use crate::QuboError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    str::FromStr,
};

/// A binary variable of the knapsack model.
///
/// `Item(i)` is the decision variable `x<i>` (1 iff item `i` is selected),
/// `Slack(n)` is the auxiliary variable `y<n>`. Item variables order before
/// slack variables, each family in index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Var {
    Item(usize),
    Slack(usize),
}

impl Var {
    pub fn item_index(&self) -> Option<usize> {
        match self {
            Var::Item(i) => Some(*i),
            Var::Slack(_) => None,
        }
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Var::Item(i) => write!(f, "x{}", i),
            Var::Slack(n) => write!(f, "y{}", n),
        }
    }
}

impl FromStr for Var {
    type Err = QuboError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || QuboError::InvalidVariable(s.to_string());
        let mut chars = s.chars();
        let prefix = chars.next().ok_or_else(invalid)?;
        let suffix = chars.as_str();
        if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let index = suffix.parse::<usize>().map_err(|_| invalid())?;
        match prefix {
            'x' => Ok(Var::Item(index)),
            'y' => Ok(Var::Slack(index)),
            _ => Err(invalid()),
        }
    }
}

impl Serialize for Var {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Var {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Binary quadratic model: a linear coefficient per variable and a quadratic
/// coefficient per unordered pair of distinct variables, to be minimised.
///
/// Every write replaces the previous coefficient for its key. Pair keys are
/// stored with the smaller variable first so `(a, b)` and `(b, a)` address the
/// same term.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuboModel {
    linear: BTreeMap<Var, f64>,
    quadratic: BTreeMap<(Var, Var), f64>,
}

fn pair_key(a: Var, b: Var) -> (Var, Var) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

impl QuboModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_linear(&mut self, var: Var, bias: f64) {
        self.linear.insert(var, bias);
    }

    /// Sets the coupling between `a` and `b`, adding either variable with a
    /// zero linear bias if it is not yet part of the model.
    pub fn set_quadratic(&mut self, a: Var, b: Var, bias: f64) -> Result<(), QuboError> {
        if a == b {
            return Err(QuboError::SelfInteraction(a));
        }
        self.linear.entry(a).or_insert(0.0);
        self.linear.entry(b).or_insert(0.0);
        self.quadratic.insert(pair_key(a, b), bias);
        Ok(())
    }

    pub fn linear(&self, var: Var) -> Option<f64> {
        self.linear.get(&var).copied()
    }

    pub fn quadratic(&self, a: Var, b: Var) -> Option<f64> {
        self.quadratic.get(&pair_key(a, b)).copied()
    }

    pub fn num_variables(&self) -> usize {
        self.linear.len()
    }

    pub fn num_interactions(&self) -> usize {
        self.quadratic.len()
    }

    pub fn variables(&self) -> impl Iterator<Item = Var> + '_ {
        self.linear.keys().copied()
    }

    pub fn linear_terms(&self) -> impl Iterator<Item = (Var, f64)> + '_ {
        self.linear.iter().map(|(&v, &bias)| (v, bias))
    }

    pub fn quadratic_terms(&self) -> impl Iterator<Item = (Var, Var, f64)> + '_ {
        self.quadratic.iter().map(|(&(a, b), &bias)| (a, b, bias))
    }

    /// Energy of an assignment given as bits aligned with `variables`.
    /// Model variables absent from `variables` count as 0.
    pub fn energy(&self, variables: &[Var], sample: &[u8]) -> f64 {
        let bits: HashMap<Var, bool> = variables
            .iter()
            .zip(sample)
            .map(|(&v, &bit)| (v, bit != 0))
            .collect();
        let is_set = |v: &Var| bits.get(v).copied().unwrap_or(false);

        let mut energy = 0.0;
        for (v, bias) in &self.linear {
            if is_set(v) {
                energy += bias;
            }
        }
        for ((a, b), bias) in &self.quadratic {
            if is_set(a) && is_set(b) {
                energy += bias;
            }
        }
        energy
    }

    /// Flattens the model into index-addressed adjacency lists.
    pub fn indexed(&self) -> IndexedQubo {
        let variables: Vec<Var> = self.variables().collect();
        let position: HashMap<Var, usize> =
            variables.iter().enumerate().map(|(i, &v)| (v, i)).collect();
        let linear = self.linear.values().copied().collect();
        let mut neighbours = vec![Vec::new(); variables.len()];
        for ((a, b), &bias) in &self.quadratic {
            let (i, j) = (position[a], position[b]);
            neighbours[i].push((j, bias));
            neighbours[j].push((i, bias));
        }
        IndexedQubo {
            variables,
            linear,
            neighbours,
        }
    }
}

/// A [`QuboModel`] with variables replaced by positions, for solvers that
/// evaluate many assignments.
#[derive(Debug, Clone)]
pub struct IndexedQubo {
    pub variables: Vec<Var>,
    pub linear: Vec<f64>,
    pub neighbours: Vec<Vec<(usize, f64)>>,
}

impl IndexedQubo {
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn energy(&self, sample: &[u8]) -> f64 {
        let mut energy = 0.0;
        for i in 0..self.variables.len() {
            if sample[i] == 0 {
                continue;
            }
            energy += self.linear[i];
            for &(j, bias) in &self.neighbours[i] {
                // each pair is seen from both ends
                if j > i && sample[j] != 0 {
                    energy += bias;
                }
            }
        }
        energy
    }

    /// Change in energy from flipping bit `i` of `sample`.
    pub fn flip_delta(&self, sample: &[u8], i: usize) -> f64 {
        let mut field = self.linear[i];
        for &(j, bias) in &self.neighbours[i] {
            if sample[j] != 0 {
                field += bias;
            }
        }
        if sample[i] == 0 {
            field
        } else {
            -field
        }
    }
}

#[derive(Serialize, Deserialize)]
struct QuboModelData {
    linear: BTreeMap<Var, f64>,
    quadratic: Vec<(Var, Var, f64)>,
}

impl Serialize for QuboModel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        QuboModelData {
            linear: self.linear.clone(),
            quadratic: self.quadratic_terms().collect(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for QuboModel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let data = QuboModelData::deserialize(deserializer)?;
        let mut model = QuboModel {
            linear: data.linear,
            quadratic: BTreeMap::new(),
        };
        for (a, b, bias) in data.quadratic {
            model
                .set_quadratic(a, b, bias)
                .map_err(serde::de::Error::custom)?;
        }
        Ok(model)
    }
}
