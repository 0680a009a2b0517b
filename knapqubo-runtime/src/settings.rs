use anyhow::{anyhow, Result};
use knapqubo_challenges::SlackEncoding;
use knapqubo_utils::{dejsonify, read_json_arg};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Capacity used when neither the settings nor the command line give one.
pub const DEFAULT_CAPACITY: usize = 70;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RunSettings {
    pub capacity: usize,
    pub encoding: SlackEncoding,
    pub solver: String,
    pub hyperparameters: Map<String, Value>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            encoding: SlackEncoding::OneHot,
            solver: "annealing".to_string(),
            hyperparameters: Map::new(),
        }
    }
}

impl RunSettings {
    /// Loads settings from a JSON string, a `.json` path or `-` for stdin.
    pub fn load(arg: Option<&str>) -> Result<Self> {
        match arg {
            Some(arg) => {
                let json = read_json_arg(arg)?;
                dejsonify::<RunSettings>(&json)
                    .map_err(|e| anyhow!("Failed to parse settings: {}", e))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn set_hyperparameter<V: Into<Value>>(&mut self, key: &str, value: V) {
        self.hyperparameters.insert(key.to_string(), value.into());
    }

    pub fn solver_hyperparameters(&self) -> Option<Map<String, Value>> {
        if self.hyperparameters.is_empty() {
            None
        } else {
            Some(self.hyperparameters.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let settings = RunSettings::load(None).unwrap();
        assert_eq!(settings.capacity, 70);
        assert_eq!(settings.encoding, SlackEncoding::OneHot);
        assert_eq!(settings.solver, "annealing");
        assert_eq!(settings.solver_hyperparameters(), None);
    }

    #[test]
    fn test_partial_json() {
        let settings =
            RunSettings::load(Some(r#"{"encoding":"binary","hyperparameters":{"seed":3}}"#))
                .unwrap();
        assert_eq!(settings.capacity, 70);
        assert_eq!(settings.encoding, SlackEncoding::Binary);
        assert_eq!(
            settings.solver_hyperparameters(),
            json!({ "seed": 3 }).as_object().cloned()
        );
        assert!(RunSettings::load(Some(r#"{"encoding":"gray"}"#)).is_err());
    }

    #[test]
    fn test_overrides() {
        let mut settings = RunSettings::default();
        settings.set_hyperparameter("num_reads", 4u64);
        settings.set_hyperparameter("num_reads", 8u64);
        assert_eq!(settings.hyperparameters["num_reads"], json!(8));
    }
}
