use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be within [0, 1], got {value}")]
    RateOutOfRange { name: &'static str, value: f64 },
    #[error("{name} must be at least {min}, got {value}")]
    TooSmall {
        name: &'static str,
        min: usize,
        value: usize,
    },
    #[error("Invalid hyperparameters: {0}")]
    Malformed(String),
}

/// Hyperparameters of a single run. Everything the engine needs besides the stops.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub population_size: usize,
    /// Probability that a selected pair is actually crossed over.
    pub crossover_rate: f64,
    pub elitism_rate: f64,
    pub mutation_rate: f64,
    pub tourney_size: usize,
    pub max_generations: usize,
    pub max_stagnant_generations: usize,
    /// Tournament pairs drawn before the second parent is picked uniformly instead.
    pub max_parent_retries: usize,
    pub parallel: bool,
    /// Size of the evaluation pool; 0 lets rayon pick one thread per core.
    pub num_workers: usize,
    pub validate_candidates: bool,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            population_size: 5000,
            crossover_rate: 0.5,
            elitism_rate: 0.1,
            mutation_rate: 0.1,
            tourney_size: 2,
            max_generations: 1000,
            max_stagnant_generations: 100,
            max_parent_retries: 100,
            parallel: true,
            num_workers: 0,
            validate_candidates: false,
            seed: None,
        }
    }
}

impl Config {
    /// Defaults overridden by whatever keys `hyperparameters` carries, then validated.
    pub fn initialize(hyperparameters: &Option<Map<String, Value>>) -> Result<Self, ConfigError> {
        let mut merged_params = serde_json::to_value(Self::default())
            .map_err(|e| ConfigError::Malformed(e.to_string()))?;
        if let (Value::Object(ref mut obj), Some(map)) = (&mut merged_params, hyperparameters) {
            for (k, v) in map {
                obj.insert(k.clone(), v.clone());
            }
        }
        let config: Self = serde_json::from_value(merged_params)
            .map_err(|e| ConfigError::Malformed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("crossover_rate", self.crossover_rate),
            ("elitism_rate", self.elitism_rate),
            ("mutation_rate", self.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::RateOutOfRange { name, value });
            }
        }
        for (name, min, value) in [
            ("population_size", 1, self.population_size),
            ("tourney_size", 1, self.tourney_size),
            ("max_generations", 1, self.max_generations),
            ("max_stagnant_generations", 1, self.max_stagnant_generations),
            ("max_parent_retries", 1, self.max_parent_retries),
        ] {
            if value < min {
                return Err(ConfigError::TooSmall { name, min, value });
            }
        }
        Ok(())
    }

    pub fn num_elites(&self) -> usize {
        ((self.elitism_rate * self.population_size as f64).floor() as usize).min(self.population_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn overrides(value: Value) -> Option<Map<String, Value>> {
        value.as_object().cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(Config::initialize(&None), Ok(Config::default()));
    }

    #[test]
    fn test_overrides_are_merged() {
        let config = Config::initialize(&overrides(json!({
            "population_size": 200,
            "crossover_rate": 1.0,
            "tourney_size": 4,
            "seed": 9
        })))
        .unwrap();
        assert_eq!(config.population_size, 200);
        assert_eq!(config.crossover_rate, 1.0);
        assert_eq!(config.tourney_size, 4);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.mutation_rate, Config::default().mutation_rate);
    }

    #[test]
    fn test_invalid_rates_are_rejected() {
        assert_eq!(
            Config::initialize(&overrides(json!({"mutation_rate": 1.5}))),
            Err(ConfigError::RateOutOfRange {
                name: "mutation_rate",
                value: 1.5
            })
        );
        let config = Config {
            elitism_rate: f64::NAN,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_sizes_are_rejected() {
        assert_eq!(
            Config::initialize(&overrides(json!({"tourney_size": 0}))),
            Err(ConfigError::TooSmall {
                name: "tourney_size",
                min: 1,
                value: 0
            })
        );
        assert!(Config::initialize(&overrides(json!({"population_size": 0}))).is_err());
    }

    #[test]
    fn test_malformed_hyperparameters() {
        assert!(matches!(
            Config::initialize(&overrides(json!({"tourney_size": "three"}))),
            Err(ConfigError::Malformed(_))
        ));
        assert!(matches!(
            Config::initialize(&overrides(json!({"tourney": 3}))),
            Err(ConfigError::Malformed(_))
        ));
    }

    #[test]
    fn test_num_elites() {
        let config = Config {
            population_size: 200,
            elitism_rate: 0.1,
            ..Config::default()
        };
        assert_eq!(config.num_elites(), 20);
        let config = Config {
            population_size: 5000,
            elitism_rate: 0.05,
            ..Config::default()
        };
        assert_eq!(config.num_elites(), 250);
        let config = Config {
            population_size: 7,
            elitism_rate: 0.0,
            ..Config::default()
        };
        assert_eq!(config.num_elites(), 0);
    }
}
