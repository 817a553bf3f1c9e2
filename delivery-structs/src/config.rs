use crate::serializable_struct_with_getters;
use serde::{Deserialize, Serialize};

serializable_struct_with_getters! {
    SweepConfig {
        crossover_rates: Vec<f64>,
        elitism_rates: Vec<f64>,
        mutation_rates: Vec<f64>,
        tourney_sizes: Vec<usize>,
        trials_per_combo: usize,
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            crossover_rates: vec![0.5, 0.75, 1.0],
            elitism_rates: vec![0.05, 0.10, 0.15],
            mutation_rates: vec![0.10, 0.20, 0.30],
            tourney_sizes: vec![2, 3, 4],
            trials_per_combo: 8,
        }
    }
}

serializable_struct_with_getters! {
    SweepCombo {
        crossover_rate: f64,
        elitism_rate: f64,
        mutation_rate: f64,
        tourney_size: usize,
    }
}

impl SweepConfig {
    /// Every combination of the configured rates, in nested declaration order.
    pub fn combos(&self) -> Vec<SweepCombo> {
        let mut combos = Vec::with_capacity(
            self.crossover_rates.len()
                * self.elitism_rates.len()
                * self.mutation_rates.len()
                * self.tourney_sizes.len(),
        );
        for &crossover_rate in &self.crossover_rates {
            for &elitism_rate in &self.elitism_rates {
                for &mutation_rate in &self.mutation_rates {
                    for &tourney_size in &self.tourney_sizes {
                        combos.push(SweepCombo {
                            crossover_rate,
                            elitism_rate,
                            mutation_rate,
                            tourney_size,
                        });
                    }
                }
            }
        }
        combos
    }
}
