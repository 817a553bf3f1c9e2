use super::candidate::Candidate;
use super::config::Config;
use super::fitness::evaluate;
use anyhow::Result;
use delivery_challenges::delivery_stops::Challenge;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

enum Strategy {
    Serial,
    Parallel(ThreadPool),
}

/// Scores a whole population, either in order on the calling thread or fanned out
/// over a dedicated worker pool. Both strategies assign identical scores.
pub struct EvaluationScheduler {
    strategy: Strategy,
}

impl EvaluationScheduler {
    pub fn serial() -> Self {
        Self {
            strategy: Strategy::Serial,
        }
    }

    /// `num_workers == 0` sizes the pool to the number of logical cores.
    pub fn parallel(num_workers: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(num_workers)
            .thread_name(|index| format!("fitness-{}", index))
            .build()?;
        Ok(Self {
            strategy: Strategy::Parallel(pool),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        if config.parallel {
            Self::parallel(config.num_workers)
        } else {
            Ok(Self::serial())
        }
    }

    pub fn num_workers(&self) -> usize {
        match &self.strategy {
            Strategy::Serial => 1,
            Strategy::Parallel(pool) => pool.current_num_threads(),
        }
    }

    pub fn is_parallel(&self) -> bool {
        matches!(self.strategy, Strategy::Parallel(_))
    }

    /// Sets `fitness` on every candidate. Returns once all of them are scored.
    pub fn evaluate(&self, population: &mut [Candidate], challenge: &Challenge) {
        match &self.strategy {
            Strategy::Serial => {
                for candidate in population.iter_mut() {
                    candidate.fitness = Some(evaluate(candidate, challenge));
                }
            }
            Strategy::Parallel(pool) => {
                let scores: Vec<u64> = pool.install(|| {
                    population
                        .par_iter()
                        .map(|candidate| evaluate(candidate, challenge))
                        .collect()
                });
                for (candidate, score) in population.iter_mut().zip(scores) {
                    candidate.fitness = Some(score);
                }
            }
        }
    }
}
