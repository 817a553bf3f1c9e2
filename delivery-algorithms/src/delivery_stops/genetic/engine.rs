use super::candidate::Candidate;
use super::config::Config;
use super::convergence::{
    BestResult, ConvergenceController, Decision, GenerationRecord, TerminationReason,
};
use super::population::next_generation;
use super::scheduler::EvaluationScheduler;
use anyhow::{anyhow, Result};
use delivery_challenges::delivery_stops::{Challenge, Solution};
use logging_timer::time;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::collections::HashSet;
use std::time::Instant;

#[derive(Clone, Debug)]
pub struct RunOutcome {
    pub best: BestResult,
    pub trace: Vec<GenerationRecord>,
    pub generations: usize,
    pub reason: TerminationReason,
}

impl RunOutcome {
    pub fn score(&self) -> u64 {
        self.best.candidate.score()
    }

    pub fn solution(&self) -> Solution {
        Solution {
            route: self.best.candidate.path.clone(),
        }
    }
}

pub struct EvolutionEngine<'a, R: Rng> {
    challenge: &'a Challenge,
    config: Config,
    scheduler: EvaluationScheduler,
    rng: R,
}

impl<'a> EvolutionEngine<'a, SmallRng> {
    /// Seeds from `config.seed` when set, otherwise from the challenge seed.
    pub fn new(challenge: &'a Challenge, config: Config) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_seed(challenge.seed),
        };
        Self::with_rng(challenge, config, rng)
    }
}

impl<'a, R: Rng> EvolutionEngine<'a, R> {
    pub fn with_rng(challenge: &'a Challenge, config: Config, rng: R) -> Result<Self> {
        config.validate()?;
        if challenge.num_stops() == 0 {
            return Err(anyhow!("Challenge has no stops to route"));
        }
        let scheduler = EvaluationScheduler::from_config(&config)?;
        Ok(Self {
            challenge,
            config,
            scheduler,
            rng,
        })
    }

    pub fn initial_population(&mut self) -> Result<Vec<Candidate>> {
        let num_stops = self.challenge.num_stops();
        (0..self.config.population_size)
            .map(|_| Candidate::random(num_stops, &mut self.rng))
            .collect()
    }

    /// Evolves until the best score stagnates or the generation cap is passed.
    #[time]
    pub fn run(&mut self) -> Result<RunOutcome> {
        let t0 = Instant::now();
        let num_stops = self.challenge.num_stops();
        let mut controller = ConvergenceController::new(&self.config);
        let mut trace = Vec::new();
        let mut population = self.initial_population()?;
        let mut generation = 1;

        log::debug!(
            "Evolving {} candidates over {} stops with {} evaluation worker(s)",
            population.len(),
            num_stops,
            self.scheduler.num_workers()
        );

        let reason = loop {
            let gen_start = Instant::now();
            if self.config.validate_candidates {
                check_population(&population, num_stops, generation)?;
            }

            self.scheduler.evaluate(&mut population, self.challenge);
            let decision = controller.observe(generation, &population);
            trace.push(GenerationRecord {
                generation,
                best_score: controller.best_score(),
            });

            let unique: HashSet<u64> = population.iter().filter_map(|c| c.fitness).collect();
            log::info!(
                "Gen {:>4}   best: {:>6}   uniq: {:>4}   dur: {:4.1}s",
                generation,
                controller.best_score(),
                unique.len(),
                gen_start.elapsed().as_secs_f64()
            );

            if let Decision::Terminate(reason) = decision {
                break reason;
            }
            population = next_generation(population, &self.config, &mut self.rng);
            generation += 1;
        };

        let best = controller
            .into_best()
            .ok_or_else(|| anyhow!("No candidate was ever scored"))?;
        log::info!(
            "Job complete: {:?} after {} generations in {:.1}s, best {} found at generation {}",
            reason,
            generation,
            t0.elapsed().as_secs_f64(),
            best.candidate.score(),
            best.generation
        );
        Ok(RunOutcome {
            best,
            trace,
            generations: generation,
            reason,
        })
    }
}

/// Errors on the first candidate that is not a permutation of `0..num_stops`.
pub fn check_population(
    population: &[Candidate],
    num_stops: usize,
    generation: usize,
) -> Result<()> {
    for (index, candidate) in population.iter().enumerate() {
        candidate.check_validity(num_stops).map_err(|e| {
            anyhow!(
                "Invalid candidate {} in generation {}: {}",
                index,
                generation,
                e
            )
        })?;
    }
    Ok(())
}
