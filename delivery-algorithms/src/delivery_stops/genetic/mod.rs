mod candidate;
mod config;
mod convergence;
mod crossover;
mod engine;
mod fitness;
mod mutation;
mod population;
mod scheduler;
mod selector;

pub use candidate::Candidate;
pub use config::{Config, ConfigError};
pub use convergence::{
    BestResult, ConvergenceController, Decision, GenerationRecord, TerminationReason,
};
pub use crossover::{cross_segment, crossover};
pub use engine::{check_population, EvolutionEngine, RunOutcome};
pub use fitness::evaluate;
pub use mutation::{displacement_mutation, mutate_maybe, swap_mutation, MutationKind};
pub use population::next_generation;
pub use scheduler::EvaluationScheduler;
pub use selector::{select_parents, tournament};

use anyhow::Result;
use delivery_challenges::delivery_stops::*;
use serde_json::{Map, Value};

pub fn solve_challenge(
    challenge: &Challenge,
    save_solution: &dyn Fn(&Solution) -> Result<()>,
    hyperparameters: &Option<Map<String, Value>>,
) -> Result<()> {
    let config = Config::initialize(hyperparameters)?;
    let outcome = EvolutionEngine::new(challenge, config)?.run()?;
    save_solution(&outcome.solution())
}

pub fn help() {
    println!("Genetic search over delivery routes");
    println!("");
    println!("HYPERPARAMETERS (all optional, JSON object):");
    println!("  population_size           candidates per generation (default 5000)");
    println!("  crossover_rate            probability a parent pair is crossed (default 0.5)");
    println!("  elitism_rate              share of best candidates copied unchanged (default 0.1)");
    println!("  mutation_rate             probability a child is mutated (default 0.1)");
    println!("  tourney_size              candidates drawn per tournament (default 2)");
    println!("  max_generations           hard generation cap (default 1000)");
    println!("  max_stagnant_generations  stop after this many generations without improvement (default 100)");
    println!("  max_parent_retries        tournament redraws before a random second parent (default 100)");
    println!("  parallel                  evaluate fitness on a worker pool (default true)");
    println!("  num_workers               pool size, 0 for one per core (default 0)");
    println!("  validate_candidates       check every route is a permutation (default false)");
    println!("  seed                      u64 seed, defaults to the challenge seed");
    println!("");
    println!("Example: {{\"population_size\": 1000, \"mutation_rate\": 0.2}}");
}
