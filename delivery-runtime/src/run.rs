use anyhow::{anyhow, Context, Result};
use delivery_algorithms::delivery_stops::genetic::{Config, EvolutionEngine, GenerationRecord};
use delivery_challenges::delivery_stops::{Challenge, Location, StopsConfig};
use delivery_structs::{
    config::SweepConfig,
    core::{RunResult, StopRecord, StopSet},
};
use delivery_utils::KeyValueStore;
use rand::{rngs::SmallRng, seq::SliceRandom, Rng, SeedableRng};
use serde_json::{Map, Value};
use std::{fs, path::Path, path::PathBuf};

#[derive(Clone, Debug)]
pub struct SolveSettings {
    pub stops_set_id: u64,
    pub max_stops: usize,
    pub depot: Location,
    pub hyperparameters: Map<String, Value>,
    pub trace_dir: Option<PathBuf>,
}

/// Builds the instance from the first `max_stops` stops of the set.
pub fn build_challenge(stop_set: &StopSet, max_stops: usize, depot: Location) -> Result<Challenge> {
    if stop_set.locations.len() < max_stops {
        log::warn!(
            "Stop set {} only has {} stops, routing all of them",
            stop_set.stops_set_id,
            stop_set.locations.len()
        );
    }
    let stops: Vec<Location> = stop_set
        .locations
        .iter()
        .take(max_stops)
        .map(|s| Location::new(s.x, s.y))
        .collect();
    if stops.is_empty() {
        return Err(anyhow!("No stops to route in set {}", stop_set.stops_set_id));
    }
    Ok(Challenge::new(stops, depot))
}

pub fn solve(store: &dyn KeyValueStore, settings: &SolveSettings) -> Result<RunResult> {
    let stop_set = StopSet::load(store, settings.stops_set_id)?;
    let challenge = build_challenge(&stop_set, settings.max_stops, settings.depot)?;

    let mut config = Config::initialize(&Some(settings.hyperparameters.clone()))?;
    if config.seed.is_none() {
        config.seed = Some(rand::random());
    }
    log::info!("Solving {} stops with {:?}", challenge.num_stops(), config);

    let outcome = EvolutionEngine::new(&challenge, config)?.run()?;
    let solution = outcome.solution();
    let score = challenge.evaluate_route(&solution)?;

    let greedy = challenge.calc_route_cost(&challenge.compute_greedy_baseline().route);
    log::info!(
        "Best route scores {} against {} for nearest neighbour ({:+.1}%)",
        score,
        greedy,
        (score as f64 - greedy as f64) / greedy.max(1) as f64 * 100.0
    );

    let result = RunResult {
        guid: RunResult::new_guid(),
        completed: RunResult::completed_now(),
        path: solution.route,
        score,
        population_size: config.population_size,
        crossover_rate: config.crossover_rate,
        elitism_rate: config.elitism_rate,
        mutation_rate: config.mutation_rate,
        tourney_size: config.tourney_size,
        num_stops: challenge.num_stops(),
        generations: Some(outcome.generations),
        found_at_generation: Some(outcome.best.generation),
    };
    result.save(store)?;
    if let Some(dir) = &settings.trace_dir {
        let path = write_trace(dir, &result.guid, &outcome.trace)?;
        log::info!("Wrote score trace to {}", path.display());
    }
    Ok(result)
}

/// Writes `<dir>/<guid>_score-per_gen.csv`, one `generation, score` line per generation.
pub fn write_trace(dir: &Path, guid: &str, trace: &[GenerationRecord]) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create trace directory {}", dir.display()))?;
    let path = dir.join(format!("{}_score-per_gen.csv", guid));
    let contents: String = trace
        .iter()
        .map(|record| format!("{}, {}\n", record.generation, record.best_score))
        .collect();
    fs::write(&path, contents)
        .with_context(|| format!("Failed to write trace {}", path.display()))?;
    Ok(path)
}

/// Runs every combination `trials_per_combo` times, in shuffled order.
/// With a base seed, run `i` is seeded with `seed + i`.
pub fn sweep<R: Rng>(
    store: &dyn KeyValueStore,
    base: &SolveSettings,
    sweep_config: &SweepConfig,
    rng: &mut R,
) -> Result<Vec<RunResult>> {
    let mut combos = sweep_config.combos();
    combos.shuffle(rng);
    let base_seed = base.hyperparameters.get("seed").and_then(Value::as_u64);
    let total = combos.len() * sweep_config.trials_per_combo;

    let mut results = Vec::with_capacity(total);
    for combo in combos.iter() {
        for _ in 0..sweep_config.trials_per_combo {
            let mut settings = base.clone();
            let params = &mut settings.hyperparameters;
            params.insert("crossover_rate".to_string(), Value::from(combo.crossover_rate));
            params.insert("elitism_rate".to_string(), Value::from(combo.elitism_rate));
            params.insert("mutation_rate".to_string(), Value::from(combo.mutation_rate));
            params.insert("tourney_size".to_string(), Value::from(combo.tourney_size));
            match base_seed {
                Some(seed) => {
                    params.insert(
                        "seed".to_string(),
                        Value::from(seed.wrapping_add(results.len() as u64)),
                    );
                }
                None => {
                    params.remove("seed");
                }
            }

            log::info!("Sweep run {}/{}: {:?}", results.len() + 1, total, combo);
            results.push(solve(store, &settings)?);
        }
    }
    Ok(results)
}

pub fn generate_stops(
    store: &dyn KeyValueStore,
    stops_set_id: u64,
    num_stops: usize,
    seed: Option<u64>,
) -> Result<StopSet> {
    let mut rng = match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    let instance_seed: [u8; 32] = rng.gen();
    let challenge = Challenge::generate_instance(&instance_seed, &StopsConfig { num_stops })?;
    let stop_set = StopSet {
        stops_set_id,
        locations: challenge
            .stops
            .iter()
            .map(|l| StopRecord { x: l.x, y: l.y })
            .collect(),
    };
    stop_set.save(store)?;
    Ok(stop_set)
}
