mod run;

use anyhow::{anyhow, Result};
use clap::{arg, ArgAction, ArgMatches, Command};
use delivery_challenges::delivery_stops::Location;
use delivery_structs::config::SweepConfig;
use delivery_utils::FileStore;
use rand::{rngs::SmallRng, SeedableRng};
use run::SolveSettings;
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn solver_args(command: Command) -> Command {
    command
        .arg(
            arg!(--store [STORE] "Directory holding the stop sets and results")
                .default_value("store")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            arg!(--"stops-set" [STOPS_SET] "Id of the stop set to route")
                .default_value("0")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            arg!(-m --maxstops [MAXSTOPS] "Number of stops to visit, taken from the start of the set")
                .default_value("100")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            arg!(-c --crossover [CROSSOVER] "Probability that a parent pair is crossed")
                .default_value("0.50")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            arg!(-e --elitism [ELITISM] "Share of the population copied unchanged")
                .default_value("0.10")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            arg!(-u --mutation [MUTATION] "Probability that a child is mutated")
                .default_value("0.10")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            arg!(-t --tourney [TOURNEY] "Candidates drawn per tournament")
                .default_value("2")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            arg!(--population [POPULATION] "Candidates per generation")
                .default_value("5000")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            arg!(--"max-generations" [MAX_GENERATIONS] "Hard cap on generations")
                .default_value("1000")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            arg!(--"max-stagnant" [MAX_STAGNANT] "Generations without improvement before stopping")
                .default_value("100")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(arg!(--seed [SEED] "Seed for the search").value_parser(clap::value_parser!(u64)))
        .arg(
            arg!(--workers [WORKERS] "Fitness worker threads, 0 for one per core")
                .default_value("0")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(arg!(--serial "Evaluate fitness on the main thread").action(ArgAction::SetTrue))
        .arg(
            arg!(--validate "Check every candidate is a valid route before scoring")
                .action(ArgAction::SetTrue),
        )
        .arg(
            arg!(--"depot-x" [DEPOT_X] "Depot x coordinate")
                .default_value("0")
                .allow_negative_numbers(true)
                .value_parser(clap::value_parser!(i32)),
        )
        .arg(
            arg!(--"depot-y" [DEPOT_Y] "Depot y coordinate")
                .default_value("0")
                .allow_negative_numbers(true)
                .value_parser(clap::value_parser!(i32)),
        )
        .arg(
            arg!(--trace [TRACE_DIR] "If set, writes the best score per generation as csv to this directory")
                .value_parser(clap::value_parser!(PathBuf)),
        )
}

fn cli() -> Command {
    Command::new("delivery-runtime")
        .about("Evolves short delivery routes over stored stop sets")
        .arg_required_else_help(true)
        .subcommand(solver_args(
            Command::new("solve").about("Runs one search and stores its result"),
        ))
        .subcommand(
            solver_args(Command::new("sweep").about(
                "Runs every crossover/elitism/mutation/tourney combination in shuffled order",
            ))
            .arg(
                arg!(--trials [TRIALS] "Runs per combination")
                    .default_value("8")
                    .value_parser(clap::value_parser!(usize)),
            ),
        )
        .subcommand(
            Command::new("generate_stops")
                .about("Places random stops on the grid and stores them as a stop set")
                .arg(
                    arg!(--store [STORE] "Directory holding the stop sets and results")
                        .default_value("store")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--"num-stops" [NUM_STOPS] "Number of stops to place")
                        .default_value("100")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--"stops-set" [STOPS_SET] "Id to store the stop set under")
                        .default_value("0")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--seed [SEED] "Seed for stop placement")
                        .value_parser(clap::value_parser!(u64)),
                ),
        )
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("solve", sub_m)) => solve(sub_m),
        Some(("sweep", sub_m)) => sweep(sub_m),
        Some(("generate_stops", sub_m)) => generate_stops(sub_m),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn get<T: Clone + Send + Sync + 'static>(matches: &ArgMatches, id: &str) -> Result<T> {
    matches
        .get_one::<T>(id)
        .cloned()
        .ok_or_else(|| anyhow!("Missing argument '{}'", id))
}

fn solve_settings(matches: &ArgMatches) -> Result<SolveSettings> {
    let mut hyperparameters = Map::new();
    for (key, value) in [
        ("population_size", json!(get::<usize>(matches, "population")?)),
        ("crossover_rate", json!(get::<f64>(matches, "crossover")?)),
        ("elitism_rate", json!(get::<f64>(matches, "elitism")?)),
        ("mutation_rate", json!(get::<f64>(matches, "mutation")?)),
        ("tourney_size", json!(get::<usize>(matches, "tourney")?)),
        ("max_generations", json!(get::<usize>(matches, "max-generations")?)),
        ("max_stagnant_generations", json!(get::<usize>(matches, "max-stagnant")?)),
        ("num_workers", json!(get::<usize>(matches, "workers")?)),
        ("parallel", json!(!get::<bool>(matches, "serial")?)),
        ("validate_candidates", json!(get::<bool>(matches, "validate")?)),
    ] {
        hyperparameters.insert(key.to_string(), value);
    }
    if let Some(seed) = matches.get_one::<u64>("seed") {
        hyperparameters.insert("seed".to_string(), Value::from(*seed));
    }

    Ok(SolveSettings {
        stops_set_id: get(matches, "stops-set")?,
        max_stops: get(matches, "maxstops")?,
        depot: Location::new(get(matches, "depot-x")?, get(matches, "depot-y")?),
        hyperparameters,
        trace_dir: matches.get_one::<PathBuf>("trace").cloned(),
    })
}

fn solve(matches: &ArgMatches) -> Result<()> {
    let store = FileStore::new(get::<PathBuf>(matches, "store")?);
    let result = run::solve(&store, &solve_settings(matches)?)?;
    println!("{}", result.guid);
    Ok(())
}

fn sweep(matches: &ArgMatches) -> Result<()> {
    let store = FileStore::new(get::<PathBuf>(matches, "store")?);
    let settings = solve_settings(matches)?;
    let sweep_config = SweepConfig {
        trials_per_combo: get(matches, "trials")?,
        ..SweepConfig::default()
    };
    let mut rng = match matches.get_one::<u64>("seed") {
        Some(seed) => SmallRng::seed_from_u64(*seed),
        None => SmallRng::from_entropy(),
    };
    for result in run::sweep(&store, &settings, &sweep_config, &mut rng)? {
        println!("{}", result.guid);
    }
    Ok(())
}

fn generate_stops(matches: &ArgMatches) -> Result<()> {
    let store = FileStore::new(get::<PathBuf>(matches, "store")?);
    let stop_set = run::generate_stops(
        &store,
        get(matches, "stops-set")?,
        get(matches, "num-stops")?,
        matches.get_one::<u64>("seed").copied(),
    )?;
    println!(
        "Stored {} stops as set {}",
        stop_set.locations.len(),
        stop_set.stops_set_id
    );
    Ok(())
}
