use delivery_algorithms::delivery_stops::genetic::*;
use delivery_challenges::delivery_stops::{Challenge, Location, Solution, StopsConfig};
use rand::{rngs::SmallRng, SeedableRng};
use serde_json::json;
use std::cell::RefCell;

fn challenge(num_stops: usize) -> Challenge {
    Challenge::generate_instance(&[42u8; 32], &StopsConfig { num_stops }).unwrap()
}

fn quick_config(seed: u64) -> Config {
    Config {
        population_size: 120,
        max_generations: 60,
        max_stagnant_generations: 15,
        seed: Some(seed),
        ..Config::default()
    }
}

#[test]
fn test_elites_are_the_best_by_value() {
    let challenge = challenge(30);
    let config = Config {
        population_size: 200,
        elitism_rate: 0.10,
        ..Config::default()
    };
    let mut rng = SmallRng::seed_from_u64(1);
    let mut population: Vec<Candidate> = (0..200)
        .map(|_| Candidate::random(30, &mut rng).unwrap())
        .collect();
    EvaluationScheduler::serial().evaluate(&mut population, &challenge);

    let mut ranked = population.clone();
    ranked.sort_by_key(|c| c.score());

    let next = next_generation(population, &config, &mut rng);
    assert_eq!(next.len(), 200);
    assert_eq!(&next[..20], &ranked[..20]);
    let worst_elite = next[..20].iter().map(|c| c.score()).max().unwrap();
    assert!(ranked[20..].iter().all(|c| c.score() >= worst_elite));
}

#[test]
fn test_best_so_far_never_gets_worse() {
    let challenge = challenge(40);
    let outcome = EvolutionEngine::new(&challenge, quick_config(2))
        .unwrap()
        .run()
        .unwrap();
    assert!(!outcome.trace.is_empty());
    for pair in outcome.trace.windows(2) {
        assert_eq!(pair[1].generation, pair[0].generation + 1);
        assert!(pair[1].best_score <= pair[0].best_score);
    }
    assert!(outcome.score() <= outcome.trace[0].best_score);
}

#[test]
fn test_flat_landscape_terminates_on_stagnation() {
    let depot = Location::new(0, 0);
    let challenge = Challenge::new(vec![depot; 12], depot);
    let config = Config {
        population_size: 50,
        max_stagnant_generations: 5,
        seed: Some(3),
        ..Config::default()
    };
    let outcome = EvolutionEngine::new(&challenge, config)
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(outcome.score(), 0);
    assert_eq!(outcome.reason, TerminationReason::Stagnated);
    assert!(outcome.generations <= 6);
    assert_eq!(outcome.best.generation, 1);
}

#[test]
fn test_generation_cap() {
    let challenge = challenge(50);
    let config = Config {
        population_size: 40,
        max_generations: 3,
        max_stagnant_generations: 1000,
        seed: Some(4),
        ..Config::default()
    };
    let outcome = EvolutionEngine::new(&challenge, config)
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(outcome.reason, TerminationReason::GenerationCap);
    assert_eq!(outcome.generations, 4);
    assert_eq!(outcome.trace.len(), 4);
}

#[test]
fn test_serial_and_parallel_runs_match() {
    let challenge = challenge(25);
    let serial = EvolutionEngine::new(
        &challenge,
        Config {
            parallel: false,
            ..quick_config(5)
        },
    )
    .unwrap()
    .run()
    .unwrap();
    let parallel = EvolutionEngine::new(
        &challenge,
        Config {
            parallel: true,
            num_workers: 3,
            ..quick_config(5)
        },
    )
    .unwrap()
    .run()
    .unwrap();
    assert_eq!(serial.best, parallel.best);
    assert_eq!(serial.trace, parallel.trace);
}

#[test]
fn test_same_seed_same_outcome() {
    let challenge = challenge(25);
    let first = EvolutionEngine::new(&challenge, quick_config(6))
        .unwrap()
        .run()
        .unwrap();
    let second = EvolutionEngine::new(&challenge, quick_config(6))
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(first.best, second.best);
    assert_eq!(first.generations, second.generations);
}

#[test]
fn test_beats_random_routes() {
    let challenge = challenge(30);
    let mut rng = SmallRng::seed_from_u64(7);
    let random_best = (0..120)
        .map(|_| {
            let candidate = Candidate::random(30, &mut rng).unwrap();
            evaluate(&candidate, &challenge)
        })
        .min()
        .unwrap();
    let outcome = EvolutionEngine::new(&challenge, quick_config(7))
        .unwrap()
        .run()
        .unwrap();
    assert!(outcome.score() <= random_best);
}

#[test]
fn test_solve_challenge_saves_a_valid_route() {
    let challenge = challenge(20);
    let saved: RefCell<Option<Solution>> = RefCell::new(None);
    let save_solution = |solution: &Solution| -> anyhow::Result<()> {
        *saved.borrow_mut() = Some(solution.clone());
        Ok(())
    };
    let hyperparameters = json!({
        "population_size": 80,
        "max_generations": 30,
        "max_stagnant_generations": 10,
        "validate_candidates": true,
        "seed": 8
    })
    .as_object()
    .cloned();
    solve_challenge(&challenge, &save_solution, &hyperparameters).unwrap();

    let solution = saved.into_inner().unwrap();
    challenge.verify_route(&solution.route).unwrap();
}

#[test]
fn test_solve_challenge_rejects_bad_hyperparameters() {
    let challenge = challenge(5);
    let hyperparameters = json!({ "crossover_rate": -0.1 }).as_object().cloned();
    let result = solve_challenge(&challenge, &|_| Ok(()), &hyperparameters);
    assert!(result.is_err());

    let hyperparameters = json!({ "no_such_field": 1 }).as_object().cloned();
    let result = solve_challenge(&challenge, &|_| Ok(()), &hyperparameters);
    assert!(result.is_err());
}
