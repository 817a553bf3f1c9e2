use super::candidate::Candidate;
use super::config::Config;
use super::crossover::crossover;
use super::mutation::mutate_maybe;
use super::selector::select_parents;
use rand::Rng;

/// Builds the next generation from a scored one.
///
/// The best `config.num_elites()` candidates are cloned across unchanged, then children are
/// bred in pairs until the population is full. When an odd number of slots remains, the
/// second child of the last pair is dropped.
pub fn next_generation<R: Rng>(
    mut current: Vec<Candidate>,
    config: &Config,
    rng: &mut R,
) -> Vec<Candidate> {
    let population_size = config.population_size;
    current.sort_by_key(|c| c.score());

    let num_elites = config.num_elites().min(current.len());
    let mut next_generation: Vec<Candidate> = Vec::with_capacity(population_size);
    next_generation.extend(current[..num_elites].iter().cloned());

    while next_generation.len() < population_size {
        let (p1, p2) = select_parents(
            &current,
            config.tourney_size,
            config.max_parent_retries,
            rng,
        );
        let (mut child1, mut child2) =
            crossover(&current[p1], &current[p2], config.crossover_rate, rng);
        mutate_maybe(&mut child1, config.mutation_rate, rng);
        next_generation.push(child1);
        if next_generation.len() < population_size {
            mutate_maybe(&mut child2, config.mutation_rate, rng);
            next_generation.push(child2);
        }
    }
    next_generation
}
