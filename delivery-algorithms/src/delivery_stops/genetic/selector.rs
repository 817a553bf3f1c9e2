use super::candidate::Candidate;
use rand::Rng;

/// Draws `tourney_size` indices with replacement and returns the fittest one.
/// The earliest draw wins ties.
pub fn tournament<R: Rng>(population: &[Candidate], tourney_size: usize, rng: &mut R) -> usize {
    debug_assert!(!population.is_empty(), "Cannot select from an empty population");
    let mut best = rng.gen_range(0..population.len());
    for _ in 1..tourney_size {
        let challenger = rng.gen_range(0..population.len());
        if population[challenger].score() < population[best].score() {
            best = challenger;
        }
    }
    best
}

/// Two tournament winners at different indices.
///
/// A population that has collapsed onto a few strong candidates can keep producing the
/// same winner twice. After `max_retries` such draws the second parent is drawn uniformly
/// from the other indices instead. A population of one returns `(0, 0)`.
pub fn select_parents<R: Rng>(
    population: &[Candidate],
    tourney_size: usize,
    max_retries: usize,
    rng: &mut R,
) -> (usize, usize) {
    if population.len() < 2 {
        return (0, 0);
    }
    for _ in 0..max_retries {
        let p1 = tournament(population, tourney_size, rng);
        let p2 = tournament(population, tourney_size, rng);
        if p1 != p2 {
            return (p1, p2);
        }
    }
    log::debug!(
        "no distinct tournament pair after {} attempts, drawing second parent uniformly",
        max_retries
    );
    let p1 = tournament(population, tourney_size, rng);
    let mut p2 = rng.gen_range(0..population.len() - 1);
    if p2 >= p1 {
        p2 += 1;
    }
    (p1, p2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    fn scored(scores: &[u64]) -> Vec<Candidate> {
        scores
            .iter()
            .map(|&s| Candidate {
                path: vec![0],
                fitness: Some(s),
            })
            .collect()
    }

    #[test]
    fn test_tourney_of_one_is_uniform() {
        let population = scored(&[5, 1, 9, 3]);
        let mut rng = SmallRng::seed_from_u64(1);
        let mut counts = [0usize; 4];
        for _ in 0..4000 {
            counts[tournament(&population, 1, &mut rng)] += 1;
        }
        assert!(counts.iter().all(|&c| c > 800 && c < 1200), "{:?}", counts);
    }

    #[test]
    fn test_large_tourney_finds_the_best() {
        let population = scored(&[5, 1, 9, 3]);
        let mut rng = SmallRng::seed_from_u64(2);
        for _ in 0..100 {
            assert_eq!(tournament(&population, 64, &mut rng), 1);
        }
    }

    #[test]
    fn test_tourney_favours_fitter_candidates() {
        let population = scored(&[40, 30, 20, 10]);
        let mut rng = SmallRng::seed_from_u64(3);
        let mut counts = [0usize; 4];
        for _ in 0..4000 {
            counts[tournament(&population, 3, &mut rng)] += 1;
        }
        assert!(counts[3] > counts[2] && counts[2] > counts[1] && counts[1] > counts[0]);
    }

    #[test]
    fn test_parents_are_distinct() {
        let population = scored(&[7, 3, 3, 8, 1]);
        let mut rng = SmallRng::seed_from_u64(4);
        for _ in 0..1000 {
            let (p1, p2) = select_parents(&population, 3, 100, &mut rng);
            assert_ne!(p1, p2);
        }
    }

    #[test]
    fn test_dominant_candidate_does_not_livelock() {
        // With a huge tourney every draw returns index 0, so the fallback must kick in.
        let population = scored(&[0, 10, 10, 10]);
        let mut rng = SmallRng::seed_from_u64(5);
        for _ in 0..100 {
            let (p1, p2) = select_parents(&population, 500, 3, &mut rng);
            assert_eq!(p1, 0);
            assert_ne!(p2, 0);
            assert!(p2 < population.len());
        }
    }

    #[test]
    fn test_single_candidate_pairs_with_itself() {
        let population = scored(&[1]);
        let mut rng = SmallRng::seed_from_u64(6);
        assert_eq!(select_parents(&population, 2, 10, &mut rng), (0, 0));
    }
}
