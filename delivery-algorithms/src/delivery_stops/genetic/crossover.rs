use super::candidate::Candidate;
use rand::Rng;

/// Crosses two parents with probability `crossover_rate`; otherwise returns copies of them.
///
/// A random segment `[start, end]` of at least two positions is crossed. For each position
/// in the segment where the children disagree, the two stop values trade places inside
/// each child, so both children stay permutations without any repair pass.
pub fn crossover<R: Rng>(
    parent1: &Candidate,
    parent2: &Candidate,
    crossover_rate: f64,
    rng: &mut R,
) -> (Candidate, Candidate) {
    let mut child1 = parent1.clone();
    let mut child2 = parent2.clone();

    if rng.gen::<f64>() >= crossover_rate {
        return (child1, child2);
    }

    let num_genes = child1.path.len();
    debug_assert_eq!(num_genes, child2.path.len(), "Parents must have the same length");
    if num_genes < 2 {
        return (child1, child2);
    }

    let start = rng.gen_range(0..=num_genes - 2);
    let end = rng.gen_range(start + 1..=num_genes - 1);
    cross_segment(&mut child1.path, &mut child2.path, start, end);
    child1.fitness = None;
    child2.fitness = None;
    (child1, child2)
}

/// Position-swap crossover over the inclusive segment `[start, end]`.
pub fn cross_segment(child1: &mut [usize], child2: &mut [usize], start: usize, end: usize) {
    let mut pos1 = positions_of(child1);
    let mut pos2 = positions_of(child2);
    for index in start..=end {
        let stop1 = child1[index];
        let stop2 = child2[index];
        if stop1 == stop2 {
            continue;
        }
        swap_stops(child1, &mut pos1, stop1, stop2);
        swap_stops(child2, &mut pos2, stop1, stop2);
    }
}

fn positions_of(path: &[usize]) -> Vec<usize> {
    let mut positions = vec![0; path.len()];
    for (index, &stop) in path.iter().enumerate() {
        positions[stop] = index;
    }
    positions
}

#[inline]
fn swap_stops(path: &mut [usize], positions: &mut [usize], a: usize, b: usize) {
    path.swap(positions[a], positions[b]);
    positions.swap(a, b);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    fn random_pair(rng: &mut SmallRng, n: usize) -> (Candidate, Candidate) {
        (
            Candidate::random(n, rng).unwrap(),
            Candidate::random(n, rng).unwrap(),
        )
    }

    #[test]
    fn test_zero_rate_returns_copies() {
        let mut rng = SmallRng::seed_from_u64(10);
        for _ in 0..100 {
            let (p1, p2) = random_pair(&mut rng, 20);
            let (c1, c2) = crossover(&p1, &p2, 0.0, &mut rng);
            assert_eq!(c1.path, p1.path);
            assert_eq!(c2.path, p2.path);
        }
    }

    #[test]
    fn test_children_are_permutations() {
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..1000 {
            let (p1, p2) = random_pair(&mut rng, 20);
            let (c1, c2) = crossover(&p1, &p2, 1.0, &mut rng);
            assert!(c1.is_valid(20), "{:?}", c1.path);
            assert!(c2.is_valid(20), "{:?}", c2.path);
            assert_eq!(c1.fitness, None);
            assert_eq!(c2.fitness, None);
        }
    }

    #[test]
    fn test_segment_is_exchanged() {
        let mut c1 = vec![0, 1, 2, 3, 4];
        let mut c2 = vec![4, 3, 2, 1, 0];
        cross_segment(&mut c1, &mut c2, 0, 1);
        // Position 0: 0<->4 swapped in both. Position 1: 1<->3 swapped in both.
        assert_eq!(c1, vec![4, 3, 2, 1, 0]);
        assert_eq!(c2, vec![0, 1, 2, 3, 4]);

        let mut c1 = vec![0, 1, 2, 3];
        let mut c2 = vec![1, 0, 3, 2];
        cross_segment(&mut c1, &mut c2, 1, 2);
        assert_eq!(c1, vec![1, 0, 3, 2]);
        assert_eq!(c2, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_identical_parents_are_unchanged() {
        let mut rng = SmallRng::seed_from_u64(13);
        let parent = Candidate::random(15, &mut rng).unwrap();
        let (c1, c2) = crossover(&parent, &parent, 1.0, &mut rng);
        assert_eq!(c1.path, parent.path);
        assert_eq!(c2.path, parent.path);
    }

    #[test]
    fn test_single_stop_routes() {
        let mut rng = SmallRng::seed_from_u64(14);
        let p = Candidate::new(vec![0]);
        let (c1, c2) = crossover(&p, &p, 1.0, &mut rng);
        assert_eq!(c1.path, vec![0]);
        assert_eq!(c2.path, vec![0]);
    }
}
