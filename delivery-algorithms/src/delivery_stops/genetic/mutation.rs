use super::candidate::Candidate;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationKind {
    Swap,
    Displacement,
}

/// With probability `mutation_rate`, applies a swap or a displacement (50/50).
/// Returns the mutation that was applied, if any.
pub fn mutate_maybe<R: Rng>(
    candidate: &mut Candidate,
    mutation_rate: f64,
    rng: &mut R,
) -> Option<MutationKind> {
    if rng.gen::<f64>() >= mutation_rate {
        return None;
    }
    if rng.gen::<f64>() < 0.5 {
        swap_mutation(candidate, rng);
        Some(MutationKind::Swap)
    } else {
        displacement_mutation(candidate, rng);
        Some(MutationKind::Displacement)
    }
}

/// Exchanges the stops at two distinct positions.
pub fn swap_mutation<R: Rng>(candidate: &mut Candidate, rng: &mut R) {
    let Some((pos1, pos2)) = distinct_positions(candidate.path.len(), rng) else {
        return;
    };
    candidate.path.swap(pos1, pos2);
    candidate.fitness = None;
}

/// Moves one stop to another position, shifting the stops in between by one.
pub fn displacement_mutation<R: Rng>(candidate: &mut Candidate, rng: &mut R) {
    let Some((stop_to_move, insert_at)) = distinct_positions(candidate.path.len(), rng) else {
        return;
    };
    let stop = candidate.path.remove(stop_to_move);
    candidate.path.insert(insert_at, stop);
    candidate.fitness = None;
}

fn distinct_positions<R: Rng>(len: usize, rng: &mut R) -> Option<(usize, usize)> {
    if len < 2 {
        return None;
    }
    let first = rng.gen_range(0..len);
    let mut second = rng.gen_range(0..len - 1);
    if second >= first {
        second += 1;
    }
    Some((first, second))
}
