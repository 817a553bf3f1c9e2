use super::candidate::Candidate;
use delivery_challenges::delivery_stops::Challenge;

/// Length of the closed tour depot -> candidate.path -> depot on the street grid.
#[inline]
pub fn evaluate(candidate: &Candidate, challenge: &Challenge) -> u64 {
    challenge.calc_route_cost(&candidate.path)
}
