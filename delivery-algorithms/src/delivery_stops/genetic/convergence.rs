use super::candidate::Candidate;
use super::config::Config;

/// Best-ever score after a given generation was observed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationRecord {
    pub generation: usize,
    pub best_score: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BestResult {
    pub candidate: Candidate,
    pub generation: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminationReason {
    Stagnated,
    GenerationCap,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Continue,
    Terminate(TerminationReason),
}

pub struct ConvergenceController {
    max_generations: usize,
    max_stagnant_generations: usize,
    best: Option<BestResult>,
}

impl ConvergenceController {
    pub fn new(config: &Config) -> Self {
        Self {
            max_generations: config.max_generations,
            max_stagnant_generations: config.max_stagnant_generations,
            best: None,
        }
    }

    pub fn best(&self) -> Option<&BestResult> {
        self.best.as_ref()
    }

    pub fn best_score(&self) -> u64 {
        self.best
            .as_ref()
            .map(|b| b.candidate.score())
            .unwrap_or(u64::MAX)
    }

    /// Generation of the last all-time-best improvement, 0 before any.
    pub fn last_improvement(&self) -> usize {
        self.best.as_ref().map(|b| b.generation).unwrap_or(0)
    }

    pub fn into_best(self) -> Option<BestResult> {
        self.best
    }

    /// Records the scored `population` of `generation` and decides whether to keep going.
    /// A new all-time best is cloned, since the population is bred from afterwards.
    pub fn observe(&mut self, generation: usize, population: &[Candidate]) -> Decision {
        let generation_best = population
            .iter()
            .filter(|c| c.fitness.is_some())
            .min_by_key(|c| c.score());

        let improved = match generation_best {
            Some(candidate) if candidate.score() < self.best_score() => {
                self.best = Some(BestResult {
                    candidate: candidate.clone(),
                    generation,
                });
                true
            }
            _ => false,
        };

        if !improved
            && generation.saturating_sub(self.last_improvement()) >= self.max_stagnant_generations
        {
            return Decision::Terminate(TerminationReason::Stagnated);
        }
        if generation > self.max_generations {
            return Decision::Terminate(TerminationReason::GenerationCap);
        }
        Decision::Continue
    }
}
