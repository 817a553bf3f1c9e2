use anyhow::{anyhow, Result};
use rand::{seq::SliceRandom, Rng};
use std::fmt;

/// A visiting order over the stops. `fitness` is `None` until the candidate has been scored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub path: Vec<usize>,
    pub fitness: Option<u64>,
}

impl Candidate {
    pub fn new(path: Vec<usize>) -> Self {
        Self {
            path,
            fitness: None,
        }
    }

    pub fn random<R: Rng>(num_stops: usize, rng: &mut R) -> Result<Self> {
        if num_stops == 0 {
            return Err(anyhow!("Cannot build a route over zero stops"));
        }
        let mut path: Vec<usize> = (0..num_stops).collect();
        path.shuffle(rng);
        Ok(Self::new(path))
    }

    /// Fitness for ranking. Unscored candidates rank last.
    #[inline]
    pub fn score(&self) -> u64 {
        self.fitness.unwrap_or(u64::MAX)
    }

    pub fn is_valid(&self, num_stops: usize) -> bool {
        self.check_validity(num_stops).is_ok()
    }

    pub fn check_validity(&self, num_stops: usize) -> Result<()> {
        if self.path.len() != num_stops {
            return Err(anyhow!(
                "Wrong number of elements in path: expected {}, got {}",
                num_stops,
                self.path.len()
            ));
        }
        let mut seen = vec![false; num_stops];
        for &stop in &self.path {
            if stop >= num_stops {
                return Err(anyhow!("Path references unknown stop {}", stop));
            }
            if seen[stop] {
                return Err(anyhow!("Non-unique stop {} in path", stop));
            }
            seen[stop] = true;
        }
        Ok(())
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head = &self.path[..self.path.len().min(5)];
        match self.fitness {
            Some(score) => write!(f, "Score {}: {:?}", score, head),
            None => write!(f, "Unscored: {:?}", head),
        }
    }
}
