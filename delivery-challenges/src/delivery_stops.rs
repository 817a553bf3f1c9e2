use std::collections::HashSet;

use anyhow::{anyhow, Result};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Smallest and largest coordinate used when placing generated stops.
pub const GRID_MIN: i32 = -15;
pub const GRID_MAX: i32 = 15;

/// An intersection on the street grid.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Grid distance between two intersections. Streets are two-way, so this is symmetric.
    #[inline]
    pub fn manhattan(&self, other: &Location) -> u64 {
        self.x.abs_diff(other.x) as u64 + self.y.abs_diff(other.y) as u64
    }
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone)]
pub struct StopsConfig {
    pub num_stops: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Solution {
    pub route: Vec<usize>,
}

/// A fixed depot plus the stops a single vehicle has to visit.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Challenge {
    pub seed: [u8; 32],
    pub depot: Location,
    pub stops: Vec<Location>,
}

impl Challenge {
    pub fn new(stops: Vec<Location>, depot: Location) -> Self {
        Self {
            seed: [0u8; 32],
            depot,
            stops,
        }
    }

    /// Places `num_stops` distinct stops on the grid, none of them on the depot at the origin.
    pub fn generate_instance(seed: &[u8; 32], config: &StopsConfig) -> Result<Self> {
        let depot = Location::new(0, 0);
        let side = (GRID_MAX - GRID_MIN + 1) as usize;
        if config.num_stops == 0 {
            return Err(anyhow!("Number of stops must be at least 1"));
        }
        if config.num_stops > side * side - 1 {
            return Err(anyhow!(
                "Number of stops ({}) exceeds the free intersections on the grid ({})",
                config.num_stops,
                side * side - 1
            ));
        }

        let mut rng = SmallRng::from_seed(seed.clone());
        let mut stops: Vec<Location> = Vec::with_capacity(config.num_stops);
        let mut used: HashSet<Location> = HashSet::with_capacity(config.num_stops + 1);
        used.insert(depot);
        while stops.len() < config.num_stops {
            let pos = Location::new(
                rng.gen_range(GRID_MIN..=GRID_MAX),
                rng.gen_range(GRID_MIN..=GRID_MAX),
            );
            if used.contains(&pos) {
                continue;
            }
            stops.push(pos);
            used.insert(pos);
        }

        Ok(Self {
            seed: seed.clone(),
            depot,
            stops,
        })
    }

    pub fn num_stops(&self) -> usize {
        self.stops.len()
    }

    /// Length of the closed tour depot -> route -> depot. Does not check the route.
    pub fn calc_route_cost(&self, route: &[usize]) -> u64 {
        let (first, last) = match (route.first(), route.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => return 0,
        };
        self.depot.manhattan(&self.stops[first])
            + route
                .windows(2)
                .map(|w| self.stops[w[0]].manhattan(&self.stops[w[1]]))
                .sum::<u64>()
            + self.stops[last].manhattan(&self.depot)
    }

    pub fn verify_route(&self, route: &[usize]) -> Result<()> {
        if route.len() != self.stops.len() {
            return Err(anyhow!(
                "Route length ({}) does not match number of stops ({})",
                route.len(),
                self.stops.len()
            ));
        }
        if route.iter().any(|&stop| stop >= self.stops.len()) {
            return Err(anyhow!("Route contains invalid stops"));
        }
        let visited = route.iter().cloned().collect::<HashSet<usize>>();
        if visited.len() != route.len() {
            return Err(anyhow!("Route contains duplicate stops"));
        }
        Ok(())
    }

    pub fn evaluate_route(&self, solution: &Solution) -> Result<u64> {
        self.verify_route(&solution.route)?;
        Ok(self.calc_route_cost(&solution.route))
    }

    /// Nearest-neighbour tour from the depot. Ties go to the lowest stop index.
    pub fn compute_greedy_baseline(&self) -> Solution {
        let mut unvisited = vec![true; self.stops.len()];
        let mut route = Vec::with_capacity(self.stops.len());
        let mut current = self.depot;
        while route.len() < self.stops.len() {
            let next = (0..self.stops.len())
                .filter(|&stop| unvisited[stop])
                .min_by_key(|&stop| current.manhattan(&self.stops[stop]));
            let Some(next) = next else { break };
            unvisited[next] = false;
            route.push(next);
            current = self.stops[next];
        }
        Solution { route }
    }
}
