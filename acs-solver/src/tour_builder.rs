use crate::{PheromoneField, RandomSource, SolverConfig};
use acs_instance::{DistanceModel, Result, Tour};
use tracing::trace;

/// Builds one ant's tour with the ACS transition rule.
///
/// From the current node every unvisited candidate `c` scores
/// `tau(cur, c)^alpha * (1 / d(cur, c))^beta`. With probability `q0` the ant
/// takes the highest score (first one wins ties); otherwise it samples a
/// candidate in proportion to its score. If the scores do not form a
/// distribution the draw falls back to a uniform pick.
#[derive(Debug, Clone, Copy)]
pub struct TourBuilder<'a> {
    distances: &'a DistanceModel,
    pheromones: &'a PheromoneField,
    alpha: f64,
    beta: f64,
    q0: f64,
}

impl<'a> TourBuilder<'a> {
    pub fn new(
        distances: &'a DistanceModel,
        pheromones: &'a PheromoneField,
        config: &SolverConfig,
    ) -> Self {
        Self {
            distances,
            pheromones,
            alpha: config.alpha,
            beta: config.beta,
            q0: config.q0,
        }
    }

    pub fn build<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Result<Tour> {
        let start = rng.gen_index(self.distances.num_nodes());
        self.build_from(start, rng)
    }

    pub fn build_from<R: RandomSource + ?Sized>(&self, start: usize, rng: &mut R) -> Result<Tour> {
        let num_nodes = self.distances.num_nodes();
        let mut order = Vec::with_capacity(num_nodes);
        order.push(start);
        let mut unvisited: Vec<usize> = (0..num_nodes).filter(|&node| node != start).collect();
        let mut scores = Vec::with_capacity(unvisited.len());

        let mut current = start;
        while !unvisited.is_empty() {
            let pos = self.select_next(current, &unvisited, &mut scores, rng);
            current = unvisited.remove(pos);
            order.push(current);
        }
        Tour::new(order, self.distances)
    }

    /// Desirability of moving from `from` to `to`.
    #[inline]
    pub fn score(&self, from: usize, to: usize) -> f64 {
        self.pheromones.get(from, to).powf(self.alpha)
            * (1.0 / self.distances.cost(from, to)).powf(self.beta)
    }

    /// Returns a position in `candidates`.
    fn select_next<R: RandomSource + ?Sized>(
        &self,
        current: usize,
        candidates: &[usize],
        scores: &mut Vec<f64>,
        rng: &mut R,
    ) -> usize {
        scores.clear();
        scores.extend(candidates.iter().map(|&c| self.score(current, c)));

        if rng.next_f64() < self.q0 {
            return argmax(scores);
        }

        let total: f64 = scores.iter().sum();
        if total > 0.0 && total.is_finite() {
            if let Some(pos) = rng.sample_weighted(scores) {
                return pos;
            }
        }
        trace!(
            current,
            total,
            candidates = candidates.len(),
            "degenerate scores, picking uniformly"
        );
        rng.gen_index(candidates.len())
    }
}

/// Position of the first maximum.
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}
