use rand::{
    distributions::{Distribution, WeightedIndex},
    Rng,
};

/// Source of the randomness consumed while building tours.
///
/// Every [`rand::Rng`] is a `RandomSource`. Tests can substitute
/// [`ReplaySource`] to script the draws.
pub trait RandomSource {
    /// Uniform draw from `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform draw from `0..upper`. `upper` must be non-zero.
    fn gen_index(&mut self, upper: usize) -> usize;

    /// Draws `i` with probability `weights[i] / sum(weights)`.
    ///
    /// Returns `None` when the weights do not form a distribution: a negative
    /// or non-finite weight, or a zero total.
    fn sample_weighted(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().sum();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) || !(total > 0.0) || !total.is_finite()
        {
            return None;
        }
        let target = self.next_f64() * total;
        let mut cumulative = 0.0;
        for (i, &w) in weights.iter().enumerate() {
            cumulative += w;
            if target < cumulative {
                return Some(i);
            }
        }
        weights.iter().rposition(|&w| w > 0.0)
    }

    /// Seed for a child generator, used to hand each ant its own stream.
    fn next_seed(&mut self) -> u64 {
        (self.next_f64() * u64::MAX as f64) as u64
    }
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn next_f64(&mut self) -> f64 {
        self.gen::<f64>()
    }

    fn gen_index(&mut self, upper: usize) -> usize {
        self.gen_range(0..upper)
    }

    fn sample_weighted(&mut self, weights: &[f64]) -> Option<usize> {
        if weights.iter().any(|w| !w.is_finite()) {
            return None;
        }
        WeightedIndex::new(weights)
            .ok()
            .map(|dist| dist.sample(self))
    }

    fn next_seed(&mut self) -> u64 {
        self.next_u64()
    }
}

/// Deterministic source that replays a fixed list of uniform draws, cycling
/// when it runs out. Values are clamped into `[0, 1)`.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    values: Vec<f64>,
    cursor: usize,
}

impl ReplaySource {
    pub fn new(values: Vec<f64>) -> Self {
        let values = if values.is_empty() { vec![0.0] } else { values };
        Self {
            values: values
                .into_iter()
                .map(|v| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0 - f64::EPSILON) })
                .collect(),
            cursor: 0,
        }
    }

    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of draws taken so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ReplaySource {
    fn next_f64(&mut self) -> f64 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }

    fn gen_index(&mut self, upper: usize) -> usize {
        ((self.next_f64() * upper as f64) as usize).min(upper - 1)
    }
}
