use crate::{PheromoneField, RandomSource, SolverConfig, TourBuilder};
use acs_instance::{DistanceModel, Result, Tour};
use rand::{rngs::SmallRng, SeedableRng};
use rayon::prelude::*;

/// One ant colony: the pheromone field it owns plus the read-only instance.
///
/// A generation builds every ant's tour first and only then updates the field,
/// so no ant ever sees another ant's deposits from the same generation.
#[derive(Debug, Clone)]
pub struct Colony<'a> {
    distances: &'a DistanceModel,
    pheromones: PheromoneField,
    config: SolverConfig,
}

impl<'a> Colony<'a> {
    pub fn new(distances: &'a DistanceModel, config: SolverConfig) -> Self {
        Self::with_pheromones(distances, config, PheromoneField::new(distances.num_nodes()))
    }

    pub fn with_pheromones(
        distances: &'a DistanceModel,
        config: SolverConfig,
        pheromones: PheromoneField,
    ) -> Self {
        Self {
            distances,
            pheromones,
            config,
        }
    }

    pub fn pheromones(&self) -> &PheromoneField {
        &self.pheromones
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn tour_builder(&self) -> TourBuilder<'_> {
        TourBuilder::new(self.distances, &self.pheromones, &self.config)
    }

    /// Runs one generation and returns its tours.
    pub fn iterate<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Result<Vec<Tour>> {
        let tours = {
            let builder = self.tour_builder();
            (0..self.config.n_ants)
                .map(|_| builder.build(&mut *rng))
                .collect::<Result<Vec<_>>>()?
        };
        self.pheromones.update(self.config.decay, &tours);
        Ok(tours)
    }

    /// Same as [`iterate`](Colony::iterate) with tours built on the rayon pool.
    ///
    /// Each ant draws from its own `SmallRng`, seeded from `rng` before the
    /// parallel section, so a fixed master seed still gives fixed tours.
    pub fn iterate_parallel<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Result<Vec<Tour>> {
        let seeds: Vec<u64> = (0..self.config.n_ants).map(|_| rng.next_seed()).collect();
        let tours = {
            let builder = self.tour_builder();
            seeds
                .into_par_iter()
                .map(|seed| builder.build(&mut SmallRng::seed_from_u64(seed)))
                .collect::<Result<Vec<_>>>()?
        };
        self.pheromones.update(self.config.decay, &tours);
        Ok(tours)
    }
}
