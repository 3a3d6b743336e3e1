use crate::{Colony, PheromoneField, RandomSource, SolverConfig};
use acs_instance::{
    travelling_salesman::{Challenge, Solution},
    AcsError, DistanceModel, Result, Tour,
};
use rand::{rngs::SmallRng, SeedableRng};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

/// Best tour of a run, plus how the best length evolved.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RunResult {
    pub best_tour: Tour,
    pub best_length: f64,
    /// Best length known at the end of each generation. Never increases.
    pub best_length_history: Vec<f64>,
    /// Generation in which `best_tour` was found.
    pub improved_at: usize,
}

pub struct Solver<'a> {
    colony: Colony<'a>,
    config: SolverConfig,
}

impl<'a> Solver<'a> {
    /// Validates `config` up front; a constructed solver always runs to completion.
    pub fn new(distances: &'a DistanceModel, config: SolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            colony: Colony::new(distances, config),
            config,
        })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn pheromones(&self) -> &PheromoneField {
        self.colony.pheromones()
    }

    pub fn run<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Result<RunResult> {
        self.run_with(rng, false, |_, _| {})
    }

    pub fn run_parallel<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Result<RunResult> {
        self.run_with(rng, true, |_, _| {})
    }

    /// Runs exactly `iterations` generations. `on_improvement` sees every new
    /// best tour together with the generation that produced it.
    pub fn run_with<R, F>(
        &mut self,
        rng: &mut R,
        parallel: bool,
        mut on_improvement: F,
    ) -> Result<RunResult>
    where
        R: RandomSource + ?Sized,
        F: FnMut(&Tour, usize),
    {
        info!(
            num_nodes = self.pheromones().num_nodes(),
            n_ants = self.config.n_ants,
            iterations = self.config.iterations,
            parallel,
            "starting ant colony run"
        );
        let mut best: Option<(Tour, usize)> = None;
        let mut best_length = f64::INFINITY;
        let mut best_length_history = Vec::with_capacity(self.config.iterations);

        for generation in 0..self.config.iterations {
            let tours = if parallel {
                self.colony.iterate_parallel(&mut *rng)?
            } else {
                self.colony.iterate(&mut *rng)?
            };
            let champion = tours
                .into_iter()
                .min_by(|a, b| a.length().total_cmp(&b.length()));
            if let Some(champion) = champion {
                if best.is_none() || champion.length() < best_length {
                    best_length = champion.length();
                    debug!(generation, best_length, "new best tour");
                    on_improvement(&champion, generation);
                    best = Some((champion, generation));
                }
            }
            best_length_history.push(best_length);
        }

        let (best_tour, improved_at) = best.ok_or_else(|| {
            AcsError::InvalidInput("Run produced no tours; n_ants must be at least 1".to_string())
        })?;
        info!(best_length, improved_at, "ant colony run finished");
        Ok(RunResult {
            best_tour,
            best_length,
            best_length_history,
            improved_at,
        })
    }
}

/// Runs a fresh solver over `distances`.
pub fn solve<R: RandomSource + ?Sized>(
    distances: &DistanceModel,
    config: SolverConfig,
    rng: &mut R,
) -> Result<RunResult> {
    Solver::new(distances, config)?.run(rng)
}

/// Solves a generated challenge, seeding the colony from the challenge seed.
///
/// `hyperparameters` are merged over [`SolverConfig::default`]; a `"parallel"`
/// flag switches to [`Solver::run_parallel`]. `save_solution` is called on
/// every improvement, so an interrupted caller still holds the best route so far.
pub fn solve_challenge(
    challenge: &Challenge,
    save_solution: &dyn Fn(&Solution) -> anyhow::Result<()>,
    hyperparameters: &Option<Map<String, Value>>,
) -> anyhow::Result<()> {
    let config = SolverConfig::initialize(hyperparameters)?;
    let parallel = hyperparameters
        .as_ref()
        .and_then(|m| m.get("parallel"))
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let mut rng = SmallRng::from_seed(challenge.seed);
    let mut solver = Solver::new(&challenge.distance_matrix, config)?;
    let result = solver.run_with(&mut rng, parallel, |tour, generation| {
        if let Err(e) = save_solution(&Solution {
            route: tour.order().to_vec(),
        }) {
            warn!(generation, "failed to save solution: {}", e);
        }
    })?;
    info!(
        best_length = result.best_length,
        baseline_distance = challenge.baseline_distance,
        "challenge solved"
    );
    Ok(())
}
