//! Ant Colony System for the symmetric travelling salesman problem.
//!
//! A [`Solver`] owns a [`Colony`], which owns the [`PheromoneField`]. Each
//! generation every ant builds a tour with the [`TourBuilder`] against a
//! read-only view of the field; only once all tours are known is the field
//! evaporated and reinforced.

mod colony;
pub use colony::*;
mod config;
pub use config::*;
mod pheromone;
pub use pheromone::*;
mod random;
pub use random::*;
mod solver;
pub use solver::*;
mod tour_builder;
pub use tour_builder::*;

pub use acs_instance::{AcsError, DistanceModel, Result, Tour};
