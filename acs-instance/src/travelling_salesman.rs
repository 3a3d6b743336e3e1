use crate::{
    error::{invalid_input, Result},
    DistanceModel, Tour,
};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const MAX_COORDINATE: i32 = 1000;
/// Generated instances hold a dense `n × n` matrix; this keeps it near 200 MB.
pub const MAX_NUM_NODES: usize = 5_000;

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct Difficulty {
    pub num_nodes: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Solution {
    pub route: Vec<usize>,
}

impl From<Tour> for Solution {
    fn from(tour: Tour) -> Self {
        Self {
            route: tour.into_order(),
        }
    }
}

/// A seeded Euclidean instance on the integer grid `[0, 1000]²`, together
/// with a nearest-neighbour baseline to compare solutions against.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Challenge {
    pub seed: [u8; 32],
    pub difficulty: Difficulty,
    pub node_positions: Vec<(i32, i32)>,
    pub distance_matrix: DistanceModel,
    pub baseline_route: Vec<usize>,
    pub baseline_distance: f64,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Verification {
    pub total_distance: f64,
    pub baseline_distance: f64,
    /// Percentage by which the route beats the baseline; negative when worse.
    pub better_than_baseline: f64,
}

impl Challenge {
    pub fn generate_instance(seed: &[u8; 32], difficulty: &Difficulty) -> Result<Self> {
        let num_nodes = difficulty.num_nodes;
        if num_nodes < 2 || num_nodes > MAX_NUM_NODES {
            return Err(invalid_input!(
                "Number of nodes must be between 2 and {} (got {})",
                MAX_NUM_NODES,
                num_nodes
            ));
        }
        let mut rng = SmallRng::from_seed(*seed);

        let mut node_positions: Vec<(i32, i32)> = Vec::with_capacity(num_nodes);
        let mut node_positions_set: HashSet<(i32, i32)> = HashSet::with_capacity(num_nodes);
        while node_positions.len() < num_nodes {
            let pos = (
                rng.gen_range(0..=MAX_COORDINATE),
                rng.gen_range(0..=MAX_COORDINATE),
            );
            if node_positions_set.insert(pos) {
                node_positions.push(pos);
            }
        }

        let points: Vec<(f64, f64)> = node_positions
            .iter()
            .map(|&(x, y)| (x as f64, y as f64))
            .collect();
        let distance_matrix = DistanceModel::from_points(&points)?;
        let baseline_route = nearest_neighbour_route(&distance_matrix, 0);
        let baseline_distance = Tour::new(baseline_route.clone(), &distance_matrix)?.length();

        Ok(Self {
            seed: *seed,
            difficulty: *difficulty,
            node_positions,
            distance_matrix,
            baseline_route,
            baseline_distance,
        })
    }

    pub fn num_nodes(&self) -> usize {
        self.distance_matrix.num_nodes()
    }

    pub fn calc_total_distance(&self, solution: &Solution) -> Result<f64> {
        Ok(Tour::new(solution.route.clone(), &self.distance_matrix)?.length())
    }

    pub fn verify_solution(&self, solution: &Solution) -> Result<Verification> {
        let total_distance = self.calc_total_distance(solution)?;
        Ok(Verification {
            total_distance,
            baseline_distance: self.baseline_distance,
            better_than_baseline: (1.0 - total_distance / self.baseline_distance) * 100.0,
        })
    }
}

/// Greedy route that always moves to the closest unvisited node. Ties go to
/// the lowest node index.
pub fn nearest_neighbour_route(distances: &DistanceModel, start: usize) -> Vec<usize> {
    let num_nodes = distances.num_nodes();
    let mut visited = vec![false; num_nodes];
    let mut route = Vec::with_capacity(num_nodes);
    let mut current_node = start;
    visited[current_node] = true;
    route.push(current_node);
    while route.len() < num_nodes {
        let row = distances.row(current_node);
        let mut next_node = None;
        for candidate in (0..num_nodes).filter(|&c| !visited[c]) {
            match next_node {
                Some(best) if row[candidate] >= row[best] => {}
                _ => next_node = Some(candidate),
            }
        }
        // route.len() < num_nodes guarantees an unvisited node
        let Some(next_node) = next_node else { break };
        visited[next_node] = true;
        route.push(next_node);
        current_node = next_node;
    }
    route
}

/// Caller-supplied instance: either coordinates or a ready-made matrix. A
/// serialized [`Challenge`] also parses as an `InstanceData`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct InstanceData {
    #[serde(default)]
    pub node_positions: Option<Vec<(f64, f64)>>,
    #[serde(default)]
    pub distance_matrix: Option<Vec<Vec<f64>>>,
}

impl InstanceData {
    pub fn into_distance_model(self) -> Result<DistanceModel> {
        match (self.distance_matrix, self.node_positions) {
            (Some(matrix), _) => DistanceModel::from_matrix(matrix),
            (None, Some(points)) => DistanceModel::from_points(&points),
            (None, None) => Err(invalid_input!(
                "Instance needs either 'distance_matrix' or 'node_positions'"
            )),
        }
    }
}
