use crate::error::{invalid_input, AcsError, Result};
use serde::{Deserialize, Serialize};

/// Symmetric matrix of pairwise travel costs between `n` nodes.
///
/// Construction validates the whole matrix, so every `DistanceModel` in
/// existence has `n >= 2`, a zero diagonal, and strictly positive, finite,
/// symmetric off-diagonal entries, small enough that no closed tour length
/// overflows. Inverse distances are always defined.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct DistanceModel {
    num_nodes: usize,
    costs: Vec<f64>,
}

impl DistanceModel {
    pub fn from_matrix(matrix: Vec<Vec<f64>>) -> Result<Self> {
        let num_nodes = matrix.len();
        if num_nodes < 2 {
            return Err(invalid_input!(
                "Distance matrix must have at least 2 nodes (got {})",
                num_nodes
            ));
        }
        let mut costs = Vec::with_capacity(num_nodes * num_nodes);
        for (i, row) in matrix.iter().enumerate() {
            if row.len() != num_nodes {
                return Err(invalid_input!(
                    "Distance matrix is not square: row {} has {} entries, expected {}",
                    i,
                    row.len(),
                    num_nodes
                ));
            }
            for (j, &d) in row.iter().enumerate() {
                if !d.is_finite() || d < 0.0 {
                    return Err(invalid_input!(
                        "Distance ({}, {}) must be finite and non-negative (got {})",
                        i,
                        j,
                        d
                    ));
                }
                if i == j && d != 0.0 {
                    return Err(invalid_input!(
                        "Distance from node {} to itself must be 0 (got {})",
                        i,
                        d
                    ));
                }
                if i != j && d == 0.0 {
                    return Err(invalid_input!(
                        "Distinct nodes {} and {} are at zero distance",
                        i,
                        j
                    ));
                }
            }
            costs.extend_from_slice(row);
        }
        for i in 0..num_nodes {
            for j in (i + 1)..num_nodes {
                let (d_ij, d_ji) = (costs[i * num_nodes + j], costs[j * num_nodes + i]);
                if d_ij != d_ji {
                    return Err(invalid_input!(
                        "Distance matrix is not symmetric: ({}, {}) = {} but ({}, {}) = {}",
                        i,
                        j,
                        d_ij,
                        j,
                        i,
                        d_ji
                    ));
                }
            }
        }
        let max_cost = costs.iter().cloned().fold(0.0, f64::max);
        if !(max_cost * num_nodes as f64).is_finite() {
            return Err(invalid_input!(
                "Tour lengths would overflow: {} nodes with largest distance {}",
                num_nodes,
                max_cost
            ));
        }
        Ok(Self { num_nodes, costs })
    }

    /// Euclidean distances between 2-D points.
    pub fn from_points(points: &[(f64, f64)]) -> Result<Self> {
        if let Some((i, p)) = points
            .iter()
            .enumerate()
            .find(|(_, p)| !p.0.is_finite() || !p.1.is_finite())
        {
            return Err(invalid_input!("Point {} has non-finite coordinates {:?}", i, p));
        }
        let matrix = points
            .iter()
            .map(|&from| {
                points
                    .iter()
                    .map(|&to| (from.0 - to.0).hypot(from.1 - to.1))
                    .collect()
            })
            .collect();
        Self::from_matrix(matrix)
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    #[inline]
    pub fn cost(&self, from: usize, to: usize) -> f64 {
        self.costs[from * self.num_nodes + to]
    }

    pub fn row(&self, from: usize) -> &[f64] {
        &self.costs[from * self.num_nodes..(from + 1) * self.num_nodes]
    }

    pub fn to_matrix(&self) -> Vec<Vec<f64>> {
        (0..self.num_nodes).map(|i| self.row(i).to_vec()).collect()
    }
}

impl TryFrom<Vec<Vec<f64>>> for DistanceModel {
    type Error = AcsError;

    fn try_from(matrix: Vec<Vec<f64>>) -> Result<Self> {
        Self::from_matrix(matrix)
    }
}

impl From<DistanceModel> for Vec<Vec<f64>> {
    fn from(model: DistanceModel) -> Self {
        model.to_matrix()
    }
}
