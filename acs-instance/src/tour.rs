use crate::{
    error::{invalid_tour, Result},
    DistanceModel,
};
use serde::Serialize;

/// A closed cycle over every node of a [`DistanceModel`].
///
/// `order` holds the visiting sequence only; the edge from the last node back
/// to the first is implicit and is produced by [`closed_edges`].
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Tour {
    order: Vec<usize>,
    length: f64,
}

impl Tour {
    pub fn new(order: Vec<usize>, distances: &DistanceModel) -> Result<Self> {
        check_permutation(&order, distances.num_nodes())?;
        let length = closed_edges(&order)
            .map(|(from, to)| distances.cost(from, to))
            .sum();
        Ok(Self { order, length })
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        closed_edges(&self.order)
    }

    pub fn into_order(self) -> Vec<usize> {
        self.order
    }
}

/// Every directed edge of the cycle described by `order`, closing edge last.
pub fn closed_edges(order: &[usize]) -> impl Iterator<Item = (usize, usize)> + '_ {
    order
        .iter()
        .zip(order.iter().cycle().skip(1))
        .map(|(&from, &to)| (from, to))
}

pub fn check_permutation(order: &[usize], num_nodes: usize) -> Result<()> {
    if order.len() != num_nodes {
        return Err(invalid_tour!(
            "Route length ({}) does not match number of nodes ({})",
            order.len(),
            num_nodes
        ));
    }
    let mut seen = vec![false; num_nodes];
    for &node in order {
        if node >= num_nodes {
            return Err(invalid_tour!("Route contains invalid node {}", node));
        }
        if seen[node] {
            return Err(invalid_tour!("Route contains duplicate node {}", node));
        }
        seen[node] = true;
    }
    Ok(())
}
