use proptest::{collection::vec, prelude::*};

use crate::graph::Graph;

use super::testing::create_from_pairs;

const MAX_VERTICES: usize = 32;

pub fn graph_directed() -> impl Strategy<Value = Graph<usize>> {
    graph(true, MAX_VERTICES)
}

pub fn graph_undirected() -> impl Strategy<Value = Graph<usize>> {
    graph(false, MAX_VERTICES)
}

/// Graphs with vertices `0..n` for `n` in `1..=max_vertices` and up to `2n`
/// edges, self-loops and parallel edges included.
pub fn graph(directed: bool, max_vertices: usize) -> impl Strategy<Value = Graph<usize>> {
    (1..=max_vertices.max(1))
        .prop_flat_map(|n| (Just(n), vec((0..n, 0..n), 0..=2 * n)))
        .prop_map(move |(n, pairs)| create_from_pairs(n, pairs, directed))
}

/// Weight grids of `n × n` for `n` in `0..=max_size`.
pub fn weight_grid(max_size: usize) -> impl Strategy<Value = Vec<Vec<f64>>> {
    (0..=max_size).prop_flat_map(|n| vec(vec(0.0..1000.0f64, n), n))
}
