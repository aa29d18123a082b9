use crate::graph::{Graph, DEFAULT_WEIGHT};

/// Path `0 -> 1 -> ... -> n - 1`.
pub fn create_path(vertex_count: usize, directed: bool) -> Graph<usize> {
    let mut graph = Graph::with_capacity(vertex_count, vertex_count.saturating_sub(1));

    for key in 0..vertex_count {
        let _ = graph.add_vertex(key, ());
    }

    for key in 1..vertex_count {
        let _ = graph.add_edge(&(key - 1), &key, DEFAULT_WEIGHT, directed);
    }

    graph
}

/// Builds a graph with vertices `0..vertex_count` from `(source, target)`
/// pairs. Pairs referencing a missing vertex are skipped.
pub fn create_from_pairs<I>(vertex_count: usize, pairs: I, directed: bool) -> Graph<usize>
where
    I: IntoIterator<Item = (usize, usize)>,
{
    let mut graph = Graph::with_capacity(vertex_count, 0);

    for key in 0..vertex_count {
        let _ = graph.add_vertex(key, ());
    }

    for (source, target) in pairs {
        let _ = graph.add_edge(&source, &target, DEFAULT_WEIGHT, directed);
    }

    graph
}
