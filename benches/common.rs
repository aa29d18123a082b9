#![allow(dead_code)]

use callmap::{graph::DEFAULT_WEIGHT, Graph};
use fastrand::Rng;

pub const RANDOM_SEED: u64 = 0xef6f79ed30ba75a;

/// Erdős–Rényi edge generator skipping over absent pairs geometrically, so the
/// cost is proportional to the number of generated edges.
pub struct RandomEdges {
    v: usize,
    w: usize,
    n: usize,
    p: f32,
}

impl RandomEdges {
    pub fn new(vertex_count: usize, p: f32) -> Self {
        Self {
            v: 1,
            w: usize::MAX,
            n: vertex_count,
            p,
        }
    }

    pub fn next_edge(&mut self, rng: &mut Rng) -> Option<(usize, usize)> {
        let Self { v, w, n, p } = self;

        if *v >= *n {
            return None;
        }

        let r = rng.f32();
        *w = w.wrapping_add(1) + ((1.0 - r).log10() / (1.0 - *p).log10()).floor() as usize;

        while *w >= *v && *v < *n {
            *w -= *v;
            *v += 1;
        }

        if *v < *n { Some((*v, *w)) } else { None }
    }
}

/// Random call graph with vertices `0..vertex_count`. Each generated pair is
/// oriented randomly when directed.
pub fn random_graph(vertex_count: usize, density: f32, directed: bool, rng: &mut Rng) -> Graph<usize> {
    let mut graph = Graph::with_capacity(vertex_count, vertex_count);

    for key in 0..vertex_count {
        graph.add_vertex(key, ()).unwrap();
    }

    let mut edges = RandomEdges::new(vertex_count, density);

    while let Some((u, v)) = edges.next_edge(rng) {
        let (u, v) = if directed && rng.bool() { (v, u) } else { (u, v) };
        graph.add_edge(&u, &v, DEFAULT_WEIGHT, directed).unwrap();
    }

    graph
}
