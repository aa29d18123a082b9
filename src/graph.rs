//! Keyed vertex/edge store with a deterministic neighbor index.
//!
//! The [`Graph`] is the input of every traversal and layout in this crate. It
//! owns the vertices (a unique key and an opaque payload each) and the edges in
//! the order they were added. For each vertex it maintains the list of
//! neighbors in **edge-insertion order**, which is what makes traversal results
//! reproducible across runs given the same construction sequence.
//!
//! Edges never create vertices implicitly. Both endpoints must be added first,
//! so that malformed input data is caught at the call that introduced it.
//!
//! # Examples
//!
//! ```
//! use callmap::Graph;
//!
//! let mut graph = Graph::new();
//!
//! graph.add_vertex("main", ()).unwrap();
//! graph.add_vertex("parse", ()).unwrap();
//! graph.add_vertex("eval", ()).unwrap();
//!
//! graph.connect(&"main", &"parse").unwrap();
//! graph.connect(&"main", &"eval").unwrap();
//!
//! let callees = graph.neighbors(&"main").unwrap().collect::<Vec<_>>();
//! assert_eq!(callees, vec![&"parse", &"eval"]);
//! ```

use std::{fmt, iter::FusedIterator, slice::Iter};

use rustc_hash::FxHashMap;

use crate::core::{
    AddEdgeError, AddEdgeErrorKind, DuplicateKeyError, EdgeId, UnknownVertexError, VertexId,
    VertexKey,
};

/// The weight of an edge for which none was specified.
pub const DEFAULT_WEIGHT: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
struct Vertex<K, V> {
    key: K,
    payload: V,
    neighbors: Vec<Neighbor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Neighbor {
    pub id: VertexId,
    pub edge: EdgeId,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Edge {
    source: VertexId,
    target: VertexId,
    weight: f64,
    directed: bool,
}

/// Borrowed view of an edge stored in a [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeRef<'a, K> {
    pub id: EdgeId,
    pub source: &'a K,
    pub target: &'a K,
    pub weight: f64,
    pub directed: bool,
}

#[derive(Debug, Clone)]
pub struct Graph<K, V = ()> {
    vertices: Vec<Vertex<K, V>>,
    lookup: FxHashMap<K, VertexId>,
    edges: Vec<Edge>,
    directed_count: usize,
}

impl<K: VertexKey, V> Graph<K, V> {
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    pub fn with_capacity(vertex_count: usize, edge_count: usize) -> Self {
        let mut lookup = FxHashMap::default();
        lookup.reserve(vertex_count);

        Self {
            vertices: Vec::with_capacity(vertex_count),
            lookup,
            edges: Vec::with_capacity(edge_count),
            directed_count: 0,
        }
    }

    /// Adds a vertex with given key and payload.
    ///
    /// Fails if a vertex with the same key already exists. The graph is left
    /// untouched in that case and the payload is returned in the error.
    pub fn add_vertex(&mut self, key: K, payload: V) -> Result<VertexId, DuplicateKeyError<K, V>> {
        if self.lookup.contains_key(&key) {
            return Err(DuplicateKeyError::new(key, payload));
        }

        let id = VertexId::from_usize(self.vertices.len());
        self.lookup.insert(key.clone(), id);
        self.vertices.push(Vertex {
            key,
            payload,
            neighbors: Vec::new(),
        });

        Ok(id)
    }

    /// Adds an edge between two existing vertices.
    ///
    /// A directed edge appears only in the neighbors of `source`. An
    /// undirected edge appears in the neighbors of both endpoints (once for a
    /// self-loop).
    pub fn add_edge(
        &mut self,
        source: &K,
        target: &K,
        weight: f64,
        directed: bool,
    ) -> Result<EdgeId, AddEdgeError<K>> {
        let src = self
            .id(source)
            .ok_or_else(|| AddEdgeError::new(source.clone(), AddEdgeErrorKind::SourceAbsent))?;
        let dst = self
            .id(target)
            .ok_or_else(|| AddEdgeError::new(target.clone(), AddEdgeErrorKind::TargetAbsent))?;

        let edge = EdgeId::from_usize(self.edges.len());
        self.edges.push(Edge {
            source: src,
            target: dst,
            weight,
            directed,
        });

        self.vertices[src.as_usize()]
            .neighbors
            .push(Neighbor { id: dst, edge });

        if directed {
            self.directed_count += 1;
        } else if src != dst {
            self.vertices[dst.as_usize()]
                .neighbors
                .push(Neighbor { id: src, edge });
        }

        Ok(edge)
    }

    /// Adds a directed edge of [default weight](DEFAULT_WEIGHT).
    pub fn connect(&mut self, source: &K, target: &K) -> Result<EdgeId, AddEdgeError<K>> {
        self.add_edge(source, target, DEFAULT_WEIGHT, true)
    }

    /// Returns the neighbors of the vertex in edge-insertion order.
    pub fn neighbors(&self, key: &K) -> Result<NeighborsIter<'_, K, V>, UnknownVertexError<K>> {
        let id = self
            .id(key)
            .ok_or_else(|| UnknownVertexError(key.clone()))?;

        Ok(NeighborsIter {
            graph: self,
            inner: self.neighbor_ids(id).iter(),
        })
    }

    pub fn has_vertex(&self, key: &K) -> bool {
        self.lookup.contains_key(key)
    }

    /// Returns the payload of the vertex, if it exists.
    pub fn vertex(&self, key: &K) -> Option<&V> {
        self.id(key).map(|id| &self.vertices[id.as_usize()].payload)
    }

    pub fn vertex_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.id(key)?;
        Some(&mut self.vertices[id.as_usize()].payload)
    }

    /// Returns the weight of the first edge (in insertion order) going from
    /// `source` to `target`. Undirected edges match in both orientations.
    pub fn edge_weight(&self, source: &K, target: &K) -> Option<f64> {
        let src = self.id(source)?;
        let dst = self.id(target)?;

        self.neighbor_ids(src)
            .iter()
            .find(|n| n.id == dst)
            .map(|n| self.weight_unchecked(n.edge))
    }

    pub fn id(&self, key: &K) -> Option<VertexId> {
        self.lookup.get(key).copied()
    }

    pub fn key(&self, id: VertexId) -> Option<&K> {
        self.vertices.get(id.as_usize()).map(|vertex| &vertex.key)
    }

    /// Vertex keys in the order of insertion.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &K> + '_ {
        self.vertices.iter().map(|vertex| &vertex.key)
    }

    /// Edges in the order of insertion.
    pub fn edges(&self) -> impl ExactSizeIterator<Item = EdgeRef<'_, K>> + '_ {
        self.edges.iter().enumerate().map(|(i, edge)| EdgeRef {
            id: EdgeId::from_usize(i),
            source: &self.vertices[edge.source.as_usize()].key,
            target: &self.vertices[edge.target.as_usize()].key,
            weight: edge.weight,
            directed: edge.directed,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns `true` if at least one edge in the graph is directed.
    pub fn is_directed(&self) -> bool {
        self.directed_count > 0
    }

    pub(crate) fn neighbor_ids(&self, id: VertexId) -> &[Neighbor] {
        &self.vertices[id.as_usize()].neighbors
    }

    pub(crate) fn key_unchecked(&self, id: VertexId) -> &K {
        &self.vertices[id.as_usize()].key
    }

    pub(crate) fn weight_unchecked(&self, edge: EdgeId) -> f64 {
        self.edges[edge.as_usize()].weight
    }
}

impl<K: VertexKey, V> Default for Graph<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over neighbor keys returned from [`Graph::neighbors`].
pub struct NeighborsIter<'a, K, V> {
    graph: &'a Graph<K, V>,
    inner: Iter<'a, Neighbor>,
}

impl<'a, K: VertexKey, V> Iterator for NeighborsIter<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|n| self.graph.key_unchecked(n.id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K: VertexKey, V> ExactSizeIterator for NeighborsIter<'_, K, V> {}

impl<K: VertexKey, V> FusedIterator for NeighborsIter<'_, K, V> {}

// Lists the remaining neighbors without requiring the payload to be `Debug`.
impl<K: VertexKey, V> fmt::Debug for NeighborsIter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let graph = self.graph;
        f.debug_list()
            .entries(self.inner.clone().map(|n| graph.key_unchecked(n.id)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn add_vertex_duplicate() {
        let mut graph = Graph::new();

        graph.add_vertex("a", 1).unwrap();
        let error = graph.add_vertex("a", 2).unwrap_err();

        assert_eq!(error, DuplicateKeyError::new("a", 2));
        assert_eq!(graph.vertex_count(), 1);
        assert_eq!(graph.vertex(&"a"), Some(&1));
    }

    #[test]
    fn add_edge_unknown_endpoint() {
        let mut graph = Graph::<_, ()>::new();
        graph.add_vertex("a", ()).unwrap();

        assert_matches!(
            graph.add_edge(&"x", &"a", 1.0, true),
            Err(AddEdgeError { key: "x", kind: AddEdgeErrorKind::SourceAbsent })
        );
        assert_matches!(
            graph.connect(&"a", &"y"),
            Err(AddEdgeError { key: "y", kind: AddEdgeErrorKind::TargetAbsent })
        );

        // Nothing was created implicitly.
        assert_eq!(graph.vertex_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn neighbors_unknown_vertex() {
        let graph = Graph::<&str, ()>::new();
        assert_matches!(graph.neighbors(&"a"), Err(UnknownVertexError("a")));
    }

    #[test]
    fn neighbors_debug_lists_remaining() {
        struct Opaque;

        let mut graph = Graph::new();

        for key in ["a", "b", "c"] {
            assert!(graph.add_vertex(key, Opaque).is_ok());
        }

        graph.connect(&"a", &"b").unwrap();
        graph.connect(&"a", &"c").unwrap();

        let mut neighbors = graph.neighbors(&"a").unwrap();
        assert_eq!(format!("{neighbors:?}"), r#"["b", "c"]"#);

        neighbors.next();
        assert_eq!(format!("{neighbors:?}"), r#"["c"]"#);
    }

    #[test]
    fn neighbors_insertion_order() {
        let mut graph = Graph::new();

        for key in ["a", "b", "c", "d"] {
            graph.add_vertex(key, ()).unwrap();
        }

        graph.connect(&"a", &"d").unwrap();
        graph.connect(&"a", &"b").unwrap();
        graph.connect(&"a", &"c").unwrap();
        graph.connect(&"b", &"a").unwrap();

        let neighbors = graph.neighbors(&"a").unwrap().collect::<Vec<_>>();
        assert_eq!(neighbors, vec![&"d", &"b", &"c"]);

        assert_eq!(graph.neighbors(&"b").unwrap().len(), 1);
        assert_eq!(graph.neighbors(&"d").unwrap().len(), 0);
    }

    #[test]
    fn neighbors_undirected_both_endpoints() {
        let mut graph = Graph::new();

        for key in [1, 2, 3] {
            graph.add_vertex(key, ()).unwrap();
        }

        graph.add_edge(&1, &2, 1.0, false).unwrap();
        graph.add_edge(&3, &2, 1.0, false).unwrap();
        graph.add_edge(&2, &2, 1.0, false).unwrap();

        assert_eq!(graph.neighbors(&1).unwrap().collect::<Vec<_>>(), vec![&2]);
        assert_eq!(
            graph.neighbors(&2).unwrap().collect::<Vec<_>>(),
            vec![&1, &3, &2]
        );
        assert_eq!(graph.neighbors(&3).unwrap().collect::<Vec<_>>(), vec![&2]);
        assert!(!graph.is_directed());
    }

    #[test]
    fn edge_weight_lookup() {
        let mut graph = Graph::new();

        for key in ["a", "b", "c"] {
            graph.add_vertex(key, ()).unwrap();
        }

        graph.add_edge(&"a", &"b", 3.5, true).unwrap();
        graph.add_edge(&"c", &"b", 2.0, false).unwrap();

        assert_eq!(graph.edge_weight(&"a", &"b"), Some(3.5));
        assert_eq!(graph.edge_weight(&"b", &"a"), None);
        assert_eq!(graph.edge_weight(&"b", &"c"), Some(2.0));
        assert_eq!(graph.edge_weight(&"a", &"z"), None);
        assert!(graph.is_directed());
    }

    #[test]
    fn edges_insertion_order() {
        let mut graph = Graph::new();

        for key in ["a", "b", "c"] {
            graph.add_vertex(key, ()).unwrap();
        }

        graph.connect(&"b", &"c").unwrap();
        graph.add_edge(&"a", &"b", 4.0, false).unwrap();

        let edges = graph
            .edges()
            .map(|edge| (*edge.source, *edge.target, edge.weight, edge.directed))
            .collect::<Vec<_>>();

        assert_eq!(
            edges,
            vec![("b", "c", DEFAULT_WEIGHT, true), ("a", "b", 4.0, false)]
        );
    }

    #[test]
    fn keys_and_ids() {
        let mut graph = Graph::new();

        let a = graph.add_vertex("a".to_string(), ()).unwrap();
        let b = graph.add_vertex("b".to_string(), ()).unwrap();

        assert_eq!(graph.id(&"b".to_string()), Some(b));
        assert_eq!(graph.key(a), Some(&"a".to_string()));
        assert_eq!(
            graph.keys().cloned().collect::<Vec<_>>(),
            vec!["a".to_string(), "b".to_string()]
        );
        assert!(graph.has_vertex(&"a".to_string()));
        assert!(!graph.has_vertex(&"c".to_string()));
    }
}
