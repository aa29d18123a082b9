//! Breadth-first traversal.
//!
//! # Examples
//!
//! ```
//! use callmap::{visit::Bfs, Graph};
//!
//! let mut graph = Graph::new();
//!
//! for key in ["a", "b", "c", "d"] {
//!     graph.add_vertex(key, ()).unwrap();
//! }
//!
//! graph.connect(&"a", &"b").unwrap();
//! graph.connect(&"a", &"c").unwrap();
//! graph.connect(&"b", &"d").unwrap();
//! graph.connect(&"c", &"d").unwrap();
//!
//! let order = Bfs::on(&graph).run(&"a", &mut ()).unwrap();
//!
//! assert_eq!(order.iter().collect::<Vec<_>>(), vec![&"a", &"b", &"c", &"d"]);
//! assert_eq!(order.depth(&"d"), Some(2));
//! ```

use fixedbitset::FixedBitSet;
use tracing::{debug, trace};

use crate::{
    common::{Queue, VisitSet},
    core::{VertexId, VertexKey},
    graph::Graph,
};

use super::{Control, Error, Outcome};

/// Callbacks of a breadth-first traversal.
///
/// All methods have a default implementation, so implementors override only
/// what they need. `()` implements the trait with all defaults.
///
/// `previous` is the vertex entered right before the current one (not its
/// parent), or `None` for the first vertex of the traversal.
pub trait BfsCallbacks<K> {
    /// Decides whether `next`, a neighbor of `current`, should be enqueued.
    ///
    /// It is called for every proposed neighbor, including the ones that were
    /// already seen. Unless [revisits are allowed](Bfs::allow_revisits), a
    /// neighbor is enqueued only if this returns `true` and the neighbor has
    /// not been enqueued before.
    fn allow_traversal(&mut self, previous: Option<&K>, current: &K, next: &K) -> bool {
        let _ = (previous, current, next);
        true
    }

    /// Called when `current` is taken from the queue, before its neighbors
    /// are proposed.
    fn enter_vertex(&mut self, current: &K, previous: Option<&K>) -> Control {
        let _ = (current, previous);
        Control::Continue
    }

    /// Called after all neighbors of `current` were proposed.
    fn leave_vertex(&mut self, current: &K, previous: Option<&K>) -> Control {
        let _ = (current, previous);
        Control::Continue
    }
}

impl<K> BfsCallbacks<K> for () {}

/// Builder of a breadth-first traversal. See [module](self) documentation for
/// an example.
pub struct Bfs<'g, K, V> {
    graph: &'g Graph<K, V>,
    revisits: bool,
    max_iterations: Option<usize>,
}

impl<'g, K: VertexKey, V> Bfs<'g, K, V> {
    pub fn on(graph: &'g Graph<K, V>) -> Self {
        Self {
            graph,
            revisits: false,
            max_iterations: None,
        }
    }

    /// Enqueues every neighbor for which
    /// [`allow_traversal`](BfsCallbacks::allow_traversal) returns `true`, even
    /// if it was enqueued before.
    ///
    /// Termination then depends on the callbacks, so a [maximum number of
    /// iterations](Bfs::max_iterations) must be set as well, otherwise the run
    /// fails with [`Error::UnboundedRevisit`].
    pub fn allow_revisits(self) -> Self {
        Self {
            revisits: true,
            ..self
        }
    }

    /// Stops the traversal after the given number of vertices was entered.
    /// The run then ends with [`Outcome::LimitReached`] if there was still
    /// something in the queue.
    pub fn max_iterations(self, max_iterations: usize) -> Self {
        Self {
            max_iterations: Some(max_iterations),
            ..self
        }
    }

    pub fn run<C>(&self, start: &K, callbacks: &mut C) -> Result<BfsOrder<'g, K, V>, Error<K>>
    where
        C: BfsCallbacks<K>,
    {
        if self.revisits && self.max_iterations.is_none() {
            return Err(Error::UnboundedRevisit);
        }

        let graph = self.graph;
        let start = graph
            .id(start)
            .ok_or_else(|| Error::UnknownVertex(start.clone()))?;

        debug!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            revisits = self.revisits,
            "breadth-first traversal started"
        );

        let n = graph.vertex_count();
        let mut result = BfsOrder {
            graph,
            order: Vec::new(),
            parent: vec![None; n],
            depth: vec![None; n],
            proposals: 0,
            outcome: Outcome::Completed,
        };

        let mut seen = FixedBitSet::with_capacity(n);
        let mut queue = Queue::new();
        let mut previous: Option<VertexId> = None;

        seen.visit(start);
        result.depth[start.as_usize()] = Some(0);
        queue.enqueue(start);

        while !queue.is_empty() {
            if self.max_iterations == Some(result.order.len()) {
                result.outcome = Outcome::LimitReached;
                break;
            }

            let current = queue.dequeue()?;
            result.order.push(current);

            let current_key = graph.key_unchecked(current);
            let previous_key = previous.map(|id| graph.key_unchecked(id));
            trace!(vertex = ?current_key, "enter vertex");

            if callbacks.enter_vertex(current_key, previous_key).is_break() {
                result.outcome = Outcome::Cancelled;
                break;
            }

            for neighbor in graph.neighbor_ids(current) {
                let next = neighbor.id;
                result.proposals += 1;

                if !callbacks.allow_traversal(previous_key, current_key, graph.key_unchecked(next))
                {
                    continue;
                }

                if self.revisits || seen.visit(next) {
                    // The first vertex to enqueue a neighbor is its parent in
                    // the BFS tree.
                    if result.depth[next.as_usize()].is_none() {
                        result.depth[next.as_usize()] =
                            result.depth[current.as_usize()].map(|d| d + 1);
                        result.parent[next.as_usize()] = Some(current);
                    }

                    queue.enqueue(next);
                }
            }

            if callbacks.leave_vertex(current_key, previous_key).is_break() {
                result.outcome = Outcome::Cancelled;
                break;
            }

            previous = Some(current);
        }

        debug!(
            entered = result.order.len(),
            proposals = result.proposals,
            outcome = ?result.outcome,
            "breadth-first traversal finished"
        );

        Ok(result)
    }
}

/// The result of a breadth-first traversal.
///
/// Holds the sequence of entered vertices together with the BFS tree (parent
/// and hop depth of every enqueued vertex).
#[derive(Debug)]
pub struct BfsOrder<'g, K, V> {
    graph: &'g Graph<K, V>,
    order: Vec<VertexId>,
    parent: Vec<Option<VertexId>>,
    depth: Vec<Option<usize>>,
    proposals: usize,
    outcome: Outcome,
}

impl<'g, K: VertexKey, V> BfsOrder<'g, K, V> {
    /// Entered vertices in the order of entering.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &'g K> + '_ {
        let graph = self.graph;
        self.order.iter().map(move |id| graph.key_unchecked(*id))
    }

    pub fn to_vec(&self) -> Vec<K> {
        self.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns the vertex which first enqueued the given vertex.
    pub fn parent(&self, key: &K) -> Option<&'g K> {
        let id = self.graph.id(key)?;
        let parent = self.parent[id.as_usize()]?;
        Some(self.graph.key_unchecked(parent))
    }

    /// Returns the hop distance from the start along the BFS tree, or `None`
    /// if the vertex was never enqueued.
    pub fn depth(&self, key: &K) -> Option<usize> {
        let id = self.graph.id(key)?;
        self.depth[id.as_usize()]
    }

    /// The number of neighbors proposed to
    /// [`allow_traversal`](BfsCallbacks::allow_traversal).
    pub fn proposals(&self) -> usize {
        self.proposals
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }
}
