//! Breadth-first and depth-first traversal driven by callbacks.
//!
//! Both traversals are **iterative**, that is, they don't use recursion. Call
//! graphs coming from real profiling data can be thousands of frames deep and
//! the traversal must not be limited by the size of the program stack.
//!
//! A traversal is configured with a builder ([`Bfs::on`], [`Dfs::on`]) and run
//! with a set of callbacks ([`BfsCallbacks`], [`DfsCallbacks`]). The callbacks
//! own whatever state they need; the engine owns only the per-call traversal
//! state ([`VisitState`] for DFS, [`BfsOrder`] for BFS), which is created
//! fresh for every run and handed to the caller when the run ends.
//!
//! Every callback that can observe progress returns [`Control`]. Returning
//! [`Control::Break`] stops the traversal right away; the run then ends with
//! [`Outcome::Cancelled`] instead of an error.
//!
//! Neighbors of a vertex are always explored in the order in which the edges
//! were added to the [`Graph`](crate::Graph).

pub mod bfs;
pub mod dfs;

#[doc(inline)]
pub use self::{
    bfs::{Bfs, BfsCallbacks, BfsOrder},
    dfs::{Dfs, DfsCallbacks, EdgeClass},
};

use std::fmt;

use fixedbitset::FixedBitSet;
use thiserror::Error;

use crate::{
    common::{EmptyQueueError, VisitSet},
    core::{VertexId, VertexKey},
    graph::Graph,
};

/// Strictly monotonically increasing numbering of traversal events.
///
/// The first event of a traversal happens at time 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(pub usize);

impl Time {
    /// The largest possible value of time.
    pub const MAX: Time = Time(usize::MAX);
}

/// Decision of a callback whether the traversal should go on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Control {
    #[default]
    Continue,
    Break,
}

impl Control {
    pub fn is_break(&self) -> bool {
        matches!(self, Control::Break)
    }
}

/// How a traversal run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Everything reachable (and allowed) was visited.
    Completed,

    /// A callback returned [`Control::Break`].
    Cancelled,

    /// The configured maximum number of iterations was reached.
    LimitReached,
}

/// The error encountered during a traversal run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error<K: fmt::Debug> {
    /// The start vertex is not in the graph.
    #[error("vertex with key {0:?} does not exist")]
    UnknownVertex(K),

    /// Revisits were allowed without a bound on the number of iterations.
    #[error("revisits are allowed but the maximum number of iterations is not set")]
    UnboundedRevisit,

    /// The traversal queue ran dry while it was expected to hold a vertex.
    ///
    /// This error should not happen in normal circumstances. If it does, it
    /// is a bug in the traversal loop.
    #[error("traversal queue is unexpectedly empty")]
    EmptyQueue(#[from] EmptyQueueError),
}

/// Per-call state of a depth-first traversal.
///
/// The state records which vertices were discovered and processed, their entry
/// and exit [times](Time), and the parent of each vertex in the DFS tree. It is
/// available to the callbacks by shared reference during the traversal and is
/// returned to the caller when the traversal ends.
///
/// Entry and exit times are nested: for any descendant `v` of `u` in the DFS
/// tree, `entry(u) < entry(v) < exit(v) < exit(u)`.
pub struct VisitState<'g, K, V> {
    graph: &'g Graph<K, V>,
    discovered: FixedBitSet,
    processed: FixedBitSet,
    entry: Vec<Option<Time>>,
    exit: Vec<Option<Time>>,
    parent: Vec<Option<VertexId>>,
    preorder: Vec<VertexId>,
    postorder: Vec<VertexId>,
    time: usize,
    outcome: Outcome,
}

impl<'g, K: VertexKey, V> VisitState<'g, K, V> {
    pub(crate) fn new(graph: &'g Graph<K, V>) -> Self {
        let n = graph.vertex_count();

        Self {
            graph,
            discovered: FixedBitSet::with_capacity(n),
            processed: FixedBitSet::with_capacity(n),
            entry: vec![None; n],
            exit: vec![None; n],
            parent: vec![None; n],
            preorder: Vec::new(),
            postorder: Vec::new(),
            time: 0,
            outcome: Outcome::Completed,
        }
    }

    pub fn is_discovered(&self, key: &K) -> bool {
        self.with_id(key, |id| self.discovered.is_visited(id))
            .unwrap_or(false)
    }

    pub fn is_processed(&self, key: &K) -> bool {
        self.with_id(key, |id| self.processed.is_visited(id))
            .unwrap_or(false)
    }

    pub fn entry_time(&self, key: &K) -> Option<Time> {
        self.with_id(key, |id| self.entry[id.as_usize()]).flatten()
    }

    pub fn exit_time(&self, key: &K) -> Option<Time> {
        self.with_id(key, |id| self.exit[id.as_usize()]).flatten()
    }

    /// Returns the parent of the vertex in the DFS tree. Roots have no parent.
    pub fn parent(&self, key: &K) -> Option<&'g K> {
        let parent = self.with_id(key, |id| self.parent[id.as_usize()]).flatten()?;
        Some(self.graph.key_unchecked(parent))
    }

    /// Returns `true` if `descendant` was discovered while `ancestor` was open,
    /// which by the parenthesis property means it lies in the subtree of
    /// `ancestor`. A vertex is not its own ancestor.
    pub fn is_ancestor(&self, ancestor: &K, descendant: &K) -> bool {
        match (self.entry_time(ancestor), self.entry_time(descendant)) {
            (Some(u), Some(v)) => {
                let close = self.exit_time(ancestor).unwrap_or(Time::MAX);
                u < v && v < close
            }
            _ => false,
        }
    }

    /// Vertices in the order of discovery (preorder).
    pub fn order(&self) -> impl ExactSizeIterator<Item = &'g K> + '_ {
        let graph = self.graph;
        self.preorder.iter().map(move |id| graph.key_unchecked(*id))
    }

    /// Vertices in the order of processing (postorder).
    pub fn post_order(&self) -> impl ExactSizeIterator<Item = &'g K> + '_ {
        let graph = self.graph;
        self.postorder.iter().map(move |id| graph.key_unchecked(*id))
    }

    pub fn discovered_count(&self) -> usize {
        self.discovered.visited_count()
    }

    /// The time of the latest event.
    pub fn time(&self) -> Time {
        Time(self.time)
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    fn with_id<R>(&self, key: &K, f: impl FnOnce(VertexId) -> R) -> Option<R> {
        self.graph.id(key).map(f)
    }

    fn tick(&mut self) -> Time {
        self.time += 1;
        Time(self.time)
    }

    pub(crate) fn discover(&mut self, id: VertexId, parent: Option<VertexId>) -> Time {
        let time = self.tick();
        self.discovered.visit(id);
        self.entry[id.as_usize()] = Some(time);
        self.parent[id.as_usize()] = parent;
        self.preorder.push(id);
        time
    }

    pub(crate) fn finish(&mut self, id: VertexId) -> Time {
        let time = self.tick();
        self.processed.visit(id);
        self.exit[id.as_usize()] = Some(time);
        self.postorder.push(id);
        time
    }

    pub(crate) fn discovered_id(&self, id: VertexId) -> bool {
        self.discovered.is_visited(id)
    }

    pub(crate) fn processed_id(&self, id: VertexId) -> bool {
        self.processed.is_visited(id)
    }

    pub(crate) fn entry_id(&self, id: VertexId) -> Option<Time> {
        self.entry[id.as_usize()]
    }

    pub(crate) fn parent_id(&self, id: VertexId) -> Option<VertexId> {
        self.parent[id.as_usize()]
    }

    pub(crate) fn set_outcome(&mut self, outcome: Outcome) {
        self.outcome = outcome;
    }
}

impl<K: VertexKey, V> fmt::Debug for VisitState<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisitState")
            .field("order", &self.order().collect::<Vec<_>>())
            .field("time", &self.time)
            .field("outcome", &self.outcome)
            .finish()
    }
}
