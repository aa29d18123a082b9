//! Depth-first traversal with entry/exit timestamps.
//!
//! The traversal keeps an explicit stack of frames (a vertex plus a cursor into
//! its neighbor list) instead of recursing, so the depth of the explored graph
//! is limited only by the available heap memory. The order of events is exactly
//! the one of the classic recursive formulation:
//!
//! 1. On discovery of `u`: entry time is stamped and
//!    [`process_vertex_early`](DfsCallbacks::process_vertex_early) is called.
//! 2. For each neighbor `v` of `u` in edge-insertion order:
//!    * if `v` is undiscovered and [allowed](DfsCallbacks::allow_traversal),
//!      the edge is reported as [tree edge](EdgeClass::Tree) and the traversal
//!      descends into `v`,
//!    * else if `v` is not processed yet or the traversal is directed, the edge
//!      is reported with its [class](EdgeClass).
//! 3. After all neighbors: [`process_vertex_late`](DfsCallbacks::process_vertex_late)
//!    is called and exit time is stamped.
//!
//! # Examples
//!
//! ```
//! use callmap::{visit::Dfs, Graph};
//!
//! let mut graph = Graph::new();
//!
//! for key in ["a", "b", "c"] {
//!     graph.add_vertex(key, ()).unwrap();
//! }
//!
//! graph.connect(&"a", &"b").unwrap();
//! graph.connect(&"b", &"c").unwrap();
//!
//! let state = Dfs::on(&graph).run(&"a", &mut ()).unwrap();
//!
//! assert!(state.entry_time(&"a") < state.entry_time(&"c"));
//! assert!(state.exit_time(&"c") < state.exit_time(&"a"));
//! assert!(state.is_ancestor(&"a", &"c"));
//! ```

use tracing::{debug, trace};

use crate::{
    core::{EdgeId, VertexId, VertexKey},
    graph::Graph,
};

use super::{Control, Error, Outcome, VisitState};

/// Classification of an edge `(u, v)` reported during depth-first traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeClass {
    /// The edge through which `v` was discovered.
    Tree,

    /// `v` is an ancestor of `u` that is still open.
    ///
    /// Presence of a back edge indicates a cycle in the graph.
    Back,

    /// `v` is an already processed descendant of `u`. Directed graphs only.
    Forward,

    /// `v` is already processed and lies in a different branch of the
    /// traversal tree. Directed graphs only.
    Cross,
}

/// Callbacks of a depth-first traversal.
///
/// All methods have a default implementation, so implementors override only
/// what they need. `()` implements the trait with all defaults.
///
/// The callbacks get shared access to the [`VisitState`] built so far, which
/// allows them, for example, to compare entry times.
pub trait DfsCallbacks<K, V> {
    /// Decides whether the traversal may descend from `current` into the
    /// undiscovered neighbor `next`. `parent` is the parent of `current` in
    /// the DFS tree.
    fn allow_traversal(&mut self, parent: Option<&K>, current: &K, next: &K) -> bool {
        let _ = (parent, current, next);
        true
    }

    /// Called when the vertex is discovered, right after its entry time is
    /// stamped.
    fn process_vertex_early(&mut self, vertex: &K, state: &VisitState<'_, K, V>) -> Control {
        let _ = (vertex, state);
        Control::Continue
    }

    /// Called when all neighbors of the vertex were explored, right before its
    /// exit time is stamped.
    fn process_vertex_late(&mut self, vertex: &K, state: &VisitState<'_, K, V>) -> Control {
        let _ = (vertex, state);
        Control::Continue
    }

    /// Called for every explored edge, see [module](self) documentation for
    /// which edges are reported.
    fn process_edge(
        &mut self,
        from: &K,
        to: &K,
        class: EdgeClass,
        state: &VisitState<'_, K, V>,
    ) -> Control {
        let _ = (from, to, class, state);
        Control::Continue
    }
}

impl<K, V> DfsCallbacks<K, V> for () {}

struct Frame {
    vertex: VertexId,
    // Edge through which the vertex was discovered.
    via: Option<EdgeId>,
    cursor: usize,
}

/// Builder of a depth-first traversal. See [module](self) documentation for
/// an example.
pub struct Dfs<'g, K, V> {
    graph: &'g Graph<K, V>,
    directed: bool,
}

impl<'g, K: VertexKey, V> Dfs<'g, K, V> {
    /// Creates the builder. The traversal is directed if the graph contains at
    /// least one directed edge.
    pub fn on(graph: &'g Graph<K, V>) -> Self {
        Self {
            graph,
            directed: graph.is_directed(),
        }
    }

    /// Sets whether edges are interpreted as directed for the purpose of edge
    /// reporting and classification.
    ///
    /// In undirected traversal, the tree edge is not reported a second time
    /// from the child back to its parent, and edges to processed vertices are
    /// not reported at all (they were already reported from the other side).
    pub fn directed(self, directed: bool) -> Self {
        Self { directed, ..self }
    }

    /// Runs the traversal from a single start vertex.
    pub fn run<C>(&self, start: &K, callbacks: &mut C) -> Result<VisitState<'g, K, V>, Error<K>>
    where
        C: DfsCallbacks<K, V>,
    {
        let root = self
            .graph
            .id(start)
            .ok_or_else(|| Error::UnknownVertex(start.clone()))?;

        debug!(
            vertices = self.graph.vertex_count(),
            edges = self.graph.edge_count(),
            directed = self.directed,
            "depth-first traversal started"
        );

        let mut state = VisitState::new(self.graph);
        let mut stack = Vec::new();
        if self.walk(root, &mut state, &mut stack, callbacks).is_break() {
            state.set_outcome(Outcome::Cancelled);
        }

        self.finished(&state);
        Ok(state)
    }

    /// Runs the traversal from every vertex not discovered yet, in the order of
    /// insertion into the graph. The result is a DFS forest sharing a single
    /// clock.
    pub fn run_all<C>(&self, callbacks: &mut C) -> VisitState<'g, K, V>
    where
        C: DfsCallbacks<K, V>,
    {
        debug!(
            vertices = self.graph.vertex_count(),
            edges = self.graph.edge_count(),
            directed = self.directed,
            "depth-first traversal of all vertices started"
        );

        let mut state = VisitState::new(self.graph);
        let mut stack = Vec::new();

        for root in (0..self.graph.vertex_count()).map(VertexId::from_usize) {
            if state.discovered_id(root) {
                continue;
            }

            if self.walk(root, &mut state, &mut stack, callbacks).is_break() {
                state.set_outcome(Outcome::Cancelled);
                break;
            }
        }

        self.finished(&state);
        state
    }

    fn walk<C>(
        &self,
        root: VertexId,
        state: &mut VisitState<'g, K, V>,
        stack: &mut Vec<Frame>,
        callbacks: &mut C,
    ) -> Control
    where
        C: DfsCallbacks<K, V>,
    {
        let graph = self.graph;

        stack.clear();
        if self.open(root, None, state, callbacks).is_break() {
            return Control::Break;
        }
        stack.push(Frame {
            vertex: root,
            via: None,
            cursor: 0,
        });

        while let Some(frame) = stack.last_mut() {
            let u = frame.vertex;
            let neighbors = graph.neighbor_ids(u);

            let Some(neighbor) = neighbors.get(frame.cursor).copied() else {
                // All neighbors exhausted.
                stack.pop();

                let key = graph.key_unchecked(u);
                let control = callbacks.process_vertex_late(key, state);

                // The vertex whose late hook asked to stop is still closed.
                state.finish(u);
                trace!(vertex = ?key, "vertex processed");

                if control.is_break() {
                    return Control::Break;
                }

                continue;
            };

            frame.cursor += 1;
            let via = frame.via;
            let v = neighbor.id;

            let from = graph.key_unchecked(u);
            let to = graph.key_unchecked(v);

            if !state.discovered_id(v) {
                let parent = state.parent_id(u).map(|p| graph.key_unchecked(p));
                if !callbacks.allow_traversal(parent, from, to) {
                    continue;
                }

                if callbacks
                    .process_edge(from, to, EdgeClass::Tree, state)
                    .is_break()
                {
                    return Control::Break;
                }

                if self.open(v, Some(u), state, callbacks).is_break() {
                    return Control::Break;
                }

                stack.push(Frame {
                    vertex: v,
                    via: Some(neighbor.edge),
                    cursor: 0,
                });
            } else if !state.processed_id(v) || self.directed {
                // In undirected traversal, the tree edge shows up again in the
                // neighbors of the child.
                if !self.directed && via == Some(neighbor.edge) {
                    continue;
                }

                let class = self.classify(u, v, state);
                if callbacks.process_edge(from, to, class, state).is_break() {
                    return Control::Break;
                }
            }
        }

        Control::Continue
    }

    fn open<C>(
        &self,
        vertex: VertexId,
        parent: Option<VertexId>,
        state: &mut VisitState<'g, K, V>,
        callbacks: &mut C,
    ) -> Control
    where
        C: DfsCallbacks<K, V>,
    {
        state.discover(vertex, parent);

        let key = self.graph.key_unchecked(vertex);
        trace!(vertex = ?key, "vertex discovered");

        callbacks.process_vertex_early(key, state)
    }

    fn classify(&self, u: VertexId, v: VertexId, state: &VisitState<'g, K, V>) -> EdgeClass {
        if !state.processed_id(v) {
            EdgeClass::Back
        } else if state.entry_id(u) < state.entry_id(v) {
            EdgeClass::Forward
        } else {
            EdgeClass::Cross
        }
    }

    fn finished(&self, state: &VisitState<'g, K, V>) {
        debug!(
            discovered = state.discovered_count(),
            time = state.time().0,
            outcome = ?state.outcome(),
            "depth-first traversal finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    use crate::{
        infra::{
            proptest::{graph_directed, graph_undirected},
            testing::create_path,
        },
        visit::Time,
    };

    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl<V> DfsCallbacks<&'static str, V> for Recorder {
        fn process_vertex_early(
            &mut self,
            vertex: &&'static str,
            _state: &VisitState<'_, &'static str, V>,
        ) -> Control {
            self.events.push(format!("early {vertex}"));
            Control::Continue
        }

        fn process_vertex_late(
            &mut self,
            vertex: &&'static str,
            _state: &VisitState<'_, &'static str, V>,
        ) -> Control {
            self.events.push(format!("late {vertex}"));
            Control::Continue
        }

        fn process_edge(
            &mut self,
            from: &&'static str,
            to: &&'static str,
            class: EdgeClass,
            _state: &VisitState<'_, &'static str, V>,
        ) -> Control {
            self.events.push(format!("{class:?} {from}{to}"));
            Control::Continue
        }
    }

    fn graph_from(
        keys: &[&'static str],
        edges: &[(&'static str, &'static str)],
        directed: bool,
    ) -> Graph<&'static str> {
        let mut graph = Graph::new();

        for key in keys {
            graph.add_vertex(*key, ()).unwrap();
        }

        for (u, v) in edges {
            graph.add_edge(u, v, 1.0, directed).unwrap();
        }

        graph
    }

    #[test]
    fn path_nesting() {
        let graph = graph_from(&["A", "B", "C"], &[("A", "B"), ("B", "C")], true);
        let state = Dfs::on(&graph).run(&"A", &mut ()).unwrap();

        let entry = |k| state.entry_time(&k).unwrap();
        let exit = |k| state.exit_time(&k).unwrap();

        assert!(entry("A") < entry("B"));
        assert!(entry("B") < entry("C"));
        assert!(entry("C") < exit("C"));
        assert!(exit("C") < exit("B"));
        assert!(exit("B") < exit("A"));

        assert_eq!(entry("A"), Time(1));
        assert_eq!(exit("A"), Time(6));
        assert_eq!(state.outcome(), Outcome::Completed);
    }

    #[test]
    fn early_and_late_are_distinct() {
        let graph = graph_from(&["A", "B", "C"], &[("A", "B"), ("A", "C")], true);
        let mut recorder = Recorder::default();

        Dfs::on(&graph).run(&"A", &mut recorder).unwrap();

        assert_eq!(
            recorder.events,
            vec![
                "early A", "Tree AB", "early B", "late B", "Tree AC", "early C", "late C",
                "late A",
            ]
        );
    }

    #[test]
    fn directed_edge_classes() {
        // A -> B -> C -> A (back), A -> C (forward), D -> C (cross, from the
        // second tree).
        let graph = graph_from(
            &["A", "B", "C", "D"],
            &[("A", "B"), ("B", "C"), ("C", "A"), ("A", "C"), ("D", "C")],
            true,
        );
        let mut recorder = Recorder::default();

        let state = Dfs::on(&graph).run_all(&mut recorder);

        assert_eq!(
            recorder.events,
            vec![
                "early A", "Tree AB", "early B", "Tree BC", "early C", "Back CA", "late C",
                "late B", "Forward AC", "late A", "early D", "Cross DC", "late D",
            ]
        );
        assert_eq!(state.parent(&"D"), None);
        assert_eq!(state.parent(&"C"), Some(&"B"));
    }

    #[test]
    fn undirected_skips_parent_edge() {
        // Triangle a - b - c - a.
        let graph = graph_from(
            &["a", "b", "c"],
            &[("a", "b"), ("b", "c"), ("c", "a")],
            false,
        );
        let mut recorder = Recorder::default();

        Dfs::on(&graph).run(&"a", &mut recorder).unwrap();

        assert_eq!(
            recorder.events,
            vec![
                "early a", "Tree ab", "early b", "Tree bc", "early c", "Back ca", "late c",
                "late b", "late a",
            ]
        );
    }

    #[test]
    fn visit_once() {
        let graph = graph_from(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d"), ("d", "a")],
            true,
        );
        let mut recorder = Recorder::default();

        let state = Dfs::on(&graph).run(&"a", &mut recorder).unwrap();

        for key in ["a", "b", "c", "d"] {
            let early = format!("early {key}");
            assert_eq!(recorder.events.iter().filter(|e| **e == early).count(), 1);
            assert!(state.is_processed(&key));
        }
        assert_eq!(
            state.order().copied().collect::<Vec<_>>(),
            vec!["a", "b", "d", "c"]
        );
        assert_eq!(
            state.post_order().copied().collect::<Vec<_>>(),
            vec!["d", "b", "c", "a"]
        );
    }

    #[test]
    fn long_branch_nests_inside_root() {
        let graph = graph_from(
            &["a", "b", "c", "d", "e", "f"],
            &[("a", "b"), ("b", "c"), ("c", "d"), ("a", "e"), ("e", "f")],
            true,
        );
        let mut recorder = Recorder::default();

        let state = Dfs::on(&graph).run(&"a", &mut recorder).unwrap();

        assert_eq!(
            state.order().copied().collect::<Vec<_>>(),
            vec!["a", "b", "c", "d", "e", "f"]
        );
        assert_eq!(
            state.post_order().copied().collect::<Vec<_>>(),
            vec!["d", "c", "b", "f", "e", "a"]
        );

        let times = ["a", "b", "c", "d", "e", "f"].map(|key| {
            (state.entry_time(&key).unwrap().0, state.exit_time(&key).unwrap().0)
        });
        assert_eq!(times, [(1, 12), (2, 7), (3, 6), (4, 5), (8, 11), (9, 10)]);

        for (parent, child) in [("a", "b"), ("b", "c"), ("c", "d"), ("a", "e"), ("e", "f")] {
            assert_eq!(state.parent(&child), Some(&parent));
            assert!(state.is_ancestor(&parent, &child));
            assert!(!state.is_ancestor(&child, &parent));
        }
        assert!(!state.is_ancestor(&"b", &"f"));

        for key in ["a", "b", "c", "d", "e", "f"] {
            let early = format!("early {key}");
            assert_eq!(recorder.events.iter().filter(|e| **e == early).count(), 1);
        }
    }

    #[test]
    fn finished_short_circuits() {
        struct StopAt(&'static str, usize);

        impl<V> DfsCallbacks<&'static str, V> for StopAt {
            fn process_vertex_early(
                &mut self,
                vertex: &&'static str,
                _state: &VisitState<'_, &'static str, V>,
            ) -> Control {
                self.1 += 1;
                if *vertex == self.0 {
                    Control::Break
                } else {
                    Control::Continue
                }
            }
        }

        let graph = graph_from(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("b", "c"), ("a", "d")],
            true,
        );
        let mut stop = StopAt("b", 0);

        let state = Dfs::on(&graph).run(&"a", &mut stop).unwrap();

        assert_eq!(stop.1, 2);
        assert_eq!(state.outcome(), Outcome::Cancelled);
        assert!(state.is_discovered(&"b"));
        assert!(!state.is_discovered(&"c"));
        assert!(!state.is_discovered(&"d"));
        assert!(!state.is_processed(&"a"));
        assert_eq!(state.exit_time(&"a"), None);
    }

    #[test]
    fn late_hook_can_stop() {
        struct StopLate;

        impl<V> DfsCallbacks<&'static str, V> for StopLate {
            fn process_vertex_late(
                &mut self,
                _vertex: &&'static str,
                _state: &VisitState<'_, &'static str, V>,
            ) -> Control {
                Control::Break
            }
        }

        let graph = graph_from(&["a", "b", "c"], &[("a", "b"), ("a", "c")], true);
        let state = Dfs::on(&graph).run(&"a", &mut StopLate).unwrap();

        assert!(state.is_processed(&"b"));
        assert!(!state.is_discovered(&"c"));
        assert_eq!(state.outcome(), Outcome::Cancelled);
    }

    #[test]
    fn guard_prunes_subtree() {
        struct NoC;

        impl<V> DfsCallbacks<&'static str, V> for NoC {
            fn allow_traversal(
                &mut self,
                _parent: Option<&&'static str>,
                _current: &&'static str,
                next: &&'static str,
            ) -> bool {
                *next != "c"
            }
        }

        let graph = graph_from(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("a", "c"), ("c", "d")],
            true,
        );
        let state = Dfs::on(&graph).run(&"a", &mut NoC).unwrap();

        assert_eq!(state.order().copied().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn callbacks_read_state() {
        struct Depths(Vec<(&'static str, usize)>);

        impl<V> DfsCallbacks<&'static str, V> for Depths {
            fn process_vertex_early(
                &mut self,
                vertex: &&'static str,
                state: &VisitState<'_, &'static str, V>,
            ) -> Control {
                let mut depth = 0;
                let mut current = *vertex;
                while let Some(parent) = state.parent(&current) {
                    depth += 1;
                    current = *parent;
                }
                self.0.push((*vertex, depth));
                Control::Continue
            }
        }

        let graph = graph_from(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("b", "c"), ("a", "d")],
            true,
        );
        let mut depths = Depths(Vec::new());

        Dfs::on(&graph).run(&"a", &mut depths).unwrap();

        assert_eq!(depths.0, vec![("a", 0), ("b", 1), ("c", 2), ("d", 1)]);
    }

    #[test]
    fn deep_path_no_stack_overflow() {
        let n = 200_000;
        let graph = create_path(n, true);

        let state = Dfs::on(&graph).run(&0, &mut ()).unwrap();

        assert_eq!(state.discovered_count(), n);
        assert_eq!(state.exit_time(&0), Some(Time(2 * n)));
        assert!(state.is_ancestor(&0, &(n - 1)));
        assert!(!state.is_ancestor(&(n - 1), &0));
    }

    #[test]
    fn unknown_start() {
        let graph = graph_from(&["a"], &[], true);

        assert_matches!(
            Dfs::on(&graph).run(&"b", &mut ()),
            Err(Error::UnknownVertex("b"))
        );
    }

    fn assert_nesting<V>(state: &VisitState<'_, usize, V>) -> Result<(), TestCaseError> {
        for v in state.order() {
            let (entry, exit) = (state.entry_time(v), state.exit_time(v));
            prop_assert!(entry < exit);

            if let Some(u) = state.parent(v) {
                prop_assert!(state.entry_time(u) < entry);
                prop_assert!(exit < state.exit_time(u));
                prop_assert!(state.is_ancestor(u, v));
            }
        }

        Ok(())
    }

    proptest! {
        #[test]
        #[ignore = "run property-based tests with `cargo test proptest_ -- --ignored`"]
        fn proptest_dfs_bracket_nesting_directed(graph in graph_directed()) {
            let state = Dfs::on(&graph).run_all(&mut ());

            prop_assert_eq!(state.discovered_count(), graph.vertex_count());
            prop_assert_eq!(state.time(), Time(2 * graph.vertex_count()));
            assert_nesting(&state)?;
        }

        #[test]
        #[ignore = "run property-based tests with `cargo test proptest_ -- --ignored`"]
        fn proptest_dfs_bracket_nesting_undirected(graph in graph_undirected(), start: usize) {
            let start = start % graph.vertex_count();
            let state = Dfs::on(&graph).run(&start, &mut ()).unwrap();

            prop_assert_eq!(state.order().len(), state.post_order().len());
            assert_nesting(&state)?;
        }

        #[test]
        #[ignore = "run property-based tests with `cargo test proptest_ -- --ignored`"]
        fn proptest_dfs_visit_once(graph in graph_directed()) {
            let state = Dfs::on(&graph).run_all(&mut ());

            let mut order = state.order().copied().collect::<Vec<_>>();
            order.sort_unstable();
            prop_assert_eq!(order, (0..graph.vertex_count()).collect::<Vec<_>>());
        }
    }
}
