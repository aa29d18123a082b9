//! Call-graph traversal and adjacency matrix layout.
//!
//! The crate is organized around a keyed [`Graph`] built from profiler data
//! (see [`wire`]), breadth-first and depth-first traversals over it driven by
//! user callbacks (see [`visit`]), and an [adjacency matrix
//! layout](layout::AdjacencyMatrixLayout) that turns the graph, or any weight
//! matrix, into positioned cells ready for rendering.
//!
//! # Examples
//!
//! ```
//! use callmap::{layout::AdjacencyMatrixLayout, visit::Dfs, Graph};
//!
//! let mut graph = Graph::new();
//!
//! for key in ["main", "parse", "eval", "print"] {
//!     graph.add_vertex(key, ()).unwrap();
//! }
//!
//! graph.connect(&"main", &"parse").unwrap();
//! graph.connect(&"main", &"eval").unwrap();
//! graph.connect(&"eval", &"print").unwrap();
//!
//! let state = Dfs::on(&graph).run(&"main", &mut ()).unwrap();
//! let order = state.order().copied().collect::<Vec<_>>();
//! assert_eq!(order, vec!["main", "parse", "eval", "print"]);
//!
//! let layout = AdjacencyMatrixLayout::new(400.0, 400.0)
//!     .from_order(&graph, state.order(), |key| key.to_string())
//!     .unwrap();
//!
//! assert_eq!(layout.len(), 3);
//! assert_eq!(layout.cell(2, 3).unwrap().id, "eval-print");
//! ```

pub mod common;
pub mod core;
pub mod graph;
pub mod infra;
pub mod layout;
pub mod visit;
pub mod wire;

pub use graph::Graph;

pub mod prelude {
    pub use crate::{
        common::{Comparator, Queue},
        graph::Graph,
        layout::AdjacencyMatrixLayout,
        visit::{Bfs, BfsCallbacks, Control, Dfs, DfsCallbacks, Outcome},
    };
}
