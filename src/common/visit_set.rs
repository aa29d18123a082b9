use fixedbitset::FixedBitSet;

use crate::core::VertexId;

/// A set of visited vertices.
pub trait VisitSet {
    /// Marks the vertex as visited.
    ///
    /// Returns `true` when this is the first time the vertex is visited.
    fn visit(&mut self, id: VertexId) -> bool;

    /// Returns `true` if the vertex is marked as visited.
    fn is_visited(&self, id: VertexId) -> bool;

    /// Returns the number of visited vertices.
    fn visited_count(&self) -> usize;
}

// Grows on demand, ids past the current length are unvisited.
impl VisitSet for FixedBitSet {
    fn visit(&mut self, id: VertexId) -> bool {
        let index = id.as_usize();
        if self.len() <= index {
            self.grow(index + 1);
        }
        !self.put(index)
    }

    fn is_visited(&self, id: VertexId) -> bool {
        self.contains(id.as_usize())
    }

    fn visited_count(&self) -> usize {
        self.count_ones(..)
    }
}
