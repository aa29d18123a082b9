//! Identification of vertices and edges.
//!
//! Every vertex is identified by a user-provided [key](VertexKey), which is the
//! stable identity visible to the outside world (a function name, a frame
//! address, a node id from the upstream data feed). Internally, the graph
//! assigns each vertex and edge a dense integer id in the order of insertion.
//! Traversals and layouts work with these integer ids so that the per-call
//! state can live in contiguous arrays and bit sets instead of hash maps.

use std::{fmt::Debug, hash::Hash};

/// A type usable as a vertex key.
///
/// This trait is implemented for any type that is cloneable, hashable and
/// comparable for equality, such as `String`, `&str` or integers.
pub trait VertexKey: Clone + Eq + Hash + Debug {}

impl<T> VertexKey for T where T: Clone + Eq + Hash + Debug {}

/// Dense integer id of a vertex, assigned in the order of insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(usize);

/// Dense integer id of an edge, assigned in the order of insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(usize);

macro_rules! impl_integer_id {
    ($id:ident) => {
        impl $id {
            pub fn as_usize(&self) -> usize {
                self.0
            }

            pub(crate) fn from_usize(id: usize) -> Self {
                Self(id)
            }
        }

        impl From<$id> for usize {
            fn from(id: $id) -> Self {
                id.0
            }
        }
    };
}

impl_integer_id!(VertexId);
impl_integer_id!(EdgeId);
