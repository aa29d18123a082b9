pub mod error;
pub mod id;

pub use error::{AddEdgeError, AddEdgeErrorKind, DuplicateKeyError, UnknownVertexError};
pub use id::{EdgeId, VertexId, VertexKey};
