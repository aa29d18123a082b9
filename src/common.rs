pub mod compare;
pub mod queue;
pub mod visit_set;

pub use compare::Comparator;
pub use queue::{EmptyQueueError, Queue};
pub use visit_set::VisitSet;
