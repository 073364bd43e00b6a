//! Secondary index subsystem.
//!
//! Index sets are derived from each family's declared query patterns, never
//! hand-listed at call sites. Field order inside a compound index is
//! semantic: equality-filtered fields precede the range- or sort-ordered
//! field so every declared access pattern is served by one index prefix.

mod planner;
mod spec;

pub use planner::{IndexPlanner, QueryPattern, QueryShape};
pub use spec::{Direction, IndexSpec};
