//! Solver errors.

use mensur_core::SegId;
use thiserror::Error;

/// Result type for solver operations.
pub type SolverResult<T> = Result<T, SolverError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// A link referenced a segment the arena does not hold. Graphs
    /// coming out of the builder never trip this.
    #[error("Segment {seg} is referenced but not present in the graph")]
    BrokenTopology { seg: SegId },
}
