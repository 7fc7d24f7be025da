//! Graph construction and validation errors.

use mensur_core::SegId;
use thiserror::Error;

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// A group with this name already exists.
    #[error("Group name {name} is already defined")]
    DuplicateGroup { name: String },

    /// A group was opened while another one is still open.
    #[error("Group {name} opened inside group {open}")]
    NestedGroup { name: String, open: String },

    /// Geometry or junction rows need an open group.
    #[error("No group is open")]
    NoOpenGroup,

    /// A group was left open at build time.
    #[error("Group {name} was never closed")]
    UnclosedGroup { name: String },

    /// The bore has no MAIN sequence.
    #[error("No MAIN sequence was defined")]
    MissingMain,

    /// A junction names a group that does not exist (or is empty).
    #[error("Child group {name} is not defined")]
    UnresolvedChild { name: String },

    /// A group may head at most one side chain and close at most one loop.
    #[error("Group {name} is attached as a child more than once")]
    SharedChildGroup { name: String },

    /// Connection ratios describe a flow share.
    #[error("Connection ratio {ratio} on segment {seg} is outside [0, 1]")]
    RatioOutOfRange { seg: SegId, ratio: f64 },

    /// NaN or infinity in a geometry field.
    #[error("Non-finite geometry on segment {seg}")]
    NonFiniteGeometry { seg: SegId },

    /// Diameters and lengths cannot be negative.
    #[error("Negative {what} on segment {seg}")]
    NegativeGeometry { seg: SegId, what: &'static str },

    /// A duct section needs a positive bore on both ends.
    #[error("Zero diameter on positive-length segment {seg}")]
    ZeroDiameterSection { seg: SegId },

    /// Every junction blends against a trunk continuation downstream.
    #[error("Junction on segment {seg} has no trunk continuation")]
    JunctionAtChainEnd { seg: SegId },

    /// A branch must rejoin the trunk at a merge downstream of it.
    #[error("Branch on segment {seg} never rejoins the trunk")]
    MissingMerge { seg: SegId },

    /// next/prev must mirror each other and stay acyclic.
    #[error("Inconsistent chain links at segment {seg}")]
    InconsistentLinks { seg: SegId },

    /// A junction cannot target the chain it sits on.
    #[error("Child of segment {seg} targets its own chain")]
    ChildTargetsOwnChain { seg: SegId },

    /// Side chains must nest; reference cycles would recurse forever.
    #[error("Group {name} is part of a child reference cycle")]
    ChildCycle { name: String },

    /// The MAIN sequence is the root and cannot be anyone's child.
    #[error("Child of segment {seg} targets the MAIN sequence")]
    ChildTargetsMain { seg: SegId },

    /// Spliced groups must be plain geometry.
    #[error("Group {name} carries junctions and cannot be inserted")]
    InsertWithJunctions { name: String },

    /// Subdivision needs a positive step.
    #[error("Subdivision step must be positive, got {step}")]
    InvalidStep { step: f64 },
}
