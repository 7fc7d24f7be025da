//! Core bore-graph data structures.

use core::f64::consts::FRAC_PI_4;
use core::fmt;

use mensur_core::SegId;

/// How a side chain connects to the trunk at a junction.
///
/// INSERT splices are resolved by the builder and never appear in a
/// built graph; a segment without a child link is a plain duct section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Junction {
    /// Terminating side branch (tone hole): the child's input impedance
    /// blends in parallel with the trunk continuation.
    Split,
    /// Divergence point of a loop that rejoins the trunk at a merge.
    Branch,
    /// Rejoin point of a branch loop; targets the loop chain's tail.
    Merge,
    /// Self-loop attached at a single point (reserved).
    Addon,
}

impl fmt::Display for Junction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Split => write!(f, "SPLIT"),
            Self::Branch => write!(f, "BRANCH"),
            Self::Merge => write!(f, "MERGE"),
            Self::Addon => write!(f, "ADDON"),
        }
    }
}

/// A resolved junction on a trunk segment.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildLink {
    pub kind: Junction,
    /// Share of the flow taken by the side chain, in [0, 1].
    pub ratio: f64,
    /// Head of the side chain, or its tail for a merge.
    pub target: SegId,
}

/// One conical (or cylindrical) bore section.
///
/// A zero-length segment is a junction or end marker, not a duct.
/// `next` is the owning direction along a chain; `prev` and `parent`
/// are non-owning back-references.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Input-side diameter [m].
    pub front_dia: f64,
    /// Output-side diameter [m].
    pub back_dia: f64,
    /// Section length [m].
    pub length: f64,
    /// Name of the group (chain) this segment belongs to.
    pub group: String,
    /// Distance of the input end from the network head [m].
    pub position: f64,
    pub next: Option<SegId>,
    pub prev: Option<SegId>,
    /// Trunk segment owning this chain head, if any.
    pub parent: Option<SegId>,
    pub child: Option<ChildLink>,
}

impl Segment {
    /// Cross-section area at the input end [m^2].
    pub fn input_area(&self) -> f64 {
        FRAC_PI_4 * self.front_dia * self.front_dia
    }
}

/// A validated, immutable bore network.
///
/// Segments live in a flat arena indexed by [`SegId`]; the MAIN chain
/// head is the entry point for solving and printing. The graph carries
/// no per-frequency state, so it is freely shared across threads.
#[derive(Debug, Clone)]
pub struct Graph {
    pub(crate) segments: Vec<Segment>,
    pub(crate) head: SegId,
}

impl Graph {
    /// All segments in arena order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Get a segment by id (None if the id is out of bounds).
    pub fn segment(&self, id: SegId) -> Option<&Segment> {
        self.segments.get(id.usize())
    }

    /// Head of the MAIN chain.
    pub fn head(&self) -> SegId {
        self.head
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// A built graph always has a MAIN chain, but the conventional pair
    /// of accessors is kept.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last segment of the chain containing `from`.
    pub fn chain_tail(&self, from: SegId) -> SegId {
        let mut cur = from;
        while let Some(next) = self.segment(cur).and_then(|s| s.next) {
            cur = next;
        }
        cur
    }

    /// Locate the merge that closes the loop opened at `branch_seg`.
    ///
    /// Walks the trunk continuation and returns the first segment whose
    /// merge link targets the tail of the branch child chain.
    pub fn merge_of(&self, branch_seg: SegId) -> Option<SegId> {
        let seg = self.segment(branch_seg)?;
        let link = seg.child.as_ref()?;
        if link.kind != Junction::Branch {
            return None;
        }
        let loop_tail = self.chain_tail(link.target);
        let mut cur = seg.next;
        while let Some(id) = cur {
            let s = self.segment(id)?;
            if let Some(l) = &s.child {
                if l.kind == Junction::Merge && l.target == loop_tail {
                    return Some(id);
                }
            }
            cur = s.next;
        }
        None
    }

    /// Next segment along the dominant path.
    ///
    /// Diverts into a split or branch child when it takes more than half
    /// of the flow; a loop chain rejoins the trunk at its merge; a side
    /// chain that terminates (tone hole exit) ends the path.
    pub fn path_next(&self, id: SegId) -> Option<SegId> {
        let seg = self.segment(id)?;
        if let Some(link) = &seg.child {
            if matches!(link.kind, Junction::Split | Junction::Branch) && link.ratio > 0.5 {
                return Some(link.target);
            }
        }
        if seg.next.is_some() {
            return seg.next;
        }
        // Chain tail: rejoin the trunk where a merge references this tail.
        self.segments
            .iter()
            .position(|s| matches!(&s.child, Some(l) if l.kind == Junction::Merge && l.target == id))
            .map(|i| SegId::from_index(i as u32))
    }

    /// Previous segment along the dominant path (mirror of [`Self::path_next`]).
    pub fn path_prev(&self, id: SegId) -> Option<SegId> {
        let seg = self.segment(id)?;
        if let Some(link) = &seg.child {
            if link.kind == Junction::Merge && link.ratio > 0.5 {
                return Some(link.target);
            }
        }
        if seg.prev.is_some() {
            return seg.prev;
        }
        // Chain head: continue at the trunk segment that owns this chain.
        seg.parent
    }
}
