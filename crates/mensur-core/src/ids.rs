use core::fmt;
use core::num::NonZeroU32;

/// Handle to one segment slot in a built bore network.
///
/// Backed by `NonZeroU32` so the arena's `Option<SegId>` links (`next`,
/// `prev`, `parent`, child targets) take no more space than the id itself.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegId(NonZeroU32);

impl SegId {
    /// Wraps a 0-based arena slot, shifted by one so zero stays the niche.
    pub fn from_index(index: u32) -> Self {
        Self(NonZeroU32::new(index + 1).expect("arena index overflow"))
    }

    /// The 0-based arena slot.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }

    /// Arena slot as `usize` for direct slice access.
    pub fn usize(self) -> usize {
        self.index() as usize
    }
}

impl fmt::Debug for SegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seg({})", self.index())
    }
}

impl fmt::Display for SegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}
