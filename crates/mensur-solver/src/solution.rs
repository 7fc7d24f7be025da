//! Per-solve scratch arena.

use mensur_acoustics::{C_ZERO, Complex64};
use mensur_core::SegId;
use mensur_graph::Graph;
use nalgebra::Matrix2;

/// Scratch values attached to one segment during a solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SegState {
    /// Transmission matrix at the solve frequency.
    pub matrix: Matrix2<Complex64>,
    /// Input-side impedance.
    pub zi: Complex64,
    /// Output-side impedance.
    pub zo: Complex64,
    /// Input-side pressure and volume velocity.
    pub pi: Complex64,
    pub ui: Complex64,
    /// Output-side pressure and volume velocity.
    pub po: Complex64,
    pub uo: Complex64,
}

impl Default for SegState {
    fn default() -> Self {
        Self {
            matrix: Matrix2::identity(),
            zi: C_ZERO,
            zo: C_ZERO,
            pi: C_ZERO,
            ui: C_ZERO,
            po: C_ZERO,
            uo: C_ZERO,
        }
    }
}

/// Solver-owned arena of per-segment scratch state for one frequency.
///
/// The graph stays immutable; every solve gets a fresh `Solution`, so
/// stale values cannot leak between frequencies and a sweep can run its
/// solves in parallel over the same graph.
#[derive(Debug, Clone)]
pub struct Solution {
    states: Vec<SegState>,
    head: SegId,
    omega: f64,
}

impl Solution {
    /// Zeroed scratch for every segment of `graph`.
    pub fn new(graph: &Graph, omega: f64) -> Self {
        Self {
            states: vec![SegState::default(); graph.len()],
            head: graph.head(),
            omega,
        }
    }

    /// Angular frequency this solution was computed at [rad/s].
    pub fn omega(&self) -> f64 {
        self.omega
    }

    /// State of a segment (None if the id is out of bounds).
    pub fn state(&self, id: SegId) -> Option<&SegState> {
        self.states.get(id.usize())
    }

    pub(crate) fn state_mut(&mut self, id: SegId) -> Option<&mut SegState> {
        self.states.get_mut(id.usize())
    }

    /// Input impedance at the network head.
    pub fn input_impedance(&self) -> Complex64 {
        self.states
            .get(self.head.usize())
            .map_or(C_ZERO, |s| s.zi)
    }
}
