//! Pressure reconstruction along the dominant path.
//!
//! The impedance solve must run first: these walks reuse the section
//! matrices stored in the [`Solution`] and, for the tail-driven start,
//! the radiation load stored at the trunk tail.

use mensur_acoustics::{C_ZERO, Complex64, Conditions, invert_unimodular, is_infinite};
use mensur_core::SegId;
use mensur_graph::Graph;
use nalgebra::Vector2;

use crate::error::{SolverError, SolverResult};
use crate::impedance::{seg, state_mut};
use crate::solution::{SegState, Solution};

/// Pressure and volume velocity sampled at one axial position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressurePoint {
    /// Distance from the network head along the dominant path [m].
    pub x: f64,
    /// Acoustic pressure [Pa].
    pub p: Complex64,
    /// Volume velocity [m^3/s].
    pub u: Complex64,
}

/// Drive the head with pressure `endp` against a closed mouth.
///
/// The mouthpiece end is treated as blocked (`u = 0`), which suits reed
/// and brass instruments; a flute-like open head would want
/// [`propagate_from_state`] with a velocity of its own.
pub fn propagate_from_head(graph: &Graph, sol: &mut Solution, endp: f64) -> SolverResult<()> {
    propagate_from_state(graph, sol, Complex64::new(endp, 0.0), C_ZERO)
}

/// Push an arbitrary head state `[p, u]` down the dominant path.
///
/// Every visited segment records the incoming state on its input side,
/// maps it through the inverse section matrix and records the result on
/// its output side; the output state then feeds the next segment on the
/// path.
pub fn propagate_from_state(
    graph: &Graph,
    sol: &mut Solution,
    p: Complex64,
    u: Complex64,
) -> SolverResult<()> {
    let mut v = Vector2::new(p, u);
    let mut cur = Some(graph.head());
    while let Some(id) = cur {
        let st = state_mut(sol, id)?;
        st.pi = v[0];
        st.ui = v[1];
        v = invert_unimodular(&st.matrix) * v;
        st.po = v[0];
        st.uo = v[1];
        cur = graph.path_next(id);
    }
    Ok(())
}

/// Drive the trunk tail with pressure `endp` and walk back to the head.
///
/// The tail velocity follows from the solved radiation load: a zero
/// load radiates `endp / rho c0` at zero pressure, a blocked load pins
/// the velocity to zero, and a finite load gives `u = p / z`.
pub fn propagate_from_tail(
    graph: &Graph,
    sol: &mut Solution,
    cond: &Conditions,
    endp: f64,
) -> SolverResult<()> {
    let tail = graph.chain_tail(graph.head());
    let z = state_of(sol, tail)?.zo;
    let mut v = if z == C_ZERO {
        Vector2::new(C_ZERO, Complex64::new(endp / cond.air.rhoc0, 0.0))
    } else if is_infinite(z) {
        Vector2::new(Complex64::new(endp, 0.0), C_ZERO)
    } else {
        let p = Complex64::new(endp, 0.0);
        Vector2::new(p, p / z)
    };
    let mut cur = Some(tail);
    while let Some(id) = cur {
        let st = state_mut(sol, id)?;
        st.po = v[0];
        st.uo = v[1];
        v = st.matrix * v;
        st.pi = v[0];
        st.ui = v[1];
        cur = graph.path_prev(id);
    }
    Ok(())
}

/// Sample `(x, p, u)` along the dominant path, head to tail.
///
/// Each segment contributes its input-side state at its head position;
/// the last one also contributes its output-side state, closing the
/// profile at the instrument end. Subdivide the graph before solving
/// for a dense profile.
pub fn pressure_profile(graph: &Graph, sol: &Solution) -> SolverResult<Vec<PressurePoint>> {
    let mut points = Vec::with_capacity(graph.len() + 1);
    let mut cur = Some(graph.head());
    let mut last = None;
    while let Some(id) = cur {
        let segment = seg(graph, id)?;
        let st = state_of(sol, id)?;
        points.push(PressurePoint {
            x: segment.position,
            p: st.pi,
            u: st.ui,
        });
        last = Some(id);
        cur = graph.path_next(id);
    }
    if let Some(id) = last {
        let segment = seg(graph, id)?;
        let st = state_of(sol, id)?;
        points.push(PressurePoint {
            x: segment.position + segment.length,
            p: st.po,
            u: st.uo,
        });
    }
    Ok(points)
}

fn state_of(sol: &Solution, id: SegId) -> SolverResult<&SegState> {
    sol.state(id).ok_or(SolverError::BrokenTopology { seg: id })
}
