//! Backward impedance walk.

use mensur_acoustics::{Complex64, Conditions, radiation_impedance, segment_matrix, zi_from_zo};
use mensur_core::SegId;
use mensur_graph::{Graph, Segment};

use crate::error::{SolverError, SolverResult};
use crate::junction;
use crate::solution::{SegState, Solution};

/// Input impedance of the network at angular frequency `omega`.
///
/// Fills the transmission matrix of every segment, then walks the trunk
/// tail-to-head: the tail's output impedance is the radiation load at
/// its end diameter, every other segment takes the next segment's input
/// impedance (or a junction combination), and the section matrix turns
/// output into input impedance. `omega <= 0` short-circuits to a zeroed
/// solution, so DC reports impedance 0 for any graph.
pub fn solve(graph: &Graph, omega: f64, cond: &Conditions) -> SolverResult<Solution> {
    let mut sol = Solution::new(graph, omega);
    if omega <= 0.0 {
        return Ok(sol);
    }
    fill_matrices(graph, omega, cond, &mut sol)?;
    solve_chain(graph, graph.head(), omega, cond, &mut sol)?;
    Ok(sol)
}

/// Section matrices for every segment at this frequency.
///
/// Matrices depend on geometry and air alone, so they are computed in one
/// pass up front; the walks below only read them.
fn fill_matrices(
    graph: &Graph,
    omega: f64,
    cond: &Conditions,
    sol: &mut Solution,
) -> SolverResult<()> {
    for (i, s) in graph.segments().iter().enumerate() {
        let id = SegId::from_index(i as u32);
        let m = segment_matrix(omega, s.front_dia, s.back_dia, s.length, &cond.air);
        state_mut(sol, id)?.matrix = m;
    }
    Ok(())
}

/// Impedance walk over the chain containing `from`, tail back to `from`.
///
/// Junction markers recurse into their side chains through the junction
/// resolver; on return, `zi` and `zo` are filled for every visited
/// segment and `from`'s `zi` is the chain input impedance.
pub(crate) fn solve_chain(
    graph: &Graph,
    from: SegId,
    omega: f64,
    cond: &Conditions,
    sol: &mut Solution,
) -> SolverResult<()> {
    let tail = graph.chain_tail(from);
    let end = seg(graph, tail)?;
    let load = radiation_impedance(omega, end.back_dia, &cond.air, cond.radiation);
    state_mut(sol, tail)?.zo = load;

    let mut cur = tail;
    loop {
        step(graph, cur, omega, cond, sol)?;
        if cur == from {
            return Ok(());
        }
        cur = seg(graph, cur)?
            .prev
            .ok_or(SolverError::BrokenTopology { seg: cur })?;
    }
}

/// One backward step: resolve this segment's output impedance, then
/// transfer it to the input side through the section matrix.
fn step(
    graph: &Graph,
    id: SegId,
    omega: f64,
    cond: &Conditions,
    sol: &mut Solution,
) -> SolverResult<()> {
    let segment = seg(graph, id)?;
    if segment.child.is_some() {
        let zo = junction::junction_load(graph, id, omega, cond, sol)?;
        state_mut(sol, id)?.zo = zo;
    } else if let Some(next) = segment.next {
        let zo = zi_of(sol, next)?;
        state_mut(sol, id)?.zo = zo;
    }
    let st = state_mut(sol, id)?;
    st.zi = zi_from_zo(&st.matrix, st.zo);
    Ok(())
}

pub(crate) fn seg(graph: &Graph, id: SegId) -> SolverResult<&Segment> {
    graph
        .segment(id)
        .ok_or(SolverError::BrokenTopology { seg: id })
}

pub(crate) fn zi_of(sol: &Solution, id: SegId) -> SolverResult<Complex64> {
    sol.state(id)
        .map(|s| s.zi)
        .ok_or(SolverError::BrokenTopology { seg: id })
}

pub(crate) fn state_mut(sol: &mut Solution, id: SegId) -> SolverResult<&mut SegState> {
    sol.state_mut(id)
        .ok_or(SolverError::BrokenTopology { seg: id })
}
