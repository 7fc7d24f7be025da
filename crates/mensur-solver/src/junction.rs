//! Branch-combination algebra at junction markers.

use mensur_acoustics::{C_INF, C_ZERO, Complex64, Conditions, is_infinite, zi_from_zo};
use mensur_core::SegId;
use mensur_graph::{ChildLink, Graph, Junction};
use nalgebra::Matrix2;

use crate::error::{SolverError, SolverResult};
use crate::impedance::{seg, solve_chain, zi_of};
use crate::solution::Solution;

/// Output impedance of the trunk at a junction marker.
///
/// Split blends the side chain's input impedance in parallel with the
/// trunk continuation. Branch combines the loop chain and the trunk
/// stretch up to its merge as two two-ports sharing terminal nodes.
/// Merge passes the downstream impedance through unchanged; the loop
/// combination happened back at its branch. Addon folds a self-loop
/// into a one-port before blending.
pub(crate) fn junction_load(
    graph: &Graph,
    id: SegId,
    omega: f64,
    cond: &Conditions,
    sol: &mut Solution,
) -> SolverResult<Complex64> {
    let segment = seg(graph, id)?;
    let link = segment
        .child
        .clone()
        .ok_or(SolverError::BrokenTopology { seg: id })?;
    let next = segment
        .next
        .ok_or(SolverError::BrokenTopology { seg: id })?;

    match link.kind {
        Junction::Split => {
            solve_chain(graph, link.target, omega, cond, sol)?;
            let z2 = zi_of(sol, next)?;
            if link.ratio == 0.0 {
                return Ok(z2);
            }
            let z1 = zi_of(sol, link.target)?;
            if link.ratio == 1.0 {
                // The hole takes everything; the trunk continuation is cut off.
                return Ok(z1);
            }
            Ok(parallel(z1 / link.ratio, z2))
        }
        Junction::Merge => zi_of(sol, next),
        Junction::Branch => branch_load(graph, id, &link, next, sol),
        Junction::Addon => addon_load(graph, &link, next, sol),
    }
}

/// Two-port parallel combination of a loop chain against the trunk
/// stretch between the branch and its merge, loaded by the impedance
/// just past the merge.
fn branch_load(
    graph: &Graph,
    id: SegId,
    link: &ChildLink,
    next: SegId,
    sol: &Solution,
) -> SolverResult<Complex64> {
    if link.ratio == 0.0 {
        // The loop carries nothing.
        return zi_of(sol, next);
    }
    let merge = graph
        .merge_of(id)
        .ok_or(SolverError::BrokenTopology { seg: id })?;
    let merge_next = seg(graph, merge)?
        .next
        .ok_or(SolverError::BrokenTopology { seg: merge })?;
    let z2 = zi_of(sol, merge_next)?;

    let m = chain_matrix(graph, link.target, None, sol)?;
    if link.ratio == 1.0 {
        // The trunk stretch carries nothing; the loop alone sees z2.
        return Ok(zi_from_zo(&m, z2));
    }
    let n = chain_matrix(graph, next, Some(merge), sol)?;

    // Flow-share scaling: the loop takes `ratio`, the stretch the rest.
    let m01 = m[(0, 1)] / link.ratio;
    let m10 = m[(1, 0)] * link.ratio;
    let rest = 1.0 - link.ratio;
    let n01 = n[(0, 1)] / rest;
    let n10 = n[(1, 0)] * rest;
    let (m00, m11) = (m[(0, 0)], m[(1, 1)]);
    let (n00, n11) = (n[(0, 0)], n[(1, 1)]);

    let cross = (m01 + n01) * (m10 + n10) - (m00 - n00) * (m11 - n11);
    if is_infinite(z2) {
        // Blocked past the merge: the blend degenerates to its z2 limit.
        if cross == C_ZERO {
            return Ok(C_ZERO);
        }
        return Ok((m01 * n00 + m00 * n01) / cross);
    }
    let dv = m11 * n01 + m01 * n11 + cross * z2;
    if dv == C_ZERO {
        return Ok(C_ZERO);
    }
    Ok((m01 * n01 + (m01 * n00 + m00 * n01) * z2) / dv)
}

/// One-port reduction of a self-loop: both ends of the child chain hang
/// on the same pressure node, so its two-port collapses to
/// `z1 = M01 / (M01 M10 - (1 - M00)(1 - M11))`.
fn addon_load(
    graph: &Graph,
    link: &ChildLink,
    next: SegId,
    sol: &Solution,
) -> SolverResult<Complex64> {
    let z2 = zi_of(sol, next)?;
    if link.ratio == 0.0 {
        return Ok(z2);
    }
    let m = chain_matrix(graph, link.target, None, sol)?;
    let one = Complex64::new(1.0, 0.0);
    let den = m[(0, 1)] * m[(1, 0)] - (one - m[(0, 0)]) * (one - m[(1, 1)]);
    let z1 = if den == C_ZERO { C_INF } else { m[(0, 1)] / den };
    if link.ratio == 1.0 {
        return Ok(z1);
    }
    Ok(parallel(z1 / link.ratio, z2 / (1.0 - link.ratio)))
}

/// Product of stored section matrices from `from` through `until`
/// (inclusive), or through the chain tail when `until` is None. The
/// product accumulates head-to-tail in playing order.
fn chain_matrix(
    graph: &Graph,
    from: SegId,
    until: Option<SegId>,
    sol: &Solution,
) -> SolverResult<Matrix2<Complex64>> {
    let mut m = Matrix2::identity();
    let mut cur = Some(from);
    while let Some(id) = cur {
        let st = sol
            .state(id)
            .ok_or(SolverError::BrokenTopology { seg: id })?;
        m *= st.matrix;
        if Some(id) == until {
            break;
        }
        cur = seg(graph, id)?.next;
    }
    Ok(m)
}

/// Parallel combination on the extended impedance plane.
///
/// A blocked arm drops out, two shorted arms stay a short, and a pair
/// cancelling to zero total is a resonant block.
pub fn parallel(z1: Complex64, z2: Complex64) -> Complex64 {
    if is_infinite(z1) {
        return z2;
    }
    if is_infinite(z2) {
        return z1;
    }
    if z1 == C_ZERO && z2 == C_ZERO {
        return C_ZERO;
    }
    let den = z1 + z2;
    if den == C_ZERO {
        return C_INF;
    }
    z1 * z2 / den
}
