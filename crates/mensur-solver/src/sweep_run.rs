//! Sweep executor producing head-impedance spectra.

use mensur_acoustics::{C_ZERO, Conditions, FreqSweep};
use mensur_graph::Graph;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::error::SolverResult;
use crate::impedance::{seg, solve};

/// One sweep sample: head impedance referred to the mouth area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImpedancePoint {
    /// Frequency [Hz].
    pub freq_hz: f64,
    /// Scaled impedance, real part.
    pub re: f64,
    /// Scaled impedance, imaginary part.
    pub im: f64,
    /// `20 log10 |z|` of the scaled impedance, zero at zero impedance.
    pub mag_db: f64,
}

/// Solve the whole grid, one independent solve per frequency.
///
/// The impedance is multiplied by the mouth cross-section before
/// output, which makes spectra of differently sized instruments
/// comparable. Frequencies share nothing but the graph, so the grid is
/// solved in parallel; points come back in ascending frequency order.
pub fn run_sweep(
    graph: &Graph,
    sweep: &FreqSweep,
    cond: &Conditions,
) -> SolverResult<Vec<ImpedancePoint>> {
    let area = seg(graph, graph.head())?.input_area();
    let points: SolverResult<Vec<ImpedancePoint>> = sweep
        .points()
        .par_iter()
        .map(|&freq| {
            let omega = 2.0 * core::f64::consts::PI * freq;
            let sol = solve(graph, omega, cond)?;
            let z = sol.input_impedance() * area;
            let mag_db = if z == C_ZERO {
                0.0
            } else {
                20.0 * z.norm().log10()
            };
            Ok(ImpedancePoint {
                freq_hz: freq,
                re: z.re,
                im: z.im,
                mag_db,
            })
        })
        .collect();
    let points = points?;
    debug!(
        points = points.len(),
        segments = graph.len(),
        "impedance sweep complete"
    );
    Ok(points)
}
