//! Frequency-domain solver for air-column networks.
//!
//! This crate walks a [`mensur_graph::Graph`] backward from its open
//! end, combining section transmission matrices and junction loads into
//! the input impedance at the mouthpiece, then optionally reconstructs
//! the pressure and velocity distribution along the dominant path. A
//! sweep executor runs the per-frequency solves in parallel.

pub mod error;
pub mod impedance;
pub mod junction;
pub mod pressure;
pub mod solution;
pub mod sweep_run;

pub use error::{SolverError, SolverResult};
pub use impedance::solve;
pub use junction::parallel;
pub use pressure::{
    PressurePoint, pressure_profile, propagate_from_head, propagate_from_state,
    propagate_from_tail,
};
pub use solution::{SegState, Solution};
pub use sweep_run::{ImpedancePoint, run_sweep};
