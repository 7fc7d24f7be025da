//! mensur-acoustics: duct acoustics primitives.
//!
//! Contains:
//! - air (working-condition air properties)
//! - cplx (complex scalar + impedance constants)
//! - special (Bessel/Struve functions for the piston load)
//! - transmission (lossy section matrices + impedance transfer)
//! - radiation (open-end load models)
//! - sweep (frequency grid)

pub mod air;
pub mod cplx;
pub mod error;
pub mod radiation;
pub mod special;
pub mod sweep;
pub mod transmission;

// Flat re-exports so solver code imports from one place
pub use air::{AirProperties, Conditions, GAMMA, PRANDTL};
pub use cplx::{C_INF, C_ZERO, Complex64, is_infinite};
pub use error::{AcousticsError, AcousticsResult};
pub use radiation::{RadiationKind, radiation_impedance};
pub use sweep::FreqSweep;
pub use transmission::{invert_unimodular, segment_matrix, zi_from_zo};
