//! Open-end radiation load.

use core::f64::consts::FRAC_PI_4;
use core::fmt;
use core::str::FromStr;

use crate::air::AirProperties;
use crate::cplx::{C_INF, C_ZERO, Complex64};
use crate::error::AcousticsError;
use crate::special::{bessel_j1, struve_h1};

/// Radiation model applied at an open end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RadiationKind {
    /// Ideal open end, zero load.
    None,
    /// Circular piston in an infinite baffle.
    Baffle,
    /// Unflanged pipe end.
    #[default]
    Pipe,
}

impl FromStr for RadiationKind {
    type Err = AcousticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("NONE") {
            Ok(Self::None)
        } else if s.eq_ignore_ascii_case("BAFFLE") {
            Ok(Self::Baffle)
        } else if s.eq_ignore_ascii_case("PIPE") {
            Ok(Self::Pipe)
        } else {
            Err(AcousticsError::UnknownRadiationKind { name: s.to_string() })
        }
    }
}

impl fmt::Display for RadiationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "NONE"),
            Self::Baffle => write!(f, "BAFFLE"),
            Self::Pipe => write!(f, "PIPE"),
        }
    }
}

/// Radiation impedance of a circular opening of diameter `dia` [m].
///
/// Zero frequency radiates nothing; a zero (or negative) diameter is a
/// closed end and blocks completely. The piston formula uses the
/// first-order Bessel and Struve functions of `x = omega/c0 * dia`.
pub fn radiation_impedance(
    omega: f64,
    dia: f64,
    air: &AirProperties,
    kind: RadiationKind,
) -> Complex64 {
    if omega <= 0.0 {
        return C_ZERO;
    }
    if dia <= 0.0 {
        return C_INF;
    }

    let s = FRAC_PI_4 * dia * dia;
    let x = omega / air.c0 * dia;
    let re = air.rhoc0 / s * (1.0 - 2.0 * bessel_j1(x) / x);
    let im = air.rhoc0 / s * (2.0 * struve_h1(x) / x);

    match kind {
        RadiationKind::None => C_ZERO,
        RadiationKind::Baffle => Complex64::new(re, im),
        // Unflanged end: about half the resistance, 0.7 of the reactance
        RadiationKind::Pipe => Complex64::new(0.5 * re, 0.7 * im),
    }
}
