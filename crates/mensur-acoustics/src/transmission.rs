//! Lossy transmission matrices for cylindrical and conical duct sections.
//!
//! A section matrix maps output-side state to input-side state:
//! `[p_in, u_in] = M * [p_out, u_out]` with p the acoustic pressure and u
//! the volume velocity. Chain products therefore accumulate head-to-tail
//! in playing order.

use core::f64::consts::{FRAC_PI_4, PI};

use nalgebra::{Complex, Matrix2};

use crate::air::AirProperties;
use crate::cplx::{C_INF, Complex64, is_infinite};

/// Transmission matrix of one duct section.
///
/// `front_dia`, `back_dia` and `length` are in meters, `omega` in rad/s.
/// A zero length or non-positive frequency yields the identity: the
/// section does not propagate. Positive-length sections must have
/// positive diameters (enforced at graph construction).
pub fn segment_matrix(
    omega: f64,
    front_dia: f64,
    back_dia: f64,
    length: f64,
    air: &AirProperties,
) -> Matrix2<Complex64> {
    if length <= 0.0 || omega <= 0.0 {
        return Matrix2::identity();
    }

    let d = 0.5 * (front_dia + back_dia);
    // Wall damping over the mean diameter
    let alpha = air.damping_weight() * (2.0 * omega * air.nu).sqrt() / air.c0 / d;
    let k0 = omega / air.c0;
    // k = sqrt(k0 * (k0 - 2(-1+i) alpha)), the lossy wavenumber
    let k = Complex::new(k0 * (k0 + 2.0 * alpha), -2.0 * k0 * alpha).sqrt();
    let x = k * length;
    let cc = x.cos();
    let ss = x.sin();

    if front_dia == back_dia {
        let s1 = FRAC_PI_4 * front_dia * front_dia;
        Matrix2::new(
            cc,
            Complex::new(0.0, air.rhoc0) * ss / s1,
            Complex::new(0.0, s1 / air.rhoc0) * ss,
            cc,
        )
    } else {
        let r1 = 0.5 * front_dia;
        let r2 = 0.5 * back_dia;
        let dr = r2 - r1;
        let dr2 = dr * dr;
        let x2 = x * x;
        Matrix2::new(
            (x * cc * r2 - ss * dr) / (x * r1),
            Complex::new(0.0, air.rhoc0) * ss / (PI * r1 * r2),
            Complex::new(0.0, -PI) * (x * cc * dr2 - (x2 * (r1 * r2) + dr2) * ss)
                / (x2 * air.rhoc0),
            (x * cc * r1 + ss * dr) / (x * r2),
        )
    }
}

/// Transfer an output-side impedance through a section matrix.
///
/// Total over the extended impedance plane: a blocked output maps to
/// `M00/M10` (or stays blocked when `M10 = 0`), and a pole of the
/// transfer maps to blocked.
pub fn zi_from_zo(m: &Matrix2<Complex64>, zo: Complex64) -> Complex64 {
    if is_infinite(zo) {
        let m10 = m[(1, 0)];
        if m10 != Complex::new(0.0, 0.0) {
            m[(0, 0)] / m10
        } else {
            C_INF
        }
    } else {
        let den = m[(1, 0)] * zo + m[(1, 1)];
        if den == Complex::new(0.0, 0.0) {
            C_INF
        } else {
            (m[(0, 0)] * zo + m[(0, 1)]) / den
        }
    }
}

/// Inverse of a section matrix.
///
/// Both section shapes have determinant exactly cos^2 + sin^2 = 1 in the
/// complex sense, so the adjugate is the inverse and no division is
/// needed.
pub fn invert_unimodular(m: &Matrix2<Complex64>) -> Matrix2<Complex64> {
    Matrix2::new(m[(1, 1)], -m[(0, 1)], -m[(1, 0)], m[(0, 0)])
}
