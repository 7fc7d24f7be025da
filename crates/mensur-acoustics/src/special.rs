//! Special functions for the piston radiation load.
//!
//! Only what the radiation formula needs: first-order Bessel and Struve
//! functions on the non-negative real axis.

use core::f64::consts::{FRAC_2_PI, PI};

/// First-order Bessel function of the first kind.
pub fn bessel_j1(x: f64) -> f64 {
    libm::j1(x)
}

/// First-order Struve function H1 for `x >= 0`.
///
/// Power series up to x = 16, Y1-anchored asymptotic expansion above;
/// the two branches agree to better than 1e-6 at the switch.
pub fn struve_h1(x: f64) -> f64 {
    if x <= 16.0 {
        let h2 = 0.25 * x * x;
        let mut term = h2 * 8.0 / (3.0 * PI);
        let mut sum = term;
        for k in 0..60 {
            let kf = k as f64;
            term *= -h2 / ((kf + 1.5) * (kf + 2.5));
            sum += term;
            if term.abs() <= sum.abs() * 1e-17 {
                break;
            }
        }
        sum
    } else {
        let w = 1.0 / (x * x);
        // H1(x) - Y1(x) ~ (2/pi) * (1 + 1/x^2 - 3/x^4 + 45/x^6)
        libm::y1(x) + FRAC_2_PI * (1.0 + w * (1.0 - w * (3.0 - 45.0 * w)))
    }
}
