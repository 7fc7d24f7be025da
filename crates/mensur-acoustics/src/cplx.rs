//! Complex scalar shared by the matrix and junction math.

use nalgebra::Complex;

/// Complex scalar used across the acoustic chain.
pub type Complex64 = Complex<f64>;

/// Additive identity.
pub const C_ZERO: Complex64 = Complex { re: 0.0, im: 0.0 };

/// The conventional blocked impedance: real positive infinity.
///
/// Infinities are matched explicitly before any arithmetic touches them;
/// `inf * 0` inside a complex product turns into NaN otherwise.
pub const C_INF: Complex64 = Complex {
    re: f64::INFINITY,
    im: 0.0,
};

/// True when either component is infinite.
pub fn is_infinite(z: Complex64) -> bool {
    z.re.is_infinite() || z.im.is_infinite()
}
