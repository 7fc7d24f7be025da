//! Frequency sweep grid.

use crate::error::{AcousticsError, AcousticsResult};

/// Inclusive step-based frequency grid `min, min+step, ..` up to `max`.
///
/// Stores the user-facing bounds; points are generated on demand so the
/// executor can parallelize over them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreqSweep {
    pub min_hz: f64,
    pub max_hz: f64,
    pub step_hz: f64,
}

impl FreqSweep {
    pub fn new(min_hz: f64, max_hz: f64, step_hz: f64) -> AcousticsResult<Self> {
        if !(min_hz.is_finite() && max_hz.is_finite() && step_hz.is_finite()) {
            return Err(AcousticsError::InvalidSweep {
                what: "bounds must be finite",
            });
        }
        if step_hz <= 0.0 {
            return Err(AcousticsError::InvalidSweep {
                what: "step must be positive",
            });
        }
        if min_hz < 0.0 {
            return Err(AcousticsError::InvalidSweep {
                what: "minimum must not be negative",
            });
        }
        if max_hz < min_hz {
            return Err(AcousticsError::InvalidSweep {
                what: "maximum below minimum",
            });
        }
        Ok(Self {
            min_hz,
            max_hz,
            step_hz,
        })
    }

    /// Number of grid points.
    pub fn num_points(&self) -> usize {
        // The slack keeps an on-grid maximum inside the sweep when the
        // division lands one ulp short.
        ((self.max_hz - self.min_hz) / self.step_hz + 1e-9).floor() as usize + 1
    }

    /// Generate all frequencies in ascending order.
    pub fn points(&self) -> Vec<f64> {
        let n = self.num_points();
        let mut points = Vec::with_capacity(n);
        for i in 0..n {
            points.push(self.min_hz + i as f64 * self.step_hz);
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_grid_shape() {
        let sweep = FreqSweep::new(0.0, 2000.0, 2.5).unwrap();
        let points = sweep.points();
        assert_eq!(points.len(), 801);
        assert_relative_eq!(points[0], 0.0);
        assert_relative_eq!(points[1], 2.5);
        assert_relative_eq!(points[800], 2000.0);
    }

    #[test]
    fn off_grid_maximum_is_not_overshot() {
        let sweep = FreqSweep::new(0.0, 9.9, 2.5).unwrap();
        let points = sweep.points();
        assert_eq!(points.len(), 4);
        assert_relative_eq!(points[3], 7.5);
    }

    #[test]
    fn single_point_when_bounds_coincide() {
        let sweep = FreqSweep::new(440.0, 440.0, 1.0).unwrap();
        assert_eq!(sweep.points(), vec![440.0]);
    }

    #[test]
    fn rejects_malformed_grids() {
        assert!(FreqSweep::new(0.0, 2000.0, 0.0).is_err());
        assert!(FreqSweep::new(0.0, 2000.0, -2.5).is_err());
        assert!(FreqSweep::new(100.0, 50.0, 2.5).is_err());
        assert!(FreqSweep::new(-10.0, 50.0, 2.5).is_err());
        assert!(FreqSweep::new(0.0, f64::INFINITY, 2.5).is_err());
    }
}
