//! Configuration errors for the acoustic property layer.

use thiserror::Error;

/// Result type for acoustic configuration.
pub type AcousticsResult<T> = Result<T, AcousticsError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AcousticsError {
    /// Radiation model name not recognized.
    #[error("Unknown radiation kind: {name} (expected PIPE, BAFFLE or NONE)")]
    UnknownRadiationKind { name: String },

    /// Sweep bounds or step do not describe a forward grid.
    #[error("Invalid frequency sweep: {what}")]
    InvalidSweep { what: &'static str },

    /// Temperature at or below absolute zero.
    #[error("Temperature out of range: {celsius} degC")]
    TemperatureOutOfRange { celsius: f64 },
}
