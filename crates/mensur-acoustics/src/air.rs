//! Air properties under working conditions.

use crate::error::{AcousticsError, AcousticsResult};
use crate::radiation::RadiationKind;

/// Specific heat ratio of air.
pub const GAMMA: f64 = 1.4;

/// Prandtl number of air.
pub const PRANDTL: f64 = 0.72;

/// Speed of sound, density and viscosity of air at a given temperature.
///
/// All values are plain SI. Derived once per run and shared by every solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirProperties {
    /// Temperature [degC].
    pub celsius: f64,
    /// Speed of sound [m/s].
    pub c0: f64,
    /// Density [kg/m^3].
    pub rho: f64,
    /// Characteristic impedance rho*c0 [Pa*s/m].
    pub rhoc0: f64,
    /// Dynamic viscosity [Pa*s].
    pub mu: f64,
    /// Kinematic viscosity [m^2/s].
    pub nu: f64,
}

impl AirProperties {
    /// Evaluate the empirical air fits at `celsius`.
    ///
    /// The viscosity fit is linear around room temperature; the speed of
    /// sound and density follow the ideal-gas forms anchored at 0 degC.
    pub fn from_celsius(celsius: f64) -> AcousticsResult<Self> {
        if !celsius.is_finite() || celsius <= -273.16 {
            return Err(AcousticsError::TemperatureOutOfRange { celsius });
        }
        let c0 = 331.45 * (celsius / 273.16 + 1.0).sqrt();
        let rho = 1.2929 * (273.16 / (273.16 + celsius));
        let mu = (18.2 + 0.0456 * (celsius - 25.0)) * 1.0e-6;
        Ok(Self {
            celsius,
            c0,
            rho,
            rhoc0: rho * c0,
            mu,
            nu: mu / rho,
        })
    }

    /// Thermoviscous boundary-layer weight `1 + (gamma - 1)/sqrt(Pr)`.
    pub fn damping_weight(&self) -> f64 {
        1.0 + (GAMMA - 1.0) / PRANDTL.sqrt()
    }
}

/// Working conditions shared by every solve of a run.
#[derive(Debug, Clone, Copy)]
pub struct Conditions {
    pub air: AirProperties,
    pub radiation: RadiationKind,
}

impl Conditions {
    pub fn new(air: AirProperties, radiation: RadiationKind) -> Self {
        Self { air, radiation }
    }
}
