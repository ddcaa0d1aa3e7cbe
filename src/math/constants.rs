//! Physical constants and fixed numerical settings used throughout the lcao library.
//!
//! The physical constants are the CODATA 2018 values in SI units. They seed the
//! defaults of [`PhysicalConstants`](crate::config::PhysicalConstants); the model itself
//! always reads them from an explicit [`Config`](crate::config::Config).

/// Reduced Planck constant in J s.
pub const HBAR: f64 = 1.054_571_817e-34;

/// Electron rest mass in kg.
pub const ELECTRON_MASS: f64 = 9.109_383_701_5e-31;

/// Vacuum electric permittivity in F/m.
pub const VACUUM_PERMITTIVITY: f64 = 8.854_187_812_8e-12;

/// Elementary charge in C.
pub const ELEMENTARY_CHARGE: f64 = 1.602_176_634e-19;

/// Length scale of the 1s trial orbitals in meters.
///
/// This is the Bohr radius rounded to three significant digits, as used by the model.
pub const BOHR_RADIUS: f64 = 5.29e-11;

/// Distance between the two centers in meters.
pub const CENTER_SEPARATION: f64 = 1.06e-10;

/// Empirical normalization constant of the bonding (symmetric) combination.
pub const BONDING_NORMALIZATION: f64 = 0.562;

/// Empirical normalization constant of the antibonding (antisymmetric) combination.
pub const ANTIBONDING_NORMALIZATION: f64 = 1.10;

/// Conversion factor from joules to electron volts.
///
/// Three significant digits, matching the precision of the model lengths.
pub const EV_PER_JOULE: f64 = 6.24e18;

/// Half width of the default integration cube in meters.
///
/// Roughly one hundred times the center separation.
pub const DOMAIN_HALF_WIDTH: f64 = 1.0e-8;

/// Default step of the central finite-difference Laplacian, in meters.
pub const FINITE_DIFFERENCE_STEP: f64 = 1.0e-12;
