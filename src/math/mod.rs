//! Physical constants and fixed numerical settings for the lcao library.

/// CODATA constants, model defaults and unit conversion factors.
pub mod constants;
