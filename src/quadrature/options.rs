//! This module defines configuration options for the adaptive quadrature.
//!
//! `QuadratureOptions` controls the accuracy targets and the work ceiling of every level
//! of the nested integration. Tightening the tolerances trades CPU time for accuracy; the
//! subdivision ceiling bounds that time.

use crate::error::LcaoError;

/// Share of a level's error target granted to each node of the level above it.
///
/// The error of an outer integral includes the weighted errors of its inner integrals,
/// so an inner level that stopped at the outer tolerance would use up the entire budget.
pub const NESTED_TOLERANCE_FRACTION: f64 = 0.1;

/// Configuration parameters for the adaptive Gauss-Kronrod quadrature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureOptions {
    /// The absolute error target.
    ///
    /// A level stops refining once its error estimate drops below
    /// `max(abs_tol, rel_tol * |value|)`. The value is in the units of the integrand
    /// times the units of the integration variable, so integrands should be expressed
    /// in scaled units where this number is meaningful.
    pub abs_tol: f64,
    /// The relative error target.
    pub rel_tol: f64,
    /// The maximum number of bisections performed by one 1-D integral.
    ///
    /// If the tolerance is not met within this many subdivisions, the best estimate is
    /// returned and the result is flagged as not converged.
    pub max_subdivisions: usize,
    /// Evaluate the nodes of the outermost panels on the rayon thread pool.
    ///
    /// The integrand is pure, so this only changes wall-clock time, never the result.
    pub parallel: bool,
}

impl QuadratureOptions {
    /// Rejects options that would make the quadrature ill-defined.
    pub fn validate(&self) -> Result<(), LcaoError> {
        if !self.abs_tol.is_finite() || self.abs_tol < 0.0 {
            return Err(LcaoError::InvalidConfig {
                field: "abs_tol",
                reason: format!("must be finite and non-negative, got {}", self.abs_tol),
            });
        }
        if !self.rel_tol.is_finite() || self.rel_tol < 0.0 {
            return Err(LcaoError::InvalidConfig {
                field: "rel_tol",
                reason: format!("must be finite and non-negative, got {}", self.rel_tol),
            });
        }
        if self.abs_tol == 0.0 && self.rel_tol == 0.0 {
            return Err(LcaoError::InvalidConfig {
                field: "rel_tol",
                reason: "abs_tol and rel_tol cannot both be zero".to_string(),
            });
        }
        if self.max_subdivisions == 0 {
            return Err(LcaoError::InvalidConfig {
                field: "max_subdivisions",
                reason: "at least one subdivision is required".to_string(),
            });
        }
        Ok(())
    }

    /// The error target for an integral whose current estimate is `value`.
    #[inline]
    pub fn tolerance_for(&self, value: f64) -> f64 {
        self.abs_tol.max(self.rel_tol * value.abs())
    }

    /// The options for an integral nested inside a level that integrates over `outer_width`.
    ///
    /// Both targets shrink by [`NESTED_TOLERANCE_FRACTION`]; the absolute target is also
    /// divided by the outer width (when wider than one), since the outer level sums inner
    /// errors over it.
    pub fn nested(&self, outer_width: f64) -> Self {
        Self {
            abs_tol: self.abs_tol * NESTED_TOLERANCE_FRACTION / outer_width.abs().max(1.0),
            rel_tol: self.rel_tol * NESTED_TOLERANCE_FRACTION,
            ..*self
        }
    }
}

impl Default for QuadratureOptions {
    fn default() -> Self {
        Self {
            abs_tol: 1.0e-10,
            rel_tol: 1.0e-6,
            max_subdivisions: 50,
            parallel: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_valid() {
        assert!(QuadratureOptions::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_tolerances() {
        let negative = QuadratureOptions {
            abs_tol: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            negative.validate(),
            Err(LcaoError::InvalidConfig { field: "abs_tol", .. })
        ));

        let nan = QuadratureOptions {
            rel_tol: f64::NAN,
            ..Default::default()
        };
        assert!(nan.validate().is_err());

        let both_zero = QuadratureOptions {
            abs_tol: 0.0,
            rel_tol: 0.0,
            ..Default::default()
        };
        assert!(both_zero.validate().is_err());

        let no_subdivisions = QuadratureOptions {
            max_subdivisions: 0,
            ..Default::default()
        };
        assert!(matches!(
            no_subdivisions.validate(),
            Err(LcaoError::InvalidConfig {
                field: "max_subdivisions",
                ..
            })
        ));
    }

    #[test]
    fn test_tolerance_for_picks_larger_target() {
        let options = QuadratureOptions {
            abs_tol: 1e-8,
            rel_tol: 1e-4,
            ..Default::default()
        };
        assert_eq!(options.tolerance_for(1.0), 1e-4);
        assert_eq!(options.tolerance_for(-1.0), 1e-4);
        assert_eq!(options.tolerance_for(1e-6), 1e-8);
    }

    #[test]
    fn test_nested_options_leave_room_for_outer_error() {
        let outer = QuadratureOptions {
            abs_tol: 1e-6,
            rel_tol: 1e-4,
            max_subdivisions: 40,
            parallel: true,
        };
        let inner = outer.nested(20.0);
        assert!((inner.rel_tol - 1e-5).abs() < 1e-18);
        assert!((inner.abs_tol - 5e-9).abs() < 1e-21);
        assert_eq!(inner.max_subdivisions, 40);
        // Summed over the outer width, the inner targets stay below the outer target.
        assert!(20.0 * inner.abs_tol < outer.abs_tol);
        assert!(inner.nested(20.0).validate().is_ok());
    }
}
