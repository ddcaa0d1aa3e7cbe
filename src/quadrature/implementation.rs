//! This module implements the `Integrator`, the nested adaptive quadrature over a box.
//!
//! The triple integral is computed as an outer adaptive integral over x of a middle
//! adaptive integral over y of an inner adaptive integral over z. Every level runs the
//! same G7K15 bisection scheme. Inner levels hand their error estimate and convergence
//! state up as part of each node sample, and work to a tighter target (see
//! [`QuadratureOptions::nested`]) so that their errors fit in the budget of the level
//! above. The final `IntegrationResult` only claims convergence when every integral it
//! depends on converged.
//!
//! The coordinates of the field's [`ScalarField::singular_points`] become the initial
//! panel boundaries of the matching axis at every level.

use super::adaptive::{AdaptiveOutcome, integrate_adaptive};
use super::options::QuadratureOptions;
use super::rule::Estimate;
use crate::{
    error::LcaoError,
    types::{IntegrationDomain, IntegrationResult, Interval, ScalarField},
};
use log::{debug, warn};

/// Nested adaptive Gauss-Kronrod integrator for scalar fields over boxes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Integrator {
    /// Accuracy targets and limits applied at every level.
    options: QuadratureOptions,
}

impl Integrator {
    /// Creates a new `Integrator` with default options.
    ///
    /// # Examples
    ///
    /// ```
    /// use lcao::{FnField, IntegrationDomain, Integrator};
    ///
    /// let integrator = Integrator::new();
    /// let field = FnField::new("xyz", |x: f64, y: f64, z: f64| x * y * z);
    /// let domain = IntegrationDomain::new([0.0, 1.0], [0.0, 2.0], [0.0, 3.0]).unwrap();
    ///
    /// let result = integrator.integrate(&field, &domain).unwrap();
    /// assert!((result.value - 4.5).abs() < 1e-12);
    /// assert!(result.converged);
    /// ```
    pub fn new() -> Self {
        Self {
            options: QuadratureOptions::default(),
        }
    }

    /// Configures the integrator with custom options.
    ///
    /// # Examples
    ///
    /// ```
    /// use lcao::{Integrator, QuadratureOptions};
    ///
    /// let options = QuadratureOptions {
    ///     rel_tol: 1e-8,
    ///     max_subdivisions: 200,
    ///     ..Default::default()
    /// };
    ///
    /// let integrator = Integrator::new().with_options(options);
    /// assert_eq!(integrator.options().max_subdivisions, 200);
    /// ```
    pub fn with_options(mut self, options: QuadratureOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &QuadratureOptions {
        &self.options
    }

    /// Integrates `field` over `domain`.
    ///
    /// # Returns
    ///
    /// The value with its propagated error estimate. Hitting the subdivision ceiling at any
    /// level does not fail the call: the best estimate comes back with
    /// `converged == false` and a warning is logged. Use
    /// [`IntegrationResult::into_converged`] to turn that into an error.
    ///
    /// # Errors
    ///
    /// Returns `LcaoError::InvalidConfig` if the options are invalid. The domain is
    /// validated on construction.
    pub fn integrate<F: ScalarField>(
        &self,
        field: &F,
        domain: &IntegrationDomain,
    ) -> Result<IntegrationResult, LcaoError> {
        self.options.validate()?;

        let options = &self.options;
        let middle_options = options.nested(domain.x.width());
        let inner_options = middle_options.nested(domain.y.width());

        let singular_points = field.singular_points();
        let x_breaks = domain.x.interior_points(singular_points.iter().map(|p| p[0]));
        let y_breaks = domain.y.interior_points(singular_points.iter().map(|p| p[1]));
        let z_breaks = domain.z.interior_points(singular_points.iter().map(|p| p[2]));

        let inner = |x: f64, y: f64| -> Estimate {
            let along_z = |z: f64| Estimate::exact(field.evaluate(x, y, z));
            integrate_adaptive(&along_z, domain.z, &z_breaks, &inner_options, false).estimate
        };
        let middle = |x: f64| -> Estimate {
            let along_y = |y: f64| inner(x, y);
            integrate_adaptive(&along_y, domain.y, &y_breaks, &middle_options, false).estimate
        };

        let outcome = integrate_adaptive(&middle, domain.x, &x_breaks, options, options.parallel);
        let result = to_result(outcome);

        debug!(
            "Triple integral of {}: {:e} (error {:.2e}, {} evaluations, {} outer subdivisions)",
            field.name(),
            result.value,
            result.error,
            result.evaluations,
            result.subdivisions
        );
        if !result.converged {
            warn!(
                "Triple integral of {} did not reach the requested tolerance: {:e} (error {:.2e})",
                field.name(),
                result.value,
                result.error
            );
        }

        Ok(result)
    }

    /// Integrates a function of one variable over `interval`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lcao::{Integrator, Interval};
    ///
    /// let interval = Interval::new('x', 0.0, std::f64::consts::PI).unwrap();
    /// let result = Integrator::new().integrate_1d(f64::sin, interval).unwrap();
    /// assert!((result.value - 2.0).abs() < 1e-10);
    /// ```
    pub fn integrate_1d<F>(&self, f: F, interval: Interval) -> Result<IntegrationResult, LcaoError>
    where
        F: Fn(f64) -> f64 + Sync,
    {
        self.options.validate()?;

        let sample = |x: f64| Estimate::exact(f(x));
        let result = to_result(integrate_adaptive(
            &sample,
            interval,
            &[],
            &self.options,
            self.options.parallel,
        ));

        if !result.converged {
            warn!(
                "1-D integral did not reach the requested tolerance: {:e} (error {:.2e})",
                result.value, result.error
            );
        }

        Ok(result)
    }
}

fn to_result(outcome: AdaptiveOutcome) -> IntegrationResult {
    IntegrationResult {
        value: outcome.estimate.value,
        error: outcome.estimate.error,
        converged: outcome.estimate.converged,
        evaluations: outcome.estimate.evaluations,
        subdivisions: outcome.subdivisions,
    }
}
