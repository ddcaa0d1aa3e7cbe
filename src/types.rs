//! Core types shared by the quadrature engine and the physical model.
//!
//! The `ScalarField` trait decouples the integrator from any particular integrand, so
//! the same engine integrates wavefunction densities, energy densities and test
//! functions alike. `IntegrationDomain` and `IntegrationResult` describe the input
//! box and the outcome of a triple integral.

use crate::error::LcaoError;

/// A pure, real-valued function of three Cartesian coordinates.
///
/// Implementors must be free of side effects: the integrator may evaluate the field
/// from several threads and in any order.
pub trait ScalarField: Send + Sync {
    /// A short, human readable name such as `"bonding energy density"`.
    fn name(&self) -> &str;

    /// Evaluates the field at `(x, y, z)`.
    fn evaluate(&self, x: f64, y: f64, z: f64) -> f64;

    /// Points where the field has a cusp or an integrable singularity.
    ///
    /// The integrator starts every axis with a panel boundary at each of their
    /// coordinates, so a feature much narrower than the box is never skipped by the
    /// first panel and never sampled exactly.
    fn singular_points(&self) -> Vec<[f64; 3]> {
        Vec::new()
    }
}

impl<F: ScalarField + ?Sized> ScalarField for &F {
    #[inline(always)]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline(always)]
    fn evaluate(&self, x: f64, y: f64, z: f64) -> f64 {
        (**self).evaluate(x, y, z)
    }

    fn singular_points(&self) -> Vec<[f64; 3]> {
        (**self).singular_points()
    }
}

/// Adapts a closure into a named [`ScalarField`].
///
/// # Examples
///
/// ```
/// use lcao::{FnField, ScalarField};
///
/// let field = FnField::new("r squared", |x: f64, y: f64, z: f64| x * x + y * y + z * z);
/// assert_eq!(field.evaluate(1.0, 2.0, 2.0), 9.0);
/// ```
#[derive(Debug, Clone)]
pub struct FnField<F> {
    name: String,
    function: F,
    singular_points: Vec<[f64; 3]>,
}

impl<F> FnField<F>
where
    F: Fn(f64, f64, f64) -> f64 + Send + Sync,
{
    pub fn new(name: impl Into<String>, function: F) -> Self {
        Self {
            name: name.into(),
            function,
            singular_points: Vec::new(),
        }
    }

    /// Declares the points where `function` has a cusp or a singularity.
    pub fn with_singular_points(mut self, points: impl IntoIterator<Item = [f64; 3]>) -> Self {
        self.singular_points = points.into_iter().collect();
        self
    }
}

impl<F> ScalarField for FnField<F>
where
    F: Fn(f64, f64, f64) -> f64 + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    fn evaluate(&self, x: f64, y: f64, z: f64) -> f64 {
        (self.function)(x, y, z)
    }

    fn singular_points(&self) -> Vec<[f64; 3]> {
        self.singular_points.clone()
    }
}

/// A closed interval `[lower, upper]` on one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

impl Interval {
    /// Creates an interval, rejecting non-finite or unordered bounds.
    ///
    /// `axis` only labels the error.
    pub fn new(axis: char, lower: f64, upper: f64) -> Result<Self, LcaoError> {
        if !lower.is_finite() || !upper.is_finite() || lower >= upper {
            return Err(LcaoError::InvalidDomain { axis, lower, upper });
        }
        Ok(Self { lower, upper })
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    #[inline]
    pub fn midpoint(&self) -> f64 {
        0.5 * (self.lower + self.upper)
    }

    /// The sorted, distinct members of `points` that lie strictly inside the interval.
    pub fn interior_points(&self, points: impl IntoIterator<Item = f64>) -> Vec<f64> {
        let mut inside: Vec<f64> = points
            .into_iter()
            .filter(|&p| p > self.lower && p < self.upper)
            .collect();
        inside.sort_by(f64::total_cmp);
        inside.dedup();
        inside
    }

    /// Returns the interval with both bounds divided by `length`.
    #[inline]
    pub fn scaled_down(&self, length: f64) -> Self {
        Self {
            lower: self.lower / length,
            upper: self.upper / length,
        }
    }
}

/// An axis-aligned box in R^3, given as one interval per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegrationDomain {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl IntegrationDomain {
    /// Builds a domain from `[lower, upper]` pairs, validating every axis.
    ///
    /// # Errors
    ///
    /// Returns `LcaoError::InvalidDomain` for the first axis whose bounds are not finite
    /// or not strictly increasing.
    ///
    /// # Examples
    ///
    /// ```
    /// use lcao::IntegrationDomain;
    ///
    /// let domain = IntegrationDomain::new([-1.0, 1.0], [0.0, 2.0], [-3.0, 3.0]).unwrap();
    /// assert_eq!(domain.volume(), 2.0 * 2.0 * 6.0);
    ///
    /// assert!(IntegrationDomain::new([1.0, 1.0], [0.0, 1.0], [0.0, 1.0]).is_err());
    /// ```
    pub fn new(x: [f64; 2], y: [f64; 2], z: [f64; 2]) -> Result<Self, LcaoError> {
        Ok(Self {
            x: Interval::new('x', x[0], x[1])?,
            y: Interval::new('y', y[0], y[1])?,
            z: Interval::new('z', z[0], z[1])?,
        })
    }

    /// The cube `[-half_width, half_width]^3`.
    pub fn cube(half_width: f64) -> Result<Self, LcaoError> {
        let bounds = [-half_width, half_width];
        Self::new(bounds, bounds, bounds)
    }

    pub fn volume(&self) -> f64 {
        self.x.width() * self.y.width() * self.z.width()
    }

    /// Returns the same box expressed in units of `length`.
    pub fn scaled_down(&self, length: f64) -> Self {
        Self {
            x: self.x.scaled_down(length),
            y: self.y.scaled_down(length),
            z: self.z.scaled_down(length),
        }
    }
}

/// The outcome of a numerical integral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegrationResult {
    /// The estimated value of the integral.
    pub value: f64,
    /// The estimated absolute error of `value`, including the errors propagated from
    /// inner integrals.
    pub error: f64,
    /// Whether every level of the nested quadrature met its tolerance.
    ///
    /// When this is `false`, `value` is the best estimate available at the subdivision
    /// ceiling and should be treated with care.
    pub converged: bool,
    /// Total number of integrand evaluations.
    pub evaluations: u64,
    /// Number of bisections performed on the outermost axis.
    pub subdivisions: usize,
}

impl IntegrationResult {
    /// Converts a non-converged result into `LcaoError::NotConverged`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lcao::IntegrationResult;
    ///
    /// let result = IntegrationResult {
    ///     value: 1.0,
    ///     error: 0.5,
    ///     converged: false,
    ///     evaluations: 15,
    ///     subdivisions: 1,
    /// };
    /// assert!(result.into_converged().is_err());
    /// ```
    pub fn into_converged(self) -> Result<Self, LcaoError> {
        if self.converged {
            Ok(self)
        } else {
            Err(LcaoError::NotConverged {
                value: self.value,
                error: self.error,
                subdivisions: self.subdivisions,
            })
        }
    }

    /// Multiplies value and error by `factor`, keeping the bookkeeping fields.
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            value: self.value * factor,
            error: self.error * factor.abs(),
            ..self
        }
    }
}
