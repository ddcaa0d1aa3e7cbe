//! Sources for the Laplacian of the trial wavefunction in the kinetic-energy term.

use super::wavefunction::MolecularOrbital;
use crate::config::ModelParameters;
use crate::error::LcaoError;
use crate::math::constants::FINITE_DIFFERENCE_STEP;
use crate::symbolic::CompiledLaplacian;
use serde::Serialize;
use std::fmt;

/// How the Laplacian of `psi` is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LaplacianMethod {
    /// Sum of the exact 1s Laplacians `(1/a^2 - 2/(a r)) phi`.
    #[default]
    Analytic,
    /// The expression derived symbolically from `psi`, evaluated per point.
    Symbolic,
    /// Seven-point central difference of `psi` with the given step, in meters.
    FiniteDifference { step: f64 },
}

impl LaplacianMethod {
    /// Finite differences with the default step.
    pub fn finite_difference() -> Self {
        LaplacianMethod::FiniteDifference {
            step: FINITE_DIFFERENCE_STEP,
        }
    }
}

impl fmt::Display for LaplacianMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaplacianMethod::Analytic => f.write_str("analytic"),
            LaplacianMethod::Symbolic => f.write_str("symbolic"),
            LaplacianMethod::FiniteDifference { step } => {
                write!(f, "finite-difference (h = {:e})", step)
            }
        }
    }
}

/// A prepared Laplacian for one molecular orbital.
///
/// Every variant returns exactly zero at the two centers.
#[derive(Debug, Clone)]
pub enum LaplacianSource {
    Analytic,
    Symbolic(CompiledLaplacian),
    FiniteDifference { step: f64 },
}

impl LaplacianSource {
    /// Prepares `method` for `orbital`. For the symbolic method this runs the derivation.
    ///
    /// # Errors
    ///
    /// Returns `LcaoError::InvalidConfig` for a finite-difference step that is not
    /// finite and positive, and `LcaoError::UnboundVariable` if the derived expression
    /// keeps a free symbol.
    pub fn prepare(
        method: LaplacianMethod,
        orbital: &MolecularOrbital,
        params: &ModelParameters,
    ) -> Result<Self, LcaoError> {
        match method {
            LaplacianMethod::Analytic => Ok(LaplacianSource::Analytic),
            LaplacianMethod::Symbolic => Ok(LaplacianSource::Symbolic(
                CompiledLaplacian::with_normalization(
                    orbital.state(),
                    orbital.normalization(),
                    params,
                )?,
            )),
            LaplacianMethod::FiniteDifference { step } => {
                if !step.is_finite() || step <= 0.0 {
                    return Err(LcaoError::InvalidConfig {
                        field: "laplacian.step",
                        reason: format!("must be finite and positive, got {:e}", step),
                    });
                }
                Ok(LaplacianSource::FiniteDifference { step })
            }
        }
    }

    #[inline]
    pub fn evaluate(&self, orbital: &MolecularOrbital, x: f64, y: f64, z: f64) -> f64 {
        if orbital.is_at_center(x, y, z) {
            return 0.0;
        }
        match self {
            LaplacianSource::Analytic => orbital.laplacian(x, y, z),
            LaplacianSource::Symbolic(compiled) => compiled.evaluate(x, y, z),
            LaplacianSource::FiniteDifference { step } => {
                central_difference(|x, y, z| orbital.psi(x, y, z), x, y, z, *step)
            }
        }
    }
}

/// Seven-point stencil `(sum of the six neighbors - 6 f) / h^2`.
fn central_difference<F>(f: F, x: f64, y: f64, z: f64, h: f64) -> f64
where
    F: Fn(f64, f64, f64) -> f64,
{
    let neighbors = f(x + h, y, z)
        + f(x - h, y, z)
        + f(x, y + h, z)
        + f(x, y - h, z)
        + f(x, y, z + h)
        + f(x, y, z - h);
    (neighbors - 6.0 * f(x, y, z)) / (h * h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::State;
    use approx::assert_relative_eq;

    const SAMPLE_POINTS: [[f64; 3]; 5] = [
        [3.0e-11, 2.0e-11, -1.0e-11],
        [-4.0e-11, 0.0, 5.0e-11],
        [6.1e-11, 2.6e-11, 0.0],
        [1.5e-10, -3.0e-11, 7.0e-11],
        [1.06e-10, 4.0e-11, 4.0e-11],
    ];

    fn prepared(method: LaplacianMethod, state: State) -> (LaplacianSource, MolecularOrbital) {
        let params = ModelParameters::default();
        let orbital = MolecularOrbital::new(state, &params);
        let source = LaplacianSource::prepare(method, &orbital, &params).unwrap();
        (source, orbital)
    }

    #[test]
    fn test_stencil_is_exact_for_quadratics() {
        let value = central_difference(|x, y, z| x * x + 3.0 * y * y - z * z, 0.3, -1.0, 2.0, 1e-3);
        assert_relative_eq!(value, 6.0, max_relative = 1e-6);
    }

    #[test]
    fn test_finite_difference_agrees_with_analytic() {
        for state in State::ALL {
            let (analytic, orbital) = prepared(LaplacianMethod::Analytic, state);
            let (fd, _) = prepared(LaplacianMethod::finite_difference(), state);
            for [x, y, z] in SAMPLE_POINTS {
                let exact = analytic.evaluate(&orbital, x, y, z);
                let approx = fd.evaluate(&orbital, x, y, z);
                assert_relative_eq!(approx, exact, max_relative = 2e-3);
            }
        }
    }

    #[test]
    fn test_symbolic_agrees_with_analytic() {
        for state in State::ALL {
            let (analytic, orbital) = prepared(LaplacianMethod::Analytic, state);
            let (symbolic, _) = prepared(LaplacianMethod::Symbolic, state);
            for [x, y, z] in SAMPLE_POINTS {
                let exact = analytic.evaluate(&orbital, x, y, z);
                let derived = symbolic.evaluate(&orbital, x, y, z);
                assert_relative_eq!(derived, exact, max_relative = 1e-9);
            }
        }
    }

    #[test]
    fn test_every_method_is_zero_at_centers() {
        let separation = ModelParameters::default().separation;
        for method in [
            LaplacianMethod::Analytic,
            LaplacianMethod::Symbolic,
            LaplacianMethod::finite_difference(),
        ] {
            for state in State::ALL {
                let (source, orbital) = prepared(method, state);
                assert_eq!(source.evaluate(&orbital, 0.0, 0.0, 0.0), 0.0);
                assert_eq!(source.evaluate(&orbital, separation, 0.0, 0.0), 0.0);
            }
        }
    }

    #[test]
    fn test_laplacian_is_even_in_y_and_z() {
        let (source, orbital) = prepared(LaplacianMethod::Analytic, State::Antibonding);
        let value = source.evaluate(&orbital, 2e-11, 3e-11, 1e-11);
        assert_eq!(value, source.evaluate(&orbital, 2e-11, -3e-11, -1e-11));
    }

    #[test]
    fn test_invalid_step_is_rejected() {
        let params = ModelParameters::default();
        let orbital = MolecularOrbital::new(State::Bonding, &params);
        let result = LaplacianSource::prepare(
            LaplacianMethod::FiniteDifference { step: 0.0 },
            &orbital,
            &params,
        );
        assert!(matches!(result, Err(LcaoError::InvalidConfig { .. })));
    }
}
