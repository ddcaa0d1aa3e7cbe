//! Symbolic Laplacians of the two-center trial states.
//!
//! The trial states are written as expressions in `x`, `y`, `z`, the orbital length `a`
//! and the separation `L`, then differentiated twice along each axis. The result can be
//! printed for inspection, or bound to concrete model parameters and evaluated at runtime
//! through [`CompiledLaplacian`], so no hand-copied formula sits between the derivation and
//! the integrand.

use super::expr::Expr;
use crate::config::ModelParameters;
use crate::error::LcaoError;
use crate::model::State;
use std::f64::consts::PI;

/// The Cartesian coordinates, in differentiation order.
pub const SPATIAL_VARIABLES: [&str; 3] = ["x", "y", "z"];

/// Name of the orbital length symbol.
pub const LENGTH_SYMBOL: &str = "a";

/// Name of the center separation symbol.
pub const SEPARATION_SYMBOL: &str = "L";

/// The 1s orbital `pi^(-1/2) a^(-3/2) exp(-r/a)` centered at the origin, or at `(L, 0, 0)`
/// when `shifted` is set.
pub fn orbital_expr(shifted: bool) -> Expr {
    let x = if shifted {
        Expr::var("x") - Expr::var(SEPARATION_SYMBOL)
    } else {
        Expr::var("x")
    };
    let r = (x.powf(2.0) + Expr::var("y").powf(2.0) + Expr::var("z").powf(2.0)).sqrt();
    let a = Expr::var(LENGTH_SYMBOL);

    Expr::constant(1.0 / PI.sqrt()) * a.clone().powf(-1.5) * (-(r / a)).exp()
}

/// `c (phi_0 + phi_L)` for the bonding state, `c (phi_0 - phi_L)` for the antibonding one.
pub fn molecular_orbital_expr(state: State, normalization: f64) -> Expr {
    let combination = match state {
        State::Bonding => orbital_expr(false) + orbital_expr(true),
        State::Antibonding => orbital_expr(false) - orbital_expr(true),
    };
    Expr::constant(normalization) * combination
}

/// The sum of the unmixed second derivatives of `expr` with respect to `variables`.
pub fn laplacian(expr: &Expr, variables: &[&str]) -> Expr {
    variables
        .iter()
        .map(|var| expr.diff(var).diff(var))
        .reduce(|acc, term| acc + term)
        .unwrap_or(Expr::Const(0.0))
        .simplify()
}

/// The Laplacian of a trial state, still in terms of `a` and `L`.
///
/// # Examples
///
/// ```
/// use lcao::model::State;
/// use lcao::symbolic::derive_laplacian;
///
/// let expr = derive_laplacian(State::Bonding, 0.562);
/// assert_eq!(expr.variables(), vec!["L", "a", "x", "y", "z"]);
/// ```
pub fn derive_laplacian(state: State, normalization: f64) -> Expr {
    laplacian(
        &molecular_orbital_expr(state, normalization),
        &SPATIAL_VARIABLES,
    )
}

/// A derived Laplacian with the model parameters substituted, ready for evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledLaplacian {
    expr: Expr,
}

impl CompiledLaplacian {
    /// Derives the Laplacian of `state` and binds `a`, `L` and the state's normalization
    /// from `params`.
    ///
    /// # Errors
    ///
    /// Returns `LcaoError::UnboundVariable` if anything other than the spatial coordinates
    /// is left free after substitution.
    pub fn new(state: State, params: &ModelParameters) -> Result<Self, LcaoError> {
        Self::with_normalization(state, state.normalization(params), params)
    }

    pub fn with_normalization(
        state: State,
        normalization: f64,
        params: &ModelParameters,
    ) -> Result<Self, LcaoError> {
        let expr = derive_laplacian(state, normalization)
            .substitute(LENGTH_SYMBOL, params.bohr_radius)
            .substitute(SEPARATION_SYMBOL, params.separation);

        if let Some(free) = expr
            .variables()
            .into_iter()
            .find(|name| !SPATIAL_VARIABLES.contains(&name.as_str()))
        {
            return Err(LcaoError::UnboundVariable(free));
        }

        Ok(Self { expr })
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Evaluates the Laplacian at `(x, y, z)`.
    ///
    /// At either center the expression divides by zero and the result is not finite.
    pub fn evaluate(&self, x: f64, y: f64, z: f64) -> f64 {
        self.expr
            .eval(&[("x", x), ("y", y), ("z", z)])
            .unwrap_or(f64::NAN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn atomic_units() -> ModelParameters {
        ModelParameters {
            bohr_radius: 1.0,
            separation: 2.0,
            bonding_normalization: 0.562,
            antibonding_normalization: 1.10,
        }
    }

    #[test]
    fn test_orbital_expression_value() {
        let phi = orbital_expr(true)
            .substitute(LENGTH_SYMBOL, 1.0)
            .substitute(SEPARATION_SYMBOL, 2.0);
        let value = phi.eval(&[("x", 2.0), ("y", 0.0), ("z", 1.0)]).unwrap();
        assert_relative_eq!(value, (-1.0f64).exp() / PI.sqrt(), epsilon = 1e-14);
    }

    #[test]
    fn test_single_orbital_laplacian_matches_radial_formula() {
        // Laplacian of exp(-r/a) / sqrt(pi a^3) is (1/a^2 - 2/(a r)) times the orbital.
        let lap = laplacian(&orbital_expr(false), &SPATIAL_VARIABLES).substitute(LENGTH_SYMBOL, 1.5);
        let (x, y, z): (f64, f64, f64) = (0.3, -1.2, 0.8);
        let r = (x * x + y * y + z * z).sqrt();
        let phi = (-r / 1.5).exp() / (PI.sqrt() * 1.5f64.powf(1.5));
        let expected = (1.0 / 2.25 - 2.0 / (1.5 * r)) * phi;

        let value = lap.eval(&[("x", x), ("y", y), ("z", z)]).unwrap();
        assert_relative_eq!(value, expected, max_relative = 1e-12);
    }

    #[test]
    fn test_compiled_laplacian_only_depends_on_coordinates() {
        let compiled = CompiledLaplacian::new(State::Antibonding, &atomic_units()).unwrap();
        assert_eq!(compiled.expr().variables(), vec!["x", "y", "z"]);
        assert!(compiled.evaluate(0.4, 0.5, -0.6).is_finite());
    }

    #[test]
    fn test_compiled_laplacian_is_not_finite_at_center() {
        let compiled = CompiledLaplacian::new(State::Bonding, &atomic_units()).unwrap();
        assert!(!compiled.evaluate(0.0, 0.0, 0.0).is_finite());
    }

    #[test]
    fn test_antibonding_laplacian_is_odd_about_midpoint() {
        let compiled = CompiledLaplacian::new(State::Antibonding, &atomic_units()).unwrap();
        let left = compiled.evaluate(0.3, 0.7, 0.2);
        let right = compiled.evaluate(2.0 - 0.3, 0.7, 0.2);
        assert_relative_eq!(left, -right, max_relative = 1e-12);
    }

    #[test]
    fn test_derived_laplacian_prints_in_model_symbols() {
        let printed = derive_laplacian(State::Bonding, 0.562).to_string();
        assert!(printed.contains("exp("));
        assert!(printed.contains("sqrt("));
        assert!(printed.contains("x - L"));
        assert!(printed.contains("a**(-1.5)"));
    }
}
