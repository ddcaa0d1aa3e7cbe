//! The local energy density `psi H psi` and the unit rescaling adapter.

use super::laplacian::{LaplacianMethod, LaplacianSource};
use super::potential::CoulombPotential;
use super::wavefunction::{MolecularOrbital, State};
use crate::config::Config;
use crate::error::LcaoError;
use crate::types::ScalarField;

/// `E(x, y, z) = psi (-hbar^2 / (2 m_e) lap psi + U psi)` in J/m^3.
///
/// Its integral over space is the energy expectation value of a normalized state.
#[derive(Debug, Clone)]
pub struct EnergyDensity {
    orbital: MolecularOrbital,
    potential: CoulombPotential,
    laplacian: LaplacianSource,
    kinetic_prefactor: f64,
    name: String,
}

impl EnergyDensity {
    /// The energy density of `state` with its configured normalization.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`LaplacianSource::prepare`].
    pub fn new(state: State, config: &Config, method: LaplacianMethod) -> Result<Self, LcaoError> {
        Self::for_orbital(MolecularOrbital::new(state, &config.model), config, method)
    }

    pub fn for_orbital(
        orbital: MolecularOrbital,
        config: &Config,
        method: LaplacianMethod,
    ) -> Result<Self, LcaoError> {
        let laplacian = LaplacianSource::prepare(method, &orbital, &config.model)?;
        Ok(Self {
            orbital,
            potential: CoulombPotential::new(config),
            laplacian,
            kinetic_prefactor: config.constants.kinetic_prefactor(),
            name: format!("{} energy density", orbital.state()),
        })
    }

    pub fn orbital(&self) -> &MolecularOrbital {
        &self.orbital
    }
}

impl ScalarField for EnergyDensity {
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn evaluate(&self, x: f64, y: f64, z: f64) -> f64 {
        let psi = self.orbital.psi(x, y, z);
        let laplacian = self.laplacian.evaluate(&self.orbital, x, y, z);
        let potential = self.potential.evaluate(x, y, z);
        psi * (-self.kinetic_prefactor * laplacian + potential * psi)
    }

    fn singular_points(&self) -> Vec<[f64; 3]> {
        self.orbital.centers().to_vec()
    }
}

/// `E_bonding` with the configured normalization and the analytic Laplacian.
pub fn energy_density_bonding(config: &Config) -> Result<EnergyDensity, LcaoError> {
    EnergyDensity::new(State::Bonding, config, LaplacianMethod::Analytic)
}

/// `E_antibonding` with the configured normalization and the analytic Laplacian.
pub fn energy_density_antibonding(config: &Config) -> Result<EnergyDensity, LcaoError> {
    EnergyDensity::new(State::Antibonding, config, LaplacianMethod::Analytic)
}

/// Evaluates `factor * s^3 * f(s x, s y, s z)`.
///
/// Integrating this over a domain divided by `s` gives `factor` times the integral of `f`
/// over the original domain. With `s` the orbital length, the integrand and the integral
/// are of order one, so absolute tolerances keep their meaning.
///
/// # Examples
///
/// ```
/// use lcao::model::Rescaled;
/// use lcao::{FnField, IntegrationDomain, Integrator};
///
/// let field = FnField::new("one", |_x: f64, _y: f64, _z: f64| 1.0);
/// let domain = IntegrationDomain::cube(1.0e-9).unwrap();
///
/// let rescaled = Rescaled::new(&field, 1.0e-10, 2.0);
/// let result = Integrator::new()
///     .integrate(&rescaled, &domain.scaled_down(1.0e-10))
///     .unwrap();
/// assert!((result.value - 2.0 * domain.volume()).abs() < 1e-35);
/// ```
#[derive(Debug, Clone)]
pub struct Rescaled<F> {
    inner: F,
    length: f64,
    weight: f64,
}

impl<F: ScalarField> Rescaled<F> {
    pub fn new(inner: F, length: f64, factor: f64) -> Self {
        Self {
            inner,
            length,
            weight: factor * length * length * length,
        }
    }
}

impl<F: ScalarField> ScalarField for Rescaled<F> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    #[inline(always)]
    fn evaluate(&self, x: f64, y: f64, z: f64) -> f64 {
        let s = self.length;
        self.weight * self.inner.evaluate(s * x, s * y, s * z)
    }

    fn singular_points(&self) -> Vec<[f64; 3]> {
        self.inner
            .singular_points()
            .into_iter()
            .map(|p| p.map(|c| c / self.length))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelParameters;
    use crate::types::FnField;
    use approx::assert_relative_eq;

    #[test]
    fn test_energy_density_combines_kinetic_and_potential_terms() {
        let config = Config::default();
        let density = energy_density_bonding(&config).unwrap();
        let orbital = density.orbital();
        let (x, y, z) = (2.0e-11, 1.0e-11, -3.0e-11);

        let psi = orbital.psi(x, y, z);
        let kinetic = -config.constants.kinetic_prefactor() * orbital.laplacian(x, y, z);
        let potential = CoulombPotential::new(&config).evaluate(x, y, z);
        assert_relative_eq!(
            density.evaluate(x, y, z),
            psi * (kinetic + potential * psi),
            max_relative = 1e-14
        );
    }

    #[test]
    fn test_energy_density_at_centers_is_finite() {
        let config = Config::default();
        let separation = config.model.separation;
        for density in [
            energy_density_bonding(&config).unwrap(),
            energy_density_antibonding(&config).unwrap(),
        ] {
            assert_eq!(density.evaluate(0.0, 0.0, 0.0), 0.0);
            assert_eq!(density.evaluate(separation, 0.0, 0.0), 0.0);
        }
    }

    #[test]
    fn test_energy_density_depends_on_laplacian_method_only_through_laplacian() {
        let config = Config::default();
        let analytic = EnergyDensity::new(State::Antibonding, &config, LaplacianMethod::Analytic)
            .unwrap();
        let symbolic = EnergyDensity::new(State::Antibonding, &config, LaplacianMethod::Symbolic)
            .unwrap();
        let (x, y, z) = (-2.0e-11, 4.0e-11, 1.0e-11);
        assert_relative_eq!(
            symbolic.evaluate(x, y, z),
            analytic.evaluate(x, y, z),
            max_relative = 1e-9
        );
        assert_eq!(analytic.name(), "antibonding energy density");
    }

    #[test]
    fn test_rescaled_evaluates_scaled_point() {
        let field = FnField::new("linear", |x: f64, y: f64, z: f64| x + 2.0 * y + 3.0 * z);
        let rescaled = Rescaled::new(&field, 2.0, 0.5);
        // 0.5 * 8 * (2 + 4 + 6)
        assert_eq!(rescaled.evaluate(1.0, 1.0, 1.0), 48.0);
        assert_eq!(rescaled.name(), "linear");
    }

    #[test]
    fn test_rescaled_singular_points_are_in_scaled_units() {
        let config = Config::default();
        let a = config.model.bohr_radius;
        let density = energy_density_bonding(&config).unwrap();
        let rescaled = Rescaled::new(&density, a, 1.0);

        let points = rescaled.singular_points();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], [0.0, 0.0, 0.0]);
        assert_relative_eq!(points[1][0], config.model.separation / a, epsilon = 1e-12);
        assert_eq!(rescaled.evaluate(points[0][0], 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_for_orbital_keeps_custom_normalization() {
        let config = Config::default();
        let params = ModelParameters::default();
        let orbital = MolecularOrbital::unnormalized(State::Bonding, &params);
        let density =
            EnergyDensity::for_orbital(orbital, &config, LaplacianMethod::Analytic).unwrap();
        assert_eq!(density.orbital().normalization(), 1.0);
    }
}
