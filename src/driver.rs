//! Expectation values of the two trial states.
//!
//! A [`Calculation`] ties a [`Config`] to an [`Integrator`] and a Laplacian method. It
//! integrates the energy density or the probability density of a state over the
//! configured box and reports the outcome with its error estimate and convergence state.
//!
//! All integrals run in units of the orbital length `a` (see [`Rescaled`]); the reported
//! numbers are in the physical units of the configuration.

use crate::{
    config::Config,
    error::LcaoError,
    model::{EnergyDensity, LaplacianMethod, MolecularOrbital, ProbabilityDensity, Rescaled, State},
    quadrature::{Integrator, QuadratureOptions},
    types::{IntegrationResult, ScalarField},
};
use serde::Serialize;
use log::info;

/// Which probability density a normalization check integrates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DensityKind {
    /// `psi^2` with the configured normalization constant. Integrates to about one.
    Normalized,
    /// `psi^2` with `c = 1`. Its integral determines the normalization constant.
    Raw,
}

/// The energy expectation value of one state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergyReport {
    pub state: State,
    pub laplacian: LaplacianMethod,
    /// Energy in electron volts.
    pub energy_ev: f64,
    /// Absolute error estimate in electron volts.
    pub error_ev: f64,
    /// Energy in joules.
    pub energy_joule: f64,
    pub converged: bool,
    pub evaluations: u64,
}

/// The integral of a probability density over the box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizationReport {
    pub state: State,
    pub kind: DensityKind,
    pub integral: f64,
    pub error: f64,
    /// The normalization constant used for the density.
    pub normalization: f64,
    /// The constant configured for the state, whichever density was integrated.
    pub configured_normalization: f64,
    /// `1 / sqrt(integral)`, the constant that would normalize the raw density.
    ///
    /// Only present for [`DensityKind::Raw`].
    pub implied_normalization: Option<f64>,
    pub converged: bool,
    pub evaluations: u64,
}

/// Energy and normalization calculations for one configuration.
pub struct Calculation<'c> {
    config: &'c Config,
    integrator: Integrator,
    laplacian: LaplacianMethod,
    strict: bool,
}

impl<'c> Calculation<'c> {
    /// Creates a calculation with default quadrature options and the analytic Laplacian.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use lcao::{Calculation, State, get_default_config};
    ///
    /// let report = Calculation::new(get_default_config())
    ///     .energy(State::Bonding)
    ///     .unwrap();
    /// println!("{:.3} eV +/- {:.1e}", report.energy_ev, report.error_ev);
    /// ```
    pub fn new(config: &'c Config) -> Self {
        Self {
            config,
            integrator: Integrator::new(),
            laplacian: LaplacianMethod::default(),
            strict: false,
        }
    }

    pub fn with_options(mut self, options: QuadratureOptions) -> Self {
        self.integrator = self.integrator.with_options(options);
        self
    }

    pub fn with_laplacian(mut self, method: LaplacianMethod) -> Self {
        self.laplacian = method;
        self
    }

    /// With `strict` set, a result that misses its tolerance fails with
    /// `LcaoError::NotConverged` instead of being returned with `converged == false`.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    pub fn options(&self) -> &QuadratureOptions {
        self.integrator.options()
    }

    /// Integrates the energy density of `state` and converts the result to electron volts.
    ///
    /// # Errors
    ///
    /// Returns `LcaoError::InvalidConfig` or `LcaoError::InvalidDomain` for invalid
    /// options or configuration, and `LcaoError::NotConverged` in strict mode.
    pub fn energy(&self, state: State) -> Result<EnergyReport, LcaoError> {
        self.config.validate()?;
        let density = EnergyDensity::new(state, self.config, self.laplacian)?;
        let ev_per_joule = self.config.units.ev_per_joule;
        let result = self.integrate_scaled(&density, ev_per_joule)?;

        info!(
            "{} energy ({} Laplacian): {:.6} eV (error {:.2e} eV, converged: {})",
            state, self.laplacian, result.value, result.error, result.converged
        );

        Ok(EnergyReport {
            state,
            laplacian: self.laplacian,
            energy_ev: result.value,
            error_ev: result.error,
            energy_joule: result.value / ev_per_joule,
            converged: result.converged,
            evaluations: result.evaluations,
        })
    }

    /// The energies of the bonding and the antibonding state, in that order.
    pub fn energies(&self) -> Result<[EnergyReport; 2], LcaoError> {
        Ok([self.energy(State::Bonding)?, self.energy(State::Antibonding)?])
    }

    /// Integrates the probability density of `state` over the box.
    pub fn normalization(
        &self,
        state: State,
        kind: DensityKind,
    ) -> Result<NormalizationReport, LcaoError> {
        self.config.validate()?;
        let orbital = match kind {
            DensityKind::Normalized => MolecularOrbital::new(state, &self.config.model),
            DensityKind::Raw => MolecularOrbital::unnormalized(state, &self.config.model),
        };
        let density = ProbabilityDensity::new(orbital);
        let result = self.integrate_scaled(&density, 1.0)?;

        let implied_normalization = match kind {
            DensityKind::Raw if result.value > 0.0 => Some(1.0 / result.value.sqrt()),
            _ => None,
        };

        info!(
            "{} {:?} density integral: {:.6} (error {:.2e}, converged: {})",
            state, kind, result.value, result.error, result.converged
        );

        Ok(NormalizationReport {
            state,
            kind,
            integral: result.value,
            error: result.error,
            normalization: orbital.normalization(),
            configured_normalization: state.normalization(&self.config.model),
            implied_normalization,
            converged: result.converged,
            evaluations: result.evaluations,
        })
    }

    /// Normalization checks of both states, bonding first.
    pub fn normalizations(&self, kind: DensityKind) -> Result<[NormalizationReport; 2], LcaoError> {
        Ok([
            self.normalization(State::Bonding, kind)?,
            self.normalization(State::Antibonding, kind)?,
        ])
    }

    /// Integrates `factor * field` over the configured box in units of the orbital length.
    fn integrate_scaled<F: ScalarField>(
        &self,
        field: &F,
        factor: f64,
    ) -> Result<IntegrationResult, LcaoError> {
        let length = self.config.model.bohr_radius;
        let domain = self.config.integration_domain()?.scaled_down(length);
        let result = self
            .integrator
            .integrate(&Rescaled::new(field, length, factor), &domain)?;

        if self.strict {
            result.into_converged()
        } else {
            Ok(result)
        }
    }
}
