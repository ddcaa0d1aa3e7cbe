//! Bonding and antibonding combinations of two 1s orbitals and their densities.

use super::orbital::SlaterOrbital;
use crate::config::ModelParameters;
use crate::types::ScalarField;
use serde::Serialize;
use std::fmt;

/// The two trial states of the two-center model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    /// `phi_0 + phi_L`.
    Bonding,
    /// `phi_0 - phi_L`.
    Antibonding,
}

impl State {
    pub const ALL: [State; 2] = [State::Bonding, State::Antibonding];

    /// `+1` for the bonding state, `-1` for the antibonding state.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            State::Bonding => 1.0,
            State::Antibonding => -1.0,
        }
    }

    /// The configured normalization constant of this state.
    pub fn normalization(self, params: &ModelParameters) -> f64 {
        match self {
            State::Bonding => params.bonding_normalization,
            State::Antibonding => params.antibonding_normalization,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            State::Bonding => "bonding",
            State::Antibonding => "antibonding",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `psi = c (phi_0 +- phi_L)` with one orbital at the origin and one at `(L, 0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MolecularOrbital {
    state: State,
    normalization: f64,
    first: SlaterOrbital,
    second: SlaterOrbital,
}

impl MolecularOrbital {
    /// The state with its configured normalization constant.
    ///
    /// # Examples
    ///
    /// ```
    /// use lcao::config::ModelParameters;
    /// use lcao::model::{MolecularOrbital, State};
    ///
    /// let params = ModelParameters::default();
    /// let psi = MolecularOrbital::new(State::Antibonding, &params);
    ///
    /// // The antisymmetric state has a node on the plane between the centers.
    /// let midpoint = 0.5 * params.separation;
    /// assert!(psi.psi(midpoint, 1.0e-11, 0.0).abs() < 1e-3);
    /// ```
    pub fn new(state: State, params: &ModelParameters) -> Self {
        Self::with_normalization(state, state.normalization(params), params)
    }

    /// The state with `c = 1`, as used to determine the normalization constant.
    pub fn unnormalized(state: State, params: &ModelParameters) -> Self {
        Self::with_normalization(state, 1.0, params)
    }

    pub fn with_normalization(state: State, normalization: f64, params: &ModelParameters) -> Self {
        Self {
            state,
            normalization,
            first: SlaterOrbital::new(0.0, params.bohr_radius),
            second: SlaterOrbital::new(params.separation, params.bohr_radius),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn normalization(&self) -> f64 {
        self.normalization
    }

    pub fn orbitals(&self) -> (&SlaterOrbital, &SlaterOrbital) {
        (&self.first, &self.second)
    }

    #[inline]
    pub fn psi(&self, x: f64, y: f64, z: f64) -> f64 {
        self.normalization
            * (self.first.value(x, y, z) + self.state.sign() * self.second.value(x, y, z))
    }

    /// `P = psi^2`.
    #[inline]
    pub fn probability_density(&self, x: f64, y: f64, z: f64) -> f64 {
        let psi = self.psi(x, y, z);
        psi * psi
    }

    /// The exact Laplacian of `psi`, zero at either center.
    #[inline]
    pub fn laplacian(&self, x: f64, y: f64, z: f64) -> f64 {
        if self.is_at_center(x, y, z) {
            return 0.0;
        }
        self.normalization
            * (self.first.laplacian(x, y, z) + self.state.sign() * self.second.laplacian(x, y, z))
    }

    /// The positions of the two centers, where `psi` has its cusps.
    pub fn centers(&self) -> [[f64; 3]; 2] {
        [
            [self.first.center, 0.0, 0.0],
            [self.second.center, 0.0, 0.0],
        ]
    }

    /// Whether `(x, y, z)` coincides exactly with one of the two centers.
    #[inline(always)]
    pub fn is_at_center(&self, x: f64, y: f64, z: f64) -> bool {
        self.first.is_at_center(x, y, z) || self.second.is_at_center(x, y, z)
    }
}

/// `psi_bonding(x, y, z)` with the configured normalization.
pub fn psi_bonding(params: &ModelParameters, x: f64, y: f64, z: f64) -> f64 {
    MolecularOrbital::new(State::Bonding, params).psi(x, y, z)
}

/// `psi_antibonding(x, y, z)` with the configured normalization.
pub fn psi_antibonding(params: &ModelParameters, x: f64, y: f64, z: f64) -> f64 {
    MolecularOrbital::new(State::Antibonding, params).psi(x, y, z)
}

/// The probability density of a molecular orbital as an integrable field.
#[derive(Debug, Clone)]
pub struct ProbabilityDensity {
    orbital: MolecularOrbital,
    name: String,
}

impl ProbabilityDensity {
    pub fn new(orbital: MolecularOrbital) -> Self {
        let name = if orbital.normalization() == 1.0 {
            format!("raw {} density", orbital.state())
        } else {
            format!("{} density", orbital.state())
        };
        Self { orbital, name }
    }

    /// `P_bonding` with the configured normalization.
    pub fn bonding(params: &ModelParameters) -> Self {
        Self::new(MolecularOrbital::new(State::Bonding, params))
    }

    /// `P_antibonding` with the configured normalization.
    pub fn antibonding(params: &ModelParameters) -> Self {
        Self::new(MolecularOrbital::new(State::Antibonding, params))
    }

    pub fn orbital(&self) -> &MolecularOrbital {
        &self.orbital
    }
}

impl ScalarField for ProbabilityDensity {
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn evaluate(&self, x: f64, y: f64, z: f64) -> f64 {
        self.orbital.probability_density(x, y, z)
    }

    fn singular_points(&self) -> Vec<[f64; 3]> {
        self.orbital.centers().to_vec()
    }
}
