//! The two-center one-electron model.
//!
//! It includes the 1s Slater orbitals, their bonding and antibonding combinations with
//! the probability densities, the Coulomb potential of the two nuclei, the Laplacian
//! sources for the kinetic term and the energy density that the driver integrates.

pub mod hamiltonian;
pub mod laplacian;
pub mod orbital;
pub mod potential;
pub mod wavefunction;

pub use hamiltonian::{
    EnergyDensity, Rescaled, energy_density_antibonding, energy_density_bonding,
};
pub use laplacian::{LaplacianMethod, LaplacianSource};
pub use orbital::SlaterOrbital;
pub use potential::CoulombPotential;
pub use wavefunction::{
    MolecularOrbital, ProbabilityDensity, State, psi_antibonding, psi_bonding,
};
