//! Electrostatic attraction of the electron to the two nuclei.

use crate::config::Config;
use crate::types::ScalarField;

/// `U = -e^2 / (4 pi eps0) (1/r1 + 1/r2)` for nuclei at the origin and at `(L, 0, 0)`.
///
/// Exactly at a nucleus the potential is defined as zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoulombPotential {
    coupling: f64,
    separation: f64,
}

impl CoulombPotential {
    pub fn new(config: &Config) -> Self {
        Self {
            coupling: config.constants.coulomb_coupling(),
            separation: config.model.separation,
        }
    }

    #[inline]
    pub fn evaluate(&self, x: f64, y: f64, z: f64) -> f64 {
        if y == 0.0 && z == 0.0 && (x == 0.0 || x == self.separation) {
            return 0.0;
        }
        let transverse = y * y + z * z;
        let r1 = (x * x + transverse).sqrt();
        let dx = x - self.separation;
        let r2 = (dx * dx + transverse).sqrt();
        -self.coupling * (1.0 / r1 + 1.0 / r2)
    }
}

impl ScalarField for CoulombPotential {
    fn name(&self) -> &str {
        "coulomb potential"
    }

    #[inline]
    fn evaluate(&self, x: f64, y: f64, z: f64) -> f64 {
        CoulombPotential::evaluate(self, x, y, z)
    }

    fn singular_points(&self) -> Vec<[f64; 3]> {
        vec![[0.0, 0.0, 0.0], [self.separation, 0.0, 0.0]]
    }
}
