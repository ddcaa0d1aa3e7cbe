//! Hydrogen-like 1s Slater orbitals.

use std::f64::consts::PI;

/// A normalized 1s orbital `pi^(-1/2) a^(-3/2) exp(-r/a)` centered on the x axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlaterOrbital {
    /// x coordinate of the center; the center always lies on the x axis.
    pub center: f64,
    /// Orbital length `a`.
    pub length: f64,
    prefactor: f64,
}

impl SlaterOrbital {
    pub fn new(center: f64, length: f64) -> Self {
        Self {
            center,
            length,
            prefactor: 1.0 / (PI.sqrt() * length.powf(1.5)),
        }
    }

    /// Distance from `(x, y, z)` to the center.
    #[inline(always)]
    pub fn distance(&self, x: f64, y: f64, z: f64) -> f64 {
        let dx = x - self.center;
        (dx * dx + y * y + z * z).sqrt()
    }

    #[inline(always)]
    pub fn is_at_center(&self, x: f64, y: f64, z: f64) -> bool {
        x == self.center && y == 0.0 && z == 0.0
    }

    #[inline]
    pub fn value(&self, x: f64, y: f64, z: f64) -> f64 {
        self.prefactor * (-self.distance(x, y, z) / self.length).exp()
    }

    /// The exact Laplacian `(1/a^2 - 2/(a r)) phi(r)`.
    ///
    /// Diverges to negative infinity at the center, where the cusp of the orbital sits.
    #[inline]
    pub fn laplacian(&self, x: f64, y: f64, z: f64) -> f64 {
        let r = self.distance(x, y, z);
        let a = self.length;
        (1.0 / (a * a) - 2.0 / (a * r)) * self.prefactor * (-r / a).exp()
    }
}
