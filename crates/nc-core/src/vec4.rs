//! Minimal four-vector type for event kinematics.
//!
//! Canonical momenta are stored in MeV. Only the handful of operations the
//! event model needs are provided; this is not a general linear-algebra
//! type.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A (px, py, pz, E) four-vector with the (-,-,-,+) metric.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FourVector {
    /// x momentum component.
    pub px: f64,
    /// y momentum component.
    pub py: f64,
    /// z momentum component.
    pub pz: f64,
    /// Energy.
    pub e: f64,
}

impl FourVector {
    /// Build from components.
    pub fn new(px: f64, py: f64, pz: f64, e: f64) -> Self {
        Self { px, py, pz, e }
    }

    /// Squared magnitude of the 3-momentum.
    pub fn p2(&self) -> f64 {
        self.px * self.px + self.py * self.py + self.pz * self.pz
    }

    /// Magnitude of the 3-momentum.
    pub fn p(&self) -> f64 {
        self.p2().sqrt()
    }

    /// Minkowski inner product with another four-vector.
    pub fn dot(&self, other: &FourVector) -> f64 {
        self.e * other.e - self.px * other.px - self.py * other.py - self.pz * other.pz
    }

    /// Invariant mass squared (may be negative for spacelike vectors).
    pub fn m2(&self) -> f64 {
        self.dot(self)
    }

    /// Invariant mass; 0 for spacelike vectors.
    pub fn m(&self) -> f64 {
        self.m2().max(0.0).sqrt()
    }

    /// Scale the 3-momentum to magnitude `p`, keeping the direction and
    /// leaving the energy untouched. No-op on a zero 3-momentum.
    pub fn with_p(&self, p: f64) -> Self {
        let cur = self.p();
        if cur == 0.0 {
            return *self;
        }
        let f = p / cur;
        Self { px: self.px * f, py: self.py * f, pz: self.pz * f, e: self.e }
    }
}

impl From<[f64; 4]> for FourVector {
    fn from(v: [f64; 4]) -> Self {
        Self { px: v[0], py: v[1], pz: v[2], e: v[3] }
    }
}

impl From<FourVector> for [f64; 4] {
    fn from(v: FourVector) -> Self {
        [v.px, v.py, v.pz, v.e]
    }
}

impl Sub for FourVector {
    type Output = FourVector;
    fn sub(self, rhs: FourVector) -> FourVector {
        FourVector::new(self.px - rhs.px, self.py - rhs.py, self.pz - rhs.pz, self.e - rhs.e)
    }
}

impl Add for FourVector {
    type Output = FourVector;
    fn add(self, rhs: FourVector) -> FourVector {
        FourVector::new(self.px + rhs.px, self.py + rhs.py, self.pz + rhs.pz, self.e + rhs.e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn momentum_and_mass() {
        let v = FourVector::new(3.0, 4.0, 0.0, 13.0);
        assert_relative_eq!(v.p(), 5.0);
        assert_relative_eq!(v.m2(), 13.0 * 13.0 - 25.0);
    }

    #[test]
    fn q2_style_difference_is_spacelike() {
        let nu = FourVector::new(0.0, 0.0, 1000.0, 1000.0);
        let mu = FourVector::new(100.0, 0.0, 800.0, 815.0);
        let q = mu - nu;
        assert!(q.m2() < 0.0);
    }

    #[test]
    fn with_p_preserves_direction() {
        let v = FourVector::new(0.0, 3.0, 4.0, 10.0);
        let w = v.with_p(10.0);
        assert_relative_eq!(w.p(), 10.0);
        assert_relative_eq!(w.py / w.pz, 3.0 / 4.0);
        assert_relative_eq!(w.e, 10.0);
    }
}
