/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Periodic lattice with row-vector basis

use super::errors::{AtomError, Result};
use super::vector::Vector3D;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// Crystal lattice; rows of `matrix` are the a, b and c vectors in Angstrom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    matrix: [[f64; 3]; 3],
}

impl Lattice {
    /// Create a lattice from its three row vectors
    pub fn new(matrix: [[f64; 3]; 3]) -> Result<Self> {
        let lattice = Self { matrix };
        if lattice.volume() < 1e-10 {
            return Err(AtomError::InvalidLattice(format!(
                "lattice vectors are degenerate: {:?}",
                matrix
            )));
        }
        Ok(lattice)
    }

    /// Create a lattice from cell lengths (Angstrom) and angles (degrees)
    ///
    /// `a` lies along x and `b` in the xy plane.
    pub fn from_parameters(
        a: f64,
        b: f64,
        c: f64,
        alpha: f64,
        beta: f64,
        gamma: f64,
    ) -> Result<Self> {
        let (cos_a, cos_b) = (alpha.to_radians().cos(), beta.to_radians().cos());
        let (sin_g, cos_g) = gamma.to_radians().sin_cos();
        if sin_g.abs() < 1e-12 {
            return Err(AtomError::InvalidLattice(format!(
                "gamma = {} degrees gives a degenerate cell",
                gamma
            )));
        }

        let c1 = c * cos_b;
        let c2 = c * (cos_a - cos_b * cos_g) / sin_g;
        let c3_sq = c * c - c1 * c1 - c2 * c2;
        if c3_sq <= 0.0 {
            return Err(AtomError::InvalidLattice(format!(
                "angles ({}, {}, {}) do not describe a cell",
                alpha, beta, gamma
            )));
        }

        Self::new([
            [a, 0.0, 0.0],
            [b * cos_g, b * sin_g, 0.0],
            [c1, c2, c3_sq.sqrt()],
        ])
    }

    /// Cubic lattice with edge `a`
    pub fn cubic(a: f64) -> Result<Self> {
        Self::new([[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]])
    }

    pub fn matrix(&self) -> &[[f64; 3]; 3] {
        &self.matrix
    }

    /// Lattice vector `i` (0 = a, 1 = b, 2 = c)
    pub fn vector(&self, i: usize) -> Vector3D {
        Vector3D::from_array(self.matrix[i])
    }

    /// Cell lengths a, b, c
    pub fn abc(&self) -> [f64; 3] {
        [
            self.vector(0).length(),
            self.vector(1).length(),
            self.vector(2).length(),
        ]
    }

    /// Cell angles alpha, beta, gamma in degrees
    pub fn angles(&self) -> [f64; 3] {
        let [a, b, c] = [self.vector(0), self.vector(1), self.vector(2)];
        let angle = |u: &Vector3D, v: &Vector3D| {
            (u.dot(v) / (u.length() * v.length()))
                .clamp(-1.0, 1.0)
                .acos()
                .to_degrees()
        };
        [angle(&b, &c), angle(&a, &c), angle(&a, &b)]
    }

    /// Cell volume in cubic Angstrom
    pub fn volume(&self) -> f64 {
        let [a, b, c] = [self.vector(0), self.vector(1), self.vector(2)];
        a.dot(&b.cross(&c)).abs()
    }

    /// Distances between adjacent lattice planes along each cell direction
    pub fn interplanar_spacings(&self) -> [f64; 3] {
        let [a, b, c] = [self.vector(0), self.vector(1), self.vector(2)];
        let volume = self.volume();
        [
            volume / b.cross(&c).length(),
            volume / c.cross(&a).length(),
            volume / a.cross(&b).length(),
        ]
    }

    fn as_matrix(&self) -> Matrix3<f64> {
        let m = &self.matrix;
        Matrix3::new(
            m[0][0], m[0][1], m[0][2], m[1][0], m[1][1], m[1][2], m[2][0], m[2][1], m[2][2],
        )
    }

    /// Convert fractional coordinates to Cartesian
    pub fn cartesian_coords(&self, frac: [f64; 3]) -> Vector3D {
        let cart = self.as_matrix().transpose() * Vector3::new(frac[0], frac[1], frac[2]);
        Vector3D::new(cart[0], cart[1], cart[2])
    }

    /// Convert Cartesian coordinates to fractional
    pub fn fractional_coords(&self, cart: &Vector3D) -> [f64; 3] {
        // The constructor rejects singular matrices, so the inverse exists
        let inverse = self
            .as_matrix()
            .transpose()
            .try_inverse()
            .unwrap_or_else(Matrix3::zeros);
        let frac = inverse * Vector3::new(cart.x, cart.y, cart.z);
        [frac[0], frac[1], frac[2]]
    }

    /// Lattice scaled so every vector is multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Result<Self> {
        let mut matrix = self.matrix;
        for row in matrix.iter_mut() {
            for value in row.iter_mut() {
                *value *= factor;
            }
        }
        Self::new(matrix)
    }

    /// Lattice parameters match within an absolute length and angle tolerance
    pub fn approx_eq(&self, other: &Self, length_tol: f64, angle_tol: f64) -> bool {
        let lengths = self
            .abc()
            .iter()
            .zip(other.abc().iter())
            .all(|(x, y)| (x - y).abs() <= length_tol);
        let angles = self
            .angles()
            .iter()
            .zip(other.angles().iter())
            .all(|(x, y)| (x - y).abs() <= angle_tol);
        lengths && angles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hexagonal_parameters() {
        let lattice = Lattice::from_parameters(3.297078, 3.297078, 5.254213, 90.0, 90.0, 120.0)
            .unwrap();
        let [a, b, c] = lattice.abc();
        assert_relative_eq!(a, 3.297078, epsilon = 1e-9);
        assert_relative_eq!(b, 3.297078, epsilon = 1e-9);
        assert_relative_eq!(c, 5.254213, epsilon = 1e-9);

        let [alpha, beta, gamma] = lattice.angles();
        assert_relative_eq!(alpha, 90.0, epsilon = 1e-9);
        assert_relative_eq!(beta, 90.0, epsilon = 1e-9);
        assert_relative_eq!(gamma, 120.0, epsilon = 1e-9);

        let expected = 3.297078_f64.powi(2) * 3.0_f64.sqrt() / 2.0 * 5.254213;
        assert_relative_eq!(lattice.volume(), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_fractional_cartesian_roundtrip() {
        let lattice = Lattice::from_parameters(4.0, 5.0, 6.0, 80.0, 95.0, 110.0).unwrap();
        let frac = [0.25, -0.5, 1.75];
        let cart = lattice.cartesian_coords(frac);
        let back = lattice.fractional_coords(&cart);
        for i in 0..3 {
            assert_relative_eq!(back[i], frac[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_degenerate_lattice() {
        assert!(Lattice::new([[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.0, 1.0]]).is_err());
        assert!(Lattice::from_parameters(1.0, 1.0, 1.0, 90.0, 90.0, 180.0).is_err());
    }

    #[test]
    fn test_interplanar_spacings_cubic() {
        let lattice = Lattice::cubic(3.5).unwrap();
        for d in lattice.interplanar_spacings() {
            assert_relative_eq!(d, 3.5, epsilon = 1e-12);
        }
    }
}
