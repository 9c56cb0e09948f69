/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Reciprocal-space k-point mesh

use crate::atoms::Lattice;

/// Subdivisions along each lattice vector for about `nkpts` k-points
///
/// The mesh is proportional to the inverse lattice lengths:
/// `k_i = round((nkpts * a * b * c)^(1/3) / |a_i|)`, at least 1. Ties
/// round away from zero.
pub fn kmesh(lattice: &Lattice, nkpts: usize) -> [i64; 3] {
    let abc = lattice.abc();
    let mult = (nkpts as f64 * abc[0] * abc[1] * abc[2]).cbrt();
    abc.map(|length| ((mult / length).round() as i64).max(1))
}
