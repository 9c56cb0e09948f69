/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Physical constants shared by the file formats

/// Bohr radius in Angstrom (CODATA 2018)
pub const BOHR_RADIUS: f64 = 0.529177210903;
