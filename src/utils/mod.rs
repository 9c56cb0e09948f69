/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Units and constants used throughout the crate

pub mod constants;
pub mod conversions;

pub use conversions::{
    angstrom_to_bohr, angstrom_to_bohr_vec, bohr_to_angstrom, bohr_to_angstrom_vec,
};
