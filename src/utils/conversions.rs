/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Unit conversion utilities

use super::constants;

/// Convert from Angstroms to Bohr radii
pub fn angstrom_to_bohr(angstrom: f64) -> f64 {
    angstrom / constants::BOHR_RADIUS
}

/// Convert from Bohr radii to Angstroms
pub fn bohr_to_angstrom(bohr: f64) -> f64 {
    bohr * constants::BOHR_RADIUS
}

/// Convert every component of a vector from Bohr to Angstrom
pub fn bohr_to_angstrom_vec(bohr: [f64; 3]) -> [f64; 3] {
    bohr.map(bohr_to_angstrom)
}

/// Convert every component of a vector from Angstrom to Bohr
pub fn angstrom_to_bohr_vec(angstrom: [f64; 3]) -> [f64; 3] {
    angstrom.map(angstrom_to_bohr)
}
