/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

use approx::assert_relative_eq;
use feff_io::utils::{
    angstrom_to_bohr, angstrom_to_bohr_vec, bohr_to_angstrom, bohr_to_angstrom_vec, constants,
};

#[test]
fn test_length_conversions() {
    let angstrom = 2.5;
    let bohr = angstrom_to_bohr(angstrom);

    assert_relative_eq!(bohr_to_angstrom(bohr), angstrom, epsilon = 1e-10);
    assert_relative_eq!(bohr, angstrom / constants::BOHR_RADIUS, epsilon = 1e-10);
    assert_relative_eq!(bohr_to_angstrom(1.0), 0.529177210903);
}

#[test]
fn test_vector_conversions() {
    let bohr = angstrom_to_bohr_vec([0.0, 1.0, -3.0]);
    assert_eq!(bohr[0], 0.0);
    assert_relative_eq!(bohr[2], -3.0 / constants::BOHR_RADIUS, epsilon = 1e-12);

    let back = bohr_to_angstrom_vec(bohr);
    assert_relative_eq!(back[1], 1.0, epsilon = 1e-12);
    assert_relative_eq!(back[2], -3.0, epsilon = 1e-12);
}
