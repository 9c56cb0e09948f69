/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! FEFF output files
//!
//! The absorption spectrum in xmu.dat and the projected densities of
//! states with charge transfer in ldosNN.dat, each read together with the
//! feff.inp of the run.

pub mod errors;
pub mod ldos;
mod table;
pub mod xmu;

pub use errors::{OutputError, Result};
pub use ldos::{LDos, PotentialCharge, ORBITALS};
pub use xmu::Xmu;
