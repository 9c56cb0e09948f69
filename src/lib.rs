/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! # feff-io
//!
//! FEFF input-set generation, FEFF deck and output parsing, and cube
//! volumetric I/O.
//!
//! - [`atoms`]: crystal structures and molecules with CIF and XYZ readers
//! - [`input`]: the FEFF deck formats (tags, HEADER, POTENTIALS, ATOMS)
//! - [`sets`]: XANES, EXAFS, ELNES and EXELFS input sets
//! - [`outputs`]: xmu.dat spectra and ldos densities of states
//! - [`volumetric`]: Gaussian cube files

pub mod atoms;
pub mod cli;
pub mod input;
pub mod outputs;
pub mod sets;
pub mod utils;
pub mod volumetric;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
