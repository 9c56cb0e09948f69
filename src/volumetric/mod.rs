/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Volumetric grid data

pub mod cube;
pub mod errors;

pub use cube::{CubeAtom, VolumetricData};
pub use errors::{Result, VolumetricError};
