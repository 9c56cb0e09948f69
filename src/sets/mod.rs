/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! FEFF input sets
//!
//! Presets for XANES, EXAFS, ELNES and EXELFS calculations turned into
//! complete decks for a structure or molecule.

pub mod dict_set;
pub mod errors;
pub mod kmesh;
pub mod presets;

pub use dict_set::{EelsOptions, FeffDictSet, SetOptions};
pub use errors::{Result, SetError};
pub use kmesh::kmesh;
pub use presets::{default_eels_block, Spectrum};
