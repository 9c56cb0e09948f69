/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Error types for FEFF input sets

use crate::atoms::AtomError;
use crate::input::InputError;
use std::io;
use thiserror::Error;

/// Result type for input set operations
pub type Result<T> = std::result::Result<T, SetError>;

/// Errors raised while building, writing or reloading an input set
#[derive(Error, Debug)]
pub enum SetError {
    /// Periodic structure carrying a net charge
    #[error("Structure with net charge {0} is not supported; FEFF input sets need a neutral crystal")]
    ChargedStructure(f64),

    /// Edge that is neither a FEFF edge name nor an index 1-23
    #[error("Invalid absorption edge: {0}")]
    InvalidEdge(String),

    /// No spectroscopy tag that selects a preset
    #[error("Unknown spectrum: {0}")]
    UnknownSpectrum(String),

    /// Directory contents that cannot be turned back into a set
    #[error("Cannot reload input set: {0}")]
    Reload(String),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Structure error: {0}")]
    Structure(#[from] AtomError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
