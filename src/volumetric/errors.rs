/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Error types for volumetric data

use crate::atoms::AtomError;
use std::io;
use thiserror::Error;

/// Result type for volumetric operations
pub type Result<T> = std::result::Result<T, VolumetricError>;

#[derive(Error, Debug)]
pub enum VolumetricError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    /// Malformed cube text, with the 1-based line number
    #[error("Cube parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Grid shape inconsistent with the header or the data
    #[error("Grid shape error: {0}")]
    ShapeError(String),

    #[error("Structure error: {0}")]
    StructureError(#[from] AtomError),
}
