/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Error types for FEFF output parsing

use crate::atoms::AtomError;
use crate::input::InputError;
use std::io;
use thiserror::Error;

/// Result type for output parsing
pub type Result<T> = std::result::Result<T, OutputError>;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error reading {path}: {source}")]
    IoError {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Parse error: {0}")]
    ParseError(String),

    /// A value the output should carry is absent
    #[error("Missing data: {0}")]
    MissingData(String),

    #[error("Input error: {0}")]
    InputError(#[from] InputError),

    #[error("Structure error: {0}")]
    StructureError(#[from] AtomError),
}

impl OutputError {
    pub(crate) fn io(path: &std::path::Path, source: io::Error) -> Self {
        Self::IoError {
            path: path.display().to_string(),
            source,
        }
    }
}
