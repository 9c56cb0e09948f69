/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Error types for FEFF deck formats

use crate::atoms::AtomError;
use std::io;
use thiserror::Error;

/// Errors that can occur while reading or writing FEFF decks
#[derive(Error, Debug)]
pub enum InputError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid input format: {0}")]
    InvalidFormat(String),

    #[error("Missing required card: {0}")]
    MissingCard(String),

    #[error("Invalid potential: {0}")]
    InvalidPotential(String),

    #[error("Absorbing atom {0} not found in the structure")]
    AbsorberNotFound(String),

    #[error("Invalid atomic structure: {0}")]
    InvalidStructure(#[from] AtomError),
}

/// Result type for input operations
pub type Result<T> = std::result::Result<T, InputError>;
