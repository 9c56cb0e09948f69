/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Error types for the atoms module

/// Error types for the atoms module
#[derive(Debug, thiserror::Error)]
pub enum AtomError {
    #[error("Invalid atomic number: {0}")]
    InvalidAtomicNumber(i32),

    #[error("Unknown element symbol: {0}")]
    UnknownElement(String),

    #[error("Site index {index} out of range for {len} sites")]
    SiteOutOfRange { index: usize, len: usize },

    #[error("Invalid lattice: {0}")]
    InvalidLattice(String),

    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    #[error("Symmetry search failed: {0}")]
    SymmetryError(String),
}

/// Result type for atom operations
pub type Result<T> = std::result::Result<T, AtomError>;
