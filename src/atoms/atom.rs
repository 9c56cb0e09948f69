/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Atomic site representation

use super::database;
use super::errors::{AtomError, Result};
use super::vector::Vector3D;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An atomic site: element and Cartesian position in Angstrom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    /// Atomic number (Z) of the element
    atomic_number: i32,
    /// Element symbol
    symbol: String,
    /// Cartesian position in Angstrom
    position: Vector3D,
}

impl Atom {
    /// Create a new atom with the given atomic number and position
    pub fn new(atomic_number: i32, position: Vector3D) -> Result<Self> {
        let symbol = database::element_symbol(atomic_number)
            .ok_or(AtomError::InvalidAtomicNumber(atomic_number))?;

        Ok(Self {
            atomic_number,
            symbol: symbol.to_string(),
            position,
        })
    }

    /// Create a new atom from a species string such as `"Fe"`, `"FE"` or `"Fe2+"`
    pub fn from_symbol(species: &str, position: Vector3D) -> Result<Self> {
        let symbol = database::normalize_symbol(species)
            .ok_or_else(|| AtomError::UnknownElement(species.to_string()))?;
        let atomic_number = database::atomic_number_from_symbol(symbol)
            .ok_or_else(|| AtomError::UnknownElement(species.to_string()))?;

        Ok(Self {
            atomic_number,
            symbol: symbol.to_string(),
            position,
        })
    }

    pub fn atomic_number(&self) -> i32 {
        self.atomic_number
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Cartesian position in Angstrom
    pub fn position(&self) -> &Vector3D {
        &self.position
    }

    pub fn set_position(&mut self, position: Vector3D) {
        self.position = position;
    }

    /// Pauling electronegativity from the database
    pub fn electronegativity(&self) -> Option<f64> {
        database::electronegativity(self.atomic_number)
    }

    /// Calculate the distance to another atom
    pub fn distance_to(&self, other: &Self) -> f64 {
        self.position.distance(&other.position)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Z={}) at {}",
            self.symbol, self.atomic_number, self.position
        )
    }
}
