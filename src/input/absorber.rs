/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Absorbing atom selection

use super::errors::{InputError, Result};
use crate::atoms::{database, AtomicSystem};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The absorbing atom, by element or by site index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbsorbingAtom {
    /// First site of this element
    Symbol(String),
    /// Zero-based site index
    Index(usize),
}

impl AbsorbingAtom {
    /// Element symbol and site index of the absorber in `system`
    pub fn resolve(&self, system: &AtomicSystem) -> Result<(String, usize)> {
        match self {
            Self::Symbol(species) => {
                let symbol = database::normalize_symbol(species)
                    .ok_or_else(|| InputError::AbsorberNotFound(species.clone()))?;
                let index = system
                    .indices_from_symbol(symbol)
                    .first()
                    .copied()
                    .ok_or_else(|| InputError::AbsorberNotFound(species.clone()))?;
                Ok((symbol.to_string(), index))
            }
            Self::Index(index) => {
                let site = system
                    .site(*index)
                    .map_err(|_| InputError::AbsorberNotFound(format!("at site {}", index)))?;
                Ok((site.symbol().to_string(), *index))
            }
        }
    }
}

impl fmt::Display for AbsorbingAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symbol(s) => write!(f, "{}", s),
            Self::Index(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for AbsorbingAtom {
    fn from(symbol: &str) -> Self {
        Self::Symbol(symbol.to_string())
    }
}

impl From<String> for AbsorbingAtom {
    fn from(symbol: String) -> Self {
        Self::Symbol(symbol)
    }
}

impl From<usize> for AbsorbingAtom {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::Molecule;

    fn carbon_monoxide() -> AtomicSystem {
        Molecule::from_species(&["C", "O"], &[[0.0, 0.0, 0.0], [0.0, 0.0, 1.128]])
            .unwrap()
            .into()
    }

    #[test]
    fn test_resolve_by_symbol_and_index() {
        let system = carbon_monoxide();
        assert_eq!(
            AbsorbingAtom::from("O").resolve(&system).unwrap(),
            ("O".to_string(), 1)
        );
        assert_eq!(
            AbsorbingAtom::Index(0).resolve(&system).unwrap(),
            ("C".to_string(), 0)
        );
    }

    #[test]
    fn test_missing_absorber() {
        let system = carbon_monoxide();
        assert!(matches!(
            AbsorbingAtom::from("Fe").resolve(&system),
            Err(InputError::AbsorberNotFound(_))
        ));
        assert!(AbsorbingAtom::Index(5).resolve(&system).is_err());
    }
}
