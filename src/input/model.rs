/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Whole-deck model of a feff.inp file

use super::cluster::{atoms_block_string, ClusterLine};
use super::errors::{InputError, Result};
use super::potential::{potential_block_string, PotentialLine};
use super::tags::Tags;
use crate::atoms::{Atom, Molecule};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Main FEFF input data structure
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeffInput {
    /// Leading comment and TITLE lines
    pub header: Option<String>,

    /// Keyword cards
    pub tags: Tags,

    /// POTENTIALS rows
    pub potentials: Vec<PotentialLine>,

    /// ATOMS rows
    pub atoms: Vec<ClusterLine>,
}

impl FeffInput {
    /// Create a new empty FEFF input
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the calculation runs in reciprocal space
    pub fn is_reciprocal(&self) -> bool {
        self.tags.contains("RECIPROCAL")
    }

    /// Validate the input
    ///
    /// Real-space decks need a non-empty ATOMS block with exactly one
    /// absorber (ipot 0), and every ipot used must have a POTENTIALS row.
    pub fn validate(&self) -> Result<()> {
        if self.is_reciprocal() {
            return Ok(());
        }

        if self.atoms.is_empty() {
            return Err(InputError::MissingCard("ATOMS".to_string()));
        }

        let absorbers = self.atoms.iter().filter(|a| a.ipot == 0).count();
        if absorbers != 1 {
            return Err(InputError::InvalidPotential(format!(
                "ATOMS must hold exactly one absorber (ipot 0), found {}",
                absorbers
            )));
        }

        if !self.potentials.is_empty() {
            for atom in &self.atoms {
                if !self.potentials.iter().any(|p| p.ipot == atom.ipot) {
                    return Err(InputError::InvalidPotential(format!(
                        "atom {} uses ipot {} which has no POTENTIALS row",
                        atom.number, atom.ipot
                    )));
                }
            }
        }

        Ok(())
    }

    /// Element of the absorbing potential
    pub fn absorbing_atom(&self) -> Option<&str> {
        self.potentials
            .iter()
            .find(|p| p.ipot == 0)
            .map(|p| p.symbol.as_str())
    }

    /// The ATOMS rows as a molecule
    pub fn cluster(&self) -> Result<Molecule> {
        let mut cluster = Molecule::new();
        for line in &self.atoms {
            cluster.add_atom(Atom::from_symbol(&line.symbol, line.position)?);
        }
        Ok(cluster)
    }

    /// Write the input to a file
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, format!("{}\n", self))?;
        Ok(())
    }
}

impl fmt::Display for FeffInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut blocks = Vec::new();
        if let Some(header) = &self.header {
            blocks.push(header.clone());
        }
        blocks.push(self.tags.to_string());
        if !self.potentials.is_empty() {
            blocks.push(potential_block_string(&self.potentials));
        }
        if !self.atoms.is_empty() {
            blocks.push(atoms_block_string(&self.atoms));
        }
        write!(f, "{}", blocks.join("\n\n"))
    }
}
