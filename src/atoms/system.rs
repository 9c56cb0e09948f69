/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Periodic or finite atomic systems as seen by the input sets

use super::atom::Atom;
use super::composition::Composition;
use super::errors::Result;
use super::molecule::Molecule;
use super::structure::Structure;
use super::vector::Vector3D;
use serde::{Deserialize, Serialize};

/// A site found within some radius of a center site
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    /// Index of the originating site
    pub index: usize,
    pub symbol: String,
    /// Absolute Cartesian position of this image
    pub position: Vector3D,
    /// Distance from the center in Angstrom
    pub distance: f64,
    /// Lattice translation of the image, zero for molecules
    pub image: [i32; 3],
}

impl Neighbor {
    /// Total order: distance (to 1e-8 Angstrom), site index, image
    pub(crate) fn sort_key(&self) -> (i64, usize, [i32; 3]) {
        ((self.distance * 1e8).round() as i64, self.index, self.image)
    }
}

/// Either a crystal or a molecule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AtomicSystem {
    Crystal(Structure),
    Molecule(Molecule),
}

impl AtomicSystem {
    pub fn is_periodic(&self) -> bool {
        matches!(self, Self::Crystal(_))
    }

    pub fn as_structure(&self) -> Option<&Structure> {
        match self {
            Self::Crystal(s) => Some(s),
            Self::Molecule(_) => None,
        }
    }

    pub fn sites(&self) -> &[Atom] {
        match self {
            Self::Crystal(s) => s.sites(),
            Self::Molecule(m) => m.atoms(),
        }
    }

    pub fn site(&self, index: usize) -> Result<&Atom> {
        match self {
            Self::Crystal(s) => s.site(index),
            Self::Molecule(m) => m.atom(index),
        }
    }

    pub fn len(&self) -> usize {
        self.sites().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites().is_empty()
    }

    pub fn charge(&self) -> f64 {
        match self {
            Self::Crystal(s) => s.charge(),
            Self::Molecule(m) => m.charge(),
        }
    }

    pub fn neighbors(&self, center: usize, radius: f64) -> Result<Vec<Neighbor>> {
        match self {
            Self::Crystal(s) => s.neighbors(center, radius),
            Self::Molecule(m) => m.neighbors(center, radius),
        }
    }

    pub fn indices_from_symbol(&self, symbol: &str) -> Vec<usize> {
        match self {
            Self::Crystal(s) => s.indices_from_symbol(symbol),
            Self::Molecule(m) => m.indices_from_symbol(symbol),
        }
    }

    pub fn composition(&self) -> Composition {
        Composition::from_atoms(self.sites())
    }

    pub fn formula(&self) -> String {
        self.composition().formula()
    }

    pub fn reduced_formula(&self) -> String {
        self.composition().reduced_formula()
    }
}

impl From<Structure> for AtomicSystem {
    fn from(structure: Structure) -> Self {
        Self::Crystal(structure)
    }
}

impl From<Molecule> for AtomicSystem {
    fn from(molecule: Molecule) -> Self {
        Self::Molecule(molecule)
    }
}
