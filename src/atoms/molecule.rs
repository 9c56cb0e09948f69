/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Molecule (non-periodic collection of atoms)

use super::atom::Atom;
use super::composition::Composition;
use super::errors::{AtomError, Result};
use super::system::Neighbor;
use super::vector::Vector3D;
use serde::{Deserialize, Serialize};

/// Molecule represents a finite collection of atoms with a net charge
///
/// Also used for FEFF clusters, where the absorbing atom sits at the origin.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Molecule {
    /// List of atoms in the molecule
    atoms: Vec<Atom>,
    /// Net charge
    charge: f64,
    /// Title or description of the molecule
    title: String,
}

impl Molecule {
    /// Create a new empty molecule
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a neutral molecule from a list of atoms
    pub fn from_atoms(atoms: Vec<Atom>) -> Self {
        Self {
            atoms,
            ..Self::default()
        }
    }

    /// Create a molecule from species strings and Cartesian coordinates
    pub fn from_species(species: &[&str], coords: &[[f64; 3]]) -> Result<Self> {
        if species.len() != coords.len() {
            return Err(AtomError::InvalidStructure(format!(
                "{} species given for {} coordinates",
                species.len(),
                coords.len()
            )));
        }
        let atoms = species
            .iter()
            .zip(coords)
            .map(|(s, c)| Atom::from_symbol(s, Vector3D::from_array(*c)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_atoms(atoms))
    }

    /// Same molecule with a net charge
    pub fn with_charge(mut self, charge: f64) -> Self {
        self.charge = charge;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    pub fn charge(&self) -> f64 {
        self.charge
    }

    pub fn set_charge(&mut self, charge: f64) {
        self.charge = charge;
    }

    /// Add an atom and return its index
    pub fn add_atom(&mut self, atom: Atom) -> usize {
        self.atoms.push(atom);
        self.atoms.len() - 1
    }

    /// Atom by index
    pub fn atom(&self, index: usize) -> Result<&Atom> {
        self.atoms.get(index).ok_or(AtomError::SiteOutOfRange {
            index,
            len: self.atoms.len(),
        })
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn indices_from_symbol(&self, symbol: &str) -> Vec<usize> {
        self.atoms
            .iter()
            .enumerate()
            .filter(|(_, a)| a.symbol() == symbol)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn composition(&self) -> Composition {
        Composition::from_atoms(&self.atoms)
    }

    pub fn formula(&self) -> String {
        self.composition().formula()
    }

    /// Distances between all atoms
    pub fn distance_matrix(&self) -> Vec<Vec<f64>> {
        let n = self.atoms.len();
        let mut distances = vec![vec![0.0; n]; n];

        for i in 0..n {
            for j in (i + 1)..n {
                let dist = self.atoms[i].distance_to(&self.atoms[j]);
                distances[i][j] = dist;
                distances[j][i] = dist;
            }
        }

        distances
    }

    /// Atoms within `radius` of atom `center`, nearest first
    ///
    /// Equidistant atoms keep their order in the molecule.
    pub fn neighbors(&self, center: usize, radius: f64) -> Result<Vec<Neighbor>> {
        let reference = self.atom(center)?;

        let mut found: Vec<Neighbor> = self
            .atoms
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != center)
            .filter_map(|(index, atom)| {
                let distance = reference.distance_to(atom);
                (distance <= radius).then(|| Neighbor {
                    index,
                    symbol: atom.symbol().to_string(),
                    position: *atom.position(),
                    distance,
                    image: [0, 0, 0],
                })
            })
            .collect();

        found.sort_by_key(|n| n.sort_key());
        Ok(found)
    }

    /// Copy of the molecule shifted so that `point` becomes the origin
    pub fn centered_on(&self, point: Vector3D) -> Self {
        let mut shifted = self.clone();
        for atom in shifted.atoms.iter_mut() {
            atom.set_position(*atom.position() - point);
        }
        shifted
    }
}
