/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! ATOMS block: the cluster around the absorbing atom

use super::absorber::AbsorbingAtom;
use super::card::is_comment;
use super::errors::{InputError, Result};
use super::potential::{extract_block, potential_map};
use super::table::tabulate;
use crate::atoms::{Atom, AtomicSystem, Molecule, Vector3D};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

const ATOM_HEADERS: [&str; 7] = ["*       x", "y", "z", "ipot", "Atom", "Distance", "Number"];

/// One row of an ATOMS block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterLine {
    /// Position relative to the absorber, in Angstrom
    pub position: Vector3D,
    pub ipot: i32,
    pub symbol: String,
    pub distance: f64,
    pub number: usize,
}

impl ClusterLine {
    /// Parse a row `x y z ipot [tag [distance [number]]]`
    pub fn parse(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(InputError::ParseError(format!(
                "Invalid atom format '{}': expected at least x, y, z and ipot",
                line
            )));
        }

        let mut coords = [0.0; 3];
        for (k, field) in fields[..3].iter().enumerate() {
            coords[k] = field.parse().map_err(|_| {
                InputError::ParseError(format!("Invalid coordinate '{}' in '{}'", field, line))
            })?;
        }
        let position = Vector3D::from_array(coords);
        let ipot = fields[3].parse().map_err(|_| {
            InputError::ParseError(format!("Invalid potential index '{}' in '{}'", fields[3], line))
        })?;

        Ok(Self {
            position,
            ipot,
            symbol: fields.get(4).map(|s| s.to_string()).unwrap_or_default(),
            distance: fields
                .get(5)
                .and_then(|d| d.parse().ok())
                .unwrap_or_else(|| position.length()),
            number: fields.get(6).and_then(|n| n.parse().ok()).unwrap_or(0),
        })
    }

    fn cells(&self) -> Vec<String> {
        vec![
            format!("{:.6}", self.position.x),
            format!("{:.6}", self.position.y),
            format!("{:.6}", self.position.z),
            self.ipot.to_string(),
            self.symbol.clone(),
            format!("{:.6}", self.distance),
            self.number.to_string(),
        ]
    }
}

/// Render rows as an ATOMS block closed by END
pub fn atoms_block_string(lines: &[ClusterLine]) -> String {
    let rows: Vec<Vec<String>> = lines.iter().map(ClusterLine::cells).collect();
    let mut out = vec!["ATOMS".to_string()];
    out.extend(tabulate(&ATOM_HEADERS, &rows));
    out.push("END".to_string());
    out.join("\n")
}

/// Cluster of every atom within a radius of the absorber
///
/// The absorber sits at the origin; the other atoms follow by increasing
/// distance, equidistant atoms in the order of the originating sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atoms {
    absorbing_atom: String,
    absorbing_index: usize,
    radius: f64,
    pot_dict: BTreeMap<String, i32>,
    cluster: Molecule,
    distances: Vec<f64>,
}

impl Atoms {
    pub fn new(system: &AtomicSystem, absorber: &AbsorbingAtom, radius: f64) -> Result<Self> {
        let (absorbing_atom, absorbing_index) = absorber.resolve(system)?;
        let pot_dict = potential_map(system, &absorbing_atom);
        let center = *system.site(absorbing_index)?.position();

        let mut cluster = Molecule::new();
        cluster.add_atom(Atom::from_symbol(&absorbing_atom, Vector3D::origin())?);
        let mut distances = vec![0.0];

        for neighbor in system.neighbors(absorbing_index, radius)? {
            if !pot_dict.contains_key(&neighbor.symbol) {
                return Err(InputError::InvalidPotential(format!(
                    "no potential for {} at {:.4} A",
                    neighbor.symbol, neighbor.distance
                )));
            }
            cluster.add_atom(Atom::from_symbol(
                &neighbor.symbol,
                neighbor.position - center,
            )?);
            distances.push(neighbor.distance);
        }

        Ok(Self {
            absorbing_atom,
            absorbing_index,
            radius,
            pot_dict,
            cluster,
            distances,
        })
    }

    pub fn absorbing_atom(&self) -> &str {
        &self.absorbing_atom
    }

    pub fn absorbing_index(&self) -> usize {
        self.absorbing_index
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn pot_dict(&self) -> &BTreeMap<String, i32> {
        &self.pot_dict
    }

    /// The cluster as a molecule, absorber first
    pub fn cluster(&self) -> &Molecule {
        &self.cluster
    }

    /// Rows of the block
    pub fn lines(&self) -> Vec<ClusterLine> {
        self.cluster
            .atoms()
            .iter()
            .zip(&self.distances)
            .enumerate()
            .map(|(number, (atom, distance))| ClusterLine {
                position: *atom.position(),
                ipot: if number == 0 {
                    0
                } else {
                    self.pot_dict.get(atom.symbol()).copied().unwrap_or(0)
                },
                symbol: atom.symbol().to_string(),
                distance: *distance,
                number,
            })
            .collect()
    }

    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, format!("{}\n", self))?;
        Ok(())
    }
}

impl fmt::Display for Atoms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", atoms_block_string(&self.lines()))
    }
}

/// Extract the ATOMS block (through END) from deck text
pub fn atoms_string_from_str(text: &str) -> Result<String> {
    extract_block(text, "ATOMS", Some("END"))
        .ok_or_else(|| InputError::MissingCard("ATOMS".to_string()))
}

pub fn atoms_string_from_file<P: AsRef<Path>>(path: P) -> Result<String> {
    atoms_string_from_str(&fs::read_to_string(path)?)
}

/// Rows of an ATOMS block
pub fn cluster_lines_from_string(block: &str) -> Result<Vec<ClusterLine>> {
    block
        .lines()
        .skip(1)
        .map(str::trim)
        .take_while(|l| !l.eq_ignore_ascii_case("END"))
        .filter(|l| !l.is_empty() && !is_comment(l))
        .map(ClusterLine::parse)
        .collect()
}

/// Rebuild the cluster molecule from the ATOMS block of a deck
pub fn cluster_from_str(text: &str) -> Result<Molecule> {
    let block = atoms_string_from_str(text)?;
    let mut cluster = Molecule::new();
    for line in cluster_lines_from_string(&block)? {
        if line.symbol.is_empty() {
            return Err(InputError::ParseError(format!(
                "ATOMS row {} has no element tag",
                line.number
            )));
        }
        cluster.add_atom(Atom::from_symbol(&line.symbol, line.position)?);
    }
    Ok(cluster)
}

pub fn cluster_from_file<P: AsRef<Path>>(path: P) -> Result<Molecule> {
    cluster_from_str(&fs::read_to_string(path)?)
}
