/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! XYZ molecule files

use super::atom::Atom;
use super::errors::{AtomError, Result};
use super::molecule::Molecule;
use super::vector::Vector3D;
use std::fs;
use std::path::Path;

/// Parse an XYZ file: atom count, comment line, then `symbol x y z` rows
pub fn parse_xyz(content: &str) -> Result<Molecule> {
    let mut lines = content.lines();
    let count: usize = lines
        .next()
        .and_then(|l| l.trim().parse().ok())
        .ok_or_else(|| AtomError::ParseError("XYZ file must start with an atom count".to_string()))?;
    let comment = lines.next().unwrap_or("").trim();

    let mut molecule = Molecule::new();
    molecule.set_title(comment);
    for line in lines.filter(|l| !l.trim().is_empty()).take(count) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(AtomError::ParseError(format!("bad XYZ row: '{}'", line)));
        }
        let mut xyz = [0.0; 3];
        for (k, field) in fields[1..4].iter().enumerate() {
            xyz[k] = field
                .parse()
                .map_err(|_| AtomError::ParseError(format!("bad coordinate '{}'", field)))?;
        }
        molecule.add_atom(Atom::from_symbol(fields[0], Vector3D::from_array(xyz))?);
    }

    if molecule.len() != count {
        return Err(AtomError::ParseError(format!(
            "XYZ header promises {} atoms, found {}",
            count,
            molecule.len()
        )));
    }
    Ok(molecule)
}

pub fn read_xyz<P: AsRef<Path>>(path: P) -> Result<Molecule> {
    parse_xyz(&fs::read_to_string(path)?)
}

/// Render a molecule as XYZ text
pub fn write_xyz(molecule: &Molecule) -> String {
    let mut out = format!("{}\n{}\n", molecule.len(), molecule.title());
    for atom in molecule.atoms() {
        let p = atom.position();
        out.push_str(&format!(
            "{} {:.6} {:.6} {:.6}\n",
            atom.symbol(),
            p.x,
            p.y,
            p.z
        ));
    }
    out
}
