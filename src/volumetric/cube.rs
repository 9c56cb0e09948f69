/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Gaussian cube files
//!
//! Layout: two comment lines, the atom count and grid origin, one line per
//! grid axis with the number of voxels and the voxel vector, one line per
//! atom (`Z charge x y z`), then the grid values with the last axis running
//! fastest. Lengths are in Bohr unless a voxel count is negative, which
//! marks Angstrom.

use super::errors::{Result, VolumetricError};
use crate::atoms::{Atom, Lattice, Structure, Vector3D};
use crate::utils::{angstrom_to_bohr_vec, bohr_to_angstrom_vec};
use log::debug;
use ndarray::Array3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

const VALUES_PER_LINE: usize = 6;

const DEFAULT_COMMENTS: [&str; 2] = [
    "Generated by feff-io",
    "OUTER LOOP: X, MIDDLE LOOP: Y, INNER LOOP: Z",
];

/// Atom line of a cube file; position in Bohr
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubeAtom {
    pub atomic_number: i32,
    pub charge: f64,
    pub position: [f64; 3],
}

/// Structure plus a scalar field sampled on a regular grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumetricData {
    comments: [String; 2],
    /// Grid origin (Bohr)
    origin: [f64; 3],
    /// Step along each grid axis (Bohr)
    voxels: [[f64; 3]; 3],
    atoms: Vec<CubeAtom>,
    data: Array3<f64>,
}

impl VolumetricData {
    /// Grid values on the cell of `structure`, origin at the cell corner
    pub fn from_structure(structure: &Structure, data: Array3<f64>) -> Result<Self> {
        let (n1, n2, n3) = data.dim();
        if n1 == 0 || n2 == 0 || n3 == 0 {
            return Err(VolumetricError::ShapeError(format!(
                "grid must have at least one point per axis, got {}x{}x{}",
                n1, n2, n3
            )));
        }

        let counts = [n1, n2, n3];
        let matrix = structure.lattice().matrix();
        let voxels =
            [0, 1, 2].map(|i| angstrom_to_bohr_vec(matrix[i].map(|x| x / counts[i] as f64)));
        let atoms = structure
            .sites()
            .iter()
            .map(|site| CubeAtom {
                atomic_number: site.atomic_number(),
                charge: site.atomic_number() as f64,
                position: angstrom_to_bohr_vec(site.position().to_array()),
            })
            .collect();

        Ok(Self {
            comments: DEFAULT_COMMENTS.map(str::to_string),
            origin: [0.0; 3],
            voxels,
            atoms,
            data,
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let volumetric: Self = fs::read_to_string(path)?.parse()?;
        debug!(
            "read {:?} grid with {} atoms from {}",
            volumetric.dims(),
            volumetric.atoms.len(),
            path.display()
        );
        Ok(volumetric)
    }

    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_string())?;
        Ok(())
    }

    pub fn comments(&self) -> &[String; 2] {
        &self.comments
    }

    pub fn set_comments(&mut self, first: &str, second: &str) {
        self.comments = [first.to_string(), second.to_string()];
    }

    pub fn origin(&self) -> [f64; 3] {
        self.origin
    }

    pub fn voxels(&self) -> &[[f64; 3]; 3] {
        &self.voxels
    }

    pub fn atoms(&self) -> &[CubeAtom] {
        &self.atoms
    }

    pub fn data(&self) -> &Array3<f64> {
        &self.data
    }

    /// Number of grid points along each axis
    pub fn dims(&self) -> [usize; 3] {
        let (n1, n2, n3) = self.data.dim();
        [n1, n2, n3]
    }

    /// Volume of one voxel in cubic Bohr
    pub fn voxel_volume(&self) -> f64 {
        let [a, b, c] = self.voxels.map(Vector3D::from_array);
        a.dot(&b.cross(&c)).abs()
    }

    /// Sum of the grid values times the voxel volume
    pub fn integrate(&self) -> f64 {
        self.data.sum() * self.voxel_volume()
    }

    pub fn min(&self) -> f64 {
        self.data.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn mean(&self) -> f64 {
        self.data.mean().unwrap_or(0.0)
    }

    /// The periodic cell spanned by the grid, with the atoms placed
    /// relative to the grid origin (Angstrom)
    pub fn structure(&self) -> Result<Structure> {
        let dims = self.dims();
        let rows = [0, 1, 2]
            .map(|i| bohr_to_angstrom_vec(self.voxels[i].map(|x| x * dims[i] as f64)));
        let lattice = Lattice::new(rows)?;

        let sites = self
            .atoms
            .iter()
            .map(|atom| {
                let relative = [0, 1, 2].map(|k| atom.position[k] - self.origin[k]);
                Atom::new(
                    atom.atomic_number,
                    Vector3D::from_array(bohr_to_angstrom_vec(relative)),
                )
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Structure::new(lattice, sites))
    }
}

/// Whitespace-separated numbers of one line
fn numbers<T: FromStr>(line: usize, text: &str, expected: usize, what: &str) -> Result<Vec<T>> {
    let values: Vec<T> = text
        .split_whitespace()
        .take(expected)
        .map(|t| {
            t.parse().map_err(|_| VolumetricError::ParseError {
                line,
                message: format!("bad {} value '{}'", what, t),
            })
        })
        .collect::<Result<_>>()?;
    if values.len() < expected {
        return Err(VolumetricError::ParseError {
            line,
            message: format!("expected {} values for {}, found {}", expected, what, values.len()),
        });
    }
    Ok(values)
}

/// Count followed by three floats, as on the origin and axis lines
fn count_and_vector(line: usize, text: &str, what: &str) -> Result<(i64, [f64; 3])> {
    let mut fields = text.split_whitespace();
    let count = fields
        .next()
        .and_then(|c| c.parse::<i64>().ok())
        .ok_or_else(|| VolumetricError::ParseError {
            line,
            message: format!("missing integer count on the {} line", what),
        })?;
    let rest: Vec<&str> = fields.collect();
    let v: Vec<f64> = numbers(line, &rest.join(" "), 3, what)?;
    Ok((count, [v[0], v[1], v[2]]))
}

impl FromStr for VolumetricData {
    type Err = VolumetricError;

    fn from_str(s: &str) -> Result<Self> {
        let mut lines = s.lines().enumerate().map(|(i, l)| (i + 1, l));
        let mut next = |what: &str| {
            lines.next().ok_or_else(|| VolumetricError::ParseError {
                line: 0,
                message: format!("file ends before the {}", what),
            })
        };

        let comments = [
            next("first comment")?.1.to_string(),
            next("second comment")?.1.to_string(),
        ];

        let (at, text) = next("origin line")?;
        let (natoms, mut origin) = count_and_vector(at, text, "origin")?;

        let mut counts = [0_i64; 3];
        let mut voxels = [[0.0; 3]; 3];
        for axis in 0..3 {
            let (at, text) = next("grid axis lines")?;
            let (count, vector) = count_and_vector(at, text, "grid axis")?;
            if count == 0 {
                return Err(VolumetricError::ShapeError(format!(
                    "axis {} has no grid points (line {})",
                    axis + 1,
                    at
                )));
            }
            counts[axis] = count;
            voxels[axis] = vector;
        }
        let angstrom = counts.iter().any(|c| *c < 0);

        let mut atoms = Vec::new();
        for _ in 0..natoms.unsigned_abs() {
            let (at, text) = next("atom lines")?;
            let v: Vec<f64> = numbers(at, text, 5, "atom")?;
            atoms.push(CubeAtom {
                atomic_number: v[0].round() as i32,
                charge: v[1],
                position: [v[2], v[3], v[4]],
            });
        }

        // Orbital cubes flag themselves with a negative atom count and list
        // the orbitals on one extra line
        if natoms < 0 {
            let (at, text) = next("orbital line")?;
            let orbitals: Vec<i64> = numbers(at, text, 1, "orbital count")?;
            if orbitals[0] != 1 {
                return Err(VolumetricError::ShapeError(format!(
                    "{} orbitals on line {}; only single-orbital cubes are supported",
                    orbitals[0], at
                )));
            }
        }

        let mut values = Vec::new();
        for (at, text) in lines {
            for token in text.split_whitespace() {
                values.push(token.parse::<f64>().map_err(|_| VolumetricError::ParseError {
                    line: at,
                    message: format!("bad grid value '{}'", token),
                })?);
            }
        }

        let dims = counts.map(|c| c.unsigned_abs() as usize);
        let expected = dims
            .iter()
            .try_fold(1_usize, |acc, n| acc.checked_mul(*n))
            .ok_or_else(|| {
                VolumetricError::ShapeError(format!(
                    "{}x{}x{} grid is too large",
                    dims[0], dims[1], dims[2]
                ))
            })?;
        if values.len() != expected {
            return Err(VolumetricError::ShapeError(format!(
                "{}x{}x{} grid needs {} values, found {}",
                dims[0],
                dims[1],
                dims[2],
                expected,
                values.len()
            )));
        }
        let data = Array3::from_shape_vec((dims[0], dims[1], dims[2]), values)
            .map_err(|e| VolumetricError::ShapeError(e.to_string()))?;

        if angstrom {
            origin = angstrom_to_bohr_vec(origin);
            voxels = voxels.map(angstrom_to_bohr_vec);
            for atom in &mut atoms {
                atom.position = angstrom_to_bohr_vec(atom.position);
            }
        }

        Ok(Self {
            comments,
            origin,
            voxels,
            atoms,
            data,
        })
    }
}

/// Shortest exponent form that reads back to the same value
fn number(value: f64) -> String {
    format!("{:>24e}", value)
}

impl fmt::Display for VolumetricData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.comments[0])?;
        writeln!(f, "{}", self.comments[1])?;

        let vector = |v: &[f64; 3]| v.map(number).join(" ");
        writeln!(f, "{:>5} {}", self.atoms.len(), vector(&self.origin))?;
        for (count, voxel) in self.dims().iter().zip(&self.voxels) {
            writeln!(f, "{:>5} {}", count, vector(voxel))?;
        }
        for atom in &self.atoms {
            writeln!(
                f,
                "{:>5} {} {}",
                atom.atomic_number,
                number(atom.charge),
                vector(&atom.position)
            )?;
        }

        for row in self.data.rows() {
            let row: Vec<f64> = row.to_vec();
            for chunk in row.chunks(VALUES_PER_LINE) {
                let line: Vec<String> = chunk.iter().map(|v| number(*v)).collect();
                writeln!(f, "{}", line.join(" "))?;
            }
        }
        Ok(())
    }
}
