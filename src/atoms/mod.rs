/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Atomic structure model
//!
//! Elements, sites, lattices, crystals and molecules, plus the structure
//! file formats (CIF, XYZ) and space-group detection used when writing
//! FEFF headers.

pub mod atom;
pub mod cif;
pub mod composition;
pub mod database;
pub mod errors;
pub mod lattice;
pub mod molecule;
pub mod structure;
pub mod symmetry;
pub mod system;
pub mod vector;
pub mod xyz;

pub use atom::Atom;
pub use cif::{parse_cif, read_cif, write_cif, write_cif_file, SymmetryOperation};
pub use composition::Composition;
pub use errors::{AtomError, Result};
pub use lattice::Lattice;
pub use molecule::Molecule;
pub use structure::Structure;
pub use symmetry::{space_group, space_group_or_p1, space_group_symbol, SpaceGroup};
pub use system::{AtomicSystem, Neighbor};
pub use vector::Vector3D;
pub use xyz::{parse_xyz, read_xyz, write_xyz};
