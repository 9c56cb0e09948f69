/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Space-group detection

use super::errors::{AtomError, Result};
use super::structure::Structure;
use log::warn;
use moyo::base::{AngleTolerance, Cell, Lattice as MoyoLattice};
use moyo::data::Setting;
use moyo::MoyoDataset;
use nalgebra::{Matrix3, Vector3};

/// Distance tolerance for symmetry search, in Angstrom
pub const DEFAULT_SYMPREC: f64 = 1e-3;

/// International short symbols, indexed by space-group number minus one
const SPACE_GROUP_SYMBOLS: [&str; 230] = [
    "P1", "P-1", "P2", "P2_1", "C2", "Pm", "Pc", "Cm", "Cc", "P2/m",
    "P2_1/m", "C2/m", "P2/c", "P2_1/c", "C2/c", "P222", "P222_1", "P2_12_12", "P2_12_12_1", "C222_1",
    "C222", "F222", "I222", "I2_12_12_1", "Pmm2", "Pmc2_1", "Pcc2", "Pma2", "Pca2_1", "Pnc2",
    "Pmn2_1", "Pba2", "Pna2_1", "Pnn2", "Cmm2", "Cmc2_1", "Ccc2", "Amm2", "Aem2", "Ama2",
    "Aea2", "Fmm2", "Fdd2", "Imm2", "Iba2", "Ima2", "Pmmm", "Pnnn", "Pccm", "Pban",
    "Pmma", "Pnna", "Pmna", "Pcca", "Pbam", "Pccn", "Pbcm", "Pnnm", "Pmmn", "Pbcn",
    "Pbca", "Pnma", "Cmcm", "Cmce", "Cmmm", "Cccm", "Cmme", "Ccce", "Fmmm", "Fddd",
    "Immm", "Ibam", "Ibca", "Imma", "P4", "P4_1", "P4_2", "P4_3", "I4", "I4_1",
    "P-4", "I-4", "P4/m", "P4_2/m", "P4/n", "P4_2/n", "I4/m", "I4_1/a", "P422", "P42_12",
    "P4_122", "P4_12_12", "P4_222", "P4_22_12", "P4_322", "P4_32_12", "I422", "I4_122", "P4mm", "P4bm",
    "P4_2cm", "P4_2nm", "P4cc", "P4nc", "P4_2mc", "P4_2bc", "I4mm", "I4cm", "I4_1md", "I4_1cd",
    "P-42m", "P-42c", "P-42_1m", "P-42_1c", "P-4m2", "P-4c2", "P-4b2", "P-4n2", "I-4m2", "I-4c2",
    "I-42m", "I-42d", "P4/mmm", "P4/mcc", "P4/nbm", "P4/nnc", "P4/mbm", "P4/mnc", "P4/nmm", "P4/ncc",
    "P4_2/mmc", "P4_2/mcm", "P4_2/nbc", "P4_2/nnm", "P4_2/mbc", "P4_2/mnm", "P4_2/nmc", "P4_2/ncm", "I4/mmm", "I4/mcm",
    "I4_1/amd", "I4_1/acd", "P3", "P3_1", "P3_2", "R3", "P-3", "R-3", "P312", "P321",
    "P3_112", "P3_121", "P3_212", "P3_221", "R32", "P3m1", "P31m", "P3c1", "P31c", "R3m",
    "R3c", "P-31m", "P-31c", "P-3m1", "P-3c1", "R-3m", "R-3c", "P6", "P6_1", "P6_5",
    "P6_2", "P6_4", "P6_3", "P-6", "P6/m", "P6_3/m", "P622", "P6_122", "P6_522", "P6_222",
    "P6_422", "P6_322", "P6mm", "P6cc", "P6_3cm", "P6_3mc", "P-6m2", "P-6c2", "P-62m", "P-62c",
    "P6/mmm", "P6/mcc", "P6_3/mcm", "P6_3/mmc", "P23", "F23", "I23", "P2_13", "I2_13", "Pm-3",
    "Pn-3", "Fm-3", "Fd-3", "Im-3", "Pa-3", "Ia-3", "P432", "P4_232", "F432", "F4_132",
    "I432", "P4_332", "P4_132", "I4_132", "P-43m", "F-43m", "I-43m", "P-43n", "F-43c", "I-43d",
    "Pm-3m", "Pn-3n", "Pm-3n", "Pn-3m", "Fm-3m", "Fm-3c", "Fd-3m", "Fd-3c", "Im-3m", "Ia-3d",
];

/// Space-group number and short symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaceGroup {
    pub number: i32,
    pub symbol: String,
}

impl SpaceGroup {
    pub fn p1() -> Self {
        Self {
            number: 1,
            symbol: "P1".to_string(),
        }
    }
}

/// Short symbol for a space-group number
pub fn space_group_symbol(number: i32) -> Option<&'static str> {
    if !(1..=230).contains(&number) {
        return None;
    }
    Some(SPACE_GROUP_SYMBOLS[(number - 1) as usize])
}

/// Detect the space group of a structure
pub fn space_group(structure: &Structure, symprec: f64) -> Result<SpaceGroup> {
    let m = structure.lattice().matrix();
    let lattice = MoyoLattice::new(Matrix3::new(
        m[0][0], m[0][1], m[0][2], m[1][0], m[1][1], m[1][2], m[2][0], m[2][1], m[2][2],
    ));
    let positions = structure
        .all_frac_coords()
        .into_iter()
        .map(|f| Vector3::new(f[0], f[1], f[2]))
        .collect();
    let numbers = structure.sites().iter().map(|s| s.atomic_number()).collect();

    let cell = Cell::new(lattice, positions, numbers);
    let dataset = MoyoDataset::new(&cell, symprec, AngleTolerance::Default, Setting::Spglib, true)
        .map_err(|e| AtomError::SymmetryError(format!("{:?}", e)))?;

    let symbol = space_group_symbol(dataset.number).ok_or_else(|| {
        AtomError::SymmetryError(format!("space group number {} out of range", dataset.number))
    })?;
    Ok(SpaceGroup {
        number: dataset.number,
        symbol: symbol.to_string(),
    })
}

/// Space group at the default tolerance, falling back to P1
pub fn space_group_or_p1(structure: &Structure) -> SpaceGroup {
    match space_group(structure, DEFAULT_SYMPREC) {
        Ok(sg) => sg,
        Err(e) => {
            warn!("Symmetry search failed ({}); reporting P1", e);
            SpaceGroup::p1()
        }
    }
}
