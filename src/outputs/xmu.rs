/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Absorption spectrum from xmu.dat

use super::errors::{OutputError, Result};
use super::table::load_table;
use crate::input::{
    header_string_from_str, pot_dict_from_string, pot_string_from_str, AbsorbingAtom, TagValue,
    Tags,
};
use crate::sets::Spectrum;
use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Columns of xmu.dat: energy, energy relative to the edge, wavenumber,
/// mu, embedded-atom background mu0 and chi
const XMU_COLUMNS: usize = 6;

/// Spectrum written by FEFF together with the deck that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Xmu {
    header: String,
    tags: Tags,
    absorbing_atom: AbsorbingAtom,
    data: Array2<f64>,
}

impl Xmu {
    /// Read `xmu.dat` and the `feff.inp` of the same run
    ///
    /// The absorber is the ipot 0 element of POTENTIALS, or the `TARGET`
    /// site for reciprocal-space runs.
    pub fn from_file<P: AsRef<Path>, Q: AsRef<Path>>(xmu_dat: P, feff_inp: Q) -> Result<Self> {
        let data = load_table(xmu_dat.as_ref())?;
        if data.ncols() < XMU_COLUMNS {
            return Err(OutputError::ParseError(format!(
                "{} has {} columns, expected {}",
                xmu_dat.as_ref().display(),
                data.ncols(),
                XMU_COLUMNS
            )));
        }

        let feff_inp = feff_inp.as_ref();
        let deck = fs::read_to_string(feff_inp).map_err(|e| OutputError::io(feff_inp, e))?;
        let tags: Tags = deck.parse()?;

        let absorbing_atom = if tags.contains("RECIPROCAL") {
            let target = tags
                .get("TARGET")
                .and_then(TagValue::as_int)
                .filter(|t| *t >= 1)
                .ok_or_else(|| OutputError::MissingData("TARGET of a reciprocal run".into()))?;
            AbsorbingAtom::Index((target - 1) as usize)
        } else {
            let (_, by_index) = pot_dict_from_string(&pot_string_from_str(&deck)?);
            let symbol = by_index
                .get(&0)
                .ok_or_else(|| OutputError::MissingData("absorbing potential (ipot 0)".into()))?;
            AbsorbingAtom::Symbol(symbol.clone())
        };

        Ok(Self {
            header: header_string_from_str(&deck),
            tags,
            absorbing_atom,
            data,
        })
    }

    /// The whole table, one row per energy point
    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn absorbing_atom(&self) -> &AbsorbingAtom {
        &self.absorbing_atom
    }

    pub fn energies(&self) -> ArrayView1<'_, f64> {
        self.data.column(0)
    }

    /// Energies relative to the absorption edge
    pub fn relative_energies(&self) -> ArrayView1<'_, f64> {
        self.data.column(1)
    }

    pub fn wavenumber(&self) -> ArrayView1<'_, f64> {
        self.data.column(2)
    }

    pub fn mu(&self) -> ArrayView1<'_, f64> {
        self.data.column(3)
    }

    pub fn mu0(&self) -> ArrayView1<'_, f64> {
        self.data.column(4)
    }

    pub fn chi(&self) -> ArrayView1<'_, f64> {
        self.data.column(5)
    }

    /// Fermi level: absolute minus relative energy of the first point
    pub fn e_fermi(&self) -> Option<f64> {
        Some(self.energies().first()? - self.relative_energies().first()?)
    }

    /// XANES if the deck asked for it, EXAFS otherwise
    pub fn calc(&self) -> Spectrum {
        if self.tags.contains("XANES") {
            Spectrum::Xanes
        } else {
            Spectrum::Exafs
        }
    }

    pub fn edge(&self) -> Option<String> {
        self.tags.get("EDGE").map(TagValue::to_string)
    }

    /// Source named in a generated header
    pub fn source(&self) -> Option<&str> {
        self.header_title("TITLE Source:")
    }

    /// Reduced formula named in a generated header
    pub fn material_formula(&self) -> Option<&str> {
        self.header_title("TITLE Reduced formula:")
    }

    fn header_title(&self, prefix: &str) -> Option<&str> {
        self.header
            .lines()
            .find_map(|line| line.strip_prefix(prefix))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
