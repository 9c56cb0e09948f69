/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Angular-momentum projected densities of states (ldosNN.dat)

use super::errors::{OutputError, Result};
use super::table::{field, load_table, read_lines};
use crate::atoms::{database, read_cif, AtomicSystem};
use crate::input::{
    header_string_from_str, pot_dict_from_string, pot_string_from_str, Header, TagValue, Tags,
};
use log::debug;
use ndarray::{s, Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Orbital channels in ldos column order
pub const ORBITALS: [&str; 4] = ["s", "p", "d", "f"];

/// Electron counts of one potential after the SCF loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PotentialCharge {
    pub symbol: String,
    pub s: f64,
    pub p: f64,
    pub d: f64,
    pub f: f64,
    /// Net charge transfer
    pub tot: f64,
}

/// Densities of states of a FEFF run, per potential and per site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LDos {
    efermi: f64,
    system: AtomicSystem,
    /// Potential used for each element when projecting onto sites
    pot_dict: BTreeMap<String, i32>,
    /// ipot to energy, s, p, d, f table
    tables: BTreeMap<i32, Array2<f64>>,
    charge_transfer: BTreeMap<i32, PotentialCharge>,
}

/// `<prefix>NN.dat`
fn ldos_path(prefix: &Path, ipot: i32) -> PathBuf {
    let mut name = prefix.as_os_str().to_owned();
    name.push(format!("{:02}.dat", ipot));
    PathBuf::from(name)
}

/// Whether `line` contains every word of `words`, in order
fn contains_in_order(line: &str, words: &[&str]) -> bool {
    let mut rest = line;
    for word in words {
        match rest.find(word) {
            Some(at) => rest = &rest[at + word.len()..],
            None => return false,
        }
    }
    true
}

/// Potential maps from the pot.inp of a reciprocal-space run
///
/// The potential table starts after the `iz lmaxsc xnatph xion folp`
/// heading, absorber first, and ends at the `ExternalPot switch` line.
fn pot_inp_maps(path: &Path) -> Result<(BTreeMap<String, i32>, BTreeMap<i32, String>)> {
    let lines = read_lines(path)?;
    let start = lines
        .iter()
        .position(|l| contains_in_order(l, &["iz", "lmaxsc", "xnatph", "xion", "folp"]))
        .ok_or_else(|| {
            OutputError::MissingData(format!("potential table in {}", path.display()))
        })?;

    let mut by_symbol = BTreeMap::new();
    let mut by_index = BTreeMap::new();
    for (ipot, line) in lines[start + 1..]
        .iter()
        .take_while(|l| !contains_in_order(l, &["ExternalPot", "switch"]))
        .enumerate()
    {
        let Some(z) = line.split_whitespace().next().and_then(|t| t.parse::<i32>().ok()) else {
            break;
        };
        let symbol = database::element_symbol(z).ok_or_else(|| {
            OutputError::ParseError(format!("unknown atomic number {} in {}", z, path.display()))
        })?;
        let ipot = ipot as i32;
        by_index.insert(ipot, symbol.to_string());
        if ipot > 0 {
            by_symbol.entry(symbol.to_string()).or_insert(ipot);
        }
    }

    if let Some(absorber) = by_index.get(&0) {
        by_symbol.entry(absorber.clone()).or_insert(0);
    }
    Ok((by_symbol, by_index))
}

impl LDos {
    /// Read the densities of states of the run described by `feff_inp`
    ///
    /// `ldos_prefix` is the path without the `NN.dat` suffix, e.g.
    /// `run/ldos`. Reciprocal-space runs take their potentials from the
    /// pot.inp next to the deck and their structure from the CIF file it
    /// names.
    pub fn from_file<P: AsRef<Path>, Q: AsRef<Path>>(feff_inp: P, ldos_prefix: Q) -> Result<Self> {
        let feff_inp = feff_inp.as_ref();
        let prefix = ldos_prefix.as_ref();
        let deck = fs::read_to_string(feff_inp).map_err(|e| OutputError::io(feff_inp, e))?;
        let tags: Tags = deck.parse()?;
        let reciprocal = tags.contains("RECIPROCAL");

        let (pot_dict, by_index) = if reciprocal {
            pot_inp_maps(&feff_inp.with_file_name("pot.inp"))?
        } else {
            pot_dict_from_string(&pot_string_from_str(&deck)?)
        };

        let cif = tags
            .get("CIF")
            .map(TagValue::to_string)
            .map(|name| feff_inp.with_file_name(name))
            .filter(|path| reciprocal && path.exists());
        let system = match cif {
            Some(path) => AtomicSystem::from(read_cif(path)?),
            None => {
                let header: Header = header_string_from_str(&deck).parse()?;
                header.system().clone()
            }
        };

        let first = read_lines(&ldos_path(prefix, 0))?;
        let efermi = field(&first, 0, 4, "Fermi level")?;

        let mut tables: BTreeMap<i32, Array2<f64>> = BTreeMap::new();
        let mut charge_transfer = BTreeMap::new();
        for (ipot, symbol) in &by_index {
            let path = ldos_path(prefix, *ipot);
            let table = load_table(&path)?;
            if table.ncols() < 1 + ORBITALS.len() {
                return Err(OutputError::ParseError(format!(
                    "{} has {} columns, expected energy and s p d f",
                    path.display(),
                    table.ncols()
                )));
            }
            if let Some(reference) = tables.values().next() {
                if reference.nrows() != table.nrows() {
                    return Err(OutputError::ParseError(format!(
                        "{} has {} energies, other potentials have {}",
                        path.display(),
                        table.nrows(),
                        reference.nrows()
                    )));
                }
            }
            tables.insert(*ipot, table);

            let lines = read_lines(&path)?;
            charge_transfer.insert(
                *ipot,
                PotentialCharge {
                    symbol: symbol.clone(),
                    s: field(&lines, 3, 2, "s count")?,
                    p: field(&lines, 4, 2, "p count")?,
                    d: field(&lines, 5, 2, "d count")?,
                    f: field(&lines, 6, 2, "f count")?,
                    tot: field(&lines, 1, 4, "charge transfer")?,
                },
            );
        }

        for site in system.sites() {
            if !pot_dict.contains_key(site.symbol()) {
                return Err(OutputError::MissingData(format!(
                    "no potential for {} sites",
                    site.symbol()
                )));
            }
        }
        debug!(
            "read {} ldos tables for {} sites, Fermi level {} eV",
            tables.len(),
            system.len(),
            efermi
        );

        Ok(Self {
            efermi,
            system,
            pot_dict,
            tables,
            charge_transfer,
        })
    }

    /// Fermi level in eV
    pub fn efermi(&self) -> f64 {
        self.efermi
    }

    pub fn system(&self) -> &AtomicSystem {
        &self.system
    }

    pub fn pot_dict(&self) -> &BTreeMap<String, i32> {
        &self.pot_dict
    }

    /// Energy grid shared by all tables
    pub fn energies(&self) -> Array1<f64> {
        self.tables
            .values()
            .next()
            .map(|t| t.column(0).to_owned())
            .unwrap_or_else(|| Array1::zeros(0))
    }

    /// Energy, s, p, d, f table of one potential
    pub fn potential_dos(&self, ipot: i32) -> Option<&Array2<f64>> {
        self.tables.get(&ipot)
    }

    /// s, p, d, f densities projected on a site
    pub fn site_dos(&self, site: usize) -> Result<Array2<f64>> {
        let atom = self.system.site(site)?;
        let table = self
            .pot_dict
            .get(atom.symbol())
            .and_then(|ipot| self.tables.get(ipot))
            .ok_or_else(|| {
                OutputError::MissingData(format!("density of states for {}", atom.symbol()))
            })?;
        Ok(table.slice(s![.., 1..1 + ORBITALS.len()]).to_owned())
    }

    /// s, p, d, f densities summed over all sites
    pub fn spd_dos(&self) -> Result<Array2<f64>> {
        let mut total = Array2::zeros((self.energies().len(), ORBITALS.len()));
        for site in 0..self.system.len() {
            total += &self.site_dos(site)?;
        }
        Ok(total)
    }

    /// Density of states summed over sites and orbitals
    pub fn total_dos(&self) -> Result<Array1<f64>> {
        Ok(self.spd_dos()?.sum_axis(Axis(1)))
    }

    /// Electron counts per potential
    pub fn charge_transfer(&self) -> &BTreeMap<i32, PotentialCharge> {
        &self.charge_transfer
    }

    /// Plain-text charge transfer report
    pub fn charge_transfer_to_string(&self) -> String {
        let mut out = String::from("\nCharge Transfer\n\nabsorbing atom");
        for charge in self.charge_transfer.values() {
            out.push_str(&format!(
                "\n{}\ns   {}\np   {}\nd   {}\nf   {}\ntot {}\n",
                charge.symbol, charge.s, charge.p, charge.d, charge.f, charge.tot
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("  iz lmaxsc  xnatph  xion  folp", true)]
    #[case("ExternalPot switch", false)]
    #[case("folp xion iz", false)]
    fn test_pot_inp_heading(#[case] line: &str, #[case] expected: bool) {
        assert_eq!(
            contains_in_order(line, &["iz", "lmaxsc", "xnatph", "xion", "folp"]),
            expected
        );
    }

    #[test]
    fn test_ldos_path() {
        assert_eq!(
            ldos_path(Path::new("run/ldos"), 3),
            PathBuf::from("run/ldos03.dat")
        );
        assert_eq!(ldos_path(Path::new("ldos"), 12), PathBuf::from("ldos12.dat"));
    }

    #[test]
    fn test_pot_inp_maps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pot.inp");
        std::fs::write(
            &path,
            " mpot, nph, ntitle, ihole, ipr1, iafolp, ixc,ispec\n\
             iz, lmaxsc, xnatph, xion, folp\n\
             11   2   0.00010   0.00000   1.15000\n\
             11   2   4.00000   0.00000   1.15000\n\
              8   2   4.00000   0.00000   1.15000\n\
             ExternalPot switch, StartingFile\n",
        )
        .unwrap();

        let (by_symbol, by_index) = pot_inp_maps(&path).unwrap();
        assert_eq!(by_index.get(&0).map(String::as_str), Some("Na"));
        assert_eq!(by_index.len(), 3);
        assert_eq!(by_symbol.get("Na"), Some(&1));
        assert_eq!(by_symbol.get("O"), Some(&2));
    }
}
