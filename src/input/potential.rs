/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! POTENTIALS block

use super::absorber::AbsorbingAtom;
use super::card::{is_card_name, is_comment};
use super::errors::{InputError, Result};
use super::table::{format_number, tabulate};
use crate::atoms::{database, AtomicSystem, Composition};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

const POTENTIAL_HEADERS: [&str; 7] = [
    "*ipot",
    "Z",
    "tag",
    "lmax1",
    "lmax2",
    "xnatph(stoichometry)",
    "spinph",
];

/// Stoichiometry written for the absorbing potential
const ABSORBER_STOICHIOMETRY: f64 = 0.0001;

/// One row of a POTENTIALS block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PotentialLine {
    pub ipot: i32,
    pub atomic_number: i32,
    pub symbol: String,
    pub lmax1: i32,
    pub lmax2: i32,
    pub stoichiometry: f64,
    pub spinph: f64,
}

impl PotentialLine {
    fn new(ipot: i32, atomic_number: i32, symbol: &str, stoichiometry: f64) -> Self {
        Self {
            ipot,
            atomic_number,
            symbol: symbol.to_string(),
            lmax1: -1,
            lmax2: -1,
            stoichiometry,
            spinph: 0.0,
        }
    }

    /// Parse a row `ipot Z tag [lmax1 lmax2 xnatph spinph]`
    pub fn parse(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 {
            return Err(InputError::InvalidPotential(format!(
                "expected at least ipot, Z and tag in '{}'",
                line
            )));
        }

        let int = |i: usize, default: i32| -> Result<i32> {
            match fields.get(i) {
                Some(f) => f.parse().map_err(|_| {
                    InputError::InvalidPotential(format!("bad integer '{}' in '{}'", f, line))
                }),
                None => Ok(default),
            }
        };
        let float = |i: usize, default: f64| -> Result<f64> {
            match fields.get(i) {
                Some(f) => f.parse().map_err(|_| {
                    InputError::InvalidPotential(format!("bad number '{}' in '{}'", f, line))
                }),
                None => Ok(default),
            }
        };

        Ok(Self {
            ipot: int(0, 0)?,
            atomic_number: int(1, 0)?,
            symbol: fields[2].to_string(),
            lmax1: int(3, -1)?,
            lmax2: int(4, -1)?,
            stoichiometry: float(5, 0.0)?,
            spinph: float(6, 0.0)?,
        })
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.ipot.to_string(),
            self.atomic_number.to_string(),
            self.symbol.clone(),
            self.lmax1.to_string(),
            self.lmax2.to_string(),
            format_number(self.stoichiometry),
            format_number(self.spinph),
        ]
    }
}

/// Render rows as a POTENTIALS block
pub fn potential_block_string(lines: &[PotentialLine]) -> String {
    let rows: Vec<Vec<String>> = lines.iter().map(PotentialLine::cells).collect();
    let mut out = vec!["POTENTIALS".to_string()];
    out.extend(tabulate(&POTENTIAL_HEADERS, &rows));
    out.join("\n")
}

/// Map from element symbol to potential index
///
/// Unique symbols are numbered consecutively from 1 in alphabetical order.
/// The absorbing element is left out before numbering when it has a single
/// site in a molecule, since the absorber then has potential 0 to itself;
/// in a crystal its periodic images still need a potential.
pub fn potential_map(system: &AtomicSystem, absorbing_symbol: &str) -> BTreeMap<String, i32> {
    let composition = system.composition();
    let lone_absorber =
        !system.is_periodic() && system.indices_from_symbol(absorbing_symbol).len() == 1;

    let mut symbols: Vec<&str> = composition
        .items()
        .map(|(s, _)| s)
        .filter(|s| !(lone_absorber && *s == absorbing_symbol))
        .collect();
    symbols.sort_unstable();

    symbols
        .iter()
        .enumerate()
        .map(|(i, s)| (s.to_string(), i as i32 + 1))
        .collect()
}

/// POTENTIALS block for an absorber in a structure or molecule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Potential {
    absorbing_atom: String,
    absorbing_index: usize,
    composition: Composition,
    pot_dict: BTreeMap<String, i32>,
}

impl Potential {
    pub fn new(system: &AtomicSystem, absorber: &AbsorbingAtom) -> Result<Self> {
        let (absorbing_atom, absorbing_index) = absorber.resolve(system)?;
        let pot_dict = potential_map(system, &absorbing_atom);
        Ok(Self {
            absorbing_atom,
            absorbing_index,
            composition: system.composition(),
            pot_dict,
        })
    }

    pub fn absorbing_atom(&self) -> &str {
        &self.absorbing_atom
    }

    pub fn absorbing_index(&self) -> usize {
        self.absorbing_index
    }

    /// Element symbol to potential index
    pub fn pot_dict(&self) -> &BTreeMap<String, i32> {
        &self.pot_dict
    }

    /// Rows of the block: the absorber first, then one per potential
    pub fn lines(&self) -> Vec<PotentialLine> {
        let z = |s: &str| database::atomic_number_from_symbol(s).unwrap_or(0);
        let mut lines = vec![PotentialLine::new(
            0,
            z(&self.absorbing_atom),
            &self.absorbing_atom,
            ABSORBER_STOICHIOMETRY,
        )];

        let mut rows: Vec<PotentialLine> = self
            .composition
            .items()
            .filter_map(|(symbol, amount)| {
                self.pot_dict
                    .get(symbol)
                    .map(|ipot| PotentialLine::new(*ipot, z(symbol), symbol, amount))
            })
            .collect();
        rows.sort_by_key(|row| row.ipot);
        lines.extend(rows);
        lines
    }

    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, format!("{}\n", self))?;
        Ok(())
    }
}

impl fmt::Display for Potential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", potential_block_string(&self.lines()))
    }
}

/// Extract the POTENTIALS block (keyword line and rows) from deck text
pub fn pot_string_from_str(text: &str) -> Result<String> {
    extract_block(text, "POTENTIALS", None)
        .ok_or_else(|| InputError::MissingCard("POTENTIALS".to_string()))
}

/// Extract the POTENTIALS block from a deck file
pub fn pot_string_from_file<P: AsRef<Path>>(path: P) -> Result<String> {
    pot_string_from_str(&fs::read_to_string(path)?)
}

/// Lines from the `keyword` card up to the next card, or through `end`
pub(crate) fn extract_block(text: &str, keyword: &str, end: Option<&str>) -> Option<String> {
    let mut lines = text.lines().skip_while(|line| {
        line.split_whitespace()
            .next()
            .map_or(true, |w| !w.eq_ignore_ascii_case(keyword))
    });
    let first = lines.next()?;

    let mut block = vec![first.trim_end().to_string()];
    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let first_word = trimmed.split_whitespace().next().unwrap_or("");
        if let Some(end) = end {
            if first_word.eq_ignore_ascii_case(end) {
                block.push(trimmed.to_string());
                break;
            }
        }
        if !is_comment(trimmed) && is_card_name(trimmed) {
            break;
        }
        block.push(line.trim_end().to_string());
    }
    Some(block.join("\n"))
}

/// Symbol to ipot and ipot to symbol maps read from a POTENTIALS block
///
/// Rows are read from the absorber row (ipot 0) on; a later row for the
/// same element overrides the absorber entry.
pub fn pot_dict_from_string(block: &str) -> (BTreeMap<String, i32>, BTreeMap<i32, String>) {
    let mut by_symbol = BTreeMap::new();
    let mut by_index = BTreeMap::new();
    let mut started = false;

    for line in block.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 {
            continue;
        }
        let Ok(ipot) = fields[0].parse::<i32>() else {
            continue;
        };
        if !started && ipot != 0 {
            continue;
        }
        started = true;
        by_symbol.insert(fields[2].to_string(), ipot);
        by_index.insert(ipot, fields[2].to_string());
    }
    (by_symbol, by_index)
}

/// Rows of a POTENTIALS block (comment lines skipped)
pub fn potential_lines_from_string(block: &str) -> Result<Vec<PotentialLine>> {
    block
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|l| !l.is_empty() && !is_comment(l))
        .map(PotentialLine::parse)
        .collect()
}
