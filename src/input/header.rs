/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! HEADER block: structure summary written as FEFF comments and titles

use super::errors::{InputError, Result};
use crate::atoms::{
    space_group_or_p1, AtomicSystem, Lattice, Molecule, SpaceGroup, Structure,
};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

const FIRST_LINE: &str = "* This FEFF.inp file generated by feff-io";

/// First-line markers of headers this module can read back
const GENERATOR_MARKERS: [&str; 2] = ["generated by feff-io", "generated by pymatgen"];

const DEFAULT_COMMENT: &str = "None given";

/// Header of a FEFF deck describing the source structure
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    system: AtomicSystem,
    source: String,
    comment: String,
    /// Crystals only
    space_group: Option<SpaceGroup>,
}

impl Header {
    /// Header for a structure or molecule; crystals get their space group
    pub fn new(system: &AtomicSystem, source: &str, comment: &str) -> Self {
        let space_group = system.as_structure().map(space_group_or_p1);
        let comment = if comment.trim().is_empty() {
            DEFAULT_COMMENT
        } else {
            comment
        };
        Self {
            system: system.clone(),
            source: source.to_string(),
            comment: comment.to_string(),
            space_group,
        }
    }

    pub fn system(&self) -> &AtomicSystem {
        &self.system
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn space_group(&self) -> Option<&SpaceGroup> {
        self.space_group.as_ref()
    }

    /// Header lines, without trailing newline characters
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            FIRST_LINE.to_string(),
            format!("TITLE comment: {}", self.comment),
            format!("TITLE Source:  {}", self.source),
            format!("TITLE Structure Summary:  {}", self.system.formula()),
            format!("TITLE Reduced formula:  {}", self.system.reduced_formula()),
        ];

        match &self.system {
            AtomicSystem::Crystal(structure) => {
                let sg = self.space_group.clone().unwrap_or_else(SpaceGroup::p1);
                lines.push(format!(
                    "TITLE space group: ({}), space number:  ({})",
                    sg.symbol, sg.number
                ));
                lines.push(format!("TITLE abc:{}", fixed_columns(&structure.lattice().abc(), 10)));
                lines.push(format!(
                    "TITLE angles:{}",
                    fixed_columns(&structure.lattice().angles(), 10)
                ));
                lines.push(format!("TITLE sites: {}", structure.len()));
                for (i, (site, frac)) in structure
                    .sites()
                    .iter()
                    .zip(structure.all_frac_coords())
                    .enumerate()
                {
                    lines.push(format!(
                        "* {} {} {}",
                        i + 1,
                        site.symbol(),
                        fixed_columns(&frac, 12)
                    ));
                }
            }
            AtomicSystem::Molecule(molecule) => {
                lines.push(format!("TITLE sites: {}", molecule.len()));
                for (i, atom) in molecule.atoms().iter().enumerate() {
                    lines.push(format!(
                        "* {} {} {}",
                        i + 1,
                        atom.symbol(),
                        fixed_columns(&atom.position().to_array(), 12)
                    ));
                }
            }
        }
        lines
    }

    /// Read a generated header from a deck or HEADER file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        header_string_from_file(path)?.parse()
    }

    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, format!("{}\n", self))?;
        Ok(())
    }
}

/// `%.6f` values right-justified to `width`, joined by spaces
fn fixed_columns(values: &[f64], width: usize) -> String {
    values
        .iter()
        .map(|v| format!("{:>width$.6}", v, width = width))
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_generated(first_line: &str) -> bool {
    GENERATOR_MARKERS.iter().any(|m| first_line.contains(m))
}

fn parse_floats(text: &str) -> Result<Vec<f64>> {
    text.split_whitespace()
        .map(|t| {
            t.parse()
                .map_err(|_| InputError::ParseError(format!("bad number '{}' in header", t)))
        })
        .collect()
}

/// Text between the first `(` and the next `)` after `from`
fn parenthesized(line: &str, from: usize) -> Option<&str> {
    let rest = line.get(from..)?;
    let open = rest.find('(')?;
    let close = rest[open..].find(')')?;
    Some(&rest[open + 1..open + close])
}

impl FromStr for Header {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self> {
        let lines: Vec<&str> = s.lines().map(str::trim_end).collect();
        let first = lines.first().copied().unwrap_or("");
        if !is_generated(first) {
            return Err(InputError::InvalidFormat(
                "header was not generated by feff-io; no structure can be read from it"
                    .to_string(),
            ));
        }

        let mut comment = DEFAULT_COMMENT.to_string();
        let mut source = String::new();
        let mut space_group = None;
        let mut abc = None;
        let mut angles = None;
        let mut sites: Vec<(String, [f64; 3])> = Vec::new();
        let mut expected_sites = None;

        for line in &lines[1..] {
            if let Some(rest) = line.strip_prefix("TITLE comment:") {
                comment = rest.trim().to_string();
            } else if let Some(rest) = line.strip_prefix("TITLE Source:") {
                source = rest.trim().to_string();
            } else if line.starts_with("TITLE space group:") {
                let symbol = parenthesized(line, 0);
                let number = line
                    .find("space number:")
                    .and_then(|at| parenthesized(line, at))
                    .and_then(|n| n.trim().parse().ok());
                if let (Some(symbol), Some(number)) = (symbol, number) {
                    space_group = Some(SpaceGroup {
                        number,
                        symbol: symbol.to_string(),
                    });
                }
            } else if let Some(rest) = line.strip_prefix("TITLE abc:") {
                abc = Some(parse_floats(rest)?);
            } else if let Some(rest) = line.strip_prefix("TITLE angles:") {
                angles = Some(parse_floats(rest)?);
            } else if let Some(rest) = line.strip_prefix("TITLE sites:") {
                expected_sites = rest.trim().parse::<usize>().ok();
            } else if expected_sites.is_some() && line.starts_with('*') {
                let fields: Vec<&str> = line.split_whitespace().collect();
                if fields.len() < 6 {
                    return Err(InputError::ParseError(format!("bad header site '{}'", line)));
                }
                let coords = parse_floats(&fields[3..6].join(" "))?;
                sites.push((fields[2].to_string(), [coords[0], coords[1], coords[2]]));
            }
        }

        if expected_sites != Some(sites.len()) {
            return Err(InputError::ParseError(format!(
                "header lists {} sites but announces {:?}",
                sites.len(),
                expected_sites
            )));
        }

        let species: Vec<&str> = sites.iter().map(|(s, _)| s.as_str()).collect();
        let coords: Vec<[f64; 3]> = sites.iter().map(|(_, c)| *c).collect();

        let system = match (abc, angles) {
            (Some(abc), Some(angles)) if abc.len() == 3 && angles.len() == 3 => {
                let lattice =
                    Lattice::from_parameters(abc[0], abc[1], abc[2], angles[0], angles[1], angles[2])?;
                AtomicSystem::Crystal(Structure::from_fractional(lattice, &species, &coords)?)
            }
            (None, None) => AtomicSystem::Molecule(Molecule::from_species(&species, &coords)?),
            _ => {
                return Err(InputError::ParseError(
                    "header lattice needs three lengths and three angles".to_string(),
                ))
            }
        };

        let space_group = match &system {
            AtomicSystem::Crystal(_) => space_group.or(Some(SpaceGroup::p1())),
            AtomicSystem::Molecule(_) => None,
        };

        Ok(Self {
            system,
            source,
            comment,
            space_group,
        })
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}

/// The header part of a deck
///
/// Generated headers end after their site list; for other decks the
/// leading comment and TITLE lines are taken.
pub fn header_string_from_str(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();

    if lines.first().is_some_and(|l| is_generated(l)) {
        let sites_line = lines.iter().position(|l| l.starts_with("TITLE sites:"));
        if let Some(at) = sites_line {
            let n: usize = lines[at]["TITLE sites:".len()..].trim().parse().unwrap_or(0);
            let end = at.saturating_add(1).saturating_add(n).min(lines.len());
            return lines[..end].join("\n");
        }
    }

    lines
        .iter()
        .take_while(|l| {
            let t = l.trim_start();
            t.starts_with('*') || t.to_uppercase().starts_with("TITLE")
        })
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn header_string_from_file<P: AsRef<Path>>(path: P) -> Result<String> {
    Ok(header_string_from_str(&fs::read_to_string(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::Lattice;

    fn coo() -> AtomicSystem {
        let lattice =
            Lattice::from_parameters(3.297078, 3.297078, 5.254213, 90.0, 90.0, 120.0).unwrap();
        Structure::from_fractional(
            lattice,
            &["Co", "Co", "O", "O"],
            &[
                [1.0 / 3.0, 2.0 / 3.0, 0.503676],
                [2.0 / 3.0, 1.0 / 3.0, 0.003676],
                [1.0 / 3.0, 2.0 / 3.0, 0.121324],
                [2.0 / 3.0, 1.0 / 3.0, 0.621325],
            ],
        )
        .unwrap()
        .into()
    }

    #[test]
    fn test_generated_header() {
        let header = Header::new(&coo(), "CoO19128.cif", "From cif file");
        let text = header.to_string();
        let expected = "\
* This FEFF.inp file generated by feff-io
TITLE comment: From cif file
TITLE Source:  CoO19128.cif
TITLE Structure Summary:  Co2 O2
TITLE Reduced formula:  CoO
TITLE space group: (P6_3mc), space number:  (186)
TITLE abc:  3.297078   3.297078   5.254213
TITLE angles: 90.000000  90.000000 120.000000
TITLE sites: 4
* 1 Co     0.333333     0.666667     0.503676
* 2 Co     0.666667     0.333333     0.003676
* 3 O     0.333333     0.666667     0.121324
* 4 O     0.666667     0.333333     0.621325";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_header_round_trip() {
        let header = Header::new(&coo(), "", "");
        assert_eq!(header.comment(), "None given");
        let text = header.to_string();
        let back: Header = text.parse().unwrap();
        assert_eq!(back.to_string(), text);
        assert_eq!(back.space_group().map(|sg| sg.number), Some(186));
    }

    #[test]
    fn test_header_extraction() {
        let header = Header::new(&coo(), "src", "c").to_string();
        let deck = format!("{}\n\nEDGE K\nS02 0.0\n", header);
        assert_eq!(header_string_from_str(&deck), header);

        let foreign = "* my deck\nTITLE Fe\nEDGE K\n";
        assert_eq!(header_string_from_str(foreign), "* my deck\nTITLE Fe");
        assert!(matches!(
            foreign.parse::<Header>(),
            Err(InputError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_site_count_past_end_of_deck() {
        let deck = "* This FEFF.inp file generated by feff-io\n\
                    TITLE comment: None given\n\
                    TITLE sites: 18446744073709551615\n\
                    * 1 Fe 0.0 0.0 0.0\n";
        assert_eq!(header_string_from_str(deck), deck.trim_end());
    }

    #[test]
    fn test_molecule_header() {
        let molecule: AtomicSystem =
            Molecule::from_species(&["C", "O"], &[[0.0, 0.0, 0.0], [0.0, 0.0, 1.128]])
                .unwrap()
                .into();
        let header = Header::new(&molecule, "co.xyz", "");
        let text = header.to_string();
        assert_eq!(text.lines().count(), 8);
        assert!(header.space_group().is_none());
        let back: Header = text.parse().unwrap();
        assert_eq!(back.system(), &molecule);
    }
}
