/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! CIF reading and P1 CIF writing

use super::errors::{AtomError, Result};
use super::lattice::Lattice;
use super::structure::Structure;
use log::debug;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Tolerance on fractional coordinates when merging symmetry images
const DUPLICATE_TOLERANCE: f64 = 1e-3;

const SYMOP_TAGS: [&str; 2] = ["_symmetry_equiv_pos_as_xyz", "_space_group_symop_operation_xyz"];

/// Affine operation on fractional coordinates, e.g. `-x+y, -x, z+1/2`
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetryOperation {
    rotation: [[f64; 3]; 3],
    translation: [f64; 3],
}

impl SymmetryOperation {
    pub fn identity() -> Self {
        Self {
            rotation: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            translation: [0.0; 3],
        }
    }

    /// Parse an operation written as three comma-separated expressions
    pub fn parse(op: &str) -> Result<Self> {
        let parts: Vec<&str> = op.split(',').collect();
        if parts.len() != 3 {
            return Err(AtomError::ParseError(format!(
                "symmetry operation '{}' does not have three components",
                op
            )));
        }

        let mut operation = Self {
            rotation: [[0.0; 3]; 3],
            translation: [0.0; 3],
        };
        for (row, expr) in parts.iter().enumerate() {
            let (coefficients, constant) = parse_component(expr)
                .ok_or_else(|| AtomError::ParseError(format!("bad symmetry term '{}'", expr)))?;
            operation.rotation[row] = coefficients;
            operation.translation[row] = constant;
        }
        Ok(operation)
    }

    /// Apply to a fractional position
    pub fn apply(&self, p: [f64; 3]) -> [f64; 3] {
        let mut out = self.translation;
        for (row, value) in out.iter_mut().enumerate() {
            for (col, coord) in p.iter().enumerate() {
                *value += self.rotation[row][col] * coord;
            }
        }
        out
    }
}

/// Linear coefficients of x, y, z and the constant of one component
fn parse_component(expr: &str) -> Option<([f64; 3], f64)> {
    let cleaned: String = expr
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();

    let mut terms = Vec::new();
    let mut current = String::new();
    for c in cleaned.chars() {
        if (c == '+' || c == '-') && !current.is_empty() {
            terms.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    if !current.is_empty() {
        terms.push(current);
    }

    let mut coefficients = [0.0; 3];
    let mut constant = 0.0;
    for term in terms {
        let (sign, body) = match term.strip_prefix('-') {
            Some(rest) => (-1.0, rest),
            None => (1.0, term.trim_start_matches('+')),
        };
        let axis = ['x', 'y', 'z'].iter().position(|a| body.ends_with(*a));
        match axis {
            Some(k) => {
                let factor = &body[..body.len() - 1];
                let factor = factor.trim_end_matches('*');
                let scale = if factor.is_empty() {
                    1.0
                } else {
                    parse_number(factor)?
                };
                coefficients[k] += sign * scale;
            }
            None => constant += sign * parse_number(body)?,
        }
    }
    Some((coefficients, constant))
}

fn parse_number(s: &str) -> Option<f64> {
    match s.split_once('/') {
        Some((num, den)) => {
            let den: f64 = den.parse().ok()?;
            (den != 0.0).then_some(num.parse::<f64>().ok()? / den)
        }
        None => s.parse().ok(),
    }
}

/// Numeric CIF value with an optional standard uncertainty, e.g. `3.2970(8)`
fn parse_cif_float(value: &str) -> Option<f64> {
    let clean: String = value.chars().take_while(|c| *c != '(').collect();
    clean.parse().ok()
}

#[derive(Default)]
struct CifLoop {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CifLoop {
    fn column(&self, names: &[&str]) -> Option<usize> {
        names
            .iter()
            .find_map(|name| self.headers.iter().position(|h| h.eq_ignore_ascii_case(name)))
    }
}

/// Split a data line into tokens, keeping quoted strings together
fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == '\'' || c == '"' {
            chars.next();
            let token: String = chars.by_ref().take_while(|q| *q != c).collect();
            tokens.push(token);
        } else {
            let mut token = String::new();
            while let Some(&t) = chars.peek() {
                if t.is_whitespace() {
                    break;
                }
                token.push(t);
                chars.next();
            }
            tokens.push(token);
        }
    }
    tokens
}

/// Parse the first data block of a CIF into a structure
///
/// Cell parameters, the atom-site loop and the symmetry-operation loop are
/// read; the asymmetric unit is expanded and coincident images merged.
pub fn parse_cif(content: &str) -> Result<Structure> {
    let mut values: Vec<(String, String)> = Vec::new();
    let mut loops: Vec<CifLoop> = Vec::new();
    let mut current: Option<CifLoop> = None;

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if trimmed.eq_ignore_ascii_case("loop_") {
            loops.extend(current.take());
            current = Some(CifLoop::default());
            continue;
        }

        if trimmed.starts_with('_') {
            if let Some(cif_loop) = current.as_mut() {
                if cif_loop.rows.is_empty() {
                    cif_loop.headers.push(trimmed.to_string());
                    continue;
                }
                loops.extend(current.take());
            }
            let mut tokens = tokenize(trimmed);
            if tokens.len() >= 2 {
                let value = tokens.swap_remove(1);
                values.push((tokens.swap_remove(0), value));
            }
            continue;
        }

        if trimmed.starts_with("data_") {
            if !values.is_empty() || !loops.is_empty() || current.is_some() {
                break;
            }
            continue;
        }

        if let Some(cif_loop) = current.as_mut() {
            cif_loop.rows.push(tokenize(trimmed));
        }
    }
    loops.extend(current.take());

    let cell_value = |name: &str| -> Result<f64> {
        values
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .and_then(|(_, v)| parse_cif_float(v))
            .ok_or_else(|| AtomError::ParseError(format!("missing or invalid {}", name)))
    };
    let lattice = Lattice::from_parameters(
        cell_value("_cell_length_a")?,
        cell_value("_cell_length_b")?,
        cell_value("_cell_length_c")?,
        cell_value("_cell_angle_alpha")?,
        cell_value("_cell_angle_beta")?,
        cell_value("_cell_angle_gamma")?,
    )?;

    let mut operations = Vec::new();
    for cif_loop in &loops {
        let Some(col) = cif_loop.column(&SYMOP_TAGS) else {
            continue;
        };
        for row in &cif_loop.rows {
            // Unquoted operations with spaces spill over several tokens
            let op = if row.len() == cif_loop.headers.len() {
                row[col].clone()
            } else {
                row[col..].join("")
            };
            operations.push(SymmetryOperation::parse(&op)?);
        }
    }
    if operations.is_empty() {
        operations.push(SymmetryOperation::identity());
    }

    let atom_loop = loops
        .iter()
        .find(|l| l.column(&["_atom_site_fract_x"]).is_some())
        .ok_or_else(|| AtomError::ParseError("no _atom_site_fract_x loop".to_string()))?;
    let species_col = atom_loop
        .column(&["_atom_site_type_symbol", "_atom_site_label"])
        .ok_or_else(|| AtomError::ParseError("atom sites carry no species".to_string()))?;
    let frac_cols = [
        atom_loop.column(&["_atom_site_fract_x"]),
        atom_loop.column(&["_atom_site_fract_y"]),
        atom_loop.column(&["_atom_site_fract_z"]),
    ];

    let mut species: Vec<String> = Vec::new();
    let mut coords: Vec<[f64; 3]> = Vec::new();
    for row in &atom_loop.rows {
        let mut frac = [0.0; 3];
        for (k, col) in frac_cols.iter().enumerate() {
            frac[k] = col
                .and_then(|c| row.get(c))
                .and_then(|v| parse_cif_float(v))
                .ok_or_else(|| AtomError::ParseError(format!("bad atom site row {:?}", row)))?;
        }
        let symbol = row
            .get(species_col)
            .ok_or_else(|| AtomError::ParseError(format!("bad atom site row {:?}", row)))?;

        for op in &operations {
            let image = op.apply(frac).map(|v| {
                let wrapped = v.rem_euclid(1.0);
                if wrapped > 1.0 - 1e-10 {
                    0.0
                } else {
                    wrapped
                }
            });
            let duplicate = coords.iter().zip(&species).any(|(existing, s)| {
                s == symbol
                    && existing.iter().zip(image.iter()).all(|(a, b)| {
                        let d = a - b;
                        (d - d.round()).abs() < DUPLICATE_TOLERANCE
                    })
            });
            if !duplicate {
                species.push(symbol.clone());
                coords.push(image);
            }
        }
    }

    debug!(
        "CIF: {} operations expanded {} sites to {}",
        operations.len(),
        atom_loop.rows.len(),
        coords.len()
    );

    let species_refs: Vec<&str> = species.iter().map(String::as_str).collect();
    Structure::from_fractional(lattice, &species_refs, &coords)
}

/// Read a structure from a CIF file
pub fn read_cif<P: AsRef<Path>>(path: P) -> Result<Structure> {
    let content = fs::read_to_string(path)?;
    parse_cif(&content)
}

/// Render a structure as a P1 CIF
pub fn write_cif(structure: &Structure) -> String {
    let composition = structure.composition();
    let reduced = composition.reduced_formula();
    let [a, b, c] = structure.lattice().abc();
    let [alpha, beta, gamma] = structure.lattice().angles();

    let mut out = String::new();
    let _ = writeln!(out, "# generated by feff-io");
    let _ = writeln!(out, "data_{}", reduced);
    let _ = writeln!(out, "_symmetry_space_group_name_H-M   'P 1'");
    for (name, value) in [
        ("_cell_length_a", a),
        ("_cell_length_b", b),
        ("_cell_length_c", c),
        ("_cell_angle_alpha", alpha),
        ("_cell_angle_beta", beta),
        ("_cell_angle_gamma", gamma),
    ] {
        let _ = writeln!(out, "{}   {:.8}", name, value);
    }
    let _ = writeln!(out, "_symmetry_Int_Tables_number   1");
    let _ = writeln!(out, "_chemical_formula_structural   {}", reduced);
    let _ = writeln!(out, "_chemical_formula_sum   '{}'", composition.formula());
    let _ = writeln!(out, "_cell_volume   {:.8}", structure.volume());
    let _ = writeln!(
        out,
        "_cell_formula_units_Z   {}",
        composition.reduction_factor() as i64
    );
    out.push_str("loop_\n _symmetry_equiv_pos_site_id\n _symmetry_equiv_pos_as_xyz\n  1  'x, y, z'\n");
    out.push_str("loop_\n _atom_site_type_symbol\n _atom_site_label\n _atom_site_symmetry_multiplicity\n");
    out.push_str(" _atom_site_fract_x\n _atom_site_fract_y\n _atom_site_fract_z\n _atom_site_occupancy\n");

    let mut counters: Vec<(String, usize)> = Vec::new();
    for (site, frac) in structure.sites().iter().zip(structure.all_frac_coords()) {
        let symbol = site.symbol();
        let label_index = match counters.iter_mut().find(|(s, _)| s == symbol) {
            Some((_, n)) => {
                *n += 1;
                *n
            }
            None => {
                counters.push((symbol.to_string(), 0));
                0
            }
        };
        let _ = writeln!(
            out,
            "  {}  {}{}  1  {:.8}  {:.8}  {:.8}  1",
            symbol, symbol, label_index, frac[0], frac[1], frac[2]
        );
    }
    out
}

/// Write a structure to a P1 CIF file
pub fn write_cif_file<P: AsRef<Path>>(structure: &Structure, path: P) -> Result<()> {
    fs::write(path, write_cif(structure))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ROCKSALT_CIF: &str = "data_NaCl
_cell_length_a   5.6402(3)
_cell_length_b   5.6402
_cell_length_c   5.6402
_cell_angle_alpha   90
_cell_angle_beta   90
_cell_angle_gamma   90
loop_
_space_group_symop_operation_xyz
'x, y, z'
'x, y+1/2, z+1/2'
'x+1/2, y, z+1/2'
'x+1/2, y+1/2, z'
loop_
_atom_site_label
_atom_site_type_symbol
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
Na1 Na 0.0 0.0 0.0
Cl1 Cl 0.5 0.5 0.5
";

    #[test]
    fn test_symmetry_operation_parse() {
        let op = SymmetryOperation::parse("-x+y, -x, z+1/2").unwrap();
        let p = op.apply([0.25, 0.5, 0.1]);
        assert_relative_eq!(p[0], 0.25);
        assert_relative_eq!(p[1], -0.25);
        assert_relative_eq!(p[2], 0.6);
        assert!(SymmetryOperation::parse("x, y").is_err());
        assert!(SymmetryOperation::parse("x, y, q").is_err());
    }

    #[test]
    fn test_parse_expands_symmetry() {
        let structure = parse_cif(ROCKSALT_CIF).unwrap();
        assert_eq!(structure.len(), 8);
        assert_eq!(structure.formula(), "Na4 Cl4");
        assert_relative_eq!(structure.lattice().abc()[0], 5.6402, epsilon = 1e-10);
    }

    #[test]
    fn test_p1_round_trip() {
        let structure = parse_cif(ROCKSALT_CIF).unwrap();
        let text = write_cif(&structure);
        assert!(text.contains("data_NaCl"));
        assert!(text.contains("_chemical_formula_sum   'Na4 Cl4'"));
        let back = parse_cif(&text).unwrap();
        assert!(structure.matches(&back, 1e-6, 1e-6, 1e-6));
    }

    #[test]
    fn test_missing_cell_is_an_error() {
        let err = parse_cif("data_x\nloop_\n_atom_site_fract_x\n0.0\n").unwrap_err();
        assert!(err.to_string().contains("_cell_length_a"));
    }
}
