/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Whitespace-separated numeric tables

use super::errors::{OutputError, Result};
use ndarray::Array2;
use std::fs;
use std::path::Path;

/// Read a numeric table, skipping blank lines and `#` comments
pub(crate) fn load_table(path: &Path) -> Result<Array2<f64>> {
    let text = fs::read_to_string(path).map_err(|e| OutputError::io(path, e))?;
    parse_table(&text)
        .map_err(|e| OutputError::ParseError(format!("{}: {}", path.display(), e)))
}

pub(crate) fn parse_table(text: &str) -> std::result::Result<Array2<f64>, String> {
    let mut values = Vec::new();
    let mut columns = None;
    let mut rows = 0;

    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let row: Vec<f64> = line
            .split_whitespace()
            .map(|t| {
                t.parse()
                    .map_err(|_| format!("bad number '{}' on line {}", t, n + 1))
            })
            .collect::<std::result::Result<_, _>>()?;

        match columns {
            None => columns = Some(row.len()),
            Some(c) if c != row.len() => {
                return Err(format!(
                    "line {} has {} columns, expected {}",
                    n + 1,
                    row.len(),
                    c
                ))
            }
            Some(_) => {}
        }
        values.extend(row);
        rows += 1;
    }

    Array2::from_shape_vec((rows, columns.unwrap_or(0)), values).map_err(|e| e.to_string())
}

/// Read a file into lines
pub(crate) fn read_lines(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).map_err(|e| OutputError::io(path, e))?;
    Ok(text.lines().map(str::to_string).collect())
}

/// Field `index` of line `line` as a number
pub(crate) fn field(lines: &[String], line: usize, index: usize, what: &str) -> Result<f64> {
    lines
        .get(line)
        .and_then(|l| l.split_whitespace().nth(index))
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| {
            OutputError::ParseError(format!(
                "no {} at line {}, field {}",
                what,
                line + 1,
                index + 1
            ))
        })
}
