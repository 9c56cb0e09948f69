/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Column-aligned tables for POTENTIALS and ATOMS blocks

/// Align `rows` under `headers`
///
/// Numeric columns are right-aligned, others left-aligned. The line after
/// the headers is a `*` rule so FEFF reads both as comments.
pub(crate) fn tabulate(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let columns = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    let mut numeric = vec![true; columns];

    for row in rows {
        for (col, cell) in row.iter().enumerate().take(columns) {
            widths[col] = widths[col].max(cell.len());
            if cell.parse::<f64>().is_err() {
                numeric[col] = false;
            }
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(render_row(headers, &widths, &numeric));
    lines.push(
        widths
            .iter()
            .map(|w| "*".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        lines.push(render_row(&cells, &widths, &numeric));
    }
    lines
}

fn render_row(cells: &[&str], widths: &[usize], numeric: &[bool]) -> String {
    let line: Vec<String> = cells
        .iter()
        .zip(widths.iter().zip(numeric))
        .map(|(cell, (width, right))| {
            if *right {
                format!("{:>width$}", cell, width = *width)
            } else {
                format!("{:<width$}", cell, width = *width)
            }
        })
        .collect();
    line.join("  ").trim_end().to_string()
}

/// Shortest text for a number, without a decimal point for whole values
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tabulate_alignment() {
        let rows = vec![
            vec!["0".to_string(), "O".to_string(), "0.0001".to_string()],
            vec!["12".to_string(), "Co".to_string(), "2".to_string()],
        ];
        let lines = tabulate(&["*ipot", "tag", "xnatph"], &rows);
        assert_eq!(lines[0], "*ipot  tag  xnatph");
        assert_eq!(lines[1], "*****  ***  ******");
        assert_eq!(lines[2], "    0  O    0.0001");
        assert_eq!(lines[3], "   12  Co        2");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(0.0001), "0.0001");
        assert_eq!(format_number(-1.0), "-1");
    }
}
