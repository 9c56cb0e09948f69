/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Element database
//!
//! Element symbols, atomic numbers and Pauling electronegativities. The
//! electronegativity decides the element order of chemical formulas written
//! into FEFF headers and CIF file names.

/// (symbol, Pauling electronegativity) indexed by `Z - 1`
const ELEMENTS: [(&str, Option<f64>); 118] = [
    ("H", Some(2.2)),
    ("He", None),
    ("Li", Some(0.98)),
    ("Be", Some(1.57)),
    ("B", Some(2.04)),
    ("C", Some(2.55)),
    ("N", Some(3.04)),
    ("O", Some(3.44)),
    ("F", Some(3.98)),
    ("Ne", None),
    ("Na", Some(0.93)),
    ("Mg", Some(1.31)),
    ("Al", Some(1.61)),
    ("Si", Some(1.9)),
    ("P", Some(2.19)),
    ("S", Some(2.58)),
    ("Cl", Some(3.16)),
    ("Ar", None),
    ("K", Some(0.82)),
    ("Ca", Some(1.0)),
    ("Sc", Some(1.36)),
    ("Ti", Some(1.54)),
    ("V", Some(1.63)),
    ("Cr", Some(1.66)),
    ("Mn", Some(1.55)),
    ("Fe", Some(1.83)),
    ("Co", Some(1.88)),
    ("Ni", Some(1.91)),
    ("Cu", Some(1.9)),
    ("Zn", Some(1.65)),
    ("Ga", Some(1.81)),
    ("Ge", Some(2.01)),
    ("As", Some(2.18)),
    ("Se", Some(2.55)),
    ("Br", Some(2.96)),
    ("Kr", Some(3.0)),
    ("Rb", Some(0.82)),
    ("Sr", Some(0.95)),
    ("Y", Some(1.22)),
    ("Zr", Some(1.33)),
    ("Nb", Some(1.6)),
    ("Mo", Some(2.16)),
    ("Tc", Some(1.9)),
    ("Ru", Some(2.2)),
    ("Rh", Some(2.28)),
    ("Pd", Some(2.2)),
    ("Ag", Some(1.93)),
    ("Cd", Some(1.69)),
    ("In", Some(1.78)),
    ("Sn", Some(1.96)),
    ("Sb", Some(2.05)),
    ("Te", Some(2.1)),
    ("I", Some(2.66)),
    ("Xe", Some(2.6)),
    ("Cs", Some(0.79)),
    ("Ba", Some(0.89)),
    ("La", Some(1.1)),
    ("Ce", Some(1.12)),
    ("Pr", Some(1.13)),
    ("Nd", Some(1.14)),
    ("Pm", Some(1.13)),
    ("Sm", Some(1.17)),
    ("Eu", Some(1.2)),
    ("Gd", Some(1.2)),
    ("Tb", Some(1.1)),
    ("Dy", Some(1.22)),
    ("Ho", Some(1.23)),
    ("Er", Some(1.24)),
    ("Tm", Some(1.25)),
    ("Yb", Some(1.1)),
    ("Lu", Some(1.27)),
    ("Hf", Some(1.3)),
    ("Ta", Some(1.5)),
    ("W", Some(2.36)),
    ("Re", Some(1.9)),
    ("Os", Some(2.2)),
    ("Ir", Some(2.2)),
    ("Pt", Some(2.28)),
    ("Au", Some(2.54)),
    ("Hg", Some(2.0)),
    ("Tl", Some(1.62)),
    ("Pb", Some(2.33)),
    ("Bi", Some(2.02)),
    ("Po", Some(2.0)),
    ("At", Some(2.2)),
    ("Rn", Some(2.2)),
    ("Fr", Some(0.7)),
    ("Ra", Some(0.9)),
    ("Ac", Some(1.1)),
    ("Th", Some(1.3)),
    ("Pa", Some(1.5)),
    ("U", Some(1.38)),
    ("Np", Some(1.36)),
    ("Pu", Some(1.28)),
    ("Am", Some(1.13)),
    ("Cm", Some(1.28)),
    ("Bk", Some(1.3)),
    ("Cf", Some(1.3)),
    ("Es", Some(1.3)),
    ("Fm", Some(1.3)),
    ("Md", Some(1.3)),
    ("No", Some(1.3)),
    ("Lr", Some(1.3)),
    ("Rf", None),
    ("Db", None),
    ("Sg", None),
    ("Bh", None),
    ("Hs", None),
    ("Mt", None),
    ("Ds", None),
    ("Rg", None),
    ("Cn", None),
    ("Nh", None),
    ("Fl", None),
    ("Mc", None),
    ("Lv", None),
    ("Ts", None),
    ("Og", None),
];

/// Provides the element symbol for an atomic number
pub fn element_symbol(atomic_number: i32) -> Option<&'static str> {
    if !(1..=118).contains(&atomic_number) {
        return None;
    }
    Some(ELEMENTS[(atomic_number - 1) as usize].0)
}

/// Returns the atomic number for an element symbol
///
/// This function is case-insensitive and will handle both "Fe" and "FE"
pub fn atomic_number_from_symbol(symbol: &str) -> Option<i32> {
    let symbol = symbol.trim();
    if symbol.is_empty() || symbol.len() > 3 {
        return None;
    }

    ELEMENTS
        .iter()
        .position(|(s, _)| s.eq_ignore_ascii_case(symbol))
        .map(|idx| idx as i32 + 1)
}

/// Pauling electronegativity, `None` for elements without a tabulated value
pub fn electronegativity(atomic_number: i32) -> Option<f64> {
    if !(1..=118).contains(&atomic_number) {
        return None;
    }
    ELEMENTS[(atomic_number - 1) as usize].1
}

/// Strips oxidation-state decorations and labels from a species string
///
/// `"Fe2+"`, `"Fe1"` and `"fe"` all map to `"Fe"`. Returns `None` when the
/// remaining letters are not an element symbol.
pub fn normalize_symbol(species: &str) -> Option<&'static str> {
    let letters: String = species
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();

    // Labels such as "Cl1" or "Co" are tried as two letters first, then one
    let candidates = [letters.get(..2), letters.get(..1)];
    let atomic_number = candidates
        .into_iter()
        .flatten()
        .find_map(atomic_number_from_symbol);
    atomic_number.and_then(element_symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_lookup() {
        assert_eq!(element_symbol(8), Some("O"));
        assert_eq!(element_symbol(27), Some("Co"));
        assert_eq!(element_symbol(118), Some("Og"));
        assert_eq!(element_symbol(0), None);
        assert_eq!(element_symbol(119), None);
    }

    #[test]
    fn test_atomic_number_lookup() {
        assert_eq!(atomic_number_from_symbol("Fe"), Some(26));
        assert_eq!(atomic_number_from_symbol("FE"), Some(26));
        assert_eq!(atomic_number_from_symbol("zn"), Some(30));
        assert_eq!(atomic_number_from_symbol("Xx"), None);
        assert_eq!(atomic_number_from_symbol(""), None);
    }

    #[test]
    fn test_electronegativity_ordering() {
        let co = electronegativity(27).unwrap();
        let o = electronegativity(8).unwrap();
        assert!(co < o);
        assert_eq!(electronegativity(2), None);
    }

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol("Fe2+"), Some("Fe"));
        assert_eq!(normalize_symbol("O1"), Some("O"));
        assert_eq!(normalize_symbol("Co"), Some("Co"));
        assert_eq!(normalize_symbol("Cl3"), Some("Cl"));
        assert_eq!(normalize_symbol("123"), None);
    }
}
