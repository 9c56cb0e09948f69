/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Chemical composition and formula strings

use super::atom::Atom;
use super::database;
use serde::{Deserialize, Serialize};

/// Element amounts in order of first appearance
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Composition {
    amounts: Vec<(String, f64)>,
}

impl Composition {
    /// Count the elements of a list of sites
    pub fn from_atoms<'a, I>(atoms: I) -> Self
    where
        I: IntoIterator<Item = &'a Atom>,
    {
        let mut composition = Self::default();
        for atom in atoms {
            composition.add(atom.symbol(), 1.0);
        }
        composition
    }

    /// Add `amount` of `symbol`
    pub fn add(&mut self, symbol: &str, amount: f64) {
        match self.amounts.iter_mut().find(|(s, _)| s == symbol) {
            Some((_, existing)) => *existing += amount,
            None => self.amounts.push((symbol.to_string(), amount)),
        }
    }

    /// Amount of an element, zero when absent
    pub fn amount(&self, symbol: &str) -> f64 {
        self.amounts
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, a)| *a)
            .unwrap_or(0.0)
    }

    /// (symbol, amount) pairs in order of first appearance
    pub fn items(&self) -> impl Iterator<Item = (&str, f64)> {
        self.amounts.iter().map(|(s, a)| (s.as_str(), *a))
    }

    pub fn num_elements(&self) -> usize {
        self.amounts.len()
    }

    pub fn num_atoms(&self) -> f64 {
        self.amounts.iter().map(|(_, a)| a).sum()
    }

    /// Elements sorted by electronegativity; ties keep appearance order
    fn sorted_by_electronegativity(&self) -> Vec<(&str, f64)> {
        let mut items: Vec<(&str, f64)> = self.items().collect();
        items.sort_by(|(a, _), (b, _)| {
            let xa = electronegativity_key(a);
            let xb = electronegativity_key(b);
            xa.total_cmp(&xb)
        });
        items
    }

    /// Full formula, e.g. `"Co2 O2"`
    pub fn formula(&self) -> String {
        self.sorted_by_electronegativity()
            .into_iter()
            .map(|(s, a)| format!("{}{}", s, format_amount(a, false)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Formula divided by the greatest common divisor of the amounts, e.g. `"CoO"`
    pub fn reduced_formula(&self) -> String {
        let factor = self.reduction_factor();
        self.sorted_by_electronegativity()
            .into_iter()
            .map(|(s, a)| format!("{}{}", s, format_amount(a / factor, true)))
            .collect::<Vec<_>>()
            .join("")
    }

    /// Greatest common divisor of the amounts when they are all integers, else 1
    pub fn reduction_factor(&self) -> f64 {
        let mut gcd = 0_u64;
        for (_, amount) in &self.amounts {
            if amount.fract().abs() > 1e-8 || *amount < 0.5 {
                return 1.0;
            }
            gcd = greatest_common_divisor(gcd, amount.round() as u64);
        }
        if gcd == 0 {
            1.0
        } else {
            gcd as f64
        }
    }
}

fn electronegativity_key(symbol: &str) -> f64 {
    database::atomic_number_from_symbol(symbol)
        .and_then(database::electronegativity)
        .unwrap_or(f64::INFINITY)
}

fn greatest_common_divisor(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        greatest_common_divisor(b, a % b)
    }
}

/// Integers print without a decimal point; `omit_one` drops a lone 1
fn format_amount(amount: f64, omit_one: bool) -> String {
    if omit_one && (amount - 1.0).abs() < 1e-8 {
        return String::new();
    }
    if (amount - amount.round()).abs() < 1e-8 {
        format!("{}", amount.round() as i64)
    } else {
        let rounded = (amount * 1e8).round() / 1e8;
        format!("{}", rounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composition(items: &[(&str, f64)]) -> Composition {
        let mut c = Composition::default();
        for (s, a) in items {
            c.add(s, *a);
        }
        c
    }

    #[test]
    fn test_formula_ordering() {
        let c = composition(&[("O", 2.0), ("Co", 2.0)]);
        assert_eq!(c.formula(), "Co2 O2");
        assert_eq!(c.reduced_formula(), "CoO");
    }

    #[test]
    fn test_reduced_formula() {
        let c = composition(&[("La", 4.0), ("Fe", 4.0), ("O", 12.0)]);
        assert_eq!(c.formula(), "La4 Fe4 O12");
        assert_eq!(c.reduced_formula(), "LaFeO3");
        assert_eq!(c.reduction_factor(), 4.0);
        assert_eq!(c.num_atoms(), 20.0);
    }

    #[test]
    fn test_fractional_amounts() {
        let c = composition(&[("Fe", 0.5), ("O", 1.0)]);
        assert_eq!(c.formula(), "Fe0.5 O1");
        assert_eq!(c.reduction_factor(), 1.0);
    }
}
