/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Parser implementation for FEFF input files

use super::card::{parse_cards, Card};
use super::cluster::ClusterLine;
use super::config::ParserConfig;
use super::errors::{InputError, Result};
use super::header::header_string_from_str;
use super::model::FeffInput;
use super::potential::PotentialLine;
use super::tags::Tags;

use log::debug;
use std::fs;
use std::path::Path;

/// Main FEFF input file parser
#[derive(Debug)]
pub struct FeffInputParser {
    config: ParserConfig,
    cards: Vec<Card>,
}

impl FeffInputParser {
    /// Create a new FEFF input parser with the given configuration
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            cards: Vec::new(),
        }
    }

    /// Cards found by the last parse
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Parse a FEFF input file, defaulting to the configured path
    pub fn parse<P: AsRef<Path>>(&mut self, path: Option<P>) -> Result<FeffInput> {
        let path = match path {
            Some(p) => p.as_ref().to_path_buf(),
            None => self.config.input_path.clone(),
        };

        let text = fs::read_to_string(&path)?;
        debug!("parsing FEFF deck {}", path.display());
        self.parse_str(&text)
    }

    /// Parse deck text
    pub fn parse_str(&mut self, text: &str) -> Result<FeffInput> {
        self.cards = parse_cards(text);

        let header = header_string_from_str(text);
        let mut feff_input = FeffInput {
            header: (!header.is_empty()).then_some(header),
            tags: Tags::from_cards(&self.cards)?,
            ..FeffInput::default()
        };

        for card in &self.cards {
            match card.name.as_str() {
                "POTENTIALS" => self.parse_potentials_card(card, &mut feff_input)?,
                "ATOMS" => self.parse_atoms_card(card, &mut feff_input)?,
                "EDGE" => Self::check_edge_card(card)?,
                _ => {}
            }
        }

        if self.config.validate {
            feff_input.validate()?;
        }

        Ok(feff_input)
    }

    /// Parse POTENTIALS card rows
    fn parse_potentials_card(&self, card: &Card, input: &mut FeffInput) -> Result<()> {
        for (i, line) in card.content.iter().enumerate() {
            let row = PotentialLine::parse(line).map_err(|e| {
                InputError::ParseError(format!("line {}: {}", card.line_number + i + 1, e))
            })?;
            input.potentials.push(row);
        }
        Ok(())
    }

    /// Parse ATOMS card rows; rows without a tag take it from POTENTIALS
    fn parse_atoms_card(&self, card: &Card, input: &mut FeffInput) -> Result<()> {
        for (i, line) in card.content.iter().enumerate() {
            let mut row = ClusterLine::parse(line).map_err(|e| {
                InputError::ParseError(format!("line {}: {}", card.line_number + i + 1, e))
            })?;

            if row.symbol.is_empty() {
                row.symbol = input
                    .potentials
                    .iter()
                    .find(|p| p.ipot == row.ipot)
                    .map(|p| p.symbol.clone())
                    .unwrap_or_default();
            }
            if line.split_whitespace().count() < 7 {
                row.number = i;
            }
            input.atoms.push(row);
        }
        Ok(())
    }

    /// EDGE must name a known edge
    fn check_edge_card(card: &Card) -> Result<()> {
        let edge_type = card.value.split_whitespace().next().unwrap_or("");
        if !is_valid_edge_type(edge_type) {
            return Err(InputError::InvalidFormat(format!(
                "Invalid edge type '{}'. Valid types are K, L1, L2, L3, M1-M5, N1-N7, O1-O7, 1-23",
                edge_type
            )));
        }
        Ok(())
    }
}

/// Validates if the edge type is one of the accepted edge types in FEFF
pub fn is_valid_edge_type(edge_type: &str) -> bool {
    let valid_string_types = [
        "K", "L1", "L2", "L3", "M1", "M2", "M3", "M4", "M5", "N1", "N2", "N3", "N4", "N5", "N6",
        "N7", "O1", "O2", "O3", "O4", "O5", "O6", "O7",
    ];

    let upper = edge_type.trim().to_uppercase();
    if valid_string_types.contains(&upper.as_str()) {
        return true;
    }

    // Numerical identifiers 1-23 cover K through O7
    if let Ok(num) = upper.parse::<i32>() {
        return (1..=23).contains(&num);
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::TagValue;

    const DECK: &str = "\
* This FEFF.inp file generated by hand
TITLE Cu metal

EDGE K
S02 1.0
CONTROL 1 1 1 1 1 1

POTENTIALS
*ipot Z tag
0 29 Cu
1 29 Cu

ATOMS
0.0 0.0 0.0 0 Cu 0.0 0
1.805 1.805 0.0 1 Cu 2.55266 1
-1.805 1.805 0.0 1
END
";

    #[test]
    fn test_parse_deck() {
        let mut parser = FeffInputParser::new(ParserConfig::default());
        let input = parser.parse_str(DECK).unwrap();
        assert_eq!(
            input.header.as_deref(),
            Some("* This FEFF.inp file generated by hand\nTITLE Cu metal")
        );
        assert_eq!(input.tags.get("S02"), Some(&TagValue::Float(1.0)));
        assert_eq!(input.potentials.len(), 2);
        assert_eq!(input.atoms.len(), 3);
        assert_eq!(input.atoms[2].symbol, "Cu");
        assert_eq!(input.atoms[2].number, 2);
        assert_eq!(input.absorbing_atom(), Some("Cu"));
    }

    #[test]
    fn test_write_and_reparse() {
        let mut parser = FeffInputParser::new(ParserConfig::default());
        let input = parser.parse_str(DECK).unwrap();
        let again = parser.parse_str(&input.to_string()).unwrap();
        assert_eq!(again.tags, input.tags);
        assert_eq!(again.potentials, input.potentials);
        assert_eq!(again.atoms.len(), input.atoms.len());
    }

    #[test]
    fn test_validation() {
        let mut parser = FeffInputParser::new(ParserConfig::default());
        assert!(matches!(
            parser.parse_str("EDGE K\n"),
            Err(InputError::MissingCard(_))
        ));
        assert!(parser.parse_str("EDGE K\nRECIPROCAL\n").is_ok());
        assert!(matches!(
            parser.parse_str("EDGE Q9\nRECIPROCAL\n"),
            Err(InputError::InvalidFormat(_))
        ));

        let mut lenient = FeffInputParser::new(ParserConfig {
            validate: false,
            ..ParserConfig::default()
        });
        assert!(lenient.parse_str("EDGE K\n").is_ok());
    }

    #[test]
    fn test_edge_types() {
        assert!(is_valid_edge_type("K"));
        assert!(is_valid_edge_type("l3"));
        assert!(is_valid_edge_type("23"));
        assert!(!is_valid_edge_type("24"));
        assert!(!is_valid_edge_type("P1"));
    }
}
