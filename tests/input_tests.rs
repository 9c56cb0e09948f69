/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

use approx::assert_relative_eq;
use feff_io::atoms::{AtomicSystem, Lattice, Structure};
use feff_io::input::{
    atoms_string_from_str, header_string_from_str, is_valid_edge_type, parse_feff_input,
    pot_string_from_str, AbsorbingAtom, Atoms, FeffInputParser, InputError, ParserConfig,
    Potential, TagValue, Tags,
};
use feff_io::sets::Spectrum;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};

fn write_deck(content: &str) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("feff.inp");
    fs::write(&path, content).unwrap();
    (dir, path)
}

fn rocksalt() -> Structure {
    let lattice = Lattice::cubic(4.2).unwrap();
    Structure::from_fractional(
        lattice,
        &["Mg", "Mg", "Mg", "Mg", "O", "O", "O", "O"],
        &[
            [0.0, 0.0, 0.0],
            [0.5, 0.5, 0.0],
            [0.5, 0.0, 0.5],
            [0.0, 0.5, 0.5],
            [0.5, 0.0, 0.0],
            [0.0, 0.5, 0.0],
            [0.0, 0.0, 0.5],
            [0.5, 0.5, 0.5],
        ],
    )
    .unwrap()
}

const MINIMAL_DECK: &str = "TITLE minimal deck

EDGE K
S02 1.0
CONTROL 1 1 1 1 1 1

POTENTIALS
*    ipot   Z  tag
   0  26  Fe
   1   8  O

ATOMS
*   x          y          z      ipot  tag
   0.000000   0.000000   0.000000  0  Fe  0.000000  0
   0.000000   0.000000   2.000000  1  O   2.000000  1
   2.000000   0.000000   0.000000  1  O   2.000000  2
END
";

#[test]
fn test_parse_minimal_deck() {
    let (_dir, path) = write_deck(MINIMAL_DECK);
    let input = parse_feff_input(&path).unwrap();

    assert_eq!(input.potentials.len(), 2);
    assert_eq!(input.potentials[0].atomic_number, 26);
    assert_eq!(input.absorbing_atom(), Some("Fe"));
    assert_eq!(input.atoms.len(), 3);
    assert_eq!(input.atoms[2].symbol, "O");
    assert_relative_eq!(input.atoms[1].distance, 2.0);

    assert_eq!(input.tags.get("EDGE"), Some(&TagValue::Text("K".to_string())));
    assert_eq!(input.tags.get("S02"), Some(&TagValue::Float(1.0)));
    assert_eq!(input.tags.get("CONTROL"), Some(&TagValue::ints([1, 1, 1, 1, 1, 1])));
    assert!(input.validate().is_ok());
}

#[test]
fn test_parse_missing_file() {
    let dir = tempdir().unwrap();
    let result = parse_feff_input(dir.path().join("missing.inp"));
    assert!(matches!(result, Err(InputError::IoError(_))));
}

#[test]
fn test_empty_deck_fails_validation() {
    let (_dir, path) = write_deck("");
    let result = parse_feff_input(&path);
    assert!(matches!(result, Err(InputError::MissingCard(_))));
}

#[test]
fn test_validation_can_be_disabled() {
    let (_dir, path) = write_deck("EDGE K\nS02 0.9\n");
    let mut parser = FeffInputParser::new(ParserConfig {
        input_path: path,
        validate: false,
    });
    let input = parser.parse::<&std::path::Path>(None).unwrap();
    assert_eq!(input.tags.len(), 2);
    assert!(input.atoms.is_empty());
}

#[test]
fn test_two_absorbers_rejected() {
    let deck = MINIMAL_DECK.replace(
        "2.000000   0.000000   0.000000  1",
        "2.000000   0.000000   0.000000  0",
    );
    let (_dir, path) = write_deck(&deck);
    assert!(matches!(parse_feff_input(&path), Err(InputError::InvalidPotential(_))));
}

#[test]
fn test_unknown_ipot_rejected() {
    let deck = MINIMAL_DECK.replace("2.000000  1", "2.000000  3");
    let (_dir, path) = write_deck(&deck);
    assert!(parse_feff_input(&path).is_err());
}

#[test]
fn test_invalid_edge_card() {
    let deck = MINIMAL_DECK.replace("EDGE K", "EDGE Q9");
    let (_dir, path) = write_deck(&deck);
    assert!(matches!(parse_feff_input(&path), Err(InputError::InvalidFormat(_))));
}

#[rstest]
#[case("K", true)]
#[case("l3", true)]
#[case("M5", true)]
#[case("N7", true)]
#[case("23", true)]
#[case("L4", false)]
#[case("", false)]
fn test_edge_names(#[case] edge: &str, #[case] valid: bool) {
    assert_eq!(is_valid_edge_type(edge), valid);
}

#[rstest]
#[case(Spectrum::Xanes)]
#[case(Spectrum::Exafs)]
#[case(Spectrum::Elnes)]
#[case(Spectrum::Exelfs)]
fn test_preset_tags_survive_rendering(#[case] spectrum: Spectrum) {
    let preset = spectrum.preset();
    let parsed: Tags = preset.to_string().parse().unwrap();
    assert_eq!(&parsed, preset);
}

#[test]
fn test_user_values_survive_rendering() {
    let mut tags = Tags::new();
    tags.insert("SCF", vec![4.5, 0.0, 30.0, 0.2, 1.0]);
    tags.insert("EDGE", "L3");
    tags.insert("S02", 0.0);
    tags.insert("NOHOLE", "");
    tags.insert("EXCHANGE", "0 0.0 -2.0 0");

    let parsed: Tags = tags.to_string().parse().unwrap();
    assert_eq!(parsed, tags);
    assert!(parsed.get("NOHOLE").unwrap().is_flag());
    assert_eq!(parsed.get("S02").and_then(TagValue::as_float), Some(0.0));
}

#[test]
fn test_generated_blocks_parse_back() {
    let system = AtomicSystem::from(rocksalt());
    let absorber = AbsorbingAtom::Symbol("O".to_string());

    let atoms = Atoms::new(&system, &absorber, 5.0).unwrap();
    let lines = atoms.lines();
    let block = atoms_string_from_str(&atoms.to_string()).unwrap();
    let deck = format!("{}\n{}", Potential::new(&system, &absorber).unwrap(), block);

    let mut parser = FeffInputParser::new(ParserConfig::default());
    let input = parser.parse_str(&deck).unwrap();

    assert_eq!(input.atoms.len(), lines.len());
    for (parsed, written) in input.atoms.iter().zip(&lines) {
        assert_eq!(parsed.ipot, written.ipot);
        assert_eq!(parsed.symbol, written.symbol);
        assert_relative_eq!(parsed.distance, written.distance, epsilon = 1e-6);
    }

    let distances: Vec<f64> = input.atoms.iter().map(|a| a.distance).collect();
    assert!(distances.windows(2).all(|w| w[0] <= w[1] + 1e-9));
    assert_relative_eq!(distances[1], 2.1, epsilon = 1e-6);
    assert_eq!(input.absorbing_atom(), Some("O"));
}

#[test]
fn test_block_extraction() {
    let pot = pot_string_from_str(MINIMAL_DECK).unwrap();
    assert!(pot.starts_with("POTENTIALS"));
    assert!(!pot.contains("ATOMS"));

    let atoms = atoms_string_from_str(MINIMAL_DECK).unwrap();
    assert!(atoms.starts_with("ATOMS"));
    let rows = atoms
        .lines()
        .skip(1)
        .filter(|l| !l.trim_start().starts_with('*') && l.trim() != "END")
        .count();
    assert_eq!(rows, 3);

    assert_eq!(header_string_from_str(MINIMAL_DECK), "TITLE minimal deck");
}
