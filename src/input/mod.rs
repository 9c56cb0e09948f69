/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! FEFF deck formats
//!
//! Tag tables (PARAMETERS), the structure HEADER, the POTENTIALS and ATOMS
//! listings, and a whole-deck parser for feff.inp files.

pub mod absorber;
pub mod card;
pub mod cluster;
pub mod config;
pub mod errors;
pub mod header;
pub mod model;
pub mod parser;
pub mod potential;
pub mod tags;
mod table;

pub use absorber::AbsorbingAtom;
pub use card::Card;
pub use cluster::{
    atoms_string_from_file, atoms_string_from_str, cluster_from_file, cluster_from_str, Atoms,
    ClusterLine,
};
pub use config::ParserConfig;
pub use errors::{InputError, Result};
pub use header::{header_string_from_file, header_string_from_str, Header};
pub use model::FeffInput;
pub use parser::{is_valid_edge_type, FeffInputParser};
pub use potential::{
    pot_dict_from_string, pot_string_from_file, pot_string_from_str, Potential, PotentialLine,
};
pub use tags::{EelsBlock, TagDiff, TagValue, Tags};

use std::path::Path;

/// Parse a FEFF input file with default configuration
pub fn parse_feff_input<P: AsRef<Path>>(path: P) -> Result<FeffInput> {
    let config = ParserConfig {
        input_path: path.as_ref().to_path_buf(),
        ..Default::default()
    };

    let mut parser = FeffInputParser::new(config);
    parser.parse::<&Path>(None)
}
