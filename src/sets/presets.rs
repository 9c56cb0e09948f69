/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Preset tag tables for the supported spectroscopies

use super::errors::SetError;
use crate::input::{EelsBlock, TagValue, Tags};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Spectroscopy an input set is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Spectrum {
    Xanes,
    Exafs,
    Elnes,
    Exelfs,
}

impl Spectrum {
    pub const ALL: [Spectrum; 4] = [
        Spectrum::Xanes,
        Spectrum::Exafs,
        Spectrum::Elnes,
        Spectrum::Exelfs,
    ];

    /// FEFF keyword that selects this spectroscopy
    pub fn tag(self) -> &'static str {
        match self {
            Spectrum::Xanes => "XANES",
            Spectrum::Exafs => "EXAFS",
            Spectrum::Elnes => "ELNES",
            Spectrum::Exelfs => "EXELFS",
        }
    }

    /// Whether the deck carries an electron energy loss block
    pub fn is_eels(self) -> bool {
        matches!(self, Spectrum::Elnes | Spectrum::Exelfs)
    }

    /// Spectroscopy named by the tags of a deck, if any
    pub fn from_tags(tags: &Tags) -> Option<Self> {
        Self::ALL.into_iter().find(|s| tags.contains(s.tag()))
    }

    /// Preset tags, without user settings
    pub fn preset(self) -> &'static Tags {
        match self {
            Spectrum::Xanes => &XANES_PRESET,
            Spectrum::Exafs => &EXAFS_PRESET,
            Spectrum::Elnes => &ELNES_PRESET,
            Spectrum::Exelfs => &EXELFS_PRESET,
        }
    }
}

impl fmt::Display for Spectrum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for Spectrum {
    type Err = SetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|spectrum| spectrum.tag().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SetError::UnknownSpectrum(s.to_string()))
    }
}

fn table(entries: &[(&str, &str)]) -> Tags {
    let mut tags = Tags::new();
    for (key, value) in entries {
        tags.insert(key, *value);
    }
    tags
}

/// Default EELS block; `energy` is the grid on the keyword line
pub fn default_eels_block(energy: &str) -> EelsBlock {
    EelsBlock {
        energy: TagValue::parse(energy),
        beam_energy: TagValue::parse("100 1 0 1"),
        beam_direction: Some(TagValue::parse("0 0 1")),
        angles: TagValue::parse("1 1"),
        mesh: TagValue::parse("50 1"),
        position: TagValue::parse("0.0 0.0"),
    }
}

static XANES_PRESET: Lazy<Tags> = Lazy::new(|| {
    table(&[
        ("CONTROL", "1 1 1 1 1 1"),
        ("XANES", "4 0.04 0.1"),
        ("SCF", "7.0 0 30 0.2 1"),
        ("FMS", "9.0 0"),
        ("LDOS", "-30.0 15.0 0.1"),
        ("RPATH", "-1"),
        ("EXCHANGE", "0 0.0 0.0 2"),
        ("COREHOLE", "FSR"),
        ("PRINT", "1 0 0 0 0 3"),
        ("S02", "0.0"),
        ("EDGE", "K"),
    ])
});

static EXAFS_PRESET: Lazy<Tags> = Lazy::new(|| {
    table(&[
        ("CONTROL", "1 1 1 1 1 1"),
        ("PRINT", "1 0 0 0 0 0"),
        ("EXCHANGE", "0 0.0 0.0 0"),
        ("S02", "0.0"),
        ("COREHOLE", "FSR"),
        ("SCF", "4.5 0 30 0.2 1"),
        ("EDGE", "K"),
        ("RPATH", "10"),
        ("EXAFS", "20"),
    ])
});

/// Potential and multiple-scattering settings shared by the EELS presets
fn eels_base() -> Tags {
    table(&[
        ("CONTROL", "1 1 1 1 1 1"),
        ("SCF", "7.0 0 30 0.2 1"),
        ("FMS", "9.0 0"),
        ("LDOS", "-30.0 15.0 0.1"),
        ("RPATH", "-1"),
        ("EXCHANGE", "0 0.0 0.0 2"),
        ("COREHOLE", "FSR"),
        ("PRINT", "1 0 0 0 0 0"),
        ("S02", "0.0"),
        ("EDGE", "K"),
    ])
}

static ELNES_PRESET: Lazy<Tags> = Lazy::new(|| {
    let mut tags = eels_base();
    tags.insert("ELNES", default_eels_block("4 0.04 0.1"));
    tags
});

static EXELFS_PRESET: Lazy<Tags> = Lazy::new(|| {
    let mut tags = eels_base();
    tags.insert("EXELFS", default_eels_block("20"));
    tags
});
