/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! FEFF tag tables (PARAMETERS and the keyword part of feff.inp)

use super::card::{parse_cards, Card};
use super::errors::{InputError, Result};
use log::{debug, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Keywords FEFF understands
static VALID_FEFF_TAGS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "CONTROL", "PRINT", "ATOMS", "POTENTIALS", "RECIPROCAL", "REAL", "MARKER", "LATTICE",
        "TITLE", "RMULTIPLIER", "SGROUP", "COORDINATES", "EQUIVALENCE", "CIF", "CGRID",
        "CFAVERAGE", "OVERLAP", "EXAFS", "XANES", "ELNES", "EXELFS", "LDOS", "ELLIPTICITY",
        "MULTIPOLE", "POLARIZATION", "RHOZZP", "DANES", "FPRIME", "NRIXS", "XES", "XNCD",
        "XMCD", "XNCDCONTROL", "END", "KMESH", "EGRID", "DIMS", "AFOLP", "EDGE", "COMPTON",
        "MDFF", "HOLE", "COREHOLE", "S02", "CHBROAD", "EXCHANGE", "FOLP", "NOHOLE", "RGRID",
        "SCF", "UNFREEZEF", "CHSHIFT", "DEBYE", "INTERSTITIAL", "CHWIDTH", "EGAP", "EPS0",
        "EXTPOT", "ION", "JUMPRM", "EXPOT", "SPIN", "LJMAX", "LDEC", "MPSE", "PLASMON",
        "RPHASES", "RSIGMA", "PMBSE", "TDLDA", "FMS", "DEBYA", "OPCONS", "PREP", "RESTART",
        "SCREEN", "SETE", "STRFACTORS", "BANDSTRUCTURE", "RPATH", "NLEG", "PCRITERIA",
        "SYMMETRY", "SS", "CRITERIA", "IORDER", "NSTAR", "ABSOLUTE", "CORRECTIONS", "SIG2",
        "SIG3", "MBCONV", "SFCONV", "RCONV", "SELF", "SFSE", "MAGIC", "TARGET", "STRFAC",
    ]
    .into_iter()
    .collect()
});

/// Tags written as a multi-line electron energy loss block
pub const EELS_TAGS: [&str; 2] = ["ELNES", "EXELFS"];

/// Cards that belong to other parts of a deck
const NON_TAG_CARDS: [&str; 4] = ["ATOMS", "POTENTIALS", "END", "TITLE"];

/// Whether FEFF knows a keyword
pub fn is_valid_tag(key: &str) -> bool {
    VALID_FEFF_TAGS.contains(key.trim().to_uppercase().as_str())
}

/// Value of a FEFF tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TagValue {
    /// Keyword without arguments, e.g. `RECIPROCAL`
    Flag,
    Int(i64),
    Float(f64),
    /// Anything that is not purely numeric, kept verbatim
    Text(String),
    /// Several numbers, e.g. `KMESH 12 12 7`
    List(Vec<TagValue>),
    /// ELNES / EXELFS block
    Eels(Box<EelsBlock>),
}

impl TagValue {
    /// Interpret the text after a keyword
    ///
    /// Numeric tokens become `Int` or `Float` (a `.` or exponent makes a
    /// float), `N*v` repeats `v` N times, and any other token keeps the
    /// whole text as `Text`.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Self::Flag;
        }

        let mut values = Vec::new();
        for token in trimmed.split_whitespace() {
            match parse_numeric_token(token) {
                Some(mut expanded) => values.append(&mut expanded),
                None => return Self::Text(trimmed.to_string()),
            }
        }

        if values.len() == 1 {
            values.remove(0)
        } else {
            Self::List(values)
        }
    }

    /// Canonical form: the value as it would read back from a deck
    pub fn normalized(self) -> Self {
        match self {
            Self::Eels(block) => Self::Eels(Box::new(block.normalized())),
            Self::Text(_) | Self::List(_) => Self::parse(&self.to_string()),
            other => other,
        }
    }

    pub fn is_flag(&self) -> bool {
        matches!(self, Self::Flag)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric scalar, ints widened to float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[TagValue]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_eels(&self) -> Option<&EelsBlock> {
        match self {
            Self::Eels(block) => Some(block),
            _ => None,
        }
    }

    /// Every number of a scalar or list value
    pub fn numbers(&self) -> Option<Vec<f64>> {
        match self {
            Self::List(values) => values.iter().map(TagValue::as_float).collect(),
            scalar => scalar.as_float().map(|v| vec![v]),
        }
    }

    /// List of integers
    pub fn ints<I: IntoIterator<Item = i64>>(values: I) -> Self {
        Self::List(values.into_iter().map(Self::Int).collect())
    }
}

fn parse_numeric_token(token: &str) -> Option<Vec<TagValue>> {
    if let Some((count, value)) = token.split_once('*') {
        let count: usize = count.parse().ok().filter(|n| *n > 0)?;
        let value = parse_number(value)?;
        return Some(vec![value; count]);
    }
    parse_number(token).map(|v| vec![v])
}

fn parse_number(token: &str) -> Option<TagValue> {
    let first = token.chars().next()?;
    if !(first.is_ascii_digit() || matches!(first, '-' | '+' | '.')) {
        return None;
    }
    if token.contains(|c| matches!(c, '.' | 'e' | 'E')) {
        token
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(TagValue::Float)
    } else {
        token.parse::<i64>().ok().map(TagValue::Int)
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag => Ok(()),
            Self::Int(v) => write!(f, "{}", v),
            // Debug keeps a decimal point or exponent on every float
            Self::Float(v) => write!(f, "{:?}", v),
            Self::Text(s) => write!(f, "{}", s),
            Self::List(values) => {
                let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "{}", parts.join(" "))
            }
            Self::Eels(block) => write!(f, "{}", block.lines().join("\n")),
        }
    }
}

impl From<i64> for TagValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for TagValue {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<usize> for TagValue {
    fn from(v: usize) -> Self {
        Self::Int(v as i64)
    }
}

impl From<f64> for TagValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for TagValue {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl From<String> for TagValue {
    fn from(text: String) -> Self {
        Self::parse(&text)
    }
}

impl From<Vec<i64>> for TagValue {
    fn from(values: Vec<i64>) -> Self {
        Self::ints(values)
    }
}

impl From<Vec<f64>> for TagValue {
    fn from(values: Vec<f64>) -> Self {
        Self::List(values.into_iter().map(Self::Float).collect())
    }
}

impl From<EelsBlock> for TagValue {
    fn from(block: EelsBlock) -> Self {
        Self::Eels(Box::new(block))
    }
}

/// Electron energy loss block of an ELNES or EXELFS card
///
/// Line order in a deck: energy grid (on the keyword line), beam energy
/// `E aver cross relat`, beam direction (only when `aver` is 0), collection
/// and convergence angles, integration mesh, detector position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EelsBlock {
    pub energy: TagValue,
    pub beam_energy: TagValue,
    pub beam_direction: Option<TagValue>,
    pub angles: TagValue,
    pub mesh: TagValue,
    pub position: TagValue,
}

/// Sub-keys of an EELS block, in deck order
pub const EELS_FIELDS: [&str; 6] = [
    "ENERGY",
    "BEAM_ENERGY",
    "BEAM_DIRECTION",
    "ANGLES",
    "MESH",
    "POSITION",
];

impl EelsBlock {
    /// Whether the spectrum is averaged over sample orientation
    pub fn orientation_averaged(&self) -> bool {
        self.beam_energy
            .numbers()
            .and_then(|n| n.get(1).copied())
            .is_some_and(|aver| aver != 0.0)
    }

    /// Sub-value by name (`ENERGY`, `BEAM_ENERGY`, ...)
    pub fn get(&self, name: &str) -> Option<&TagValue> {
        match name.to_uppercase().as_str() {
            "ENERGY" => Some(&self.energy),
            "BEAM_ENERGY" => Some(&self.beam_energy),
            "BEAM_DIRECTION" => self.beam_direction.as_ref(),
            "ANGLES" => Some(&self.angles),
            "MESH" => Some(&self.mesh),
            "POSITION" => Some(&self.position),
            _ => None,
        }
    }

    /// Replace a sub-value by name
    pub fn set(&mut self, name: &str, value: impl Into<TagValue>) -> Result<()> {
        let value = value.into();
        match name.to_uppercase().as_str() {
            "ENERGY" => self.energy = value,
            "BEAM_ENERGY" => self.beam_energy = value,
            "BEAM_DIRECTION" => self.beam_direction = Some(value),
            "ANGLES" => self.angles = value,
            "MESH" => self.mesh = value,
            "POSITION" => self.position = value,
            other => {
                return Err(InputError::InvalidFormat(format!(
                    "{} is not an EELS setting; expected one of {:?}",
                    other, EELS_FIELDS
                )))
            }
        }
        Ok(())
    }

    /// Canonical form matching what a written block reads back as
    ///
    /// Orientation-averaged blocks carry no beam direction and no cross
    /// terms; oriented blocks always carry a direction (default `0 0 1`).
    fn normalized(self) -> Self {
        let mut block = Self {
            energy: self.energy.normalized(),
            beam_energy: self.beam_energy.normalized(),
            beam_direction: self.beam_direction.map(TagValue::normalized),
            angles: self.angles.normalized(),
            mesh: self.mesh.normalized(),
            position: self.position.normalized(),
        };

        if block.orientation_averaged() {
            if let TagValue::List(values) = &mut block.beam_energy {
                if values.len() > 2 {
                    values[2] = TagValue::Int(0);
                }
            }
            block.beam_direction = None;
        } else if block.beam_direction.is_none() {
            block.beam_direction = Some(TagValue::ints([0, 0, 1]));
        }
        block
    }

    /// Deck lines, the first belonging on the keyword line
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.energy.to_string(), self.beam_energy.to_string()];
        if !self.orientation_averaged() {
            if let Some(direction) = &self.beam_direction {
                lines.push(direction.to_string());
            }
        }
        lines.push(self.angles.to_string());
        lines.push(self.mesh.to_string());
        lines.push(self.position.to_string());
        lines
    }

    /// Read the block from an ELNES/EXELFS card
    pub fn from_card(card: &Card) -> Result<Self> {
        let mut rows = card.content.iter();
        let mut next_row = |what: &str| {
            rows.next().map(|r| TagValue::parse(r)).ok_or_else(|| {
                InputError::ParseError(format!(
                    "{} card at line {} is missing the {} line",
                    card.name, card.line_number, what
                ))
            })
        };

        let beam_energy = next_row("beam energy")?;
        let averaged = beam_energy
            .numbers()
            .and_then(|n| n.get(1).copied())
            .is_some_and(|aver| aver != 0.0);
        let beam_direction = if averaged {
            None
        } else {
            Some(next_row("beam direction")?)
        };

        Ok(Self {
            energy: TagValue::parse(&card.value),
            beam_energy,
            beam_direction,
            angles: next_row("angles")?,
            mesh: next_row("mesh")?,
            position: next_row("position")?,
        })
    }
}

/// Differences between two tag tables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagDiff {
    /// Tags with equal values in both tables
    pub same: BTreeMap<String, TagValue>,
    /// Tags whose values differ or that are missing from one side
    pub different: BTreeMap<String, (Option<TagValue>, Option<TagValue>)>,
}

/// FEFF tag table keyed by uppercase keyword
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags {
    tags: BTreeMap<String, TagValue>,
}

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a tag, returning the previous value
    ///
    /// Keys are stored in uppercase and values in canonical form. Keys FEFF
    /// does not know are kept with a warning.
    pub fn insert(&mut self, key: &str, value: impl Into<TagValue>) -> Option<TagValue> {
        let key = key.trim().to_uppercase();
        if !VALID_FEFF_TAGS.contains(key.as_str()) {
            warn!("{} is not a recognized FEFF tag", key);
        }
        self.tags.insert(key, value.into().normalized())
    }

    /// Case-insensitive lookup
    pub fn get(&self, key: &str) -> Option<&TagValue> {
        self.tags.get(&key.trim().to_uppercase())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<TagValue> {
        self.tags.remove(&key.trim().to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagValue)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    /// Copy every tag of `other` over this table
    pub fn update(&mut self, other: &Tags) {
        for (key, value) in &other.tags {
            self.tags.insert(key.clone(), value.clone());
        }
    }

    /// Tags read from the cards of a deck
    pub fn from_cards(cards: &[Card]) -> Result<Self> {
        let mut tags = Self::new();
        for card in cards {
            let name = card.name.as_str();
            if NON_TAG_CARDS.contains(&name) {
                continue;
            }
            if EELS_TAGS.contains(&name) {
                tags.insert(name, EelsBlock::from_card(card)?);
                continue;
            }

            let mut value = card.value.clone();
            for line in &card.content {
                value.push(' ');
                value.push_str(line);
            }
            debug!("tag {} = '{}'", name, value.trim());
            tags.insert(name, value.as_str());
        }
        Ok(tags)
    }

    /// Read tags from a PARAMETERS or feff.inp file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        fs::read_to_string(path)?.parse()
    }

    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, format!("{}\n", self))?;
        Ok(())
    }

    /// Compare two tables
    pub fn diff(&self, other: &Tags) -> TagDiff {
        let mut diff = TagDiff::default();
        for (key, value) in &self.tags {
            match other.tags.get(key) {
                Some(theirs) if theirs == value => {
                    diff.same.insert(key.clone(), value.clone());
                }
                theirs => {
                    diff.different
                        .insert(key.clone(), (Some(value.clone()), theirs.cloned()));
                }
            }
        }
        for (key, value) in &other.tags {
            if !self.tags.contains_key(key) {
                diff.different
                    .insert(key.clone(), (None, Some(value.clone())));
            }
        }
        diff
    }
}

impl FromStr for Tags {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_cards(&parse_cards(s))
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self
            .tags
            .iter()
            .map(|(key, value)| match value {
                TagValue::Flag => key.clone(),
                value => format!("{} {}", key, value),
            })
            .collect();
        write!(f, "{}", lines.join("\n"))
    }
}
