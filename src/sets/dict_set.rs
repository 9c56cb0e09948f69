/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Tag-dictionary driven FEFF input sets
//!
//! A set combines a structure or molecule, an absorbing atom and a preset
//! for one spectroscopy. Tags are assembled in a fixed order: preset, then
//! the absorption edge, then user settings, then user deletions. Reciprocal
//! space settings are resolved last, since they depend on the structure.

use super::errors::{Result, SetError};
use super::kmesh::kmesh;
use super::presets::Spectrum;
use crate::atoms::{write_cif_file, AtomicSystem, Molecule};
use crate::input::{
    cluster_from_file, is_valid_edge_type, AbsorbingAtom, Atoms, EelsBlock, Header, Potential,
    TagValue, Tags,
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Tags that only make sense for a reciprocal-space calculation
const RECIPROCAL_TAGS: [&str; 5] = ["RECIPROCAL", "CIF", "TARGET", "KMESH", "STRFAC"];

/// Sites below which a crystal may be run in reciprocal space
const SMALL_SYSTEM_SITES: usize = 14;

/// Radius written for reciprocal-space decks, which carry no cluster
const RECIPROCAL_RADIUS: f64 = 10.0;

/// Tolerance when matching a reloaded cluster against structure sites (A)
const SHELL_TOLERANCE: f64 = 1e-3;

/// Electron energy loss settings for ELNES and EXELFS sets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EelsOptions {
    /// Incident beam energy in keV, written as `E 0 1 1`
    pub beam_energy: Option<f64>,
    /// Beam direction; makes the calculation orientation dependent
    pub beam_direction: Option<[i64; 3]>,
    /// Collection semi-angle (mrad)
    pub collection_angle: Option<f64>,
    /// Convergence semi-angle (mrad)
    pub convergence_angle: Option<f64>,
    /// Block entries by name (`ENERGY`, `BEAM_ENERGY`, ...), applied last
    pub overrides: BTreeMap<String, TagValue>,
}

/// User-facing knobs of an input set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetOptions {
    /// Cluster radius in Angstrom
    pub radius: f64,
    /// Absorption edge (`K`, `L3`, ... or 1-23)
    pub edge: String,
    /// k-points for reciprocal-space runs
    pub nkpts: usize,
    /// Tags replacing or extending the preset
    pub user_tag_settings: Tags,
    /// Tags removed after all settings are applied
    pub tags_to_delete: Vec<String>,
    pub eels: EelsOptions,
}

impl Default for SetOptions {
    fn default() -> Self {
        Self {
            radius: 10.0,
            edge: "K".to_string(),
            nkpts: 1000,
            user_tag_settings: Tags::new(),
            tags_to_delete: Vec::new(),
            eels: EelsOptions::default(),
        }
    }
}

/// FEFF input set built from a tag dictionary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeffDictSet {
    absorbing_atom: AbsorbingAtom,
    absorbing_symbol: String,
    absorbing_index: usize,
    system: AtomicSystem,
    spectrum: Spectrum,
    radius: f64,
    edge: String,
    nkpts: usize,
    config_tags: Tags,
    user_tag_settings: Tags,
    tags_to_delete: Vec<String>,
    small_system: bool,
    warnings: Vec<String>,
}

impl FeffDictSet {
    /// Input set for `spectrum` around `absorbing_atom`
    ///
    /// Fails for a crystal with a net charge. A charged molecule without
    /// `ION` tags only produces a warning.
    pub fn new(
        absorbing_atom: impl Into<AbsorbingAtom>,
        system: impl Into<AtomicSystem>,
        spectrum: Spectrum,
        options: SetOptions,
    ) -> Result<Self> {
        if !is_valid_edge_type(&options.edge) {
            return Err(SetError::InvalidEdge(options.edge));
        }

        let mut config = spectrum.preset().clone();
        config.insert("EDGE", options.edge.as_str());
        if spectrum.is_eels() {
            let mut block = config
                .get(spectrum.tag())
                .and_then(TagValue::as_eels)
                .cloned()
                .ok_or_else(|| SetError::UnknownSpectrum(spectrum.to_string()))?;
            apply_eels_options(&mut block, &options.eels)?;
            config.insert(spectrum.tag(), block);
        }

        Self::assemble(
            absorbing_atom.into(),
            system.into(),
            spectrum,
            config,
            options,
        )
    }

    pub fn xanes(
        absorbing_atom: impl Into<AbsorbingAtom>,
        system: impl Into<AtomicSystem>,
        options: SetOptions,
    ) -> Result<Self> {
        Self::new(absorbing_atom, system, Spectrum::Xanes, options)
    }

    pub fn exafs(
        absorbing_atom: impl Into<AbsorbingAtom>,
        system: impl Into<AtomicSystem>,
        options: SetOptions,
    ) -> Result<Self> {
        Self::new(absorbing_atom, system, Spectrum::Exafs, options)
    }

    pub fn elnes(
        absorbing_atom: impl Into<AbsorbingAtom>,
        system: impl Into<AtomicSystem>,
        options: SetOptions,
    ) -> Result<Self> {
        Self::new(absorbing_atom, system, Spectrum::Elnes, options)
    }

    pub fn exelfs(
        absorbing_atom: impl Into<AbsorbingAtom>,
        system: impl Into<AtomicSystem>,
        options: SetOptions,
    ) -> Result<Self> {
        Self::new(absorbing_atom, system, Spectrum::Exelfs, options)
    }

    fn assemble(
        absorbing_atom: AbsorbingAtom,
        system: AtomicSystem,
        spectrum: Spectrum,
        config_tags: Tags,
        options: SetOptions,
    ) -> Result<Self> {
        let (absorbing_symbol, absorbing_index) = absorbing_atom.resolve(&system)?;

        let mut set = Self {
            absorbing_atom,
            absorbing_symbol,
            absorbing_index,
            system,
            spectrum,
            radius: options.radius,
            edge: options.edge,
            nkpts: options.nkpts,
            config_tags,
            user_tag_settings: options.user_tag_settings,
            tags_to_delete: options.tags_to_delete,
            small_system: false,
            warnings: Vec::new(),
        };

        let merged = set.merged_tags();
        let charge = set.system.charge();
        if charge != 0.0 {
            match &set.system {
                AtomicSystem::Crystal(_) => return Err(SetError::ChargedStructure(charge)),
                AtomicSystem::Molecule(_) if !merged.contains("ION") => {
                    let message = format!(
                        "Molecule has a net charge of {}; add ION tags to place the charge \
                         on specific potentials",
                        charge
                    );
                    warn!("{}", message);
                    set.warnings.push(message);
                }
                AtomicSystem::Molecule(_) => {}
            }
        }

        set.small_system = set.system.len() < SMALL_SYSTEM_SITES && !merged.contains("EXAFS");
        debug!(
            "{} set for {} (site {}) in {}: {} sites, small system: {}",
            set.spectrum,
            set.absorbing_symbol,
            set.absorbing_index,
            set.system.formula(),
            set.system.len(),
            set.small_system
        );
        Ok(set)
    }

    pub fn absorbing_atom(&self) -> &AbsorbingAtom {
        &self.absorbing_atom
    }

    /// Element of the absorbing site
    pub fn absorbing_symbol(&self) -> &str {
        &self.absorbing_symbol
    }

    pub fn absorbing_index(&self) -> usize {
        self.absorbing_index
    }

    pub fn system(&self) -> &AtomicSystem {
        &self.system
    }

    pub fn spectrum(&self) -> Spectrum {
        self.spectrum
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn edge(&self) -> &str {
        &self.edge
    }

    pub fn nkpts(&self) -> usize {
        self.nkpts
    }

    /// Preset tags with the edge and EELS options applied
    pub fn config_tags(&self) -> &Tags {
        &self.config_tags
    }

    pub fn user_tag_settings(&self) -> &Tags {
        &self.user_tag_settings
    }

    /// Whether a reciprocal-space run is allowed
    pub fn small_system(&self) -> bool {
        self.small_system
    }

    /// Non-fatal problems found while building the set
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    fn merged_tags(&self) -> Tags {
        let mut tags = self.config_tags.clone();
        tags.update(&self.user_tag_settings);
        for key in &self.tags_to_delete {
            tags.remove(key);
        }
        tags
    }

    /// The PARAMETERS of the set
    ///
    /// Small crystals asking for `RECIPROCAL` get the CIF file name, the
    /// absorber as `TARGET`, the RPA core hole and a k-mesh unless one was
    /// given. Everything reciprocal is dropped otherwise.
    pub fn tags(&self) -> Tags {
        let mut tags = self.merged_tags();
        if !tags.contains("RECIPROCAL") {
            return tags;
        }

        match self.system.as_structure() {
            Some(structure) if self.small_system => {
                tags.insert("CIF", cif_file_name(&self.system).as_str());
                tags.insert("TARGET", self.absorbing_index + 1);
                if tags.get("COREHOLE").and_then(TagValue::as_text) != Some("RPA") {
                    info!("Reciprocal space calculation: COREHOLE set to RPA");
                }
                tags.insert("COREHOLE", "RPA");
                if !tags.contains("KMESH") {
                    let mesh = kmesh(structure.lattice(), self.nkpts);
                    debug!("KMESH {:?} for {} k-points", mesh, self.nkpts);
                    tags.insert("KMESH", TagValue::ints(mesh));
                }
            }
            _ => {
                warn!(
                    "Reciprocal space calculation needs a crystal with fewer than {} sites \
                     and no EXAFS; removing reciprocal settings",
                    SMALL_SYSTEM_SITES
                );
                for key in RECIPROCAL_TAGS {
                    tags.remove(key);
                }
            }
        }
        tags
    }

    /// Whether the deck describes a reciprocal-space run
    pub fn is_reciprocal(&self) -> bool {
        self.tags().contains("RECIPROCAL")
    }

    pub fn header(&self, source: &str, comment: &str) -> Header {
        Header::new(&self.system, source, comment)
    }

    pub fn potential(&self) -> Result<Potential> {
        Ok(Potential::new(&self.system, &self.absorbing_atom)?)
    }

    pub fn atoms(&self) -> Result<Atoms> {
        Ok(Atoms::new(&self.system, &self.absorbing_atom, self.radius)?)
    }

    /// Text of every deck part, in feff.inp order
    ///
    /// Reciprocal runs read the structure from the CIF file and carry no
    /// POTENTIALS or ATOMS.
    pub fn all_input(&self) -> Result<Vec<(&'static str, String)>> {
        let tags = self.tags();
        let mut blocks = vec![
            ("HEADER", self.header("", "").to_string()),
            ("PARAMETERS", tags.to_string()),
        ];
        if !tags.contains("RECIPROCAL") {
            blocks.push(("POTENTIALS", self.potential()?.to_string()));
            blocks.push(("ATOMS", self.atoms()?.to_string()));
        }
        Ok(blocks)
    }

    /// Write each deck part, the combined feff.inp and, for reciprocal
    /// runs, the CIF file into `dir`
    pub fn write_input<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let blocks = self.all_input()?;
        for (name, text) in &blocks {
            fs::write(dir.join(name), format!("{}\n", text))?;
        }
        let deck: Vec<&str> = blocks.iter().map(|(_, text)| text.as_str()).collect();
        fs::write(dir.join("feff.inp"), format!("{}\n", deck.join("\n\n")))?;

        let tags = self.tags();
        if tags.contains("RECIPROCAL") {
            if let (Some(structure), Some(cif)) = (
                self.system.as_structure(),
                tags.get("CIF").map(TagValue::to_string),
            ) {
                write_cif_file(structure, dir.join(cif))?;
            }
        }
        info!("Wrote {} input to {}", self.spectrum, dir.display());
        Ok(())
    }

    /// Rebuild a set from a directory written by [`FeffDictSet::write_input`]
    ///
    /// The structure comes from HEADER and the tags from PARAMETERS. The
    /// absorber is TARGET for reciprocal runs; otherwise it is the site
    /// whose neighbor shell reproduces the ATOMS cluster in feff.inp.
    pub fn from_directory<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let header = Header::from_file(dir.join("HEADER"))?;
        let tags = Tags::from_file(dir.join("PARAMETERS"))?;
        let system = header.system().clone();

        let spectrum = Spectrum::from_tags(&tags).ok_or_else(|| {
            SetError::UnknownSpectrum(format!(
                "no XANES, EXAFS, ELNES or EXELFS tag in {}",
                dir.join("PARAMETERS").display()
            ))
        })?;

        let (absorbing_index, radius) = if tags.contains("RECIPROCAL") {
            let target = tags
                .get("TARGET")
                .and_then(TagValue::as_int)
                .filter(|t| *t >= 1)
                .ok_or_else(|| {
                    SetError::Reload("reciprocal deck without a valid TARGET".to_string())
                })?;
            ((target - 1) as usize, RECIPROCAL_RADIUS)
        } else {
            let cluster = cluster_from_file(dir.join("feff.inp"))?;
            let index = match_absorber(&system, &cluster)?;
            let last = cluster
                .atoms()
                .last()
                .map(|atom| atom.position().length())
                .unwrap_or(0.0);
            (index, last.ceil())
        };

        let edge = tags
            .get("EDGE")
            .map(TagValue::to_string)
            .unwrap_or_else(|| "K".to_string());
        let options = SetOptions {
            radius,
            edge,
            ..Default::default()
        };

        Self::assemble(
            AbsorbingAtom::Index(absorbing_index),
            system,
            spectrum,
            tags,
            options,
        )
    }

    /// JSON form of the set
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// `Co2O2.cif` for a Co2 O2 cell
fn cif_file_name(system: &AtomicSystem) -> String {
    format!("{}.cif", system.formula().replace(' ', ""))
}

/// Integral values become integers, so `100.0` is written as `100`
fn whole_or_float(value: f64) -> TagValue {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        TagValue::Int(value as i64)
    } else {
        TagValue::Float(value)
    }
}

fn apply_eels_options(block: &mut EelsBlock, options: &EelsOptions) -> Result<()> {
    if let Some(energy) = options.beam_energy {
        block.beam_energy = TagValue::List(vec![
            whole_or_float(energy),
            TagValue::Int(0),
            TagValue::Int(1),
            TagValue::Int(1),
        ]);
    }

    if let Some(direction) = options.beam_direction {
        block.beam_direction = Some(TagValue::ints(direction));
        // A direction only counts for oriented samples
        if let TagValue::List(values) = &mut block.beam_energy {
            if let Some(aver) = values.get_mut(1) {
                *aver = TagValue::Int(0);
            }
        }
    }

    if options.collection_angle.is_some() || options.convergence_angle.is_some() {
        let current = block.angles.numbers().unwrap_or_default();
        let pick = |given: Option<f64>, k: usize| {
            given
                .or_else(|| current.get(k).copied())
                .map_or(TagValue::Int(1), whole_or_float)
        };
        block.angles = TagValue::List(vec![
            pick(options.collection_angle, 0),
            pick(options.convergence_angle, 1),
        ]);
    }

    for (name, value) in &options.overrides {
        block.set(name, value.clone())?;
    }
    Ok(())
}

/// Site whose neighbor shell matches a cluster read back from ATOMS
fn match_absorber(system: &AtomicSystem, cluster: &Molecule) -> Result<usize> {
    let absorber = cluster
        .atoms()
        .first()
        .ok_or_else(|| SetError::Reload("feff.inp has an empty ATOMS block".to_string()))?;

    let shell: Vec<(f64, &str)> = cluster.atoms()[1..]
        .iter()
        .map(|atom| (atom.position().length(), atom.symbol()))
        .collect();
    let reach = shell.iter().map(|(d, _)| *d).fold(0.0, f64::max) + SHELL_TOLERANCE;

    for index in system.indices_from_symbol(absorber.symbol()) {
        let neighbors = system.neighbors(index, reach)?;
        if neighbors.len() != shell.len() {
            continue;
        }

        let mut used = vec![false; neighbors.len()];
        let all_matched = shell.iter().all(|(distance, symbol)| {
            let found = neighbors.iter().enumerate().position(|(k, n)| {
                !used[k] && n.symbol == *symbol && (n.distance - distance).abs() < SHELL_TOLERANCE
            });
            match found {
                Some(k) => {
                    used[k] = true;
                    true
                }
                None => false,
            }
        });
        if all_matched {
            debug!("cluster matches site {} ({})", index, absorber.symbol());
            return Ok(index);
        }
    }

    Err(SetError::Reload(format!(
        "no {} site reproduces the ATOMS cluster",
        absorber.symbol()
    )))
}
