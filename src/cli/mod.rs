/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Command Line Interface (CLI) module
//!
//! Subcommands:
//! - `generate`: build a FEFF deck for a structure (CIF) or molecule (XYZ)
//! - `tags`: print the tags of a feff.inp or PARAMETERS file
//! - `cube`: summarize or rewrite a cube file

use crate::atoms::{read_cif, read_xyz, AtomicSystem};
use crate::input::{AbsorbingAtom, Tags};
use crate::sets::{FeffDictSet, SetOptions, Spectrum};
use crate::volumetric::VolumetricData;
use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use std::path::{Path, PathBuf};

/// feff-io - FEFF input generation and file format tools
#[derive(Parser, Debug)]
#[command(name = "feff-io")]
#[command(version)]
#[command(about = "Generate FEFF decks and read FEFF and cube files", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a FEFF input set for a structure or molecule
    Generate(GenerateArgs),

    /// Print the tags of a FEFF deck
    Tags(TagsArgs),

    /// Summarize a cube file, optionally rewriting it
    Cube(CubeArgs),
}

/// Spectroscopy presets
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SpectrumArg {
    Xanes,
    Exafs,
    Elnes,
    Exelfs,
}

impl From<SpectrumArg> for Spectrum {
    fn from(arg: SpectrumArg) -> Self {
        match arg {
            SpectrumArg::Xanes => Spectrum::Xanes,
            SpectrumArg::Exafs => Spectrum::Exafs,
            SpectrumArg::Elnes => Spectrum::Elnes,
            SpectrumArg::Exelfs => Spectrum::Exelfs,
        }
    }
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Structure (.cif) or molecule (.xyz)
    pub input: PathBuf,

    /// Absorbing element symbol, or zero-based site index
    #[arg(short, long)]
    pub absorber: String,

    #[arg(short, long, value_enum, default_value_t = SpectrumArg::Xanes)]
    pub spectrum: SpectrumArg,

    /// Cluster radius in Angstrom
    #[arg(short, long, default_value_t = 10.0)]
    pub radius: f64,

    #[arg(short, long, default_value = "K")]
    pub edge: String,

    /// k-points for reciprocal-space runs
    #[arg(long, default_value_t = 1000)]
    pub nkpts: usize,

    /// Extra tag as KEY=VALUE (repeatable; empty value for flags)
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,

    /// Tag to remove from the preset (repeatable)
    #[arg(long = "delete")]
    pub delete: Vec<String>,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct TagsArgs {
    /// feff.inp or PARAMETERS file
    pub input: PathBuf,

    /// Print JSON instead of deck text
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CubeArgs {
    pub input: PathBuf,

    /// Print the summary as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Write the data back out to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Run a parsed command line
pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate(args) => generate(args),
        Commands::Tags(args) => print_tags(args),
        Commands::Cube(args) => cube(args),
    }
}

fn load_system(path: &Path) -> anyhow::Result<AtomicSystem> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    let system = match extension.as_str() {
        "cif" => AtomicSystem::from(read_cif(path)?),
        "xyz" => AtomicSystem::from(read_xyz(path)?),
        other => bail!("unsupported structure format '{}': use .cif or .xyz", other),
    };
    Ok(system)
}

/// `KEY=VALUE` pairs as a tag table
fn parse_tag_args(pairs: &[String]) -> anyhow::Result<Tags> {
    let mut tags = Tags::new();
    for pair in pairs {
        let (key, value) = pair.split_once('=').unwrap_or((pair.as_str(), ""));
        if key.trim().is_empty() {
            bail!("tag '{}' has no keyword", pair);
        }
        tags.insert(key, value);
    }
    Ok(tags)
}

fn generate(args: GenerateArgs) -> anyhow::Result<()> {
    let system = load_system(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let absorber = match args.absorber.parse::<usize>() {
        Ok(index) => AbsorbingAtom::Index(index),
        Err(_) => AbsorbingAtom::Symbol(args.absorber.clone()),
    };

    let options = SetOptions {
        radius: args.radius,
        edge: args.edge,
        nkpts: args.nkpts,
        user_tag_settings: parse_tag_args(&args.tags)?,
        tags_to_delete: args.delete,
        ..Default::default()
    };
    let set = FeffDictSet::new(absorber, system, args.spectrum.into(), options)?;
    set.write_input(&args.output)?;

    info!(
        "{} deck for {} written to {}",
        set.spectrum(),
        set.absorbing_symbol(),
        args.output.display()
    );
    Ok(())
}

fn print_tags(args: TagsArgs) -> anyhow::Result<()> {
    let tags = Tags::from_file(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&tags)?);
    } else {
        println!("{}", tags);
    }
    Ok(())
}

fn cube(args: CubeArgs) -> anyhow::Result<()> {
    let data = VolumetricData::from_file(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let structure = data.structure()?;

    if args.json {
        let summary = serde_json::json!({
            "dims": data.dims(),
            "atoms": data.atoms().len(),
            "formula": structure.formula(),
            "volume": structure.volume(),
            "min": data.min(),
            "max": data.max(),
            "mean": data.mean(),
            "integral": data.integrate(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        let [n1, n2, n3] = data.dims();
        println!("grid:     {} x {} x {}", n1, n2, n3);
        println!("atoms:    {} ({})", data.atoms().len(), structure.formula());
        println!("volume:   {:.6} A^3", structure.volume());
        println!("min/max:  {:e} / {:e}", data.min(), data.max());
        println!("mean:     {:e}", data.mean());
        println!("integral: {:e}", data.integrate());
    }

    if let Some(output) = &args.output {
        data.write_file(output)?;
        info!("cube written to {}", output.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tag_args() {
        let tags = parse_tag_args(&["corehole=RPA".to_string(), "RECIPROCAL".to_string()])
            .unwrap();
        assert_eq!(tags.get("COREHOLE").and_then(|v| v.as_text()), Some("RPA"));
        assert!(tags.get("RECIPROCAL").is_some_and(|v| v.is_flag()));
        assert!(parse_tag_args(&["=1".to_string()]).is_err());
    }

    #[test]
    fn test_cli_parses_generate() {
        let cli = Cli::try_parse_from([
            "feff-io", "-vv", "generate", "CoO.cif", "--absorber", "O", "--spectrum", "elnes",
            "--tag", "RECIPROCAL=", "-o", "out",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.spectrum, SpectrumArg::Elnes);
                assert_eq!(args.tags, vec!["RECIPROCAL=".to_string()]);
                assert_eq!(args.radius, 10.0);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_generate_writes_deck() {
        let dir = tempfile::tempdir().unwrap();
        let xyz = dir.path().join("cuo2.xyz");
        std::fs::write(
            &xyz,
            "3\nCuO2\nCu 0.0 0.0 0.0\nO 1.85 0.0 0.0\nO -1.85 0.0 0.0\n",
        )
        .unwrap();
        let out = dir.path().join("deck");

        let cli = Cli::try_parse_from([
            "feff-io",
            "generate",
            xyz.to_str().unwrap(),
            "--absorber",
            "Cu",
            "-o",
            out.to_str().unwrap(),
        ])
        .unwrap();
        run(cli).unwrap();

        let tags = Tags::from_file(out.join("PARAMETERS")).unwrap();
        assert!(tags.contains("XANES"));
        assert!(out.join("feff.inp").exists());
    }

    #[test]
    fn test_unsupported_structure_format() {
        assert!(load_system(Path::new("structure.pdb")).is_err());
    }
}
