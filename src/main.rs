/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Main executable for feff-io

use clap::Parser;
use feff_io::cli::{run, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    run(cli)
}
