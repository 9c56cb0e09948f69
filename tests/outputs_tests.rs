/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

use approx::assert_relative_eq;
use feff_io::atoms::{Lattice, Structure};
use feff_io::input::{AbsorbingAtom, Tags};
use feff_io::outputs::{LDos, OutputError, Xmu};
use feff_io::sets::{FeffDictSet, SetOptions, Spectrum};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn rocksalt() -> Structure {
    Structure::from_fractional(
        Lattice::cubic(4.2).unwrap(),
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

/// An ldos file in the layout FEFF writes: Fermi level, charge transfer and
/// orbital counts in the comment block, then energy and s p d f columns
fn ldos_text(efermi: f64, charge: f64, counts: [f64; 4], scale: f64) -> String {
    let mut text = format!(
        "#  Fermi level (eV):   {:.3}\n#  Charge transfer (e):   {:.4}\n#    Electron counts for each orbital momentum:\n",
        efermi, charge
    );
    for (orbital, count) in ["s", "p", "d", "f"].iter().zip(counts) {
        text.push_str(&format!("#       {}   {:.4}\n", orbital, count));
    }
    text.push_str("#   e      sDOS     pDOS     dDOS     fDOS\n");
    for i in 0..4 {
        let e = efermi - 3.0 + i as f64;
        text.push_str(&format!(
            "  {:.3}  {:.4}  {:.4}  {:.4}  {:.4}\n",
            e,
            0.1 * scale,
            0.2 * scale * (i + 1) as f64,
            0.01 * scale,
            0.0
        ));
    }
    text
}

fn write_ldos(dir: &Path) {
    fs::write(dir.join("ldos00.dat"), ldos_text(-11.43, -0.25, [1.9, 4.35, 0.0, 0.0], 1.0)).unwrap();
    fs::write(dir.join("ldos01.dat"), ldos_text(-11.43, 0.5, [0.45, 0.3, 0.05, 0.0], 2.0)).unwrap();
    fs::write(dir.join("ldos02.dat"), ldos_text(-11.43, -0.25, [1.9, 4.35, 0.0, 0.0], 3.0)).unwrap();
}

fn real_space_run() -> tempfile::TempDir {
    let dir = tempdir().unwrap();
    FeffDictSet::xanes("O", rocksalt(), SetOptions::default())
        .unwrap()
        .write_input(dir.path())
        .unwrap();
    write_ldos(dir.path());
    dir
}

#[test]
fn test_ldos_real_space() {
    let dir = real_space_run();
    let ldos = LDos::from_file(dir.path().join("feff.inp"), dir.path().join("ldos")).unwrap();

    assert_relative_eq!(ldos.efermi(), -11.43);
    assert_eq!(ldos.system().len(), 8);
    assert_eq!(ldos.pot_dict().get("Mg"), Some(&1));
    assert_eq!(ldos.pot_dict().get("O"), Some(&2));
    assert_eq!(ldos.energies().len(), 4);
    assert_relative_eq!(ldos.energies()[0], -14.43);

    let mg = ldos.site_dos(0).unwrap();
    assert_eq!(mg.dim(), (4, 4));
    assert_relative_eq!(mg[[0, 0]], 0.2);

    let spd = ldos.spd_dos().unwrap();
    assert_relative_eq!(spd[[0, 0]], 4.0 * 0.2 + 4.0 * 0.3, epsilon = 1e-12);
    assert_relative_eq!(spd[[3, 1]], 4.0 * 1.6 + 4.0 * 2.4, epsilon = 1e-12);

    let total = ldos.total_dos().unwrap();
    assert_relative_eq!(total[0], spd.row(0).sum(), epsilon = 1e-12);
    assert!(ldos.site_dos(8).is_err());
}

#[test]
fn test_charge_transfer() {
    let dir = real_space_run();
    let ldos = LDos::from_file(dir.path().join("feff.inp"), dir.path().join("ldos")).unwrap();

    let charges = ldos.charge_transfer();
    assert_eq!(charges.len(), 3);
    assert_eq!(charges[&0].symbol, "O");
    assert_eq!(charges[&1].symbol, "Mg");
    assert_relative_eq!(charges[&1].s, 0.45);
    assert_relative_eq!(charges[&1].tot, 0.5);
    assert_relative_eq!(charges[&2].p, 4.35);

    let expected = "\nCharge Transfer\n\nabsorbing atom\
        \nO\ns   1.9\np   4.35\nd   0\nf   0\ntot -0.25\n\
        \nMg\ns   0.45\np   0.3\nd   0.05\nf   0\ntot 0.5\n\
        \nO\ns   1.9\np   4.35\nd   0\nf   0\ntot -0.25\n";
    assert_eq!(ldos.charge_transfer_to_string(), expected);
}

#[test]
fn test_ldos_json_round_trip() {
    let dir = real_space_run();
    let ldos = LDos::from_file(dir.path().join("feff.inp"), dir.path().join("ldos")).unwrap();

    let json = serde_json::to_string(&ldos).unwrap();
    let back: LDos = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ldos);
}

#[test]
fn test_missing_ldos_file() {
    let dir = real_space_run();
    fs::remove_file(dir.path().join("ldos02.dat")).unwrap();
    let result = LDos::from_file(dir.path().join("feff.inp"), dir.path().join("ldos"));
    assert!(matches!(result, Err(OutputError::IoError { .. })));
}

#[test]
fn test_ldos_reciprocal() {
    let dir = tempdir().unwrap();
    let mut user = Tags::new();
    user.insert("RECIPROCAL", "");
    let options = SetOptions {
        user_tag_settings: user,
        ..Default::default()
    };
    FeffDictSet::xanes("O", rocksalt(), options)
        .unwrap()
        .write_input(dir.path())
        .unwrap();
    assert!(dir.path().join("Mg4O4.cif").exists());

    fs::write(
        dir.path().join("pot.inp"),
        " mpot, nph, ntitle, ihole, ipr1, iafolp, ixc,ispec\n\
         \x20  1   2   1   1   0   0   0   0\n\
         iz, lmaxsc, xnatph, xion, folp\n\
         \x20  8   2   0.00010   0.00000   1.15000\n\
         \x20 12   2   4.00000   0.00000   1.15000\n\
         \x20  8   2   4.00000   0.00000   1.15000\n\
         ExternalPot switch, StartingFile(0=ratio, 1=file)\n",
    )
    .unwrap();
    write_ldos(dir.path());

    let ldos = LDos::from_file(dir.path().join("feff.inp"), dir.path().join("ldos")).unwrap();
    assert_eq!(ldos.pot_dict().get("Mg"), Some(&1));
    assert_eq!(ldos.pot_dict().get("O"), Some(&2));
    assert_eq!(ldos.system().len(), 8);
    assert!(ldos.system().is_periodic());
    assert_eq!(ldos.charge_transfer()[&0].symbol, "O");
}

#[test]
fn test_xmu_from_generated_deck() {
    let dir = tempdir().unwrap();
    let set = FeffDictSet::exafs("Mg", rocksalt(), SetOptions::default()).unwrap();
    set.write_input(dir.path()).unwrap();
    fs::write(
        dir.path().join("xmu.dat"),
        "# omega e k mu mu0 chi\n\
         1300.0 -3.0 0.0 0.10 0.11 -0.010\n\
         1301.0 -2.0 0.5 0.20 0.19 0.010\n\
         1302.0 -1.0 0.8 0.30 0.28 0.020\n",
    )
    .unwrap();

    let xmu = Xmu::from_file(dir.path().join("xmu.dat"), dir.path().join("feff.inp")).unwrap();
    assert_eq!(xmu.absorbing_atom(), &AbsorbingAtom::Symbol("Mg".to_string()));
    assert_eq!(xmu.calc(), Spectrum::Exafs);
    assert_eq!(xmu.edge().as_deref(), Some("K"));
    assert_eq!(xmu.material_formula(), Some("MgO"));
    assert_eq!(xmu.source(), None);
    assert_relative_eq!(xmu.e_fermi().unwrap(), 1303.0);
    assert_relative_eq!(xmu.chi()[1], 0.010);
}

#[test]
fn test_xmu_reciprocal_absorber() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("feff.inp"),
        "TITLE reciprocal run\nRECIPROCAL\nTARGET 3\nXANES 4 0.04 0.1\nEDGE L3\n",
    )
    .unwrap();
    fs::write(dir.path().join("xmu.dat"), "1.0 0.0 0.0 0.1 0.1 0.0\n").unwrap();

    let xmu = Xmu::from_file(dir.path().join("xmu.dat"), dir.path().join("feff.inp")).unwrap();
    assert_eq!(xmu.absorbing_atom(), &AbsorbingAtom::Index(2));
    assert_eq!(xmu.calc(), Spectrum::Xanes);
    assert_eq!(xmu.edge().as_deref(), Some("L3"));
}
