/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

use approx::assert_relative_eq;
use feff_io::atoms::{
    parse_cif, parse_xyz, read_cif, read_xyz, space_group, write_cif, write_cif_file, write_xyz,
    Atom, AtomError, AtomicSystem, Lattice, Molecule, Structure, Vector3D,
};
use std::fs;
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

#[test]
fn test_atom_creation() {
    let atom = Atom::new(29, Vector3D::origin()).unwrap();
    assert_eq!(atom.symbol(), "Cu");

    let oxygen = Atom::from_symbol("O", Vector3D::new(0.0, 0.0, 1.2)).unwrap();
    assert_eq!(oxygen.atomic_number(), 8);
    assert_relative_eq!(atom.distance_to(&oxygen), 1.2);

    assert!(Atom::new(0, Vector3D::origin()).is_err());
    assert!(Atom::new(119, Vector3D::origin()).is_err());
    assert!(Atom::from_symbol("Xx", Vector3D::origin()).is_err());
}

#[test]
fn test_hexagonal_lattice() {
    let lattice = Lattice::from_parameters(3.0, 3.0, 5.0, 90.0, 90.0, 120.0).unwrap();
    let abc = lattice.abc();
    let angles = lattice.angles();
    assert_relative_eq!(abc[0], 3.0, epsilon = 1e-12);
    assert_relative_eq!(abc[2], 5.0, epsilon = 1e-12);
    assert_relative_eq!(angles[2], 120.0, epsilon = 1e-9);
    assert_relative_eq!(lattice.volume(), 9.0 * 3f64.sqrt() / 2.0 * 5.0, epsilon = 1e-9);

    let frac = [0.25, 0.5, 0.75];
    let back = lattice.fractional_coords(&lattice.cartesian_coords(frac));
    for k in 0..3 {
        assert_relative_eq!(back[k], frac[k], epsilon = 1e-12);
    }

    assert!(matches!(
        Lattice::from_parameters(3.0, 3.0, 5.0, 90.0, 90.0, 180.0),
        Err(AtomError::InvalidLattice(_))
    ));
}

#[test]
fn test_structure_periodic_distances() {
    let structure = rocksalt();
    assert_eq!(structure.formula(), "Mg4 O4");
    assert_eq!(structure.reduced_formula(), "MgO");
    assert_relative_eq!(structure.distance(0, 4).unwrap(), 2.1, epsilon = 1e-12);
    assert_relative_eq!(structure.distance(0, 1).unwrap(), 4.2 / 2f64.sqrt(), epsilon = 1e-12);

    let shell = structure.neighbors(0, 2.2).unwrap();
    assert_eq!(shell.len(), 6);
    assert!(shell.iter().all(|n| n.symbol == "O"));

    let two_shells = structure.neighbors(0, 3.0).unwrap();
    assert_eq!(two_shells.len(), 18);
    assert!(two_shells.windows(2).all(|w| w[0].distance <= w[1].distance));
}

#[test]
fn test_rocksalt_space_group() {
    let sg = space_group(&rocksalt(), 1e-3).unwrap();
    assert_eq!(sg.number, 225);
    assert_eq!(sg.symbol, "Fm-3m");
}

#[test]
fn test_cif_round_trip() {
    let structure = rocksalt();
    let text = write_cif(&structure);
    assert!(text.contains("_cell_length_a"));
    let parsed = parse_cif(&text).unwrap();
    assert!(structure.matches(&parsed, 1e-6, 1e-6, 1e-6));

    let dir = tempdir().unwrap();
    let path = dir.path().join("MgO.cif");
    write_cif_file(&structure, &path).unwrap();
    let read = read_cif(&path).unwrap();
    assert!(structure.matches(&read, 1e-6, 1e-6, 1e-6));
}

#[test]
fn test_cif_symmetry_expansion() {
    let cif = "data_Cu
_cell_length_a 3.61
_cell_length_b 3.61
_cell_length_c 3.61
_cell_angle_alpha 90
_cell_angle_beta 90
_cell_angle_gamma 90
loop_
_symmetry_equiv_pos_as_xyz
'x, y, z'
'x, y+1/2, z+1/2'
'x+1/2, y, z+1/2'
'x+1/2, y+1/2, z'
loop_
_atom_site_label
_atom_site_type_symbol
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
Cu1 Cu 0.0 0.0 0.0
";
    let structure = parse_cif(cif).unwrap();
    assert_eq!(structure.len(), 4);
    assert_relative_eq!(structure.distance(0, 1).unwrap(), 3.61 / 2f64.sqrt(), epsilon = 1e-9);
}

#[test]
fn test_xyz_round_trip() {
    let mut molecule = Molecule::from_species(
        &["C", "O", "O"],
        &[[0.0, 0.0, 0.0], [0.0, 0.0, 1.16], [0.0, 0.0, -1.16]],
    )
    .unwrap();
    molecule.set_title("carbon dioxide");

    let dir = tempdir().unwrap();
    let path = dir.path().join("co2.xyz");
    fs::write(&path, write_xyz(&molecule)).unwrap();

    let back = read_xyz(&path).unwrap();
    assert_eq!(back.title(), "carbon dioxide");
    assert_eq!(back.len(), 3);
    assert_eq!(back.formula(), "C1 O2");
    assert_relative_eq!(back.distance_matrix()[1][2], 2.32, epsilon = 1e-9);
}

#[test]
fn test_xyz_count_mismatch() {
    let result = parse_xyz("3\nshort\nH 0 0 0\nH 0 0 0.74\n");
    assert!(matches!(result, Err(AtomError::ParseError(_))));
}

#[test]
fn test_system_wrappers() {
    let crystal = AtomicSystem::from(rocksalt());
    assert!(crystal.is_periodic());
    assert_eq!(crystal.indices_from_symbol("O"), vec![4, 5, 6, 7]);

    let molecule = AtomicSystem::from(parse_xyz("2\nH2\nH 0 0 0\nH 0 0 0.74\n").unwrap());
    assert!(!molecule.is_periodic());
    assert!(molecule.as_structure().is_none());
    assert_eq!(molecule.formula(), "H2");
    assert_eq!(molecule.neighbors(0, 1.0).unwrap().len(), 1);
}
