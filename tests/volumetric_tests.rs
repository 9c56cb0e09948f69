/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

use approx::assert_relative_eq;
use feff_io::atoms::{Lattice, Structure};
use feff_io::volumetric::{VolumetricData, VolumetricError};
use ndarray::Array3;
use tempfile::tempdir;

fn nacl() -> Structure {
    Structure::from_fractional(
        Lattice::cubic(5.64).unwrap(),
        &["Na", "Cl"],
        &[[0.0, 0.0, 0.0], [0.5, 0.5, 0.5]],
    )
    .unwrap()
}

fn gaussian_grid(n: usize) -> Array3<f64> {
    Array3::from_shape_fn((n, n + 1, n + 2), |(i, j, k)| {
        let r2 = (i * i + j * j + k * k) as f64;
        (-r2 / 7.0).exp() / 3.0
    })
}

#[test]
fn test_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("density.cube");

    let mut cube = VolumetricData::from_structure(&nacl(), gaussian_grid(5)).unwrap();
    cube.set_comments("NaCl density", "generated grid");
    cube.write_file(&path).unwrap();

    let back = VolumetricData::from_file(&path).unwrap();
    assert_eq!(back, cube);
    assert_eq!(back.comments()[0], "NaCl density");
    assert_eq!(back.dims(), [5, 6, 7]);
    assert_eq!(back.atoms().len(), 2);
    assert_eq!(back.atoms()[1].atomic_number, 17);
}

#[test]
fn test_structure_matches_source_cell() {
    let structure = nacl();
    let cube = VolumetricData::from_structure(&structure, gaussian_grid(4)).unwrap();
    let rebuilt = cube.structure().unwrap();

    assert_relative_eq!(rebuilt.volume(), structure.volume(), max_relative = 1e-12);
    assert_eq!(rebuilt.len(), 2);
    for (a, b) in rebuilt.sites().iter().zip(structure.sites()) {
        assert_eq!(a.symbol(), b.symbol());
        assert_relative_eq!(a.position().distance(b.position()), 0.0, epsilon = 1e-9);
    }
}

#[test]
fn test_grid_statistics() {
    let data = Array3::from_elem((2, 3, 4), 0.5);
    let cube = VolumetricData::from_structure(&nacl(), data).unwrap();
    assert_relative_eq!(cube.mean(), 0.5);
    assert_eq!(cube.min(), 0.5);
    assert_eq!(cube.max(), 0.5);
    assert_relative_eq!(
        cube.integrate(),
        0.5 * 24.0 * cube.voxel_volume(),
        max_relative = 1e-12
    );
}

#[test]
fn test_empty_grid_rejected() {
    let result = VolumetricData::from_structure(&nacl(), Array3::zeros((0, 2, 2)));
    assert!(matches!(result, Err(VolumetricError::ShapeError(_))));
}

#[test]
fn test_missing_file() {
    let dir = tempdir().unwrap();
    let result = VolumetricData::from_file(dir.path().join("absent.cube"));
    assert!(matches!(result, Err(VolumetricError::IoError(_))));
}

#[test]
fn test_truncated_header() {
    let result = "title\ncomment\n    2    0.0    0.0\n".parse::<VolumetricData>();
    assert!(matches!(result, Err(VolumetricError::ParseError { .. })));
}
