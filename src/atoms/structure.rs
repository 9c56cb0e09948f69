/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Periodic crystal structure

use super::atom::Atom;
use super::composition::Composition;
use super::errors::{AtomError, Result};
use super::lattice::Lattice;
use super::system::Neighbor;
use serde::{Deserialize, Serialize};

/// Sites closer than this to the center are the center itself
const SELF_DISTANCE: f64 = 1e-8;

/// A crystal: lattice, ordered sites and a net charge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    lattice: Lattice,
    /// Sites with Cartesian positions in Angstrom
    sites: Vec<Atom>,
    /// Net charge of the cell
    charge: f64,
}

impl Structure {
    /// Create a neutral structure from Cartesian sites
    pub fn new(lattice: Lattice, sites: Vec<Atom>) -> Self {
        Self {
            lattice,
            sites,
            charge: 0.0,
        }
    }

    /// Create a structure from species and fractional coordinates
    pub fn from_fractional(
        lattice: Lattice,
        species: &[&str],
        frac_coords: &[[f64; 3]],
    ) -> Result<Self> {
        if species.len() != frac_coords.len() {
            return Err(AtomError::InvalidStructure(format!(
                "{} species given for {} coordinates",
                species.len(),
                frac_coords.len()
            )));
        }

        let sites = species
            .iter()
            .zip(frac_coords)
            .map(|(s, f)| Atom::from_symbol(s, lattice.cartesian_coords(*f)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(lattice, sites))
    }

    /// Same structure with a net charge
    pub fn with_charge(mut self, charge: f64) -> Self {
        self.charge = charge;
        self
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn sites(&self) -> &[Atom] {
        &self.sites
    }

    /// Site by index
    pub fn site(&self, index: usize) -> Result<&Atom> {
        self.sites.get(index).ok_or(AtomError::SiteOutOfRange {
            index,
            len: self.sites.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn charge(&self) -> f64 {
        self.charge
    }

    pub fn set_charge(&mut self, charge: f64) {
        self.charge = charge;
    }

    pub fn volume(&self) -> f64 {
        self.lattice.volume()
    }

    /// Fractional coordinates of a site
    pub fn frac_coords(&self, index: usize) -> Result<[f64; 3]> {
        let site = self.site(index)?;
        Ok(self.lattice.fractional_coords(site.position()))
    }

    /// Fractional coordinates of every site, in site order
    pub fn all_frac_coords(&self) -> Vec<[f64; 3]> {
        self.sites
            .iter()
            .map(|s| self.lattice.fractional_coords(s.position()))
            .collect()
    }

    /// Indices of every site of an element
    pub fn indices_from_symbol(&self, symbol: &str) -> Vec<usize> {
        self.sites
            .iter()
            .enumerate()
            .filter(|(_, s)| s.symbol() == symbol)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn composition(&self) -> Composition {
        Composition::from_atoms(&self.sites)
    }

    pub fn formula(&self) -> String {
        self.composition().formula()
    }

    pub fn reduced_formula(&self) -> String {
        self.composition().reduced_formula()
    }

    /// Shortest distance between two sites over all periodic images
    pub fn distance(&self, i: usize, j: usize) -> Result<f64> {
        let delta = wrapped_delta(self.frac_coords(i)?, self.frac_coords(j)?);
        let mut best = f64::INFINITY;
        for n0 in -1..=1 {
            for n1 in -1..=1 {
                for n2 in -1..=1 {
                    let shifted = [
                        delta[0] + n0 as f64,
                        delta[1] + n1 as f64,
                        delta[2] + n2 as f64,
                    ];
                    best = best.min(self.lattice.cartesian_coords(shifted).length());
                }
            }
        }
        Ok(best)
    }

    /// Minimum-image distances between all sites
    pub fn distance_matrix(&self) -> Result<Vec<Vec<f64>>> {
        let n = self.sites.len();
        let mut distances = vec![vec![0.0; n]; n];

        for i in 0..n {
            for j in (i + 1)..n {
                let dist = self.distance(i, j)?;
                distances[i][j] = dist;
                distances[j][i] = dist;
            }
        }

        Ok(distances)
    }

    /// Every site image within `radius` of a site, the site itself excluded
    ///
    /// Results are ordered by distance, then site index, then image, so
    /// equidistant neighbors keep the order of the site list.
    pub fn neighbors(&self, center: usize, radius: f64) -> Result<Vec<Neighbor>> {
        let origin = *self.site(center)?.position();
        let center_frac = self.lattice.fractional_coords(&origin);
        let spacings = self.lattice.interplanar_spacings();
        let reach = spacings.map(|d| (radius / d).ceil() as i32 + 1);

        let mut found = Vec::new();
        for (index, site) in self.sites.iter().enumerate() {
            let site_frac = self.lattice.fractional_coords(site.position());
            let raw = [
                site_frac[0] - center_frac[0],
                site_frac[1] - center_frac[1],
                site_frac[2] - center_frac[2],
            ];
            let delta = wrapped_delta(center_frac, site_frac);
            let base = [0, 1, 2].map(|k| (delta[k] - raw[k]).round() as i32);

            for n0 in -reach[0]..=reach[0] {
                for n1 in -reach[1]..=reach[1] {
                    for n2 in -reach[2]..=reach[2] {
                        let shifted = [
                            delta[0] + n0 as f64,
                            delta[1] + n1 as f64,
                            delta[2] + n2 as f64,
                        ];
                        let offset = self.lattice.cartesian_coords(shifted);
                        let distance = offset.length();
                        if distance > radius || distance < SELF_DISTANCE {
                            continue;
                        }
                        found.push(Neighbor {
                            index,
                            symbol: site.symbol().to_string(),
                            position: origin + offset,
                            distance,
                            image: [base[0] + n0, base[1] + n1, base[2] + n2],
                        });
                    }
                }
            }
        }

        found.sort_by_key(|n| n.sort_key());
        Ok(found)
    }

    /// Same lattice and the same species at the same fractional positions
    ///
    /// Site order does not matter. `length_tol` is in Angstrom and applies
    /// to lattice lengths, `angle_tol` in degrees, and `frac_tol` to
    /// fractional coordinates after wrapping into the cell.
    pub fn matches(&self, other: &Self, length_tol: f64, angle_tol: f64, frac_tol: f64) -> bool {
        if self.len() != other.len() || !self.lattice.approx_eq(&other.lattice, length_tol, angle_tol)
        {
            return false;
        }

        let mine = self.all_frac_coords();
        let theirs = other.all_frac_coords();
        let mut used = vec![false; theirs.len()];

        for (site, frac) in self.sites.iter().zip(&mine) {
            let hit = other.sites.iter().zip(&theirs).enumerate().position(|(j, (s, f))| {
                !used[j]
                    && s.symbol() == site.symbol()
                    && wrapped_delta(*frac, *f).iter().all(|d| d.abs() <= frac_tol)
            });
            match hit {
                Some(j) => used[j] = true,
                None => return false,
            }
        }
        true
    }
}

/// Fractional displacement from `a` to `b` folded into [-0.5, 0.5]
fn wrapped_delta(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [0, 1, 2].map(|k| {
        let d = b[k] - a[k];
        d - d.round()
    })
}
