//! Bond perception and connectivity queries
//!
//! A [`PrimaryStructure`] decides which atoms of a geometry are bonded from
//! their covalent radii. The resonance enumeration and the z-matrix path
//! builder work from its bond graph.

pub mod bonds;
pub mod molecular;
pub mod resonance;

use std::collections::BTreeMap;

use itertools::Itertools;

use crate::atom::Element;
use crate::error::{Error, Result};
use crate::geometry::Geometry;
use crate::structure::bonds::{BondMatrix, BondPair, ForcedBonds};
use crate::tolerance::{Tolerances, BOHR};

/// Multiple of the sum of covalent radii below which two atoms are bonded
pub const BOND_LENGTH_FACTOR: f64 = 1.3;

/// Maximal bond length between two elements in bohr
pub fn max_bond_length(a: Element, b: Element) -> f64 {
    BOND_LENGTH_FACTOR * (a.covalent_radius() + b.covalent_radius()) / BOHR
}

/// Bond graph of a geometry without dummy atoms
///
/// Bonds are single (order one) in the primary structure. Atoms with exactly
/// two bonded neighbors at a straight angle are flagged as linear.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryStructure {
    geometry: Geometry,
    bonds: BondMatrix,
    forced: ForcedBonds,
    linear: Vec<bool>,
}

impl PrimaryStructure {
    /// Perceive bonds in a geometry
    ///
    /// Dummy atoms are dropped. Forced bonds refer to indices of the input
    /// geometry and are remapped onto the remaining atoms. Implausible
    /// connectivity is logged, but not rejected.
    pub fn new(input: &Geometry, forced: &ForcedBonds, tolerances: &Tolerances) -> PrimaryStructure {
        let (geometry, index_map) = input.without_dummies();
        for (index, _) in index_map.iter().enumerate().filter(|(_, m)| m.is_none()) {
            log::warn!("Removing dummy atom {} from primary structure input", index);
        }

        let forced: ForcedBonds = forced.iter()
            .filter_map(|pair| {
                let remapped = pair.map(|i| index_map.get(i).copied().flatten())
                    .filter(|BondPair(i, j)| i != j);
                if remapped.is_none() {
                    log::warn!("Ignoring forced bond {}: no such pair of real atoms", pair);
                }
                remapped
            })
            .collect();

        let n = geometry.len();
        let mut bonds = BondMatrix::new(n);
        for j in 0..n {
            for i in 0..j {
                let limit = max_bond_length(geometry[i].element, geometry[j].element);
                if geometry.distance(i, j) < limit || forced.contains(&BondPair(i, j)) {
                    bonds.set(i, j, 1);
                }
            }
        }

        for i in 0..n {
            let element = geometry[i].element;
            let degree = bonds.degree(i);
            if element == Element::H && degree > 1 {
                log::warn!("Hydrogen atom {} has {} bonds", i, degree);
            }
            if degree > 4 {
                log::warn!("{} atom {} has more than four bonds", element, i);
            }
            if element == Element::O && degree > 2 {
                log::warn!("Oxygen atom {} has more than two bonds", i);
            }
        }

        if !bonds.is_connected() {
            log::warn!("Bond graph of {} atoms is not connected", n);
        }

        let linear = (0..n)
            .map(|i| {
                let neighbors: Vec<usize> = bonds.neighbors(i).collect();
                neighbors.len() == 2
                    && tolerances.angles_equal(180.0, geometry.angle(neighbors[0], i, neighbors[1]))
            })
            .collect();

        PrimaryStructure {geometry, bonds, forced, linear}
    }

    /// Number of atoms
    pub fn size(&self) -> usize {
        self.geometry.len()
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn bonds(&self) -> &BondMatrix {
        &self.bonds
    }

    /// Forced bonds in terms of this structure's atom indices
    pub fn forced_bonds(&self) -> &ForcedBonds {
        &self.forced
    }

    pub fn element(&self, atom: usize) -> Element {
        self.geometry[atom].element
    }

    pub fn is_bonded(&self, a: usize, b: usize) -> bool {
        self.bonds.is_bonded(a, b)
    }

    pub fn neighbors(&self, atom: usize) -> impl Iterator<Item=usize> + '_ {
        self.bonds.neighbors(atom)
    }

    /// Whether the atom lies on a straight line between its two neighbors
    pub fn is_linear(&self, atom: usize) -> bool {
        self.linear[atom]
    }

    /// Whether any atom of a group can be reached from an atom
    pub fn is_connected_to(&self, atom: usize, group: &[usize]) -> bool {
        group.iter().any(|&member| self.bonds.is_connected_to(atom, member))
    }

    pub fn is_connected(&self) -> bool {
        self.bonds.is_connected()
    }

    /// Partition of the atoms into bonded fragments
    pub fn connected_groups(&self) -> Vec<Vec<usize>> {
        self.bonds.connected_groups()
    }

    /// Whether a bond is part of a ring
    ///
    /// A bond is in a ring if all atoms still form a single connected component
    /// once it is removed. Bonds of disconnected structures are never ring bonds.
    pub fn is_ring(&self, a: usize, b: usize) -> Result<bool> {
        if a == b {
            return Err(Error::SameAtom {atom: a});
        }

        if !self.is_bonded(a, b) {
            return Err(Error::NotBonded {first: a, second: b});
        }

        let mut cut = self.bonds.clone();
        cut.set(a, b, 0);
        Ok(cut.is_connected())
    }

    /// Element counts of a group of atoms, e.g. `C2H6`
    ///
    /// Symbols are sorted alphabetically and each is followed by its count,
    /// even if that is one.
    pub fn group_stoichiometry(&self, group: &[usize]) -> String {
        let counts: BTreeMap<&str, usize> = group.iter()
            .map(|&atom| self.element(atom).symbol())
            .counts()
            .into_iter()
            .collect();
        counts.iter()
            .map(|(symbol, count)| format!("{}{}", symbol, count))
            .collect()
    }

    /// Stoichiometry of all atoms
    pub fn formula(&self) -> String {
        self.group_stoichiometry(&(0..self.size()).collect::<Vec<_>>())
    }
}
