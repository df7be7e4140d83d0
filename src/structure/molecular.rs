use crate::error::{Error, Result};
use crate::geometry::Geometry;
use crate::structure::bonds::{BondMatrix, ForcedBonds};
use crate::structure::resonance;
use crate::structure::PrimaryStructure;
use crate::tolerance::Tolerances;
use crate::zmatrix::{BetaBond, ZMatrix};

/// Primary structure together with its resonance structures and z-matrix
///
/// Resonance structures count bond orders in half bonds.
#[derive(Debug, Clone, PartialEq)]
pub struct MolecularStructure {
    primary: PrimaryStructure,
    resonances: Vec<BondMatrix>,
    zmatrix: ZMatrix,
}

impl MolecularStructure {
    /// Enumerate resonance structures and build the z-matrix path
    ///
    /// Fails on empty or disconnected structures and on atoms bonded beyond
    /// their formal valence.
    pub fn new(primary: PrimaryStructure) -> Result<MolecularStructure> {
        if primary.size() == 0 {
            return Err(Error::TooFewAtoms {found: 0, required: 1});
        }

        let resonances = resonance::enumerate(&primary)?;
        let mut structure = MolecularStructure {primary, resonances, zmatrix: ZMatrix::default()};
        structure.zmatrix = ZMatrix::new(&structure)?;
        Ok(structure)
    }

    /// Perceive bonds in a geometry and build the full structure
    pub fn from_geometry(geometry: &Geometry, forced: &ForcedBonds, tolerances: &Tolerances) -> Result<MolecularStructure> {
        MolecularStructure::new(PrimaryStructure::new(geometry, forced, tolerances))
    }

    pub fn primary(&self) -> &PrimaryStructure {
        &self.primary
    }

    pub fn resonances(&self) -> &[BondMatrix] {
        &self.resonances
    }

    pub fn resonance_count(&self) -> usize {
        self.resonances.len()
    }

    fn bonded(&self, a: usize, b: usize) -> Result<()> {
        if self.primary.is_bonded(a, b) {
            Ok(())
        } else {
            Err(Error::NotBonded {first: a, second: b})
        }
    }

    /// Whether a bond is single in every resonance structure
    pub fn is_single(&self, a: usize, b: usize) -> Result<bool> {
        self.bonded(a, b)?;
        Ok(self.resonances.iter().all(|s| s.get(a, b) <= resonance::SINGLE))
    }

    /// Whether an atom has an unpaired electron in any resonance structure
    pub fn is_radical(&self, atom: usize) -> bool {
        let full = 2 * self.primary.element(atom).valence();
        self.resonances.iter().any(|s| s.row_sum(atom) < full)
    }

    pub fn radical_sites(&self) -> Vec<usize> {
        (0..self.primary.size()).filter(|&atom| self.is_radical(atom)).collect()
    }

    /// Bond order averaged over the resonance structures
    pub fn bond_order(&self, a: usize, b: usize) -> Result<f64> {
        self.bonded(a, b)?;
        let sum: u32 = self.resonances.iter().map(|s| s.get(a, b)).sum();
        Ok(f64::from(sum) / (2 * self.resonances.len()) as f64)
    }

    /// Beta bond metadata of a single bond next to a radical site
    ///
    /// The first radical site bonded to either end decides, with `a` checked
    /// before `b`.
    pub fn is_beta(&self, a: usize, b: usize) -> Result<Option<BetaBond>> {
        if !self.is_single(a, b)? {
            return Ok(None);
        }

        let ring = self.primary.is_ring(a, b)?;
        for radical in self.radical_sites().into_iter().filter(|&r| r != a && r != b) {
            if self.primary.is_bonded(radical, a) {
                return Ok(Some(BetaBond {ring, radical, primary: a, secondary: b}));
            }
            if self.primary.is_bonded(radical, b) {
                return Ok(Some(BetaBond {ring, radical, primary: b, secondary: a}));
            }
        }
        Ok(None)
    }

    pub fn zmatrix(&self) -> &ZMatrix {
        &self.zmatrix
    }

    /// Atom index of each z-matrix entry, `None` for dummies
    pub fn atom_ordering(&self) -> Vec<Option<usize>> {
        self.zmatrix.atom_ordering()
    }

    /// Z-matrix entry of an atom
    pub fn atom_map(&self, atom: usize) -> Option<usize> {
        self.zmatrix.atom_map(atom)
    }
}
