//! Resonance structure enumeration
//!
//! Bond orders are counted in half bonds: a single bond is two, a double bond
//! four. Forced bonds enter as half bonds and are never promoted.

use itertools::Itertools;

use crate::error::{Error, Result};
use crate::structure::bonds::{BondMatrix, BondPair};
use crate::structure::PrimaryStructure;

/// Order of an unforced bond before any promotion
pub const SINGLE: u32 = 2;
/// Order of a forced bond
pub const FORCED: u32 = 1;

fn has_room(structure: &BondMatrix, primary: &PrimaryStructure, atom: usize) -> bool {
    structure.row_sum(atom) + 1 < 2 * primary.element(atom).valence()
}

/// Enumerate the resonance structures of a primary structure
///
/// Starting from single bonds everywhere, each pass copies every structure of
/// the working set once per unforced bond whose atoms both have room for
/// another bond, and promotes that bond in the copy. The copies, without
/// duplicates, replace the working set. Enumeration ends with the first pass
/// without any promotion.
pub fn enumerate(primary: &PrimaryStructure) -> Result<Vec<BondMatrix>> {
    let forced = primary.forced_bonds();
    let mut start = BondMatrix::new(primary.size());
    for BondPair(i, j) in primary.bonds().bonded_pairs() {
        let order = if forced.contains(&BondPair(i, j)) { FORCED } else { SINGLE };
        start.set(i, j, order);
    }

    if !primary.is_connected() {
        return Err(Error::Disconnected);
    }

    for atom in 0..primary.size() {
        let element = primary.element(atom);
        let order = start.row_sum(atom);
        if order > 2 * element.valence() {
            return Err(Error::ValenceExceeded {atom, element, order, valence: element.valence()});
        }
    }

    let promotable: Vec<BondPair> = primary.bonds().bonded_pairs()
        .filter(|pair| !forced.contains(pair))
        .collect();

    let mut structures = vec![start];
    let mut passes = 0;
    loop {
        let promoted: Vec<BondMatrix> = structures.iter()
            .flat_map(|structure| {
                promotable.iter()
                    .filter(move |BondPair(i, j)| has_room(structure, primary, *i) && has_room(structure, primary, *j))
                    .map(move |&BondPair(i, j)| {
                        let mut next = structure.clone();
                        next.increment(i, j, SINGLE);
                        next
                    })
            })
            .collect();

        if promoted.is_empty() {
            break;
        }

        structures = promoted.into_iter().unique().collect();
        passes += 1;
    }

    log::debug!("Found {} resonance structures in {} promotion passes", structures.len(), passes);
    Ok(structures)
}
