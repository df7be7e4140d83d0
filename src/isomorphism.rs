extern crate nalgebra as na;

use std::collections::BTreeMap;

use itertools::Itertools;
use rayon::prelude::*;

use crate::atom::Element;
use crate::error::{Error, Result};
use crate::geometry::{standard_frame, Geometry};
use crate::orientation::{Orientation, Shape};
use crate::permutation::Permutation;
use crate::tolerance::Tolerances;

/// What a comparison of two orientations is asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Stop at the first mapping found, yielding 0 or 1
    Existence,
    /// Count every distinct mapping
    Count,
}

fn stoichiometry(geometry: &Geometry) -> BTreeMap<Element, usize> {
    geometry.iter().map(|a| a.element).counts().into_iter().collect()
}

/// Cheap rejection criteria shared by all comparison modes
fn comparable(a: &Orientation, b: &Orientation) -> Result<bool> {
    for o in [a, b] {
        if o.len() < 2 {
            return Err(Error::TooFewAtoms {found: o.len(), required: 2});
        }
    }

    Ok(a.len() == b.len()
        && a.shape() == b.shape()
        && stoichiometry(a.geometry()) == stoichiometry(b.geometry()))
}

/// Atoms of two linear orientations coincide in the same or reversed order
fn linear_matches(a: &Geometry, b: &Geometry, tolerances: &Tolerances) -> [Option<Permutation>; 2] {
    let n = a.len();
    let x = |g: &Geometry, i: usize| g.position(i).x;

    let same = (0..n).all(|at| {
        a[at].same_element(&b[at])
            && tolerances.distances_equal(x(a, at) - x(a, 0), x(b, at) - x(b, 0))
    });
    let reversed = (0..n).all(|at| {
        a[at].same_element(&b[n - 1 - at])
            && tolerances.distances_equal(x(a, at) - x(a, 0), x(b, n - 1) - x(b, n - 1 - at))
    });

    [
        same.then(|| Permutation::identity(n)),
        reversed.then(|| Permutation::reversal(n)),
    ]
}

fn distance_table(g: &Geometry) -> na::DMatrix<f64> {
    na::DMatrix::from_fn(g.len(), g.len(), |i, j| g.distance(i, j))
}

/// Try to extend a matched reference triple into a full atom mapping
///
/// `triple` lists the atoms of `b` taking the roles of the first three atoms of
/// `a`. The result maps each atom index of `a` onto an atom index of `b`.
fn extend_triple(
    a: &Orientation,
    b: &Orientation,
    table: &na::DMatrix<f64>,
    triple: &[usize],
    tolerances: &Tolerances
) -> Option<Permutation> {
    let reference = a.geometry();
    let other = b.geometry();

    if (0..3).any(|i| !reference[i].same_element(&other[triple[i]])) {
        return None;
    }

    let distances_match = a.reference_distances().iter()
        .enumerate()
        .all(|(i, &d)| tolerances.distances_equal(d, table[(triple[(i + 1) % 3], triple[(i + 2) % 3])]));
    if !distances_match {
        return None;
    }

    // Put b into the frame spanned by the triple
    let mut m = other.clone();
    m -= other[triple[0]].position;
    let frame = standard_frame(m.position(triple[1]), m.position(triple[2]));
    m.rotate(&frame);

    let n = reference.len();
    let mut sigma = Vec::with_capacity(n);
    sigma.extend_from_slice(triple);
    let mut assigned = vec![false; n];
    triple.iter().for_each(|&j| assigned[j] = true);

    for rest in 3..n {
        let (closest, distance) = (0..n)
            .filter(|&j| !assigned[j] && m[j].same_element(&reference[rest]))
            .map(|j| (j, (m.position(j) - reference.position(rest)).norm()))
            .min_by(|(_, p), (_, q)| p.total_cmp(q))?;

        if !tolerances.distances_equal(distance, 0.0) {
            return None;
        }

        assigned[closest] = true;
        sigma.push(closest);
    }

    Some(Permutation {sigma})
}

/// Compare two canonical orientations up to proper rotation and atom relabeling
///
/// Yields zero if the geometries differ in size, shape or stoichiometry. In
/// existence mode, the result is one if any mapping exists. In count mode, the
/// result is the number of mappings, which is the rotational symmetry number
/// if both arguments are the same orientation.
pub fn compare(a: &Orientation, b: &Orientation, mode: Mode, tolerances: &Tolerances) -> Result<usize> {
    if !comparable(a, b)? {
        return Ok(0);
    }

    if a.shape() == Shape::Linear {
        let found = linear_matches(a.geometry(), b.geometry(), tolerances)
            .into_iter()
            .flatten()
            .count();
        return Ok(match mode {
            Mode::Existence => found.min(1),
            Mode::Count => found,
        });
    }

    let table = distance_table(b.geometry());
    let triples: Vec<Vec<usize>> = (0..b.len()).permutations(3).collect();
    let matching = |triple: &&Vec<usize>| extend_triple(a, b, &table, triple, tolerances).is_some();

    let result = match mode {
        Mode::Existence => usize::from(triples.par_iter().find_any(matching).is_some()),
        Mode::Count => triples.par_iter().filter(matching).count(),
    };
    log::trace!("Orientation comparison in {:?} mode over {} triples: {}", mode, triples.len(), result);
    Ok(result)
}

/// All atom mappings of `a` onto `b`
///
/// Each permutation maps atom `i` of `a` onto atom `sigma[i]` of `b`. The
/// number of mappings equals the count mode result of [`compare`].
pub fn matches(a: &Orientation, b: &Orientation, tolerances: &Tolerances) -> Result<Vec<Permutation>> {
    if !comparable(a, b)? {
        return Ok(Vec::new());
    }

    if a.shape() == Shape::Linear {
        return Ok(linear_matches(a.geometry(), b.geometry(), tolerances)
            .into_iter()
            .flatten()
            .collect());
    }

    let table = distance_table(b.geometry());
    let triples: Vec<Vec<usize>> = (0..b.len()).permutations(3).collect();
    Ok(triples.par_iter()
        .filter_map(|triple| extend_triple(a, b, &table, triple, tolerances))
        .collect())
}
