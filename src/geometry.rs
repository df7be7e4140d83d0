extern crate nalgebra as na;

use std::ops::{AddAssign, Index, IndexMut, MulAssign, SubAssign};

use serde::{Deserialize, Serialize};

use crate::atom::{Atom, Element};
use crate::permutation::{Permutation, PermutationError};
use crate::tolerance::BOHR;

pub type Vector3 = na::Vector3<f64>;
pub type Matrix3 = na::Matrix3<f64>;

/// Angle in degrees between the vectors b→a and b→c
///
/// Degenerate (zero-length) arms yield zero.
pub fn angle(a: &Vector3, b: &Vector3, c: &Vector3) -> f64 {
    let u = a - b;
    let v = c - b;
    let norms = u.norm() * v.norm();
    if norms == 0.0 {
        return 0.0;
    }

    (u.dot(&v) / norms).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Dihedral angle in degrees of the sequence a-b-c-d
///
/// Follows the IUPAC sign convention: looking along b→c, the angle is positive
/// if a must be rotated clockwise to eclipse d. Result is in (-180, 180].
pub fn dihedral(a: &Vector3, b: &Vector3, c: &Vector3, d: &Vector3) -> f64 {
    let b1 = b - a;
    let b2 = c - b;
    let b3 = d - c;

    let n1 = b1.cross(&b2);
    let n2 = b2.cross(&b3);
    let y = b2.norm() * b1.dot(&n2);
    let x = n1.dot(&n2);
    y.atan2(x).to_degrees()
}

/// Proper rotation taking `first` onto +x and `second` into the xy-plane at +y
///
/// Rows are the new basis vectors, so applying the matrix to a position yields
/// its coordinates in the standard frame spanned by the two references.
pub fn standard_frame(first: &Vector3, second: &Vector3) -> Matrix3 {
    let e1 = first.normalize();
    let e2 = (second - second.dot(&e1) * e1).normalize();
    let e3 = e1.cross(&e2);
    Matrix3::from_rows(&[e1.transpose(), e2.transpose(), e3.transpose()])
}

/// Ordered sequence of atoms
///
/// Bulk transforms apply to every atom in place. The sequence is only ever
/// reordered or filtered into a new geometry, never resized in place.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Geometry {
    atoms: Vec<Atom>
}

impl Geometry {
    pub fn new(atoms: Vec<Atom>) -> Geometry {
        Geometry {atoms}
    }

    /// Construct from element symbols and positions in Angstrom
    pub fn from_angstrom<I>(records: I) -> Geometry where I: IntoIterator<Item=(Element, [f64; 3])> {
        records.into_iter()
            .map(|(element, [x, y, z])| Atom::new(element, Vector3::new(x, y, z) / BOHR))
            .collect()
    }

    /// Positions in Angstrom
    pub fn to_angstrom(&self) -> Vec<(Element, [f64; 3])> {
        self.atoms.iter()
            .map(|a| {
                let p = a.position * BOHR;
                (a.element, [p.x, p.y, p.z])
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Atom> {
        self.atoms.iter()
    }

    pub fn position(&self, index: usize) -> &Vector3 {
        &self.atoms[index].position
    }

    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.atoms[i].distance(&self.atoms[j])
    }

    pub fn angle(&self, a: usize, b: usize, c: usize) -> f64 {
        angle(self.position(a), self.position(b), self.position(c))
    }

    pub fn dihedral(&self, a: usize, b: usize, c: usize, d: usize) -> f64 {
        dihedral(self.position(a), self.position(b), self.position(c), self.position(d))
    }

    /// Index of the first dummy atom, if any
    pub fn first_dummy(&self) -> Option<usize> {
        self.atoms.iter().position(|a| a.is_dummy())
    }

    pub fn has_dummies(&self) -> bool {
        self.first_dummy().is_some()
    }

    /// Copy without dummy atoms and the map from old to new indices
    pub fn without_dummies(&self) -> (Geometry, Vec<Option<usize>>) {
        let mut index_map = Vec::with_capacity(self.len());
        let mut atoms = Vec::with_capacity(self.len());
        for atom in self.atoms.iter() {
            if atom.is_dummy() {
                index_map.push(None);
            } else {
                index_map.push(Some(atoms.len()));
                atoms.push(*atom);
            }
        }
        (Geometry {atoms}, index_map)
    }

    /// Rotate every position: `p ← rotation * p`
    pub fn rotate(&mut self, rotation: &Matrix3) {
        for atom in self.atoms.iter_mut() {
            atom.position = rotation * atom.position;
        }
    }

    pub fn swap(&mut self, i: usize, j: usize) {
        self.atoms.swap(i, j);
    }

    /// Reorder atoms so that the k-th atom is the previous `order[k]`-th
    pub fn reorder(&mut self, order: &Permutation) -> Result<(), PermutationError> {
        self.atoms = order.gather(&self.atoms)?;
        Ok(())
    }
}

impl FromIterator<Atom> for Geometry {
    fn from_iter<I: IntoIterator<Item=Atom>>(iter: I) -> Geometry {
        Geometry {atoms: iter.into_iter().collect()}
    }
}

impl Index<usize> for Geometry {
    type Output = Atom;

    fn index(&self, i: usize) -> &Atom {
        &self.atoms[i]
    }
}

impl IndexMut<usize> for Geometry {
    fn index_mut(&mut self, i: usize) -> &mut Atom {
        &mut self.atoms[i]
    }
}

impl AddAssign<Vector3> for Geometry {
    fn add_assign(&mut self, shift: Vector3) {
        for atom in self.atoms.iter_mut() {
            atom.position += shift;
        }
    }
}

impl SubAssign<Vector3> for Geometry {
    fn sub_assign(&mut self, shift: Vector3) {
        for atom in self.atoms.iter_mut() {
            atom.position -= shift;
        }
    }
}

impl MulAssign<f64> for Geometry {
    fn mul_assign(&mut self, factor: f64) {
        for atom in self.atoms.iter_mut() {
            atom.position *= factor;
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::geometry::*;
    use approx::assert_relative_eq;

    const EPSILON: f64 = 1e-9;

    /// Random proper rotation
    pub fn random_rotation() -> Matrix3 {
        let axis = na::Unit::new_normalize(Vector3::new_random() - Vector3::repeat(0.5));
        let rotation = na::Rotation3::from_axis_angle(&axis, rand::random::<f64>() * std::f64::consts::TAU);
        rotation.into_inner()
    }

    /// Apply a random rigid motion to a geometry
    pub fn randomly_moved(geometry: &Geometry) -> Geometry {
        let mut moved = geometry.clone();
        moved.rotate(&random_rotation());
        moved += 10.0 * (Vector3::new_random() - Vector3::repeat(0.5));
        moved
    }

    #[test]
    fn angles() {
        let origin = Vector3::zeros();
        assert_relative_eq!(angle(&Vector3::x(), &origin, &Vector3::y()), 90.0, epsilon = EPSILON);
        assert_relative_eq!(angle(&Vector3::x(), &origin, &-Vector3::x()), 180.0, epsilon = EPSILON);
        assert_relative_eq!(angle(&Vector3::x(), &origin, &origin), 0.0);
    }

    #[test]
    fn dihedral_sign() {
        let a = Vector3::new(1.0, 0.0, 0.0);
        let b = Vector3::zeros();
        let c = Vector3::new(0.0, 0.0, 1.0);

        assert_relative_eq!(dihedral(&a, &b, &c, &Vector3::new(1.0, 0.0, 1.0)), 0.0, epsilon = EPSILON);
        assert_relative_eq!(dihedral(&a, &b, &c, &Vector3::new(-1.0, 0.0, 1.0)).abs(), 180.0, epsilon = EPSILON);
        // Looking along +z, x has to turn clockwise onto +y
        assert_relative_eq!(dihedral(&a, &b, &c, &Vector3::new(0.0, 1.0, 1.0)), 90.0, epsilon = EPSILON);
        assert_relative_eq!(dihedral(&a, &b, &c, &Vector3::new(0.0, -1.0, 1.0)), -90.0, epsilon = EPSILON);
    }

    #[test]
    fn frame() {
        for _ in 0..10 {
            let first = Vector3::new_random() - Vector3::repeat(0.5);
            let second = Vector3::new_random() - Vector3::repeat(0.5);
            let frame = standard_frame(&first, &second);

            assert_relative_eq!(frame.determinant(), 1.0, epsilon = 1e-9);
            let rotated_first = frame * first;
            assert_relative_eq!(rotated_first, Vector3::new(first.norm(), 0.0, 0.0), epsilon = 1e-9);
            let rotated_second = frame * second;
            assert!(rotated_second.y > 0.0);
            assert_relative_eq!(rotated_second.z, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn bulk_transforms() {
        let mut geometry = Geometry::from_angstrom([
            (Element::O, [0.0, 0.0, 0.0]),
            (Element::X, [0.0, 0.0, 1.0]),
            (Element::H, [BOHR, 0.0, 0.0]),
        ]);
        assert_relative_eq!(geometry.distance(0, 2), 1.0, epsilon = EPSILON);
        let records = geometry.to_angstrom();
        assert_eq!(records[1].0, Element::X);
        assert_relative_eq!(records[2].1[0], BOHR, epsilon = EPSILON);
        assert_relative_eq!(records[1].1[2], 1.0, epsilon = EPSILON);

        geometry += Vector3::new(1.0, 2.0, 3.0);
        geometry -= Vector3::new(1.0, 2.0, 3.0);
        geometry *= 2.0;
        assert_relative_eq!(geometry.distance(0, 2), 2.0, epsilon = EPSILON);

        let moved = randomly_moved(&geometry);
        assert_relative_eq!(moved.distance(0, 2), 2.0, epsilon = EPSILON);
        assert_relative_eq!(moved.angle(1, 0, 2), 90.0, epsilon = 1e-6);

        assert_eq!(geometry.first_dummy(), Some(1));
        let (filtered, map) = geometry.without_dummies();
        assert_eq!(filtered.len(), 2);
        assert_eq!(map, vec![Some(0), None, Some(1)]);

        geometry.reorder(&Permutation::reversal(3)).unwrap();
        assert_eq!(geometry[0].element, Element::H);
        assert_eq!(geometry[2].element, Element::O);
    }
}
