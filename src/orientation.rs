use crate::error::{Error, Result};
use crate::geometry::{standard_frame, Geometry, Vector3};
use crate::isomorphism::{compare, Mode};
use crate::permutation::Permutation;
use crate::tolerance::Tolerances;

/// Classification of a canonically oriented geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// All atoms on the x axis, sorted by their x coordinate
    Linear,
    /// All atoms in the xy-plane
    Planar,
    /// Some atom out of the xy-plane
    Nonlinear,
}

/// Geometry in canonical orientation
///
/// Non-linear cases place the first atom at the origin, the second on the +x
/// axis and the third in the xy-plane with positive y. The three pairwise
/// distances of these reference atoms allow quick rejection in comparisons.
#[derive(Debug, Clone, PartialEq)]
pub struct Orientation {
    geometry: Geometry,
    shape: Shape,
    reference_distances: [f64; 3],
}

impl Orientation {
    /// Canonicalize a geometry
    ///
    /// Fails if the geometry contains dummy atoms, has fewer than two atoms, or
    /// its first two atoms coincide.
    pub fn new(geometry: &Geometry, tolerances: &Tolerances) -> Result<Orientation> {
        if let Some(index) = geometry.first_dummy() {
            return Err(Error::DummyAtom {index});
        }

        if geometry.len() < 2 {
            return Err(Error::TooFewAtoms {found: geometry.len(), required: 2});
        }

        let mut m = geometry.clone();
        m -= geometry[0].position;

        let bond_length = m.position(1).norm();
        if tolerances.distances_equal(bond_length, 0.0) {
            return Err(Error::CoincidentAtoms {first: 0, second: 1});
        }

        if m.len() == 2 {
            m[1].position = Vector3::new(bond_length, 0.0, 0.0);
            return Ok(Orientation {geometry: m, shape: Shape::Linear, reference_distances: [0.0; 3]});
        }

        // Atom spanning the angle closest to a right one with the first bond
        let mut best_index = 2;
        let mut min_deviation = (90.0 - m.angle(1, 0, 2)).abs();
        for k in 3..m.len() {
            let deviation = (90.0 - m.angle(1, 0, k)).abs();
            if deviation < min_deviation {
                best_index = k;
                min_deviation = deviation;
            }
        }

        if tolerances.angles_equal(min_deviation, 90.0) {
            let axis = m.position(1) / bond_length;
            let projections: Vec<f64> = m.iter().map(|a| a.position.dot(&axis)).collect();
            for (k, &x) in projections.iter().enumerate() {
                m[k].position = Vector3::new(x, 0.0, 0.0);
            }

            let ordering = Permutation::ordering_by(&projections, |a, b| a.total_cmp(b));
            m.reorder(&ordering).expect("Ordering matches geometry size");
            log::debug!("Canonical orientation: linear, {} atoms", m.len());
            return Ok(Orientation {geometry: m, shape: Shape::Linear, reference_distances: [0.0; 3]});
        }

        if best_index != 2 {
            m.swap(2, best_index);
        }

        let frame = standard_frame(m.position(1), m.position(2));
        m.rotate(&frame);

        let reference_distances = [0, 1, 2].map(|i| m.distance((i + 1) % 3, (i + 2) % 3));

        let out_of_plane = (3..m.len())
            .any(|k| !tolerances.distances_equal(m.position(k).z, 0.0));
        let shape = if out_of_plane { Shape::Nonlinear } else { Shape::Planar };
        log::debug!("Canonical orientation: {:?}, {} atoms", shape, m.len());

        Ok(Orientation {geometry: m, shape, reference_distances})
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Pairwise distances of the three reference atoms
    ///
    /// Entry `i` is the distance between atoms `(i + 1) % 3` and `(i + 2) % 3`.
    /// All zero for linear orientations.
    pub fn reference_distances(&self) -> &[f64; 3] {
        &self.reference_distances
    }

    pub fn len(&self) -> usize {
        self.geometry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty()
    }

    /// Number of permutations mapping the orientation onto itself
    pub fn symmetry_number(&self, tolerances: &Tolerances) -> Result<usize> {
        compare(self, self, Mode::Count, tolerances)
    }

    /// Canonical orientation of the inverted geometry
    pub fn mirrored(&self, tolerances: &Tolerances) -> Result<Orientation> {
        let mut inverted = self.geometry.clone();
        inverted *= -1.0;
        Orientation::new(&inverted, tolerances)
    }

    /// Whether the mirror image cannot be superposed onto the orientation
    ///
    /// Only non-planar geometries can be chiral.
    pub fn is_enantiomer(&self, tolerances: &Tolerances) -> Result<bool> {
        if self.shape != Shape::Nonlinear {
            return Ok(false);
        }

        let mirror = self.mirrored(tolerances)?;
        Ok(compare(self, &mirror, Mode::Existence, tolerances)? == 0)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::orientation::*;
    use crate::atom::{Atom, Element};
    use crate::geometry::tests::randomly_moved;
    use approx::assert_relative_eq;

    /// Regular tetrahedron of four ligands around a center, bond length 1.09 Å
    pub fn tetrahedral(center: Element, ligands: [Element; 4]) -> Geometry {
        let s = 1.09 / 3.0_f64.sqrt();
        let corners = [[s, s, s], [s, -s, -s], [-s, s, -s], [-s, -s, s]];
        Geometry::from_angstrom(
            std::iter::once((center, [0.0, 0.0, 0.0]))
                .chain(ligands.into_iter().zip(corners))
        )
    }

    pub fn methane() -> Geometry {
        tetrahedral(Element::C, [Element::H; 4])
    }

    pub fn water() -> Geometry {
        Geometry::from_angstrom([
            (Element::O, [0.0, 0.0, 0.1173]),
            (Element::H, [0.0, 0.7572, -0.4692]),
            (Element::H, [0.0, -0.7572, -0.4692]),
        ])
    }

    #[test]
    fn input_validation() {
        let tolerances = Tolerances::default();
        let single = Geometry::from_angstrom([(Element::H, [0.0, 0.0, 0.0])]);
        assert_eq!(Orientation::new(&single, &tolerances), Err(Error::TooFewAtoms {found: 1, required: 2}));

        let coincident = Geometry::from_angstrom([(Element::H, [0.0, 0.0, 0.0]), (Element::H, [0.0, 0.0, 0.01])]);
        assert_eq!(Orientation::new(&coincident, &tolerances), Err(Error::CoincidentAtoms {first: 0, second: 1}));

        let mut with_dummy = water();
        with_dummy[2] = Atom::dummy(with_dummy[2].position);
        assert_eq!(Orientation::new(&with_dummy, &tolerances), Err(Error::DummyAtom {index: 2}));
    }

    #[test]
    fn diatomic() {
        let tolerances = Tolerances::default();
        let geometry = Geometry::from_angstrom([(Element::H, [1.0, 1.0, 1.0]), (Element::F, [1.5, 1.5, 1.5])]);
        let orientation = Orientation::new(&geometry, &tolerances).unwrap();
        assert_eq!(orientation.shape(), Shape::Linear);
        assert_relative_eq!(orientation.geometry().position(0).norm(), 0.0);
        assert_relative_eq!(orientation.geometry().position(1).x, geometry.distance(0, 1), epsilon = 1e-12);
        assert_eq!(orientation.symmetry_number(&tolerances), Ok(1));

        let hydrogen = Geometry::from_angstrom([(Element::H, [0.0, 0.0, 0.0]), (Element::H, [0.74, 0.0, 0.0])]);
        let orientation = Orientation::new(&hydrogen, &tolerances).unwrap();
        assert_eq!(orientation.symmetry_number(&tolerances), Ok(2));
    }

    #[test]
    fn linear_sorting() {
        let tolerances = Tolerances::default();
        let positions = [[0.0, 0.0, 0.0], [0.0, 0.0, 1.16], [0.0, 0.0, -1.16]];
        let elements = [Element::C, Element::O, Element::O];

        for order in [[0, 1, 2], [1, 0, 2], [2, 1, 0], [1, 2, 0]] {
            let geometry = Geometry::from_angstrom(order.map(|i| (elements[i], positions[i])));
            let orientation = Orientation::new(&randomly_moved(&geometry), &tolerances).unwrap();
            assert_eq!(orientation.shape(), Shape::Linear);
            let xs: Vec<f64> = orientation.geometry().iter().map(|a| a.position.x).collect();
            assert!(xs.windows(2).all(|w| w[0] <= w[1]));
            assert!(orientation.geometry().iter().all(|a| a.position.y == 0.0 && a.position.z == 0.0));
            assert_eq!(orientation.geometry()[1].element, Element::C);
            assert_eq!(orientation.symmetry_number(&tolerances), Ok(2));
            assert_eq!(orientation.is_enantiomer(&tolerances), Ok(false));
        }
    }

    #[test]
    fn planar_and_nonlinear() {
        let tolerances = Tolerances::default();
        let orientation = Orientation::new(&randomly_moved(&water()), &tolerances).unwrap();
        assert_eq!(orientation.shape(), Shape::Planar);
        let reference = orientation.geometry();
        assert_relative_eq!(reference.position(0).norm(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(reference.position(1).y, 0.0, epsilon = 1e-9);
        assert!(reference.position(2).y > 0.0);
        let [d0, d1, d2] = *orientation.reference_distances();
        assert_relative_eq!(d0, reference.distance(1, 2), epsilon = 1e-12);
        assert_relative_eq!(d1, reference.distance(2, 0), epsilon = 1e-12);
        assert_relative_eq!(d2, reference.distance(0, 1), epsilon = 1e-12);
        assert_eq!(orientation.symmetry_number(&tolerances), Ok(2));

        let orientation = Orientation::new(&methane(), &tolerances).unwrap();
        assert_eq!(orientation.shape(), Shape::Nonlinear);
    }

    #[test]
    fn tetrahedral_symmetry() {
        let tolerances = Tolerances::default();
        let orientation = Orientation::new(&methane(), &tolerances).unwrap();
        assert_eq!(orientation.symmetry_number(&tolerances), Ok(12));
        assert_eq!(orientation.is_enantiomer(&tolerances), Ok(false));

        // Symmetry number does not depend on rigid motions of the input
        for _ in 0..5 {
            let moved = Orientation::new(&randomly_moved(&methane()), &tolerances).unwrap();
            assert_eq!(moved.symmetry_number(&tolerances), Ok(12));
        }
    }

    #[test]
    fn chirality() {
        let tolerances = Tolerances::default();
        let chiral = tetrahedral(Element::C, [Element::H, Element::F, Element::Cl, Element::Br]);
        let orientation = Orientation::new(&chiral, &tolerances).unwrap();
        assert_eq!(orientation.symmetry_number(&tolerances), Ok(1));
        assert_eq!(orientation.is_enantiomer(&tolerances), Ok(true));

        let achiral = tetrahedral(Element::C, [Element::H, Element::H, Element::Cl, Element::Br]);
        let orientation = Orientation::new(&achiral, &tolerances).unwrap();
        assert_eq!(orientation.symmetry_number(&tolerances), Ok(1));
        assert_eq!(orientation.is_enantiomer(&tolerances), Ok(false));
    }
}
