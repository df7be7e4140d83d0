//! Z-matrix path and internal coordinates
//!
//! The path is an arena of [`PathRecord`]s. Every entry after the root refers
//! to earlier entries by index: its parent for the bond distance, a second
//! entry for the polar angle and a third for the dihedral angle. Dummy entries
//! provide angle references next to atoms with a straight bond angle.

mod path;

use std::collections::BTreeMap;

use crate::atom::Element;
use crate::geometry::Vector3;
use crate::structure::bonds::BondPair;
use crate::tolerance::BOHR;

/// Distance of a dummy entry from its parent in bohr
pub const DUMMY_DISTANCE: f64 = 1.0;

/// Entry of the z-matrix path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRecord {
    /// Atom index in the primary structure, `None` for dummy entries
    pub atom: Option<usize>,
    pub element: Element,
    /// Entry index of the parent, `None` only for the root
    pub parent: Option<usize>,
    /// Entry range `begin..end` of the direct children, empty if never expanded
    pub begin: usize,
    pub end: usize,
    /// The atom is linear and its first child is a dummy entry
    pub linear: bool,
    /// The bond to the parent is a beta bond
    pub beta: bool,
}

impl PathRecord {
    pub(crate) fn real(atom: usize, element: Element, parent: Option<usize>) -> PathRecord {
        PathRecord {atom: Some(atom), element, parent, begin: 0, end: 0, linear: false, beta: false}
    }

    pub(crate) fn dummy(parent: usize) -> PathRecord {
        PathRecord {atom: None, element: Element::X, parent: Some(parent), begin: 0, end: 0, linear: false, beta: false}
    }

    pub fn is_dummy(&self) -> bool {
        self.atom.is_none()
    }

    /// Entry indices of the direct children
    pub fn children(&self) -> std::ops::Range<usize> {
        self.begin..self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CoordinateKind {
    Distance,
    Polar,
    Dihedral,
}

impl CoordinateKind {
    pub const ALL: [CoordinateKind; 3] = [CoordinateKind::Distance, CoordinateKind::Polar, CoordinateKind::Dihedral];

    /// Variable name prefix
    pub fn symbol(&self) -> char {
        match self {
            CoordinateKind::Distance => 'R',
            CoordinateKind::Polar => 'A',
            CoordinateKind::Dihedral => 'D',
        }
    }
}

/// Internal coordinate of a z-matrix entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoordinateId {
    pub entry: usize,
    pub kind: CoordinateKind,
}

impl std::fmt::Display for CoordinateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.kind.symbol(), self.entry)
    }
}

/// Reference entry and value of an internal coordinate
///
/// Distances are in bohr, angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Internal {
    pub reference: usize,
    pub value: f64,
}

/// Internal coordinates of an entry
///
/// The root has none, the second entry only a distance and the third no
/// dihedral angle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinates {
    pub distance: Option<Internal>,
    pub polar: Option<Internal>,
    pub dihedral: Option<Internal>,
}

impl Coordinates {
    pub fn get(&self, kind: CoordinateKind) -> Option<&Internal> {
        match kind {
            CoordinateKind::Distance => self.distance.as_ref(),
            CoordinateKind::Polar => self.polar.as_ref(),
            CoordinateKind::Dihedral => self.dihedral.as_ref(),
        }
    }
}

/// Partition of a molecule into two groups rotating against each other
///
/// Each group lists its end of the rotor bond first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotor {
    pub bond: BondPair,
    pub groups: [Vec<usize>; 2],
}

/// Single bond next to a radical site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BetaBond {
    /// The bond is part of a ring
    pub ring: bool,
    pub radical: usize,
    /// Bond atom bonded to the radical site
    pub primary: usize,
    pub secondary: usize,
}

/// Named internal coordinate value in Angstrom or degrees
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub id: CoordinateId,
    pub value: f64,
    pub constant: bool,
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {:.4}", self.id, self.value)
    }
}

/// Z-matrix of a molecular structure
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ZMatrix {
    records: Vec<PathRecord>,
    coordinates: Vec<Coordinates>,
    constants: Vec<CoordinateId>,
    rotors: BTreeMap<usize, Rotor>,
    betas: BTreeMap<usize, BetaBond>,
}

impl ZMatrix {
    pub fn records(&self) -> &[PathRecord] {
        &self.records
    }

    /// Number of entries, dummies included
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn coordinates(&self, entry: usize) -> &Coordinates {
        &self.coordinates[entry]
    }

    pub fn value(&self, id: CoordinateId) -> Option<f64> {
        self.coordinates.get(id.entry)
            .and_then(|c| c.get(id.kind))
            .map(|internal| internal.value)
    }

    /// Coordinates fixed by the path construction, e.g. those of dummy entries
    pub fn constants(&self) -> &[CoordinateId] {
        &self.constants
    }

    pub fn is_constant(&self, id: CoordinateId) -> bool {
        self.constants.contains(&id)
    }

    /// Rotors keyed by the entry whose dihedral angle is the torsion
    pub fn rotors(&self) -> &BTreeMap<usize, Rotor> {
        &self.rotors
    }

    /// Beta bonds keyed by the entry of their bond to the parent
    pub fn betas(&self) -> &BTreeMap<usize, BetaBond> {
        &self.betas
    }

    /// Atom index of each entry, `None` for dummies
    pub fn atom_ordering(&self) -> Vec<Option<usize>> {
        self.records.iter().map(|r| r.atom).collect()
    }

    /// Entry of an atom
    pub fn atom_map(&self, atom: usize) -> Option<usize> {
        self.records.iter().position(|r| r.atom == Some(atom))
    }

    /// All internal coordinates in entry order
    pub fn variables(&self) -> Vec<Variable> {
        self.coordinates.iter()
            .enumerate()
            .flat_map(move |(entry, coordinates)| {
                CoordinateKind::ALL.into_iter().filter_map(move |kind| {
                    coordinates.get(kind).map(|internal| {
                        let id = CoordinateId {entry, kind};
                        let value = match kind {
                            CoordinateKind::Distance => internal.value * BOHR,
                            _ => internal.value,
                        };
                        Variable {id, value, constant: self.is_constant(id)}
                    })
                })
            })
            .collect()
    }

    /// Cartesian positions of all entries in bohr, dummies included
    ///
    /// The root is placed at the origin, the second entry on the x axis and
    /// the third in the xy-plane.
    pub fn to_cartesian(&self) -> Vec<Vector3> {
        let mut positions: Vec<Vector3> = Vec::with_capacity(self.len());
        for coordinates in self.coordinates.iter() {
            let position = match (coordinates.distance, coordinates.polar, coordinates.dihedral) {
                (Some(r), Some(a), Some(d)) => place(
                    &positions[r.reference],
                    &positions[a.reference],
                    Some(&positions[d.reference]),
                    r.value,
                    a.value,
                    d.value
                ),
                (Some(r), Some(a), None) => place(&positions[r.reference], &positions[a.reference], None, r.value, a.value, 0.0),
                (Some(r), _, _) => positions[r.reference] + Vector3::new(r.value, 0.0, 0.0),
                _ => Vector3::zeros(),
            };
            positions.push(position);
        }
        positions
    }
}

/// Any unit vector orthogonal to `u`
fn orthogonal(u: &Vector3) -> Vector3 {
    let helper = if u.z.abs() < 0.9 { Vector3::z() } else { Vector3::x() };
    (helper - u * helper.dot(u)).normalize()
}

/// Position at a distance from `bonded`, an angle with `angled` and a dihedral with `twisted`
fn place(bonded: &Vector3, angled: &Vector3, twisted: Option<&Vector3>, distance: f64, angle: f64, dihedral: f64) -> Vector3 {
    let u = (angled - bonded).normalize();
    let v = twisted
        .map(|t| {
            let w = t - angled;
            w - u * w.dot(&u)
        })
        .filter(|w| w.norm() > 1e-8)
        .map(|w| w.normalize())
        .unwrap_or_else(|| orthogonal(&u));

    let (theta, phi) = (angle.to_radians(), dihedral.to_radians());
    let sideways = phi.cos() * v - phi.sin() * u.cross(&v);
    bonded + distance * (theta.cos() * u + theta.sin() * sideways)
}

impl std::fmt::Display for ZMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (entry, (record, coordinates)) in self.records.iter().zip(self.coordinates.iter()).enumerate() {
            let mut line = format!("{:<2}", record.element.symbol());
            for kind in CoordinateKind::ALL {
                if let Some(internal) = coordinates.get(kind) {
                    line += &format!(", {:<2}, {}{:<2}", internal.reference + 1, kind.symbol(), entry);
                }
            }
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
