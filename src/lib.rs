//! Z-matrices and symmetry of molecular geometries
//!
//! Geometries are canonically oriented for comparison up to rotation and atom
//! relabeling, which yields rotational symmetry numbers and chirality. Bond
//! perception and resonance enumeration lead to a z-matrix with dummy atoms,
//! hindered rotors and beta bonds next to radical sites.

#[macro_use]
extern crate lazy_static;

pub mod atom;
pub mod error;
pub mod tolerance;
pub mod permutation;
pub mod geometry;
pub mod orientation;
pub mod isomorphism;
pub mod structure;
pub mod zmatrix;
pub mod report;

pub use atom::{Atom, Element};
pub use error::{Error, ErrorKind, Result};
pub use geometry::Geometry;
pub use isomorphism::{compare, Mode};
pub use orientation::{Orientation, Shape};
pub use structure::bonds::{BondMatrix, BondPair, ForcedBonds};
pub use structure::molecular::MolecularStructure;
pub use structure::PrimaryStructure;
pub use tolerance::{Tolerances, BOHR};
pub use zmatrix::ZMatrix;
