use thiserror::Error;

use crate::atom::Element;

/// Coarse classification of [`Error`] variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input outside of the domain of an operation
    Range,
    /// Query that makes no sense for the given structure
    Logic,
    /// Violated structural invariant
    Structure,
}

/// Errors of orientation, comparison and structure construction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Fewer atoms than the operation requires
    #[error("wrong number of atoms: {found}, at least {required} required")]
    TooFewAtoms {
        found: usize,
        required: usize,
    },

    /// Dummy atom where only real atoms are allowed
    #[error("dummy atom at index {index} is not allowed here")]
    DummyAtom {
        index: usize,
    },

    /// Reference atoms too close to define a direction
    #[error("atoms {first} and {second} are too close")]
    CoincidentAtoms {
        first: usize,
        second: usize,
    },

    /// Bond graph falls apart into several components
    #[error("primary structure is not connected")]
    Disconnected,

    /// Bond order sum of an atom is above what its formal valence permits
    #[error("{element} atom {atom}: bond order sum {order} exceeds twice its formal valence {valence}")]
    ValenceExceeded {
        atom: usize,
        element: Element,
        order: u32,
        valence: u32,
    },

    /// Element symbol not in the element table
    #[error("unknown element symbol '{0}'")]
    UnknownElement(String),

    /// Bond query on atoms without a bond between them
    #[error("no bond between atoms {first} and {second}")]
    NotBonded {
        first: usize,
        second: usize,
    },

    /// Bond query between an atom and itself
    #[error("the same atom: {atom}")]
    SameAtom {
        atom: usize,
    },

    /// Cutting a rotor bond must yield exactly two fragments
    #[error("wrong number of rotational groups: {groups}")]
    RotorPartition {
        groups: usize,
    },

    /// A dummy record was used where a real atom position is needed
    #[error("z-matrix entry {entry} is a dummy atom and has no position")]
    DummyReference {
        entry: usize,
    },
}

impl Error {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::TooFewAtoms {..}
            | Error::DummyAtom {..}
            | Error::CoincidentAtoms {..}
            | Error::Disconnected
            | Error::ValenceExceeded {..}
            | Error::UnknownElement(_) => ErrorKind::Range,
            Error::NotBonded {..} => ErrorKind::Logic,
            Error::SameAtom {..}
            | Error::RotorPartition {..}
            | Error::DummyReference {..} => ErrorKind::Structure,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
