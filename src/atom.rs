extern crate nalgebra as na;

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::tolerance::Tolerances;

type Vector3 = na::Vector3<f64>;

/// Chemical elements known to bond perception
///
/// Variant names are the element symbols. `X` marks a dummy atom, a massless
/// placeholder without chemistry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Element {
    X,
    H, He,
    Li, Be, B, C, N, O, F, Ne,
    Na, Mg, Al, Si, P, S, Cl, Ar,
    K, Ca, Br, I,
}

lazy_static! {
    static ref SYMBOL_LOOKUP: HashMap<String, Element> = Element::ALL.iter()
        .map(|&e| (e.symbol().to_ascii_lowercase(), e))
        .collect();
}

impl Element {
    pub const ALL: [Element; 23] = [
        Element::X,
        Element::H, Element::He,
        Element::Li, Element::Be, Element::B, Element::C, Element::N, Element::O, Element::F, Element::Ne,
        Element::Na, Element::Mg, Element::Al, Element::Si, Element::P, Element::S, Element::Cl, Element::Ar,
        Element::K, Element::Ca, Element::Br, Element::I,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Element::X => "X",
            Element::H => "H",
            Element::He => "He",
            Element::Li => "Li",
            Element::Be => "Be",
            Element::B => "B",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
            Element::F => "F",
            Element::Ne => "Ne",
            Element::Na => "Na",
            Element::Mg => "Mg",
            Element::Al => "Al",
            Element::Si => "Si",
            Element::P => "P",
            Element::S => "S",
            Element::Cl => "Cl",
            Element::Ar => "Ar",
            Element::K => "K",
            Element::Ca => "Ca",
            Element::Br => "Br",
            Element::I => "I",
        }
    }

    /// Single-bond covalent radius in Angstrom
    ///
    /// Values from Cordero et al., Dalton Trans. 2008, 2832. Carbon uses the sp3 radius.
    pub fn covalent_radius(&self) -> f64 {
        match self {
            Element::X => 0.0,
            Element::H => 0.31,
            Element::He => 0.28,
            Element::Li => 1.28,
            Element::Be => 0.96,
            Element::B => 0.84,
            Element::C => 0.76,
            Element::N => 0.71,
            Element::O => 0.66,
            Element::F => 0.57,
            Element::Ne => 0.58,
            Element::Na => 1.66,
            Element::Mg => 1.41,
            Element::Al => 1.21,
            Element::Si => 1.11,
            Element::P => 1.07,
            Element::S => 1.05,
            Element::Cl => 1.02,
            Element::Ar => 1.06,
            Element::K => 2.03,
            Element::Ca => 1.76,
            Element::Br => 1.20,
            Element::I => 1.39,
        }
    }

    /// Formal valence
    pub fn valence(&self) -> u32 {
        match self {
            Element::X | Element::He | Element::Ne | Element::Ar => 0,
            Element::H | Element::Li | Element::F | Element::Na
                | Element::Cl | Element::K | Element::Br | Element::I => 1,
            Element::Be | Element::O | Element::Mg | Element::S | Element::Ca => 2,
            Element::B | Element::N | Element::Al | Element::P => 3,
            Element::C | Element::Si => 4,
        }
    }

    pub fn is_dummy(&self) -> bool {
        *self == Element::X
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.symbol())
    }
}

impl FromStr for Element {
    type Err = Error;

    /// Case-insensitive symbol lookup
    fn from_str(symbol: &str) -> Result<Element, Error> {
        SYMBOL_LOOKUP.get(&symbol.trim().to_ascii_lowercase())
            .copied()
            .ok_or_else(|| Error::UnknownElement(symbol.to_owned()))
    }
}

/// Atom of a geometry: an element at a position in bohr
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    pub element: Element,
    pub position: Vector3,
}

impl Atom {
    pub fn new(element: Element, position: Vector3) -> Atom {
        Atom {element, position}
    }

    pub fn dummy(position: Vector3) -> Atom {
        Atom {element: Element::X, position}
    }

    pub fn is_dummy(&self) -> bool {
        self.element.is_dummy()
    }

    /// Chemical identity test, positions are ignored
    pub fn same_element(&self, other: &Atom) -> bool {
        self.element == other.element
    }

    pub fn distance(&self, other: &Atom) -> f64 {
        (self.position - other.position).norm()
    }

    /// Same element at the same position within distance tolerance
    pub fn approx_eq(&self, other: &Atom, tolerances: &Tolerances) -> bool {
        self.same_element(other) && tolerances.distances_equal(self.distance(other), 0.0)
    }
}

#[cfg(test)]
mod tests {
    use crate::atom::*;

    #[test]
    fn symbols() {
        for element in Element::ALL {
            assert_eq!(element.symbol().parse::<Element>(), Ok(element));
        }
        assert_eq!("cl".parse::<Element>(), Ok(Element::Cl));
        assert_eq!(" BR ".parse::<Element>(), Ok(Element::Br));
        assert_eq!("Xe".parse::<Element>(), Err(Error::UnknownElement("Xe".to_owned())));
        assert_eq!(format!("{:<3}|", Element::C), "C  |");
    }

    #[test]
    fn atom_equality() {
        let tolerances = Tolerances::default();
        let a = Atom::new(Element::C, Vector3::zeros());
        let b = Atom::new(Element::C, Vector3::new(0.0, 0.03, 0.0));
        let c = Atom::new(Element::N, Vector3::zeros());
        assert!(a.approx_eq(&b, &tolerances));
        assert!(!a.approx_eq(&c, &tolerances));
        assert!(a.same_element(&b));
        assert!(Atom::dummy(Vector3::x()).is_dummy());
    }
}
