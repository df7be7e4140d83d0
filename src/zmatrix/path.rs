use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::structure::bonds::BondPair;
use crate::structure::molecular::MolecularStructure;
use crate::zmatrix::{
    BetaBond, CoordinateId, CoordinateKind, Coordinates, Internal, PathRecord, Rotor, ZMatrix, DUMMY_DISTANCE
};

/// Breadth-first traversal of the bond graph from atom zero
///
/// Each expanded atom lists a dummy entry first if it is linear, then its
/// not yet visited bonded atoms in ascending index order.
fn trace(structure: &MolecularStructure) -> Result<(Vec<PathRecord>, BTreeMap<usize, BetaBond>)> {
    let primary = structure.primary();
    let mut records = vec![PathRecord::real(0, primary.element(0), None)];
    let mut betas = BTreeMap::new();
    let mut pool: Vec<usize> = (1..primary.size()).collect();
    let mut current = 0;

    while !pool.is_empty() {
        let prev = records[current].atom.ok_or(Error::DummyReference {entry: current})?;
        records[current].begin = records.len();

        if primary.is_linear(prev) {
            records[current].linear = true;
            records.push(PathRecord::dummy(current));
        }

        let mut remaining = Vec::with_capacity(pool.len());
        for atom in pool {
            if !primary.is_bonded(atom, prev) {
                remaining.push(atom);
                continue;
            }

            let mut record = PathRecord::real(atom, primary.element(atom), Some(current));
            if let Some(beta) = structure.is_beta(atom, prev)? {
                betas.insert(records.len(), beta);
                record.beta = true;
            }
            records.push(record);
        }
        pool = remaining;
        records[current].end = records.len();

        if pool.is_empty() {
            break;
        }

        current = (current + 1..records.len())
            .find(|&entry| !records[entry].is_dummy())
            .ok_or(Error::Disconnected)?;
    }

    Ok((records, betas))
}

/// First approach of the path onto a linear root from below
#[derive(Debug, Clone, Copy)]
struct LinearRoot {
    atom: usize,
    single: bool,
}

struct Assembly<'a> {
    structure: &'a MolecularStructure,
    records: &'a [PathRecord],
    linear_root: Option<LinearRoot>,
    constants: Vec<CoordinateId>,
    rotors: BTreeMap<usize, Rotor>,
}

impl<'a> Assembly<'a> {
    fn atom(&self, entry: usize) -> Result<usize> {
        self.records[entry].atom.ok_or(Error::DummyReference {entry})
    }

    fn parent(&self, entry: usize) -> usize {
        self.records[entry].parent.expect("Only the root has no parent")
    }

    fn begin(&self, entry: usize) -> usize {
        self.records[entry].begin
    }

    fn linear(&self, entry: usize) -> bool {
        self.records[entry].linear
    }

    fn fixed(&mut self, entry: usize, kind: CoordinateKind, reference: usize, value: f64) -> Internal {
        self.constants.push(CoordinateId {entry, kind});
        Internal {reference, value}
    }

    fn measured_dihedral(&self, entry: usize, reference: usize, atoms: [usize; 3]) -> Result<Internal> {
        let atom = self.atom(entry)?;
        let value = self.structure.primary().geometry().dihedral(atom, atoms[0], atoms[1], atoms[2]);
        Ok(Internal {reference, value})
    }

    /// Split the molecule at a bond into the two groups rotating about it
    fn add_rotor(&mut self, entry: usize, a: usize, b: usize) -> Result<()> {
        let mut cut = self.structure.primary().bonds().clone();
        cut.set(a, b, 0);
        let groups = cut.connected_groups();
        let count = groups.len();
        let mut groups: [Vec<usize>; 2] = groups.try_into()
            .map_err(|_| Error::RotorPartition {groups: count})?;

        let bond = BondPair::new(a, b);
        for group in groups.iter_mut() {
            if let Some(position) = group.iter().position(|&atom| bond.contains(atom)) {
                let end = group.remove(position);
                group.insert(0, end);
            }
        }

        log::debug!(
            "Rotor about bond {} at z-matrix entry {}: {} and {} atoms",
            bond, entry, groups[0].len(), groups[1].len()
        );
        self.rotors.insert(entry, Rotor {bond, groups});
        Ok(())
    }

    fn distance(&mut self, entry: usize) -> Result<Internal> {
        let ref1 = self.parent(entry);
        if self.records[entry].is_dummy() {
            return Ok(self.fixed(entry, CoordinateKind::Distance, ref1, DUMMY_DISTANCE));
        }

        let value = self.structure.primary().geometry().distance(self.atom(entry)?, self.atom(ref1)?);
        Ok(Internal {reference: ref1, value})
    }

    fn polar(&mut self, entry: usize) -> Result<Internal> {
        let ref1 = self.parent(entry);
        if self.linear(ref1) {
            let ref2 = if self.records[entry].is_dummy() { self.parent(ref1) } else { self.begin(ref1) };
            return Ok(self.fixed(entry, CoordinateKind::Polar, ref2, 90.0));
        }

        let ref2 = if ref1 == 0 { 1 } else { self.parent(ref1) };
        let value = self.structure.primary().geometry().angle(self.atom(entry)?, self.atom(ref1)?, self.atom(ref2)?);
        Ok(Internal {reference: ref2, value})
    }

    fn dihedral(&mut self, entry: usize, ref2: usize) -> Result<Internal> {
        let ref1 = self.parent(entry);

        if self.linear(ref1) {
            if self.records[entry].is_dummy() {
                let ref3 = if self.linear(ref2) {
                    self.begin(ref2)
                } else if ref2 != 0 {
                    self.parent(ref2)
                } else if ref1 == 1 {
                    2
                } else {
                    1
                };
                return Ok(self.fixed(entry, CoordinateKind::Dihedral, ref3, 0.0));
            }

            let ref3 = if ref1 == 0 { 2 } else { self.parent(ref1) };
            return Ok(self.fixed(entry, CoordinateKind::Dihedral, ref3, 180.0));
        }

        let (a1, a2) = (self.atom(ref1)?, self.atom(ref2)?);
        if entry != self.begin(ref1) {
            let ref3 = if ref1 == 0 { 2 } else { self.begin(ref1) };
            let a3 = self.atom(ref3)?;
            return self.measured_dihedral(entry, ref3, [a1, a2, a3]);
        }

        let ring = self.structure.primary().is_ring(a1, a2)?;
        let mut single = self.structure.is_single(a1, a2)?;

        if !self.linear(ref2) {
            let ref3 = if ref2 != 0 {
                self.parent(ref2)
            } else if ref1 == 1 {
                2
            } else {
                1
            };
            let a3 = self.atom(ref3)?;
            let internal = self.measured_dihedral(entry, ref3, [a1, a2, a3])?;
            if !ring && single {
                self.add_rotor(entry, a1, a2)?;
            }
            return Ok(internal);
        }

        // Walk up the linear chain to the first atom off its axis
        let ref3 = self.begin(ref2);
        let (mut prev, mut current) = (ref2, ref2);
        while current != 0 && self.linear(current) {
            prev = current;
            current = self.parent(current);
            single |= self.structure.is_single(self.atom(prev)?, self.atom(current)?)?;
        }

        if current != 0 {
            let far = self.atom(self.parent(current))?;
            let internal = self.measured_dihedral(entry, ref3, [a1, a2, far])?;
            if !ring && single {
                self.add_rotor(entry, a1, a2)?;
            }
            return Ok(internal);
        }

        if self.linear(0) {
            return match self.linear_root {
                None => {
                    self.linear_root = Some(LinearRoot {atom: self.atom(entry)?, single});
                    Ok(self.fixed(entry, CoordinateKind::Dihedral, ref3, 0.0))
                },
                Some(root) => {
                    let internal = self.measured_dihedral(entry, ref3, [a1, a2, root.atom])?;
                    if !ring && (single || root.single) {
                        self.add_rotor(entry, a1, a2)?;
                    }
                    Ok(internal)
                }
            };
        }

        if self.structure.primary().bonds().degree(0) == 1 {
            return Ok(self.fixed(entry, CoordinateKind::Dihedral, ref3, 0.0));
        }

        let far = if prev == 1 { self.atom(2)? } else { self.atom(1)? };
        let internal = self.measured_dihedral(entry, ref3, [a1, a2, far])?;
        if !ring && single {
            self.add_rotor(entry, a1, a2)?;
        }
        Ok(internal)
    }
}

impl ZMatrix {
    /// Build the z-matrix path and internal coordinates of a structure
    pub(crate) fn new(structure: &MolecularStructure) -> Result<ZMatrix> {
        let (records, betas) = trace(structure)?;
        let mut assembly = Assembly {
            structure,
            records: &records,
            linear_root: None,
            constants: Vec::new(),
            rotors: BTreeMap::new(),
        };

        let mut coordinates = vec![Coordinates::default(); records.len()];
        for entry in 1..records.len() {
            coordinates[entry].distance = Some(assembly.distance(entry)?);
            if entry >= 2 {
                let polar = assembly.polar(entry)?;
                coordinates[entry].polar = Some(polar);
                if entry >= 3 {
                    coordinates[entry].dihedral = Some(assembly.dihedral(entry, polar.reference)?);
                }
            }
        }

        let Assembly {constants, rotors, ..} = assembly;
        log::debug!(
            "Z-matrix of {} entries with {} constants, {} rotors and {} beta bonds",
            records.len(), constants.len(), rotors.len(), betas.len()
        );
        Ok(ZMatrix {records, coordinates, constants, rotors, betas})
    }
}
