use std::collections::{HashSet, VecDeque};

use petgraph::unionfind::UnionFind;

/// Unordered pair of atom indices, stored with the smaller index first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BondPair(pub usize, pub usize);

impl BondPair {
    /// Generate from unordered indices
    pub fn new(a: usize, b: usize) -> BondPair {
        if b < a {
            BondPair(b, a)
        } else {
            BondPair(a, b)
        }
    }

    /// Apply a fallible index map to both ends
    pub fn map<F>(&self, f: F) -> Option<BondPair> where F: Fn(usize) -> Option<usize> {
        Some(BondPair::new(f(self.0)?, f(self.1)?))
    }

    pub fn contains(&self, atom: usize) -> bool {
        self.0 == atom || self.1 == atom
    }
}

impl std::fmt::Display for BondPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.0, self.1)
    }
}

/// Atom pairs bonded irrespective of their distance
pub type ForcedBonds = HashSet<BondPair>;

/// Symmetric matrix of bond orders without diagonal
///
/// Stores the strict lower triangle in a flat vector. Entry `(i, j)` with
/// `i < j` lives at offset `j * (j - 1) / 2 + i`. Orders are integral, their
/// unit is up to the user: the resonance enumeration counts half bonds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BondMatrix {
    n: usize,
    orders: Vec<u32>,
}

impl BondMatrix {
    /// Matrix without any bonds
    pub fn new(n: usize) -> BondMatrix {
        BondMatrix {n, orders: vec![0; n * n.saturating_sub(1) / 2]}
    }

    fn offset(i: usize, j: usize) -> usize {
        assert_ne!(i, j, "Bond matrix has no diagonal");
        let BondPair(i, j) = BondPair::new(i, j);
        j * (j - 1) / 2 + i
    }

    pub fn size(&self) -> usize {
        self.n
    }

    pub fn get(&self, i: usize, j: usize) -> u32 {
        self.orders[Self::offset(i, j)]
    }

    pub fn set(&mut self, i: usize, j: usize, order: u32) {
        self.orders[Self::offset(i, j)] = order;
    }

    pub fn increment(&mut self, i: usize, j: usize, amount: u32) {
        self.orders[Self::offset(i, j)] += amount;
    }

    pub fn is_bonded(&self, i: usize, j: usize) -> bool {
        i != j && self.get(i, j) > 0
    }

    /// Sum of bond orders of an atom
    pub fn row_sum(&self, i: usize) -> u32 {
        (0..self.n).filter(|&j| j != i).map(|j| self.get(i, j)).sum()
    }

    /// Bonded partners of an atom in ascending order
    pub fn neighbors(&self, i: usize) -> impl Iterator<Item=usize> + '_ {
        (0..self.n).filter(move |&j| self.is_bonded(i, j))
    }

    /// Number of bonded partners of an atom
    pub fn degree(&self, i: usize) -> usize {
        self.neighbors(i).count()
    }

    /// All bonded pairs, ordered by their first, then second index
    pub fn bonded_pairs(&self) -> impl Iterator<Item=BondPair> + '_ {
        (0..self.n)
            .flat_map(move |i| ((i + 1)..self.n).map(move |j| BondPair(i, j)))
            .filter(move |&BondPair(i, j)| self.get(i, j) > 0)
    }

    /// Whether an atom can be reached from another atom over bonds
    pub fn is_connected_to(&self, from: usize, to: usize) -> bool {
        if from == to {
            return true;
        }

        let mut visited = vec![false; self.n];
        let mut queue = VecDeque::from([from]);
        visited[from] = true;

        while let Some(current) = queue.pop_front() {
            for next in self.neighbors(current) {
                if next == to {
                    return true;
                }

                if !visited[next] {
                    visited[next] = true;
                    queue.push_back(next);
                }
            }
        }

        false
    }

    /// Partition of atoms into connected components
    ///
    /// Groups are ordered by their smallest member, members ascend.
    pub fn connected_groups(&self) -> Vec<Vec<usize>> {
        let mut sets = UnionFind::new(self.n);
        for BondPair(i, j) in self.bonded_pairs() {
            sets.union(i, j);
        }

        let labels = sets.into_labeling();
        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut group_of_label: Vec<Option<usize>> = vec![None; self.n];
        for (atom, &label) in labels.iter().enumerate() {
            match group_of_label[label] {
                Some(group) => groups[group].push(atom),
                None => {
                    group_of_label[label] = Some(groups.len());
                    groups.push(vec![atom]);
                }
            }
        }
        groups
    }

    pub fn is_connected(&self) -> bool {
        self.connected_groups().len() <= 1
    }
}
