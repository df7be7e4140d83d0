//! Text report of a molecular structure
//!
//! Lists averaged bond orders as a lower triangular matrix, radical sites and
//! the atom order of the z-matrix. Atoms are labeled by element symbol and
//! one-based index.

use std::fmt;

use crate::structure::molecular::MolecularStructure;

fn label(structure: &MolecularStructure, atom: usize) -> String {
    format!("{}{}", structure.primary().element(atom).symbol(), atom + 1)
}

impl MolecularStructure {
    fn write_bond_orders(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.primary().size();
        let symbol = |atom: usize| self.primary().element(atom).symbol();

        let mut header = String::from("   A\\A  ");
        for i in 0..n {
            header += &format!("{:>3}{:<2}", symbol(i), i + 1);
        }
        writeln!(f, "{}", header.trim_end())?;

        for j in 0..n {
            let mut row = format!("{:>4}{:<2}", symbol(j), j + 1);
            for i in 0..j {
                let order = self.bond_order(i, j).unwrap_or(0.0);
                row += &format!("{:>5.2}", order);
            }
            row += &format!("{:>5}", "X");
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }

    fn write_radical_sites(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sites: Vec<String> = self.radical_sites()
            .into_iter()
            .map(|atom| label(self, atom))
            .collect();

        match sites.len() {
            0 => Ok(()),
            1 => writeln!(f, "Free radical: Radical site is {}", sites[0]),
            _ => writeln!(f, "Free radical: Radical sites are {}", sites.join(" ")),
        }
    }
}

impl fmt::Display for MolecularStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Molecular structure:")?;
        if self.resonance_count() > 1 {
            write!(f, " resonantly stabilized ({} resonances)", self.resonance_count())?;
        }
        writeln!(f)?;
        writeln!(f)?;

        self.write_bond_orders(f)?;
        writeln!(f)?;
        self.write_radical_sites(f)?;

        writeln!(f, "Z-Matrix atom order:")?;
        for (entry, atom) in self.atom_ordering().into_iter().enumerate() {
            match atom {
                Some(atom) => writeln!(f, "{:>2} --> {:>2}", entry + 1, atom + 1)?,
                None => writeln!(f, "{:>2} --> {:>2}", entry + 1, "X")?,
            }
        }
        Ok(())
    }
}
