//! Backtracking subgraph matcher for compiled SMARTS patterns.
//!
//! Pattern atoms are placed in `SmartsPattern::order`; once a neighbour of the
//! next pattern atom is placed, candidates are restricted to the neighbours of
//! its image in the molecule.

use std::collections::HashSet;

use crate::toolkit::native::molecule::{BondOrder, Molecule};
use crate::toolkit::native::smarts::{
    AtomExpr, AtomPrimitive, BondExpr, BondPrimitive, SmartsPattern,
};

pub fn has_match(mol: &Molecule, pattern: &SmartsPattern) -> bool {
    if pattern.atom_count() > mol.atom_count() {
        return false;
    }
    let mut matcher = Matcher::new(mol, pattern);
    matcher.search(0, &mut |_| true)
}

/// Number of matches with distinct atom sets, stopping once `limit` is reached.
pub fn count_unique_matches(mol: &Molecule, pattern: &SmartsPattern, limit: usize) -> usize {
    if limit == 0 || pattern.atom_count() > mol.atom_count() {
        return 0;
    }
    let mut seen: HashSet<Vec<usize>> = HashSet::new();
    let mut matcher = Matcher::new(mol, pattern);
    matcher.search(0, &mut |mapping| {
        let mut atoms: Vec<usize> = mapping.iter().flatten().copied().collect();
        atoms.sort_unstable();
        seen.insert(atoms);
        seen.len() >= limit
    });
    seen.len()
}

/// Whether `pattern` matches with its first atom on `root`; used for `$()`.
fn matches_rooted(mol: &Molecule, pattern: &SmartsPattern, root: usize) -> bool {
    if pattern.atom_count() > mol.atom_count() {
        return false;
    }
    let mut matcher = Matcher::new(mol, pattern);
    if !matcher.atom_matches(&pattern.atoms[0], root) {
        return false;
    }
    matcher.mapping[0] = Some(root);
    matcher.used[root] = true;
    matcher.search(1, &mut |_| true)
}

struct Matcher<'a> {
    mol: &'a Molecule,
    pattern: &'a SmartsPattern,
    mapping: Vec<Option<usize>>,
    used: Vec<bool>,
}

impl<'a> Matcher<'a> {
    fn new(mol: &'a Molecule, pattern: &'a SmartsPattern) -> Self {
        Matcher {
            mol,
            pattern,
            mapping: vec![None; pattern.atom_count()],
            used: vec![false; mol.atom_count()],
        }
    }

    /// Returns true as soon as `visit` asks to stop.
    fn search(&mut self, depth: usize, visit: &mut dyn FnMut(&[Option<usize>]) -> bool) -> bool {
        if depth == self.pattern.order.len() {
            return visit(&self.mapping);
        }

        let query_atom = self.pattern.order[depth];
        let anchor = self.pattern.adjacency[query_atom]
            .iter()
            .find_map(|(neighbour, _)| self.mapping[*neighbour]);
        let candidates: Vec<usize> = match anchor {
            Some(image) => self.mol.adjacency[image].iter().map(|(n, _)| *n).collect(),
            None => (0..self.mol.atom_count()).collect(),
        };

        for candidate in candidates {
            if self.used[candidate] || !self.feasible(query_atom, candidate) {
                continue;
            }
            self.mapping[query_atom] = Some(candidate);
            self.used[candidate] = true;
            let stop = self.search(depth + 1, visit);
            self.mapping[query_atom] = None;
            self.used[candidate] = false;
            if stop {
                return true;
            }
        }
        false
    }

    fn feasible(&self, query_atom: usize, mol_atom: usize) -> bool {
        if !self.atom_matches(&self.pattern.atoms[query_atom], mol_atom) {
            return false;
        }
        self.pattern.adjacency[query_atom]
            .iter()
            .all(|&(neighbour, query_bond)| match self.mapping[neighbour] {
                None => true,
                Some(image) => match self.mol.bond_between(mol_atom, image) {
                    Some(bond_idx) => {
                        self.bond_matches(&self.pattern.bonds[query_bond].expr, bond_idx)
                    }
                    None => false,
                },
            })
    }

    fn atom_matches(&self, expr: &AtomExpr, atom_idx: usize) -> bool {
        match expr {
            AtomExpr::Primitive(prim) => self.primitive_matches(prim, atom_idx),
            AtomExpr::Not(inner) => !self.atom_matches(inner, atom_idx),
            AtomExpr::And(terms) => terms.iter().all(|t| self.atom_matches(t, atom_idx)),
            AtomExpr::Or(terms) => terms.iter().any(|t| self.atom_matches(t, atom_idx)),
        }
    }

    fn primitive_matches(&self, prim: &AtomPrimitive, atom_idx: usize) -> bool {
        let mol = self.mol;
        let atom = &mol.atoms[atom_idx];
        match prim {
            AtomPrimitive::Any => true,
            AtomPrimitive::Aromatic => atom.aromatic,
            AtomPrimitive::Aliphatic => !atom.aromatic,
            AtomPrimitive::Element {
                atomic_number,
                aromatic,
            } => {
                atom.atomic_number == *atomic_number
                    && aromatic.map_or(true, |flag| flag == atom.aromatic)
            }
            AtomPrimitive::Degree(d) => mol.degree(atom_idx) == *d as usize,
            AtomPrimitive::TotalHydrogens(h) => total_hydrogens(mol, atom_idx) == *h as usize,
            AtomPrimitive::ImplicitHydrogens(Some(h)) => atom.hydrogens == *h,
            AtomPrimitive::ImplicitHydrogens(None) => atom.hydrogens > 0,
            AtomPrimitive::Connectivity(x) => {
                mol.degree(atom_idx) + atom.hydrogens as usize == *x as usize
            }
            AtomPrimitive::RingConnectivity(Some(x)) => mol.ring_bond_count(atom_idx) == *x as usize,
            AtomPrimitive::RingConnectivity(None) => mol.ring_bond_count(atom_idx) > 0,
            AtomPrimitive::Valence(v) => mol.total_valence(atom_idx) == *v,
            AtomPrimitive::RingMembership(None) => mol.in_ring(atom_idx),
            AtomPrimitive::RingMembership(Some(0)) => !mol.in_ring(atom_idx),
            AtomPrimitive::RingMembership(Some(n)) => mol.ring_membership(atom_idx) == *n,
            AtomPrimitive::RingSize(None) => mol.in_ring(atom_idx),
            AtomPrimitive::RingSize(Some(0)) => !mol.in_ring(atom_idx),
            AtomPrimitive::RingSize(Some(n)) => mol
                .rings
                .iter()
                .any(|ring| ring.size() == *n as usize && ring.contains_atom(atom_idx)),
            AtomPrimitive::Charge(c) => atom.formal_charge == *c,
            AtomPrimitive::Isotope(i) => atom.isotope == Some(*i),
            AtomPrimitive::Recursive(inner) => matches_rooted(mol, inner, atom_idx),
        }
    }

    fn bond_matches(&self, expr: &BondExpr, bond_idx: usize) -> bool {
        let bond = &self.mol.bonds[bond_idx];
        match expr {
            BondExpr::Implicit => matches!(bond.order, BondOrder::Single | BondOrder::Aromatic),
            BondExpr::Primitive(prim) => match prim {
                BondPrimitive::Single => bond.order == BondOrder::Single,
                BondPrimitive::Double => bond.order == BondOrder::Double,
                BondPrimitive::Triple => bond.order == BondOrder::Triple,
                BondPrimitive::Aromatic => bond.order == BondOrder::Aromatic,
                BondPrimitive::Any => true,
                BondPrimitive::Ring => bond.in_ring,
            },
            BondExpr::Not(inner) => !self.bond_matches(inner, bond_idx),
            BondExpr::And(terms) => terms.iter().all(|t| self.bond_matches(t, bond_idx)),
            BondExpr::Or(terms) => terms.iter().any(|t| self.bond_matches(t, bond_idx)),
        }
    }
}

fn total_hydrogens(mol: &Molecule, atom_idx: usize) -> usize {
    let explicit = mol.adjacency[atom_idx]
        .iter()
        .filter(|(neighbour, _)| !mol.atoms[*neighbour].is_heavy())
        .count();
    mol.atoms[atom_idx].hydrogens as usize + explicit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolkit::native::smarts::parse_smarts;
    use crate::toolkit::native::smiles::parse_smiles;

    fn matches(smiles: &str, smarts: &str) -> bool {
        has_match(&parse_smiles(smiles).unwrap(), &parse_smarts(smarts).unwrap())
    }

    fn count(smiles: &str, smarts: &str) -> usize {
        count_unique_matches(
            &parse_smiles(smiles).unwrap(),
            &parse_smarts(smarts).unwrap(),
            usize::MAX,
        )
    }

    #[test]
    fn hydroxyl_and_aromatic_ring() {
        assert!(matches("CCO", "[OX2H]"));
        assert!(!matches("CCO", "c1ccccc1"));
        assert!(matches("Oc1ccccc1", "c1ccccc1"));
        assert!(matches("C1=CC=CC=C1", "c1ccccc1"));
    }

    #[test]
    fn implicit_bond_is_single_or_aromatic() {
        assert!(matches("CC", "CC"));
        assert!(!matches("C=C", "CC"));
        assert!(matches("C=C", "C=C"));
        assert!(matches("c1ccccc1", "cc"));
        assert!(matches("C=C", "C~C"));
    }

    #[test]
    fn ring_primitives() {
        assert!(matches("C1CCCCC1", "[R]"));
        assert!(!matches("CCCCCC", "[R]"));
        assert!(matches("C1CC1", "[r3]"));
        assert!(!matches("C1CCC1", "[r3]"));
        assert!(matches("CC1CC1", "*!@*"));
        assert!(!matches("C1CC1", "*!@*"));
        assert!(matches("C1CC1", "*@*"));
    }

    #[test]
    fn counts_and_hydrogens() {
        assert_eq!(count("CCO", "[CH3]"), 1);
        assert_eq!(count("CC(C)C", "[CH3]"), 3);
        assert_eq!(count("OCCO", "[OH]"), 2);
        // symmetric pattern counted once per atom set
        assert_eq!(count("CC", "CC"), 1);
        assert_eq!(count("c1ccccc1", "c1ccccc1"), 1);
    }

    #[test]
    fn recursive_smarts() {
        assert!(matches("CC(=O)O", "[$(C=O)]O"));
        assert!(!matches("CCO", "[$(C=O)]O"));
        assert!(matches("CC(=O)N", "[#6][$([NX3H2])]"));
    }

    #[test]
    fn charges_and_negation() {
        assert!(matches("C[N+](C)(C)C", "[N+]"));
        assert!(!matches("CN", "[N+]"));
        assert!(matches("CCl", "[!#6;!#1]"));
        assert!(!matches("CC", "[!#6;!#1]"));
    }

    #[test]
    fn disconnected_pattern_components() {
        assert!(matches("CCO.N", "O.N"));
        assert!(!matches("CCO", "O.N"));
    }

    #[test]
    fn limit_stops_early() {
        let mol = parse_smiles("CCCCCCCC").unwrap();
        let pattern = parse_smarts("[CH2]").unwrap();
        assert_eq!(count_unique_matches(&mol, &pattern, 2), 2);
        assert_eq!(count_unique_matches(&mol, &pattern, 0), 0);
    }
}
