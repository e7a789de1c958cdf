//! Molecular graph with the ring information the matchers need.

use crate::toolkit::native::rings::{self, Ring};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    /// Contribution to an atom's valence; aromatic bonds count as single
    /// sigma bonds and the pi electron is added per atom.
    pub fn valence(self) -> u8 {
        match self {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    pub atomic_number: u8,
    pub formal_charge: i8,
    pub isotope: Option<u16>,
    pub aromatic: bool,
    /// Total attached hydrogens, implicit and folded explicit ones.
    pub hydrogens: u8,
}

impl Atom {
    pub fn new(atomic_number: u8) -> Self {
        Atom {
            atomic_number,
            formal_charge: 0,
            isotope: None,
            aromatic: false,
            hydrogens: 0,
        }
    }

    pub fn is_heavy(&self) -> bool {
        self.atomic_number != crate::toolkit::native::element::HYDROGEN
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bond {
    pub begin: usize,
    pub end: usize,
    pub order: BondOrder,
    pub in_ring: bool,
}

impl Bond {
    pub fn new(begin: usize, end: usize, order: BondOrder) -> Self {
        Bond {
            begin,
            end,
            order,
            in_ring: false,
        }
    }

    pub fn other(&self, atom_idx: usize) -> usize {
        if self.begin == atom_idx {
            self.end
        } else {
            self.begin
        }
    }

    pub fn is_aromatic(&self) -> bool {
        self.order == BondOrder::Aromatic
    }
}

#[derive(Debug, Clone)]
pub struct Molecule {
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
    /// adjacency[atom] = (neighbour, bond index) pairs
    pub adjacency: Vec<Vec<(usize, usize)>>,
    /// Smallest set of smallest rings.
    pub rings: Vec<Ring>,
    ring_count: Vec<u8>,
    smallest_ring: Vec<Option<usize>>,
    fragments: usize,
}

impl Molecule {
    pub fn new(atoms: Vec<Atom>, mut bonds: Vec<Bond>) -> Self {
        let mut adjacency = vec![Vec::new(); atoms.len()];
        for (bond_idx, bond) in bonds.iter().enumerate() {
            adjacency[bond.begin].push((bond.end, bond_idx));
            adjacency[bond.end].push((bond.begin, bond_idx));
        }

        let ring_bonds = rings::ring_bonds(atoms.len(), &bonds, &adjacency);
        for (bond, in_ring) in bonds.iter_mut().zip(ring_bonds.iter()) {
            bond.in_ring = *in_ring;
        }
        let fragments = rings::count_components(atoms.len(), &adjacency);
        let rings = rings::sssr(atoms.len(), &bonds, &adjacency, fragments);

        let mut ring_count = vec![0u8; atoms.len()];
        let mut smallest_ring: Vec<Option<usize>> = vec![None; atoms.len()];
        for ring in &rings {
            for &atom_idx in &ring.atoms {
                ring_count[atom_idx] = ring_count[atom_idx].saturating_add(1);
                let size = ring.atoms.len();
                smallest_ring[atom_idx] = Some(match smallest_ring[atom_idx] {
                    Some(current) => current.min(size),
                    None => size,
                });
            }
        }

        Molecule {
            atoms,
            bonds,
            adjacency,
            rings,
            ring_count,
            smallest_ring,
            fragments,
        }
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn degree(&self, atom_idx: usize) -> usize {
        self.adjacency[atom_idx].len()
    }

    pub fn heavy_degree(&self, atom_idx: usize) -> usize {
        self.adjacency[atom_idx]
            .iter()
            .filter(|(neighbour, _)| self.atoms[*neighbour].is_heavy())
            .count()
    }

    pub fn bond_between(&self, a: usize, b: usize) -> Option<usize> {
        self.adjacency[a]
            .iter()
            .find(|(neighbour, _)| *neighbour == b)
            .map(|(_, bond_idx)| *bond_idx)
    }

    pub fn in_ring(&self, atom_idx: usize) -> bool {
        self.adjacency[atom_idx]
            .iter()
            .any(|(_, bond_idx)| self.bonds[*bond_idx].in_ring)
    }

    pub fn ring_bond_count(&self, atom_idx: usize) -> usize {
        self.adjacency[atom_idx]
            .iter()
            .filter(|(_, bond_idx)| self.bonds[*bond_idx].in_ring)
            .count()
    }

    /// Number of SSSR rings the atom belongs to.
    pub fn ring_membership(&self, atom_idx: usize) -> u8 {
        self.ring_count[atom_idx]
    }

    pub fn smallest_ring_size(&self, atom_idx: usize) -> Option<usize> {
        self.smallest_ring[atom_idx]
    }

    pub fn fragment_count(&self) -> usize {
        self.fragments
    }

    /// Total valence in the Kekulé sense: bond orders plus hydrogens, with one
    /// extra unit for aromatic atoms that take part in a ring double bond.
    pub fn total_valence(&self, atom_idx: usize) -> u8 {
        let atom = &self.atoms[atom_idx];
        let mut valence = atom.hydrogens;
        let mut aromatic_bonds = 0u8;
        for (_, bond_idx) in &self.adjacency[atom_idx] {
            let order = self.bonds[*bond_idx].order;
            if order == BondOrder::Aromatic {
                aromatic_bonds += 1;
            }
            valence = valence.saturating_add(order.valence());
        }
        if atom.aromatic && aromatic_bonds >= 2 && self.has_aromatic_double_bond(atom_idx) {
            valence = valence.saturating_add(1);
        }
        valence
    }

    fn has_aromatic_double_bond(&self, atom_idx: usize) -> bool {
        let atom = &self.atoms[atom_idx];
        let exocyclic_double = self.adjacency[atom_idx]
            .iter()
            .any(|(_, bond_idx)| self.bonds[*bond_idx].order == BondOrder::Double);
        if exocyclic_double {
            return false;
        }
        match atom.atomic_number {
            5 => atom.formal_charge < 0,
            6 => atom.formal_charge == 0,
            7 | 15 | 33 => {
                atom.formal_charge > 0 || (atom.hydrogens == 0 && self.degree(atom_idx) == 2)
            }
            _ => atom.formal_charge > 0,
        }
    }

    /// Total hydrogen count of the molecule.
    pub fn hydrogen_count(&self) -> usize {
        self.atoms
            .iter()
            .map(|atom| atom.hydrogens as usize + usize::from(atom.atomic_number == 1))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ethane() -> Molecule {
        let mut carbon = Atom::new(6);
        carbon.hydrogens = 3;
        Molecule::new(
            vec![carbon.clone(), carbon],
            vec![Bond::new(0, 1, BondOrder::Single)],
        )
    }

    #[test]
    fn adjacency_is_symmetric() {
        let mol = ethane();
        assert_eq!(mol.degree(0), 1);
        assert_eq!(mol.bond_between(1, 0), Some(0));
        assert_eq!(mol.fragment_count(), 1);
        assert!(!mol.in_ring(0));
    }

    #[test]
    fn valence_counts_hydrogens() {
        let mol = ethane();
        assert_eq!(mol.total_valence(0), 4);
        assert_eq!(mol.hydrogen_count(), 6);
    }
}
