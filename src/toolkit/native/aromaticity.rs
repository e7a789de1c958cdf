//! Hückel aromaticity for rings written in Kekulé form.
//!
//! Single SSSR rings are tested first, then pairs of rings fused through a
//! shared bond. Contributions are counted on the Kekulé bond orders, so all
//! decisions are taken before any bond is rewritten.

use std::collections::HashSet;

use crate::toolkit::native::molecule::{BondOrder, Molecule};

pub fn perceive(mol: &mut Molecule) {
    let n_rings = mol.rings.len();
    if n_rings == 0 {
        return;
    }

    let mut aromatic: Vec<bool> = mol
        .rings
        .iter()
        .map(|ring| ring.bonds.iter().all(|b| mol.bonds[*b].is_aromatic()))
        .collect();

    let mut perceived = vec![false; n_rings];
    for idx in 0..n_rings {
        if !aromatic[idx] && is_aromatic_system(mol, &[idx]) {
            perceived[idx] = true;
        }
    }

    for i in 0..n_rings {
        for j in (i + 1)..n_rings {
            let done = (aromatic[i] || perceived[i]) && (aromatic[j] || perceived[j]);
            if done || !mol.rings[i].shares_bond(&mol.rings[j]) {
                continue;
            }
            if is_aromatic_system(mol, &[i, j]) {
                perceived[i] = true;
                perceived[j] = true;
            }
        }
    }

    for idx in 0..n_rings {
        if !perceived[idx] {
            continue;
        }
        aromatic[idx] = true;
        let ring = mol.rings[idx].clone();
        for atom_idx in ring.atoms {
            mol.atoms[atom_idx].aromatic = true;
        }
        for bond_idx in ring.bonds {
            mol.bonds[bond_idx].order = BondOrder::Aromatic;
        }
    }
}

fn is_aromatic_system(mol: &Molecule, ring_ids: &[usize]) -> bool {
    let system_bonds: HashSet<usize> = ring_ids
        .iter()
        .flat_map(|id| mol.rings[*id].bonds.iter().copied())
        .collect();
    let system_atoms: HashSet<usize> = ring_ids
        .iter()
        .flat_map(|id| mol.rings[*id].atoms.iter().copied())
        .collect();

    let mut electrons = 0u32;
    for atom_idx in system_atoms {
        match pi_electrons(mol, atom_idx, &system_bonds) {
            Some(count) => electrons += count as u32,
            None => return false,
        }
    }
    electrons % 4 == 2
}

fn is_electronegative(atomic_number: u8) -> bool {
    matches!(atomic_number, 7 | 8 | 16 | 34)
}

fn pi_electrons(mol: &Molecule, atom_idx: usize, system_bonds: &HashSet<usize>) -> Option<u8> {
    let atom = &mol.atoms[atom_idx];
    let mut system_double = false;
    let mut exo_electronegative = false;
    let mut exo_other = false;

    for &(neighbour, bond_idx) in &mol.adjacency[atom_idx] {
        match mol.bonds[bond_idx].order {
            BondOrder::Triple => return None,
            BondOrder::Double if system_bonds.contains(&bond_idx) => system_double = true,
            BondOrder::Double if is_electronegative(mol.atoms[neighbour].atomic_number) => {
                exo_electronegative = true
            }
            BondOrder::Double => exo_other = true,
            _ => {}
        }
    }

    let connections = mol.degree(atom_idx) + atom.hydrogens as usize;
    let charge = atom.formal_charge;

    if atom.aromatic {
        return Some(match atom.atomic_number {
            6 if exo_electronegative => 0,
            6 if charge < 0 => 2,
            7 | 15 | 33 if charge == 0 && connections == 3 => 2,
            8 | 16 | 34 | 52 if charge == 0 => 2,
            5 => 0,
            _ => 1,
        });
    }

    if system_double {
        return Some(1);
    }
    if exo_electronegative {
        return Some(0);
    }
    if exo_other {
        return None;
    }

    match atom.atomic_number {
        6 if charge == -1 => Some(2),
        6 if charge == 1 => Some(0),
        7 | 15 | 33 if charge == 0 && connections == 3 => Some(2),
        7 | 15 | 33 if charge == -1 && connections == 2 => Some(2),
        8 | 16 | 34 | 52 if charge == 0 && connections == 2 => Some(2),
        5 if charge == 0 && connections == 3 => Some(0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::toolkit::native::smiles::parse_smiles;

    fn all_aromatic(smiles: &str) -> bool {
        let mol = parse_smiles(smiles).unwrap();
        mol.atoms
            .iter()
            .enumerate()
            .filter(|(idx, _)| mol.in_ring(*idx))
            .all(|(_, atom)| atom.aromatic)
    }

    #[test]
    fn kekule_heteroaromatics() {
        assert!(all_aromatic("C1=CC=NC=C1"));
        assert!(all_aromatic("C1=CNC=C1"));
        assert!(all_aromatic("C1=COC=C1"));
        assert!(all_aromatic("C1=CSC=C1"));
    }

    #[test]
    fn kekule_fused_systems() {
        assert!(all_aromatic("C1=CC=C2C=CC=CC2=C1"));
        assert!(all_aromatic("C1=CC=C2NC=CC2=C1"));
    }

    #[test]
    fn non_aromatic_rings() {
        assert!(!all_aromatic("C1=CCC=C1"));
        assert!(!all_aromatic("O=C1C=CC(=O)C=C1"));
        assert!(!all_aromatic("C1CCCCC1"));
    }
}
