//! Ring perception: ring bonds, connected components and the smallest set of
//! smallest rings (minimum cycle basis built from Horton candidates).

use std::collections::{HashSet, VecDeque};

use bitvec::prelude::*;

use crate::toolkit::native::molecule::Bond;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ring {
    /// Atoms in ring order.
    pub atoms: Vec<usize>,
    pub bonds: Vec<usize>,
}

impl Ring {
    pub fn size(&self) -> usize {
        self.atoms.len()
    }

    pub fn contains_atom(&self, atom_idx: usize) -> bool {
        self.atoms.contains(&atom_idx)
    }

    pub fn shares_bond(&self, other: &Ring) -> bool {
        self.bonds.iter().any(|b| other.bonds.contains(b))
    }
}

/// A bond is a ring bond when its atoms stay connected without it.
pub fn ring_bonds(n_atoms: usize, bonds: &[Bond], adjacency: &[Vec<(usize, usize)>]) -> Vec<bool> {
    let mut flags = vec![false; bonds.len()];
    let mut visited = vec![false; n_atoms];
    let mut queue = VecDeque::new();

    for (bond_idx, bond) in bonds.iter().enumerate() {
        visited.iter_mut().for_each(|v| *v = false);
        queue.clear();
        visited[bond.begin] = true;
        queue.push_back(bond.begin);

        while let Some(current) = queue.pop_front() {
            if current == bond.end {
                flags[bond_idx] = true;
                break;
            }
            for &(neighbour, via) in &adjacency[current] {
                if via != bond_idx && !visited[neighbour] {
                    visited[neighbour] = true;
                    queue.push_back(neighbour);
                }
            }
        }
    }

    flags
}

pub fn count_components(n_atoms: usize, adjacency: &[Vec<(usize, usize)>]) -> usize {
    let mut visited = vec![false; n_atoms];
    let mut components = 0;
    for start in 0..n_atoms {
        if visited[start] {
            continue;
        }
        components += 1;
        visited[start] = true;
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            for &(neighbour, _) in &adjacency[current] {
                if !visited[neighbour] {
                    visited[neighbour] = true;
                    stack.push(neighbour);
                }
            }
        }
    }
    components
}

pub fn sssr(
    n_atoms: usize,
    bonds: &[Bond],
    adjacency: &[Vec<(usize, usize)>],
    components: usize,
) -> Vec<Ring> {
    let nullity = (bonds.len() + components).saturating_sub(n_atoms);
    if nullity == 0 {
        return Vec::new();
    }

    let mut candidates = horton_candidates(n_atoms, bonds, adjacency);
    candidates.sort_by_key(|ring| ring.size());

    let mut basis: Vec<(usize, BitVec)> = Vec::with_capacity(nullity);
    let mut selected = Vec::with_capacity(nullity);

    for candidate in candidates {
        let mut vector: BitVec = BitVec::repeat(false, bonds.len());
        for &bond_idx in &candidate.bonds {
            vector.set(bond_idx, true);
        }
        for (pivot, row) in &basis {
            if vector[*pivot] {
                vector = vector ^ row.as_bitslice();
            }
        }
        if let Some(pivot) = vector.first_one() {
            basis.push((pivot, vector));
            selected.push(candidate);
            if selected.len() == nullity {
                break;
            }
        }
    }

    selected
}

fn horton_candidates(
    n_atoms: usize,
    bonds: &[Bond],
    adjacency: &[Vec<(usize, usize)>],
) -> Vec<Ring> {
    let mut candidates = Vec::new();
    let mut seen: HashSet<Vec<usize>> = HashSet::new();

    for root in 0..n_atoms {
        if !adjacency[root].iter().any(|(_, b)| bonds[*b].in_ring) {
            continue;
        }

        // BFS tree over ring bonds
        let mut parent: Vec<Option<(usize, usize)>> = vec![None; n_atoms];
        let mut reached = vec![false; n_atoms];
        reached[root] = true;
        let mut queue = VecDeque::from([root]);
        while let Some(current) = queue.pop_front() {
            for &(neighbour, bond_idx) in &adjacency[current] {
                if bonds[bond_idx].in_ring && !reached[neighbour] {
                    reached[neighbour] = true;
                    parent[neighbour] = Some((current, bond_idx));
                    queue.push_back(neighbour);
                }
            }
        }

        for (bond_idx, bond) in bonds.iter().enumerate() {
            if !bond.in_ring || !reached[bond.begin] || !reached[bond.end] {
                continue;
            }
            let tree_edge = |atom: usize| parent[atom].map(|(_, b)| b) == Some(bond_idx);
            if tree_edge(bond.begin) || tree_edge(bond.end) {
                continue;
            }

            let (path_x, bonds_x) = tree_path(&parent, bond.begin);
            let (path_y, bonds_y) = tree_path(&parent, bond.end);
            let shared = path_x.iter().filter(|a| path_y.contains(a)).count();
            if shared != 1 {
                continue;
            }

            let mut ring_bonds: Vec<usize> = bonds_x.iter().chain(bonds_y.iter()).copied().collect();
            ring_bonds.push(bond_idx);
            let mut key = ring_bonds.clone();
            key.sort_unstable();
            if !seen.insert(key) {
                continue;
            }

            let mut atoms = path_x;
            atoms.extend(path_y.into_iter().skip(1).rev());
            candidates.push(Ring {
                atoms,
                bonds: ring_bonds,
            });
        }
    }

    candidates
}

/// Path from the BFS root down to `atom`, as atoms and bonds.
fn tree_path(parent: &[Option<(usize, usize)>], atom: usize) -> (Vec<usize>, Vec<usize>) {
    let mut atoms = vec![atom];
    let mut bonds = Vec::new();
    let mut current = atom;
    while let Some((up, bond_idx)) = parent[current] {
        atoms.push(up);
        bonds.push(bond_idx);
        current = up;
    }
    atoms.reverse();
    bonds.reverse();
    (atoms, bonds)
}

#[cfg(test)]
mod tests {
    use crate::toolkit::native::smiles::parse_smiles;

    #[test]
    fn benzene_has_one_six_ring() {
        let mol = parse_smiles("c1ccccc1").unwrap();
        assert_eq!(mol.rings.len(), 1);
        assert_eq!(mol.rings[0].size(), 6);
        assert!(mol.bonds.iter().all(|b| b.in_ring));
    }

    #[test]
    fn naphthalene_has_two_six_rings() {
        let mol = parse_smiles("c1ccc2ccccc2c1").unwrap();
        let mut sizes: Vec<usize> = mol.rings.iter().map(|r| r.size()).collect();
        sizes.sort();
        assert_eq!(sizes, vec![6, 6]);
    }

    #[test]
    fn substituent_bonds_are_not_ring_bonds() {
        let mol = parse_smiles("CC1CC1").unwrap();
        assert!(!mol.bonds[0].in_ring);
        assert_eq!(mol.rings.len(), 1);
        assert_eq!(mol.rings[0].size(), 3);
    }

    #[test]
    fn norbornane_ring_sizes() {
        let mol = parse_smiles("C1CC2CCC1C2").unwrap();
        let mut sizes: Vec<usize> = mol.rings.iter().map(|r| r.size()).collect();
        sizes.sort();
        assert_eq!(sizes, vec![5, 5]);
    }

    #[test]
    fn acyclic_has_no_rings() {
        let mol = parse_smiles("CCO").unwrap();
        assert!(mol.rings.is_empty());
        assert_eq!(mol.fragment_count(), 1);
    }
}
