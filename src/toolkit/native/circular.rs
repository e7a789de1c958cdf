//! ECFP6 circular fingerprint in the CDK flavour.
//!
//! Atom identities are CRC-32 hashes of integer invariants, refined over three
//! iterations. Each refinement proposes one feature per heavy atom covering
//! the atom set grown by one bond shell; features covering an atom set that
//! is already present are kept only if they come from the same iteration and
//! carry a lower hash.

use std::collections::BTreeSet;

use crate::toolkit::native::molecule::{BondOrder, Molecule};

pub const ECFP6_ITERATIONS: usize = 3;

lazy_static::lazy_static! {
    static ref CRC_TABLE: [u32; 256] = {
        let mut table = [0u32; 256];
        for (n, slot) in table.iter_mut().enumerate() {
            let mut crc = n as u32;
            for _ in 0..8 {
                crc = if crc & 1 != 0 {
                    0xEDB8_8320 ^ (crc >> 1)
                } else {
                    crc >> 1
                };
            }
            *slot = crc;
        }
        table
    };
}

pub fn crc32(bytes: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    for byte in bytes {
        crc = CRC_TABLE[((crc ^ *byte as u32) & 0xFF) as usize] ^ (crc >> 8);
    }
    crc ^ 0xFFFF_FFFF
}

/// CRC-32 over one byte per value, as a signed hash. Only the low eight bits
/// of each value reach the checksum, so earlier identities feed the next
/// iteration truncated.
fn make_identity(values: &[i32]) -> i32 {
    let bytes: Vec<u8> = values.iter().map(|v| (*v & 0xFF) as u8).collect();
    crc32(&bytes) as i32
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircularFeature {
    pub hash: i32,
    pub iteration: usize,
    /// Sorted atom indices covered by the feature.
    pub atoms: Vec<usize>,
}

fn bond_type(order: BondOrder) -> i32 {
    match order {
        BondOrder::Single => 1,
        BondOrder::Double => 2,
        BondOrder::Triple => 3,
        BondOrder::Aromatic => 4,
    }
}

pub fn ecfp6_features(mol: &Molecule) -> Vec<CircularFeature> {
    circular_features(mol, ECFP6_ITERATIONS)
}

pub fn circular_features(mol: &Molecule, iterations: usize) -> Vec<CircularFeature> {
    let heavy: Vec<usize> = (0..mol.atom_count())
        .filter(|idx| mol.atoms[*idx].is_heavy())
        .collect();

    let mut identity = vec![0i32; mol.atom_count()];
    let mut atom_sets: Vec<Vec<usize>> = vec![Vec::new(); mol.atom_count()];
    let mut features = Vec::with_capacity(heavy.len() * (iterations + 1));

    for &atom_idx in &heavy {
        identity[atom_idx] = initial_identity(mol, atom_idx);
        atom_sets[atom_idx] = vec![atom_idx];
        features.push(CircularFeature {
            hash: identity[atom_idx],
            iteration: 0,
            atoms: vec![atom_idx],
        });
    }

    for iteration in 1..=iterations {
        let mut next_identity = identity.clone();
        let mut next_sets = atom_sets.clone();

        for &atom_idx in &heavy {
            let mut pairs: Vec<(i32, i32)> = mol.adjacency[atom_idx]
                .iter()
                .filter(|(neighbour, _)| mol.atoms[*neighbour].is_heavy())
                .map(|(neighbour, bond_idx)| {
                    (bond_type(mol.bonds[*bond_idx].order), identity[*neighbour])
                })
                .collect();
            pairs.sort_unstable();

            let mut values = Vec::with_capacity(2 + pairs.len() * 2);
            values.push(iteration as i32);
            values.push(identity[atom_idx]);
            for (bond, neighbour_identity) in &pairs {
                values.push(*bond);
                values.push(*neighbour_identity);
            }
            next_identity[atom_idx] = make_identity(&values);

            let mut grown: BTreeSet<usize> = atom_sets[atom_idx].iter().copied().collect();
            for (neighbour, _) in &mol.adjacency[atom_idx] {
                if mol.atoms[*neighbour].is_heavy() {
                    grown.extend(atom_sets[*neighbour].iter().copied());
                }
            }
            next_sets[atom_idx] = grown.into_iter().collect();

            consider_feature(
                &mut features,
                CircularFeature {
                    hash: next_identity[atom_idx],
                    iteration,
                    atoms: next_sets[atom_idx].clone(),
                },
            );
        }

        identity = next_identity;
        atom_sets = next_sets;
    }

    features
}

fn initial_identity(mol: &Molecule, atom_idx: usize) -> i32 {
    let atom = &mol.atoms[atom_idx];
    let heavy_neighbours = mol.heavy_degree(atom_idx) as i32;
    let hydrogens = (mol.degree(atom_idx) - mol.heavy_degree(atom_idx)) as i32 + atom.hydrogens as i32;
    let heavy_valence = mol.total_valence(atom_idx) as i32 - hydrogens;
    make_identity(&[
        heavy_neighbours,
        heavy_valence,
        atom.atomic_number as i32,
        atom.formal_charge as i32,
        hydrogens,
        i32::from(mol.in_ring(atom_idx)),
    ])
}

fn consider_feature(features: &mut Vec<CircularFeature>, candidate: CircularFeature) {
    match features.iter().position(|f| f.atoms == candidate.atoms) {
        None => features.push(candidate),
        Some(hit) => {
            let existing = &features[hit];
            if existing.iteration < candidate.iteration || existing.hash < candidate.hash {
                return;
            }
            features[hit] = candidate;
        }
    }
}

/// Populated bins of the count fingerprint: the distinct feature hashes.
pub fn ecfp6_hashes(mol: &Molecule) -> BTreeSet<i32> {
    ecfp6_features(mol).into_iter().map(|f| f.hash).collect()
}
