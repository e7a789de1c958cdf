//! SMILES parser producing a hydrogen-suppressed, aromaticity-perceived graph.

use std::collections::BTreeMap;

use crate::toolkit::native::aromaticity;
use crate::toolkit::native::element;
use crate::toolkit::native::molecule::{Atom, Bond, BondOrder, Molecule};
use crate::toolkit::ToolkitError;

pub fn parse_smiles(smiles: &str) -> Result<Molecule, ToolkitError> {
    parse(smiles).map_err(|reason| ToolkitError::SmilesParse {
        smiles: smiles.to_string(),
        reason,
    })
}

fn parse(smiles: &str) -> Result<Molecule, String> {
    let smiles = smiles.trim();
    if smiles.is_empty() {
        return Err("empty SMILES".into());
    }

    let mut parser = SmilesParser::new(smiles);
    parser.parse()?;
    parser.finish()?;
    parser.assign_hydrogens()?;

    let (atoms, bonds) = fold_explicit_hydrogens(parser.atoms, parser.bonds);
    let mut mol = Molecule::new(atoms, bonds);
    aromaticity::perceive(&mut mol);
    Ok(mol)
}

struct ParsedAtom {
    atom: Atom,
    bracket: bool,
}

struct SmilesParser<'a> {
    input: &'a [u8],
    pos: usize,
    atoms: Vec<ParsedAtom>,
    bonds: Vec<Bond>,
    ring_closures: BTreeMap<u16, (usize, Option<BondOrder>)>,
    stack: Vec<usize>,
    prev_atom: Option<usize>,
    pending_bond: Option<BondOrder>,
}

impl<'a> SmilesParser<'a> {
    fn new(input: &'a str) -> Self {
        SmilesParser {
            input: input.as_bytes(),
            pos: 0,
            atoms: Vec::new(),
            bonds: Vec::new(),
            ring_closures: BTreeMap::new(),
            stack: Vec::new(),
            prev_atom: None,
            pending_bond: None,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.peek();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn set_pending(&mut self, order: BondOrder) -> Result<(), String> {
        if self.pending_bond.is_some() {
            return Err(format!("two consecutive bond symbols at position {}", self.pos));
        }
        self.pending_bond = Some(order);
        self.advance();
        Ok(())
    }

    fn parse(&mut self) -> Result<(), String> {
        while let Some(ch) = self.peek() {
            match ch {
                b'(' => {
                    let prev = self
                        .prev_atom
                        .ok_or_else(|| format!("branch without preceding atom at position {}", self.pos))?;
                    self.stack.push(prev);
                    self.advance();
                }
                b')' => {
                    if self.pending_bond.is_some() {
                        return Err(format!("dangling bond before ')' at position {}", self.pos));
                    }
                    self.prev_atom = Some(
                        self.stack
                            .pop()
                            .ok_or_else(|| format!("unbalanced ')' at position {}", self.pos))?,
                    );
                    self.advance();
                }
                b'-' | b'/' | b'\\' => self.set_pending(BondOrder::Single)?,
                b'=' => self.set_pending(BondOrder::Double)?,
                b'#' => self.set_pending(BondOrder::Triple)?,
                b':' => self.set_pending(BondOrder::Aromatic)?,
                b'.' => {
                    if self.pending_bond.is_some() {
                        return Err(format!("dangling bond before '.' at position {}", self.pos));
                    }
                    self.prev_atom = None;
                    self.advance();
                }
                b'%' => {
                    self.advance();
                    let ring_num = self.parse_two_digit_ring()?;
                    self.handle_ring_closure(ring_num)?;
                }
                b'[' => self.parse_bracket_atom()?,
                b'*' => {
                    self.advance();
                    self.push_atom(Atom::new(0), false)?;
                }
                ch if ch.is_ascii_digit() => {
                    self.advance();
                    self.handle_ring_closure((ch - b'0') as u16)?;
                }
                ch if is_organic_atom_start(ch) => self.parse_organic_atom()?,
                ch => {
                    return Err(format!(
                        "unexpected character '{}' at position {}",
                        ch as char, self.pos
                    ))
                }
            }
        }
        Ok(())
    }

    fn finish(&self) -> Result<(), String> {
        if self.atoms.is_empty() {
            return Err("no atoms".into());
        }
        if self.pending_bond.is_some() {
            return Err("dangling bond at end of SMILES".into());
        }
        if !self.ring_closures.is_empty() {
            let open: Vec<_> = self.ring_closures.keys().collect();
            return Err(format!("unmatched ring closure(s): {:?}", open));
        }
        if !self.stack.is_empty() {
            return Err(format!("{} unmatched '('", self.stack.len()));
        }
        Ok(())
    }

    fn parse_organic_atom(&mut self) -> Result<(), String> {
        let ch = self.advance().ok_or("unexpected end of SMILES")?;
        let (atomic_number, aromatic) = match ch {
            b'B' if self.peek() == Some(b'r') => {
                self.advance();
                (35, false)
            }
            b'C' if self.peek() == Some(b'l') => {
                self.advance();
                (17, false)
            }
            b'B' => (5, false),
            b'C' => (6, false),
            b'N' => (7, false),
            b'O' => (8, false),
            b'P' => (15, false),
            b'S' => (16, false),
            b'F' => (9, false),
            b'I' => (53, false),
            b'b' => (5, true),
            b'c' => (6, true),
            b'n' => (7, true),
            b'o' => (8, true),
            b'p' => (15, true),
            b's' => (16, true),
            other => return Err(format!("unknown organic atom '{}'", other as char)),
        };

        let mut atom = Atom::new(atomic_number);
        atom.aromatic = aromatic;
        self.push_atom(atom, false)
    }

    fn parse_bracket_atom(&mut self) -> Result<(), String> {
        self.advance();
        let isotope = self.parse_optional_number();

        let first = self
            .advance()
            .ok_or("unexpected end of SMILES in bracket atom")?;
        let mut atom = if first == b'*' {
            Atom::new(0)
        } else if first.is_ascii_lowercase() {
            let two = self
                .peek()
                .filter(|c| c.is_ascii_lowercase())
                .map(|c| format!("{}{}", first as char, c as char));
            match two.as_deref().and_then(element::aromatic_atomic_number) {
                Some(number) => {
                    self.advance();
                    aromatic_atom(number)
                }
                None => {
                    let one = (first as char).to_string();
                    let number = element::aromatic_atomic_number(&one)
                        .ok_or_else(|| format!("unknown aromatic element '{}'", one))?;
                    aromatic_atom(number)
                }
            }
        } else if first.is_ascii_uppercase() {
            let two = self
                .peek()
                .filter(|c| c.is_ascii_lowercase())
                .map(|c| format!("{}{}", first as char, c as char));
            match two.as_deref().and_then(element::atomic_number) {
                Some(number) => {
                    self.advance();
                    Atom::new(number)
                }
                None => {
                    let one = (first as char).to_string();
                    Atom::new(
                        element::atomic_number(&one)
                            .ok_or_else(|| format!("unknown element '{}'", one))?,
                    )
                }
            }
        } else {
            return Err(format!("unexpected '{}' in bracket atom", first as char));
        };
        atom.isotope = isotope.map(|n| n as u16);

        self.skip_chirality();

        if self.peek() == Some(b'H') {
            self.advance();
            atom.hydrogens = match self.peek() {
                Some(d) if d.is_ascii_digit() => {
                    self.advance();
                    d - b'0'
                }
                _ => 1,
            };
        }

        atom.formal_charge = self.parse_charge()?;

        if self.peek() == Some(b':') {
            self.advance();
            if self.parse_optional_number().is_none() {
                return Err("expected atom class after ':'".into());
            }
        }

        if self.advance() != Some(b']') {
            return Err("expected ']' in bracket atom".into());
        }

        self.push_atom(atom, true)
    }

    fn skip_chirality(&mut self) {
        if self.peek() != Some(b'@') {
            return;
        }
        while self.peek() == Some(b'@') {
            self.advance();
        }
        let class = (self.peek(), self.peek_at(1));
        if matches!(
            class,
            (Some(b'T'), Some(b'H'))
                | (Some(b'A'), Some(b'L'))
                | (Some(b'S'), Some(b'P'))
                | (Some(b'T'), Some(b'B'))
                | (Some(b'O'), Some(b'H'))
        ) {
            self.advance();
            self.advance();
            self.parse_optional_number();
        }
    }

    fn parse_charge(&mut self) -> Result<i8, String> {
        let sign: i8 = match self.peek() {
            Some(b'+') => 1,
            Some(b'-') => -1,
            _ => return Ok(0),
        };
        let symbol = self.advance().ok_or("unexpected end of SMILES")?;
        if let Some(n) = self.parse_optional_number() {
            return i8::try_from(n)
                .map(|n| sign * n)
                .map_err(|_| format!("charge {} out of range", n));
        }
        let mut magnitude = 1i8;
        while self.peek() == Some(symbol) {
            self.advance();
            magnitude += 1;
        }
        Ok(sign * magnitude)
    }

    fn parse_optional_number(&mut self) -> Option<u32> {
        let mut n: u32 = 0;
        let mut found = false;
        while let Some(ch) = self.peek() {
            if !ch.is_ascii_digit() {
                break;
            }
            self.advance();
            n = n.saturating_mul(10).saturating_add((ch - b'0') as u32);
            found = true;
        }
        found.then_some(n)
    }

    fn parse_two_digit_ring(&mut self) -> Result<u16, String> {
        let d1 = self.advance().ok_or("expected digit after '%'")?;
        let d2 = self.advance().ok_or("expected second digit after '%'")?;
        if !d1.is_ascii_digit() || !d2.is_ascii_digit() {
            return Err("invalid ring closure number after '%'".into());
        }
        Ok((d1 - b'0') as u16 * 10 + (d2 - b'0') as u16)
    }

    fn handle_ring_closure(&mut self, ring_num: u16) -> Result<(), String> {
        let current = self
            .prev_atom
            .ok_or("ring closure without preceding atom")?;

        match self.ring_closures.remove(&ring_num) {
            Some((open_atom, open_bond)) => {
                if open_atom == current {
                    return Err(format!("ring closure {} bonds an atom to itself", ring_num));
                }
                if self.bond_exists(open_atom, current) {
                    return Err(format!("ring closure {} duplicates a bond", ring_num));
                }
                let explicit = self.pending_bond.take().or(open_bond);
                let order = self.resolve_order(open_atom, current, explicit);
                self.bonds.push(Bond::new(open_atom, current, order));
            }
            None => {
                let pending = self.pending_bond.take();
                self.ring_closures.insert(ring_num, (current, pending));
            }
        }
        Ok(())
    }

    fn bond_exists(&self, a: usize, b: usize) -> bool {
        self.bonds
            .iter()
            .any(|bond| (bond.begin == a && bond.end == b) || (bond.begin == b && bond.end == a))
    }

    fn resolve_order(&self, a: usize, b: usize, explicit: Option<BondOrder>) -> BondOrder {
        explicit.unwrap_or({
            if self.atoms[a].atom.aromatic && self.atoms[b].atom.aromatic {
                BondOrder::Aromatic
            } else {
                BondOrder::Single
            }
        })
    }

    fn push_atom(&mut self, atom: Atom, bracket: bool) -> Result<(), String> {
        let atom_idx = self.atoms.len();
        self.atoms.push(ParsedAtom { atom, bracket });
        match self.prev_atom {
            Some(prev) => {
                let explicit = self.pending_bond.take();
                let order = self.resolve_order(prev, atom_idx, explicit);
                self.bonds.push(Bond::new(prev, atom_idx, order));
            }
            None if self.pending_bond.is_some() => {
                return Err(format!("bond without preceding atom at position {}", self.pos));
            }
            None => {}
        }
        self.prev_atom = Some(atom_idx);
        Ok(())
    }

    fn bond_order_sum(&self, atom_idx: usize) -> (u8, u8) {
        let mut sum = 0u8;
        let mut double_bonds = 0u8;
        for bond in &self.bonds {
            if bond.begin == atom_idx || bond.end == atom_idx {
                sum = sum.saturating_add(bond.order.valence());
                if bond.order == BondOrder::Double {
                    double_bonds += 1;
                }
            }
        }
        (sum, double_bonds)
    }

    fn assign_hydrogens(&mut self) -> Result<(), String> {
        for atom_idx in 0..self.atoms.len() {
            let (used, double_bonds) = self.bond_order_sum(atom_idx);
            let parsed = &self.atoms[atom_idx];
            let atom = &parsed.atom;

            if parsed.bracket {
                let valences = element::charged_valences(atom.atomic_number, atom.formal_charge);
                if let Some(max) = valences.last() {
                    if !atom.aromatic && used + atom.hydrogens > *max {
                        return Err(format!(
                            "explicit valence {} too high for atom {}",
                            used + atom.hydrogens,
                            atom_idx
                        ));
                    }
                }
                continue;
            }

            let valences = element::default_valences(atom.atomic_number);
            let hydrogens = if atom.aromatic {
                // one valence unit goes to the pi system
                let pi = u8::from(double_bonds == 0);
                valences
                    .first()
                    .map(|lowest| lowest.saturating_sub(used + pi))
                    .unwrap_or(0)
            } else {
                match valences.iter().find(|v| **v >= used) {
                    Some(valence) => valence - used,
                    None if valences.is_empty() => 0,
                    None => {
                        return Err(format!(
                            "explicit valence {} too high for atom {}",
                            used, atom_idx
                        ))
                    }
                }
            };
            self.atoms[atom_idx].atom.hydrogens = hydrogens;
        }
        Ok(())
    }
}

fn aromatic_atom(atomic_number: u8) -> Atom {
    let mut atom = Atom::new(atomic_number);
    atom.aromatic = true;
    atom
}

fn is_organic_atom_start(ch: u8) -> bool {
    matches!(
        ch,
        b'B' | b'C' | b'N' | b'O' | b'P' | b'S' | b'F' | b'I' | b'b' | b'c' | b'n' | b'o' | b'p' | b's'
    )
}

/// Plain `[H]` atoms hanging off one heavy atom become hydrogen counts.
fn fold_explicit_hydrogens(parsed: Vec<ParsedAtom>, bonds: Vec<Bond>) -> (Vec<Atom>, Vec<Bond>) {
    let mut atoms: Vec<Atom> = parsed.into_iter().map(|p| p.atom).collect();
    let mut degree = vec![0usize; atoms.len()];
    for bond in &bonds {
        degree[bond.begin] += 1;
        degree[bond.end] += 1;
    }

    let mut removed = vec![false; atoms.len()];
    for bond in &bonds {
        for (h, heavy) in [(bond.begin, bond.end), (bond.end, bond.begin)] {
            let candidate = &atoms[h];
            let foldable = candidate.atomic_number == element::HYDROGEN
                && candidate.isotope.is_none()
                && candidate.formal_charge == 0
                && candidate.hydrogens == 0
                && degree[h] == 1
                && bond.order == BondOrder::Single
                && atoms[heavy].is_heavy();
            if foldable && !removed[h] {
                removed[h] = true;
                atoms[heavy].hydrogens = atoms[heavy].hydrogens.saturating_add(1);
            }
        }
    }

    if !removed.iter().any(|r| *r) {
        return (atoms, bonds);
    }

    let mut new_index = vec![usize::MAX; atoms.len()];
    let mut kept = Vec::with_capacity(atoms.len());
    for (idx, atom) in atoms.into_iter().enumerate() {
        if !removed[idx] {
            new_index[idx] = kept.len();
            kept.push(atom);
        }
    }
    let bonds = bonds
        .into_iter()
        .filter(|b| !removed[b.begin] && !removed[b.end])
        .map(|b| Bond::new(new_index[b.begin], new_index[b.end], b.order))
        .collect();
    (kept, bonds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ethanol() {
        let mol = parse_smiles("CCO").unwrap();
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.bond_count(), 2);
        let hydrogens: Vec<u8> = mol.atoms.iter().map(|a| a.hydrogens).collect();
        assert_eq!(hydrogens, vec![3, 2, 1]);
    }

    #[test]
    fn parse_aromatic_hydrogens() {
        let pyridine = parse_smiles("c1ccncc1").unwrap();
        let nitrogen = pyridine.atoms.iter().find(|a| a.atomic_number == 7).unwrap();
        assert_eq!(nitrogen.hydrogens, 0);
        assert!(pyridine
            .atoms
            .iter()
            .filter(|a| a.atomic_number == 6)
            .all(|a| a.hydrogens == 1));

        let pyrrole = parse_smiles("c1cc[nH]c1").unwrap();
        assert!(pyrrole.atoms.iter().all(|a| a.aromatic));
    }

    #[test]
    fn kekule_benzene_becomes_aromatic() {
        let mol = parse_smiles("C1=CC=CC=C1").unwrap();
        assert!(mol.atoms.iter().all(|a| a.aromatic && a.hydrogens == 1));
        assert!(mol.bonds.iter().all(|b| b.order == BondOrder::Aromatic));
    }

    #[test]
    fn cyclohexene_stays_aliphatic() {
        let mol = parse_smiles("C1=CCCCC1").unwrap();
        assert!(mol.atoms.iter().all(|a| !a.aromatic));
    }

    #[test]
    fn bracket_atoms() {
        let mol = parse_smiles("[NH4+]").unwrap();
        assert_eq!(mol.atoms[0].formal_charge, 1);
        assert_eq!(mol.atoms[0].hydrogens, 4);

        let mol = parse_smiles("[13CH3:1][C@@H](O)C(=O)[O-]").unwrap();
        assert_eq!(mol.atoms[0].isotope, Some(13));
        assert_eq!(mol.atoms[0].hydrogens, 3);
        assert_eq!(mol.atoms[1].hydrogens, 1);
        assert_eq!(mol.atoms[5].formal_charge, -1);
    }

    #[test]
    fn hypervalent_sulfur_and_nitro() {
        let sulfone = parse_smiles("CS(=O)(=O)C").unwrap();
        assert_eq!(sulfone.atoms[1].hydrogens, 0);
        let nitro = parse_smiles("C[N+](=O)[O-]").unwrap();
        assert_eq!(nitro.atoms[1].formal_charge, 1);
    }

    #[test]
    fn explicit_hydrogens_are_folded() {
        let mol = parse_smiles("[H]C([H])([H])[H]").unwrap();
        assert_eq!(mol.atom_count(), 1);
        assert_eq!(mol.atoms[0].hydrogens, 4);
    }

    #[test]
    fn disconnected_fragments() {
        let mol = parse_smiles("[Na+].[Cl-]").unwrap();
        assert_eq!(mol.atom_count(), 2);
        assert_eq!(mol.fragment_count(), 2);
    }

    #[test]
    fn two_digit_ring_closure() {
        let mol = parse_smiles("C%10CCCCC%10").unwrap();
        assert_eq!(mol.bond_count(), 6);
        assert_eq!(mol.rings.len(), 1);
    }

    #[test]
    fn invalid_smiles() {
        for smiles in ["not_a_smiles", "", "C(", "C1CC", "[", "C)", "CC=", "F(C)(C)(C)(C)C", "[Xx]"] {
            assert!(parse_smiles(smiles).is_err(), "{smiles} should not parse");
        }
    }
}
