//! SMARTS query parser.
//!
//! Operator precedence inside atom and bond expressions follows Daylight:
//! `!` binds tightest, then `&` (or plain juxtaposition), then `,`, then `;`.

use std::collections::BTreeMap;

use crate::toolkit::native::element;
use crate::toolkit::ToolkitError;

#[derive(Debug, Clone, PartialEq)]
pub enum AtomPrimitive {
    Any,
    Aromatic,
    Aliphatic,
    /// `C`/`c`/`#6`; `aromatic` is `None` when written as an atomic number.
    Element {
        atomic_number: u8,
        aromatic: Option<bool>,
    },
    Degree(u8),
    TotalHydrogens(u8),
    /// `h` without a count means "at least one".
    ImplicitHydrogens(Option<u8>),
    Connectivity(u8),
    RingConnectivity(Option<u8>),
    Valence(u8),
    /// `R` (any ring) or `R<n>` (member of exactly n SSSR rings).
    RingMembership(Option<u8>),
    /// `r` (any ring) or `r<n>` (smallest ring has size n).
    RingSize(Option<u8>),
    Charge(i8),
    Isotope(u16),
    Recursive(Box<SmartsPattern>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AtomExpr {
    Primitive(AtomPrimitive),
    Not(Box<AtomExpr>),
    And(Vec<AtomExpr>),
    Or(Vec<AtomExpr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondPrimitive {
    Single,
    Double,
    Triple,
    Aromatic,
    Any,
    Ring,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BondExpr {
    /// No bond symbol written: single or aromatic.
    Implicit,
    Primitive(BondPrimitive),
    Not(Box<BondExpr>),
    And(Vec<BondExpr>),
    Or(Vec<BondExpr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SmartsBond {
    pub begin: usize,
    pub end: usize,
    pub expr: BondExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SmartsPattern {
    pub atoms: Vec<AtomExpr>,
    pub bonds: Vec<SmartsBond>,
    pub adjacency: Vec<Vec<(usize, usize)>>,
    /// Atom visiting order for matching: atom 0 first, then depth-first so
    /// that every atom after a component root has an already placed neighbour.
    pub order: Vec<usize>,
}

impl SmartsPattern {
    fn new(atoms: Vec<AtomExpr>, bonds: Vec<SmartsBond>) -> Self {
        let mut adjacency = vec![Vec::new(); atoms.len()];
        for (bond_idx, bond) in bonds.iter().enumerate() {
            adjacency[bond.begin].push((bond.end, bond_idx));
            adjacency[bond.end].push((bond.begin, bond_idx));
        }

        let mut order = Vec::with_capacity(atoms.len());
        let mut placed = vec![false; atoms.len()];
        for root in 0..atoms.len() {
            if placed[root] {
                continue;
            }
            let mut stack = vec![root];
            while let Some(current) = stack.pop() {
                if placed[current] {
                    continue;
                }
                placed[current] = true;
                order.push(current);
                for &(neighbour, _) in adjacency[current].iter().rev() {
                    if !placed[neighbour] {
                        stack.push(neighbour);
                    }
                }
            }
        }

        SmartsPattern {
            atoms,
            bonds,
            adjacency,
            order,
        }
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }
}

pub fn parse_smarts(smarts: &str) -> Result<SmartsPattern, ToolkitError> {
    parse(smarts.trim()).map_err(|reason| ToolkitError::SmartsParse {
        smarts: smarts.to_string(),
        reason,
    })
}

fn parse(smarts: &str) -> Result<SmartsPattern, String> {
    if smarts.is_empty() {
        return Err("empty SMARTS".into());
    }
    let mut parser = SmartsParser::new(smarts);
    parser.parse()?;
    parser.finish()?;
    Ok(SmartsPattern::new(parser.atoms, parser.bonds))
}

struct SmartsParser<'a> {
    input: &'a [u8],
    pos: usize,
    atoms: Vec<AtomExpr>,
    bonds: Vec<SmartsBond>,
    stack: Vec<usize>,
    prev_atom: Option<usize>,
    pending_bond: Option<BondExpr>,
    ring_closures: BTreeMap<u16, (usize, Option<BondExpr>)>,
}

impl<'a> SmartsParser<'a> {
    fn new(input: &'a str) -> Self {
        SmartsParser {
            input: input.as_bytes(),
            pos: 0,
            atoms: Vec::new(),
            bonds: Vec::new(),
            stack: Vec::new(),
            prev_atom: None,
            pending_bond: None,
            ring_closures: BTreeMap::new(),
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

    fn parse(&mut self) -> Result<(), String> {
        while let Some(ch) = self.peek() {
            match ch {
                b'(' => {
                    let prev = self.prev_atom.ok_or_else(|| {
                        format!("branch without preceding atom at position {}", self.pos)
                    })?;
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
                b'.' => {
                    if self.pending_bond.is_some() {
                        return Err(format!("dangling bond before '.' at position {}", self.pos));
                    }
                    self.prev_atom = None;
                    self.advance();
                }
                b'-' | b'=' | b'#' | b':' | b'~' | b'@' | b'/' | b'\\' | b'!' => {
                    if self.pending_bond.is_some() {
                        return Err(format!("two bond expressions at position {}", self.pos));
                    }
                    let expr = self.parse_bond_low_and()?;
                    self.pending_bond = Some(expr);
                }
                b'%' => {
                    self.advance();
                    let d1 = self.advance().filter(u8::is_ascii_digit);
                    let d2 = self.advance().filter(u8::is_ascii_digit);
                    match (d1, d2) {
                        (Some(d1), Some(d2)) => {
                            self.handle_ring_closure((d1 - b'0') as u16 * 10 + (d2 - b'0') as u16)?
                        }
                        _ => return Err("invalid ring closure after '%'".into()),
                    }
                }
                ch if ch.is_ascii_digit() => {
                    self.advance();
                    self.handle_ring_closure((ch - b'0') as u16)?;
                }
                b'[' => {
                    self.advance();
                    let expr = self.parse_bracket_expr()?;
                    if self.advance() != Some(b']') {
                        return Err(format!("expected ']' at position {}", self.pos));
                    }
                    self.push_atom(expr)?;
                }
                _ => {
                    let expr = self.parse_unbracketed_atom()?;
                    self.push_atom(expr)?;
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
            return Err("dangling bond at end of SMARTS".into());
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

    fn push_atom(&mut self, expr: AtomExpr) -> Result<(), String> {
        let atom_idx = self.atoms.len();
        self.atoms.push(expr);
        match self.prev_atom {
            Some(prev) => {
                let expr = self.pending_bond.take().unwrap_or(BondExpr::Implicit);
                self.bonds.push(SmartsBond {
                    begin: prev,
                    end: atom_idx,
                    expr,
                });
            }
            None if self.pending_bond.is_some() => {
                return Err(format!("bond without preceding atom at position {}", self.pos));
            }
            None => {}
        }
        self.prev_atom = Some(atom_idx);
        Ok(())
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
                let expr = self
                    .pending_bond
                    .take()
                    .or(open_bond)
                    .unwrap_or(BondExpr::Implicit);
                self.bonds.push(SmartsBond {
                    begin: open_atom,
                    end: current,
                    expr,
                });
            }
            None => {
                let pending = self.pending_bond.take();
                self.ring_closures.insert(ring_num, (current, pending));
            }
        }
        Ok(())
    }

    fn parse_unbracketed_atom(&mut self) -> Result<AtomExpr, String> {
        let ch = self.advance().ok_or("unexpected end of SMARTS")?;
        let element = |atomic_number: u8, aromatic: bool| {
            AtomExpr::Primitive(AtomPrimitive::Element {
                atomic_number,
                aromatic: Some(aromatic),
            })
        };
        let expr = match ch {
            b'*' => AtomExpr::Primitive(AtomPrimitive::Any),
            b'a' => AtomExpr::Primitive(AtomPrimitive::Aromatic),
            b'A' => AtomExpr::Primitive(AtomPrimitive::Aliphatic),
            b'B' if self.peek() == Some(b'r') => {
                self.advance();
                element(35, false)
            }
            b'C' if self.peek() == Some(b'l') => {
                self.advance();
                element(17, false)
            }
            b'B' => element(5, false),
            b'C' => element(6, false),
            b'N' => element(7, false),
            b'O' => element(8, false),
            b'P' => element(15, false),
            b'S' => element(16, false),
            b'F' => element(9, false),
            b'I' => element(53, false),
            b'b' => element(5, true),
            b'c' => element(6, true),
            b'n' => element(7, true),
            b'o' => element(8, true),
            b'p' => element(15, true),
            b's' => element(16, true),
            other => {
                return Err(format!(
                    "unexpected character '{}' at position {}",
                    other as char,
                    self.pos - 1
                ))
            }
        };
        Ok(expr)
    }

    // ---- atom expressions ----

    fn parse_bracket_expr(&mut self) -> Result<AtomExpr, String> {
        self.parse_atom_low_and()
    }

    fn parse_atom_low_and(&mut self) -> Result<AtomExpr, String> {
        let mut terms = vec![self.parse_atom_or()?];
        while self.peek() == Some(b';') {
            self.advance();
            terms.push(self.parse_atom_or()?);
        }
        Ok(collapse(terms, AtomExpr::And))
    }

    fn parse_atom_or(&mut self) -> Result<AtomExpr, String> {
        let mut terms = vec![self.parse_atom_high_and()?];
        while self.peek() == Some(b',') {
            self.advance();
            terms.push(self.parse_atom_high_and()?);
        }
        Ok(collapse(terms, AtomExpr::Or))
    }

    fn parse_atom_high_and(&mut self) -> Result<AtomExpr, String> {
        let mut terms = vec![self.parse_atom_not()?];
        loop {
            match self.peek() {
                Some(b'&') => {
                    self.advance();
                    terms.push(self.parse_atom_not()?);
                }
                Some(b']') | Some(b',') | Some(b';') | None => break,
                Some(_) => terms.push(self.parse_atom_not()?),
            }
        }
        Ok(collapse(terms, AtomExpr::And))
    }

    fn parse_atom_not(&mut self) -> Result<AtomExpr, String> {
        if self.peek() == Some(b'!') {
            self.advance();
            let inner = self.parse_atom_not()?;
            return Ok(AtomExpr::Not(Box::new(inner)));
        }
        self.parse_atom_primitive()
    }

    fn parse_atom_primitive(&mut self) -> Result<AtomExpr, String> {
        let ch = self.peek().ok_or("unexpected end of SMARTS in bracket atom")?;
        let prim = match ch {
            b'*' => {
                self.advance();
                AtomPrimitive::Any
            }
            b'#' => {
                self.advance();
                let n = self
                    .parse_number()
                    .ok_or_else(|| format!("expected atomic number at position {}", self.pos))?;
                AtomPrimitive::Element {
                    atomic_number: u8::try_from(n).map_err(|_| format!("atomic number {} out of range", n))?,
                    aromatic: None,
                }
            }
            b'+' | b'-' => AtomPrimitive::Charge(self.parse_charge()?),
            b'$' => {
                self.advance();
                AtomPrimitive::Recursive(Box::new(self.parse_recursive()?))
            }
            b'@' => {
                // chirality is not part of the match
                while matches!(self.peek(), Some(b'@') | Some(b'?')) {
                    self.advance();
                }
                AtomPrimitive::Any
            }
            b':' => {
                self.advance();
                self.parse_number()
                    .ok_or_else(|| format!("expected atom map number at position {}", self.pos))?;
                AtomPrimitive::Any
            }
            ch if ch.is_ascii_digit() => {
                let n = self.parse_number().unwrap_or(0);
                AtomPrimitive::Isotope(u16::try_from(n).map_err(|_| format!("isotope {} out of range", n))?)
            }
            ch if ch.is_ascii_alphabetic() => self.parse_letter_primitive()?,
            other => {
                return Err(format!(
                    "unexpected '{}' in SMARTS atom expression at position {}",
                    other as char, self.pos
                ))
            }
        };
        Ok(AtomExpr::Primitive(prim))
    }

    /// Element symbols take precedence over one-letter primitives when the
    /// two letters form a known element.
    fn parse_letter_primitive(&mut self) -> Result<AtomPrimitive, String> {
        let ch = self.advance().ok_or("unexpected end of SMARTS")?;
        let next = self.peek();

        if ch.is_ascii_uppercase() {
            if let Some(second) = next.filter(u8::is_ascii_lowercase) {
                let two = format!("{}{}", ch as char, second as char);
                if let Some(number) = element::atomic_number(&two).filter(|n| *n <= 103) {
                    self.advance();
                    return Ok(AtomPrimitive::Element {
                        atomic_number: number,
                        aromatic: Some(false),
                    });
                }
            }
        } else if let Some(second) = next.filter(u8::is_ascii_lowercase) {
            let two = format!("{}{}", ch as char, second as char);
            if let Some(number) = element::aromatic_atomic_number(&two) {
                self.advance();
                return Ok(AtomPrimitive::Element {
                    atomic_number: number,
                    aromatic: Some(true),
                });
            }
        }

        let prim = match ch {
            b'a' => AtomPrimitive::Aromatic,
            b'A' => AtomPrimitive::Aliphatic,
            b'D' => AtomPrimitive::Degree(self.parse_small_number().unwrap_or(1)),
            b'H' if self.hydrogen_is_element() => AtomPrimitive::Element {
                atomic_number: element::HYDROGEN,
                aromatic: Some(false),
            },
            b'H' => AtomPrimitive::TotalHydrogens(self.parse_small_number().unwrap_or(1)),
            b'h' => AtomPrimitive::ImplicitHydrogens(self.parse_small_number()),
            b'R' => AtomPrimitive::RingMembership(self.parse_small_number()),
            b'r' => AtomPrimitive::RingSize(self.parse_small_number()),
            b'X' => AtomPrimitive::Connectivity(self.parse_small_number().unwrap_or(1)),
            b'x' => AtomPrimitive::RingConnectivity(self.parse_small_number()),
            b'v' => AtomPrimitive::Valence(self.parse_small_number().unwrap_or(1)),
            upper if upper.is_ascii_uppercase() => {
                let symbol = (upper as char).to_string();
                AtomPrimitive::Element {
                    atomic_number: element::atomic_number(&symbol)
                        .ok_or_else(|| format!("unknown element '{}'", symbol))?,
                    aromatic: Some(false),
                }
            }
            lower => {
                let symbol = (lower as char).to_string();
                AtomPrimitive::Element {
                    atomic_number: element::aromatic_atomic_number(&symbol)
                        .ok_or_else(|| format!("unknown aromatic element '{}'", symbol))?,
                    aromatic: Some(true),
                }
            }
        };
        Ok(prim)
    }

    /// `[H]`, `[2H]`, `[H+]`: a leading H with nothing but a charge after it.
    fn hydrogen_is_element(&self) -> bool {
        let start = self.input[..self.pos - 1]
            .iter()
            .rposition(|c| *c == b'[')
            .map(|p| p + 1)
            .unwrap_or(0);
        let leading = &self.input[start..self.pos - 1];
        let only_isotope = leading.iter().all(u8::is_ascii_digit);
        only_isotope && matches!(self.peek(), Some(b']') | Some(b'+') | Some(b'-'))
    }

    fn parse_recursive(&mut self) -> Result<SmartsPattern, String> {
        if self.advance() != Some(b'(') {
            return Err(format!("expected '(' after '$' at position {}", self.pos));
        }
        let start = self.pos;
        let mut depth = 1usize;
        while depth > 0 {
            match self.advance() {
                Some(b'(') => depth += 1,
                Some(b')') => depth -= 1,
                Some(_) => {}
                None => return Err("unterminated recursive SMARTS".into()),
            }
        }
        let inner = std::str::from_utf8(&self.input[start..self.pos - 1])
            .map_err(|e| e.to_string())?;
        parse(inner)
    }

    fn parse_charge(&mut self) -> Result<i8, String> {
        let symbol = self.advance().ok_or("unexpected end of SMARTS")?;
        let sign: i8 = if symbol == b'+' { 1 } else { -1 };
        if let Some(n) = self.parse_number() {
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

    fn parse_number(&mut self) -> Option<u32> {
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

    fn parse_small_number(&mut self) -> Option<u8> {
        self.parse_number().map(|n| n.min(u8::MAX as u32) as u8)
    }

    // ---- bond expressions ----

    fn parse_bond_low_and(&mut self) -> Result<BondExpr, String> {
        let mut terms = vec![self.parse_bond_or()?];
        while self.peek() == Some(b';') {
            self.advance();
            terms.push(self.parse_bond_or()?);
        }
        Ok(collapse(terms, BondExpr::And))
    }

    fn parse_bond_or(&mut self) -> Result<BondExpr, String> {
        let mut terms = vec![self.parse_bond_high_and()?];
        while self.peek() == Some(b',') {
            self.advance();
            terms.push(self.parse_bond_high_and()?);
        }
        Ok(collapse(terms, BondExpr::Or))
    }

    fn parse_bond_high_and(&mut self) -> Result<BondExpr, String> {
        let mut terms = vec![self.parse_bond_not()?];
        loop {
            match self.peek() {
                Some(b'&') => {
                    self.advance();
                    terms.push(self.parse_bond_not()?);
                }
                Some(c) if is_bond_symbol(c) || c == b'!' => terms.push(self.parse_bond_not()?),
                _ => break,
            }
        }
        Ok(collapse(terms, BondExpr::And))
    }

    fn parse_bond_not(&mut self) -> Result<BondExpr, String> {
        if self.peek() == Some(b'!') {
            self.advance();
            let inner = self.parse_bond_not()?;
            return Ok(BondExpr::Not(Box::new(inner)));
        }
        let ch = self.advance().ok_or("unexpected end of SMARTS in bond")?;
        let prim = match ch {
            b'-' | b'/' | b'\\' => BondPrimitive::Single,
            b'=' => BondPrimitive::Double,
            b'#' => BondPrimitive::Triple,
            b':' => BondPrimitive::Aromatic,
            b'~' => BondPrimitive::Any,
            b'@' => BondPrimitive::Ring,
            other => {
                return Err(format!(
                    "unexpected '{}' in bond expression at position {}",
                    other as char,
                    self.pos - 1
                ))
            }
        };
        // directional bonds may carry a '?' suffix
        if matches!(ch, b'/' | b'\\') && self.peek_at(0) == Some(b'?') {
            self.advance();
        }
        Ok(BondExpr::Primitive(prim))
    }
}

fn is_bond_symbol(ch: u8) -> bool {
    matches!(ch, b'-' | b'=' | b'#' | b':' | b'~' | b'@' | b'/' | b'\\')
}

fn collapse<T>(mut terms: Vec<T>, combine: fn(Vec<T>) -> T) -> T {
    if terms.len() == 1 {
        terms.remove(0)
    } else {
        combine(terms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_atom(smarts: &str) -> AtomExpr {
        let pattern = parse_smarts(smarts).unwrap();
        assert_eq!(pattern.atom_count(), 1, "{smarts}");
        pattern.atoms[0].clone()
    }

    #[test]
    fn organic_atoms() {
        let pattern = parse_smarts("CC(=O)O").unwrap();
        assert_eq!(pattern.atom_count(), 4);
        assert_eq!(pattern.bonds.len(), 3);
        assert_eq!(pattern.bonds[1].expr, BondExpr::Primitive(BondPrimitive::Double));
        assert_eq!(pattern.bonds[0].expr, BondExpr::Implicit);
    }

    #[test]
    fn bracket_precedence() {
        // [C,N;H1] == (C or N) and H1
        match single_atom("[C,N;H1]") {
            AtomExpr::And(terms) => {
                assert!(matches!(terms[0], AtomExpr::Or(_)));
                assert_eq!(terms[1], AtomExpr::Primitive(AtomPrimitive::TotalHydrogens(1)));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn two_letter_elements_win() {
        assert_eq!(
            single_atom("[Cl]"),
            AtomExpr::Primitive(AtomPrimitive::Element {
                atomic_number: 17,
                aromatic: Some(false)
            })
        );
        match single_atom("[CH2]") {
            AtomExpr::And(terms) => assert_eq!(terms.len(), 2),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            single_atom("[H]"),
            AtomExpr::Primitive(AtomPrimitive::Element {
                atomic_number: 1,
                aromatic: Some(false)
            })
        );
    }

    #[test]
    fn negation_and_charges() {
        match single_atom("[!#6;!#1;!H0]") {
            AtomExpr::And(terms) => {
                assert_eq!(terms.len(), 3);
                assert!(terms.iter().all(|t| matches!(t, AtomExpr::Not(_))));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(single_atom("[+0]"), AtomExpr::Primitive(AtomPrimitive::Charge(0)));
        assert_eq!(single_atom("[O--]"), AtomExpr::And(vec![
            AtomExpr::Primitive(AtomPrimitive::Element { atomic_number: 8, aromatic: Some(false) }),
            AtomExpr::Primitive(AtomPrimitive::Charge(-2)),
        ]));
    }

    #[test]
    fn recursive_and_rings() {
        let pattern = parse_smarts("[$([CX4]([OH])),$(c1ccccc1)]").unwrap();
        assert_eq!(pattern.atom_count(), 1);
        let ring = parse_smarts("*1~*~*~*~1").unwrap();
        assert_eq!(ring.bonds.len(), 4);
        assert!(ring
            .bonds
            .iter()
            .all(|b| b.expr == BondExpr::Primitive(BondPrimitive::Any)));
    }

    #[test]
    fn bond_expressions() {
        let pattern = parse_smarts("[#6]=;@[#6]").unwrap();
        assert!(matches!(pattern.bonds[0].expr, BondExpr::And(_)));
        let pattern = parse_smarts("*!@*").unwrap();
        assert!(matches!(pattern.bonds[0].expr, BondExpr::Not(_)));
    }

    #[test]
    fn invalid_patterns() {
        for smarts in ["", "[C", "C(", "C1CC", "[Qq]", "C=", "$(C"] {
            assert!(parse_smarts(smarts).is_err(), "{smarts} should not parse");
        }
    }

    #[test]
    fn search_order_is_connected() {
        let pattern = parse_smarts("CC(C)(C)C").unwrap();
        assert_eq!(pattern.order[0], 0);
        for (pos, atom) in pattern.order.iter().enumerate().skip(1) {
            let placed = &pattern.order[..pos];
            assert!(pattern.adjacency[*atom].iter().any(|(n, _)| placed.contains(n)));
        }
    }
}
