//! Key definitions shared by the library schemes and the key-file loader.

use std::path::Path;

use bitvec::prelude::*;
use serde::Deserialize;

use crate::schemes::FingerprintScheme;
use crate::toolkit::native::element;
use crate::toolkit::native::matcher::{count_unique_matches, has_match};
use crate::toolkit::native::molecule::{BondOrder, Molecule};
use crate::toolkit::native::rings::Ring;
use crate::toolkit::native::smarts::{parse_smarts, SmartsPattern};
use crate::toolkit::ToolkitError;

lazy_static::lazy_static! {
    static ref ELEMENT_COUNT_RE: regex::Regex =
        regex::Regex::new(r"^>=\s*(?P<min>\d+)\s+(?P<symbol>[A-Z][a-z]?)$").unwrap();
    static ref RING_COUNT_RE: regex::Regex = regex::Regex::new(
        r"^>=\s*(?P<min>\d+)\s+(?P<class>any|saturated or aromatic carbon-only|saturated or aromatic nitrogen-containing|saturated or aromatic heteroatom-containing|unsaturated non-aromatic carbon-only|unsaturated non-aromatic nitrogen-containing|unsaturated non-aromatic heteroatom-containing) ring size (?P<size>\d+)$"
    )
    .unwrap();
    static ref AROMATIC_RING_RE: regex::Regex =
        regex::Regex::new(r"^>=\s*(?P<min>\d+)\s+(?P<kind>aromatic|hetero-aromatic) rings?$").unwrap();
    static ref SPECIAL_COUNT_RE: regex::Regex =
        regex::Regex::new(r"^(?P<kind>fragments|aromatic rings)\s*>\s*(?P<count>\d+)$").unwrap();
    static ref SMARTS_RE: regex::Regex =
        regex::Regex::new(r"^(?P<smarts>\S+)(?:\s+>\s*(?P<count>\d+))?$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingClass {
    Any,
    SaturatedOrAromaticCarbon,
    SaturatedOrAromaticNitrogen,
    SaturatedOrAromaticHetero,
    UnsaturatedCarbon,
    UnsaturatedNitrogen,
    UnsaturatedHetero,
}

impl RingClass {
    pub const ALL: [RingClass; 7] = [
        RingClass::Any,
        RingClass::SaturatedOrAromaticCarbon,
        RingClass::SaturatedOrAromaticNitrogen,
        RingClass::SaturatedOrAromaticHetero,
        RingClass::UnsaturatedCarbon,
        RingClass::UnsaturatedNitrogen,
        RingClass::UnsaturatedHetero,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RingClass::Any => "any",
            RingClass::SaturatedOrAromaticCarbon => "saturated or aromatic carbon-only",
            RingClass::SaturatedOrAromaticNitrogen => "saturated or aromatic nitrogen-containing",
            RingClass::SaturatedOrAromaticHetero => "saturated or aromatic heteroatom-containing",
            RingClass::UnsaturatedCarbon => "unsaturated non-aromatic carbon-only",
            RingClass::UnsaturatedNitrogen => "unsaturated non-aromatic nitrogen-containing",
            RingClass::UnsaturatedHetero => "unsaturated non-aromatic heteroatom-containing",
        }
    }

    fn from_label(label: &str) -> Option<RingClass> {
        RingClass::ALL.into_iter().find(|class| class.label() == label)
    }

    fn matches(&self, mol: &Molecule, ring: &Ring) -> bool {
        let aromatic = is_aromatic_ring(mol, ring);
        let saturated = ring
            .bonds
            .iter()
            .all(|b| mol.bonds[*b].order == BondOrder::Single);
        let carbon_only = ring
            .atoms
            .iter()
            .all(|a| mol.atoms[*a].atomic_number == element::CARBON);
        let has_nitrogen = ring
            .atoms
            .iter()
            .any(|a| mol.atoms[*a].atomic_number == element::NITROGEN);
        let saturated_or_aromatic = saturated || aromatic;

        match self {
            RingClass::Any => true,
            RingClass::SaturatedOrAromaticCarbon => saturated_or_aromatic && carbon_only,
            RingClass::SaturatedOrAromaticNitrogen => saturated_or_aromatic && has_nitrogen,
            RingClass::SaturatedOrAromaticHetero => saturated_or_aromatic && !carbon_only,
            RingClass::UnsaturatedCarbon => !saturated_or_aromatic && carbon_only,
            RingClass::UnsaturatedNitrogen => !saturated_or_aromatic && has_nitrogen,
            RingClass::UnsaturatedHetero => !saturated_or_aromatic && !carbon_only,
        }
    }
}

fn is_aromatic_ring(mol: &Molecule, ring: &Ring) -> bool {
    ring.bonds.iter().all(|b| mol.bonds[*b].is_aromatic())
}

#[derive(Debug, Clone, PartialEq)]
pub enum KeyDef {
    Unassigned,
    /// Set when the pattern has at least `min_matches` unique matches.
    Smarts {
        pattern: Box<SmartsPattern>,
        min_matches: usize,
    },
    ElementCount {
        atomic_number: u8,
        min: usize,
    },
    RingCount {
        size: usize,
        class: RingClass,
        min: usize,
    },
    AromaticRingCount {
        hetero: bool,
        min: usize,
    },
    Isotope,
    Fragments {
        min: usize,
    },
}

impl KeyDef {
    pub fn smarts(smarts: &str, min_matches: usize) -> Result<KeyDef, ToolkitError> {
        Ok(KeyDef::Smarts {
            pattern: Box::new(parse_smarts(smarts)?),
            min_matches,
        })
    }

    /// Parses one key definition: a textual count rule, or a SMARTS pattern
    /// optionally followed by `>N`.
    pub fn parse(definition: &str) -> Result<KeyDef, ToolkitError> {
        let definition = definition.trim();
        let invalid = |reason: &str| ToolkitError::SmartsParse {
            smarts: definition.to_string(),
            reason: reason.to_string(),
        };

        if definition.is_empty() || definition.eq_ignore_ascii_case("unassigned") {
            return Ok(KeyDef::Unassigned);
        }
        if definition.eq_ignore_ascii_case("isotope") {
            return Ok(KeyDef::Isotope);
        }

        if let Some(caps) = ELEMENT_COUNT_RE.captures(definition) {
            let atomic_number = element::atomic_number(&caps["symbol"])
                .ok_or_else(|| invalid("unknown element"))?;
            return Ok(KeyDef::ElementCount {
                atomic_number,
                min: parse_count(&caps["min"]).ok_or_else(|| invalid("bad count"))?,
            });
        }
        if let Some(caps) = RING_COUNT_RE.captures(definition) {
            return Ok(KeyDef::RingCount {
                size: parse_count(&caps["size"]).ok_or_else(|| invalid("bad ring size"))?,
                class: RingClass::from_label(&caps["class"])
                    .ok_or_else(|| invalid("unknown ring class"))?,
                min: parse_count(&caps["min"]).ok_or_else(|| invalid("bad count"))?,
            });
        }
        if let Some(caps) = AROMATIC_RING_RE.captures(definition) {
            return Ok(KeyDef::AromaticRingCount {
                hetero: &caps["kind"] == "hetero-aromatic",
                min: parse_count(&caps["min"]).ok_or_else(|| invalid("bad count"))?,
            });
        }
        if let Some(caps) = SPECIAL_COUNT_RE.captures(definition) {
            let min = parse_count(&caps["count"]).ok_or_else(|| invalid("bad count"))? + 1;
            return Ok(match &caps["kind"] {
                "fragments" => KeyDef::Fragments { min },
                _ => KeyDef::AromaticRingCount { hetero: false, min },
            });
        }
        if let Some(caps) = SMARTS_RE.captures(definition) {
            let min_matches = match caps.name("count") {
                Some(count) => parse_count(count.as_str()).ok_or_else(|| invalid("bad count"))? + 1,
                None => 1,
            };
            return KeyDef::smarts(&caps["smarts"], min_matches);
        }

        Err(invalid("unrecognised key definition"))
    }

    pub fn evaluate(&self, mol: &Molecule) -> bool {
        match self {
            KeyDef::Unassigned => false,
            KeyDef::Smarts {
                pattern,
                min_matches,
            } => match *min_matches {
                1 => has_match(mol, pattern),
                min => count_unique_matches(mol, pattern, min) >= min,
            },
            KeyDef::ElementCount { atomic_number, min } => {
                let count = if *atomic_number == element::HYDROGEN {
                    mol.hydrogen_count()
                } else {
                    mol.atoms
                        .iter()
                        .filter(|atom| atom.atomic_number == *atomic_number)
                        .count()
                };
                count >= *min
            }
            KeyDef::RingCount { size, class, min } => {
                let count = mol
                    .rings
                    .iter()
                    .filter(|ring| ring.size() == *size && class.matches(mol, ring))
                    .count();
                count >= *min
            }
            KeyDef::AromaticRingCount { hetero, min } => {
                let count = mol
                    .rings
                    .iter()
                    .filter(|ring| is_aromatic_ring(mol, ring))
                    .filter(|ring| {
                        !*hetero
                            || ring
                                .atoms
                                .iter()
                                .any(|a| mol.atoms[*a].atomic_number != element::CARBON)
                    })
                    .count();
                count >= *min
            }
            KeyDef::Isotope => mol.atoms.iter().any(|atom| atom.isotope.is_some()),
            KeyDef::Fragments { min } => mol.fragment_count() >= *min,
        }
    }
}

fn parse_count(text: &str) -> Option<usize> {
    text.parse().ok()
}

/// One key per bit of a scheme.
#[derive(Debug, Clone)]
pub struct KeyTable {
    scheme: FingerprintScheme,
    keys: Vec<KeyDef>,
}

#[derive(Debug, Deserialize)]
struct KeyRow {
    bit: usize,
    definition: String,
}

impl KeyTable {
    pub fn unassigned(scheme: FingerprintScheme) -> Self {
        KeyTable {
            scheme,
            keys: vec![KeyDef::Unassigned; scheme.width()],
        }
    }

    /// Places `keys` at bits 0.., padding the rest of the scheme as unassigned.
    pub fn from_keys(scheme: FingerprintScheme, keys: Vec<KeyDef>) -> Result<Self, ToolkitError> {
        if keys.len() > scheme.width() {
            return Err(ToolkitError::Scheme {
                scheme: scheme.name().to_string(),
                reason: format!("{} keys for a {}-bit scheme", keys.len(), scheme.width()),
            });
        }
        let mut table = KeyTable::unassigned(scheme);
        for (bit, key) in keys.into_iter().enumerate() {
            table.keys[bit] = key;
        }
        Ok(table)
    }

    /// Reads a `bit`/`definition` TSV; bits not listed stay unassigned.
    pub fn from_tsv(scheme: FingerprintScheme, path: &Path) -> eyre::Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .quoting(false)
            .from_path(path)?;

        let mut table = KeyTable::unassigned(scheme);
        let mut seen = bitvec![0; scheme.width()];
        for row in reader.deserialize() {
            let row: KeyRow = row?;
            if row.bit >= scheme.width() {
                return Err(eyre::eyre!(
                    "{}: bit {} outside the {}-bit {} scheme",
                    path.display(),
                    row.bit,
                    scheme.width(),
                    scheme.name()
                ));
            }
            if seen[row.bit] {
                return Err(eyre::eyre!("{}: bit {} defined twice", path.display(), row.bit));
            }
            seen.set(row.bit, true);
            table.keys[row.bit] = KeyDef::parse(&row.definition)
                .map_err(|e| eyre::eyre!("{}: bit {}: {}", path.display(), row.bit, e))?;
        }

        log::info!(
            "loaded {} {} keys from {}",
            table.assigned(),
            scheme.name(),
            path.display()
        );
        Ok(table)
    }

    pub fn scheme(&self) -> FingerprintScheme {
        self.scheme
    }

    pub fn assigned(&self) -> usize {
        self.keys
            .iter()
            .filter(|key| !matches!(key, KeyDef::Unassigned))
            .count()
    }

    pub fn is_assigned(&self, bit: usize) -> bool {
        self.keys
            .get(bit)
            .map_or(false, |key| !matches!(key, KeyDef::Unassigned))
    }

    pub fn key(&self, bit: usize) -> Option<&KeyDef> {
        self.keys.get(bit)
    }

    pub fn evaluate(&self, mol: &Molecule) -> BitVec {
        self.keys.iter().map(|key| key.evaluate(mol)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolkit::native::smiles::parse_smiles;

    fn eval(definition: &str, smiles: &str) -> bool {
        KeyDef::parse(definition)
            .unwrap()
            .evaluate(&parse_smiles(smiles).unwrap())
    }

    #[test]
    fn textual_count_rules() {
        assert_eq!(
            KeyDef::parse(">= 4 H").unwrap(),
            KeyDef::ElementCount {
                atomic_number: 1,
                min: 4
            }
        );
        assert!(eval(">= 4 H", "CC"));
        assert!(!eval(">= 8 H", "CC"));
        assert!(eval(">= 2 C", "CCO"));
        assert!(eval(">= 1 Cl", "CCl"));
        assert!(eval(">= 1 any ring size 6", "c1ccccc1"));
        assert!(eval(">= 1 saturated or aromatic carbon-only ring size 6", "c1ccccc1"));
        assert!(eval(">= 1 saturated or aromatic carbon-only ring size 6", "C1CCCCC1"));
        assert!(!eval(">= 1 saturated or aromatic carbon-only ring size 6", "C1=CCCCC1"));
        assert!(eval(">= 1 unsaturated non-aromatic carbon-only ring size 6", "C1=CCCCC1"));
        assert!(eval(">= 1 saturated or aromatic nitrogen-containing ring size 6", "c1ccncc1"));
        assert!(eval(">= 1 hetero-aromatic rings", "c1ccncc1"));
        assert!(!eval(">= 1 hetero-aromatic rings", "c1ccccc1"));
        assert!(eval(">= 2 aromatic rings", "c1ccc2ccccc2c1"));
    }

    #[test]
    fn smarts_with_count() {
        assert!(eval("[#8]", "CCO"));
        assert!(!eval("[#8] >1", "CCO"));
        assert!(eval("[#8] >1", "OCCO"));
        assert!(eval("[CH3] > 1", "CCC"));
    }

    #[test]
    fn special_keys() {
        assert!(eval("fragments > 1", "CCO.O"));
        assert!(!eval("fragments > 1", "CCO"));
        assert!(eval("isotope", "[13CH4]"));
        assert!(!eval("isotope", "C"));
        assert!(!eval("unassigned", "C"));
        assert!(eval("aromatic rings > 1", "c1ccc2ccccc2c1"));
    }

    #[test]
    fn invalid_definitions() {
        assert!(KeyDef::parse(">= 1 Xx").is_err());
        assert!(KeyDef::parse("C(").is_err());
    }

    #[test]
    fn padded_table() {
        let table = KeyTable::from_keys(
            FingerprintScheme::Maccs,
            vec![KeyDef::parse("[#8]").unwrap()],
        )
        .unwrap();
        let bits = table.evaluate(&parse_smiles("CCO").unwrap());
        assert_eq!(bits.len(), 166);
        assert_eq!(bits.count_ones(), 1);
        assert!(bits[0]);
        assert!(table.is_assigned(0));
        assert!(!table.is_assigned(1));
        assert!(!table.is_assigned(166));
    }
}
