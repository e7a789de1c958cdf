//! PubChem substructure fingerprint, sections 1 to 5.
//!
//! Section 1 (bits 0-114) is the hierarchic element count list, section 2
//! (bits 115-262) the SSSR ring counts. Sections 3 to 5 (bits 263-459) are
//! atom pairs and atom neighbourhoods, written in PubChem's `X(~Y)(:Z)`
//! notation and compiled to SMARTS. The SMARTS sections 6 and 7 (bits
//! 460-880) come from a key file when one is supplied.

use crate::schemes::keys::{KeyDef, KeyTable, RingClass};
use crate::schemes::FingerprintScheme;
use crate::toolkit::native::element;
use crate::toolkit::ToolkitError;

pub const ELEMENT_COUNTS: [(&str, usize); 115] = [
    ("H", 4), ("H", 8), ("H", 16), ("H", 32),
    ("Li", 1), ("Li", 2),
    ("B", 1), ("B", 2), ("B", 4),
    ("C", 2), ("C", 4), ("C", 8), ("C", 16), ("C", 32),
    ("N", 1), ("N", 2), ("N", 4), ("N", 8),
    ("O", 1), ("O", 2), ("O", 4), ("O", 8), ("O", 16),
    ("F", 1), ("F", 2), ("F", 4),
    ("Na", 1), ("Na", 2),
    ("Si", 1), ("Si", 2),
    ("P", 1), ("P", 2), ("P", 4),
    ("S", 1), ("S", 2), ("S", 4), ("S", 8),
    ("Cl", 1), ("Cl", 2), ("Cl", 4), ("Cl", 8),
    ("K", 1), ("K", 2),
    ("Br", 1), ("Br", 2), ("Br", 4),
    ("I", 1), ("I", 2), ("I", 4),
    ("Be", 1), ("Mg", 1), ("Al", 1), ("Ca", 1), ("Sc", 1), ("Ti", 1), ("V", 1), ("Cr", 1),
    ("Mn", 1), ("Fe", 1), ("Co", 1), ("Ni", 1), ("Cu", 1), ("Zn", 1), ("Ga", 1), ("Ge", 1),
    ("As", 1), ("Se", 1), ("Kr", 1), ("Rb", 1), ("Sr", 1), ("Y", 1), ("Zr", 1), ("Nb", 1),
    ("Mo", 1), ("Ru", 1), ("Rh", 1), ("Pd", 1), ("Ag", 1), ("Cd", 1), ("In", 1), ("Sn", 1),
    ("Sb", 1), ("Te", 1), ("Xe", 1), ("Cs", 1), ("Ba", 1), ("Lu", 1), ("Hf", 1), ("Ta", 1),
    ("W", 1), ("Re", 1), ("Os", 1), ("Ir", 1), ("Pt", 1), ("Au", 1), ("Hg", 1), ("Tl", 1),
    ("Pb", 1), ("Bi", 1), ("La", 1), ("Ce", 1), ("Pr", 1), ("Nd", 1), ("Pm", 1), ("Sm", 1),
    ("Eu", 1), ("Gd", 1), ("Tb", 1), ("Dy", 1), ("Ho", 1), ("Er", 1), ("Tm", 1), ("Yb", 1),
    ("Tc", 1), ("U", 1),
];

/// (ring size, highest count threshold) for section 2.
const RING_THRESHOLDS: [(usize, usize); 8] =
    [(3, 2), (4, 2), (5, 5), (6, 5), (7, 2), (8, 2), (9, 1), (10, 1)];

const AROMATIC_RING_THRESHOLD: usize = 4;

lazy_static::lazy_static! {
    static ref NEIGHBOURHOOD_RE: regex::Regex =
        regex::Regex::new(r"^(?P<center>[A-Z][a-z]?)(?P<neighbours>(?:\([-=#:~][A-Z][a-z]?\))+)$")
            .unwrap();
    static ref NEIGHBOUR_RE: regex::Regex =
        regex::Regex::new(r"\((?P<bond>[-=#:~])(?P<symbol>[A-Z][a-z]?)\)").unwrap();
}

/// Section 3: element pairs, `X(~Y)` is set when an X atom is bonded to a Y.
pub const ATOM_PAIRS: [&str; 64] = [
    "Li(~H)", "Li(~Li)", "Li(~B)", "Li(~C)", "Li(~O)", "Li(~F)", "Li(~P)", "Li(~S)",
    "Li(~Cl)", "B(~H)", "B(~B)", "B(~C)", "B(~N)", "B(~O)", "B(~F)", "B(~Si)", "B(~P)",
    "B(~S)", "B(~Cl)", "B(~Br)", "C(~H)", "C(~C)", "C(~N)", "C(~O)", "C(~F)", "C(~Na)",
    "C(~Mg)", "C(~Al)", "C(~Si)", "C(~P)", "C(~S)", "C(~Cl)", "C(~As)", "C(~Se)", "C(~Br)",
    "C(~I)", "N(~H)", "N(~N)", "N(~O)", "N(~F)", "N(~Si)", "N(~P)", "N(~S)", "N(~Cl)",
    "N(~Br)", "O(~H)", "O(~O)", "O(~Mg)", "O(~Na)", "O(~Al)", "O(~Si)", "O(~P)", "O(~K)",
    "F(~P)", "F(~S)", "Al(~H)", "Al(~Cl)", "Si(~H)", "Si(~Si)", "Si(~Cl)", "P(~H)", "P(~P)",
    "As(~H)", "As(~As)",
];

/// Section 4: simple atom nearest neighbours, any bond order.
pub const NEAREST_NEIGHBOURS: [&str; 89] = [
    "C(~Br)(~C)", "C(~Br)(~C)(~C)", "C(~Br)(~H)", "C(~Br)(:C)", "C(~Br)(:N)", "C(~C)(~C)",
    "C(~C)(~C)(~C)", "C(~C)(~C)(~C)(~C)", "C(~C)(~C)(~C)(~H)", "C(~C)(~C)(~C)(~N)",
    "C(~C)(~C)(~C)(~O)", "C(~C)(~C)(~H)(~N)", "C(~C)(~C)(~H)(~O)", "C(~C)(~C)(~N)",
    "C(~C)(~C)(~O)", "C(~C)(~Cl)", "C(~C)(~Cl)(~H)", "C(~C)(~H)", "C(~C)(~H)(~N)",
    "C(~C)(~H)(~O)", "C(~C)(~H)(~O)(~O)", "C(~C)(~H)(~P)", "C(~C)(~H)(~S)", "C(~C)(~I)",
    "C(~C)(~N)", "C(~C)(~N)(~N)", "C(~C)(~N)(~S)", "C(~C)(~N)(:C)", "C(~C)(~O)",
    "C(~C)(~O)(~O)", "C(~C)(~P)", "C(~C)(~S)", "C(~C)(:C)", "C(~C)(:C)(:C)",
    "C(~C)(:C)(:N)", "C(~C)(:N)", "C(~C)(:N)(:N)", "C(~Cl)(~Cl)", "C(~Cl)(~H)",
    "C(~Cl)(:C)", "C(~F)(~F)", "C(~F)(:C)", "C(~H)(~N)", "C(~H)(~O)", "C(~H)(~O)(~O)",
    "C(~H)(~S)", "C(~H)(~Si)", "C(~H)(:C)", "C(~H)(:C)(:C)", "C(~H)(:C)(:N)", "C(~H)(:N)",
    "C(~H)(~H)(~H)", "C(~N)(~N)", "C(~N)(:C)", "C(~N)(:C)(:C)", "C(~N)(:C)(:N)",
    "C(~N)(:N)", "C(~O)(~O)", "C(~O)(:C)", "C(~O)(:C)(:C)", "C(~S)(:C)", "C(:C)(:C)",
    "C(:C)(:C)(:C)", "C(:C)(:C)(:N)", "C(:C)(:N)", "C(:C)(:N)(:N)", "C(:N)(:N)",
    "N(~C)(~C)", "N(~C)(~C)(~C)", "N(~C)(~C)(~H)", "N(~C)(~H)", "N(~C)(~H)(~N)",
    "N(~C)(~O)", "N(~C)(:C)", "N(~C)(:C)(:C)", "N(~H)(~N)", "N(~H)(:C)", "N(~H)(:C)(:C)",
    "N(~O)(~O)", "N(~O)(:O)", "N(:C)(:C)", "N(:C)(:C)(:C)", "O(~C)(~C)", "O(~C)(~H)",
    "O(~C)(~P)", "O(~H)(~S)", "O(:C)(:C)", "P(~C)(~C)", "P(~O)(~O)",
];

/// Section 5: detailed atom neighbourhoods with explicit bond orders.
pub const DETAILED_NEIGHBOURHOODS: [&str; 44] = [
    "C(=C)", "C(#C)", "C(=N)", "C(#N)", "C(=O)", "C(=S)", "N(=N)", "N(=O)", "N(=P)",
    "P(=O)", "P(=P)", "C(#C)(-C)", "C(#C)(-H)", "C(#N)(-C)", "C(-C)(-C)(=C)",
    "C(-C)(-C)(=N)", "C(-C)(-C)(=O)", "C(-C)(-Cl)(=O)", "C(-C)(-H)(=C)", "C(-C)(-H)(=N)",
    "C(-C)(-H)(=O)", "C(-C)(-N)(=C)", "C(-C)(-N)(=N)", "C(-C)(-N)(=O)", "C(-C)(-O)(=O)",
    "C(-C)(=C)", "C(-C)(=N)", "C(-C)(=O)", "C(-Cl)(=O)", "C(-H)(-N)(=C)", "C(-H)(=C)",
    "C(-H)(=N)", "C(-H)(=O)", "C(-N)(=C)", "C(-N)(=N)", "C(-N)(=O)", "C(-O)(=O)",
    "N(-C)(=C)", "N(-C)(=O)", "N(-O)(=O)", "P(-O)(=O)", "S(-C)(=O)", "S(-O)(=O)",
    "S(=O)(=O)",
];

pub fn section_one() -> Result<Vec<KeyDef>, ToolkitError> {
    ELEMENT_COUNTS
        .iter()
        .map(|(symbol, min)| {
            let atomic_number =
                element::atomic_number(symbol).ok_or_else(|| ToolkitError::Scheme {
                    scheme: FingerprintScheme::Pubchem.name().to_string(),
                    reason: format!("unknown element {}", symbol),
                })?;
            Ok(KeyDef::ElementCount {
                atomic_number,
                min: *min,
            })
        })
        .collect()
}

pub fn section_two() -> Vec<KeyDef> {
    let mut keys = Vec::new();
    for (size, max_count) in RING_THRESHOLDS {
        for min in 1..=max_count {
            for class in RingClass::ALL {
                keys.push(KeyDef::RingCount { size, class, min });
            }
        }
    }
    for min in 1..=AROMATIC_RING_THRESHOLD {
        keys.push(KeyDef::AromaticRingCount { hetero: false, min });
        keys.push(KeyDef::AromaticRingCount { hetero: true, min });
    }
    keys
}

/// Compiles `C(~C)(:N)` style notation to SMARTS. Hydrogen neighbours
/// become a minimum hydrogen count on the centre atom, so `C(~H)(~H)` is
/// `[#6;!H0;!H1]`.
pub fn neighbourhood_smarts(notation: &str) -> Result<String, ToolkitError> {
    let invalid = |reason: String| ToolkitError::Scheme {
        scheme: FingerprintScheme::Pubchem.name().to_string(),
        reason: format!("{}: {}", notation, reason),
    };
    let atom_number = |symbol: &str| {
        element::atomic_number(symbol).ok_or_else(|| invalid(format!("unknown element {}", symbol)))
    };

    let caps = NEIGHBOURHOOD_RE
        .captures(notation)
        .ok_or_else(|| invalid("not an atom neighbourhood".to_string()))?;

    let mut hydrogens = 0;
    let mut branches = String::new();
    for neighbour in NEIGHBOUR_RE.captures_iter(&caps["neighbours"]) {
        let atomic_number = atom_number(&neighbour["symbol"])?;
        if atomic_number == element::HYDROGEN {
            hydrogens += 1;
        } else {
            branches.push_str(&format!("({}[#{}])", &neighbour["bond"], atomic_number));
        }
    }

    let mut centre = format!("[#{}", atom_number(&caps["center"])?);
    for count in 0..hydrogens {
        centre.push_str(&format!(";!H{}", count));
    }
    centre.push(']');
    Ok(centre + &branches)
}

pub fn neighbourhood_sections() -> Result<Vec<KeyDef>, ToolkitError> {
    ATOM_PAIRS
        .iter()
        .chain(NEAREST_NEIGHBOURS.iter())
        .chain(DETAILED_NEIGHBOURHOODS.iter())
        .map(|notation| KeyDef::smarts(&neighbourhood_smarts(notation)?, 1))
        .collect()
}

pub fn table() -> Result<KeyTable, ToolkitError> {
    let mut keys = section_one()?;
    keys.extend(section_two());
    keys.extend(neighbourhood_sections()?);
    KeyTable::from_keys(FingerprintScheme::Pubchem, keys)
}
