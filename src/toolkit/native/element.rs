//! Periodic table lookups used by the SMILES/SMARTS parsers and the count keys.

const SYMBOLS: [&str; 119] = [
    "*", "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S",
    "Cl", "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge",
    "As", "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd",
    "In", "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd",
    "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg",
    "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm",
    "Bk", "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn",
    "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

pub const HYDROGEN: u8 = 1;
pub const CARBON: u8 = 6;
pub const NITROGEN: u8 = 7;
pub const OXYGEN: u8 = 8;

pub fn atomic_number(symbol: &str) -> Option<u8> {
    SYMBOLS
        .iter()
        .skip(1)
        .position(|s| *s == symbol)
        .map(|idx| (idx + 1) as u8)
}

pub fn symbol(atomic_number: u8) -> Option<&'static str> {
    match atomic_number {
        0 => None,
        n => SYMBOLS.get(n as usize).copied(),
    }
}

/// Element symbols that may be written in lower case to mark aromaticity.
pub fn aromatic_atomic_number(symbol: &str) -> Option<u8> {
    match symbol {
        "b" => Some(5),
        "c" => Some(6),
        "n" => Some(7),
        "o" => Some(8),
        "p" => Some(15),
        "s" => Some(16),
        "se" => Some(34),
        "as" => Some(33),
        "te" => Some(52),
        _ => None,
    }
}

/// Allowed neutral valences in increasing order, for elements that have them.
pub fn default_valences(atomic_number: u8) -> &'static [u8] {
    match atomic_number {
        1 => &[1],
        5 => &[3],
        6 => &[4],
        7 => &[3, 5],
        8 => &[2],
        9 | 17 | 35 | 53 => &[1],
        14 => &[4],
        15 => &[3, 5],
        16 => &[2, 4, 6],
        33 => &[3, 5],
        34 => &[2, 4, 6],
        52 => &[2, 4, 6],
        _ => &[],
    }
}

/// Valences of a charged atom, taken from its isoelectronic neutral neighbour
/// in the period (N+ behaves like C, O- like F, ...).
pub fn charged_valences(atomic_number: u8, charge: i8) -> &'static [u8] {
    if charge == 0 {
        return default_valences(atomic_number);
    }
    let shifted = atomic_number as i16 - charge as i16;
    match (atomic_number, shifted) {
        (5..=9, 5..=9) | (14..=17, 14..=17) | (33..=35, 33..=35) => {
            default_valences(shifted as u8)
        }
        _ => &[],
    }
}

pub fn is_halogen(atomic_number: u8) -> bool {
    matches!(atomic_number, 9 | 17 | 35 | 53 | 85)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_round_trip() {
        assert_eq!(atomic_number("C"), Some(6));
        assert_eq!(atomic_number("Cl"), Some(17));
        assert_eq!(atomic_number("U"), Some(92));
        assert_eq!(symbol(26), Some("Fe"));
        assert_eq!(atomic_number("Xx"), None);
        assert_eq!(atomic_number("*"), None);
    }

    #[test]
    fn charged_nitrogen_is_carbon_like() {
        assert_eq!(charged_valences(7, 1), &[4]);
        assert_eq!(charged_valences(8, -1), &[1]);
        assert_eq!(charged_valences(26, 2), &[] as &[u8]);
    }
}
