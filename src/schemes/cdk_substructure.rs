//! Functional group keys of the CDK substructure fingerprint.
//!
//! Only the leading hydrocarbon, alkyl halide and alcohol groups are built
//! in; the remaining bits come from a `cdk-substructure.tsv` key file.

use crate::schemes::keys::{KeyDef, KeyTable};
use crate::schemes::FingerprintScheme;
use crate::toolkit::ToolkitError;

pub const FUNCTIONAL_GROUPS: [&str; 15] = [
    // primary, secondary, tertiary and quaternary carbon
    "[CX4H3][#6]",
    "[CX4H2]([#6])[#6]",
    "[CX4H1]([#6])([#6])[#6]",
    "[CX4]([#6])([#6])([#6])[#6]",
    // alkene, alkyne, allene
    "[CX3;$([H2]),$([H1][#6]),$(C([#6])[#6])]=[CX3;$([H2]),$([H1][#6]),$(C([#6])[#6])]",
    "[CX2]#[CX2]",
    "[CX3]=[CX2]=[CX3]",
    "[ClX1][CX4]",
    "[FX1][CX4]",
    "[BrX1][CX4]",
    "[IX1][CX4]",
    // alcohol, then primary, secondary and tertiary
    "[OX2H][CX4;!$(C([OX2H])[O,S,#7,#15])]",
    "[OX2H][CX4H2;!$(C([OX2H])[O,S,#7,#15])]",
    "[OX2H][CX4H;!$(C([OX2H])[O,S,#7,#15])]",
    "[OX2H][CX4D4;!$(C([OX2H])[O,S,#7,#15])]",
];

pub fn table() -> Result<KeyTable, ToolkitError> {
    let keys = FUNCTIONAL_GROUPS
        .iter()
        .map(|smarts| KeyDef::smarts(smarts, 1))
        .collect::<Result<Vec<_>, _>>()?;
    KeyTable::from_keys(FingerprintScheme::CdkSubstructure, keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolkit::native::smiles::parse_smiles;

    fn bits(smiles: &str) -> Vec<usize> {
        table()
            .unwrap()
            .evaluate(&parse_smiles(smiles).unwrap())
            .iter_ones()
            .collect()
    }

    #[test]
    fn builtin_groups() {
        let table = table().unwrap();
        assert_eq!(table.assigned(), 15);
        assert!(table.is_assigned(14));
        assert!(!table.is_assigned(15));
    }

    #[test]
    fn alcohols() {
        // primary carbon, alcohol, primary alcohol
        assert_eq!(bits("CCO"), vec![0, 11, 12]);
        assert_eq!(bits("CC(C)O"), vec![0, 11, 13]);
        assert_eq!(bits("CC(C)(C)O"), vec![0, 11, 14]);
    }

    #[test]
    fn hydrocarbons_and_halides() {
        assert_eq!(bits("CC(C)C"), vec![0, 2]);
        assert_eq!(bits("CC=CC"), vec![0, 4]);
        assert_eq!(bits("CC#CC"), vec![0, 5]);
        assert_eq!(bits("CCCl"), vec![0, 7]);
        assert!(bits("c1ccccc1").is_empty());
    }
}
