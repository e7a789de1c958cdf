use std::path::Path;

use bitvec::prelude::*;

use crate::toolkit::native::smiles::parse_smiles;
use crate::toolkit::ToolkitError;

pub mod cdk_substructure;
pub mod keys;
pub mod maccs;
pub mod pubchem;

use keys::KeyTable;

/// Library schemes in the order their vectors are concatenated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FingerprintScheme {
    CdkSubstructure,
    Maccs,
    Pubchem,
    KlekotaRoth,
}

impl FingerprintScheme {
    pub const ALL: [FingerprintScheme; 4] = [
        FingerprintScheme::CdkSubstructure,
        FingerprintScheme::Maccs,
        FingerprintScheme::Pubchem,
        FingerprintScheme::KlekotaRoth,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FingerprintScheme::CdkSubstructure => "cdk-substructure",
            FingerprintScheme::Maccs => "maccs",
            FingerprintScheme::Pubchem => "pubchem",
            FingerprintScheme::KlekotaRoth => "klekota-roth",
        }
    }

    pub fn width(&self) -> usize {
        match self {
            FingerprintScheme::CdkSubstructure => 307,
            FingerprintScheme::Maccs => 166,
            FingerprintScheme::Pubchem => 881,
            FingerprintScheme::KlekotaRoth => 4860,
        }
    }

    pub fn from_name(name: &str) -> Option<FingerprintScheme> {
        FingerprintScheme::ALL
            .into_iter()
            .find(|scheme| scheme.name() == name)
    }

    pub fn combined_width() -> usize {
        FingerprintScheme::ALL.iter().map(|s| s.width()).sum()
    }

    /// Scheme and bit within it for an offset into the combined vector.
    pub fn locate(offset: usize) -> Option<(FingerprintScheme, usize)> {
        let mut start = 0;
        for scheme in FingerprintScheme::ALL {
            if offset < start + scheme.width() {
                return Some((scheme, offset - start));
            }
            start += scheme.width();
        }
        None
    }
}

pub trait SchemeFingerprinter: Send + Sync {
    /// Always exactly `scheme.width()` bits.
    fn fingerprint(&self, smiles: &str, scheme: FingerprintScheme) -> Result<BitVec, ToolkitError>;

    /// All schemes concatenated in `FingerprintScheme::ALL` order.
    fn combined(&self, smiles: &str) -> Result<BitVec, ToolkitError> {
        let mut combined = BitVec::with_capacity(FingerprintScheme::combined_width());
        for scheme in FingerprintScheme::ALL {
            combined.extend_from_bitslice(self.fingerprint(smiles, scheme)?.as_bitslice());
        }
        Ok(combined)
    }
}

/// Evaluates one key table per scheme on the native molecule graph.
#[derive(Debug, Clone)]
pub struct KeyTableFingerprinter {
    tables: Vec<KeyTable>,
}

impl KeyTableFingerprinter {
    pub fn builtin() -> Result<Self, ToolkitError> {
        Ok(KeyTableFingerprinter {
            tables: vec![
                cdk_substructure::table()?,
                maccs::table()?,
                pubchem::table()?,
                KeyTable::unassigned(FingerprintScheme::KlekotaRoth),
            ],
        })
    }

    /// Built-in tables, replaced scheme by scheme with `<dir>/<scheme>.tsv`
    /// where such a file exists.
    pub fn with_key_dir(dir: &Path) -> eyre::Result<Self> {
        if !dir.is_dir() {
            return Err(eyre::eyre!("scheme key directory {} does not exist", dir.display()));
        }
        let mut fingerprinter = KeyTableFingerprinter::builtin()?;
        for scheme in FingerprintScheme::ALL {
            let path = dir.join(format!("{}.tsv", scheme.name()));
            if path.is_file() {
                fingerprinter.set_table(KeyTable::from_tsv(scheme, &path)?);
            } else {
                log::debug!("no key file for {}, using built-in keys", scheme.name());
            }
        }
        Ok(fingerprinter)
    }

    pub fn set_table(&mut self, table: KeyTable) {
        for slot in self.tables.iter_mut() {
            if slot.scheme() == table.scheme() {
                *slot = table;
                return;
            }
        }
    }

    pub fn table(&self, scheme: FingerprintScheme) -> Option<&KeyTable> {
        self.tables.iter().find(|table| table.scheme() == scheme)
    }

    /// Whether the bit at `offset` in the combined vector has a key.
    pub fn is_assigned(&self, offset: usize) -> bool {
        FingerprintScheme::locate(offset)
            .and_then(|(scheme, bit)| Some(self.table(scheme)?.is_assigned(bit)))
            .unwrap_or(false)
    }

    fn scheme_error(scheme: FingerprintScheme, e: ToolkitError) -> ToolkitError {
        ToolkitError::Scheme {
            scheme: scheme.name().to_string(),
            reason: e.to_string(),
        }
    }
}

impl SchemeFingerprinter for KeyTableFingerprinter {
    fn fingerprint(&self, smiles: &str, scheme: FingerprintScheme) -> Result<BitVec, ToolkitError> {
        let mol = parse_smiles(smiles).map_err(|e| Self::scheme_error(scheme, e))?;
        let table = self.table(scheme).ok_or_else(|| ToolkitError::Scheme {
            scheme: scheme.name().to_string(),
            reason: "no key table".to_string(),
        })?;
        Ok(table.evaluate(&mol))
    }

    fn combined(&self, smiles: &str) -> Result<BitVec, ToolkitError> {
        let first = FingerprintScheme::ALL[0];
        let mol = parse_smiles(smiles).map_err(|e| Self::scheme_error(first, e))?;
        let mut combined = BitVec::with_capacity(FingerprintScheme::combined_width());
        for scheme in FingerprintScheme::ALL {
            let table = self.table(scheme).ok_or_else(|| ToolkitError::Scheme {
                scheme: scheme.name().to_string(),
                reason: "no key table".to_string(),
            })?;
            combined.extend_from_bitslice(table.evaluate(&mol).as_bitslice());
        }
        Ok(combined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_widths() {
        assert_eq!(FingerprintScheme::combined_width(), 6214);
        assert_eq!(
            FingerprintScheme::from_name("klekota-roth"),
            Some(FingerprintScheme::KlekotaRoth)
        );
        assert_eq!(FingerprintScheme::from_name("ecfp6"), None);
    }

    #[test]
    fn locate_offsets() {
        assert_eq!(
            FingerprintScheme::locate(0),
            Some((FingerprintScheme::CdkSubstructure, 0))
        );
        assert_eq!(
            FingerprintScheme::locate(307),
            Some((FingerprintScheme::Maccs, 0))
        );
        assert_eq!(
            FingerprintScheme::locate(307 + 166 + 300),
            Some((FingerprintScheme::Pubchem, 300))
        );
        assert_eq!(
            FingerprintScheme::locate(6213),
            Some((FingerprintScheme::KlekotaRoth, 4859))
        );
        assert_eq!(FingerprintScheme::locate(6214), None);
    }

    #[test]
    fn combined_layout() {
        let fingerprinter = KeyTableFingerprinter::builtin().unwrap();
        let combined = fingerprinter.combined("CCO").unwrap();
        assert_eq!(combined.len(), 6214);

        // primary carbon, the first substructure key
        assert!(combined[0]);
        // MACCS key 164 ([#8]) sits after the 307 substructure bits
        assert!(combined[307 + 163]);
        // PubChem C(~C), C(~O), O(~H) and O(~C)(~H)
        for bit in [284, 286, 308, 410] {
            assert!(combined[307 + 166 + bit], "pubchem bit {bit}");
        }
        assert!(!combined[307 + 166 + 881..].any());

        let maccs = fingerprinter.fingerprint("CCO", FingerprintScheme::Maccs).unwrap();
        assert_eq!(maccs.as_bitslice(), &combined[307..307 + 166]);
    }

    #[test]
    fn assigned_bits() {
        let fingerprinter = KeyTableFingerprinter::builtin().unwrap();
        assert!(fingerprinter.is_assigned(0));
        assert!(!fingerprinter.is_assigned(306));
        assert!(fingerprinter.is_assigned(307 + 163));
        assert!(fingerprinter.is_assigned(307 + 166 + 459));
        assert!(!fingerprinter.is_assigned(307 + 166 + 460));
        assert!(!fingerprinter.is_assigned(307 + 166 + 881));
        assert!(!fingerprinter.is_assigned(6214));
    }

    #[test]
    fn invalid_smiles_is_a_scheme_error() {
        let fingerprinter = KeyTableFingerprinter::builtin().unwrap();
        assert!(matches!(
            fingerprinter.combined("not_a_smiles"),
            Err(ToolkitError::Scheme { .. })
        ));
    }
}
