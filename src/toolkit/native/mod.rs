//! Pure Rust molecule graphs for the CDK-derived parts of the fingerprint:
//! ECFP6 hashing and the library key tables.

use std::collections::BTreeSet;

pub mod aromaticity;
pub mod circular;
pub mod element;
pub mod matcher;
pub mod molecule;
pub mod rings;
pub mod smarts;
pub mod smiles;

pub use molecule::Molecule;
pub use smarts::SmartsPattern;

use crate::toolkit::{CircularToolkit, ToolkitError};

#[derive(Debug, Default, Clone, Copy)]
pub struct NativeToolkit;

impl CircularToolkit for NativeToolkit {
    type Molecule = Molecule;

    fn name(&self) -> &'static str {
        "native"
    }

    fn parse_smiles(&self, smiles: &str) -> Result<Molecule, ToolkitError> {
        smiles::parse_smiles(smiles)
    }

    fn circular_hashes(&self, mol: &Molecule) -> Result<BTreeSet<i32>, ToolkitError> {
        Ok(circular::ecfp6_hashes(mol))
    }
}
