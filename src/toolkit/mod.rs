use std::collections::BTreeSet;

pub mod native;
pub mod rdkit;

pub use native::NativeToolkit;
pub use rdkit::RdkitToolkit;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolkitError {
    #[error("could not parse SMILES `{smiles}`: {reason}")]
    SmilesParse { smiles: String, reason: String },
    #[error("could not parse SMARTS `{smarts}`: {reason}")]
    SmartsParse { smarts: String, reason: String },
    #[error("substructure match failed: {0}")]
    Match(String),
    #[error("circular fingerprint failed: {0}")]
    Circular(String),
    #[error("{scheme} fingerprint failed: {reason}")]
    Scheme { scheme: String, reason: String },
    #[error("toolkit backend error: {0}")]
    Backend(String),
}

/// Structure parsing and SMARTS substructure search for the pattern
/// partitions.
pub trait SubstructureToolkit: Send + Sync {
    type Molecule;
    type Query: Send + Sync;

    fn name(&self) -> &'static str;

    fn parse_smiles(&self, smiles: &str) -> Result<Self::Molecule, ToolkitError>;

    fn compile_smarts(&self, smarts: &str) -> Result<Self::Query, ToolkitError>;

    fn has_substructure(
        &self,
        mol: &Self::Molecule,
        query: &Self::Query,
    ) -> Result<bool, ToolkitError>;
}

/// Structure parsing and ECFP6 hashing for the circular partition. Parses
/// the SMILES itself, independently of the substructure toolkit.
pub trait CircularToolkit: Send + Sync {
    type Molecule;

    fn name(&self) -> &'static str;

    fn parse_smiles(&self, smiles: &str) -> Result<Self::Molecule, ToolkitError>;

    /// Distinct ECFP6 hash codes present in the molecule.
    fn circular_hashes(&self, mol: &Self::Molecule) -> Result<BTreeSet<i32>, ToolkitError>;
}
