//! RDKit-backed substructure search for the SMARTS and tailored partitions.
//!
//! RDKit query molecules are not thread safe, so compiled queries are kept as
//! validated SMARTS text and rebuilt per match.

use rdkit::{substruct_match, ROMol, RWMol, SubstructMatchParameters};

use crate::toolkit::{SubstructureToolkit, ToolkitError};

#[derive(Debug, Default, Clone, Copy)]
pub struct RdkitToolkit;

fn query_mol(smarts: &str) -> Result<ROMol, ToolkitError> {
    let query = RWMol::from_smarts(smarts).map_err(|e| ToolkitError::SmartsParse {
        smarts: smarts.to_string(),
        reason: format!("{}", e),
    })?;
    Ok(query.to_ro_mol())
}

impl SubstructureToolkit for RdkitToolkit {
    type Molecule = ROMol;
    type Query = String;

    fn name(&self) -> &'static str {
        "rdkit"
    }

    /// Sanitized parse; SMILES RDKit cannot kekulize or whose valences are
    /// impossible are rejected.
    fn parse_smiles(&self, smiles: &str) -> Result<ROMol, ToolkitError> {
        if smiles.trim().is_empty() {
            return Err(ToolkitError::SmilesParse {
                smiles: smiles.to_string(),
                reason: "empty SMILES".to_string(),
            });
        }
        ROMol::from_smiles(smiles).map_err(|e| ToolkitError::SmilesParse {
            smiles: smiles.to_string(),
            reason: format!("{}", e),
        })
    }

    fn compile_smarts(&self, smarts: &str) -> Result<String, ToolkitError> {
        query_mol(smarts)?;
        Ok(smarts.to_string())
    }

    fn has_substructure(&self, mol: &ROMol, query: &String) -> Result<bool, ToolkitError> {
        let query = query_mol(query)?;
        let params = SubstructMatchParameters::default();
        let matches = substruct_match(mol, &query, &params);
        Ok(!matches.is_empty())
    }
}
