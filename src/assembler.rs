use rayon::prelude::*;
use serde::Serialize;

use crate::dictionary::{Feature, FeatureDictionary};
use crate::schemes::SchemeFingerprinter;
use crate::toolkit::{CircularToolkit, SubstructureToolkit, ToolkitError};

/// One value per dictionary row, in dictionary order.
pub type FingerprintRow = Vec<u8>;

/// `None` marks a missing value; a failed molecule is all `None`.
pub type AssembledRow = Vec<Option<u8>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    MoleculeParse,
    PatternParse,
    Substructure,
    LibraryScheme,
    CircularFingerprint,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FailureKind::MoleculeParse => "molecule_parse",
            FailureKind::PatternParse => "pattern_parse",
            FailureKind::Substructure => "substructure",
            FailureKind::LibraryScheme => "library_scheme",
            FailureKind::CircularFingerprint => "circular_fingerprint",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct RowFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl RowFailure {
    fn new(kind: FailureKind, error: &ToolkitError) -> Self {
        RowFailure {
            kind,
            message: error.to_string(),
        }
    }
}

/// Builds SIRIUS fingerprint rows from SMILES.
///
/// SMARTS and tailored patterns run on `S`, ECFP6 hashes on `C`, library
/// schemes on the boxed `SchemeFingerprinter`. `S` and `C` each parse the
/// SMILES themselves. Patterns are compiled once; a pattern that does not
/// compile fails every row that reaches it.
pub struct FingerprintAssembler<S: SubstructureToolkit, C: CircularToolkit> {
    dictionary: FeatureDictionary,
    substructure: S,
    circular: C,
    schemes: Box<dyn SchemeFingerprinter>,
    smarts_queries: Vec<Result<S::Query, ToolkitError>>,
    tailored_queries: Vec<Result<S::Query, ToolkitError>>,
}

impl<S: SubstructureToolkit, C: CircularToolkit> FingerprintAssembler<S, C> {
    pub fn new(
        dictionary: FeatureDictionary,
        substructure: S,
        circular: C,
        schemes: Box<dyn SchemeFingerprinter>,
    ) -> Self {
        let smarts_queries = compile_all(&substructure, &dictionary.smarts);
        let tailored_queries = compile_all(&substructure, &dictionary.tailored);

        log::info!(
            "assembler ready: {} columns, substructure toolkit={}, circular toolkit={}",
            dictionary.len(),
            substructure.name(),
            circular.name()
        );

        FingerprintAssembler {
            dictionary,
            substructure,
            circular,
            schemes,
            smarts_queries,
            tailored_queries,
        }
    }

    pub fn dictionary(&self) -> &FeatureDictionary {
        &self.dictionary
    }

    /// Output length L.
    pub fn width(&self) -> usize {
        self.dictionary.len()
    }

    pub fn missing_row(&self) -> AssembledRow {
        vec![None; self.width()]
    }

    pub fn assemble(&self, smiles: &str) -> AssembledRow {
        match self.try_assemble(smiles) {
            Ok(row) => row.into_iter().map(Some).collect(),
            Err(failure) => {
                log::debug!("{}: {}", smiles, failure);
                self.missing_row()
            }
        }
    }

    pub fn try_assemble(&self, smiles: &str) -> Result<FingerprintRow, RowFailure> {
        let mut row = vec![0u8; self.width()];

        let mol = self
            .substructure
            .parse_smiles(smiles)
            .map_err(|e| RowFailure::new(FailureKind::MoleculeParse, &e))?;
        self.match_patterns(&mol, &self.dictionary.smarts, &self.smarts_queries, &mut row)?;

        if !self.dictionary.library.is_empty() {
            let combined = self
                .schemes
                .combined(smiles)
                .map_err(|e| RowFailure::new(FailureKind::LibraryScheme, &e))?;
            for feature in &self.dictionary.library {
                let bit = combined.get(feature.value).map(|b| *b).ok_or_else(|| RowFailure {
                    kind: FailureKind::LibraryScheme,
                    message: format!(
                        "offset {} outside the {}-bit library vector",
                        feature.value,
                        combined.len()
                    ),
                })?;
                row[feature.position] = u8::from(bit);
            }
        }

        let circular_mol = self
            .circular
            .parse_smiles(smiles)
            .map_err(|e| RowFailure::new(FailureKind::CircularFingerprint, &e))?;
        let hashes = self
            .circular
            .circular_hashes(&circular_mol)
            .map_err(|e| RowFailure::new(FailureKind::CircularFingerprint, &e))?;
        for feature in &self.dictionary.circular {
            row[feature.position] = u8::from(hashes.contains(&feature.value));
        }

        self.match_patterns(&mol, &self.dictionary.tailored, &self.tailored_queries, &mut row)?;

        Ok(row)
    }

    fn match_patterns(
        &self,
        mol: &S::Molecule,
        features: &[Feature<String>],
        queries: &[Result<S::Query, ToolkitError>],
        row: &mut FingerprintRow,
    ) -> Result<(), RowFailure> {
        for (feature, query) in features.iter().zip(queries) {
            let query = query
                .as_ref()
                .map_err(|e| RowFailure::new(FailureKind::PatternParse, e))?;
            let hit = self
                .substructure
                .has_substructure(mol, query)
                .map_err(|e| RowFailure::new(FailureKind::Substructure, &e))?;
            row[feature.position] = u8::from(hit);
        }
        Ok(())
    }

    /// Rows come back in input order whatever the scheduling.
    pub fn assemble_batch(&self, smiles: &[String]) -> Vec<Result<FingerprintRow, RowFailure>> {
        let results: Vec<Result<FingerprintRow, RowFailure>> = smiles
            .par_iter()
            .map(|s| self.try_assemble(s))
            .collect();

        for (idx, result) in results.iter().enumerate() {
            if let Err(failure) = result {
                log::debug!("row {} ({}) failed: {}", idx, smiles[idx], failure);
            }
        }
        results
    }
}

fn compile_all<S: SubstructureToolkit>(
    toolkit: &S,
    features: &[Feature<String>],
) -> Vec<Result<S::Query, ToolkitError>> {
    features
        .iter()
        .map(|feature| {
            let query = toolkit.compile_smarts(&feature.value);
            if let Err(e) = &query {
                log::warn!("absoluteIndex {}: {}", feature.absolute_index, e);
            }
            query
        })
        .collect()
}

/// Turns a batch result into output rows of width `width`.
pub fn to_assembled(result: &Result<FingerprintRow, RowFailure>, width: usize) -> AssembledRow {
    match result {
        Ok(row) => row.iter().map(|v| Some(*v)).collect(),
        Err(_) => vec![None; width],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::DictionaryRow;
    use crate::schemes::KeyTableFingerprinter;
    use crate::toolkit::{NativeToolkit, RdkitToolkit};

    fn assembler(rows: &[(i64, &str)]) -> FingerprintAssembler<RdkitToolkit, NativeToolkit> {
        let rows = rows
            .iter()
            .map(|(idx, desc)| DictionaryRow {
                absolute_index: *idx,
                description: desc.to_string(),
            })
            .collect();
        FingerprintAssembler::new(
            FeatureDictionary::from_rows(rows).unwrap(),
            RdkitToolkit,
            NativeToolkit,
            Box::new(KeyTableFingerprinter::builtin().unwrap()),
        )
    }

    #[test]
    fn smarts_partition() {
        let assembler = assembler(&[(0, "[OX2H]"), (1, "c1ccccc1")]);
        assert_eq!(assembler.assemble("CCO"), vec![Some(1), Some(0)]);
        assert_eq!(assembler.assemble("Oc1ccccc1"), vec![Some(1), Some(1)]);
    }

    #[test]
    fn invalid_smiles_gives_missing_row() {
        let assembler = assembler(&[(0, "[OX2H]"), (56, "maccs"), (9000, "ECFP6:1")]);
        let failure = assembler.try_assemble("not_a_smiles").unwrap_err();
        assert_eq!(failure.kind, FailureKind::MoleculeParse);
        assert_eq!(assembler.assemble("not_a_smiles"), vec![None, None, None]);
    }

    #[test]
    fn unkekulizable_smiles_gives_missing_row() {
        let assembler = assembler(&[(0, "[#6]"), (9000, "ECFP6:1")]);
        for smiles in ["c1cccc1", "c1ccnc1", ""] {
            let failure = assembler.try_assemble(smiles).unwrap_err();
            assert_eq!(failure.kind, FailureKind::MoleculeParse, "{smiles}");
            assert_eq!(assembler.assemble(smiles), vec![None, None]);
        }
    }

    #[test]
    fn bad_pattern_fails_rows() {
        let assembler = assembler(&[(0, "[OX2H"), (1, "C")]);
        let failure = assembler.try_assemble("CCO").unwrap_err();
        assert_eq!(failure.kind, FailureKind::PatternParse);
    }

    #[test]
    fn circular_partition_uses_hash_membership() {
        let hashes = NativeToolkit
            .circular_hashes(&NativeToolkit.parse_smiles("CCO").unwrap())
            .unwrap();
        let present = *hashes.iter().next().unwrap();
        let absent = (i32::MIN..).find(|h| !hashes.contains(h)).unwrap();
        let present = format!("ECFP6:{present}");
        let absent = format!("ECFP6:{absent}");
        let assembler = assembler(&[(6300, present.as_str()), (6301, absent.as_str())]);
        assert_eq!(assembler.assemble("CCO"), vec![Some(1), Some(0)]);
    }

    #[test]
    fn batch_keeps_input_order() {
        let assembler = assembler(&[(0, "[#7]"), (1, "[#8]")]);
        let smiles: Vec<String> = ["CN", "CO", "not_a_smiles", "NCO", "CC"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows: Vec<AssembledRow> = assembler
            .assemble_batch(&smiles)
            .iter()
            .map(|r| to_assembled(r, assembler.width()))
            .collect();
        assert_eq!(
            rows,
            vec![
                vec![Some(1), Some(0)],
                vec![Some(0), Some(1)],
                vec![None, None],
                vec![Some(1), Some(1)],
                vec![Some(0), Some(0)],
            ]
        );
    }
}
