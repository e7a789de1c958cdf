use std::collections::BTreeSet;

use sirius_fingerprint::assembler::{FailureKind, FingerprintAssembler};
use sirius_fingerprint::dictionary::FeatureDictionary;
use sirius_fingerprint::schemes::KeyTableFingerprinter;
use sirius_fingerprint::toolkit::{
    CircularToolkit, NativeToolkit, RdkitToolkit, SubstructureToolkit, ToolkitError,
};

#[test]
fn test_substructure_match() {
    let toolkit = RdkitToolkit;
    let mol = toolkit.parse_smiles("Oc1ccccc1").unwrap();

    let phenol = toolkit.compile_smarts("c[OX2H]").unwrap();
    let amine = toolkit.compile_smarts("[NX3]").unwrap();

    assert!(toolkit.has_substructure(&mol, &phenol).unwrap());
    assert!(!toolkit.has_substructure(&mol, &amine).unwrap());
}

#[test]
fn test_invalid_inputs() {
    let toolkit = RdkitToolkit;
    assert!(toolkit.parse_smiles("not_a_smiles").is_err());
    assert!(toolkit.parse_smiles("F(C)(C)(C)(C)(C)").is_err());
    assert!(toolkit.parse_smiles("c1cccc1").is_err());
    assert!(toolkit.parse_smiles("").is_err());
}

/// Circular toolkit that rejects every molecule.
struct RejectingCircular;

impl CircularToolkit for RejectingCircular {
    type Molecule = ();

    fn name(&self) -> &'static str {
        "rejecting"
    }

    fn parse_smiles(&self, smiles: &str) -> Result<(), ToolkitError> {
        Err(ToolkitError::SmilesParse {
            smiles: smiles.to_string(),
            reason: "rejected".to_string(),
        })
    }

    fn circular_hashes(&self, _mol: &()) -> Result<BTreeSet<i32>, ToolkitError> {
        Ok(BTreeSet::new())
    }
}

#[test]
fn test_circular_hashes_come_from_the_circular_toolkit() -> eyre::Result<()> {
    let mol = NativeToolkit.parse_smiles("CCO")?;
    let hash = *NativeToolkit
        .circular_hashes(&mol)?
        .iter()
        .next()
        .ok_or(eyre::eyre!("no hashes"))?;
    let tsv = format!("absoluteIndex\tdescription\n0\t[OX2H]\n7000\tECFP6:{}\n", hash);

    let assembler = FingerprintAssembler::new(
        FeatureDictionary::from_reader(tsv.as_bytes())?,
        RdkitToolkit,
        NativeToolkit,
        Box::new(KeyTableFingerprinter::builtin()?),
    );
    assert_eq!(assembler.assemble("CCO"), vec![Some(1), Some(1)]);
    assert_eq!(assembler.assemble("OCC"), vec![Some(1), Some(1)]);

    let rejecting = FingerprintAssembler::new(
        FeatureDictionary::from_reader(tsv.as_bytes())?,
        RdkitToolkit,
        RejectingCircular,
        Box::new(KeyTableFingerprinter::builtin()?),
    );
    let failure = rejecting.try_assemble("CCO").unwrap_err();
    assert_eq!(failure.kind, FailureKind::CircularFingerprint);
    assert_eq!(rejecting.assemble("CCO"), vec![None, None]);
    Ok(())
}
