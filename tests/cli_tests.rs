use std::fs;

use sirius_fingerprint::command_line::assemble::{command, Run};
use tempdir::TempDir;

const DICTIONARY: &str = "relativeIndex\tabsoluteIndex\tdescription
0\t0\t[OX2H]
1\t1\tc1ccccc1
2\t525\tMACCS key 164
3\t7000\tECFP6:123
4\t6900\tbeyond the library schemes
5\t7001\t[#7]
";

const MOLECULES: &str = "id\tSMILES\tname
1\tCCO\tethanol
2\tnot_a_smiles\tbroken
3\tc1ccccc1N\taniline
";

#[test]
fn test_end_to_end_output_file() -> eyre::Result<()> {
    let dir = TempDir::new("sirius-fingerprint")?;
    let smiles_path = dir.path().join("molecules.tsv");
    let dictionary_path = dir.path().join("csi_fingerid.tsv");
    let report_path = dir.path().join("failures.jsonl");
    fs::write(&smiles_path, MOLECULES)?;
    fs::write(&dictionary_path, DICTIONARY)?;

    let out_dir = dir.path().join("out");
    let run = Run {
        smiles_path: &smiles_path,
        dictionary_path: &dictionary_path,
        output_dir: &out_dir,
        scheme_keys: None,
        failure_report: Some(&report_path),
        allow_unassigned: false,
    };
    let output_path = run.execute()?;
    assert_eq!(output_path, out_dir.join("SIRIUS6_molecules.tsv"));

    let output = fs::read_to_string(&output_path)?;
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines[0],
        "id\tSMILES\tname\tabsoluteIndex_0\tabsoluteIndex_1\tabsoluteIndex_525\tabsoluteIndex_7000\tabsoluteIndex_7001"
    );
    // 525 = 55 + 307 cdk bits + MACCS bit 163, which is key 164 ([#8])
    assert_eq!(lines[1], "1\tCCO\tethanol\t1\t0\t1\t0\t0");
    assert_eq!(lines[2], "2\tnot_a_smiles\tbroken\t\t\t\t\t");
    assert_eq!(lines[3], "3\tc1ccccc1N\taniline\t0\t1\t0\t0\t1");
    assert_eq!(lines.len(), 4);

    let report = fs::read_to_string(&report_path)?;
    let failures: Vec<serde_json::Value> = report
        .lines()
        .map(serde_json::from_str::<serde_json::Value>)
        .collect::<Result<Vec<_>, _>>()?;
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0]["row"], 1);
    assert_eq!(failures[0]["kind"], "molecule_parse");

    Ok(())
}

#[test]
fn test_scheme_key_directory() -> eyre::Result<()> {
    let dir = TempDir::new("sirius-fingerprint-keys")?;
    let keys_dir = dir.path().join("keys");
    fs::create_dir(&keys_dir)?;
    fs::write(
        keys_dir.join("cdk-substructure.tsv"),
        "bit\tdefinition\n0\t[OX2H]\n1\tunassigned\n2\t[#6] >1\n",
    )?;
    let smiles_path = dir.path().join("in.tsv");
    let dictionary_path = dir.path().join("dict.tsv");
    fs::write(&smiles_path, "SMILES\nCCO\nCO\n")?;
    fs::write(
        &dictionary_path,
        "absoluteIndex\tdescription\n55\tcdk 0\n57\tcdk 2\n",
    )?;

    let run = Run {
        smiles_path: &smiles_path,
        dictionary_path: &dictionary_path,
        output_dir: dir.path(),
        scheme_keys: Some(&keys_dir),
        failure_report: None,
        allow_unassigned: false,
    };
    let output = fs::read_to_string(run.execute()?)?;
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[1], "CCO\t1\t1");
    assert_eq!(lines[2], "CO\t1\t0");
    Ok(())
}

#[test]
fn test_unassigned_library_bits() -> eyre::Result<()> {
    let dir = TempDir::new("sirius-fingerprint-unassigned")?;
    let smiles_path = dir.path().join("in.tsv");
    let dictionary_path = dir.path().join("dict.tsv");
    fs::write(&smiles_path, "SMILES\nCCO\n")?;
    // cdk bit 0, klekota-roth bit 0
    fs::write(
        &dictionary_path,
        "absoluteIndex\tdescription\n55\tcdk 0\n1409\tkr 0\n",
    )?;

    let mut run = Run {
        smiles_path: &smiles_path,
        dictionary_path: &dictionary_path,
        output_dir: dir.path(),
        scheme_keys: None,
        failure_report: None,
        allow_unassigned: false,
    };
    let err = run.execute().unwrap_err();
    assert!(err.to_string().contains("1 klekota-roth"));
    assert!(!dir.path().join("SIRIUS6_in.tsv").exists());

    run.allow_unassigned = true;
    let output = fs::read_to_string(run.execute()?)?;
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], "SMILES\tabsoluteIndex_55\tabsoluteIndex_1409");
    assert_eq!(lines[1], "CCO\t1\t0");
    Ok(())
}

#[test]
fn test_malformed_dictionary_aborts() -> eyre::Result<()> {
    let dir = TempDir::new("sirius-fingerprint-bad")?;
    let smiles_path = dir.path().join("in.tsv");
    let dictionary_path = dir.path().join("dict.tsv");
    fs::write(&smiles_path, "SMILES\nCCO\n")?;
    fs::write(&dictionary_path, "absoluteIndex\tdescription\n0\tC\n0\tN\n")?;

    let run = Run {
        smiles_path: &smiles_path,
        dictionary_path: &dictionary_path,
        output_dir: dir.path(),
        scheme_keys: None,
        failure_report: None,
        allow_unassigned: false,
    };
    assert!(run.execute().is_err());
    assert!(!dir.path().join("SIRIUS6_in.tsv").exists());
    Ok(())
}

#[test]
fn test_command_line_arguments() {
    let matches = command()
        .try_get_matches_from([
            "sirius6-fingerprint",
            "--SMILES",
            "in.tsv",
            "--sirius6_fingerid",
            "csi_fingerid.tsv",
            "--threads",
            "2",
            "--allow-unassigned-keys",
        ])
        .unwrap();
    assert_eq!(matches.get_one::<String>("SMILES").unwrap(), "in.tsv");
    assert_eq!(matches.get_one::<String>("threads").unwrap(), "2");
    assert!(matches.get_flag("allow-unassigned-keys"));

    assert!(command()
        .try_get_matches_from(["sirius6-fingerprint", "--SMILES", "in.tsv"])
        .is_err());
}
