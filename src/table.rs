//! Tab-separated molecule tables in and out.

use std::io::{Read, Write};
use std::path::Path;

use serde::Serialize;

use crate::assembler::{AssembledRow, FailureKind};

pub const SMILES_COLUMN: &str = "SMILES";
pub const OUTPUT_PREFIX: &str = "SIRIUS6_";

/// Input rows kept verbatim, with the position of the `SMILES` column.
#[derive(Debug, Clone)]
pub struct MoleculeTable {
    pub headers: Vec<String>,
    pub records: Vec<Vec<String>>,
    smiles_column: usize,
}

impl MoleculeTable {
    pub fn from_path(path: &Path) -> eyre::Result<Self> {
        let file = std::fs::File::open(path)
            .map_err(|e| eyre::eyre!("could not open {}: {}", path.display(), e))?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> eyre::Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
        let smiles_column = headers
            .iter()
            .position(|h| h == SMILES_COLUMN)
            .ok_or(eyre::eyre!("input table has no {} column", SMILES_COLUMN))?;

        // short rows are padded with empty fields; an empty SMILES then fails
        // to parse like any other bad structure
        let mut records = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            let record = record?;
            if record.len() > headers.len() {
                return Err(eyre::eyre!(
                    "row {} has {} fields, the header has {}",
                    idx + 1,
                    record.len(),
                    headers.len()
                ));
            }
            let mut fields: Vec<String> = record.iter().map(|field| field.to_string()).collect();
            fields.resize(headers.len(), String::new());
            records.push(fields);
        }

        Ok(MoleculeTable {
            headers,
            records,
            smiles_column,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn smiles(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|record| record[self.smiles_column].clone())
            .collect()
    }

    /// Input columns followed by one column per fingerprint value; missing
    /// values are written as empty fields.
    pub fn write_with_fingerprints<W: Write>(
        &self,
        writer: W,
        fingerprint_columns: &[String],
        rows: &[AssembledRow],
    ) -> eyre::Result<()> {
        if rows.len() != self.records.len() {
            return Err(eyre::eyre!(
                "{} fingerprint rows for {} molecules",
                rows.len(),
                self.records.len()
            ));
        }

        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(writer);

        writer.write_record(self.headers.iter().chain(fingerprint_columns.iter()))?;
        for (record, row) in self.records.iter().zip(rows) {
            let values = row.iter().map(|value| match value {
                Some(v) => v.to_string(),
                None => String::new(),
            });
            writer.write_record(record.iter().cloned().chain(values))?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// `SIRIUS6_<file name of the input>`.
pub fn output_file_name(input: &Path) -> eyre::Result<String> {
    let file_name = input
        .file_name()
        .ok_or(eyre::eyre!("could not extract file name from {}", input.display()))?
        .to_str()
        .ok_or(eyre::eyre!("could not convert file name to str"))?;
    Ok(format!("{}{}", OUTPUT_PREFIX, file_name))
}

#[derive(Debug, Clone, Serialize)]
pub struct FailureRecord {
    pub row: usize,
    pub smiles: String,
    pub kind: FailureKind,
    pub message: String,
}

/// One JSON object per line.
pub fn write_failure_report<W: Write>(mut writer: W, failures: &[FailureRecord]) -> eyre::Result<()> {
    for failure in failures {
        serde_json::to_writer(&mut writer, failure)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_and_writes_tsv() {
        let input = "id\tSMILES\tnote\n1\tCCO\tethanol\n2\tnot_a_smiles\t\n";
        let table = MoleculeTable::from_reader(input.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.smiles(), vec!["CCO", "not_a_smiles"]);

        let mut out = Vec::new();
        table
            .write_with_fingerprints(
                &mut out,
                &["absoluteIndex_0".to_string(), "absoluteIndex_7".to_string()],
                &[vec![Some(1), Some(0)], vec![None, None]],
            )
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "id\tSMILES\tnote\tabsoluteIndex_0\tabsoluteIndex_7\n1\tCCO\tethanol\t1\t0\n2\tnot_a_smiles\t\t\t\n"
        );
    }

    #[test]
    fn short_rows_are_padded() {
        let input = "id\tname\tSMILES\n1\tethanol\tCCO\n2\tunknown\n";
        let table = MoleculeTable::from_reader(input.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[1], vec!["2", "unknown", ""]);
        assert_eq!(table.smiles(), vec!["CCO", ""]);
    }

    #[test]
    fn long_rows_fail() {
        let input = "id\tSMILES\n1\tCCO\textra\n";
        assert!(MoleculeTable::from_reader(input.as_bytes()).is_err());
    }

    #[test]
    fn missing_smiles_column_fails() {
        assert!(MoleculeTable::from_reader("id\tsmiles\n1\tC\n".as_bytes()).is_err());
    }

    #[test]
    fn output_name_uses_file_name() {
        assert_eq!(
            output_file_name(Path::new("/data/in/library.tsv")).unwrap(),
            "SIRIUS6_library.tsv"
        );
    }

    #[test]
    fn failure_report_lines() {
        let mut out = Vec::new();
        write_failure_report(
            &mut out,
            &[FailureRecord {
                row: 3,
                smiles: "xx".to_string(),
                kind: FailureKind::MoleculeParse,
                message: "bad".to_string(),
            }],
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"row\":3,\"smiles\":\"xx\",\"kind\":\"molecule_parse\",\"message\":\"bad\"}\n"
        );
    }
}
