//! Feature dictionary: which absolute fingerprint index is computed how.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::schemes::FingerprintScheme;

/// Indices below this are SMARTS patterns; library offsets count from it.
pub const LIBRARY_START: i64 = 55;
pub const ECFP_MARKER: &str = "ECFP6";
pub const ECFP_TAG: &str = "ECFP6:";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DictionaryRow {
    #[serde(rename = "absoluteIndex")]
    pub absolute_index: i64,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    Smarts,
    Library,
    Circular,
    Tailored,
}

/// One retained dictionary row and what it asks for. `position` is the
/// row's column in the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature<T> {
    pub position: usize,
    pub absolute_index: i64,
    pub value: T,
}

#[derive(Debug, Clone, Default)]
pub struct FeatureDictionary {
    rows: Vec<DictionaryRow>,
    pub smarts: Vec<Feature<String>>,
    pub library: Vec<Feature<usize>>,
    pub circular: Vec<Feature<i32>>,
    pub tailored: Vec<Feature<String>>,
}

impl FeatureDictionary {
    pub fn from_path(path: &Path) -> eyre::Result<Self> {
        let file = std::fs::File::open(path)
            .map_err(|e| eyre::eyre!("could not open dictionary {}: {}", path.display(), e))?;
        let dictionary = Self::from_reader(file)?;
        log::info!(
            "dictionary {}: {} features ({} smarts, {} library, {} ecfp6, {} tailored)",
            path.display(),
            dictionary.len(),
            dictionary.smarts.len(),
            dictionary.library.len(),
            dictionary.circular.len(),
            dictionary.tailored.len()
        );
        Ok(dictionary)
    }

    pub fn from_reader<R: Read>(reader: R) -> eyre::Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .quoting(false)
            .from_reader(reader);

        let mut rows = Vec::new();
        for row in reader.deserialize() {
            let row: DictionaryRow = row?;
            rows.push(row);
        }
        Self::from_rows(rows)
    }

    pub fn from_rows(rows: Vec<DictionaryRow>) -> eyre::Result<Self> {
        let mut seen = HashSet::with_capacity(rows.len());
        for row in &rows {
            if !seen.insert(row.absolute_index) {
                return Err(eyre::eyre!(
                    "duplicate absoluteIndex {} in dictionary",
                    row.absolute_index
                ));
            }
        }

        let max_circular = rows
            .iter()
            .filter(|row| is_circular(row))
            .map(|row| row.absolute_index)
            .max();
        let library_end = LIBRARY_START + FingerprintScheme::combined_width() as i64;
        if max_circular.is_none() && rows.iter().any(|row| row.absolute_index >= LIBRARY_START) {
            log::warn!(
                "dictionary has no {} rows, every index from {} is read as a library bit and no tailored patterns are computed",
                ECFP_MARKER,
                LIBRARY_START
            );
        }

        let mut dictionary = FeatureDictionary::default();
        for row in rows {
            let partition = partition_of(&row, max_circular);
            if partition == Partition::Library && row.absolute_index >= library_end {
                log::warn!(
                    "absoluteIndex {} is beyond the {} library scheme bits, dropping it",
                    row.absolute_index,
                    FingerprintScheme::combined_width()
                );
                continue;
            }

            let position = dictionary.rows.len();
            let absolute_index = row.absolute_index;
            match partition {
                Partition::Smarts => dictionary.smarts.push(Feature {
                    position,
                    absolute_index,
                    value: row.description.clone(),
                }),
                Partition::Tailored => dictionary.tailored.push(Feature {
                    position,
                    absolute_index,
                    value: row.description.clone(),
                }),
                Partition::Library => dictionary.library.push(Feature {
                    position,
                    absolute_index,
                    value: (absolute_index - LIBRARY_START) as usize,
                }),
                Partition::Circular => dictionary.circular.push(Feature {
                    position,
                    absolute_index,
                    value: parse_hash(&row.description)?,
                }),
            }
            dictionary.rows.push(row);
        }

        Ok(dictionary)
    }

    /// Output vector length.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[DictionaryRow] {
        &self.rows
    }

    pub fn column_names(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| format!("absoluteIndex_{}", row.absolute_index))
            .collect()
    }

    pub fn partition_at(&self, position: usize) -> Option<Partition> {
        if self.smarts.iter().any(|f| f.position == position) {
            Some(Partition::Smarts)
        } else if self.library.iter().any(|f| f.position == position) {
            Some(Partition::Library)
        } else if self.circular.iter().any(|f| f.position == position) {
            Some(Partition::Circular)
        } else if self.tailored.iter().any(|f| f.position == position) {
            Some(Partition::Tailored)
        } else {
            None
        }
    }
}

fn is_circular(row: &DictionaryRow) -> bool {
    row.absolute_index >= LIBRARY_START && row.description.contains(ECFP_MARKER)
}

fn partition_of(row: &DictionaryRow, max_circular: Option<i64>) -> Partition {
    if row.absolute_index < LIBRARY_START {
        Partition::Smarts
    } else if is_circular(row) {
        Partition::Circular
    } else if max_circular.map_or(false, |max| row.absolute_index > max) {
        Partition::Tailored
    } else {
        Partition::Library
    }
}

fn parse_hash(description: &str) -> eyre::Result<i32> {
    description
        .replace(ECFP_TAG, "")
        .trim()
        .parse::<i32>()
        .map_err(|e| eyre::eyre!("invalid ECFP6 hash `{}`: {}", description, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(absolute_index: i64, description: &str) -> DictionaryRow {
        DictionaryRow {
            absolute_index,
            description: description.to_string(),
        }
    }

    #[test]
    fn partitions_follow_index_ranges() {
        let dictionary = FeatureDictionary::from_rows(vec![
            row(0, "[OX2H]"),
            row(55, "maccs-bit"),
            row(8000, "ECFP6:-1234"),
            row(8001, "ECFP6:77"),
            row(9000, "c1ccccc1"),
        ])
        .unwrap();

        assert_eq!(dictionary.len(), 5);
        assert_eq!(dictionary.smarts[0].value, "[OX2H]");
        assert_eq!(dictionary.library[0].value, 0);
        assert_eq!(
            dictionary.circular.iter().map(|f| f.value).collect::<Vec<_>>(),
            vec![-1234, 77]
        );
        assert_eq!(dictionary.tailored[0].position, 4);
        assert_eq!(dictionary.partition_at(2), Some(Partition::Circular));
    }

    #[test]
    fn no_circular_rows_means_no_tailored_partition() {
        let dictionary =
            FeatureDictionary::from_rows(vec![row(3, "[#6]"), row(60, "x"), row(100, "y")]).unwrap();
        assert!(dictionary.tailored.is_empty());
        assert!(dictionary.circular.is_empty());
        assert_eq!(
            dictionary.library.iter().map(|f| f.value).collect::<Vec<_>>(),
            vec![5, 45]
        );
        assert_eq!(dictionary.partition_at(2), Some(Partition::Library));
    }

    #[test]
    fn out_of_range_library_rows_are_dropped() {
        let dictionary = FeatureDictionary::from_rows(vec![
            row(0, "[#6]"),
            row(6268, "last library bit"),
            row(6269, "beyond"),
            row(9000, "ECFP6:1"),
        ])
        .unwrap();
        assert_eq!(dictionary.len(), 3);
        assert_eq!(
            dictionary.column_names(),
            vec!["absoluteIndex_0", "absoluteIndex_6268", "absoluteIndex_9000"]
        );
        assert_eq!(dictionary.circular[0].position, 2);
    }

    #[test]
    fn duplicate_and_malformed_rows_fail() {
        assert!(FeatureDictionary::from_rows(vec![row(1, "C"), row(1, "N")]).is_err());
        assert!(FeatureDictionary::from_rows(vec![row(7000, "ECFP6:abc")]).is_err());
    }

    #[test]
    fn reads_tsv_with_extra_columns() {
        let tsv = "relativeIndex\tabsoluteIndex\tdescription\n0\t0\t[OX2H]\n1\t8000\tECFP6:42\n";
        let dictionary = FeatureDictionary::from_reader(tsv.as_bytes()).unwrap();
        assert_eq!(dictionary.len(), 2);
        assert_eq!(dictionary.circular[0].value, 42);
    }
}
