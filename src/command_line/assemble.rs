use std::path::{Path, PathBuf};

use crate::assembler::{to_assembled, AssembledRow, FingerprintAssembler};
use crate::command_line::prelude::*;
use crate::dictionary::FeatureDictionary;
use crate::schemes::{FingerprintScheme, KeyTableFingerprinter};
use crate::table::{output_file_name, write_failure_report, FailureRecord, MoleculeTable};
use crate::toolkit::{NativeToolkit, RdkitToolkit};

pub const NAME: &str = "sirius6-fingerprint";

pub fn command() -> Command {
    Command::new(NAME)
        .about("Compute SIRIUS6 / CSI:FingerID fingerprints for a table of SMILES")
        .arg(
            Arg::new("SMILES")
                .help("Tab-separated table with a SMILES column")
                .required(true)
                .long("SMILES")
                .num_args(1),
        )
        .arg(
            Arg::new("sirius6_fingerid")
                .help("Tab-separated fingerprint dictionary (absoluteIndex, description)")
                .required(true)
                .long("sirius6_fingerid")
                .num_args(1),
        )
        .arg(
            Arg::new("output-dir")
                .help("Directory for the SIRIUS6_<input> file")
                .required(false)
                .long("output-dir")
                .short('o')
                .num_args(1),
        )
        .arg(
            Arg::new("scheme-keys")
                .help("Directory with <scheme>.tsv key tables for the library schemes")
                .required(false)
                .long("scheme-keys")
                .num_args(1),
        )
        .arg(
            Arg::new("allow-unassigned-keys")
                .help("Write 0 for library bits that have no key definition instead of aborting")
                .required(false)
                .long("allow-unassigned-keys")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("failure-report")
                .help("Write one JSON line per failed molecule")
                .required(false)
                .long("failure-report")
                .num_args(1),
        )
        .arg(
            Arg::new("threads")
                .help("Worker threads, 0 for one per CPU")
                .required(false)
                .long("threads")
                .short('t')
                .num_args(1)
                .default_value("0"),
        )
}

pub fn action(matches: &ArgMatches) -> eyre::Result<()> {
    let smiles_path = matches
        .get_one::<String>("SMILES")
        .ok_or(eyre::eyre!("Failed to extract SMILES path"))?;
    let dictionary_path = matches
        .get_one::<String>("sirius6_fingerid")
        .ok_or(eyre::eyre!("Failed to extract dictionary path"))?;
    let output_dir = matches
        .get_one::<String>("output-dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let scheme_keys = matches.get_one::<String>("scheme-keys");
    let failure_report = matches.get_one::<String>("failure-report");
    let allow_unassigned = matches.get_flag("allow-unassigned-keys");
    let threads: usize = matches
        .get_one::<String>("threads")
        .map(|t| t.parse())
        .transpose()?
        .unwrap_or(0);

    log::info!(
        "assembling fingerprints smiles={}, dictionary={}, output_dir={}",
        smiles_path,
        dictionary_path,
        output_dir.display()
    );

    if threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .map_err(|e| eyre::eyre!("could not start {} worker threads: {}", threads, e))?;
    }

    let run = Run {
        smiles_path: Path::new(smiles_path),
        dictionary_path: Path::new(dictionary_path),
        output_dir: &output_dir,
        scheme_keys: scheme_keys.map(Path::new),
        failure_report: failure_report.map(Path::new),
        allow_unassigned,
    };
    let output_path = run.execute()?;

    log::info!("wrote {}", output_path.display());
    Ok(())
}

/// One end-to-end conversion; kept apart from argument parsing so it can be
/// driven directly.
pub struct Run<'a> {
    pub smiles_path: &'a Path,
    pub dictionary_path: &'a Path,
    pub output_dir: &'a Path,
    pub scheme_keys: Option<&'a Path>,
    pub failure_report: Option<&'a Path>,
    /// Proceed when library rows point at bits without a key definition.
    pub allow_unassigned: bool,
}

impl<'a> Run<'a> {
    pub fn execute(&self) -> eyre::Result<PathBuf> {
        let dictionary = FeatureDictionary::from_path(self.dictionary_path)?;
        let table = MoleculeTable::from_path(self.smiles_path)?;

        let schemes = match self.scheme_keys {
            Some(dir) => KeyTableFingerprinter::with_key_dir(dir)?,
            None => KeyTableFingerprinter::builtin()?,
        };

        self.check_assigned(&dictionary, &schemes)?;

        let columns = dictionary.column_names();
        let assembler =
            FingerprintAssembler::new(dictionary, RdkitToolkit, NativeToolkit, Box::new(schemes));

        let smiles = table.smiles();
        let results = assembler.assemble_batch(&smiles);

        let mut failures = Vec::new();
        let mut rows: Vec<AssembledRow> = Vec::with_capacity(results.len());
        for (idx, result) in results.iter().enumerate() {
            if let Err(failure) = result {
                failures.push(FailureRecord {
                    row: idx,
                    smiles: smiles[idx].clone(),
                    kind: failure.kind,
                    message: failure.message.clone(),
                });
            }
            rows.push(to_assembled(result, assembler.width()));
        }

        log::info!(
            "{} molecules, {} failed, {} columns",
            rows.len(),
            failures.len(),
            assembler.width()
        );

        std::fs::create_dir_all(self.output_dir)?;
        let output_path = self.output_dir.join(output_file_name(self.smiles_path)?);
        let output = std::fs::File::create(&output_path)?;
        table.write_with_fingerprints(std::io::BufWriter::new(output), &columns, &rows)?;

        if let Some(report_path) = self.failure_report {
            let report = std::fs::File::create(report_path)?;
            write_failure_report(std::io::BufWriter::new(report), &failures)?;
            log::info!("{} failures written to {}", failures.len(), report_path.display());
        }

        Ok(output_path)
    }

    /// Library rows whose bit has no key would be written as 0 for every
    /// molecule.
    fn check_assigned(
        &self,
        dictionary: &FeatureDictionary,
        schemes: &KeyTableFingerprinter,
    ) -> eyre::Result<()> {
        let mut unassigned: Vec<(FingerprintScheme, usize)> = Vec::new();
        for feature in &dictionary.library {
            if schemes.is_assigned(feature.value) {
                continue;
            }
            if let Some((scheme, _)) = FingerprintScheme::locate(feature.value) {
                match unassigned.iter_mut().find(|(s, _)| *s == scheme) {
                    Some((_, count)) => *count += 1,
                    None => unassigned.push((scheme, 1)),
                }
            }
        }
        if unassigned.is_empty() {
            return Ok(());
        }

        let summary = unassigned
            .iter()
            .map(|(scheme, count)| format!("{} {}", count, scheme.name()))
            .collect::<Vec<_>>()
            .join(", ");
        if self.allow_unassigned {
            log::warn!("library bits without a key definition are written as 0: {}", summary);
            Ok(())
        } else {
            Err(eyre::eyre!(
                "dictionary uses library bits without a key definition ({}); supply them with --scheme-keys or pass --allow-unassigned-keys",
                summary
            ))
        }
    }
}
