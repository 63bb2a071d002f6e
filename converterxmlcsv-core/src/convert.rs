//! High-level pipeline: orchestrates kind detection → XML parsing → CSV export.
//!
//! # Major Types
//! - [`ConvertOptions`]: per-run overrides (forced kind, output directory)
//! - [`BatchReport`]: per-file results of [`convert_all`]
//!
//! # Responsibilities
//! - Single-file conversion is fail-fast: the first failing step returns its error
//! - Batch conversion isolates files: one broken export never stops the others
//! - A document without employees produces no CSV at all
//!
//! # Navigation
//! - Single file: [`convert_file`]
//! - Many files: [`convert_all`]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::join_all;
use tracing::{error, info, warn};

use crate::contract::{ConversionOutcome, Exporter, FileKind};
use crate::error::ConvertError;
use crate::export::CsvExporter;
use crate::parse::parse_file;

#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Skip file name detection and treat every input as this kind.
    pub kind_override: Option<FileKind>,
    /// Write CSVs here instead of next to their XML source.
    pub output_dir: Option<PathBuf>,
}

/// Where the CSV for `source` goes: same stem, `.csv` extension.
pub fn csv_path_for(source: &Path, output_dir: Option<&Path>) -> PathBuf {
    let local = source.with_extension("csv");
    match (output_dir, local.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => local,
    }
}

/// Converts one XML export using `exporter`.
pub fn convert_file<E>(
    source: &Path,
    options: &ConvertOptions,
    exporter: &E,
) -> Result<ConversionOutcome, ConvertError>
where
    E: Exporter + ?Sized,
{
    let kind = match options.kind_override.or_else(|| FileKind::from_path(source)) {
        Some(kind) => kind,
        None => {
            error!(path = %source.display(), "File name does not start with a known kind");
            return Err(ConvertError::UnsupportedKind {
                path: source.to_path_buf(),
            });
        }
    };
    info!(path = %source.display(), kind = %kind, "[CONVERT] Starting conversion");

    let empresa = parse_file(source)?;

    if empresa.funcionarios.is_empty() {
        warn!(path = %source.display(), "[CONVERT] No employees in document, nothing exported");
        return Ok(ConversionOutcome::NoEmployees {
            source: source.to_path_buf(),
        });
    }

    if let Some(dir) = &options.output_dir {
        if !dir.exists() {
            std::fs::create_dir_all(dir).map_err(|e| {
                error!(dir = %dir.display(), error = ?e, "Failed to create output directory");
                ConvertError::io(dir, e)
            })?;
        }
    }

    let csv_path = csv_path_for(source, options.output_dir.as_deref());
    let summary = exporter.export(kind, &empresa, &csv_path)?;
    info!(
        path = %source.display(),
        csv_path = %summary.csv_path.display(),
        employees = summary.employees,
        "[CONVERT] Conversion succeeded"
    );
    Ok(ConversionOutcome::Exported(summary))
}

/// Result for one file of a batch run.
#[derive(Debug)]
pub struct FileResult {
    pub source: PathBuf,
    pub result: Result<ConversionOutcome, ConvertError>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    /// Same order as the input paths.
    pub results: Vec<FileResult>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }
}

/// Converts every file in `sources` concurrently on blocking worker threads.
pub async fn convert_all(
    sources: Vec<PathBuf>,
    options: ConvertOptions,
    delimiter: u8,
) -> BatchReport {
    info!(files = sources.len(), "[BATCH] Starting batch conversion");
    let options = Arc::new(options);
    let exporter = Arc::new(CsvExporter::new(delimiter));

    let tasks = sources.into_iter().map(|source| {
        let options = Arc::clone(&options);
        let exporter = Arc::clone(&exporter);
        async move {
            let worker_source = source.clone();
            let joined = tokio::task::spawn_blocking(move || {
                convert_file(&worker_source, &options, exporter.as_ref())
            })
            .await;
            let result = match joined {
                Ok(result) => result,
                Err(e) => {
                    error!(path = %source.display(), error = ?e, "[BATCH] Conversion task failed");
                    Err(ConvertError::Task(e.to_string()))
                }
            };
            FileResult { source, result }
        }
    });

    let report = BatchReport {
        results: join_all(tasks).await,
    };
    info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        "[BATCH] Batch conversion finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_path_sits_next_to_source_by_default() {
        assert_eq!(
            csv_path_for(Path::new("in/comissao_01.xml"), None),
            PathBuf::from("in/comissao_01.csv")
        );
    }

    #[test]
    fn csv_path_moves_into_output_dir() {
        assert_eq!(
            csv_path_for(Path::new("in/vales.xml"), Some(Path::new("out"))),
            PathBuf::from("out/vales.csv")
        );
    }

    #[test]
    fn unsupported_name_fails_before_reading() {
        let exporter = crate::contract::MockExporter::new();
        let err = convert_file(
            Path::new("does-not-exist/folha.xml"),
            &ConvertOptions::default(),
            &exporter,
        )
        .unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedKind { .. }), "got {err:?}");
    }
}
