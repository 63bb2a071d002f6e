//! # contract: data model and pluggable seams of the conversion pipeline
//!
//! This module holds the plain data types deserialized from a payroll XML export
//! and the two traits the pipeline is generic over:
//!
//! - [`Exporter`] writes a parsed [`Empresa`] somewhere (the real implementation
//!   is [`crate::export::CsvExporter`]).
//! - [`FileSelector`] picks one file out of a list of candidates (the CLI backs
//!   it with an interactive terminal menu).
//!
//! ## Mocking & Testing
//! Both traits are annotated for `mockall`, so tests can drive the pipeline
//! without touching the terminal or the filesystem.
//!
//! ## Document shape
//! ```xml
//! <Comissao>
//!   <Empresa>
//!     <Fantasia>Loja</Fantasia>
//!     <Razao>Loja LTDA</Razao>
//!     <CNPJ>00000000000100</CNPJ>
//!     <MesAno>01/2024</MesAno>
//!     <Funcionario>
//!       <CPF>12345678900</CPF>
//!       <Valor>150.50</Valor>
//!       <MetaPremio>20.00</MetaPremio>
//!     </Funcionario>
//!   </Empresa>
//! </Comissao>
//! ```
//! `vales` files share the same shape under a `<Vales>` root; their
//! `MetaPremio` is ignored.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// The kind of payroll export, decided by the file name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Sales commission: `Valor` plus an optional `MetaPremio`.
    Comissao,
    /// Vouchers / salary advances: `Valor` only.
    Vales,
}

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Comissao => "comissao",
            FileKind::Vales => "vales",
        }
    }

    /// Detects the kind from the part of the file stem before the first `_`.
    ///
    /// `comissao_2024-01.xml` and `comissao.xml` are both comissao files.
    pub fn from_path(path: &Path) -> Option<FileKind> {
        let stem = path.file_stem()?.to_str()?;
        let prefix = stem.split('_').next()?;
        prefix.parse().ok()
    }
}

impl FromStr for FileKind {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("comissao") {
            Ok(FileKind::Comissao)
        } else if s.eq_ignore_ascii_case("vales") {
            Ok(FileKind::Vales)
        } else {
            Err(ConvertError::UnknownKind(s.to_string()))
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One employee line of the export.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Funcionario {
    #[serde(rename = "CPF")]
    pub cpf: String,
    /// Kept as text: it is copied verbatim into the CSV.
    #[serde(rename = "Valor")]
    pub valor: String,
    #[serde(rename = "MetaPremio", default)]
    pub meta_premio: Option<String>,
}

/// The company block, repeated on every CSV row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Empresa {
    #[serde(rename = "Fantasia")]
    pub fantasia: String,
    #[serde(rename = "Razao")]
    pub razao: String,
    #[serde(rename = "CNPJ")]
    pub cnpj: String,
    #[serde(rename = "MesAno")]
    pub mes_ano: String,
    #[serde(rename = "Funcionario", default)]
    pub funcionarios: Vec<Funcionario>,
}

/// Root element of an export. The root tag (`Comissao` / `Vales`) is not checked.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollDocument {
    #[serde(rename = "Empresa")]
    pub empresa: Empresa,
}

/// What an [`Exporter`] reports back after writing one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportSummary {
    pub kind: FileKind,
    pub csv_path: PathBuf,
    pub employees: usize,
    pub total_valor: f64,
    /// Only present for comissao exports.
    pub total_meta_premio: Option<f64>,
}

/// Result of converting a single XML file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConversionOutcome {
    Exported(ExportSummary),
    /// The document had no `Funcionario` entries; no CSV was written.
    NoEmployees { source: PathBuf },
}

/// Writes a parsed company block to `csv_path`.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait Exporter: Send + Sync {
    fn export(
        &self,
        kind: FileKind,
        empresa: &Empresa,
        csv_path: &Path,
    ) -> Result<ExportSummary, ConvertError>;
}

/// Chooses one of the discovered XML files.
///
/// Returns `Ok(None)` when the user backs out without choosing.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait FileSelector: Send + Sync {
    fn select(&self, candidates: &[PathBuf]) -> Result<Option<usize>, ConvertError>;
}
