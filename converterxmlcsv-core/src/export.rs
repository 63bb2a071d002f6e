use std::fs::File;
use std::path::Path;

use tracing::{debug, error, info};

use crate::contract::{Empresa, ExportSummary, Exporter, FileKind};
use crate::error::ConvertError;

pub const DEFAULT_DELIMITER: u8 = b';';

const COMISSAO_HEADER: [&str; 7] = [
    "Fantasia",
    "Razao",
    "CNPJ",
    "MesAno",
    "CPF",
    "Valor",
    "MetaPremio",
];
const VALES_HEADER: [&str; 6] = ["Fantasia", "Razao", "CNPJ", "MesAno", "CPF", "Valor"];

/// Parses a monetary amount for the totals.
///
/// Accepts plain `1234.56` and Brazilian `1.234,56`. Anything unparsable counts as zero,
/// including `1,234.56` where the comma is a thousands separator.
pub fn parse_amount(raw: &str) -> f64 {
    let raw = raw.trim();
    if let Ok(v) = raw.parse::<f64>() {
        return v;
    }
    if raw.rfind(',') > raw.rfind('.') {
        let normalised = raw.replace('.', "").replace(',', ".");
        if let Ok(v) = normalised.parse::<f64>() {
            return v;
        }
    }
    0.0
}

/// Writes one row per employee to a delimited file, company fields repeated on each row.
#[derive(Debug, Clone)]
pub struct CsvExporter {
    delimiter: u8,
}

impl CsvExporter {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

impl Exporter for CsvExporter {
    fn export(
        &self,
        kind: FileKind,
        empresa: &Empresa,
        csv_path: &Path,
    ) -> Result<ExportSummary, ConvertError> {
        info!(kind = %kind, csv_path = %csv_path.display(), "Writing CSV");
        let file = File::create(csv_path).map_err(|e| {
            error!(csv_path = %csv_path.display(), error = ?e, "Failed to create CSV file");
            ConvertError::io(csv_path, e)
        })?;

        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(file);

        match kind {
            FileKind::Comissao => writer.write_record(COMISSAO_HEADER)?,
            FileKind::Vales => writer.write_record(VALES_HEADER)?,
        }

        let mut total_valor = 0.0;
        let mut total_meta_premio = 0.0;

        for funcionario in &empresa.funcionarios {
            total_valor += parse_amount(&funcionario.valor);
            debug!(cpf = %funcionario.cpf, valor = %funcionario.valor, "Writing employee row");

            let company = [
                empresa.fantasia.as_str(),
                empresa.razao.as_str(),
                empresa.cnpj.as_str(),
                empresa.mes_ano.as_str(),
                funcionario.cpf.as_str(),
                funcionario.valor.as_str(),
            ];
            match kind {
                FileKind::Comissao => {
                    let meta_premio = funcionario.meta_premio.as_deref().unwrap_or("");
                    total_meta_premio += parse_amount(meta_premio);
                    writer.write_record(company.iter().copied().chain([meta_premio]))?;
                }
                FileKind::Vales => writer.write_record(company)?,
            }
        }

        writer
            .flush()
            .map_err(|e| ConvertError::io(csv_path, e))?;

        let summary = ExportSummary {
            kind,
            csv_path: csv_path.to_path_buf(),
            employees: empresa.funcionarios.len(),
            total_valor,
            total_meta_premio: match kind {
                FileKind::Comissao => Some(total_meta_premio),
                FileKind::Vales => None,
            },
        };
        info!(
            csv_path = %csv_path.display(),
            employees = summary.employees,
            total_valor = summary.total_valor,
            "CSV written"
        );
        Ok(summary)
    }
}
