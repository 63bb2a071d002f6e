//! Console messages shown to the user. Message builders return plain text so
//! tests can check wording; the `print_*` helpers add colour.

use std::io::stdin;
use std::path::{Path, PathBuf};

use colored::Colorize;
use converterxmlcsv_core::contract::{ConversionOutcome, ExportSummary, FileKind};
use converterxmlcsv_core::convert::{BatchReport, FileResult};
use serde_json::{json, Value};

pub const WELCOME: &str = "Bem-vindo ao Conversor XML para CSV!";
pub const AUTHOR: &str = "Desenvolvido por Jorge Beserra <jorgebeserra@gmail.com>";
pub const REPOSITORY: &str = "Repositório no GitHub: https://github.com/jorgebeserra/conversorxmlcsv";
pub const NO_XML_FILES: &str = "Não foram encontrados arquivos XML na pasta.";
pub const NO_EMPLOYEES: &str =
    "O arquivo XML não contém funcionários. Nenhum dado será exportado para o CSV.";
pub const PRESS_ENTER: &str = "Pressione Enter para sair...";
pub const SELECTION_CANCELLED: &str = "Nenhum arquivo selecionado.";

pub fn print_banner() {
    println!("{}", WELCOME.bright_green());
    println!("{}", AUTHOR.bright_yellow());
    println!("{}\n", REPOSITORY.bright_yellow());
}

pub fn summary_message(summary: &ExportSummary) -> String {
    let head = format!(
        "Dados exportados para {} com sucesso! \nQuantidade de funcionários: {}. ",
        summary.csv_path.display(),
        summary.employees
    );
    match summary.kind {
        FileKind::Comissao => format!(
            "{head}\nTotal de comissão: R$ {:.2}\nTotal por meta: R$ {:.2}",
            summary.total_valor,
            summary.total_meta_premio.unwrap_or(0.0)
        ),
        FileKind::Vales => format!("{head}\nTotal de vales: R$ {:.2}", summary.total_valor),
    }
}

pub fn print_outcome(outcome: &ConversionOutcome) {
    match outcome {
        ConversionOutcome::Exported(summary) => {
            println!("{}", summary_message(summary).bright_green())
        }
        ConversionOutcome::NoEmployees { .. } => println!("{}", NO_EMPLOYEES.bright_yellow()),
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// One line per batch entry: `[ok]`, `[vazio]` or `[erro]` followed by the file name.
pub fn batch_line(entry: &FileResult) -> String {
    let name = file_label(&entry.source);
    match &entry.result {
        Ok(ConversionOutcome::Exported(summary)) => format!(
            "[ok] {name} -> {} ({} funcionários, total R$ {:.2})",
            summary.csv_path.display(),
            summary.employees,
            summary.total_valor
        ),
        Ok(ConversionOutcome::NoEmployees { .. }) => format!("[vazio] {name}: {NO_EMPLOYEES}"),
        Err(e) => format!("[erro] {name}: {e}"),
    }
}

pub fn print_batch(report: &BatchReport) {
    for entry in &report.results {
        let line = batch_line(entry);
        match &entry.result {
            Ok(ConversionOutcome::Exported(_)) => println!("{}", line.bright_green()),
            Ok(ConversionOutcome::NoEmployees { .. }) => println!("{}", line.bright_yellow()),
            Err(_) => println!("{}", line.bright_red()),
        }
    }
    println!(
        "{}",
        format!(
            "Arquivos convertidos: {}. Falhas: {}.",
            report.succeeded(),
            report.failed()
        )
        .bright_cyan()
    );
}

pub fn batch_json(report: &BatchReport) -> Value {
    let results: Vec<Value> = report
        .results
        .iter()
        .map(|entry| match &entry.result {
            Ok(outcome) => json!({ "source": entry.source, "outcome": outcome }),
            Err(e) => json!({ "source": entry.source, "error": e.to_string() }),
        })
        .collect();
    json!({
        "succeeded": report.succeeded(),
        "failed": report.failed(),
        "results": results,
    })
}

/// `comissao`, `vales`, or `?` when the name has no known prefix.
pub fn list_line(path: &Path) -> String {
    let kind = FileKind::from_path(path).map_or("?", |k| k.as_str());
    format!("{kind:<9} {}", path.display())
}

pub fn list_json(files: &[PathBuf]) -> Value {
    Value::Array(
        files
            .iter()
            .map(|path| {
                json!({
                    "path": path,
                    "kind": FileKind::from_path(path).map(|k| k.as_str()),
                })
            })
            .collect(),
    )
}

pub fn wait_for_enter() {
    println!("{}", PRESS_ENTER.bright_cyan());
    let _ = stdin().read_line(&mut String::new());
}

#[cfg(test)]
mod tests {
    use super::*;
    use converterxmlcsv_core::ConvertError;

    fn summary(kind: FileKind) -> ExportSummary {
        ExportSummary {
            kind,
            csv_path: PathBuf::from("saida/comissao.csv"),
            employees: 3,
            total_valor: 1234.5,
            total_meta_premio: match kind {
                FileKind::Comissao => Some(99.999),
                FileKind::Vales => None,
            },
        }
    }

    #[test]
    fn comissao_summary_reports_both_totals() {
        let msg = summary_message(&summary(FileKind::Comissao));
        assert!(msg.starts_with("Dados exportados para saida/comissao.csv com sucesso!"));
        assert!(msg.contains("Quantidade de funcionários: 3."));
        assert!(msg.contains("Total de comissão: R$ 1234.50"));
        assert!(msg.contains("Total por meta: R$ 100.00"));
    }

    #[test]
    fn vales_summary_reports_voucher_total_only() {
        let msg = summary_message(&summary(FileKind::Vales));
        assert!(msg.ends_with("Total de vales: R$ 1234.50"));
        assert!(!msg.contains("meta"));
    }

    #[test]
    fn batch_json_counts_and_describes_errors() {
        let report = BatchReport {
            results: vec![
                FileResult {
                    source: PathBuf::from("comissao.xml"),
                    result: Ok(ConversionOutcome::Exported(summary(FileKind::Comissao))),
                },
                FileResult {
                    source: PathBuf::from("folha.xml"),
                    result: Err(ConvertError::UnsupportedKind {
                        path: PathBuf::from("folha.xml"),
                    }),
                },
            ],
        };
        let value = batch_json(&report);
        assert_eq!(value["succeeded"], 1);
        assert_eq!(value["failed"], 1);
        assert_eq!(value["results"][0]["outcome"]["status"], "exported");
        assert_eq!(value["results"][0]["outcome"]["employees"], 3);
        assert!(value["results"][1]["error"]
            .as_str()
            .unwrap()
            .contains("não suportado"));
    }

    #[test]
    fn list_line_marks_unknown_files() {
        assert!(list_line(Path::new("vales_01.xml")).starts_with("vales "));
        assert!(list_line(Path::new("outro.xml")).starts_with("? "));
    }
}
