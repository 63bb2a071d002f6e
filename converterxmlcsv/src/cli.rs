//! # converterxmlcsv CLI Interface
//!
//! Command parsing and orchestration for the `converterxmlcsv` binary. All
//! parsing/export logic lives in `converterxmlcsv-core`; this module wires it
//! to configuration, the terminal menu and console output.
//!
//! Running without a subcommand behaves like `convert` with no arguments:
//! list the `*.xml` files in the input directory, let the user pick one,
//! convert it, then wait for Enter.
//!
//! For programmatic/integration use, call [`run`] with a constructed [`Cli`]
//! and any [`FileSelector`].

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use converterxmlcsv_core::contract::{FileKind, FileSelector};
use converterxmlcsv_core::convert::{convert_all, convert_file, ConvertOptions};
use converterxmlcsv_core::discover::discover_xml_files;
use converterxmlcsv_core::export::CsvExporter;

use crate::load_config::{resolve_config, AppConfig};
use crate::present;

#[derive(Parser, Debug)]
#[command(
    name = "converterxmlcsv",
    version,
    about = "Converte arquivos XML de comissões ou vales para CSV"
)]
pub struct Cli {
    /// Path to the YAML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Output machine-readable JSON instead of coloured text
    #[arg(long, global = true)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert one XML file (chosen interactively unless given) or all of them
    Convert(ConvertArgs),
    /// List the XML files in the input directory with their detected kind
    List {
        /// Directory to search (defaults to the configured input directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Default)]
pub struct ConvertArgs {
    /// XML file to convert; skips the interactive menu
    pub file: Option<PathBuf>,
    /// Directory to search for XML files
    #[arg(long)]
    pub dir: Option<PathBuf>,
    /// Treat the input as this kind instead of reading it from the file name
    #[arg(long)]
    pub kind: Option<FileKind>,
    /// Directory for the generated CSV files
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    /// Convert every XML file found instead of picking one
    #[arg(long, conflicts_with = "file")]
    pub all: bool,
    /// Exit immediately instead of waiting for Enter
    #[arg(long)]
    pub no_pause: bool,
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli, selector: &dyn FileSelector) -> Result<()> {
    tracing::info!("trace_initialised");

    let config = resolve_config(cli.config.as_deref())?;
    config.trace_loaded();

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Convert(ConvertArgs::default()));

    match command {
        Commands::Convert(args) => {
            tracing::info!(command = "convert", "Starting conversion");
            let pause = config.pause_on_exit && !args.no_pause && !cli.json;
            if !cli.json {
                present::print_banner();
            }
            let result = convert_command(args, &config, cli.json, selector).await;
            if pause {
                present::wait_for_enter();
            }
            result
        }
        Commands::List { dir } => {
            tracing::info!(command = "list", "Listing XML files");
            let dir = dir.unwrap_or_else(|| config.input_dir.clone());
            list_command(&dir, cli.json)
        }
    }
}

async fn convert_command(
    args: ConvertArgs,
    config: &AppConfig,
    json: bool,
    selector: &dyn FileSelector,
) -> Result<()> {
    let options = ConvertOptions {
        kind_override: args.kind,
        output_dir: args.output_dir.or_else(|| config.output_dir.clone()),
    };

    if let Some(file) = args.file {
        return convert_single(&file, &options, config, json);
    }

    let dir = args.dir.unwrap_or_else(|| config.input_dir.clone());
    let files = discover_xml_files(&dir)
        .with_context(|| format!("failed to search {} for XML files", dir.display()))?;

    if files.is_empty() {
        tracing::warn!(dir = %dir.display(), "No XML files found");
        if json {
            println!("{}", serde_json::json!({ "files": [] }));
        } else {
            println!("{}", present::NO_XML_FILES.bright_red());
        }
        return Ok(());
    }

    if args.all {
        let total = files.len();
        let report = convert_all(files, options, config.delimiter).await;
        if json {
            println!(
                "{}",
                serde_json::to_string_pretty(&present::batch_json(&report))?
            );
        } else {
            present::print_batch(&report);
        }
        if report.failed() > 0 {
            tracing::error!(failed = report.failed(), total, "Batch conversion had failures");
            anyhow::bail!("{} of {} files failed to convert", report.failed(), total);
        }
        return Ok(());
    }

    let choice = selector
        .select(&files)
        .context("failed to choose an XML file")?;
    match choice.and_then(|i| files.get(i)) {
        Some(file) => convert_single(file, &options, config, json),
        None => {
            tracing::info!("Selection cancelled by user");
            if !json {
                println!("{}", present::SELECTION_CANCELLED.bright_yellow());
            }
            Ok(())
        }
    }
}

fn convert_single(
    file: &Path,
    options: &ConvertOptions,
    config: &AppConfig,
    json: bool,
) -> Result<()> {
    let exporter = CsvExporter::new(config.delimiter);
    let outcome = convert_file(file, options, &exporter)
        .with_context(|| format!("failed to convert {}", file.display()))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        present::print_outcome(&outcome);
    }
    Ok(())
}

fn list_command(dir: &Path, json: bool) -> Result<()> {
    let files = discover_xml_files(dir)
        .with_context(|| format!("failed to search {} for XML files", dir.display()))?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&present::list_json(&files))?
        );
    } else if files.is_empty() {
        println!("{}", present::NO_XML_FILES.bright_red());
    } else {
        for file in &files {
            println!("{}", present::list_line(file));
        }
    }
    Ok(())
}
