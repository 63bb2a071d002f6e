//! `load_config` module: loads the optional YAML settings file and layers
//! environment overrides on top of it.
//!
//! Precedence, lowest first: built-in defaults, the YAML file, environment
//! variables, command line flags (applied by the caller).
//!
//! # Errors
//! All errors use `anyhow::Error` and are surfaced at the CLI boundary.

use anyhow::Result;
use converterxmlcsv_core::export::DEFAULT_DELIMITER;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

pub const CONFIG_PATH_ENV: &str = "CONVERTERXMLCSV_CONFIG";
pub const INPUT_DIR_ENV: &str = "CONVERTERXMLCSV_INPUT_DIR";
pub const OUTPUT_DIR_ENV: &str = "CONVERTERXMLCSV_OUTPUT_DIR";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Where `*.xml` files are searched for.
    pub input_dir: PathBuf,
    /// `None` writes each CSV next to its XML file.
    pub output_dir: Option<PathBuf>,
    pub delimiter: u8,
    pub pause_on_exit: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_dir: None,
            delimiter: DEFAULT_DELIMITER,
            pause_on_exit: true,
        }
    }
}

impl AppConfig {
    pub fn trace_loaded(&self) {
        info!(
            input_dir = %self.input_dir.display(),
            output_dir = ?self.output_dir,
            delimiter = %char::from(self.delimiter),
            pause_on_exit = self.pause_on_exit,
            "Loaded AppConfig"
        );
        debug!(?self, "AppConfig loaded (full debug)");
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    input_dir: Option<PathBuf>,
    #[serde(default)]
    output_dir: Option<PathBuf>,
    #[serde(default)]
    delimiter: Option<String>,
    #[serde(default)]
    pause_on_exit: Option<bool>,
}

fn parse_delimiter(raw: &str) -> Result<u8> {
    match raw.as_bytes() {
        [b] if b.is_ascii() && !matches!(*b, b'"' | b'\n' | b'\r') => Ok(*b),
        _ => {
            error!(delimiter = %raw, "Invalid delimiter in config");
            anyhow::bail!("delimiter must be a single ASCII character other than a quote or line break, got {raw:?}")
        }
    }
}

fn apply_env_overrides(config: &mut AppConfig) {
    if let Some(dir) = std::env::var_os(INPUT_DIR_ENV).filter(|v| !v.is_empty()) {
        info!(var = INPUT_DIR_ENV, "Input directory overridden from env");
        config.input_dir = PathBuf::from(dir);
    }
    if let Some(dir) = std::env::var_os(OUTPUT_DIR_ENV).filter(|v| !v.is_empty()) {
        info!(var = OUTPUT_DIR_ENV, "Output directory overridden from env");
        config.output_dir = Some(PathBuf::from(dir));
    }
}

/// Loads the YAML settings file at `path` and applies environment overrides.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let raw: RawConfig = if config_content.trim().is_empty() {
        RawConfig::default()
    } else {
        match serde_yaml::from_str(&config_content) {
            Ok(conf) => {
                info!(config_path = ?path_ref, "Parsed config YAML successfully");
                conf
            }
            Err(e) => {
                error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
                return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
            }
        }
    };

    let defaults = AppConfig::default();
    let mut config = AppConfig {
        input_dir: raw.input_dir.unwrap_or(defaults.input_dir),
        output_dir: raw.output_dir,
        delimiter: match raw.delimiter.as_deref() {
            Some(d) => parse_delimiter(d)?,
            None => defaults.delimiter,
        },
        pause_on_exit: raw.pause_on_exit.unwrap_or(defaults.pause_on_exit),
    };
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Uses `explicit`, else the file named by `CONVERTERXMLCSV_CONFIG`, else defaults.
pub fn resolve_config(explicit: Option<&Path>) -> Result<AppConfig> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(|| {
            std::env::var_os(CONFIG_PATH_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        });
    match path {
        Some(path) => load_config(path),
        None => {
            debug!("No config file given, using defaults");
            let mut config = AppConfig::default();
            apply_env_overrides(&mut config);
            Ok(config)
        }
    }
}
