use std::path::PathBuf;

/// Everything that can go wrong while discovering, parsing or exporting a payroll file.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid XML in {}: {source}", path.display())]
    Xml {
        path: PathBuf,
        #[source]
        source: quick_xml::DeError,
    },

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The file name does not start with a known kind prefix.
    #[error("Tipo de arquivo não suportado: {}", path.display())]
    UnsupportedKind { path: PathBuf },

    #[error("unknown file kind '{0}' (expected 'comissao' or 'vales')")]
    UnknownKind(String),

    #[error("invalid search pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("failed to read directory entry: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("file selection failed: {0}")]
    Selection(String),

    #[error("conversion task failed: {0}")]
    Task(String),
}

impl ConvertError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Io {
            path: path.into(),
            source,
        }
    }
}
