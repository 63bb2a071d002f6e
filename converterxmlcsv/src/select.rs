use std::path::PathBuf;

use converterxmlcsv_core::contract::FileSelector;
use converterxmlcsv_core::ConvertError;
use dialoguer::Select;
use tracing::{debug, error};

pub const PROMPT: &str = "Escolha o arquivo XML a ser convertido:";

/// Terminal menu listing the candidate files by name; the first entry is preselected.
#[derive(Debug, Default, Clone, Copy)]
pub struct DialoguerSelector;

impl FileSelector for DialoguerSelector {
    fn select(&self, candidates: &[PathBuf]) -> Result<Option<usize>, ConvertError> {
        if candidates.is_empty() {
            return Ok(None);
        }
        let items: Vec<String> = candidates
            .iter()
            .map(|path| {
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string())
            })
            .collect();

        let choice = Select::new()
            .with_prompt(PROMPT)
            .items(&items)
            .default(0)
            .interact_opt()
            .map_err(|e| {
                error!(error = ?e, "Interactive selection failed");
                ConvertError::Selection(e.to_string())
            })?;
        debug!(?choice, "File selection made");
        Ok(choice)
    }
}
