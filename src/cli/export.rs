//! Export CLI command

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::ValueEnum;

use crate::config::settings::Settings;
use crate::error::{SpendwiseError, SpendwiseResult};
use crate::export::{export_expenses_csv, export_full_json, export_full_yaml};
use crate::storage::Storage;

use super::require_user;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// Everything, as JSON
    Json,
    /// Everything, as YAML
    Yaml,
    /// Expenses only, as CSV
    Csv,
}

pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> SpendwiseResult<()> {
    let user = require_user(storage, settings)?;

    let mut writer: Box<dyn Write> = match &output {
        Some(path) => Box::new(BufWriter::new(File::create(path).map_err(|e| {
            SpendwiseError::Export(format!("Failed to create {}: {}", path.display(), e))
        })?)),
        None => Box::new(io::stdout().lock()),
    };

    match format {
        ExportFormat::Json => export_full_json(storage, &user, &mut writer, true)?,
        ExportFormat::Yaml => export_full_yaml(storage, &user, &mut writer)?,
        ExportFormat::Csv => {
            export_expenses_csv(storage, user.id, &mut writer)?;
        }
    }

    writer
        .flush()
        .map_err(|e| SpendwiseError::Export(e.to_string()))?;

    if let Some(path) = output {
        eprintln!("Exported to {}", path.display());
    }

    Ok(())
}
