//! Hydrated JSON writer.

use crate::{validate_schema, HydratedCase};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Errors writing the hydrated record to disk. Schema violations are
/// not errors; only I/O and serialization failures are.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Write `hydrated_FCRA_<case_name>.json` into `output_dir`.
///
/// The record is validated first; violations are appended to
/// `warnings` and the file is written regardless. Returns the path of
/// the written file.
pub fn write_hydrated_json(
    case: &HydratedCase,
    case_name: &str,
    output_dir: &Path,
    warnings: &mut Vec<String>,
) -> Result<PathBuf, SchemaError> {
    let issues = validate_schema(case);
    if !issues.is_empty() {
        warn!("hydrated JSON failed schema validation: {} issues", issues.len());
        warnings.extend(
            issues
                .into_iter()
                .map(|issue| format!("Schema validation: {issue}")),
        );
    }

    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(format!("hydrated_FCRA_{case_name}.json"));
    let json = serde_json::to_string_pretty(case)?;
    std::fs::write(&path, json)?;

    info!("saved hydrated JSON to {}", path.display());
    Ok(path)
}
