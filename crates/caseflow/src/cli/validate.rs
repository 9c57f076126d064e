//! `caseflow validate` — run the validator suite over an existing
//! hydrated JSON file.

use anyhow::Context;
use caseflow_schema::HydratedCase;
use caseflow_validate::validate_case;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Table};
use std::path::Path;

pub fn run(hydrated_json: &Path) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(hydrated_json)
        .with_context(|| format!("failed to read {}", hydrated_json.display()))?;
    let case: HydratedCase = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a hydrated case record", hydrated_json.display()))?;

    let report = validate_case(&case);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Validator", "Issues"]);
    for (validator, issues) in &report.issues_by_validator {
        table.add_row(vec![validator.clone(), issues.len().to_string()]);
    }
    println!("{table}");

    if report.is_valid {
        println!("Record is legally sufficient.");
    } else {
        println!("Record has issues:");
        for issue in report.all_issues() {
            println!("  - {issue}");
        }
        anyhow::bail!("validation failed");
    }
    Ok(())
}
