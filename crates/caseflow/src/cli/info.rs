//! `caseflow info` — show supported formats and active settings.

use crate::config::CaseflowConfig;
use caseflow_extract::DecoderRegistry;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Table};

pub fn run(config: CaseflowConfig) -> anyhow::Result<()> {
    let registry = DecoderRegistry::standard();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Setting", "Value"]);
    table.add_row(vec![
        "Supported formats".to_string(),
        registry.supported_extensions().join(", "),
    ]);
    table.add_row(vec!["Firm".to_string(), config.firm.name.clone()]);
    table.add_row(vec![
        "Default court".to_string(),
        config.firm.default_court.clone(),
    ]);
    table.add_row(vec![
        "Default district".to_string(),
        config.firm.default_district.clone(),
    ]);
    println!("{table}");
    Ok(())
}
