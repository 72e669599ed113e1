//! Import-and-preview of an exported session file

use std::path::Path;

use crate::cli::render::{print_json, print_report};
use crate::cli::OutputFormat;
use crate::config::Settings;
use crate::error::Result;
use crate::report::Rounding;
use crate::view::SessionView;

/// Load a `.json` session file and print its report
pub async fn run(file: &str, format: OutputFormat) -> Result<()> {
    let settings = Settings::from_env()?;
    let view = SessionView::offline(settings);

    view.load_from_file(Path::new(file)).await?;

    if let Some(report) = view.report(Rounding::TwoDecimals) {
        match format {
            OutputFormat::Table => print_report(&report),
            OutputFormat::Json => print_json(&report)?,
        }
    }

    Ok(())
}
