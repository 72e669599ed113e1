//! Coach commands: browse an athlete's sessions and export them

use chrono::NaiveDate;
use serde::Serialize;
use std::path::PathBuf;

use super::auth::require_token;
use crate::cli::render::{print_json, print_report, print_session_days};
use crate::cli::OutputFormat;
use crate::client::{CoachClient, ExportFormat};
use crate::config::{CredentialStore, Settings};
use crate::error::{ReportError, Result};
use crate::report::{Rounding, SessionReport};
use crate::view::{DirectorySink, ExportOutcome, ExportSkip, SessionView};

/// Build a backend-connected view for the profile's credentials
fn connect(profile: Option<String>) -> Result<SessionView> {
    let store = CredentialStore::new(profile)?;
    let token = require_token(&store)?;
    let settings = Settings::from_env()?;
    let client = CoachClient::new(&settings)?;
    Ok(SessionView::connected(client, token, settings))
}

/// Parse a `YYYY-MM-DD` argument
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ReportError::InvalidDateFormat(raw.to_string()))
}

#[derive(Serialize)]
struct AthleteOverview<'a> {
    username: &'a str,
    session_days: Vec<NaiveDate>,
    selected: Option<SessionReport>,
}

/// Show the athlete's session days and, with `date`, that day's session
pub async fn show(
    id: &str,
    date: Option<String>,
    format: OutputFormat,
    profile: Option<String>,
) -> Result<()> {
    let day = date.as_deref().map(parse_date).transpose()?;
    let view = connect(profile)?;

    view.load_athlete(id).await?;

    if let Some(day) = day {
        view.select_day(day);
    }

    let state = view.snapshot();
    let username = state
        .roster
        .as_ref()
        .map(|r| r.username.as_str())
        .unwrap_or("unknown");
    let days = view.session_days();
    let report = view.report(Rounding::TwoDecimals);

    match format {
        OutputFormat::Json => print_json(&AthleteOverview {
            username,
            session_days: days.into_iter().collect(),
            selected: report,
        })?,
        OutputFormat::Table => {
            print_session_days(username, &days);
            match (day, report) {
                (_, Some(report)) => {
                    println!();
                    print_report(&report);
                }
                (Some(day), None) => {
                    println!();
                    println!("No session on {}.", day);
                }
                (None, None) => {}
            }
        }
    }

    Ok(())
}

/// Export the athlete's session on `date` as PDF or JSON
pub async fn export(
    id: &str,
    date: &str,
    file_type: &str,
    output: Option<String>,
    profile: Option<String>,
) -> Result<()> {
    let day = parse_date(date)?;
    let format: ExportFormat = file_type.parse()?;
    let view = connect(profile)?;

    view.load_athlete(id).await?;
    view.select_day(day);

    let dir = output.map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    let sink = DirectorySink::new(dir);

    println!("Exporting session of {} as {}...", day, format.as_str().to_uppercase());

    match view.export(format, &sink).await? {
        ExportOutcome::Saved { file_name, bytes } => {
            println!("Saved to: {}", sink.path_for(&file_name).display());
            println!("Size: {} bytes", bytes);
        }
        ExportOutcome::Skipped(ExportSkip::NoSession) => {
            println!("No session on {}; nothing exported.", day);
        }
        ExportOutcome::Skipped(ExportSkip::MissingSessionId) => {
            println!("The session on {} has no id; nothing exported.", day);
        }
    }

    Ok(())
}
