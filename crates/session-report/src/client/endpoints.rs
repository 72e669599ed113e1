//! Typed calls for the backend routes this client uses

use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use super::api::CoachClient;
use super::token::BearerToken;
use crate::error::{ReportError, Result};
use crate::models::{AthleteSessions, Profile, ProfileUpdate, SessionId};

/// Characters escaped inside a single path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

pub const PROFILE_PATH: &str = "/auth/profile";
pub const PROFILE_PICTURE_PATH: &str = "/auth/upload_profile_picture";
pub const PROFILE_PICTURE_FIELD: &str = "profile_picture";

/// Formats the backend can export a session to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Pdf,
    Json,
}

impl ExportFormat {
    /// Suffix used in the export route and as the file extension
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Json => "json",
        }
    }

    /// File name prefix for a saved export
    pub fn file_prefix(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "session_report",
            ExportFormat::Json => "session",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "json" => Ok(ExportFormat::Json),
            other => Err(ReportError::invalid_param(format!(
                "Unknown export format: {}. Supported: pdf, json",
                other
            ))),
        }
    }
}

fn segment(raw: &str) -> String {
    utf8_percent_encode(raw, PATH_SEGMENT).to_string()
}

pub fn athlete_path(athlete_id: &str) -> String {
    format!("/coach/athlete/{}", segment(athlete_id))
}

pub fn export_path(session_id: &SessionId, format: ExportFormat) -> String {
    format!(
        "/import_export/athlete/session/{}/export_{}",
        segment(&session_id.to_string()),
        format.as_str()
    )
}

impl CoachClient {
    /// Fetch an athlete's username and sessions
    pub async fn fetch_athlete(&self, token: &BearerToken, athlete_id: &str) -> Result<AthleteSessions> {
        self.get_json(token, &athlete_path(athlete_id)).await
    }

    /// Download a session export as raw bytes
    pub async fn export_session(
        &self,
        token: &BearerToken,
        session_id: &SessionId,
        format: ExportFormat,
    ) -> Result<Bytes> {
        self.download(token, &export_path(session_id, format)).await
    }

    /// Fetch the logged-in user's profile
    pub async fn fetch_profile(&self, token: &BearerToken) -> Result<Profile> {
        self.get_json(token, PROFILE_PATH).await
    }

    pub async fn update_profile(&self, token: &BearerToken, update: &ProfileUpdate) -> Result<()> {
        self.put_json(token, PROFILE_PATH, update).await?;
        Ok(())
    }

    pub async fn upload_profile_picture(&self, token: &BearerToken, picture: &Path) -> Result<()> {
        self.upload(token, PROFILE_PICTURE_PATH, PROFILE_PICTURE_FIELD, picture)
            .await?;
        Ok(())
    }
}
