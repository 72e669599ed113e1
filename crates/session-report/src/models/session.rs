//! Training session records as served by the coaching backend
//!
//! The same shape is written by the backend's JSON exporter, so an exported file
//! can be imported back into the preview without conversion.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend identifier of a session.
///
/// The backend emits integer keys but older exports carry them as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SessionId {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionId::Numeric(id) => write!(f, "{}", id),
            SessionId::Text(id) => f.write_str(id),
        }
    }
}

/// A point on the route, serialized as `[lat, lon]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

impl Position {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<(f64, f64)> for Position {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self { lat, lon }
    }
}

impl From<Position> for (f64, f64) {
    fn from(p: Position) -> Self {
        (p.lat, p.lon)
    }
}

/// Weather observed during the session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    /// Air temperature in °C
    #[serde(default)]
    pub temp_c: Option<f64>,

    /// Free-text condition ("Sunny", "Light rain", ...)
    #[serde(default)]
    pub condition: Option<String>,

    /// Wind speed in km/h
    #[serde(default)]
    pub wind_kph: Option<f64>,

    /// Relative humidity in percent
    #[serde(default)]
    pub humidity: Option<f64>,
}

/// Hill clustering computed by the backend from the altitude profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HillData {
    #[serde(default)]
    pub num_hills: Option<f64>,

    /// Mean altitude of the detected hills in meters
    #[serde(default)]
    pub avg_altitude: Option<f64>,

    /// Mean ascent per hill in meters
    #[serde(default)]
    pub avg_ascent: Option<f64>,

    /// Distance covered on hills
    #[serde(default)]
    pub distance_hills: Option<f64>,

    /// Fraction of the session spent on hills, nominally in `[0, 1]`
    #[serde(default)]
    pub hills_share: Option<f64>,
}

impl HillData {
    /// `hills_share` clamped to `[0, 1]`; non-finite values count as missing
    pub fn clamped_share(&self) -> Option<f64> {
        self.hills_share
            .filter(|s| s.is_finite())
            .map(|s| s.clamp(0.0, 1.0))
    }
}

/// One training session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Backend identifier, absent in hand-made files
    #[serde(rename = "sessionsID", default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,

    /// Start timestamp as sent by the backend
    #[serde(default)]
    pub start_time: Option<String>,

    /// Athlete name, present in roster listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default)]
    pub altitude_avg: Option<f64>,
    #[serde(default)]
    pub altitude_max: Option<f64>,
    #[serde(default)]
    pub altitude_min: Option<f64>,
    #[serde(default)]
    pub ascent: Option<f64>,
    #[serde(default)]
    pub descent: Option<f64>,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub distance: Option<f64>,

    /// Duration in seconds
    #[serde(default)]
    pub duration: Option<f64>,

    #[serde(default)]
    pub hr_avg: Option<f64>,
    #[serde(default)]
    pub hr_max: Option<f64>,
    #[serde(default)]
    pub hr_min: Option<f64>,
    #[serde(default)]
    pub total_distance: Option<f64>,

    /// Altitude per time step; `None` marks a missing sample
    #[serde(default, deserialize_with = "nullable_series")]
    pub altitudes: Vec<Option<f64>>,

    /// Heart rate per time step
    #[serde(default, deserialize_with = "nullable_series")]
    pub heartrates: Vec<Option<f64>>,

    /// Speed per time step
    #[serde(default, deserialize_with = "nullable_series")]
    pub speeds: Vec<Option<f64>>,

    #[serde(default, deserialize_with = "nullable_positions")]
    pub positions: Vec<Position>,

    #[serde(default)]
    pub weather: Option<Weather>,

    #[serde(default)]
    pub hill_data: Option<HillData>,

    /// Fields this client does not interpret, kept so re-exports are lossless
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A `null` series reads as an empty one
fn nullable_series<'de, D>(deserializer: D) -> Result<Vec<Option<f64>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Option<f64>>>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_positions<'de, D>(deserializer: D) -> Result<Vec<Position>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Position>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse the backend's `start_time` in any of the shapes it has emitted.
///
/// Timestamps with an offset keep their own wall-clock time; the offset is dropped
/// rather than converted.
pub fn parse_start_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

impl SessionRecord {
    /// Parsed start timestamp, `None` when missing or unparseable
    pub fn start_datetime(&self) -> Option<NaiveDateTime> {
        self.start_time.as_deref().and_then(parse_start_time)
    }

    /// Calendar day the session started on
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_datetime().map(|dt| dt.date())
    }

    pub fn starts_on(&self, day: NaiveDate) -> bool {
        self.start_date() == Some(day)
    }

    pub fn first_position(&self) -> Option<Position> {
        self.positions.first().copied()
    }

    pub fn last_position(&self) -> Option<Position> {
        self.positions.last().copied()
    }

    /// Length of the longest time series
    pub fn sample_count(&self) -> usize {
        self.altitudes
            .len()
            .max(self.heartrates.len())
            .max(self.speeds.len())
    }
}
