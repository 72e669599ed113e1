//! Labeled scalar values for the session details table

use serde::Serialize;

use super::chart::round2;
use crate::models::{SessionRecord, Weather};

/// Placeholder shown for a missing value
pub const MISSING: &str = "-";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub label: &'static str,
    /// Value rounded to two decimals
    pub value: Option<f64>,
    /// Text to print, including the unit when there is one
    pub display: String,
}

impl SummaryRow {
    fn numeric(label: &'static str, value: Option<f64>, unit: Option<&str>) -> Self {
        let value = value.filter(|v| v.is_finite()).map(round2);
        let display = match (value, unit) {
            (Some(v), Some(unit)) => format!("{} {}", format_number(v), unit),
            (Some(v), None) => format_number(v),
            (None, _) => MISSING.to_string(),
        };
        Self {
            label,
            value,
            display,
        }
    }

    fn text(label: &'static str, value: Option<&str>) -> Self {
        Self {
            label,
            value: None,
            display: value
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(MISSING)
                .to_string(),
        }
    }
}

/// Format with at most two decimals, dropping trailing zeros
pub fn format_number(value: f64) -> String {
    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// Display an optional number, `-` when absent
pub fn format_optional(value: Option<f64>) -> String {
    value
        .filter(|v| v.is_finite())
        .map(|v| format_number(round2(v)))
        .unwrap_or_else(|| MISSING.to_string())
}

/// The twelve scalar rows of the session details table, in display order
pub fn summary_rows(session: &SessionRecord) -> Vec<SummaryRow> {
    vec![
        SummaryRow::numeric("Altitude Avg", session.altitude_avg, None),
        SummaryRow::numeric("Altitude Max", session.altitude_max, None),
        SummaryRow::numeric("Altitude Min", session.altitude_min, None),
        SummaryRow::numeric("Ascent", session.ascent, None),
        SummaryRow::numeric("Calories", session.calories, None),
        SummaryRow::numeric("Descent", session.descent, None),
        SummaryRow::numeric("Distance", session.distance, None),
        SummaryRow::numeric("Duration", session.duration, Some("seconds")),
        SummaryRow::numeric("HR Avg", session.hr_avg, None),
        SummaryRow::numeric("HR Max", session.hr_max, None),
        SummaryRow::numeric("HR Min", session.hr_min, None),
        SummaryRow::numeric("Total Distance", session.total_distance, None),
    ]
}

/// Weather rows; empty when the session has no weather record
pub fn weather_rows(weather: Option<&Weather>) -> Vec<SummaryRow> {
    let Some(weather) = weather else {
        return Vec::new();
    };

    vec![
        SummaryRow::numeric("Temperature", weather.temp_c, Some("°C")),
        SummaryRow::text("Condition", weather.condition.as_deref()),
        SummaryRow::numeric("Wind", weather.wind_kph, Some("kph")),
        SummaryRow::numeric("Humidity", weather.humidity, Some("%")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(120.0), "120");
        assert_eq!(format_number(10.5), "10.5");
        assert_eq!(format_number(3.14159), "3.14");
        assert_eq!(format_number(-0.001), "0");
    }

    #[test]
    fn test_missing_values_display_placeholder() {
        let rows = summary_rows(&SessionRecord::default());
        assert_eq!(rows.len(), 12);
        assert!(rows.iter().all(|r| r.value.is_none() && r.display == MISSING));
    }

    #[test]
    fn test_duration_has_unit() {
        let session = SessionRecord {
            duration: Some(3600.0),
            hr_avg: Some(142.678),
            ..Default::default()
        };
        let rows = summary_rows(&session);
        let duration = rows.iter().find(|r| r.label == "Duration").unwrap();
        assert_eq!(duration.display, "3600 seconds");
        let hr = rows.iter().find(|r| r.label == "HR Avg").unwrap();
        assert_eq!(hr.value, Some(142.68));
        assert_eq!(hr.display, "142.68");
    }

    #[test]
    fn test_weather_rows() {
        assert!(weather_rows(None).is_empty());

        let weather = Weather {
            temp_c: Some(18.25),
            condition: Some("Sunny".to_string()),
            wind_kph: None,
            humidity: Some(55.0),
        };
        let rows = weather_rows(Some(&weather));
        let displays: Vec<_> = rows.iter().map(|r| r.display.as_str()).collect();
        assert_eq!(displays, vec!["18.25 °C", "Sunny", "-", "55 %"]);
    }

    #[test]
    fn test_format_optional() {
        assert_eq!(format_optional(None), "-");
        assert_eq!(format_optional(Some(f64::INFINITY)), "-");
        assert_eq!(format_optional(Some(2.499)), "2.5");
    }
}
