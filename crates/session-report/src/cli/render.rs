//! Terminal rendering of derived session data

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::error::Result;
use crate::report::{format_optional, ChartSeries, HillBreakdown, SessionReport, SummaryRow};

/// Pretty-print any serializable value as JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_rows(rows: &[SummaryRow]) {
    for row in rows {
        println!("{:<16} {}", format!("{}:", row.label), row.display);
    }
}

fn print_series(series: &ChartSeries) {
    let range = series
        .range()
        .map(|(lo, hi)| format!("{} .. {}", format_optional(Some(lo)), format_optional(Some(hi))))
        .unwrap_or_else(|| "-".to_string());
    println!(
        "{:<12} {:>8} {:>8}   {}",
        series.label,
        series.values.len(),
        series.present(),
        range
    );
}

fn print_hills(hills: &HillBreakdown) {
    for (label, value) in hills.labels.iter().zip(&hills.values) {
        println!("{:<20} {}", format!("{}:", label), format_optional(*value));
    }
    if let [hilly, flat] = hills.terrain_split.as_slice() {
        println!("Terrain:             {}% hills / {}% flat", hilly, flat);
    }
}

/// Print the details panel of a session as tables
pub fn print_report(report: &SessionReport) {
    let title = report
        .date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown date".to_string());
    println!("Session Details on {}", title);
    println!("{}", "-".repeat(40));
    print_rows(&report.summary);

    println!();
    println!("{:<12} {:>8} {:>8}   {}", "Chart", "Samples", "Present", "Range");
    println!("{}", "-".repeat(50));
    for series in report.charts() {
        print_series(series);
    }

    if !report.weather.is_empty() {
        println!();
        println!("Weather");
        println!("{}", "-".repeat(40));
        print_rows(&report.weather);
    }

    if !report.hills.is_empty() {
        println!();
        println!("Hills");
        println!("{}", "-".repeat(40));
        print_hills(&report.hills);
    }

    if let Some(route) = &report.route {
        println!();
        println!("Route");
        println!("{}", "-".repeat(40));
        println!("Points:  {}", route.points);
        println!("Start:   {:.5}, {:.5}", route.start.lat, route.start.lon);
        println!("End:     {:.5}, {:.5}", route.end.lat, route.end.lon);
        println!(
            "Bounds:  {:.5}, {:.5} .. {:.5}, {:.5}",
            route.bounds.south_west.lat,
            route.bounds.south_west.lon,
            route.bounds.north_east.lat,
            route.bounds.north_east.lon
        );
    }
}

/// Print the calendar days that have sessions
pub fn print_session_days(username: &str, days: &BTreeSet<NaiveDate>) {
    println!("{}'s Profile", username);
    println!("{}", "-".repeat(40));
    if days.is_empty() {
        println!("No session data available for this athlete.");
        return;
    }
    println!("Days with sessions:");
    for day in days {
        println!("  {}", day.format("%Y-%m-%d (%a)"));
    }
}
