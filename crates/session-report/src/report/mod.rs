//! Display-ready structures derived from a session record
//!
//! Everything here is a pure function of its input. Renderers (the CLI tables,
//! a web front end, a PDF template) consume these instead of the raw record.

pub mod calendar;
pub mod chart;
pub mod hills;
pub mod route;
pub mod summary;

pub use calendar::{session_days, session_on};
pub use chart::{derive_chart_series, round2, ChartSeries, Rounding};
pub use hills::{derive_hill_breakdown, HillBreakdown};
pub use route::{route_overview, Bounds, RouteOverview};
pub use summary::{format_number, format_optional, summary_rows, weather_rows, SummaryRow};

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::SessionRecord;

/// Everything the session details panel shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub date: Option<NaiveDate>,
    pub summary: Vec<SummaryRow>,
    pub altitude: ChartSeries,
    pub heart_rate: ChartSeries,
    pub speed: ChartSeries,
    pub hills: HillBreakdown,
    pub weather: Vec<SummaryRow>,
    pub route: Option<RouteOverview>,
}

impl SessionReport {
    pub fn build(session: &SessionRecord, rounding: Rounding) -> Self {
        Self {
            date: session.start_date(),
            summary: summary_rows(session),
            altitude: derive_chart_series(&session.altitudes, "Altitude", rounding),
            heart_rate: derive_chart_series(&session.heartrates, "Heart Rate", rounding),
            speed: derive_chart_series(&session.speeds, "Speed", rounding),
            hills: derive_hill_breakdown(session.hill_data.as_ref()),
            weather: weather_rows(session.weather.as_ref()),
            route: route_overview(session),
        }
    }

    /// The three time-series charts in display order
    pub fn charts(&self) -> [&ChartSeries; 3] {
        [&self.altitude, &self.heart_rate, &self.speed]
    }
}
