//! Hill-terrain breakdown for bar/doughnut charts

use serde::Serialize;

use super::chart::round2;
use crate::models::HillData;

pub const HILL_CATEGORIES: [&str; 5] = [
    "Number of Hills",
    "Avg Altitude",
    "Avg Ascent",
    "Distance in Hills",
    "Hills Share (%)",
];

pub const TERRAIN_LABELS: [&str; 2] = ["Hills", "Flat"];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HillBreakdown {
    /// Category names, parallel to `values`
    pub labels: Vec<&'static str>,
    pub values: Vec<Option<f64>>,
    /// `Hills`/`Flat` names, parallel to `terrain_split`
    pub terrain_labels: Vec<&'static str>,
    /// Percentages of hilly and flat terrain, summing to 100
    pub terrain_split: Vec<f64>,
}

impl HillBreakdown {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Shape `hill_data` for charting; absent data yields empty structures.
pub fn derive_hill_breakdown(hill_data: Option<&HillData>) -> HillBreakdown {
    let Some(hills) = hill_data else {
        return HillBreakdown::default();
    };

    let share = hills.clamped_share();
    let share_pct = share.map(|s| round2(s * 100.0));

    let (terrain_labels, terrain_split) = match share_pct {
        Some(pct) => (TERRAIN_LABELS.to_vec(), vec![pct, round2(100.0 - pct)]),
        None => (Vec::new(), Vec::new()),
    };

    HillBreakdown {
        labels: HILL_CATEGORIES.to_vec(),
        values: vec![
            hills.num_hills,
            hills.avg_altitude,
            hills.avg_ascent,
            hills.distance_hills,
            share_pct,
        ],
        terrain_labels,
        terrain_split,
    }
}
