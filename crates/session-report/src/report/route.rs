//! Route overview for the map panel

use serde::Serialize;

use crate::models::{Position, SessionRecord};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south_west: Position,
    pub north_east: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteOverview {
    pub start: Position,
    pub end: Position,
    /// Initial map center; the map opens on the start point
    pub center: Position,
    pub bounds: Bounds,
    pub points: usize,
}

/// Summarize a session's track for the map; `None` for an empty track
pub fn route_overview(session: &SessionRecord) -> Option<RouteOverview> {
    let start = session.first_position()?;
    let end = session.last_position()?;

    let mut sw = start;
    let mut ne = start;
    for p in &session.positions {
        sw.lat = sw.lat.min(p.lat);
        sw.lon = sw.lon.min(p.lon);
        ne.lat = ne.lat.max(p.lat);
        ne.lon = ne.lon.max(p.lon);
    }

    Some(RouteOverview {
        start,
        end,
        center: start,
        bounds: Bounds {
            south_west: sw,
            north_east: ne,
        },
        points: session.positions.len(),
    })
}
