use std::sync::Arc;

use crate::error::ViewError;
use crate::models::{AthleteSessions, SessionRecord};

/// Snapshot of everything a renderer needs.
///
/// Published whole on every transition, so a subscriber never observes a half
/// applied load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    /// Session shown in the details panel
    pub session: Option<Arc<SessionRecord>>,
    /// Athlete roster, set by a backend load
    pub roster: Option<Arc<AthleteSessions>>,
    /// Last user-facing error; cleared by the next successful load
    pub error: Option<ViewError>,
    /// A backend load is in flight
    pub loading: bool,
}

impl ViewState {
    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Loaded, but the athlete has no sessions
    pub fn is_empty_roster(&self) -> bool {
        self.roster.as_ref().is_some_and(|r| r.is_empty())
    }
}

/// What happened to a completed backend load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response was published
    Applied,
    /// A newer load started meanwhile; the response was dropped
    Stale,
}
