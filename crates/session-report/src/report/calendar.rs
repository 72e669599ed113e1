//! Matching calendar days to sessions

use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::models::SessionRecord;

/// First session starting on `day`, in roster order
pub fn session_on(sessions: &[SessionRecord], day: NaiveDate) -> Option<&SessionRecord> {
    sessions.iter().find(|s| s.starts_on(day))
}

/// Days that have at least one session, for calendar markers
pub fn session_days(sessions: &[SessionRecord]) -> BTreeSet<NaiveDate> {
    sessions.iter().filter_map(SessionRecord::start_date).collect()
}
