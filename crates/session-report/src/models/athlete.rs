//! Coach-side roster of an athlete's sessions

use serde::{Deserialize, Serialize};

use super::session::SessionRecord;

/// Response of `GET /coach/athlete/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AthleteSessions {
    pub username: String,

    #[serde(default)]
    pub sessions: Vec<SessionRecord>,
}

impl AthleteSessions {
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
