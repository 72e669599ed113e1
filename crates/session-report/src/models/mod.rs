pub mod athlete;
pub mod profile;
pub mod session;

pub use athlete::AthleteSessions;
pub use profile::{Profile, ProfileUpdate};
pub use session::{parse_start_time, HillData, Position, SessionId, SessionRecord, Weather};
