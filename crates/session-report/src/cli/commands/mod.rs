pub mod athlete;
pub mod auth;
pub mod preview;
pub mod profile;

pub use athlete::{export as export_session, show as show_athlete};
pub use auth::{login, logout, status};
pub use preview::run as preview_file;
pub use profile::{show as show_profile, update as update_profile};
