pub mod api;
pub mod endpoints;
pub mod token;

pub use api::CoachClient;
pub use endpoints::ExportFormat;
pub use token::BearerToken;
