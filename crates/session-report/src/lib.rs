pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod report;
pub mod view;

pub use error::{ReportError, Result, ViewError};
