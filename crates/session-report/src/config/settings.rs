//! Runtime settings, read from the environment

use chrono::format::{Item, StrftimeItems};
use std::time::Duration;

use crate::error::{ReportError, Result};

pub const BASE_URL_VAR: &str = "SESSION_REPORT_BASE_URL";
pub const TIMEOUT_VAR: &str = "SESSION_REPORT_TIMEOUT_SECS";
pub const MAX_RETRIES_VAR: &str = "SESSION_REPORT_MAX_RETRIES";
pub const RETRY_BACKOFF_VAR: &str = "SESSION_REPORT_RETRY_BACKOFF_MS";
pub const DATE_FORMAT_VAR: &str = "SESSION_REPORT_DATE_FORMAT";

const DEFAULT_BASE_URL: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_RETRY_BACKOFF_MS: u64 = 250;
const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Backend root, without a trailing slash
    pub base_url: String,
    /// Upper bound for one backend call, retries and backoff included
    pub request_timeout: Duration,
    /// Extra attempts after a network failure; HTTP errors are never retried
    pub max_retries: u32,
    /// Delay before the first retry, doubled for each further one
    pub retry_backoff: Duration,
    /// strftime pattern for dates in export file names
    pub date_format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from `SESSION_REPORT_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(url) = lookup(BASE_URL_VAR) {
            settings.base_url = url;
        }
        if let Some(secs) = lookup(TIMEOUT_VAR) {
            settings.request_timeout = Duration::from_secs(parse_number(TIMEOUT_VAR, &secs)?);
        }
        if let Some(retries) = lookup(MAX_RETRIES_VAR) {
            settings.max_retries = parse_number(MAX_RETRIES_VAR, &retries)?;
        }
        if let Some(ms) = lookup(RETRY_BACKOFF_VAR) {
            settings.retry_backoff = Duration::from_millis(parse_number(RETRY_BACKOFF_VAR, &ms)?);
        }
        if let Some(format) = lookup(DATE_FORMAT_VAR) {
            settings.date_format = format;
        }

        settings.validate()
    }

    /// Point the settings at another backend
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Check invariants and normalize the base URL
    pub fn validate(mut self) -> Result<Self> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ReportError::config(format!(
                "{} must start with http:// or https://, got '{}'",
                BASE_URL_VAR, self.base_url
            )));
        }
        self.base_url = trimmed.to_string();

        if self.request_timeout.is_zero() {
            return Err(ReportError::config(format!("{} must be positive", TIMEOUT_VAR)));
        }

        if self.date_format.is_empty()
            || StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error))
        {
            return Err(ReportError::config(format!(
                "{} is not a valid strftime pattern: '{}'",
                DATE_FORMAT_VAR, self.date_format
            )));
        }

        Ok(self)
    }
}

fn parse_number<T: std::str::FromStr>(var: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| ReportError::config(format!("{} must be a non-negative integer, got '{}'", var, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup(&[
            (BASE_URL_VAR, "https://coach.example.com/"),
            (TIMEOUT_VAR, "5"),
            (MAX_RETRIES_VAR, "0"),
            (DATE_FORMAT_VAR, "%d.%m.%Y"),
        ]))
        .unwrap();
        assert_eq!(settings.base_url, "https://coach.example.com");
        assert_eq!(settings.request_timeout, Duration::from_secs(5));
        assert_eq!(settings.max_retries, 0);
        assert_eq!(settings.date_format, "%d.%m.%Y");
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Settings::from_lookup(lookup(&[(BASE_URL_VAR, "localhost:5000")])).is_err());
        assert!(Settings::from_lookup(lookup(&[(TIMEOUT_VAR, "0")])).is_err());
        assert!(Settings::from_lookup(lookup(&[(TIMEOUT_VAR, "soon")])).is_err());
        assert!(Settings::from_lookup(lookup(&[(DATE_FORMAT_VAR, "%Q")])).is_err());
    }
}
