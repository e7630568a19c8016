//! Date formatting.

use std::fmt::Write;

use chrono::{
    DateTime, Utc,
    format::{Item, StrftimeItems},
};

use crate::error::{BookingError, Result};

/// Default date pattern (`31.12.2026`).
pub const DEFAULT_DATE_PATTERN: &str = "%d.%m.%Y";

/// Renders dates for dialog texts.
pub trait DateFormatter: Send + Sync {
    /// Formats a date for display.
    fn format_date(&self, date: DateTime<Utc>) -> String;
}

/// [`DateFormatter`] backed by a chrono strftime pattern.
#[derive(Debug, Clone)]
pub struct PatternDateFormatter {
    pattern: String,
}

impl Default for PatternDateFormatter {
    fn default() -> Self {
        Self { pattern: DEFAULT_DATE_PATTERN.to_owned() }
    }
}

impl PatternDateFormatter {
    /// Creates a formatter after validating the pattern.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::ConfigError`] if the pattern is empty or has invalid specifiers.
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        validate_pattern(&pattern)?;
        Ok(Self { pattern })
    }

    /// Returns the strftime pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl DateFormatter for PatternDateFormatter {
    fn format_date(&self, date: DateTime<Utc>) -> String {
        let mut out = String::new();
        if write!(out, "{}", date.format(&self.pattern)).is_err() {
            return date.date_naive().to_string();
        }
        out
    }
}

/// Checks that a strftime pattern is non-empty and parses cleanly.
pub(crate) fn validate_pattern(pattern: &str) -> Result<()> {
    if pattern.trim().is_empty() {
        return Err(BookingError::ConfigError("date pattern cannot be empty".into()));
    }
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(BookingError::ConfigError(format!("invalid date pattern '{pattern}'")));
    }
    Ok(())
}
