//! Date display format

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate};
use formdesk_common::{FormdeskError, FormdeskResult};

/// Numeric US short date, `1/5/2024`
pub const DEFAULT_DISPLAY_FORMAT: &str = "%-m/%-d/%Y";

const ISO_DATE: &str = "%Y-%m-%d";

/// Format used when writing dates into a payload and reading them back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    display: String,
}

impl DateFormat {
    /// Validate a chrono format string
    pub fn new(display: impl Into<String>) -> FormdeskResult<Self> {
        let display = display.into();
        if StrftimeItems::new(&display).any(|item| matches!(item, Item::Error)) {
            return Err(FormdeskError::Config(format!(
                "invalid date format '{display}'"
            )));
        }
        Ok(Self { display })
    }

    /// The format string
    pub fn as_str(&self) -> &str {
        &self.display
    }

    /// Render a date for display and storage
    pub fn format(&self, date: NaiveDate) -> String {
        date.format(&self.display).to_string()
    }

    /// Parse a stored date. Accepts RFC 3339 timestamps, ISO dates and the
    /// display format.
    pub fn parse(&self, raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.date_naive());
        }
        NaiveDate::parse_from_str(raw, ISO_DATE)
            .or_else(|_| NaiveDate::parse_from_str(raw, &self.display))
            .ok()
    }
}

impl Default for DateFormat {
    fn default() -> Self {
        Self {
            display: DEFAULT_DISPLAY_FORMAT.to_string(),
        }
    }
}
