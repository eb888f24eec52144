use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every problem found while validating a form, in field order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn field(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|err| err.field == field)
            .map(|err| err.message.as_str())
    }

    /// `Ok(value)` when nothing was recorded, the report otherwise.
    pub fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }

    /// Trimmed, non-empty, bounded text.
    pub fn required(&mut self, field: &'static str, label: &str, raw: &str, max: usize) -> String {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            self.push(field, format!("{label} is required"));
        } else if trimmed.chars().count() > max {
            self.push(field, format!("{label} must be at most {max} characters"));
        }
        trimmed.to_string()
    }

    /// Trimmed text, `None` when blank.
    pub fn optional(
        &mut self,
        field: &'static str,
        label: &str,
        raw: &str,
        max: usize,
    ) -> Option<String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed.chars().count() > max {
            self.push(field, format!("{label} must be at most {max} characters"));
        }
        Some(trimmed.to_string())
    }

    /// `YYYY-MM-DD`, `None` when blank.
    pub fn optional_date(&mut self, field: &'static str, label: &str, raw: &str) -> Option<NaiveDate> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                self.push(field, format!("{label} must be a date (YYYY-MM-DD)"));
                None
            }
        }
    }

    /// `HH:MM` or `HH:MM:SS`, `None` when blank.
    pub fn optional_time(&mut self, field: &'static str, label: &str, raw: &str) -> Option<NaiveTime> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        NaiveTime::parse_from_str(trimmed, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
            .map_err(|_| self.push(field, format!("{label} must be a time (HH:MM)")))
            .ok()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for err in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", err.field, err.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
