use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, TaskError};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Task {
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            due_date,
            completed: false,
        }
    }

    pub fn status(&self) -> &'static str {
        if self.completed {
            "Done"
        } else {
            "Pending"
        }
    }

    /// Case-insensitive substring match on title or description.
    /// `needle` must already be lower-cased.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Due: {}) - {}\n{}",
            self.title,
            self.due_date.format(DATE_FORMAT),
            self.status(),
            self.description
        )
    }
}

/// Parses a user-supplied `YYYY-MM-DD` date.
pub fn parse_due_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|source| TaskError::InvalidDate {
        input: trimmed.to_string(),
        source,
    })
}
