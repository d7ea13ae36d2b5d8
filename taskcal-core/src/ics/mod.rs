//! ICS generation and parsing.
//!
//! Events are all-day `VEVENT` blocks rendered line by line so the output
//! layout stays fixed and byte-for-byte reproducible.

mod generate;
mod parse;

use std::fmt;

pub use generate::{CalendarDocument, create_event, escape_text};
pub use parse::{ParsedEvent, parse_events};

/// Description used when a row or task carries none.
pub const DEFAULT_DESCRIPTION: &str = "No description provided";

/// Event title together with the section or project it belongs to.
///
/// Rendered as `"<title> | <group>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub title: String,
    pub group: String,
}

impl Summary {
    pub fn new(title: impl Into<String>, group: impl Into<String>) -> Self {
        Summary {
            title: title.into(),
            group: group.into(),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.title, self.group)
    }
}

/// Link back to the task an event was generated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReference {
    pub id: String,
    pub url: String,
}
