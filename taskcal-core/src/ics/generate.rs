//! ICS generation.

use indoc::formatdoc;

use super::{Summary, TaskReference};
use crate::date::{format_ics_date, parse_ics_date};
use crate::error::{FeedError, FeedResult};

/// Build one all-day `VEVENT` block.
///
/// `start_date` must already be an iCalendar `DATE` (`YYYYMMDD`). The
/// exclusive end date is the following calendar day. `DTSTAMP` reuses the
/// start date so identical inputs always render identically.
pub fn create_event(
    summary: &Summary,
    start_date: &str,
    uid: &str,
    description: &str,
    reference: Option<&TaskReference>,
) -> FeedResult<String> {
    let start = parse_ics_date(start_date)?;
    let end = start
        .succ_opt()
        .ok_or_else(|| FeedError::InvalidDate(start_date.to_string()))?;

    let mut description = escape_text(description);
    if let Some(reference) = reference {
        // Escaped blank line between the description and the link
        description.push_str("\\n\\n");
        description.push_str(&escape_text(&format!("View task: {}", reference.url)));
    }

    Ok(formatdoc! {"
        BEGIN:VEVENT
        UID:{uid}
        SUMMARY:{summary}
        DESCRIPTION:{description}
        DTSTART;VALUE=DATE:{dtstart}
        DTEND;VALUE=DATE:{dtend}
        DTSTAMP:{start_date}
        END:VEVENT
        ",
        uid = uid,
        summary = escape_text(&summary.to_string()),
        description = description,
        dtstart = format_ics_date(start),
        dtend = format_ics_date(end),
        start_date = start_date,
    })
}

/// Escape a TEXT property value (RFC 5545 section 3.3.11).
pub fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                escaped.push_str("\\n");
            }
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }

    escaped
}

/// A full calendar: envelope lines around an ordered list of event blocks.
#[derive(Debug, Clone)]
pub struct CalendarDocument {
    prodid: String,
    name: Option<String>,
    events: Vec<String>,
}

impl CalendarDocument {
    pub fn new(prodid: impl Into<String>) -> Self {
        CalendarDocument {
            prodid: prodid.into(),
            name: None,
            events: Vec::new(),
        }
    }

    /// Set the display name (`X-WR-CALNAME`).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn push(&mut self, event: String) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn render(&self) -> String {
        let mut lines = vec![
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            format!("PRODID:{}", self.prodid),
        ];
        if let Some(ref name) = self.name {
            lines.push(format!("X-WR-CALNAME:{}", escape_text(name)));
        }
        lines.extend(self.events.iter().cloned());
        lines.push("END:VCALENDAR".to_string());

        lines.join("\n")
    }
}
