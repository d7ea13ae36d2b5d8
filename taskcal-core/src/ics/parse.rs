//! ICS parsing using the icalendar crate's parser.

use chrono::NaiveDate;
use icalendar::parser::{Component, read_calendar, unfold};

use crate::date::parse_ics_date;
use crate::error::{FeedError, FeedResult};

/// An all-day event read back from calendar content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEvent {
    pub uid: String,
    pub summary: String,
    pub description: Option<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Parse every `VEVENT` in a calendar document, in document order.
///
/// Accepts both CRLF and bare LF line endings and tolerates blank lines
/// between components.
pub fn parse_events(content: &str) -> FeedResult<Vec<ParsedEvent>> {
    let normalized: String = content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| format!("{}\r\n", l.trim_end_matches('\r')))
        .collect();
    let unfolded = unfold(&normalized);
    let calendar = read_calendar(&unfolded).map_err(|e| FeedError::IcsParse(e.to_string()))?;

    calendar
        .components
        .iter()
        .filter(|c| c.name == "VEVENT")
        .map(to_parsed_event)
        .collect()
}

fn to_parsed_event(vevent: &Component<'_>) -> FeedResult<ParsedEvent> {
    let text = |name: &str| vevent.find_prop(name).map(|p| unescape_text(p.val.as_ref()));
    let date = |name: &str| -> FeedResult<NaiveDate> {
        let prop = vevent
            .find_prop(name)
            .ok_or_else(|| FeedError::IcsParse(format!("VEVENT without {name}")))?;
        parse_ics_date(prop.val.as_ref())
    };

    Ok(ParsedEvent {
        uid: text("UID").ok_or_else(|| FeedError::IcsParse("VEVENT without UID".into()))?,
        summary: text("SUMMARY").unwrap_or_else(|| "(No title)".to_string()),
        description: text("DESCRIPTION"),
        start: date("DTSTART")?,
        end: date("DTEND")?,
    })
}

/// Reverse of `escape_text`.
fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }

    out
}
