//! CSV deadline lists to per-section calendars.
//!
//! The input is a task export with at least `TYPE`, `CONTENT`, `DEADLINE` and
//! `DESCRIPTION` columns. A row whose `TYPE` is `section` starts a new
//! section; every following row with a deadline becomes an all-day event in
//! that section. Each section is written to its own `.ics` file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::date::format_date_to_ics;
use crate::error::{FeedError, FeedResult};
use crate::ics::{CalendarDocument, DEFAULT_DESCRIPTION, Summary, create_event};

pub const CSV_PRODID: &str = "-//taskcal//CSV Export//EN";

const SECTION_TYPE: &str = "section";

/// One row of the input file. Missing columns read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CsvRow {
    #[serde(rename = "TYPE", default)]
    pub kind: String,
    #[serde(rename = "CONTENT", default)]
    pub content: String,
    #[serde(rename = "DEADLINE", default)]
    pub deadline: String,
    #[serde(rename = "DESCRIPTION", default)]
    pub description: String,
}

impl CsvRow {
    fn is_section(&self) -> bool {
        self.kind == SECTION_TYPE
    }

    fn has_deadline(&self) -> bool {
        !self.deadline.is_empty()
    }
}

/// Calendar for one section, ready to be written.
#[derive(Debug, Clone)]
pub struct SectionCalendar {
    /// Section name as it appeared in the input
    pub section: String,
    /// Sanitized name used for the output file
    pub file_stem: String,
    pub document: CalendarDocument,
}

impl SectionCalendar {
    pub fn file_name(&self) -> String {
        format!("{}.ics", self.file_stem)
    }
}

/// Read all rows. Any malformed record fails the whole read.
pub fn read_rows<R: io::Read>(reader: R) -> FeedResult<Vec<CsvRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let rows = reader.deserialize().collect::<Result<Vec<CsvRow>, _>>()?;
    debug!(rows = rows.len(), "Read CSV rows");
    Ok(rows)
}

pub fn read_rows_from_path(path: &Path) -> FeedResult<Vec<CsvRow>> {
    let file = fs::File::open(path)?;
    read_rows(file)
}

/// Whether a deadline row shows up before any section row, meaning the
/// caller has to supply a fallback section name.
pub fn requires_fallback_section(rows: &[CsvRow]) -> bool {
    rows.iter()
        .find(|row| row.is_section() || row.has_deadline())
        .is_some_and(|row| !row.is_section())
}

/// Keep only ASCII letters and digits.
pub fn sanitize_section_name(section: &str) -> String {
    section.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// Group deadline rows into one calendar per section.
///
/// `fallback_section` names the section for deadline rows that come before
/// the first section row. Without it such rows fail with
/// [`FeedError::MissingSection`]. Calendars are returned in the order their
/// sections first received an event; sections whose sanitized names collide
/// share one calendar.
pub fn build_calendars(
    rows: &[CsvRow],
    fallback_section: Option<&str>,
) -> FeedResult<Vec<SectionCalendar>> {
    let mut calendars: Vec<SectionCalendar> = Vec::new();
    let mut current_section = fallback_section.map(str::to_string);

    for (index, row) in rows.iter().enumerate() {
        let row_number = index + 1;

        if row.is_section() {
            current_section = Some(row.content.clone());
            continue;
        }
        if !row.has_deadline() {
            continue;
        }

        let section = current_section
            .as_deref()
            .ok_or(FeedError::MissingSection(row_number))?;
        let start_date =
            format_date_to_ics(&row.deadline).map_err(|_| FeedError::InvalidDeadline {
                row: row_number,
                value: row.deadline.clone(),
            })?;
        let description = if row.description.is_empty() {
            DEFAULT_DESCRIPTION
        } else {
            row.description.as_str()
        };

        let event = create_event(
            &Summary::new(&row.content, section),
            &start_date,
            &Uuid::new_v4().to_string(),
            description,
            None,
        )?;

        calendar_for(&mut calendars, section)?.document.push(event);
    }

    Ok(calendars)
}

fn calendar_for<'a>(
    calendars: &'a mut Vec<SectionCalendar>,
    section: &str,
) -> FeedResult<&'a mut SectionCalendar> {
    let file_stem = sanitize_section_name(section);
    if file_stem.is_empty() {
        return Err(FeedError::EmptySectionName(section.to_string()));
    }

    let index = match calendars.iter().position(|c| c.file_stem == file_stem) {
        Some(index) => index,
        None => {
            calendars.push(SectionCalendar {
                section: section.to_string(),
                file_stem,
                document: CalendarDocument::new(CSV_PRODID),
            });
            calendars.len() - 1
        }
    };

    Ok(&mut calendars[index])
}

/// Write each calendar to `<out_dir>/<file_stem>.ics`, creating `out_dir`
/// if needed. Returns the written paths in order.
pub fn write_calendars(calendars: &[SectionCalendar], out_dir: &Path) -> FeedResult<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;

    let mut written = Vec::with_capacity(calendars.len());
    for calendar in calendars {
        let path = out_dir.join(calendar.file_name());
        fs::write(&path, calendar.document.render())?;
        info!(
            path = %path.display(),
            section = %calendar.section,
            events = calendar.document.len(),
            "Wrote calendar"
        );
        written.push(path);
    }

    Ok(written)
}

/// Read `csv_path`, build the calendars and write them to `out_dir`.
///
/// Nothing is written unless the whole file parses and every deadline is a
/// valid date.
pub fn convert_csv(
    csv_path: &Path,
    out_dir: &Path,
    fallback_section: Option<&str>,
) -> FeedResult<Vec<PathBuf>> {
    let rows = read_rows_from_path(csv_path)?;
    let calendars = build_calendars(&rows, fallback_section)?;
    write_calendars(&calendars, out_dir)
}
