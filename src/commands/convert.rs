use std::io::IsTerminal;
use std::path::Path;

use anyhow::{Context, Result};
use dialoguer::Input;
use owo_colors::OwoColorize;
use taskcal_core::csv_feed;

pub fn run(csv: &Path, out_dir: &Path, section: Option<String>, no_input: bool) -> Result<()> {
    let rows = csv_feed::read_rows_from_path(csv)
        .with_context(|| format!("Failed to read {}", csv.display()))?;

    let fallback_section = resolve_section(section, &rows, no_input)?;
    tracing::debug!(rows = rows.len(), fallback = ?fallback_section, "Converting CSV");

    let calendars = csv_feed::build_calendars(&rows, fallback_section.as_deref())
        .with_context(|| format!("Failed to convert {}", csv.display()))?;

    if calendars.is_empty() {
        println!("No deadlines found in {}", csv.display());
        return Ok(());
    }

    let written = csv_feed::write_calendars(&calendars, out_dir)
        .with_context(|| format!("Failed to write calendars to {}", out_dir.display()))?;

    for (path, calendar) in written.iter().zip(&calendars) {
        println!(
            "{} {} {}",
            "✓".green(),
            path.display(),
            format!("({} events)", calendar.document.len()).dimmed()
        );
    }

    Ok(())
}

/// Settle the fallback section before the conversion starts, so the
/// conversion itself never has to stop and ask.
fn resolve_section(
    section: Option<String>,
    rows: &[csv_feed::CsvRow],
    no_input: bool,
) -> Result<Option<String>> {
    if section.is_some() || !csv_feed::requires_fallback_section(rows) {
        return Ok(section);
    }

    if no_input || !std::io::stdin().is_terminal() {
        anyhow::bail!(
            "No section row found before the first deadline.\n\
            Pass the section name with:\n  \
            taskcal convert <CSV> --section \"ACCT 2301\""
        );
    }

    let name: String = Input::<String>::new()
        .with_prompt("No section name found. Section name (e.g. ACCT 2301)")
        .interact_text()?;

    Ok(Some(name.trim().to_string()))
}
