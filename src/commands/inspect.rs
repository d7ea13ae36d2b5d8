use std::path::Path;

use anyhow::{Context, Result};
use taskcal_core::ics::parse_events;

use crate::render::Render;

pub fn run(file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let events =
        parse_events(&content).with_context(|| format!("Failed to parse {}", file.display()))?;

    if events.is_empty() {
        println!("No events in {}", file.display());
        return Ok(());
    }

    for event in &events {
        println!("{}", event.render());
    }

    Ok(())
}
