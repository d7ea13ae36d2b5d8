//! Terminal rendering for parsed calendar events.

use owo_colors::OwoColorize;
use taskcal_core::ics::ParsedEvent;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for ParsedEvent {
    fn render(&self) -> String {
        // All-day events end the day after their last day
        let date = match self.end.pred_opt() {
            Some(last) if last != self.start => format!("{} → {}", self.start, last),
            _ => self.start.to_string(),
        };

        let mut out = format!("{} {}", date.dimmed(), self.summary);
        if let Some(ref description) = self.description {
            for line in description.lines() {
                out.push_str(&format!("\n    {}", line.dimmed()));
            }
        }
        out
    }
}
