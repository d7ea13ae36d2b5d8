//! Todoist project to calendar document.

use taskcal_core::date::format_date_to_ics;
use taskcal_core::ics::{CalendarDocument, DEFAULT_DESCRIPTION, Summary, TaskReference, create_event};
use taskcal_core::FeedError;
use thiserror::Error;
use tracing::{debug, info};

use crate::todoist::{RemoteError, Task, TaskSource};

pub const FEED_PRODID: &str = "-//taskcal//Todoist Calendar Sync//EN";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Feed(#[from] FeedError),
}

/// Stable UID so calendar clients see the same event across refreshes.
pub fn task_uid(task: &Task) -> String {
    format!("todoist-{}@taskcal", task.id)
}

/// Fetch a project's tasks and render them as a calendar.
///
/// Tasks without a due date are left out.
pub async fn generate_calendar(
    source: &dyn TaskSource,
    project_id: &str,
) -> Result<String, GenerateError> {
    let (tasks, project) = tokio::try_join!(source.tasks(project_id), source.project(project_id))?;

    let mut document = CalendarDocument::new(FEED_PRODID).with_name(&project.name);
    let mut skipped = 0;

    for task in &tasks {
        let Some(due_date) = task.due_date() else {
            debug!(task_id = %task.id, "Skipping task without due date");
            skipped += 1;
            continue;
        };

        let description = if task.description.is_empty() {
            DEFAULT_DESCRIPTION
        } else {
            task.description.as_str()
        };
        let reference = TaskReference {
            id: task.id.clone(),
            url: task.web_url(),
        };

        let event = create_event(
            &Summary::new(&task.content, &project.name),
            &format_date_to_ics(due_date)?,
            &task_uid(task),
            description,
            Some(&reference),
        )?;
        document.push(event);
    }

    info!(
        project_id = %project.id,
        project = %project.name,
        events = document.len(),
        skipped,
        "Generated calendar"
    );

    Ok(document.render())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeSource, project, task, undated_task};
    use taskcal_core::ics::parse_events;

    #[tokio::test]
    async fn test_only_tasks_with_due_dates_become_events() {
        let source = FakeSource::new(
            project("p1", "ACCT 2301"),
            vec![task("1", "Essay 1", "2024-03-01"), undated_task("2", "Someday")],
        );

        let content = generate_calendar(&source, "p1").await.unwrap();

        assert_eq!(content.matches("BEGIN:VEVENT").count(), 1);
        assert!(content.contains("X-WR-CALNAME:ACCT 2301"));
        assert!(content.contains("PRODID:-//taskcal//Todoist Calendar Sync//EN"));
        assert!(content.contains("SUMMARY:Essay 1 | ACCT 2301"));
        assert!(content.contains("UID:todoist-1@taskcal"));
    }

    #[tokio::test]
    async fn test_events_link_back_to_task() {
        let source = FakeSource::new(
            project("p1", "ACCT 2301"),
            vec![task("1", "Essay 1", "2024-12-31")],
        );

        let content = generate_calendar(&source, "p1").await.unwrap();
        let events = parse_events(&content).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start.to_string(), "2024-12-31");
        assert_eq!(events[0].end.to_string(), "2025-01-01");
        assert_eq!(
            events[0].description.as_deref(),
            Some("No description provided\n\nView task: https://app.todoist.com/app/task/1")
        );
    }

    #[tokio::test]
    async fn test_timed_due_dates_use_their_date() {
        let source = FakeSource::new(
            project("p1", "Work"),
            vec![task("1", "Standup", "2024-03-01T09:30:00")],
        );

        let content = generate_calendar(&source, "p1").await.unwrap();
        assert!(content.contains("DTSTART;VALUE=DATE:20240301"));
    }

    #[tokio::test]
    async fn test_keeps_task_order() {
        let source = FakeSource::new(
            project("p1", "Work"),
            vec![
                task("3", "Later", "2024-05-01"),
                task("1", "Sooner", "2024-01-01"),
            ],
        );

        let content = generate_calendar(&source, "p1").await.unwrap();
        let uids: Vec<String> = parse_events(&content)
            .unwrap()
            .into_iter()
            .map(|e| e.uid)
            .collect();

        assert_eq!(uids, ["todoist-3@taskcal", "todoist-1@taskcal"]);
    }

    #[tokio::test]
    async fn test_invalid_due_date_is_an_error() {
        let source = FakeSource::new(project("p1", "Work"), vec![task("1", "Bad", "someday")]);

        let err = generate_calendar(&source, "p1").await.unwrap_err();
        assert!(matches!(err, GenerateError::Feed(FeedError::InvalidDate(_))));
    }

    #[tokio::test]
    async fn test_missing_project_is_not_found() {
        let source = FakeSource::missing();

        let err = generate_calendar(&source, "nope").await.unwrap_err();
        assert!(matches!(err, GenerateError::Remote(RemoteError::NotFound(_))));
    }
}
