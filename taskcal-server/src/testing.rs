//! In-memory task source for tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::todoist::{Due, Project, RemoteError, Task, TaskSource};

pub fn project(id: &str, name: &str) -> Project {
    Project {
        id: id.to_string(),
        name: name.to_string(),
    }
}

pub fn task(id: &str, content: &str, due: &str) -> Task {
    Task {
        id: id.to_string(),
        content: content.to_string(),
        due: Some(Due {
            date: due.to_string(),
        }),
        ..Default::default()
    }
}

pub fn undated_task(id: &str, content: &str) -> Task {
    Task {
        id: id.to_string(),
        content: content.to_string(),
        ..Default::default()
    }
}

/// Serves one project; counts how often the project is fetched.
pub struct FakeSource {
    project: Option<Project>,
    tasks: Vec<Task>,
    fail_with_status: Option<u16>,
    fetches: AtomicUsize,
}

impl FakeSource {
    pub fn new(project: Project, tasks: Vec<Task>) -> Self {
        FakeSource {
            project: Some(project),
            tasks,
            fail_with_status: None,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Every project lookup is a 404.
    pub fn missing() -> Self {
        FakeSource {
            project: None,
            tasks: Vec::new(),
            fail_with_status: None,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Every call fails with the given HTTP status.
    pub fn failing(status: u16) -> Self {
        FakeSource {
            fail_with_status: Some(status),
            ..FakeSource::missing()
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> Result<(), RemoteError> {
        match self.fail_with_status {
            Some(status) => Err(RemoteError::Status {
                status,
                body: "upstream exploded".to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TaskSource for FakeSource {
    async fn tasks(&self, project_id: &str) -> Result<Vec<Task>, RemoteError> {
        self.check_failure()?;
        match self.project {
            Some(ref project) if project.id == project_id => Ok(self.tasks.clone()),
            _ => Err(RemoteError::NotFound(format!("/tasks?project_id={project_id}"))),
        }
    }

    async fn project(&self, project_id: &str) -> Result<Project, RemoteError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        match self.project {
            Some(ref project) if project.id == project_id => Ok(project.clone()),
            _ => Err(RemoteError::NotFound(format!("/projects/{project_id}"))),
        }
    }
}
