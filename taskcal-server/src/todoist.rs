//! Todoist REST client.
//!
//! Only the two reads the feed needs: the tasks of a project and the
//! project itself. Failures are returned as-is; nothing is retried.

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors from the remote task service.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Todoist API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Request to Todoist failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid Todoist API URL '{0}'")]
    InvalidUrl(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Due {
    /// `YYYY-MM-DD`, or a date-time for tasks due at a specific time
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due: Option<Due>,
    #[serde(default)]
    pub url: String,
}

impl Task {
    /// Due date, if the task has a non-empty one.
    pub fn due_date(&self) -> Option<&str> {
        self.due
            .as_ref()
            .map(|due| due.date.as_str())
            .filter(|date| !date.is_empty())
    }

    /// Link to the task in the Todoist web app.
    pub fn web_url(&self) -> String {
        if self.url.is_empty() {
            format!("https://app.todoist.com/app/task/{}", self.id)
        } else {
            self.url.clone()
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
}

/// Where the feed gets its tasks from.
#[async_trait]
pub trait TaskSource: Send + Sync {
    async fn tasks(&self, project_id: &str) -> Result<Vec<Task>, RemoteError>;

    async fn project(&self, project_id: &str) -> Result<Project, RemoteError>;
}

pub struct TodoistClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
}

impl TodoistClient {
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self, RemoteError> {
        let base_url =
            Url::parse(base_url).map_err(|_| RemoteError::InvalidUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(RemoteError::InvalidUrl(base_url.to_string()));
        }

        Ok(TodoistClient {
            http: reqwest::Client::new(),
            base_url,
            token: token.into(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<T, RemoteError> {
        tracing::debug!(%url, "Todoist request");

        let response = self
            .http
            .get(url.clone())
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound(url.path().to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl TaskSource for TodoistClient {
    async fn tasks(&self, project_id: &str) -> Result<Vec<Task>, RemoteError> {
        self.get_json(self.endpoint(&["tasks"]), &[("project_id", project_id)])
            .await
    }

    async fn project(&self, project_id: &str) -> Result<Project, RemoteError> {
        self.get_json(self.endpoint(&["projects", project_id]), &[])
            .await
    }
}
