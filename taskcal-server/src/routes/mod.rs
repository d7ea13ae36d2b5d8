pub mod calendar;
pub mod health;
pub mod webhook;

use axum::{
    Json, Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use thiserror::Error;

use crate::feed::GenerateError;
use crate::state::AppState;
use crate::todoist::RemoteError;

const INDEX_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>taskcal</title></head>
<body>
<h1>taskcal</h1>
<p>Todoist projects as iCalendar feeds.</p>
<ul>
<li><code>GET /calendar/{project_id}</code> - calendar feed for a project</li>
<li><code>POST /webhook</code> - Todoist webhook, refreshes a project's feed</li>
<li><code>GET /health</code> - liveness check</li>
</ul>
</body>
</html>
"#;

const NOT_FOUND_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>404 Not Found</title></head>
<body>
<h1>404 Not Found</h1>
<p>The requested page does not exist. See <a href="/">the index</a> for available endpoints.</p>
</body>
</html>
"#;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .merge(calendar::router())
        .merge(webhook::router())
        .merge(health::router())
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_token,
        ))
        .with_state(state)
}

/// GET / - Informational page
async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

async fn not_found() -> (StatusCode, Html<&'static str>) {
    (StatusCode::NOT_FOUND, Html(NOT_FOUND_PAGE))
}

/// Reject everything while no Todoist API token is configured.
async fn require_api_token(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if state.config.api_token().is_none() {
        return AppError::NotConfigured.into_response();
    }
    next.run(request).await
}

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("API token not configured")]
    NotConfigured,

    #[error("Invalid verification token")]
    Forbidden,

    #[error(transparent)]
    Generate(#[from] GenerateError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::NotConfigured => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string(), None),
            AppError::Forbidden => (StatusCode::FORBIDDEN, self.to_string(), None),
            AppError::Generate(GenerateError::Remote(RemoteError::NotFound(what))) => (
                StatusCode::NOT_FOUND,
                "Project not found".to_string(),
                Some(what.clone()),
            ),
            AppError::Generate(e) => {
                tracing::error!(error = %e, "Error generating calendar");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error generating calendar".to_string(),
                    Some(e.to_string()),
                )
            }
        };

        (status, Json(ErrorResponse { error, details })).into_response()
    }
}
