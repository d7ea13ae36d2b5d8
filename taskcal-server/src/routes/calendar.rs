//! Calendar feed endpoint

use axum::{
    Router,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use tracing::debug;

use crate::feed;
use crate::routes::AppError;
use crate::state::AppState;

const CALENDAR_CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

pub fn router() -> Router<AppState> {
    Router::new().route("/calendar/{project_id}", get(get_calendar))
}

fn calendar_response(content: String) -> Response {
    ([(header::CONTENT_TYPE, CALENDAR_CONTENT_TYPE)], content).into_response()
}

/// GET /calendar/:project_id - Calendar feed for a Todoist project
async fn get_calendar(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<Response, AppError> {
    let now = Utc::now();

    if let Some(content) = state.cache.read().await.get(&project_id, now) {
        debug!(%project_id, "Serving cached calendar");
        return Ok(calendar_response(content.to_string()));
    }

    let content = feed::generate_calendar(state.tasks.as_ref(), &project_id).await?;
    state
        .cache
        .write()
        .await
        .put(project_id, content.clone(), now);

    Ok(calendar_response(content))
}
