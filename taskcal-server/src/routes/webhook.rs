//! Todoist webhook endpoint
//!
//! Todoist calls this whenever a task changes. The only effect is dropping
//! the cached calendar of the affected project so the next feed request
//! regenerates it.

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use serde_json::Value;
use subtle::ConstantTimeEq;
use tracing::{debug, info, warn};

use crate::routes::AppError;
use crate::state::AppState;

pub const VERIFICATION_HEADER: &str = "x-todoist-verification-token";

pub fn router() -> Router<AppState> {
    Router::new().route("/webhook", post(webhook))
}

/// Compare the header against the configured secret in constant time.
/// No configured secret, or an empty one, means nothing verifies.
fn verify_token(headers: &HeaderMap, expected: Option<&str>) -> bool {
    let (Some(expected), Some(provided)) = (expected, headers.get(VERIFICATION_HEADER)) else {
        return false;
    };
    if expected.is_empty() {
        return false;
    }
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Project id from either `project_id` or `event_data.project_id`,
/// given as a string or a number.
fn project_id(payload: &Value) -> Option<String> {
    let id = payload
        .get("project_id")
        .or_else(|| payload.get("event_data")?.get("project_id"))?;

    match id {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// POST /webhook - Invalidate the cached calendar of a project
async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, &'static str), AppError> {
    if !verify_token(&headers, state.config.verification_token()) {
        warn!("Rejected webhook with invalid verification token");
        return Err(AppError::Forbidden);
    }

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "Ignoring webhook with unreadable body");
            return Ok((StatusCode::OK, "OK"));
        }
    };

    match project_id(&payload) {
        Some(project_id) => {
            let removed = state.cache.write().await.invalidate(&project_id);
            info!(%project_id, removed, "Invalidated calendar cache");
        }
        None => debug!("Webhook without project id"),
    }

    Ok((StatusCode::OK, "OK"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use chrono::Utc;
    use serde_json::json;
    use tower::ServiceExt;

    use crate::routes::router;
    use crate::routes::tests::{body_string, get, test_state};
    use crate::testing::{FakeSource, project, task};

    async fn post_webhook(app: axum::Router, token: Option<&str>, body: &str) -> axum::response::Response {
        let mut request = Request::post("/webhook").header("content-type", "application/json");
        if let Some(token) = token {
            request = request.header(VERIFICATION_HEADER, token);
        }
        app.oneshot(request.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap()
    }

    #[test]
    fn test_project_id_shapes() {
        assert_eq!(project_id(&json!({ "project_id": "p1" })), Some("p1".to_string()));
        assert_eq!(project_id(&json!({ "project_id": 2203306141_u64 })), Some("2203306141".to_string()));
        assert_eq!(
            project_id(&json!({ "event_name": "item:updated", "event_data": { "project_id": "p2" } })),
            Some("p2".to_string())
        );
        assert_eq!(project_id(&json!({ "project_id": "" })), None);
        assert_eq!(project_id(&json!({ "event_data": {} })), None);
        assert_eq!(project_id(&json!([])), None);
    }

    #[test]
    fn test_verify_token() {
        let mut headers = HeaderMap::new();
        assert!(!verify_token(&headers, Some("secret")));

        headers.insert(VERIFICATION_HEADER, "secret".parse().unwrap());
        assert!(verify_token(&headers, Some("secret")));
        assert!(!verify_token(&headers, Some("secret2")));
        assert!(!verify_token(&headers, Some("")));
        assert!(!verify_token(&headers, None));

        headers.insert(VERIFICATION_HEADER, "".parse().unwrap());
        assert!(!verify_token(&headers, Some("")));
    }

    #[tokio::test]
    async fn test_webhook_invalidates_cache_and_triggers_one_regeneration() {
        let source = Arc::new(FakeSource::new(
            project("p1", "ACCT 2301"),
            vec![task("1", "Essay 1", "2024-03-01")],
        ));
        let state = test_state(source.clone());
        let app = router(state.clone());

        get(app.clone(), "/calendar/p1").await;
        get(app.clone(), "/calendar/p1").await;
        assert_eq!(source.fetches(), 1);

        let response =
            post_webhook(app.clone(), Some("hook-secret"), r#"{"project_id":"p1"}"#).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "OK");
        assert!(state.cache.read().await.is_empty());

        get(app.clone(), "/calendar/p1").await;
        get(app, "/calendar/p1").await;
        assert_eq!(source.fetches(), 2);
    }

    #[tokio::test]
    async fn test_webhook_with_wrong_token_is_rejected() {
        let state = test_state(Arc::new(FakeSource::missing()));
        state.cache.write().await.put("p1", "cached", Utc::now());
        let app = router(state.clone());

        for token in [Some("wrong"), Some(""), None] {
            let response = post_webhook(app.clone(), token, r#"{"project_id":"p1"}"#).await;
            assert_eq!(response.status(), StatusCode::FORBIDDEN, "{token:?}");
        }

        assert_eq!(state.cache.read().await.get("p1", Utc::now()), Some("cached"));
    }

    #[tokio::test]
    async fn test_webhook_without_configured_secret_is_rejected() {
        let mut state = test_state(Arc::new(FakeSource::missing()));
        let config = crate::config::ServerConfig::default().with_api_token("api-token");
        state.config = Arc::new(config);
        let app = router(state);

        let response = post_webhook(app, Some("anything"), r#"{"project_id":"p1"}"#).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_webhook_with_blank_configured_secret_is_rejected() {
        let mut state = test_state(Arc::new(FakeSource::missing()));
        let config = crate::config::ServerConfig::default()
            .with_api_token("api-token")
            .with_verification_token("");
        state.config = Arc::new(config);
        state.cache.write().await.put("p1", "cached", Utc::now());
        let app = router(state.clone());

        for token in [Some(""), None] {
            let response = post_webhook(app.clone(), token, r#"{"project_id":"p1"}"#).await;
            assert_eq!(response.status(), StatusCode::FORBIDDEN, "{token:?}");
        }

        assert_eq!(state.cache.read().await.get("p1", Utc::now()), Some("cached"));
    }

    #[tokio::test]
    async fn test_webhook_for_uncached_project_is_ok() {
        let state = test_state(Arc::new(FakeSource::missing()));
        state.cache.write().await.put("p2", "cached", Utc::now());
        let app = router(state.clone());

        let response = post_webhook(app.clone(), Some("hook-secret"), r#"{"project_id":"p1"}"#).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = post_webhook(app, Some("hook-secret"), "not json").await;
        assert_eq!(response.status(), StatusCode::OK);

        assert_eq!(state.cache.read().await.len(), 1);
    }
}
