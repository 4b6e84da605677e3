//! Request handlers.

use axum::{
    extract::{Query, State},
    http::{Method, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::RouteDescription;

/// `GET /_routes`: every route in match order.
pub async fn list_routes(State(state): State<AppState>) -> Json<Vec<RouteDescription>> {
    Json(state.table.describe())
}

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub path: String,
}

/// `GET /_routes/resolve?path=...`: what a location resolves to.
pub async fn resolve_route(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> Response {
    match state.table.resolve(&query.path) {
        Some(resolution) => Json(resolution).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "no matching route", "path": query.path })),
        )
            .into_response(),
    }
}

/// `GET /metrics`: Prometheus exposition, 404 when metrics are disabled.
pub async fn render_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "Metrics disabled").into_response(),
    }
}

/// Fallback: serve the application shell for any resolvable location.
pub async fn serve_shell(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed").into_response();
    }

    let target = uri.path_and_query().map_or("/", |pq| pq.as_str());
    match state.table.resolve(target) {
        Some(resolution) => {
            tracing::debug!(
                path = %target,
                group = %resolution.group,
                action = %resolution.action,
                "Serving shell"
            );
            metrics::record_shell_served(&resolution.group);
            Html(state.shell.to_string()).into_response()
        }
        None => {
            tracing::warn!(path = %target, "No route matched");
            metrics::record_miss();
            (StatusCode::NOT_FOUND, "No matching route found").into_response()
        }
    }
}
