// HTTP request handlers
use crate::application::graph_service::preview;
use crate::application::workspace::{WorkspaceError, WorkspaceId};
use crate::chart::Size;
use crate::domain::graph::Collection;
use crate::domain::wizard::WizardAction;
use crate::infrastructure::http_response::{accepts_brotli, json_response, svg_response};
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{HeaderMap, Response, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::sync::Arc;

type HandlerResult = Result<axum::response::Response, ApiError>;

#[derive(Deserialize)]
pub struct DatesQuery {
    pub attribute: Option<String>,
    pub value: Option<String>,
}

#[derive(Deserialize)]
pub struct SizeQuery {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl SizeQuery {
    fn or(&self, default: Size) -> Size {
        Size::new(
            self.width.filter(|w| *w > 0.0).unwrap_or(default.width),
            self.height.filter(|h| *h > 0.0).unwrap_or(default.height),
        )
    }
}

#[derive(Deserialize)]
pub struct LatestQuery {
    pub latest: Option<u32>,
}

#[derive(Serialize)]
struct Saved {
    saved: bool,
}

#[derive(Serialize)]
struct Removed {
    removed: bool,
}

fn respond(result: Result<Response<Body>, StatusCode>) -> axum::response::Response {
    match result {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

async fn json<T: Serialize>(headers: &HeaderMap, status: StatusCode, value: &T) -> axum::response::Response {
    respond(json_response(status, value, accepts_brotli(headers)).await)
}

fn collection(name: &str) -> Result<Collection, ApiError> {
    Collection::parse(name).ok_or_else(|| ApiError::UnknownCollection(name.to_string()))
}

/// Query strings carry no types; numeric text is sent on as a number.
fn filter_value(raw: &str) -> Value {
    serde_json::from_str::<Number>(raw)
        .map(Value::Number)
        .unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn list_attributes(
    Path(name): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let attrs = state.attribute_service.collection_attrs(collection(&name)?).await;
    Ok(json(&headers, StatusCode::OK, &attrs).await)
}

pub async fn list_attr_values(
    Path((name, attribute)): Path<(String, String)>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let values = state
        .attribute_service
        .attr_values(&attribute, collection(&name)?)
        .await;
    Ok(json(&headers, StatusCode::OK, &values).await)
}

pub async fn list_dates(
    Path(name): Path<String>,
    Query(query): Query<DatesQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let value = query.value.as_deref().map(filter_value);
    let dates = state
        .attribute_service
        .filter_dates(collection(&name)?, query.attribute.as_deref(), value.as_ref())
        .await;
    Ok(json(&headers, StatusCode::OK, &dates).await)
}

/// Generate New Graph: open a workspace with a reset wizard
pub async fn create_workspace(headers: HeaderMap, State(state): State<Arc<AppState>>) -> HandlerResult {
    let view = state.workspaces.create().await;
    Ok(json(&headers, StatusCode::CREATED, &view).await)
}

pub async fn get_workspace(
    Path(id): Path<WorkspaceId>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let view = state.workspaces.snapshot(id).await?;
    Ok(json(&headers, StatusCode::OK, &view).await)
}

pub async fn reset_workspace(
    Path(id): Path<WorkspaceId>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let view = state.workspaces.reset(id).await?;
    Ok(json(&headers, StatusCode::OK, &view).await)
}

pub async fn apply_action(
    Path(id): Path<WorkspaceId>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(action): Json<WizardAction>,
) -> HandlerResult {
    let view = state.workspaces.apply(id, action).await?;
    Ok(json(&headers, StatusCode::OK, &view).await)
}

pub async fn next_step(
    Path(id): Path<WorkspaceId>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let view = state.workspaces.next(id).await?;
    Ok(json(&headers, StatusCode::OK, &view).await)
}

pub async fn previous_step(
    Path(id): Path<WorkspaceId>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let view = state.workspaces.back(id).await?;
    Ok(json(&headers, StatusCode::OK, &view).await)
}

pub async fn submit_graph(
    Path(id): Path<WorkspaceId>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let summary = state.workspaces.submit(id).await?;
    Ok(json(&headers, StatusCode::OK, &summary).await)
}

/// SVG of the workspace's current graph; 204 while nothing is drawn
pub async fn workspace_chart(
    Path(id): Path<WorkspaceId>,
    Query(size): Query<SizeQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    match state.workspaces.chart(id, size.or(state.chart_size)).await? {
        Some(svg) => Ok(respond(svg_response(svg, accepts_brotli(&headers)).await)),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

pub async fn save_graph(
    Path(id): Path<WorkspaceId>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let saved = state.workspaces.save(id).await?;
    Ok(json(&headers, StatusCode::OK, &Saved { saved }).await)
}

pub async fn close_workspace(Path(id): Path<WorkspaceId>, State(state): State<Arc<AppState>>) -> HandlerResult {
    if state.workspaces.close(id).await {
        Ok(StatusCode::NO_CONTENT.into_response())
    } else {
        Err(WorkspaceError::NotFound(id).into())
    }
}

pub async fn list_graphs(
    Query(query): Query<LatestQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let graphs = state.graph_service.list(query.latest.unwrap_or(0)).await;
    Ok(json(&headers, StatusCode::OK, &graphs).await)
}

pub async fn saved_graph_chart(
    Path(id): Path<i64>,
    Query(size): Query<SizeQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let graph = state
        .graph_service
        .find(id)
        .await
        .ok_or(ApiError::GraphNotFound(id))?;
    let svg = preview(&graph, size.or(state.chart_size)).to_svg();
    Ok(respond(svg_response(svg, accepts_brotli(&headers)).await))
}

pub async fn remove_graph(
    Path(id): Path<i64>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let removed = state.graph_service.delete(id).await;
    Ok(json(&headers, StatusCode::OK, &Removed { removed }).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_query_falls_back_to_defaults() {
        let default = Size::new(800.0, 600.0);
        let query = SizeQuery {
            width: Some(320.0),
            height: Some(-1.0),
        };
        assert_eq!(query.or(default), Size::new(320.0, 600.0));
        let empty = SizeQuery {
            width: None,
            height: None,
        };
        assert_eq!(empty.or(default), default);
    }

    #[test]
    fn test_filter_value_types() {
        assert_eq!(filter_value("7"), serde_json::json!(7));
        assert_eq!(filter_value("7.5"), serde_json::json!(7.5));
        assert_eq!(filter_value("Tank A"), serde_json::json!("Tank A"));
        assert_eq!(filter_value("2025-01-01"), serde_json::json!("2025-01-01"));
    }

    #[test]
    fn test_unknown_collection_is_rejected() {
        assert!(collection("data").is_ok());
        assert!(matches!(collection("samples"), Err(ApiError::UnknownCollection(_))));
    }
}
