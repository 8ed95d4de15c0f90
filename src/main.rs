// Main entry point - Dependency injection and server setup
mod application;
mod chart;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::attribute_service::AttributeService;
use crate::application::graph_service::GraphService;
use crate::application::workspace::WorkspaceRegistry;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::http_repository::HttpLabRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    apply_action, close_workspace, create_workspace, get_workspace, health_check, list_attr_values,
    list_attributes, list_dates, list_graphs, next_step, previous_step, remove_graph, reset_workspace,
    save_graph, saved_graph_chart, submit_graph, workspace_chart,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_app_config().context("Failed to load config/lab")?;

    // Repository (infrastructure layer)
    let repository = Arc::new(HttpLabRepository::new(
        config.backend.base_url.clone(),
        Duration::from_secs(config.backend.timeout_secs),
    )?);

    // Services (application layer)
    let attribute_service = AttributeService::new(repository.clone());
    let graph_service = GraphService::new(repository.clone());
    let chart_size = config.render.size();
    let workspaces = Arc::new(WorkspaceRegistry::new(
        graph_service.clone(),
        config.wizard,
        chart_size,
        config.server.workspace_idle_ttl(),
    ));

    let state = Arc::new(AppState {
        attribute_service,
        graph_service,
        workspaces,
        chart_size,
    });

    // Compression is done by the response builders, not a layer
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/collections/:collection/attributes", get(list_attributes))
        .route(
            "/collections/:collection/attributes/:attribute/values",
            get(list_attr_values),
        )
        .route("/collections/:collection/dates", get(list_dates))
        .route("/workspaces", post(create_workspace))
        .route("/workspaces/:id", get(get_workspace).delete(close_workspace))
        .route("/workspaces/:id/reset", post(reset_workspace))
        .route("/workspaces/:id/actions", post(apply_action))
        .route("/workspaces/:id/next", post(next_step))
        .route("/workspaces/:id/back", post(previous_step))
        .route("/workspaces/:id/submit", post(submit_graph))
        .route("/workspaces/:id/chart", get(workspace_chart))
        .route("/workspaces/:id/save", post(save_graph))
        .route("/graphs", get(list_graphs))
        .route("/graphs/:id", delete(remove_graph))
        .route("/graphs/:id/chart", get(saved_graph_chart))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind))?;
    tracing::info!("Starting lab-graphs service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
