// Application state for HTTP handlers
use crate::application::attribute_service::AttributeService;
use crate::application::graph_service::GraphService;
use crate::application::workspace::WorkspaceRegistry;
use crate::chart::Size;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub attribute_service: AttributeService,
    pub graph_service: GraphService,
    pub workspaces: Arc<WorkspaceRegistry>,
    pub chart_size: Size,
}
