// Workspace registry - one wizard, current graph and canvas per open graph view
use crate::application::graph_service::{GeneratedGraph, GraphService, GraphSummary};
use crate::chart::canvas::{CanvasState, ChartCanvas};
use crate::chart::Size;
use crate::domain::wizard::{GraphForm, WizardAction, WizardError, WizardRules};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;

pub type WorkspaceId = u64;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("workspace {0} not found")]
    NotFound(WorkspaceId),
    #[error("workspace {0} was closed before the graph arrived")]
    Closed(WorkspaceId),
    #[error(transparent)]
    Wizard(#[from] WizardError),
}

struct Workspace {
    form: GraphForm,
    graph: Option<GeneratedGraph>,
    canvas: ChartCanvas,
    touched: Instant,
}

impl Workspace {
    fn new(rules: WizardRules) -> Self {
        Self {
            form: GraphForm::new(rules),
            graph: None,
            canvas: ChartCanvas::new(),
            touched: Instant::now(),
        }
    }

    fn is_idle(&self, ttl: Duration) -> bool {
        self.touched.elapsed() >= ttl
    }

    fn view(&self, id: WorkspaceId) -> WorkspaceView {
        WorkspaceView {
            id,
            form: self.form.clone(),
            canvas: self.canvas.state(),
            graph: self.graph.as_ref().map(GeneratedGraph::summary),
        }
    }
}

/// Snapshot returned to clients after every interaction
#[derive(Debug, Clone, Serialize)]
pub struct WorkspaceView {
    pub id: WorkspaceId,
    pub form: GraphForm,
    pub canvas: CanvasState,
    pub graph: Option<GraphSummary>,
}

pub struct WorkspaceRegistry {
    workspaces: Mutex<HashMap<WorkspaceId, Workspace>>,
    next_id: AtomicU64,
    rules: WizardRules,
    size: Size,
    idle_ttl: Duration,
    graphs: GraphService,
}

impl WorkspaceRegistry {
    pub fn new(graphs: GraphService, rules: WizardRules, size: Size, idle_ttl: Duration) -> Self {
        Self {
            workspaces: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            rules,
            size,
            idle_ttl,
            graphs,
        }
    }

    /// "Generate New Graph": a fresh workspace with a reset wizard.
    /// Workspaces idle for longer than the TTL are evicted first.
    pub async fn create(&self) -> WorkspaceView {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let workspace = Workspace::new(self.rules);
        let view = workspace.view(id);

        let mut workspaces = self.workspaces.lock().await;
        let before = workspaces.len();
        workspaces.retain(|_, ws| !ws.is_idle(self.idle_ttl));
        let evicted = before - workspaces.len();
        if evicted > 0 {
            tracing::debug!(evicted, "Evicted idle workspaces");
        }
        workspaces.insert(id, workspace);
        tracing::debug!(workspace = id, open = workspaces.len(), "Workspace opened");
        view
    }

    async fn with<T>(
        &self,
        id: WorkspaceId,
        f: impl FnOnce(&mut Workspace) -> T,
    ) -> Result<T, WorkspaceError> {
        let mut workspaces = self.workspaces.lock().await;
        if workspaces.get(&id).is_some_and(|ws| ws.is_idle(self.idle_ttl)) {
            workspaces.remove(&id);
            tracing::debug!(workspace = id, "Workspace expired");
        }
        let workspace = workspaces.get_mut(&id).ok_or(WorkspaceError::NotFound(id))?;
        workspace.touched = Instant::now();
        Ok(f(workspace))
    }

    pub async fn snapshot(&self, id: WorkspaceId) -> Result<WorkspaceView, WorkspaceError> {
        self.with(id, |ws| ws.view(id)).await
    }

    pub async fn reset(&self, id: WorkspaceId) -> Result<WorkspaceView, WorkspaceError> {
        self.with(id, |ws| {
            ws.form.reset();
            ws.view(id)
        })
        .await
    }

    pub async fn apply(&self, id: WorkspaceId, action: WizardAction) -> Result<WorkspaceView, WorkspaceError> {
        self.with(id, |ws| {
            ws.form.apply(action);
            ws.view(id)
        })
        .await
    }

    pub async fn next(&self, id: WorkspaceId) -> Result<WorkspaceView, WorkspaceError> {
        self.with(id, |ws| ws.form.next().map(|_| ws.view(id)))
            .await?
            .map_err(WorkspaceError::from)
    }

    pub async fn back(&self, id: WorkspaceId) -> Result<WorkspaceView, WorkspaceError> {
        self.with(id, |ws| {
            ws.form.back();
            ws.view(id)
        })
        .await
    }

    /// Submit the wizard, fetch and draw. The lock is released while the
    /// backend call runs; a workspace closed meanwhile drops the result.
    pub async fn submit(&self, id: WorkspaceId) -> Result<GraphSummary, WorkspaceError> {
        let request = self.with(id, |ws| ws.form.submit()).await??;

        let graph = self.graphs.generate(&request).await;

        let mut workspaces = self.workspaces.lock().await;
        let Some(workspace) = workspaces.get_mut(&id) else {
            tracing::debug!(workspace = id, "Discarding graph for closed workspace");
            return Err(WorkspaceError::Closed(id));
        };
        let state = workspace
            .canvas
            .render(&graph.plot, &graph.points, &graph.properties, self.size);
        tracing::info!(
            workspace = id,
            graph_type = graph.plot.graph_type().as_str(),
            points = graph.points.len(),
            ?state,
            "Graph generated"
        );
        let summary = graph.summary();
        workspace.graph = Some(graph);
        workspace.touched = Instant::now();
        Ok(summary)
    }

    /// SVG of the current graph at `size`, or `None` while the canvas is empty.
    pub async fn chart(&self, id: WorkspaceId, size: Size) -> Result<Option<String>, WorkspaceError> {
        self.with(id, |ws| -> Option<String> {
            let graph = ws.graph.as_ref()?;
            ws.canvas.render(&graph.plot, &graph.points, &graph.properties, size);
            ws.canvas.scene().map(|scene| scene.to_svg())
        })
        .await
    }

    /// Save the current graph. Failure leaves the graph and its canvas untouched.
    pub async fn save(&self, id: WorkspaceId) -> Result<bool, WorkspaceError> {
        let graph = self.with(id, |ws| ws.graph.clone()).await?;
        match graph {
            Some(graph) => Ok(self.graphs.save(&graph).await),
            None => Ok(false),
        }
    }

    pub async fn close(&self, id: WorkspaceId) -> bool {
        let removed = self.workspaces.lock().await.remove(&id).is_some();
        if removed {
            tracing::debug!(workspace = id, "Workspace closed");
        }
        removed
    }
}
