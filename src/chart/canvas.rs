// Per-workspace drawing surface: either empty or holding one scene
use super::scene::Scene;
use super::{draw, Plot, Size};
use crate::domain::graph::{DataPoint, GraphProperties};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CanvasState {
    Empty,
    Drawn,
}

#[derive(Debug, Default)]
pub struct ChartCanvas {
    scene: Option<Scene>,
}

impl ChartCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces whatever was drawn before. No points leaves the canvas empty.
    pub fn render(
        &mut self,
        plot: &Plot,
        points: &[DataPoint],
        properties: &GraphProperties,
        size: Size,
    ) -> CanvasState {
        self.scene = if points.is_empty() {
            None
        } else {
            Some(draw(plot, points, properties, size))
        };
        self.state()
    }

    pub fn state(&self) -> CanvasState {
        match self.scene {
            Some(_) => CanvasState::Drawn,
            None => CanvasState::Empty,
        }
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }
}
