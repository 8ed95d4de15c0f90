// Chart renderers - points + properties in, declarative scene out
pub mod axes;
pub mod bar;
pub mod canvas;
pub mod curve;
pub mod line;
pub mod scale;
pub mod scatter;
pub mod scene;

use crate::domain::display::DisplayProperties;
use crate::domain::graph::{Axis, DataPoint, GraphProperties, GraphType};
use axes::{Frame, TickFormat};
use scale::{pad, resolve_domain, widen_degenerate, x_extent, y_extent, LinearScale, DOMAIN_PADDING};
use scene::Scene;
use serde::{Deserialize, Serialize};

pub use bar::BarChart;
pub use line::LineChart;
pub use scatter::ScatterChart;

pub const DATA_COLOR: &str = "#3b82f6";
pub const REGRESSION_COLOR: &str = "#ef4444";

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Common contract for every chart kind.
pub trait ChartRenderer {
    fn graph_type(&self) -> GraphType;

    /// Draw points that are already sorted by x.
    fn draw(
        &self,
        points: &[DataPoint],
        properties: &GraphProperties,
        display: &DisplayProperties,
        size: Size,
    ) -> Scene;

    fn render(&self, points: &[DataPoint], properties: &GraphProperties, size: Size) -> Scene {
        let sorted = sort_points(points);
        let display = DisplayProperties::resolve(self.graph_type(), properties);
        self.draw(&sorted, properties, &display, size)
    }
}

/// Stable ascending sort by x; NaN sorts last.
pub fn sort_points(points: &[DataPoint]) -> Vec<DataPoint> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x));
    sorted
}

/// Chart kind with its kind-specific payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Plot {
    Bar,
    Line,
    Scatter { regression: Option<[DataPoint; 2]> },
}

impl Plot {
    pub fn new(graph_type: GraphType, regression: Option<[DataPoint; 2]>) -> Self {
        match graph_type {
            GraphType::Bar => Plot::Bar,
            GraphType::Line => Plot::Line,
            GraphType::Scatter => Plot::Scatter { regression },
        }
    }

    pub fn graph_type(&self) -> GraphType {
        match self {
            Plot::Bar => GraphType::Bar,
            Plot::Line => GraphType::Line,
            Plot::Scatter { .. } => GraphType::Scatter,
        }
    }
}

/// The one place a chart kind is turned into a renderer.
pub fn draw(plot: &Plot, points: &[DataPoint], properties: &GraphProperties, size: Size) -> Scene {
    match plot {
        Plot::Bar => BarChart.render(points, properties, size),
        Plot::Line => LineChart.render(points, properties, size),
        Plot::Scatter { regression } => ScatterChart {
            regression: regression.as_ref(),
        }
        .render(points, properties, size),
    }
}

pub(crate) fn tick_format(properties: &GraphProperties, axis: Axis) -> TickFormat {
    let time = match axis {
        Axis::X => properties.x_time_min.is_some() || properties.x_time_max.is_some(),
        Axis::Y => properties.y_time_min.is_some() || properties.y_time_max.is_some(),
    };
    if time { TickFormat::TimeOfDay } else { TickFormat::Number }
}

/// Linear x/y scales padded on every side, as line and scatter charts use.
pub(crate) fn padded_scales(
    points: &[DataPoint],
    properties: &GraphProperties,
    frame: &Frame,
) -> (LinearScale, LinearScale) {
    let x = resolve_domain(properties.bounds(Axis::X), x_extent(points), (0.0, 1.0));
    let y = resolve_domain(properties.bounds(Axis::Y), y_extent(points), (0.0, 1.0));
    (
        LinearScale::new(pad(widen_degenerate(x), DOMAIN_PADDING), frame.x_range()),
        LinearScale::new(pad(widen_degenerate(y), DOMAIN_PADDING), frame.y_range()),
    )
}
