// Bar chart: one band per point, floor at zero, no domain padding
use super::axes::{self, Frame, Margin, TickFormat};
use super::scale::{resolve_domain, widen_degenerate, y_extent, BandScale, LinearScale};
use super::scene::{Mark, Role, Scene};
use super::{tick_format, ChartRenderer, Size, DATA_COLOR};
use crate::domain::display::DisplayProperties;
use crate::domain::graph::{Axis, DataPoint, GraphProperties, GraphType};

pub const BAR_PADDING: f64 = 0.2;
const BAR_OPACITY: f64 = 0.8;
const BAR_HOVER_OPACITY: f64 = 1.0;
const MARGIN: Margin = Margin {
    top: 70.0,
    right: 50.0,
    bottom: 100.0,
    left: 70.0,
};

pub struct BarChart;

impl BarChart {
    fn y_scale(points: &[DataPoint], properties: &GraphProperties, frame: &Frame) -> LinearScale {
        let (min, max) = properties.bounds(Axis::Y);
        let domain = resolve_domain((Some(min.unwrap_or(0.0)), max), y_extent(points), (0.0, 1.0));
        LinearScale::new(widen_degenerate(domain), frame.y_range())
    }
}

impl ChartRenderer for BarChart {
    fn graph_type(&self) -> GraphType {
        GraphType::Bar
    }

    fn draw(
        &self,
        points: &[DataPoint],
        properties: &GraphProperties,
        display: &DisplayProperties,
        size: Size,
    ) -> Scene {
        let frame = Frame::new(size.width, size.height, MARGIN);
        let mut scene = Scene::new(size.width, size.height);
        let drawable: Vec<&DataPoint> = points.iter().filter(|p| p.is_finite()).collect();

        let y = Self::y_scale(points, properties, &frame);
        let band = BandScale::new(drawable.len(), frame.x_range(), BAR_PADDING);
        let baseline = y.map(y.domain().0);

        axes::horizontal_grid(&mut scene, &frame, &y);
        for (index, point) in drawable.iter().enumerate() {
            let top = y.map(point.y);
            scene.push(Mark::Rect {
                role: Role::Data,
                x: band.position(index),
                y: top.min(baseline),
                width: band.bandwidth(),
                height: (baseline - top).abs(),
                fill: DATA_COLOR,
                opacity: BAR_OPACITY,
                hover_opacity: Some(BAR_HOVER_OPACITY),
                tooltip: Some(point.label.clone()),
            });
        }
        axes::bottom_axis(&mut scene, &frame, None, TickFormat::Hidden);
        axes::left_axis(&mut scene, &frame, &y, tick_format(properties, Axis::Y));
        axes::titles(&mut scene, &frame, display);
        scene
    }
}
