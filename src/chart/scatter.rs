// Scatter plot with an optional regression overlay
use super::axes::{self, Frame, Margin};
use super::scene::{Mark, Role, Scene};
use super::{padded_scales, tick_format, ChartRenderer, Size, DATA_COLOR, REGRESSION_COLOR};
use crate::domain::display::DisplayProperties;
use crate::domain::graph::{Axis, DataPoint, GraphProperties, GraphType};

const MARGIN: Margin = Margin {
    top: 50.0,
    right: 50.0,
    bottom: 70.0,
    left: 70.0,
};

pub struct ScatterChart<'a> {
    /// Regression endpoints, drawn as a separate series
    pub regression: Option<&'a [DataPoint; 2]>,
}

impl ChartRenderer for ScatterChart<'_> {
    fn graph_type(&self) -> GraphType {
        GraphType::Scatter
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
        let (x, y) = padded_scales(points, properties, &frame);

        axes::vertical_grid(&mut scene, &frame, &x);
        axes::horizontal_grid(&mut scene, &frame, &y);

        for point in points.iter().filter(|p| p.is_finite()) {
            scene.push(Mark::Circle {
                role: Role::Data,
                cx: x.map(point.x),
                cy: y.map(point.y),
                r: 4.0,
                fill: DATA_COLOR,
                opacity: 0.7,
                tooltip: Some(point.label.clone()),
            });
        }

        if let Some([start, end]) = self.regression {
            scene.push(Mark::Line {
                role: Role::Regression,
                x1: x.map(start.x),
                y1: y.map(start.y),
                x2: x.map(end.x),
                y2: y.map(end.y),
                stroke: REGRESSION_COLOR,
                stroke_width: 2.0,
                dash: Some("4 2"),
            });
        }

        axes::bottom_axis(&mut scene, &frame, Some(&x), tick_format(properties, Axis::X));
        axes::left_axis(&mut scene, &frame, &y, tick_format(properties, Axis::Y));
        axes::titles(&mut scene, &frame, display);
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points() -> Vec<DataPoint> {
        vec![
            DataPoint::new("Point 1", 0.0, 1.0),
            DataPoint::new("Point 2", 10.0, 21.0),
            DataPoint::new("Point 3", 5.0, 11.0),
        ]
    }

    #[test]
    fn test_circles_without_connecting_path() {
        let scene = ScatterChart { regression: None }.render(
            &points(),
            &GraphProperties::default(),
            Size::new(800.0, 600.0),
        );
        assert_eq!(
            scene
                .with_role(Role::Data)
                .filter(|m| matches!(m, Mark::Circle { .. }))
                .count(),
            3
        );
        assert!(!scene.marks.iter().any(|m| matches!(m, Mark::Path { .. })));
        assert_eq!(scene.with_role(Role::Regression).count(), 0);
    }

    #[test]
    fn test_regression_is_separate_series() {
        let line = [
            DataPoint::new("Regression start", 0.0, 1.0),
            DataPoint::new("Regression end", 10.0, 21.0),
        ];
        let scene = ScatterChart {
            regression: Some(&line),
        }
        .render(&points(), &GraphProperties::default(), Size::new(800.0, 600.0));

        let overlay: Vec<&Mark> = scene.with_role(Role::Regression).collect();
        assert_eq!(overlay.len(), 1);
        let Mark::Line { x1, x2, dash, .. } = overlay[0] else {
            panic!("regression must be a line mark");
        };
        assert!(x1 < x2);
        assert_eq!(*dash, Some("4 2"));
        // data series is unchanged by the overlay
        assert_eq!(scene.with_role(Role::Data).count(), 3);
    }
}
