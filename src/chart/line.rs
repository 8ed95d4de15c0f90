// Line chart: monotone path through sorted points, one marker per point
use super::axes::{self, Frame, Margin};
use super::curve::monotone_path;
use super::scene::{Mark, Role, Scene};
use super::{padded_scales, tick_format, ChartRenderer, Size, DATA_COLOR};
use crate::domain::display::DisplayProperties;
use crate::domain::graph::{Axis, DataPoint, GraphProperties, GraphType};

const MARGIN: Margin = Margin {
    top: 50.0,
    right: 50.0,
    bottom: 70.0,
    left: 70.0,
};

pub struct LineChart;

impl ChartRenderer for LineChart {
    fn graph_type(&self) -> GraphType {
        GraphType::Line
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
        let drawable: Vec<&DataPoint> = points.iter().filter(|p| p.is_finite()).collect();

        axes::vertical_grid(&mut scene, &frame, &x);
        axes::horizontal_grid(&mut scene, &frame, &y);

        let screen: Vec<(f64, f64)> = drawable.iter().map(|p| (x.map(p.x), y.map(p.y))).collect();
        scene.push(Mark::Path {
            role: Role::Data,
            d: monotone_path(&screen),
            stroke: DATA_COLOR,
            stroke_width: 2.0,
        });
        for (point, (cx, cy)) in drawable.iter().zip(&screen) {
            scene.push(Mark::Circle {
                role: Role::Data,
                cx: *cx,
                cy: *cy,
                r: 4.0,
                fill: DATA_COLOR,
                opacity: 0.7,
                tooltip: Some(point.label.clone()),
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

    #[test]
    fn test_one_path_and_marker_per_point() {
        let points = vec![
            DataPoint::new("Point 1", 3.0, 9.0),
            DataPoint::new("Point 2", 1.0, 1.0),
            DataPoint::new("Point 3", 2.0, 4.0),
        ];
        let scene = LineChart.render(&points, &GraphProperties::default(), Size::new(800.0, 600.0));

        let paths: Vec<&String> = scene
            .with_role(Role::Data)
            .filter_map(|m| match m {
                Mark::Path { d, .. } => Some(d),
                _ => None,
            })
            .collect();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].starts_with('M'));
        assert_eq!(paths[0].matches('C').count(), 2);

        let markers: Vec<(f64, &str)> = scene
            .with_role(Role::Data)
            .filter_map(|m| match m {
                Mark::Circle { cx, tooltip, .. } => Some((*cx, tooltip.as_deref().unwrap_or(""))),
                _ => None,
            })
            .collect();
        assert_eq!(
            markers.iter().map(|m| m.1).collect::<Vec<_>>(),
            vec!["Point 2", "Point 3", "Point 1"]
        );
        assert!(markers.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_time_axis_ticks_use_clock_format() {
        let points = vec![
            DataPoint::new("Point 1", 0.0, 1.0),
            DataPoint::new("Point 2", 3600.0, 2.0),
        ];
        let properties = GraphProperties {
            x_time_min: Some(0.0),
            x_time_max: Some(3600.0),
            ..GraphProperties::default()
        };
        let scene = LineChart.render(&points, &properties, Size::new(800.0, 600.0));
        assert!(scene.marks.iter().any(|m| matches!(
            m,
            Mark::Text { role: Role::Axis, content, .. } if content == "00:08:20"
        )));
        assert_eq!(
            scene.with_role(Role::Label).find_map(|m| match m {
                Mark::Text { content, .. } => Some(content.as_str()),
                _ => None,
            }),
            Some("Time")
        );
    }
}
