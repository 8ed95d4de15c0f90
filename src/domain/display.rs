// Title and axis label resolution shared by every rendering site
use super::graph::{Axis, GraphProperties, GraphType};
use serde::Serialize;

/// Text a chart actually shows, with blank fields auto-derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayProperties {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl DisplayProperties {
    pub fn resolve(graph_type: GraphType, properties: &GraphProperties) -> Self {
        Self {
            title: given(&properties.title).unwrap_or_else(|| auto_title(graph_type, properties)),
            x_label: given(&properties.x_label)
                .unwrap_or_else(|| auto_label(Axis::X, properties).to_string()),
            y_label: given(&properties.y_label)
                .unwrap_or_else(|| auto_label(Axis::Y, properties).to_string()),
        }
    }
}

fn given(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn auto_label(axis: Axis, properties: &GraphProperties) -> &'static str {
    match axis {
        Axis::X if properties.has_time_range(Axis::X) => "Time",
        Axis::X if properties.has_numeric_range(Axis::X) => "X Value",
        Axis::X => "X Axis",
        Axis::Y if properties.has_time_range(Axis::Y) => "Time",
        Axis::Y if properties.has_numeric_range(Axis::Y) => "Y Value",
        Axis::Y => "Y Axis",
    }
}

pub fn auto_title(graph_type: GraphType, properties: &GraphProperties) -> String {
    if !properties.selected.is_empty() {
        return format!("Data for {}", properties.selected.join(", "));
    }

    match (
        properties.min_x,
        properties.max_x,
        properties.min_y,
        properties.max_y,
    ) {
        (Some(min_x), Some(max_x), Some(min_y), Some(max_y)) => format!(
            "{} (X: {} to {}, Y: {} to {})",
            graph_type.display_name(),
            min_x,
            max_x,
            min_y,
            max_y
        ),
        _ => graph_type.display_name().to_string(),
    }
}
