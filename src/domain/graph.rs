// Graph domain models
use super::transform::value_text;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attribute name that switches an axis to time-of-day ranges.
pub const TIME_ATTRIBUTE: &str = "Time";

/// Raw row as returned by the data service.
pub type Row = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphType {
    Bar,
    Line,
    Scatter,
}

impl GraphType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GraphType::Bar => "bar",
            GraphType::Line => "line",
            GraphType::Scatter => "scatter",
        }
    }

    /// Name used in auto-generated titles ("Bar Graph", ...)
    pub fn display_name(&self) -> &'static str {
        match self {
            GraphType::Bar => "Bar Graph",
            GraphType::Line => "Line Graph",
            GraphType::Scatter => "Scatter Graph",
        }
    }

    /// Only scatter plots ask the backend for a regression analysis.
    pub fn wants_analysis(&self) -> bool {
        matches!(self, GraphType::Scatter)
    }
}

/// Backend dataset category ("paramType" in the wizard)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Data,
    Experiments,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Data => "data",
            Collection::Experiments => "experiments",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "data" => Some(Collection::Data),
            "experiments" => Some(Collection::Experiments),
            _ => None,
        }
    }

    /// Identifier-like fields that never make sense as a graph axis
    pub fn excluded_attributes(&self) -> &'static [&'static str] {
        match self {
            Collection::Data => &["_id", "experimentId", "#", "dataSheetId"],
            Collection::Experiments => &["_id", "experimentId", "#", "Notes"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn name(&self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
        }
    }
}

/// Per-axis range. Which variant is allowed depends on whether the axis
/// attribute is [`TIME_ATTRIBUTE`]; time bounds are seconds since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AxisRange {
    #[default]
    Unset,
    Numeric { min: Option<f64>, max: Option<f64> },
    Time { min: Option<f64>, max: Option<f64> },
}

/// One plotted observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub label: String,
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    pub fn new(label: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            label: label.into(),
            x,
            y,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Linear regression coefficients computed by the data service
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    pub slope: f64,
    pub intercept: f64,
    #[serde(rename = "R_squared")]
    pub r_squared: f64,
}

/// Rendering configuration bag. Serialized with the keys the data service
/// stores, so saved graphs stay readable by older clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphProperties {
    #[serde(rename = "graph title", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "Selected Dates", default)]
    pub selected: Vec<String>,
    #[serde(rename = "x time min", default, skip_serializing_if = "Option::is_none")]
    pub x_time_min: Option<f64>,
    #[serde(rename = "x time max", default, skip_serializing_if = "Option::is_none")]
    pub x_time_max: Option<f64>,
    #[serde(rename = "y time min", default, skip_serializing_if = "Option::is_none")]
    pub y_time_min: Option<f64>,
    #[serde(rename = "y time max", default, skip_serializing_if = "Option::is_none")]
    pub y_time_max: Option<f64>,
    #[serde(rename = "min x", default, skip_serializing_if = "Option::is_none")]
    pub min_x: Option<f64>,
    #[serde(rename = "max x", default, skip_serializing_if = "Option::is_none")]
    pub max_x: Option<f64>,
    #[serde(rename = "min y", default, skip_serializing_if = "Option::is_none")]
    pub min_y: Option<f64>,
    #[serde(rename = "max y", default, skip_serializing_if = "Option::is_none")]
    pub max_y: Option<f64>,
    #[serde(rename = "x label", default, skip_serializing_if = "Option::is_none")]
    pub x_label: Option<String>,
    #[serde(rename = "y label", default, skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
}

impl GraphProperties {
    /// Configured lower/upper bound for an axis, time or numeric.
    pub fn bounds(&self, axis: Axis) -> (Option<f64>, Option<f64>) {
        match axis {
            Axis::X => (
                self.min_x.or(self.x_time_min),
                self.max_x.or(self.x_time_max),
            ),
            Axis::Y => (
                self.min_y.or(self.y_time_min),
                self.max_y.or(self.y_time_max),
            ),
        }
    }

    pub fn has_time_range(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.x_time_min.is_some() && self.x_time_max.is_some(),
            Axis::Y => self.y_time_min.is_some() && self.y_time_max.is_some(),
        }
    }

    pub fn has_numeric_range(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.min_x.is_some() && self.max_x.is_some(),
            Axis::Y => self.min_y.is_some() && self.max_y.is_some(),
        }
    }

    fn apply_range(&mut self, axis: Axis, range: AxisRange) {
        let (time, numeric) = match range {
            AxisRange::Unset => ((None, None), (None, None)),
            AxisRange::Numeric { min, max } => ((None, None), (min, max)),
            AxisRange::Time { min, max } => ((min, max), (None, None)),
        };
        match axis {
            Axis::X => {
                (self.x_time_min, self.x_time_max) = time;
                (self.min_x, self.max_x) = numeric;
            }
            Axis::Y => {
                (self.y_time_min, self.y_time_max) = time;
                (self.min_y, self.max_y) = numeric;
            }
        }
    }
}

/// Everything the wizard collected, consumed by the generation pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphRequest {
    pub graph_type: GraphType,
    pub collection: Collection,
    pub param_x: String,
    pub param_y: String,
    pub filter_x: Option<Value>,
    pub filter_y: Option<Value>,
    pub dates: Vec<String>,
    pub x_range: AxisRange,
    pub y_range: AxisRange,
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
}

impl GraphRequest {
    pub fn attributes(&self) -> [String; 2] {
        [self.param_x.clone(), self.param_y.clone()]
    }

    /// Set filters as `(attribute, value)`, X first
    pub fn filters(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        [
            (self.param_x.as_str(), self.filter_x.as_ref()),
            (self.param_y.as_str(), self.filter_y.as_ref()),
        ]
        .into_iter()
        .filter_map(|(attribute, value)| value.map(|v| (attribute, v)))
    }

    /// Dates first, then per-axis filter values, as shown in the title
    pub fn selected_values(&self) -> Vec<String> {
        let mut selected = self.dates.clone();
        selected.extend(self.filters().filter_map(|(_, value)| value_text(value)));
        selected
    }

    pub fn properties(&self) -> GraphProperties {
        let mut properties = GraphProperties {
            title: self.title.clone(),
            selected: self.selected_values(),
            x_label: axis_label(&self.x_label, &self.param_x),
            y_label: axis_label(&self.y_label, &self.param_y),
            ..GraphProperties::default()
        };
        properties.apply_range(Axis::X, self.x_range);
        properties.apply_range(Axis::Y, self.y_range);
        properties
    }
}

/// A blank label on a Time axis is stored as the attribute name.
fn axis_label(label: &Option<String>, attribute: &str) -> Option<String> {
    label
        .clone()
        .filter(|l| !l.trim().is_empty())
        .or_else(|| (attribute == TIME_ATTRIBUTE).then(|| attribute.to_string()))
}

/// Persisted snapshot of a generated graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedGraph {
    pub id: i64,
    pub graph_type: GraphType,
    pub data: Vec<Row>,
    pub properties: GraphProperties,
    pub attributes: [String; 2],
}

/// Graph handed to the persistence gateway; the id is assigned by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGraph {
    pub graph_type: GraphType,
    pub data: Vec<Row>,
    pub properties: GraphProperties,
    pub attributes: [String; 2],
}
