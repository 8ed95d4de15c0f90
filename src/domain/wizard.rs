// Graph form wizard - four ordered steps sharing one state object
use super::graph::{Axis, Collection, GraphRequest, GraphType};
use super::range::{mask_input, validate_axes, AxisErrors, AxisInput};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    #[default]
    Graph,
    Parameters,
    Filter,
    Customize,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Graph,
        WizardStep::Parameters,
        WizardStep::Filter,
        WizardStep::Customize,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    fn prev(self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("{0} must be selected before continuing")]
    Incomplete(&'static str),
    #[error("At least two experiment dates must be selected")]
    NotEnoughDates,
    #[error("Already at the last step; submit instead")]
    LastStep,
    #[error("Graph can only be submitted from the Customize step")]
    NotReady,
    #[error("Graph title is required")]
    TitleRequired,
    #[error("{0}")]
    InvalidRanges(AxisErrors),
}

/// Product rules the two historical wizard variants disagreed on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct WizardRules {
    #[serde(default)]
    pub require_title: bool,
    #[serde(default)]
    pub require_experiment_dates: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bound {
    Min,
    Max,
}

/// One user edit. Serialized as `{"action": "...", ...}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum WizardAction {
    SetGraphType { graph_type: GraphType },
    SetCollection { collection: Collection },
    SetParam { axis: Axis, attribute: String },
    SetFilter { axis: Axis, value: Option<Value> },
    SetDates { dates: Vec<String> },
    SetRange { axis: Axis, bound: Bound, value: String },
    SetTitle { title: String },
    SetLabel { axis: Axis, label: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RangeInput {
    pub min: String,
    pub max: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AxisForm {
    pub attribute: Option<String>,
    pub filter: Option<Value>,
    pub range: RangeInput,
    pub label: String,
}

impl AxisForm {
    fn input(&self) -> AxisInput<'_> {
        AxisInput {
            attribute: self.attribute.as_deref().unwrap_or_default(),
            min: &self.range.min,
            max: &self.range.max,
        }
    }
}

/// Single-owner wizard state. Reset is explicit; nothing is cleared implicitly
/// apart from fields that depend on a changed selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphForm {
    step: WizardStep,
    graph_type: Option<GraphType>,
    collection: Option<Collection>,
    x: AxisForm,
    y: AxisForm,
    dates: Vec<String>,
    title: String,
    errors: AxisErrors,
    #[serde(skip)]
    rules: WizardRules,
}

impl GraphForm {
    pub fn new(rules: WizardRules) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.rules);
    }

    #[cfg(test)]
    pub fn step(&self) -> WizardStep {
        self.step
    }

    #[cfg(test)]
    pub fn errors(&self) -> &AxisErrors {
        &self.errors
    }

    #[cfg(test)]
    pub fn axis(&self, axis: Axis) -> &AxisForm {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    fn axis_mut(&mut self, axis: Axis) -> &mut AxisForm {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
        }
    }

    pub fn apply(&mut self, action: WizardAction) {
        match action {
            WizardAction::SetGraphType { graph_type } => self.graph_type = Some(graph_type),
            WizardAction::SetCollection { collection } => {
                if self.collection != Some(collection) {
                    self.collection = Some(collection);
                    for axis in [Axis::X, Axis::Y] {
                        let form = self.axis_mut(axis);
                        form.attribute = None;
                        form.filter = None;
                        form.range = RangeInput::default();
                    }
                }
            }
            WizardAction::SetParam { axis, attribute } => {
                let form = self.axis_mut(axis);
                if form.attribute.as_deref() != Some(attribute.as_str()) {
                    // range kind and filter values both depend on the attribute
                    form.range = RangeInput::default();
                    form.filter = None;
                }
                form.attribute = Some(attribute).filter(|a| !a.is_empty());
            }
            WizardAction::SetFilter { axis, value } => {
                // values keep their JSON type; the data service compares them strictly
                self.axis_mut(axis).filter = value.filter(|v| !v.is_null() && v.as_str() != Some(""));
            }
            WizardAction::SetDates { dates } => self.dates = dates,
            WizardAction::SetRange { axis, bound, value } => {
                let form = self.axis_mut(axis);
                let masked = mask_input(form.attribute.as_deref().unwrap_or_default(), &value);
                match bound {
                    Bound::Min => form.range.min = masked,
                    Bound::Max => form.range.max = masked,
                }
            }
            WizardAction::SetTitle { title } => self.title = title,
            WizardAction::SetLabel { axis, label } => self.axis_mut(axis).label = label,
        }
    }

    fn check_step(&self) -> Result<(), WizardError> {
        match self.step {
            WizardStep::Graph => {
                if self.graph_type.is_none() {
                    return Err(WizardError::Incomplete("Graph type"));
                }
            }
            WizardStep::Parameters => {
                let collection = self
                    .collection
                    .ok_or(WizardError::Incomplete("Parameter type"))?;
                if self.x.attribute.is_none() {
                    return Err(WizardError::Incomplete("X parameter"));
                }
                if self.y.attribute.is_none() {
                    return Err(WizardError::Incomplete("Y parameter"));
                }
                if self.rules.require_experiment_dates
                    && collection == Collection::Experiments
                    && self.dates.len() < 2
                {
                    return Err(WizardError::NotEnoughDates);
                }
            }
            WizardStep::Filter | WizardStep::Customize => {}
        }
        Ok(())
    }

    /// Advance one step. On error the step index is unchanged.
    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        self.check_step()?;
        let next = self.step.next().ok_or(WizardError::LastStep)?;
        self.step = next;
        Ok(next)
    }

    /// Go back one step and refresh the range errors.
    pub fn back(&mut self) -> WizardStep {
        if let Some(prev) = self.step.prev() {
            self.step = prev;
        }
        self.errors = match validate_axes(self.x.input(), self.y.input()) {
            Ok(_) => AxisErrors::default(),
            Err(errors) => errors,
        };
        self.step
    }

    /// Validate the customize step and build the request.
    pub fn submit(&mut self) -> Result<GraphRequest, WizardError> {
        if self.step != WizardStep::Customize {
            return Err(WizardError::NotReady);
        }

        let ranges = validate_axes(self.x.input(), self.y.input());
        self.errors = match &ranges {
            Ok(_) => AxisErrors::default(),
            Err(errors) => errors.clone(),
        };
        let (x_range, y_range) = ranges.map_err(WizardError::InvalidRanges)?;

        if self.rules.require_title && self.title.trim().is_empty() {
            return Err(WizardError::TitleRequired);
        }

        let (graph_type, collection, param_x, param_y) = match (
            self.graph_type,
            self.collection,
            self.x.attribute.clone(),
            self.y.attribute.clone(),
        ) {
            (Some(g), Some(c), Some(x), Some(y)) => (g, c, x, y),
            _ => return Err(WizardError::NotReady),
        };

        Ok(GraphRequest {
            graph_type,
            collection,
            param_x,
            param_y,
            filter_x: self.x.filter.clone(),
            filter_y: self.y.filter.clone(),
            dates: self.dates.clone(),
            x_range,
            y_range,
            title: non_blank(&self.title),
            x_label: non_blank(&self.x.label),
            y_label: non_blank(&self.y.label),
        })
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::graph::AxisRange;

    fn param(axis: Axis, attribute: &str) -> WizardAction {
        WizardAction::SetParam {
            axis,
            attribute: attribute.to_string(),
        }
    }

    fn range(axis: Axis, bound: Bound, value: &str) -> WizardAction {
        WizardAction::SetRange {
            axis,
            bound,
            value: value.to_string(),
        }
    }

    fn form_at_customize(x: &str, y: &str) -> GraphForm {
        let mut form = GraphForm::default();
        form.apply(WizardAction::SetGraphType {
            graph_type: GraphType::Bar,
        });
        form.next().unwrap();
        form.apply(WizardAction::SetCollection {
            collection: Collection::Data,
        });
        form.apply(param(Axis::X, x));
        form.apply(param(Axis::Y, y));
        form.next().unwrap();
        form.next().unwrap();
        form
    }

    #[test]
    fn test_next_is_gated_on_graph_type() {
        let mut form = GraphForm::default();
        assert_eq!(form.next(), Err(WizardError::Incomplete("Graph type")));
        assert_eq!(form.step(), WizardStep::Graph);

        form.apply(WizardAction::SetGraphType {
            graph_type: GraphType::Line,
        });
        assert_eq!(form.next(), Ok(WizardStep::Parameters));
        assert_eq!(form.step().index(), 1);
    }

    #[test]
    fn test_parameters_gate() {
        let mut form = GraphForm::default();
        form.apply(WizardAction::SetGraphType {
            graph_type: GraphType::Line,
        });
        form.next().unwrap();

        assert!(form.next().is_err());
        form.apply(WizardAction::SetCollection {
            collection: Collection::Experiments,
        });
        form.apply(param(Axis::X, "Date"));
        assert_eq!(form.next(), Err(WizardError::Incomplete("Y parameter")));
        form.apply(param(Axis::Y, "Date"));
        assert_eq!(form.next(), Ok(WizardStep::Filter));
        assert_eq!(form.next(), Ok(WizardStep::Customize));
        assert_eq!(form.next(), Err(WizardError::LastStep));
        assert_eq!(form.step(), WizardStep::Customize);
    }

    #[test]
    fn test_experiment_dates_rule() {
        let mut form = GraphForm::new(WizardRules {
            require_experiment_dates: true,
            ..WizardRules::default()
        });
        form.apply(WizardAction::SetGraphType {
            graph_type: GraphType::Scatter,
        });
        form.next().unwrap();
        form.apply(WizardAction::SetCollection {
            collection: Collection::Experiments,
        });
        form.apply(param(Axis::X, "pH"));
        form.apply(param(Axis::Y, "Temp"));
        assert_eq!(form.next(), Err(WizardError::NotEnoughDates));

        form.apply(WizardAction::SetDates {
            dates: vec!["2025-01-01".into(), "2025-02-01".into()],
        });
        assert_eq!(form.next(), Ok(WizardStep::Filter));
    }

    #[test]
    fn test_submit_reports_both_axis_errors() {
        let mut form = form_at_customize("Time", "U Cmm");
        form.apply(range(Axis::X, Bound::Min, "00:00:10"));
        form.apply(range(Axis::X, Bound::Max, "00:00:05"));
        form.apply(range(Axis::Y, Bound::Min, "9x"));
        form.apply(range(Axis::Y, Bound::Max, "1"));
        assert_eq!(form.axis(Axis::X).range.min, "00:00:10");
        assert_eq!(form.axis(Axis::Y).range.min, "9");

        let err = form.submit().unwrap_err();
        assert!(matches!(err, WizardError::InvalidRanges(_)));
        assert_eq!(form.step(), WizardStep::Customize);
        assert!(form.errors().x.is_some());
        assert!(form.errors().y.is_some());
    }

    #[test]
    fn test_back_clears_stale_errors() {
        let mut form = form_at_customize("pH", "Temp");
        form.apply(range(Axis::Y, Bound::Min, "9"));
        form.apply(range(Axis::Y, Bound::Max, "1"));
        assert!(form.submit().is_err());
        assert!(!form.errors().is_empty());

        form.apply(range(Axis::Y, Bound::Max, "10"));
        assert_eq!(form.back(), WizardStep::Filter);
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_submit_builds_request() {
        let mut form = form_at_customize("Time", "U Cmm");
        form.apply(WizardAction::SetFilter {
            axis: Axis::Y,
            value: Some(serde_json::json!(3)),
        });
        form.apply(WizardAction::SetLabel {
            axis: Axis::X,
            label: "  ".to_string(),
        });
        form.apply(range(Axis::Y, Bound::Min, "1"));

        let request = form.submit().unwrap();
        assert_eq!(request.graph_type, GraphType::Bar);
        assert_eq!(request.collection, Collection::Data);
        assert_eq!(request.attributes(), ["Time".to_string(), "U Cmm".to_string()]);
        assert_eq!(request.filter_y, Some(serde_json::json!(3)));
        assert_eq!(request.x_range, AxisRange::Unset);
        assert_eq!(
            request.y_range,
            AxisRange::Numeric {
                min: Some(1.0),
                max: None
            }
        );
        assert_eq!(request.title, None);
        assert_eq!(request.x_label, None);
    }

    #[test]
    fn test_title_rule() {
        let mut form = form_at_customize("pH", "Temp");
        form.rules.require_title = true;
        assert_eq!(form.submit(), Err(WizardError::TitleRequired));
        form.apply(WizardAction::SetTitle {
            title: "Run 4".to_string(),
        });
        assert_eq!(form.submit().unwrap().title.as_deref(), Some("Run 4"));
    }

    #[test]
    fn test_changing_selection_clears_dependents() {
        let mut form = form_at_customize("pH", "Temp");
        form.apply(range(Axis::X, Bound::Min, "4"));
        form.apply(WizardAction::SetFilter {
            axis: Axis::X,
            value: Some(serde_json::json!("7")),
        });
        form.apply(param(Axis::X, "Time"));
        assert_eq!(form.axis(Axis::X).range, RangeInput::default());
        assert_eq!(form.axis(Axis::X).filter, None);

        form.apply(WizardAction::SetCollection {
            collection: Collection::Experiments,
        });
        assert_eq!(form.axis(Axis::Y).attribute, None);
    }

    #[test]
    fn test_reset_restores_defaults_and_keeps_rules() {
        let rules = WizardRules {
            require_title: true,
            require_experiment_dates: false,
        };
        let mut form = GraphForm::new(rules);
        form.apply(WizardAction::SetGraphType {
            graph_type: GraphType::Bar,
        });
        form.next().unwrap();
        form.reset();
        assert_eq!(form, GraphForm::new(rules));
        assert_eq!(form.step(), WizardStep::Graph);
    }

    #[test]
    fn test_action_wire_format() {
        let action: WizardAction = serde_json::from_value(serde_json::json!({
            "action": "set_range", "axis": "x", "bound": "max", "value": "12"
        }))
        .unwrap();
        assert_eq!(action, range(Axis::X, Bound::Max, "12"));

        let action: WizardAction = serde_json::from_value(serde_json::json!({
            "action": "set_filter", "axis": "y", "value": 7.5
        }))
        .unwrap();
        assert_eq!(
            action,
            WizardAction::SetFilter {
                axis: Axis::Y,
                value: Some(serde_json::json!(7.5))
            }
        );
    }

    #[test]
    fn test_back_at_first_step_stays_put() {
        let mut form = GraphForm::default();
        assert_eq!(form.back(), WizardStep::Graph);
        assert_eq!(form.step().index(), 0);
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_blank_filter_is_cleared() {
        let mut form = form_at_customize("pH", "Temp");
        for value in [Some(serde_json::json!(7)), Some(serde_json::json!(""))] {
            form.apply(WizardAction::SetFilter { axis: Axis::X, value });
        }
        assert_eq!(form.axis(Axis::X).filter, None);

        form.apply(WizardAction::SetFilter {
            axis: Axis::X,
            value: Some(serde_json::json!(0)),
        });
        assert_eq!(form.submit().unwrap().filter_x, Some(serde_json::json!(0)));
    }
}
