// Plot frame: margins, gridlines, axes, title and axis labels
use super::scale::LinearScale;
use super::scene::{Anchor, Mark, Role, Scene};
use crate::domain::display::DisplayProperties;
use crate::domain::range::seconds_to_time;

pub const AXIS_COLOR: &str = "#64748b";
pub const GRID_COLOR: &str = "#e2e8f0";
const TEXT_SIZE: f64 = 12.0;
const TITLE_SIZE: f64 = 16.0;
const TICK_COUNT: usize = 10;
const TICK_LENGTH: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
}

impl Frame {
    pub fn new(width: f64, height: f64, margin: Margin) -> Self {
        Self {
            width,
            height,
            margin,
        }
    }

    pub fn inner_width(&self) -> f64 {
        (self.width - self.margin.left - self.margin.right).max(0.0)
    }

    pub fn inner_height(&self) -> f64 {
        (self.height - self.margin.top - self.margin.bottom).max(0.0)
    }

    pub fn left(&self) -> f64 {
        self.margin.left
    }

    pub fn right(&self) -> f64 {
        self.margin.left + self.inner_width()
    }

    pub fn top(&self) -> f64 {
        self.margin.top
    }

    pub fn bottom(&self) -> f64 {
        self.margin.top + self.inner_height()
    }

    pub fn x_range(&self) -> (f64, f64) {
        (self.left(), self.right())
    }

    /// Screen y grows downwards, so the range is inverted.
    pub fn y_range(&self) -> (f64, f64) {
        (self.bottom(), self.top())
    }
}

/// How tick values are printed on an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFormat {
    Number,
    TimeOfDay,
    Hidden,
}

fn format_tick(value: f64, step: f64, format: TickFormat) -> Option<String> {
    match format {
        TickFormat::Hidden => None,
        TickFormat::TimeOfDay => Some(seconds_to_time(value)),
        TickFormat::Number => {
            let decimals = if step.is_finite() && step > 0.0 {
                (-step.log10().floor()).max(0.0) as usize
            } else {
                0
            };
            let value = if value == 0.0 { 0.0 } else { value };
            Some(format!("{:.*}", decimals, value))
        }
    }
}

pub fn horizontal_grid(scene: &mut Scene, frame: &Frame, y: &LinearScale) {
    for tick in y.ticks(TICK_COUNT) {
        let py = y.map(tick);
        scene.push(Mark::Line {
            role: Role::Grid,
            x1: frame.left(),
            y1: py,
            x2: frame.right(),
            y2: py,
            stroke: GRID_COLOR,
            stroke_width: 1.0,
            dash: None,
        });
    }
}

pub fn vertical_grid(scene: &mut Scene, frame: &Frame, x: &LinearScale) {
    for tick in x.ticks(TICK_COUNT) {
        let px = x.map(tick);
        scene.push(Mark::Line {
            role: Role::Grid,
            x1: px,
            y1: frame.top(),
            x2: px,
            y2: frame.bottom(),
            stroke: GRID_COLOR,
            stroke_width: 1.0,
            dash: None,
        });
    }
}

fn axis_line(scene: &mut Scene, x1: f64, y1: f64, x2: f64, y2: f64) {
    scene.push(Mark::Line {
        role: Role::Axis,
        x1,
        y1,
        x2,
        y2,
        stroke: AXIS_COLOR,
        stroke_width: 1.0,
        dash: None,
    });
}

fn tick_text(scene: &mut Scene, x: f64, y: f64, content: String, anchor: Anchor) {
    scene.push(Mark::Text {
        role: Role::Axis,
        x,
        y,
        content,
        anchor,
        size: TEXT_SIZE,
        bold: false,
        rotate: None,
    });
}

/// Bottom axis line; ticks only when a linear scale is given.
pub fn bottom_axis(scene: &mut Scene, frame: &Frame, x: Option<&LinearScale>, format: TickFormat) {
    axis_line(scene, frame.left(), frame.bottom(), frame.right(), frame.bottom());
    let Some(x) = x else {
        return;
    };
    let step = x.tick_step(TICK_COUNT);
    for tick in x.ticks(TICK_COUNT) {
        let px = x.map(tick);
        axis_line(scene, px, frame.bottom(), px, frame.bottom() + TICK_LENGTH);
        if let Some(text) = format_tick(tick, step, format) {
            tick_text(scene, px, frame.bottom() + TICK_LENGTH + TEXT_SIZE + 2.0, text, Anchor::Middle);
        }
    }
}

pub fn left_axis(scene: &mut Scene, frame: &Frame, y: &LinearScale, format: TickFormat) {
    axis_line(scene, frame.left(), frame.top(), frame.left(), frame.bottom());
    let step = y.tick_step(TICK_COUNT);
    for tick in y.ticks(TICK_COUNT) {
        let py = y.map(tick);
        axis_line(scene, frame.left() - TICK_LENGTH, py, frame.left(), py);
        if let Some(text) = format_tick(tick, step, format) {
            tick_text(scene, frame.left() - TICK_LENGTH - 3.0, py + TEXT_SIZE / 3.0, text, Anchor::End);
        }
    }
}

/// Title centred above the plot plus a label beside each axis.
pub fn titles(scene: &mut Scene, frame: &Frame, display: &DisplayProperties) {
    scene.push(Mark::Text {
        role: Role::Title,
        x: frame.width / 2.0,
        y: frame.margin.top / 2.0 + TITLE_SIZE / 3.0,
        content: display.title.clone(),
        anchor: Anchor::Middle,
        size: TITLE_SIZE,
        bold: true,
        rotate: None,
    });
    scene.push(Mark::Text {
        role: Role::Label,
        x: frame.left() + frame.inner_width() / 2.0,
        y: frame.bottom() + frame.margin.bottom * 0.6,
        content: display.x_label.clone(),
        anchor: Anchor::Middle,
        size: TEXT_SIZE,
        bold: false,
        rotate: None,
    });
    scene.push(Mark::Text {
        role: Role::Label,
        x: frame.left() - frame.margin.left * 0.7,
        y: frame.top() + frame.inner_height() / 2.0,
        content: display.y_label.clone(),
        anchor: Anchor::Middle,
        size: TEXT_SIZE,
        bold: false,
        rotate: Some(-90.0),
    });
}
