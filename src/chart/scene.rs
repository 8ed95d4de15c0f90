// Declarative chart output and its SVG serialization
use serde::Serialize;
use std::fmt::Write;

/// What a mark belongs to, so callers can tell the data series from decoration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Data,
    Regression,
    Grid,
    Axis,
    Title,
    Label,
}

impl Role {
    fn as_str(&self) -> &'static str {
        match self {
            Role::Data => "data",
            Role::Regression => "regression",
            Role::Grid => "grid",
            Role::Axis => "axis",
            Role::Title => "title",
            Role::Label => "label",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Middle,
    End,
}

impl Anchor {
    fn as_str(&self) -> &'static str {
        match self {
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mark", rename_all = "lowercase")]
pub enum Mark {
    Rect {
        role: Role,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: &'static str,
        opacity: f64,
        hover_opacity: Option<f64>,
        tooltip: Option<String>,
    },
    Circle {
        role: Role,
        cx: f64,
        cy: f64,
        r: f64,
        fill: &'static str,
        opacity: f64,
        tooltip: Option<String>,
    },
    Path {
        role: Role,
        d: String,
        stroke: &'static str,
        stroke_width: f64,
    },
    Line {
        role: Role,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: &'static str,
        stroke_width: f64,
        dash: Option<&'static str>,
    },
    Text {
        role: Role,
        x: f64,
        y: f64,
        content: String,
        anchor: Anchor,
        size: f64,
        bold: bool,
        rotate: Option<f64>,
    },
}

impl Mark {
    pub fn role(&self) -> Role {
        match self {
            Mark::Rect { role, .. }
            | Mark::Circle { role, .. }
            | Mark::Path { role, .. }
            | Mark::Line { role, .. }
            | Mark::Text { role, .. } => *role,
        }
    }
}

/// Complete drawing for one render; a new render replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub marks: Vec<Mark>,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            marks: Vec::new(),
        }
    }

    pub fn push(&mut self, mark: Mark) {
        self.marks.push(mark);
    }

    #[cfg(test)]
    pub fn with_role(&self, role: Role) -> impl Iterator<Item = &Mark> {
        self.marks.iter().filter(move |m| m.role() == role)
    }

    /// Text of the first mark with the given role
    #[cfg(test)]
    pub fn text(&self, role: Role) -> Option<&str> {
        self.with_role(role).find_map(|m| match m {
            Mark::Text { content, .. } => Some(content.as_str()),
            _ => None,
        })
    }

    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
            w = fmt_num(self.width),
            h = fmt_num(self.height)
        );
        if self
            .marks
            .iter()
            .any(|m| matches!(m, Mark::Rect { hover_opacity: Some(_), .. }))
        {
            svg.push_str("<style>rect[data-hover]:hover{opacity:var(--hover)}</style>");
        }
        svg.push_str(r##"<rect width="100%" height="100%" fill="#ffffff"/>"##);
        for mark in &self.marks {
            write_mark(&mut svg, mark);
        }
        svg.push_str("</svg>");
        svg
    }
}

fn write_mark(svg: &mut String, mark: &Mark) {
    let class = mark.role().as_str();
    let _ = match mark {
        Mark::Rect {
            x,
            y,
            width,
            height,
            fill,
            opacity,
            hover_opacity,
            tooltip,
            ..
        } => {
            let hover = hover_opacity
                .map(|h| format!(r#" data-hover="" style="--hover:{}""#, fmt_num(h)))
                .unwrap_or_default();
            write!(
                svg,
                r#"<rect class="{class}" x="{}" y="{}" width="{}" height="{}" rx="2" fill="{}" opacity="{}"{}>{}</rect>"#,
                fmt_num(*x),
                fmt_num(*y),
                fmt_num(*width),
                fmt_num(*height),
                fill,
                fmt_num(*opacity),
                hover,
                title(tooltip)
            )
        }
        Mark::Circle {
            cx,
            cy,
            r,
            fill,
            opacity,
            tooltip,
            ..
        } => write!(
            svg,
            r#"<circle class="{class}" cx="{}" cy="{}" r="{}" fill="{}" opacity="{}">{}</circle>"#,
            fmt_num(*cx),
            fmt_num(*cy),
            fmt_num(*r),
            fill,
            fmt_num(*opacity),
            title(tooltip)
        ),
        Mark::Path {
            d,
            stroke,
            stroke_width,
            ..
        } => write!(
            svg,
            r#"<path class="{class}" d="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
            d,
            stroke,
            fmt_num(*stroke_width)
        ),
        Mark::Line {
            x1,
            y1,
            x2,
            y2,
            stroke,
            stroke_width,
            dash,
            ..
        } => write!(
            svg,
            r#"<line class="{class}" x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"{}/>"#,
            fmt_num(*x1),
            fmt_num(*y1),
            fmt_num(*x2),
            fmt_num(*y2),
            stroke,
            fmt_num(*stroke_width),
            dash.map(|d| format!(r#" stroke-dasharray="{}""#, d))
                .unwrap_or_default()
        ),
        Mark::Text {
            x,
            y,
            content,
            anchor,
            size,
            bold,
            rotate,
            ..
        } => {
            let transform = rotate
                .map(|deg| {
                    format!(
                        r#" transform="rotate({} {} {})""#,
                        fmt_num(deg),
                        fmt_num(*x),
                        fmt_num(*y)
                    )
                })
                .unwrap_or_default();
            write!(
                svg,
                r#"<text class="{class}" x="{}" y="{}" text-anchor="{}" font-size="{}"{}{}>{}</text>"#,
                fmt_num(*x),
                fmt_num(*y),
                anchor.as_str(),
                fmt_num(*size),
                if *bold { r#" font-weight="bold""# } else { "" },
                transform,
                escape(content)
            )
        }
    };
}

fn title(tooltip: &Option<String>) -> String {
    tooltip
        .as_deref()
        .map(|t| format!("<title>{}</title>", escape(t)))
        .unwrap_or_default()
}

/// Escape text for XML content and attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Coordinate formatting: two decimals at most, no trailing zeros.
pub fn fmt_num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let text = format!("{:.2}", rounded);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
