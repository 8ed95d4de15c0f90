// Row -> point transformation and regression overlay
use super::graph::{DataPoint, RegressionResult, Row};
use super::range::time_to_seconds;
use serde::Serialize;
use serde_json::Value;

/// Numeric reading of a cell, following `parseFloat` semantics: the longest
/// numeric prefix of a string wins, anything unreadable is NaN. Full
/// `HH:mm:ss` strings read as seconds since midnight.
pub fn parse_float(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => {
            if s.contains(':') {
                if let Some(seconds) = time_to_seconds(s) {
                    return f64::from(seconds);
                }
            }
            parse_float_prefix(s)
        }
        _ => f64::NAN,
    }
}

fn parse_float_prefix(s: &str) -> f64 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if s[end..].starts_with("Infinity") {
        return if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return f64::NAN;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().unwrap_or(f64::NAN)
}

/// One point per row, in row order. Unreadable values stay NaN.
pub fn to_points(rows: &[Row], x_attr: &str, y_attr: &str) -> Vec<DataPoint> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            DataPoint::new(
                format!("Point {}", index + 1),
                parse_float(row.get(x_attr)),
                parse_float(row.get(y_attr)),
            )
        })
        .collect()
}

/// Text form of a filter value, as shown in generated titles
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Two endpoints spanning the observed x range.
pub fn regression_line(points: &[DataPoint], result: &RegressionResult) -> Option<[DataPoint; 2]> {
    if !result.slope.is_finite() || !result.intercept.is_finite() {
        return None;
    }

    let (min, max) = points
        .iter()
        .map(|p| p.x)
        .filter(|x| x.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, x| match acc {
            None => Some((x, x)),
            Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
        })?;

    let at = |x: f64| result.slope * x + result.intercept;
    Some([
        DataPoint::new("Regression start", min, at(min)),
        DataPoint::new("Regression end", max, at(max)),
    ])
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionSummary {
    pub equation: String,
    pub r_squared: String,
    pub fit: &'static str,
}

impl RegressionSummary {
    pub fn describe(result: &RegressionResult) -> Self {
        let fit = if result.r_squared < 0.5 {
            "poor"
        } else {
            "moderate to strong"
        };
        Self {
            equation: format!("y = {:.2}x + {:.2}", result.slope, result.intercept),
            r_squared: format!("{:.2}", result.r_squared),
            fit,
        }
    }
}
