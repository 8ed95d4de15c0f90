// Axis range validation and input masking
use super::graph::{Axis, AxisRange, TIME_ATTRIBUTE};
use chrono::{NaiveTime, Timelike};
use serde::Serialize;
use thiserror::Error;

const TIME_FORMAT: &str = "%H:%M:%S";
const TIME_INPUT_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("Min time cannot be greater than max time.")]
    MinTimeAfterMax,
    #[error("Min value cannot be greater than max value.")]
    MinValueAboveMax,
    #[error("Time must be in HH:mm:ss format.")]
    MalformedTime,
    #[error("Range bounds must be numbers.")]
    MalformedNumber,
}

/// Errors for both axes, reported together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AxisErrors {
    pub x: Option<String>,
    pub y: Option<String>,
}

#[cfg(test)]
impl AxisErrors {
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none()
    }

    pub fn get(&self, axis: Axis) -> Option<&str> {
        match axis {
            Axis::X => self.x.as_deref(),
            Axis::Y => self.y.as_deref(),
        }
    }
}

impl std::fmt::Display for AxisErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = [(Axis::X, &self.x), (Axis::Y, &self.y)]
            .into_iter()
            .filter_map(|(axis, err)| err.as_ref().map(|e| format!("{} axis: {}", axis.name(), e)))
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// Raw min/max text for one axis, together with the attribute it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct AxisInput<'a> {
    pub attribute: &'a str,
    pub min: &'a str,
    pub max: &'a str,
}

pub fn is_time_attribute(attribute: &str) -> bool {
    attribute == TIME_ATTRIBUTE
}

/// Convert `HH:mm:ss` into seconds since midnight
pub fn time_to_seconds(value: &str) -> Option<u32> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT)
        .ok()
        .map(|t| t.num_seconds_from_midnight())
}

/// Render seconds since midnight back to `HH:mm:ss`, wrapping past a day
pub fn seconds_to_time(seconds: f64) -> String {
    let secs = seconds.rem_euclid(86_400.0).floor() as u32;
    NaiveTime::from_num_seconds_from_midnight_opt(secs, 0)
        .map(|t| t.format(TIME_FORMAT).to_string())
        .unwrap_or_default()
}

fn parse_bound(attribute: &str, raw: &str) -> Result<Option<f64>, RangeError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if is_time_attribute(attribute) {
        time_to_seconds(raw)
            .map(|s| Some(f64::from(s)))
            .ok_or(RangeError::MalformedTime)
    } else {
        raw.parse::<f64>()
            .map(Some)
            .map_err(|_| RangeError::MalformedNumber)
    }
}

/// Validate one axis and return its parsed bounds. Blank bounds are unset
/// and never compared.
pub fn validate_range(attribute: &str, min: &str, max: &str) -> Result<(Option<f64>, Option<f64>), RangeError> {
    let lo = parse_bound(attribute, min)?;
    let hi = parse_bound(attribute, max)?;

    if let (Some(lo), Some(hi)) = (lo, hi) {
        if lo > hi {
            return Err(if is_time_attribute(attribute) {
                RangeError::MinTimeAfterMax
            } else {
                RangeError::MinValueAboveMax
            });
        }
    }
    Ok((lo, hi))
}

/// Validate and convert one axis into its typed range.
pub fn parse_range(attribute: &str, min: &str, max: &str) -> Result<AxisRange, RangeError> {
    Ok(match validate_range(attribute, min, max)? {
        (None, None) => AxisRange::Unset,
        (min, max) if is_time_attribute(attribute) => AxisRange::Time { min, max },
        (min, max) => AxisRange::Numeric { min, max },
    })
}

/// Validate both axes without short-circuiting.
pub fn validate_axes(x: AxisInput<'_>, y: AxisInput<'_>) -> Result<(AxisRange, AxisRange), AxisErrors> {
    let x_result = parse_range(x.attribute, x.min, x.max);
    let y_result = parse_range(y.attribute, y.min, y.max);

    match (x_result, y_result) {
        (Ok(x), Ok(y)) => Ok((x, y)),
        (x, y) => Err(AxisErrors {
            x: x.err().map(|e| e.to_string()),
            y: y.err().map(|e| e.to_string()),
        }),
    }
}

/// Keystroke mask for `HH:mm:ss` inputs.
pub fn mask_time_input(value: &str) -> String {
    let mut masked: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ':')
        .collect();

    if masked.len() == 2 || masked.len() == 5 {
        masked.push(':');
    }
    masked.truncate(TIME_INPUT_LEN);
    masked
}

/// Keystroke mask for numeric inputs: digits only.
pub fn mask_numeric_input(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Mask matching the attribute's range kind.
pub fn mask_input(attribute: &str, value: &str) -> String {
    if is_time_attribute(attribute) {
        mask_time_input(value)
    } else {
        mask_numeric_input(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_ranges() {
        for (min, max) in [(0.0, 1.0), (5.0, 5.0), (-3.5, 2.0), (10.0, 100.0)] {
            assert!(validate_range("pH", &min.to_string(), &max.to_string()).is_ok());
        }
        for (min, max) in [(1.0, 0.0), (100.0, 10.0), (2.0, -3.5)] {
            let err = validate_range("pH", &min.to_string(), &max.to_string()).unwrap_err();
            assert_eq!(err, RangeError::MinValueAboveMax);
            assert!(!err.to_string().is_empty());
        }
    }

    #[test]
    fn test_time_ranges() {
        assert_eq!(
            validate_range("Time", "00:00:10", "00:00:05"),
            Err(RangeError::MinTimeAfterMax)
        );
        assert_eq!(
            validate_range("Time", "00:00:05", "00:00:10"),
            Ok((Some(5.0), Some(10.0)))
        );
        assert_eq!(time_to_seconds("01:02:03"), Some(3723));
        assert_eq!(
            validate_range("Time", "12:3", "13:00:00"),
            Err(RangeError::MalformedTime)
        );
    }

    #[test]
    fn test_blank_bounds_are_unset() {
        assert_eq!(parse_range("pH", "", ""), Ok(AxisRange::Unset));
        assert_eq!(
            parse_range("pH", "5", ""),
            Ok(AxisRange::Numeric {
                min: Some(5.0),
                max: None
            })
        );
        assert_eq!(
            parse_range("Time", "", "00:01:00"),
            Ok(AxisRange::Time {
                min: None,
                max: Some(60.0)
            })
        );
    }

    #[test]
    fn test_validate_axes_reports_both() {
        let x = AxisInput {
            attribute: "Time",
            min: "00:00:10",
            max: "00:00:05",
        };
        let y = AxisInput {
            attribute: "U Cmm",
            min: "9",
            max: "1",
        };
        let errors = validate_axes(x, y).unwrap_err();
        assert_eq!(errors.get(Axis::X), Some("Min time cannot be greater than max time."));
        assert_eq!(errors.get(Axis::Y), Some("Min value cannot be greater than max value."));
        assert!(errors.to_string().contains("Y axis"));
    }

    #[test]
    fn test_time_mask() {
        assert_eq!(mask_time_input("12"), "12:");
        assert_eq!(mask_time_input("12:34"), "12:34:");
        assert_eq!(mask_time_input("1a2"), "12:");
        assert_eq!(mask_time_input("12:34:567"), "12:34:56");
        assert_eq!(mask_time_input("1"), "1");
    }

    #[test]
    fn test_numeric_mask() {
        assert_eq!(mask_numeric_input("1.5e3-"), "153");
        assert_eq!(mask_input("pH", "a42"), "42");
        assert_eq!(mask_input("Time", "00"), "00:");
    }

    #[test]
    fn test_seconds_to_time() {
        assert_eq!(seconds_to_time(3723.0), "01:02:03");
        assert_eq!(seconds_to_time(86_400.0 + 5.0), "00:00:05");
    }
}
