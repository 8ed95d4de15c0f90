// Scales, domains and ticks
use crate::domain::graph::DataPoint;

/// Fraction added on each side of a padded domain
pub const DOMAIN_PADDING: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Round-number ticks inside the domain, about `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = ordered(self.domain);
        let step = tick_step(lo, hi, count);
        if !step.is_finite() || step <= 0.0 {
            return Vec::new();
        }

        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        if last < first || last - first > 1_000 {
            return Vec::new();
        }
        (first..=last).map(|i| i as f64 * step).collect()
    }

    pub fn tick_step(&self, count: usize) -> f64 {
        let (lo, hi) = ordered(self.domain);
        tick_step(lo, hi, count)
    }
}

fn ordered((a, b): (f64, f64)) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

fn tick_step(lo: f64, hi: f64, count: usize) -> f64 {
    let raw = (hi - lo) / count.max(1) as f64;
    if raw <= 0.0 || !raw.is_finite() {
        return f64::NAN;
    }
    let power = raw.log10().floor();
    let base = 10f64.powf(power);
    let error = raw / base;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * base
}

/// Evenly spaced bands, one per category, with a fraction of each step left empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandScale {
    start: f64,
    step: f64,
    padding: f64,
}

impl BandScale {
    pub fn new(count: usize, range: (f64, f64), padding: f64) -> Self {
        let step = if count == 0 {
            0.0
        } else {
            (range.1 - range.0) / count as f64
        };
        Self {
            start: range.0,
            step,
            padding,
        }
    }

    pub fn bandwidth(&self) -> f64 {
        self.step * (1.0 - self.padding)
    }

    /// Left edge of the band at `index`
    pub fn position(&self, index: usize) -> f64 {
        self.start + index as f64 * self.step + self.step * self.padding / 2.0
    }
}

/// Min and max over the finite values only.
pub fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
        })
}

pub fn x_extent(points: &[DataPoint]) -> Option<(f64, f64)> {
    extent(points.iter().map(|p| p.x))
}

pub fn y_extent(points: &[DataPoint]) -> Option<(f64, f64)> {
    extent(points.iter().map(|p| p.y))
}

/// Configured bounds win; gaps fall back to the data, then to `fallback`.
pub fn resolve_domain(
    configured: (Option<f64>, Option<f64>),
    data: Option<(f64, f64)>,
    fallback: (f64, f64),
) -> (f64, f64) {
    let lo = configured
        .0
        .or(data.map(|d| d.0))
        .unwrap_or(fallback.0);
    let hi = configured
        .1
        .or(data.map(|d| d.1))
        .unwrap_or(fallback.1);
    (lo, hi)
}

/// Widen a zero-width domain so it can be scaled.
pub fn widen_degenerate(domain: (f64, f64)) -> (f64, f64) {
    if domain.0 == domain.1 {
        (domain.0 - 1.0, domain.1 + 1.0)
    } else {
        domain
    }
}

/// Pad a domain by `fraction` of its span on each side.
pub fn pad(domain: (f64, f64), fraction: f64) -> (f64, f64) {
    let span = domain.1 - domain.0;
    (domain.0 - span * fraction, domain.1 + span * fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_map() {
        let scale = LinearScale::new((0.0, 10.0), (100.0, 0.0));
        assert_eq!(scale.map(0.0), 100.0);
        assert_eq!(scale.map(5.0), 50.0);
        assert_eq!(scale.map(10.0), 0.0);
    }

    #[test]
    fn test_ticks() {
        let scale = LinearScale::new((0.0, 10.0), (0.0, 1.0));
        assert_eq!(scale.ticks(10), (0..=10).map(f64::from).collect::<Vec<_>>());

        let scale = LinearScale::new((-0.5, 10.5), (0.0, 1.0));
        assert_eq!(scale.ticks(5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);

        let scale = LinearScale::new((3.0, 3.0), (0.0, 1.0));
        assert!(scale.ticks(10).is_empty());
    }

    #[test]
    fn test_band_scale() {
        let band = BandScale::new(4, (0.0, 400.0), 0.2);
        assert_eq!(band.bandwidth(), 80.0);
        assert_eq!(band.position(0), 10.0);
        assert_eq!(band.position(3), 310.0);
    }

    #[test]
    fn test_domains() {
        assert_eq!(extent([1.0, f64::NAN, -2.0, 5.0].into_iter()), Some((-2.0, 5.0)));
        assert_eq!(extent([f64::NAN].into_iter()), None);
        assert_eq!(
            resolve_domain((Some(0.0), None), Some((2.0, 8.0)), (0.0, 1.0)),
            (0.0, 8.0)
        );
        assert_eq!(resolve_domain((None, None), None, (0.0, 1.0)), (0.0, 1.0));
        assert_eq!(pad((0.0, 100.0), DOMAIN_PADDING), (-5.0, 105.0));
        assert_eq!(widen_degenerate((4.0, 4.0)), (3.0, 5.0));
    }
}
