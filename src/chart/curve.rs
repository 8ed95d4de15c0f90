// Monotone-in-x cubic interpolation (Fritsch-Carlson tangents)
use super::scene::fmt_num;

fn sign(v: f64) -> f64 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

fn secant(a: (f64, f64), b: (f64, f64)) -> f64 {
    let h = b.0 - a.0;
    if h == 0.0 { 0.0 } else { (b.1 - a.1) / h }
}

/// Tangent at `b` that keeps the curve monotone between its neighbours.
fn interior_tangent(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    let h0 = b.0 - a.0;
    let h1 = c.0 - b.0;
    let s0 = secant(a, b);
    let s1 = secant(b, c);
    if h0 + h1 == 0.0 {
        return 0.0;
    }
    let p = (s0 * h1 + s1 * h0) / (h0 + h1);
    let t = (sign(s0) + sign(s1)) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
    if t.is_finite() { t } else { 0.0 }
}

/// One-sided tangent at an end point.
fn end_tangent(a: (f64, f64), b: (f64, f64), t: f64) -> f64 {
    let h = b.0 - a.0;
    if h == 0.0 { t } else { (3.0 * (b.1 - a.1) / h - t) / 2.0 }
}

/// SVG path data through points already sorted by x.
pub fn monotone_path(points: &[(f64, f64)]) -> String {
    let n = points.len();
    let mut d = String::new();
    let Some(first) = points.first() else {
        return d;
    };
    d.push_str(&format!("M{},{}", fmt_num(first.0), fmt_num(first.1)));
    if n == 2 {
        d.push_str(&format!("L{},{}", fmt_num(points[1].0), fmt_num(points[1].1)));
    }
    if n < 3 {
        return d;
    }

    let mut tangents = vec![0.0; n];
    for i in 1..n - 1 {
        tangents[i] = interior_tangent(points[i - 1], points[i], points[i + 1]);
    }
    tangents[0] = end_tangent(points[0], points[1], tangents[1]);
    tangents[n - 1] = end_tangent(points[n - 2], points[n - 1], tangents[n - 2]);

    for i in 0..n - 1 {
        let (x0, y0) = points[i];
        let (x1, y1) = points[i + 1];
        let dx = (x1 - x0) / 3.0;
        d.push_str(&format!(
            "C{},{},{},{},{},{}",
            fmt_num(x0 + dx),
            fmt_num(y0 + dx * tangents[i]),
            fmt_num(x1 - dx),
            fmt_num(y1 - dx * tangents[i + 1]),
            fmt_num(x1),
            fmt_num(y1)
        ));
    }
    d
}
