//! Geometric shape recognition over completed strokes.
//!
//! Rule-ordered and deterministic: closed-loop gate, then circle fit,
//! then corner census, then line fit, with Curve/Unknown as catch-alls.
//! No learned models; every classification is a closed-form fit with an
//! explicit residual, which keeps the engine usable without any tracking
//! or inference dependencies.

use serde::{Deserialize, Serialize};

use crate::canvas::{Stroke, StrokeId};

/// A plain 2D point used in fitted shape parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// The geometric class assigned to a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Closed stroke fitting a circle.
    Circle,
    /// Open stroke fitting a straight segment.
    Line,
    /// Closed stroke with four near-right-angle corners.
    Rectangle,
    /// Closed stroke with three corners.
    Triangle,
    /// Open stroke that fits no line.
    Curve,
    /// Too few points, or a closed stroke fitting neither circle nor
    /// polygon.
    Unknown,
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Circle => "circle",
            Self::Line => "line",
            Self::Rectangle => "rectangle",
            Self::Triangle => "triangle",
            Self::Curve => "curve",
            Self::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}

/// Fitted parameters, by shape kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ShapeParams {
    /// Fitted circle.
    Circle {
        /// Fitted center.
        center: Point,
        /// Fitted radius in pixels.
        radius: f32,
    },
    /// Fitted straight segment.
    Line {
        /// First fitted endpoint.
        start: Point,
        /// Second fitted endpoint.
        end: Point,
        /// Slope of the fitted direction (dy/dx; infinite for vertical).
        slope: f32,
    },
    /// Detected rectangle corners in stroke order.
    Rectangle {
        /// The four corner points.
        corners: [Point; 4],
    },
    /// Detected triangle corners in stroke order.
    Triangle {
        /// The three corner points.
        corners: [Point; 3],
    },
    /// No fitted parameters (Curve and Unknown).
    None,
}

impl ShapeParams {
    /// Length of a fitted line segment, if this is a line.
    #[must_use]
    pub fn line_length(&self) -> Option<f32> {
        match self {
            Self::Line { start, end, .. } => {
                Some((end.x - start.x).hypot(end.y - start.y))
            }
            _ => None,
        }
    }

    /// Axis-aligned extent (width, height) of fitted corners, if any.
    #[must_use]
    pub fn corner_extent(&self) -> Option<(f32, f32)> {
        let corners: &[Point] = match self {
            Self::Rectangle { corners } => corners,
            Self::Triangle { corners } => corners,
            _ => return None,
        };
        let (mut min_x, mut max_x) = (f32::MAX, f32::MIN);
        let (mut min_y, mut max_y) = (f32::MAX, f32::MIN);
        for c in corners {
            min_x = min_x.min(c.x);
            max_x = max_x.max(c.x);
            min_y = min_y.min(c.y);
            max_y = max_y.max(c.y);
        }
        Some((max_x - min_x, max_y - min_y))
    }
}

/// The recognizer's verdict for one stroke. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedShape {
    /// Assigned geometric class.
    pub kind: ShapeKind,
    /// Fitted parameters for the class.
    pub params: ShapeParams,
    /// Classification confidence (0.0 to 1.0).
    pub confidence: f32,
    /// The stroke this shape was recognized from.
    pub stroke_id: StrokeId,
}

/// Tunable recognition thresholds.
///
/// Defaults are calibrated against synthetic strokes; all of them are
/// expected to be re-tuned against real hand-tracking captures.
#[derive(Debug, Clone)]
pub struct RecognizerConfig {
    /// Minimum points before any classification is attempted.
    pub min_points: usize,
    /// A stroke is closed when endpoint gap / bounding-box diagonal is
    /// at or below this ratio.
    pub close_threshold: f32,
    /// Maximum RMS radial deviation / fitted radius for a circle.
    ///
    /// An ideal square scores ≈0.11 under this metric, so the tolerance
    /// must stay below that to keep squares out of the circle class.
    pub circle_tolerance: f32,
    /// Turning angle (degrees) above which a point counts as a corner.
    pub corner_angle_deg: f32,
    /// Corners closer than this fraction of the perimeter are merged.
    pub corner_merge_fraction: f32,
    /// Half the span (in points) over which turning angles are smoothed.
    pub corner_window: usize,
    /// Allowed deviation (degrees) of rectangle interior angles from 90°.
    pub right_angle_tolerance_deg: f32,
    /// Maximum RMS perpendicular deviation / path length for a line.
    pub line_tolerance: f32,
    /// Confidence assigned to the Curve/Unknown catch-alls.
    pub fallback_confidence: f32,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            min_points: 8,
            close_threshold: 0.15,
            circle_tolerance: 0.10,
            corner_angle_deg: 35.0,
            corner_merge_fraction: 0.08,
            corner_window: 2,
            right_angle_tolerance_deg: 15.0,
            line_tolerance: 0.05,
            fallback_confidence: 0.5,
        }
    }
}

/// Classifies completed strokes into geometric primitives.
#[derive(Debug, Default)]
pub struct ShapeRecognizer {
    config: RecognizerConfig,
}

impl ShapeRecognizer {
    /// Create a recognizer with default thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration.
    #[must_use]
    pub fn with_config(config: RecognizerConfig) -> Self {
        Self { config }
    }

    /// Get the current configuration.
    #[must_use]
    pub const fn config(&self) -> &RecognizerConfig {
        &self.config
    }

    /// Classify one stroke.
    ///
    /// Rules are evaluated in fixed priority order; the first match wins.
    #[must_use]
    pub fn recognize(&self, stroke: &Stroke) -> RecognizedShape {
        let cfg = &self.config;
        let pts: Vec<Point> = stroke
            .points
            .iter()
            .map(|p| Point::new(p.x, p.y))
            .collect();

        if pts.len() < cfg.min_points {
            tracing::debug!(stroke = %stroke.id, points = pts.len(), "Stroke too short");
            return RecognizedShape {
                kind: ShapeKind::Unknown,
                params: ShapeParams::None,
                confidence: 0.0,
                stroke_id: stroke.id,
            };
        }

        let closed = is_closed(&pts, cfg.close_threshold);

        if closed {
            if let Some((center, radius, residual)) = fit_circle(&pts) {
                if residual < cfg.circle_tolerance {
                    let confidence = (1.0 - residual / cfg.circle_tolerance).clamp(0.0, 1.0);
                    return RecognizedShape {
                        kind: ShapeKind::Circle,
                        params: ShapeParams::Circle { center, radius },
                        confidence,
                        stroke_id: stroke.id,
                    };
                }
            }
            return self.classify_polygon(&pts, stroke.id);
        }

        if let Some((start, end, slope, residual)) = fit_line(&pts) {
            if residual < cfg.line_tolerance {
                let confidence = (1.0 - residual / cfg.line_tolerance).clamp(0.0, 1.0);
                return RecognizedShape {
                    kind: ShapeKind::Line,
                    params: ShapeParams::Line { start, end, slope },
                    confidence,
                    stroke_id: stroke.id,
                };
            }
        }

        RecognizedShape {
            kind: ShapeKind::Curve,
            params: ShapeParams::None,
            confidence: cfg.fallback_confidence,
            stroke_id: stroke.id,
        }
    }

    /// Corner-census classification for closed strokes that failed the
    /// circle fit.
    fn classify_polygon(&self, pts: &[Point], stroke_id: StrokeId) -> RecognizedShape {
        let cfg = &self.config;
        let corners = detect_corners(
            pts,
            cfg.corner_window,
            cfg.corner_angle_deg,
            cfg.corner_merge_fraction,
        );

        match corners.len() {
            3 => {
                let corner_pts = [pts[corners[0]], pts[corners[1]], pts[corners[2]]];
                let angles = interior_angles(pts, &corners);
                let mean_dev =
                    angles.iter().map(|a| (a - 60.0).abs()).sum::<f32>() / angles.len() as f32;
                RecognizedShape {
                    kind: ShapeKind::Triangle,
                    params: ShapeParams::Triangle {
                        corners: corner_pts,
                    },
                    confidence: (1.0 - mean_dev / 60.0).clamp(0.0, 1.0),
                    stroke_id,
                }
            }
            4 => {
                let angles = interior_angles(pts, &corners);
                let max_dev = angles
                    .iter()
                    .map(|a| (a - 90.0).abs())
                    .fold(0.0_f32, f32::max);
                if max_dev <= cfg.right_angle_tolerance_deg {
                    let mean_dev =
                        angles.iter().map(|a| (a - 90.0).abs()).sum::<f32>() / angles.len() as f32;
                    let corner_pts = [
                        pts[corners[0]],
                        pts[corners[1]],
                        pts[corners[2]],
                        pts[corners[3]],
                    ];
                    RecognizedShape {
                        kind: ShapeKind::Rectangle,
                        params: ShapeParams::Rectangle {
                            corners: corner_pts,
                        },
                        confidence: (1.0 - mean_dev / 90.0).clamp(0.0, 1.0),
                        stroke_id,
                    }
                } else {
                    self.unknown(stroke_id)
                }
            }
            _ => self.unknown(stroke_id),
        }
    }

    fn unknown(&self, stroke_id: StrokeId) -> RecognizedShape {
        RecognizedShape {
            kind: ShapeKind::Unknown,
            params: ShapeParams::None,
            confidence: self.config.fallback_confidence,
            stroke_id,
        }
    }
}

/// Endpoint gap relative to the bounding-box diagonal.
fn is_closed(pts: &[Point], close_threshold: f32) -> bool {
    let first = pts[0];
    let last = pts[pts.len() - 1];
    let gap = (first.x - last.x).hypot(first.y - last.y);

    let (mut min_x, mut max_x) = (f32::MAX, f32::MIN);
    let (mut min_y, mut max_y) = (f32::MAX, f32::MIN);
    for p in pts {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }
    let diag = (max_x - min_x).hypot(max_y - min_y);
    if diag <= f32::EPSILON {
        return true;
    }
    gap / diag <= close_threshold
}

/// Kåsa least-squares circle fit.
///
/// Solves the linear system for x² + y² + Dx + Ey + F = 0 and reports the
/// RMS radial deviation divided by the fitted radius. Computation runs in
/// f64; noisy pixel sums overflow f32 precision quickly.
#[allow(clippy::cast_possible_truncation)]
fn fit_circle(pts: &[Point]) -> Option<(Point, f32, f32)> {
    let n = pts.len() as f64;
    let (mut sx, mut sy, mut sxx, mut syy, mut sxy) = (0.0_f64, 0.0, 0.0, 0.0, 0.0);
    let (mut sz, mut szx, mut szy) = (0.0_f64, 0.0, 0.0);
    for p in pts {
        let (x, y) = (f64::from(p.x), f64::from(p.y));
        let z = x * x + y * y;
        sx += x;
        sy += y;
        sxx += x * x;
        syy += y * y;
        sxy += x * y;
        sz += z;
        szx += z * x;
        szy += z * y;
    }

    let (d, e, f) = solve3(
        [[sxx, sxy, sx], [sxy, syy, sy], [sx, sy, n]],
        [-szx, -szy, -sz],
    )?;
    let cx = -d / 2.0;
    let cy = -e / 2.0;
    let r_sq = cx * cx + cy * cy - f;
    if r_sq <= 0.0 {
        return None;
    }
    let radius = r_sq.sqrt();

    let mut sum_sq = 0.0_f64;
    for p in pts {
        let dist = (f64::from(p.x) - cx).hypot(f64::from(p.y) - cy);
        sum_sq += (dist - radius) * (dist - radius);
    }
    let rms = (sum_sq / n).sqrt();

    Some((
        Point::new(cx as f32, cy as f32),
        radius as f32,
        (rms / radius) as f32,
    ))
}

/// Total-least-squares line fit via the principal axis of the covariance.
///
/// Returns the projected endpoints, the slope of the fitted direction and
/// the RMS perpendicular deviation divided by the stroke's path length.
#[allow(clippy::cast_possible_truncation)]
fn fit_line(pts: &[Point]) -> Option<(Point, Point, f32, f32)> {
    let n = pts.len() as f64;
    let mx = pts.iter().map(|p| f64::from(p.x)).sum::<f64>() / n;
    let my = pts.iter().map(|p| f64::from(p.y)).sum::<f64>() / n;

    let (mut sxx, mut syy, mut sxy) = (0.0_f64, 0.0, 0.0);
    for p in pts {
        let dx = f64::from(p.x) - mx;
        let dy = f64::from(p.y) - my;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    let theta = 0.5 * (2.0 * sxy).atan2(sxx - syy);
    let (dir_x, dir_y) = (theta.cos(), theta.sin());

    let mut path = 0.0_f64;
    for pair in pts.windows(2) {
        path += f64::from((pair[1].x - pair[0].x).hypot(pair[1].y - pair[0].y));
    }
    if path <= f64::EPSILON {
        return None;
    }

    let (mut t_min, mut t_max) = (f64::MAX, f64::MIN);
    let mut perp_sq = 0.0_f64;
    for p in pts {
        let dx = f64::from(p.x) - mx;
        let dy = f64::from(p.y) - my;
        let t = dx * dir_x + dy * dir_y;
        let perp = -dx * dir_y + dy * dir_x;
        t_min = t_min.min(t);
        t_max = t_max.max(t);
        perp_sq += perp * perp;
    }
    let rms = (perp_sq / n).sqrt();

    let slope = if dir_x.abs() <= f64::EPSILON {
        f32::INFINITY
    } else {
        (dir_y / dir_x) as f32
    };

    Some((
        Point::new((mx + t_min * dir_x) as f32, (my + t_min * dir_y) as f32),
        Point::new((mx + t_max * dir_x) as f32, (my + t_max * dir_y) as f32),
        slope,
        (rms / path) as f32,
    ))
}

/// Solve a 3x3 linear system by Gaussian elimination with partial
/// pivoting. Returns `None` for a singular system.
fn solve3(m: [[f64; 3]; 3], v: [f64; 3]) -> Option<(f64, f64, f64)> {
    let mut a = [
        [m[0][0], m[0][1], m[0][2], v[0]],
        [m[1][0], m[1][1], m[1][2], v[1]],
        [m[2][0], m[2][1], m[2][2], v[2]],
    ];

    for col in 0..3 {
        let pivot = (col..3).max_by(|&r1, &r2| {
            a[r1][col]
                .abs()
                .partial_cmp(&a[r2][col].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
        if a[pivot][col].abs() <= f64::EPSILON {
            return None;
        }
        a.swap(col, pivot);
        for row in 0..3 {
            if row == col {
                continue;
            }
            let factor = a[row][col] / a[col][col];
            for k in col..4 {
                a[row][k] -= factor * a[col][k];
            }
        }
    }

    Some((a[0][3] / a[0][0], a[1][3] / a[1][1], a[2][3] / a[2][2]))
}

/// Turning angle in degrees at each point, smoothed over `window` points
/// on each side, treating the stroke as a closed loop.
fn turning_angles(pts: &[Point], window: usize) -> Vec<f32> {
    let n = pts.len();
    let mut angles = vec![0.0_f32; n];
    for i in 0..n {
        let prev = pts[(i + n - window) % n];
        let here = pts[i];
        let next = pts[(i + window) % n];
        let v1 = (here.x - prev.x, here.y - prev.y);
        let v2 = (next.x - here.x, next.y - here.y);
        let n1 = v1.0.hypot(v1.1);
        let n2 = v2.0.hypot(v2.1);
        if n1 <= f32::EPSILON || n2 <= f32::EPSILON {
            continue;
        }
        let cos = ((v1.0 * v2.0 + v1.1 * v2.1) / (n1 * n2)).clamp(-1.0, 1.0);
        angles[i] = cos.acos().to_degrees();
    }
    angles
}

/// Indices of detected corners, in stroke order.
///
/// Candidates above the turning-angle threshold are grouped by arc
/// distance (including across the closing gap) and each group keeps its
/// sharpest point.
fn detect_corners(
    pts: &[Point],
    window: usize,
    angle_threshold_deg: f32,
    merge_fraction: f32,
) -> Vec<usize> {
    let n = pts.len();
    let angles = turning_angles(pts, window);

    // Cumulative arc length, plus the closing segment for the perimeter.
    let mut cum = vec![0.0_f32; n];
    for i in 1..n {
        cum[i] = cum[i - 1] + (pts[i].x - pts[i - 1].x).hypot(pts[i].y - pts[i - 1].y);
    }
    let perimeter = cum[n - 1] + (pts[0].x - pts[n - 1].x).hypot(pts[0].y - pts[n - 1].y);
    if perimeter <= f32::EPSILON {
        return Vec::new();
    }
    let merge_distance = perimeter * merge_fraction;

    let candidates: Vec<usize> = (0..n).filter(|&i| angles[i] > angle_threshold_deg).collect();
    if candidates.is_empty() {
        return Vec::new();
    }

    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut current = vec![candidates[0]];
    for &i in &candidates[1..] {
        if cum[i] - cum[*current.last().unwrap_or(&0)] < merge_distance {
            current.push(i);
        } else {
            groups.push(std::mem::take(&mut current));
            current = vec![i];
        }
    }
    groups.push(current);

    // The first and last group may straddle the closing gap.
    if groups.len() > 1 {
        let first_start = groups[0][0];
        let last_end = *groups[groups.len() - 1]
            .last()
            .unwrap_or(&first_start);
        if (perimeter - cum[last_end]) + cum[first_start] < merge_distance {
            let last = groups.pop().unwrap_or_default();
            groups[0].splice(0..0, last);
        }
    }

    let mut corners: Vec<usize> = groups
        .iter()
        .filter_map(|group| {
            group
                .iter()
                .copied()
                .max_by(|&a, &b| {
                    angles[a]
                        .partial_cmp(&angles[b])
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
        })
        .collect();
    corners.sort_unstable();
    corners
}

/// Interior angle in degrees at each corner, formed with its neighbors.
fn interior_angles(pts: &[Point], corners: &[usize]) -> Vec<f32> {
    let k = corners.len();
    let mut angles = Vec::with_capacity(k);
    for j in 0..k {
        let here = pts[corners[j]];
        let prev = pts[corners[(j + k - 1) % k]];
        let next = pts[corners[(j + 1) % k]];
        let v1 = (prev.x - here.x, prev.y - here.y);
        let v2 = (next.x - here.x, next.y - here.y);
        let n1 = v1.0.hypot(v1.1);
        let n2 = v2.0.hypot(v2.1);
        if n1 <= f32::EPSILON || n2 <= f32::EPSILON {
            angles.push(0.0);
            continue;
        }
        let cos = ((v1.0 * v2.0 + v1.1 * v2.1) / (n1 * n2)).clamp(-1.0, 1.0);
        angles.push(cos.acos().to_degrees());
    }
    angles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::StrokePoint;

    fn stroke_from(points: &[(f32, f32)]) -> Stroke {
        let pts = points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| StrokePoint::new(x, y, i as u64 * 33))
            .collect();
        Stroke {
            id: StrokeId::new(),
            points: pts,
            complete: true,
        }
    }

    /// `count` points per edge along a closed polygon, corners included.
    fn polygon_stroke(corners: &[(f32, f32)], per_edge: usize) -> Stroke {
        let mut points = Vec::new();
        let k = corners.len();
        for i in 0..k {
            let (ax, ay) = corners[i];
            let (bx, by) = corners[(i + 1) % k];
            for j in 0..per_edge {
                let t = j as f32 / per_edge as f32;
                points.push((ax + (bx - ax) * t, ay + (by - ay) * t));
            }
        }
        stroke_from(&points)
    }

    /// Deterministic pseudo-noise in [-amplitude, amplitude].
    fn jitter(i: usize, amplitude: f32) -> f32 {
        let v = (i as f32 * 12.9898).sin() * 43758.547;
        (v - v.floor()) * 2.0 * amplitude - amplitude
    }

    #[test]
    fn test_short_stroke_is_unknown_zero_confidence() {
        let recognizer = ShapeRecognizer::new();
        let stroke = stroke_from(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]);

        let shape = recognizer.recognize(&stroke);

        assert_eq!(shape.kind, ShapeKind::Unknown);
        assert!((shape.confidence - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_noisy_circle_recognized() {
        let recognizer = ShapeRecognizer::new();
        let points: Vec<(f32, f32)> = (0..64)
            .map(|i| {
                let theta = i as f32 * std::f32::consts::TAU / 64.0;
                (
                    200.0 + 100.0 * theta.cos() + jitter(i, 2.0),
                    200.0 + 100.0 * theta.sin() + jitter(i + 64, 2.0),
                )
            })
            .collect();
        let stroke = stroke_from(&points);

        let shape = recognizer.recognize(&stroke);

        assert_eq!(shape.kind, ShapeKind::Circle);
        assert!(shape.confidence > 0.8, "confidence {}", shape.confidence);
        match shape.params {
            ShapeParams::Circle { center, radius } => {
                assert!((center.x - 200.0).abs() < 5.0);
                assert!((center.y - 200.0).abs() < 5.0);
                assert!((radius - 100.0).abs() < 5.0);
            }
            other => panic!("expected circle params, got {other:?}"),
        }
    }

    #[test]
    fn test_noisy_line_recognized_with_slope() {
        let recognizer = ShapeRecognizer::new();
        let points: Vec<(f32, f32)> = (0..20)
            .map(|i| {
                let x = 10.0 + i as f32 * 15.0;
                (x, 50.0 + 0.75 * (x - 10.0) + jitter(i, 1.0))
            })
            .collect();
        let stroke = stroke_from(&points);

        let shape = recognizer.recognize(&stroke);

        assert_eq!(shape.kind, ShapeKind::Line);
        assert!(shape.confidence > 0.8, "confidence {}", shape.confidence);
        match shape.params {
            ShapeParams::Line { start, end, slope } => {
                assert!(
                    (slope - 0.75).abs() / 0.75 < 0.05,
                    "fitted slope {slope} off by more than 5%"
                );
                let length = (end.x - start.x).hypot(end.y - start.y);
                assert!(length > 300.0);
            }
            other => panic!("expected line params, got {other:?}"),
        }
    }

    #[test]
    fn test_square_recognized_as_rectangle() {
        let recognizer = ShapeRecognizer::new();
        let true_corners = [(100.0, 100.0), (300.0, 100.0), (300.0, 300.0), (100.0, 300.0)];
        let stroke = polygon_stroke(&true_corners, 10);

        let shape = recognizer.recognize(&stroke);

        assert_eq!(shape.kind, ShapeKind::Rectangle);
        match shape.params {
            ShapeParams::Rectangle { corners } => {
                // Every true corner has a detected corner within 10% of
                // the side length.
                for &(tx, ty) in &true_corners {
                    let hit = corners
                        .iter()
                        .any(|c| (c.x - tx).hypot(c.y - ty) < 20.0);
                    assert!(hit, "no detected corner near ({tx}, {ty}): {corners:?}");
                }
            }
            other => panic!("expected rectangle params, got {other:?}"),
        }
    }

    #[test]
    fn test_triangle_recognized() {
        let recognizer = ShapeRecognizer::new();
        let stroke = polygon_stroke(&[(100.0, 300.0), (300.0, 300.0), (200.0, 100.0)], 12);

        let shape = recognizer.recognize(&stroke);

        assert_eq!(shape.kind, ShapeKind::Triangle);
        match shape.params {
            ShapeParams::Triangle { corners } => assert_eq!(corners.len(), 3),
            other => panic!("expected triangle params, got {other:?}"),
        }
    }

    #[test]
    fn test_square_not_mistaken_for_circle() {
        // A square's RMS radial deviation over its circumscribing fit is
        // ≈0.11 of the radius; the circle tolerance must exclude it.
        let recognizer = ShapeRecognizer::new();
        let stroke = polygon_stroke(&[(100.0, 100.0), (300.0, 100.0), (300.0, 300.0), (100.0, 300.0)], 10);

        let shape = recognizer.recognize(&stroke);

        assert_ne!(shape.kind, ShapeKind::Circle);
    }

    #[test]
    fn test_open_wave_is_curve() {
        let recognizer = ShapeRecognizer::new();
        let points: Vec<(f32, f32)> = (0..30)
            .map(|i| {
                let x = i as f32 * 12.0;
                (x, 200.0 + 60.0 * (x / 40.0).sin())
            })
            .collect();
        let stroke = stroke_from(&points);

        let shape = recognizer.recognize(&stroke);

        assert_eq!(shape.kind, ShapeKind::Curve);
        assert!((shape.confidence - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_closed_blob_is_unknown() {
        // Closed, not circular, no clean corner count: a skinny "8"-ish
        // loop traced as two lobes.
        let recognizer = ShapeRecognizer::new();
        let points: Vec<(f32, f32)> = (0..48)
            .map(|i| {
                let theta = i as f32 * std::f32::consts::TAU / 48.0;
                (
                    200.0 + 120.0 * theta.cos(),
                    200.0 + 40.0 * (2.0 * theta).sin(),
                )
            })
            .collect();
        let stroke = stroke_from(&points);

        let shape = recognizer.recognize(&stroke);

        assert_eq!(shape.kind, ShapeKind::Unknown);
        assert!((shape.confidence - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_vertical_line_slope_is_infinite() {
        let recognizer = ShapeRecognizer::new();
        let points: Vec<(f32, f32)> = (0..15).map(|i| (120.0, 40.0 + i as f32 * 20.0)).collect();
        let stroke = stroke_from(&points);

        let shape = recognizer.recognize(&stroke);

        assert_eq!(shape.kind, ShapeKind::Line);
        match shape.params {
            ShapeParams::Line { slope, .. } => assert!(slope.is_infinite() || slope.abs() > 1e3),
            other => panic!("expected line params, got {other:?}"),
        }
    }

    #[test]
    fn test_line_length_accessor() {
        let params = ShapeParams::Line {
            start: Point::new(0.0, 0.0),
            end: Point::new(30.0, 40.0),
            slope: 4.0 / 3.0,
        };
        assert!((params.line_length().expect("line") - 50.0).abs() < 1e-4);
        assert!(ShapeParams::None.line_length().is_none());
    }

    #[test]
    fn test_corner_extent_accessor() {
        let params = ShapeParams::Rectangle {
            corners: [
                Point::new(100.0, 100.0),
                Point::new(300.0, 100.0),
                Point::new(300.0, 250.0),
                Point::new(100.0, 250.0),
            ],
        };
        let (w, h) = params.corner_extent().expect("corners");
        assert!((w - 200.0).abs() < 1e-4);
        assert!((h - 150.0).abs() < 1e-4);
    }
}
