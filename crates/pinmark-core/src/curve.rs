//! Control-point driven Bézier curve.
//!
//! The curve is one global Bézier of degree `len - 1`, sampled uniformly and
//! joined with straight segments. Both derived paths are rebuilt after every
//! edit, so they never reflect a stale point set.

use crate::error::{EditError, EditResult};
use kurbo::{BezPath, Point};
use serde::{Deserialize, Serialize};

/// Lowest accepted precision (densest sampling).
pub const MIN_PRECISION: f64 = 0.001;
/// Highest accepted precision (sparsest sampling).
pub const MAX_PRECISION: f64 = 0.5;
/// Precision used by new models.
pub const DEFAULT_PRECISION: f64 = 0.05;

/// A control point as seen from outside the model.
///
/// The index is only valid until the next insert or remove.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    pub index: usize,
    pub position: Point,
}

impl ControlPoint {
    /// 1-based display label.
    pub fn label(&self) -> String {
        (self.index + 1).to_string()
    }
}

/// Persisted form of a curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveRecord {
    pub points: Vec<Point>,
    #[serde(default = "default_precision")]
    pub precision: f64,
}

fn default_precision() -> f64 {
    DEFAULT_PRECISION
}

/// Ordered control points plus the paths derived from them.
#[derive(Debug, Clone)]
pub struct CurveModel {
    points: Vec<Point>,
    precision: f64,
    outline: Vec<Point>,
    curve: Vec<Point>,
}

impl Default for CurveModel {
    fn default() -> Self {
        Self::new()
    }
}

impl CurveModel {
    pub fn new() -> Self {
        Self::with_precision(DEFAULT_PRECISION)
    }

    pub fn with_precision(precision: f64) -> Self {
        Self {
            points: Vec::new(),
            precision: clamp_precision(precision),
            outline: Vec::new(),
            curve: Vec::new(),
        }
    }

    /// Build a model from existing points.
    pub fn from_points(points: Vec<Point>, precision: f64) -> Self {
        let mut model = Self::with_precision(precision);
        model.points = points;
        model.rebuild();
        model
    }

    pub fn from_record(record: &CurveRecord) -> Self {
        Self::from_points(record.points.clone(), record.precision)
    }

    pub fn to_record(&self) -> CurveRecord {
        CurveRecord {
            points: self.points.clone(),
            precision: self.precision,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Position of the point at `index`.
    pub fn point(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied()
    }

    /// Control points with their current indices.
    pub fn control_points(&self) -> impl Iterator<Item = ControlPoint> + '_ {
        self.points
            .iter()
            .enumerate()
            .map(|(index, &position)| ControlPoint { index, position })
    }

    /// Insert a point at `index`, shifting later points up.
    ///
    /// Any index at or past the end appends.
    pub fn insert_point(&mut self, index: usize, position: Point) -> usize {
        let index = index.min(self.points.len());
        self.points.insert(index, position);
        self.rebuild();
        index
    }

    /// Append a point. Returns its index.
    pub fn push_point(&mut self, position: Point) -> usize {
        self.insert_point(usize::MAX, position)
    }

    /// Remove the point at `index`, shifting later points down.
    ///
    /// Removing from an empty model does nothing and returns `Ok(None)`.
    pub fn remove_point(&mut self, index: usize) -> EditResult<Option<Point>> {
        if self.points.is_empty() {
            return Ok(None);
        }
        self.check_index(index)?;
        let removed = self.points.remove(index);
        self.rebuild();
        Ok(Some(removed))
    }

    /// Remove the topmost point within `tolerance` of `position`.
    pub fn remove_point_near(&mut self, position: Point, tolerance: f64) -> Option<(usize, Point)> {
        let index = self.hit_test_point(position, tolerance)?;
        let removed = self.points.remove(index);
        self.rebuild();
        Some((index, removed))
    }

    /// Move the point at `index` to `position`.
    pub fn move_point(&mut self, index: usize, position: Point) -> EditResult<()> {
        self.check_index(index)?;
        self.points[index] = position;
        self.rebuild();
        Ok(())
    }

    /// Replace all points with a single rebuild.
    ///
    /// Returns `false` if `points` equals the current set (nothing changes).
    pub fn set_points(&mut self, points: Vec<Point>) -> bool {
        if points == self.points {
            return false;
        }
        self.points = points;
        self.rebuild();
        true
    }

    /// Remove every point.
    pub fn clear(&mut self) {
        self.set_points(Vec::new());
    }

    fn check_index(&self, index: usize) -> EditResult<()> {
        if index >= self.points.len() {
            return Err(EditError::IndexOutOfRange {
                index,
                len: self.points.len(),
            });
        }
        Ok(())
    }

    pub fn precision(&self) -> f64 {
        self.precision
    }

    /// Set the sampling precision, clamped to `[MIN_PRECISION, MAX_PRECISION]`.
    pub fn set_precision(&mut self, precision: f64) {
        let clamped = clamp_precision(precision);
        if clamped != precision {
            log::warn!("Precision {} clamped to {}", precision, clamped);
        }
        self.precision = clamped;
        self.rebuild();
    }

    /// Samples per unit of point count, the inverse of precision.
    pub fn step_ratio(&self) -> u32 {
        (1.0 / self.precision) as u32
    }

    /// Set precision as `1 / ratio`. A ratio of 0 is treated as 1.
    pub fn set_step_ratio(&mut self, ratio: u32) {
        self.set_precision(1.0 / f64::from(ratio.max(1)));
    }

    /// Number of uniform segments the curve is sampled into.
    pub fn steps(&self) -> usize {
        (self.points.len() as f64 / self.precision).round() as usize
    }

    /// Recompute the outline and curve from the current points.
    pub fn rebuild(&mut self) {
        self.outline.clone_from(&self.points);
        self.curve = match self.points.len() {
            0 => Vec::new(),
            1 => vec![self.points[0]],
            _ => {
                let steps = self.steps().max(1);
                (0..=steps)
                    .map(|s| bernstein(&self.points, s as f64 / steps as f64))
                    .collect()
            }
        };
    }

    /// Curve point at parameter `u` (clamped to `[0, 1]`).
    pub fn evaluate(&self, u: f64) -> Option<Point> {
        match self.points.len() {
            0 => None,
            1 => Some(self.points[0]),
            _ => Some(bernstein(&self.points, u.clamp(0.0, 1.0))),
        }
    }

    /// Topmost control point within `tolerance` of `position`.
    ///
    /// Later points are drawn over earlier ones, so the highest index wins.
    pub fn hit_test_point(&self, position: Point, tolerance: f64) -> Option<usize> {
        self.points
            .iter()
            .rposition(|p| p.distance(position) <= tolerance)
    }

    /// Straight-segment reference path through the control points.
    pub fn outline_points(&self) -> &[Point] {
        &self.outline
    }

    /// Sampled curve.
    pub fn curve_points(&self) -> &[Point] {
        &self.curve
    }

    pub fn outline_path(&self) -> BezPath {
        polyline(&self.outline)
    }

    pub fn curve_path(&self) -> BezPath {
        polyline(&self.curve)
    }
}

fn clamp_precision(precision: f64) -> f64 {
    if precision.is_nan() {
        return DEFAULT_PRECISION;
    }
    precision.clamp(MIN_PRECISION, MAX_PRECISION)
}

/// `Σ C(n,i) u^i (1-u)^(n-i) P_i` over all points, for at least two points.
///
/// Weights are formed in log space: `C(n,i)` overflows `f64` past roughly
/// a thousand points while the power terms underflow.
fn bernstein(points: &[Point], u: f64) -> Point {
    let n = points.len() - 1;
    if u <= 0.0 {
        return points[0];
    }
    if u >= 1.0 {
        return points[n];
    }
    let ln_u = u.ln();
    let ln_v = (-u).ln_1p();
    let mut ln_coeff = 0.0;
    let mut x = 0.0;
    let mut y = 0.0;
    for (i, p) in points.iter().enumerate() {
        let weight = (ln_coeff + i as f64 * ln_u + (n - i) as f64 * ln_v).exp();
        x += weight * p.x;
        y += weight * p.y;
        if i < n {
            ln_coeff += ((n - i) as f64).ln() - ((i + 1) as f64).ln();
        }
    }
    Point::new(x, y)
}

fn polyline(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let Some((first, rest)) = points.split_first() else {
        return path;
    };
    path.move_to(*first);
    for point in rest {
        path.line_to(*point);
    }
    path
}
