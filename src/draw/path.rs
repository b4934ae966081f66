//! Vector path geometry for ink strokes.

use crate::util::{Point, Rect};
use serde::{Deserialize, Serialize};

/// One cubic curve piece of a stroke path.
///
/// Segments are stored fully expanded (start, both control points, end) so
/// each one can be rendered and damage-tracked independently. Consecutive
/// segments emitted by the smoothing window share endpoints: each segment
/// starts at the previous segment's end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveSegment {
    /// Curve start point
    pub start: Point,
    /// First control point
    pub ctrl1: Point,
    /// Second control point
    pub ctrl2: Point,
    /// Curve end point
    pub end: Point,
}

impl CurveSegment {
    /// Returns the bounding box over all four defining points.
    ///
    /// Control points are included, so the box is conservative: it always
    /// contains the rendered curve, which never leaves the control hull.
    pub fn bounds(&self) -> Rect {
        let xs = [self.start.x, self.ctrl1.x, self.ctrl2.x, self.end.x];
        let ys = [self.start.y, self.ctrl1.y, self.ctrl2.y, self.end.y];

        let mut min_x = xs[0];
        let mut max_x = xs[0];
        for &x in &xs[1..] {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
        }
        let mut min_y = ys[0];
        let mut max_y = ys[0];
        for &y in &ys[1..] {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }

        Rect::from_min_max(min_x, min_y, max_x, max_y)
    }

    fn translated(&self, dx: f64, dy: f64) -> CurveSegment {
        CurveSegment {
            start: self.start.translated(dx, dy),
            ctrl1: self.ctrl1.translated(dx, dy),
            ctrl2: self.ctrl2.translated(dx, dy),
            end: self.end.translated(dx, dy),
        }
    }
}

/// The accumulated geometry of a single stroke.
///
/// Holds the stroke's starting point and the curve segments appended by the
/// smoothing window, in draw order. The start point exists independently of
/// the segments so a tap (pointer down and up with no movement) keeps a
/// degenerate single-point path rather than an error state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrokePath {
    start: Option<Point>,
    segments: Vec<CurveSegment>,
}

impl StrokePath {
    /// Creates an empty path with no start point.
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards any existing geometry and begins a new path at `start`.
    pub fn reset(&mut self, start: Point) {
        self.start = Some(start);
        self.segments.clear();
    }

    /// Appends a segment to the path (drawn after all existing segments).
    pub fn push(&mut self, segment: CurveSegment) {
        self.segments.push(segment);
    }

    /// The point the path was started at, if any.
    pub fn start(&self) -> Option<Point> {
        self.start
    }

    /// All appended segments, in draw order.
    pub fn segments(&self) -> &[CurveSegment] {
        &self.segments
    }

    /// Number of appended segments.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// True once the path has a starting point.
    pub fn has_geometry(&self) -> bool {
        self.start.is_some()
    }

    /// Returns the bounding box over the start point and every segment
    /// point, or `None` for a path that was never begun.
    ///
    /// A single-point path yields a zero-sized rectangle at that point.
    pub fn bounds(&self) -> Option<Rect> {
        let start = self.start?;

        let mut min_x = start.x;
        let mut max_x = start.x;
        let mut min_y = start.y;
        let mut max_y = start.y;

        for segment in &self.segments {
            let rect = segment.bounds();
            min_x = min_x.min(rect.x);
            max_x = max_x.max(rect.x + rect.width);
            min_y = min_y.min(rect.y);
            max_y = max_y.max(rect.y + rect.height);
        }

        Some(Rect::from_min_max(min_x, min_y, max_x, max_y))
    }

    /// Returns a copy of the path shifted by (dx, dy).
    pub fn translated(&self, dx: f64, dy: f64) -> StrokePath {
        StrokePath {
            start: self.start.map(|p| p.translated(dx, dy)),
            segments: self
                .segments
                .iter()
                .map(|s| s.translated(dx, dy))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(points: [(f64, f64); 4]) -> CurveSegment {
        CurveSegment {
            start: Point::new(points[0].0, points[0].1),
            ctrl1: Point::new(points[1].0, points[1].1),
            ctrl2: Point::new(points[2].0, points[2].1),
            end: Point::new(points[3].0, points[3].1),
        }
    }

    #[test]
    fn segment_bounds_cover_control_points() {
        let seg = segment([(0.0, 0.0), (10.0, -5.0), (20.0, 15.0), (30.0, 10.0)]);
        let rect = seg.bounds();
        assert_eq!(rect.x, 0.0);
        assert_eq!(rect.y, -5.0);
        assert_eq!(rect.width, 30.0);
        assert_eq!(rect.height, 20.0);
    }

    #[test]
    fn empty_path_has_no_bounds() {
        assert!(StrokePath::new().bounds().is_none());
    }

    #[test]
    fn single_point_path_has_zero_sized_bounds() {
        let mut path = StrokePath::new();
        path.reset(Point::new(7.0, 9.0));
        let rect = path.bounds().unwrap();
        assert_eq!(rect, Rect::new(7.0, 9.0, 0.0, 0.0));
        assert!(!rect.is_valid());
    }

    #[test]
    fn path_bounds_span_all_segments() {
        let mut path = StrokePath::new();
        path.reset(Point::new(5.0, 5.0));
        path.push(segment([(5.0, 5.0), (8.0, 2.0), (12.0, 9.0), (15.0, 5.0)]));
        path.push(segment([(15.0, 5.0), (18.0, 5.0), (22.0, 30.0), (25.0, 20.0)]));

        let rect = path.bounds().unwrap();
        assert_eq!(rect.x, 5.0);
        assert_eq!(rect.y, 2.0);
        assert_eq!(rect.x + rect.width, 25.0);
        assert_eq!(rect.y + rect.height, 30.0);
    }

    #[test]
    fn translated_moves_start_and_segments() {
        let mut path = StrokePath::new();
        path.reset(Point::new(1.0, 1.0));
        path.push(segment([(1.0, 1.0), (2.0, 2.0), (3.0, 3.0), (4.0, 4.0)]));

        let moved = path.translated(10.0, -1.0);
        assert_eq!(moved.start().unwrap(), Point::new(11.0, 0.0));
        assert_eq!(moved.segments()[0].end, Point::new(14.0, 3.0));
        // Original untouched
        assert_eq!(path.start().unwrap(), Point::new(1.0, 1.0));
    }

    #[test]
    fn reset_clears_previous_segments() {
        let mut path = StrokePath::new();
        path.reset(Point::new(0.0, 0.0));
        path.push(segment([(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]));
        path.reset(Point::new(50.0, 50.0));
        assert_eq!(path.segment_count(), 0);
        assert_eq!(path.start().unwrap(), Point::new(50.0, 50.0));
    }
}
