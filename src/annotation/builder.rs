//! Incremental smoothing of raw pointer samples into curve segments.

use crate::draw::CurveSegment;
use crate::util::Point;

/// Number of slots in the smoothing window.
pub const WINDOW_SIZE: usize = 5;

/// Converts a live pointer-sample stream into smooth cubic segments.
///
/// Samples accumulate in a five-slot window. When the window fills, the
/// fourth slot is replaced by the midpoint of its neighbors and one cubic
/// segment is emitted from slot 0 to that midpoint, with slots 1 and 2 as
/// control points. The window then slides: the midpoint becomes the new
/// start and the last raw sample the new first control, so consecutive
/// segments share an endpoint. Joins are positionally continuous only; the
/// renderer's round line join covers the tangent break.
///
/// The builder is pure bookkeeping: it never touches a path or a surface.
/// The caller appends emitted segments to its [`StrokePath`] and composites
/// them.
///
/// [`StrokePath`]: crate::draw::StrokePath
#[derive(Debug, Clone)]
pub struct StrokeBuilder {
    window: [Point; WINDOW_SIZE],
    cursor: usize,
}

impl StrokeBuilder {
    /// Creates a builder with an empty window.
    pub fn new() -> Self {
        Self {
            window: [Point::ZERO; WINDOW_SIZE],
            cursor: 0,
        }
    }

    /// Rebuilds a builder from a persisted window snapshot.
    pub(crate) fn restore(window: [Point; WINDOW_SIZE], cursor: usize) -> Self {
        Self { window, cursor }
    }

    /// Starts a stroke at `point`.
    ///
    /// Resets the cursor and seeds slot 0. No segment is emitted; the caller
    /// resets its path to the same point.
    pub fn begin(&mut self, point: Point) {
        self.cursor = 0;
        self.window[0] = point;
    }

    /// Feeds one pointer sample.
    ///
    /// Returns an emitted segment once per third sample after the window
    /// first fills, `None` otherwise.
    pub fn extend(&mut self, point: Point) -> Option<CurveSegment> {
        // Cursor 4 only occurs on a restored snapshot; the window is already
        // full, so the new sample replaces the last slot before emission.
        self.cursor = (self.cursor + 1).min(WINDOW_SIZE - 1);
        self.window[self.cursor] = point;

        if self.cursor < WINDOW_SIZE - 1 {
            return None;
        }

        self.window[3] = Point::midpoint(self.window[2], self.window[4]);
        let segment = CurveSegment {
            start: self.window[0],
            ctrl1: self.window[1],
            ctrl2: self.window[2],
            end: self.window[3],
        };

        // Slide: reuse the midpoint as the new start and the last raw
        // sample as the new first control point.
        self.window[0] = self.window[3];
        self.window[1] = self.window[4];
        self.cursor = 1;

        Some(segment)
    }

    /// Ends the stroke, flushing any buffered samples as a final segment.
    ///
    /// A partially filled window would otherwise drop the last one to three
    /// raw samples of the stroke. They are emitted as a shorter segment
    /// instead: straight for a single buffered sample, a degraded cubic for
    /// two or three. A window holding only the start point emits nothing, so
    /// a tap stays a single-point path.
    pub fn finish(&mut self) -> Option<CurveSegment> {
        let segment = match self.cursor {
            1 => Some(CurveSegment {
                start: self.window[0],
                ctrl1: self.window[0],
                ctrl2: self.window[1],
                end: self.window[1],
            }),
            2 => Some(CurveSegment {
                start: self.window[0],
                ctrl1: self.window[1],
                ctrl2: self.window[1],
                end: self.window[2],
            }),
            3 => Some(CurveSegment {
                start: self.window[0],
                ctrl1: self.window[1],
                ctrl2: self.window[2],
                end: self.window[3],
            }),
            _ => None,
        };

        self.cursor = 0;
        segment
    }

    /// Current window contents, for persistence.
    pub fn window(&self) -> &[Point; WINDOW_SIZE] {
        &self.window
    }

    /// Current cursor position, for persistence.
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl Default for StrokeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
