//! Cairo-based rendering functions for stroke paths.

use super::color::Color;
use super::path::CurveSegment;

/// Applies stroke source and line settings to a Cairo context.
///
/// Round caps and joins match the pen model: segment joins are only
/// positionally continuous, and the round join hides the tangent break.
fn apply_stroke_settings(ctx: &cairo::Context, color: Color, line_width: f64) {
    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    ctx.set_line_width(line_width);
    ctx.set_line_cap(cairo::LineCap::Round);
    ctx.set_line_join(cairo::LineJoin::Round);
}

/// Strokes a run of curve segments to a Cairo context.
///
/// Each segment is emitted as its own subpath (`move_to` + `curve_to`).
/// Segments from the smoothing window share endpoints, so the subpaths
/// connect visually; emitting them separately keeps rendering correct even
/// for a partial-window tail segment.
///
/// Errors from the underlying surface are returned so offscreen compositing
/// can abort; on-screen callers may ignore them.
pub fn stroke_segments(
    ctx: &cairo::Context,
    segments: &[CurveSegment],
    color: Color,
    line_width: f64,
) -> Result<(), cairo::Error> {
    if segments.is_empty() {
        return Ok(());
    }

    apply_stroke_settings(ctx, color, line_width);

    for segment in segments {
        ctx.move_to(segment.start.x, segment.start.y);
        ctx.curve_to(
            segment.ctrl1.x,
            segment.ctrl1.y,
            segment.ctrl2.x,
            segment.ctrl2.y,
            segment.end.x,
            segment.end.y,
        );
    }

    ctx.stroke()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::Point;

    fn diagonal_segment() -> CurveSegment {
        CurveSegment {
            start: Point::new(2.0, 2.0),
            ctrl1: Point::new(8.0, 4.0),
            ctrl2: Point::new(12.0, 10.0),
            end: Point::new(18.0, 18.0),
        }
    }

    #[test]
    fn stroking_marks_pixels_on_the_surface() {
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 24, 24).unwrap();
        {
            let ctx = cairo::Context::new(&surface).unwrap();
            stroke_segments(
                &ctx,
                &[diagonal_segment()],
                Color::new(1.0, 0.0, 0.0, 1.0),
                3.0,
            )
            .unwrap();
        }
        let mut surface = surface;
        let data = surface.data().unwrap();
        assert!(data.iter().any(|&b| b != 0));
    }

    #[test]
    fn empty_segment_list_is_a_no_op() {
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 8, 8).unwrap();
        {
            let ctx = cairo::Context::new(&surface).unwrap();
            stroke_segments(&ctx, &[], Color::new(0.0, 0.0, 0.0, 1.0), 3.0).unwrap();
        }
        let mut surface = surface;
        let data = surface.data().unwrap();
        assert!(data.iter().all(|&b| b == 0));
    }
}
