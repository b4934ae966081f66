//! Persistent raster cache for committed stroke geometry.

use crate::annotation::tool::StrokeStyle;
use crate::draw::{StrokePath, render};
use log::warn;
use thiserror::Error;

/// Errors raised while building the offscreen raster.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("raster dimensions {width}x{height} are not drawable")]
    InvalidSize { width: i32, height: i32 },

    #[error("offscreen surface error: {0}")]
    Surface(#[from] cairo::Error),
}

/// Pre-rendered bitmap of a stroke's geometry.
///
/// The cache makes redraw cost independent of stroke length: once a segment
/// has been composited, repainting blits the bitmap instead of replaying the
/// vector path. The surface is exclusively owned by one annotation and only
/// mutated through [`RasterCache::composite`].
#[derive(Debug, Default)]
pub struct RasterCache {
    surface: Option<cairo::ImageSurface>,
    /// How many path segments the surface reflects.
    covered: usize,
}

impl RasterCache {
    /// Creates an empty cache with no backing surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a cache from a restored surface that already reflects
    /// `covered` segments.
    pub(crate) fn restored(surface: cairo::ImageSurface, covered: usize) -> Self {
        Self {
            surface: Some(surface),
            covered,
        }
    }

    /// True once a composite has produced a backing surface.
    pub fn has_image(&self) -> bool {
        self.surface.is_some()
    }

    /// The cached surface, if one has been composited.
    pub fn image(&self) -> Option<&cairo::ImageSurface> {
        self.surface.as_ref()
    }

    /// Number of path segments the cache currently reflects.
    pub fn covered(&self) -> usize {
        self.covered
    }

    /// Renders the entire current geometry into a fresh transparent surface
    /// of `width` x `height` and swaps it in as the new cache.
    ///
    /// The whole path is re-stroked onto an empty buffer rather than over
    /// the previous cache; translucent ink would darken wherever it was
    /// stroked twice. The swap happens only after the draw succeeds, so any
    /// failure leaves the previous cache untouched. The offscreen context
    /// lives in an inner scope and is torn down on every exit path.
    pub fn composite(
        &mut self,
        path: &StrokePath,
        style: &StrokeStyle,
        width: i32,
        height: i32,
    ) -> Result<(), RasterError> {
        if width <= 0 || height <= 0 {
            return Err(RasterError::InvalidSize { width, height });
        }

        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height)?;
        {
            let ctx = cairo::Context::new(&surface)?;
            render::stroke_segments(&ctx, path.segments(), style.color, style.line_width)?;
        }
        surface.flush();

        self.surface = Some(surface);
        self.covered = path.segment_count();
        Ok(())
    }

    /// Paints the cache at the origin, then strokes the geometry tail the
    /// cache does not cover yet.
    ///
    /// Before any composite this strokes the whole live path; afterwards
    /// only segments appended since the last composite are stroked, so
    /// translucent ink is never painted twice on screen.
    pub fn render(&self, ctx: &cairo::Context, path: &StrokePath, style: &StrokeStyle) {
        if let Some(surface) = &self.surface {
            // Blit failures leave the vector tail as the fallback visual.
            if ctx.set_source_surface(surface, 0.0, 0.0).is_ok() {
                let _ = ctx.paint();
            }
        }

        let covered = self.covered.min(path.segment_count());
        let tail = &path.segments()[covered..];
        let _ = render::stroke_segments(ctx, tail, style.color, style.line_width);
    }

    /// Encodes the cached surface as PNG bytes.
    ///
    /// Returns `None` when there is no cache or the encode fails; encoding
    /// problems degrade persistence (the bitmap is rebuildable from the
    /// geometry) and are logged rather than propagated.
    pub fn to_png(&self) -> Option<Vec<u8>> {
        let surface = self.surface.as_ref()?;
        let mut bytes = Vec::new();
        match surface.write_to_png(&mut bytes) {
            Ok(()) => Some(bytes),
            Err(err) => {
                warn!("failed to encode raster cache as PNG: {err}");
                None
            }
        }
    }

    /// Decodes a PNG blob back into a surface.
    pub(crate) fn surface_from_png(bytes: &[u8]) -> Result<cairo::ImageSurface, cairo::IoError> {
        let mut reader = std::io::Cursor::new(bytes);
        cairo::ImageSurface::create_from_png(&mut reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::tool::Tool;
    use crate::draw::CurveSegment;
    use crate::util::Point;

    fn sample_path() -> StrokePath {
        let mut path = StrokePath::new();
        path.reset(Point::new(5.0, 5.0));
        path.push(CurveSegment {
            start: Point::new(5.0, 5.0),
            ctrl1: Point::new(10.0, 8.0),
            ctrl2: Point::new(20.0, 12.0),
            end: Point::new(30.0, 20.0),
        });
        path
    }

    #[test]
    fn composite_rejects_empty_dimensions() {
        let mut cache = RasterCache::new();
        let path = sample_path();
        let style = Tool::Pen.default_style();

        assert!(matches!(
            cache.composite(&path, &style, 0, 40),
            Err(RasterError::InvalidSize { .. })
        ));
        assert!(matches!(
            cache.composite(&path, &style, 40, -3),
            Err(RasterError::InvalidSize { .. })
        ));
        assert!(!cache.has_image());
    }

    #[test]
    fn composite_is_idempotent_for_unchanged_geometry() {
        let mut cache = RasterCache::new();
        let path = sample_path();
        let style = Tool::Highlighter.default_style();

        cache.composite(&path, &style, 40, 30).unwrap();
        let first = cache.to_png().unwrap();
        cache.composite(&path, &style, 40, 30).unwrap();
        let second = cache.to_png().unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn failed_composite_keeps_previous_cache() {
        let mut cache = RasterCache::new();
        let path = sample_path();
        let style = Tool::Pen.default_style();

        cache.composite(&path, &style, 40, 30).unwrap();
        let before = cache.to_png().unwrap();

        assert!(cache.composite(&path, &style, 0, 0).is_err());
        assert_eq!(cache.to_png().unwrap(), before);
        assert_eq!(cache.covered(), 1);
    }

    #[test]
    fn composite_records_covered_segment_count() {
        let mut cache = RasterCache::new();
        let path = sample_path();
        let style = Tool::Pen.default_style();

        assert_eq!(cache.covered(), 0);
        cache.composite(&path, &style, 40, 30).unwrap();
        assert_eq!(cache.covered(), path.segment_count());
    }

    #[test]
    fn render_without_cache_strokes_live_path() {
        let cache = RasterCache::new();
        let path = sample_path();
        let style = Tool::Pen.default_style();

        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 40, 30).unwrap();
        {
            let ctx = cairo::Context::new(&surface).unwrap();
            cache.render(&ctx, &path, &style);
        }
        let mut surface = surface;
        let data = surface.data().unwrap();
        assert!(data.iter().any(|&b| b != 0));
    }

    #[test]
    fn render_skips_segments_already_in_the_cache() {
        let mut cache = RasterCache::new();
        let path = sample_path();
        let style = Tool::Highlighter.default_style();
        cache.composite(&path, &style, 40, 30).unwrap();

        // Target stays empty apart from the blitted cache; compare against
        // rendering the same path with an empty cache to confirm no second
        // stroke pass darkened the translucent ink.
        let direct = {
            let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 40, 30).unwrap();
            {
                let ctx = cairo::Context::new(&surface).unwrap();
                RasterCache::new().render(&ctx, &path, &style);
            }
            let mut surface = surface;
            surface.data().unwrap().to_vec()
        };
        let blitted = {
            let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 40, 30).unwrap();
            {
                let ctx = cairo::Context::new(&surface).unwrap();
                cache.render(&ctx, &path, &style);
            }
            let mut surface = surface;
            surface.data().unwrap().to_vec()
        };

        assert_eq!(direct, blitted);
    }

    #[test]
    fn png_round_trip_preserves_dimensions() {
        let mut cache = RasterCache::new();
        let path = sample_path();
        cache
            .composite(&path, &Tool::Pen.default_style(), 40, 30)
            .unwrap();

        let png = cache.to_png().unwrap();
        let surface = RasterCache::surface_from_png(&png).unwrap();
        assert_eq!(surface.width(), 40);
        assert_eq!(surface.height(), 30);
    }
}
