//! The ink annotation entity: pointer lifecycle, commit, and damage.

use crate::annotation::builder::StrokeBuilder;
use crate::annotation::raster::{RasterCache, RasterError};
use crate::annotation::tool::{StrokeStyle, Tool};
use crate::draw::{DirtyTracker, StrokePath};
use crate::util::{Point, Rect, stroke_padding};
use log::warn;
use uuid::Uuid;

/// Placeholder canvas size used for bounds until commit tightens them.
pub const DEFAULT_CANVAS_WIDTH: f64 = 1000.0;
/// Placeholder canvas size used for bounds until commit tightens them.
pub const DEFAULT_CANVAS_HEIGHT: f64 = 1000.0;

/// Margin kept around the tightened path bounds at commit.
pub const COMMIT_INSET: f64 = 5.0;

/// A freehand ink stroke overlaid on a document page.
///
/// Lifecycle: created on pointer-down with a preset style and empty
/// geometry; geometry grows through pointer-move; [`InkAnnotation::commit`]
/// tightens the bounds, populates the raster cache, and freezes the
/// geometry. Identity is stable for the annotation's lifetime and is used
/// for lookup, never for ownership.
#[derive(Debug)]
pub struct InkAnnotation {
    id: Uuid,
    page: Option<u32>,
    path: StrokePath,
    style: StrokeStyle,
    bounds: Rect,
    raster: RasterCache,
    committed: bool,
    builder: StrokeBuilder,
    damage: DirtyTracker,
}

impl InkAnnotation {
    /// Creates an annotation with the tool's preset style.
    pub fn new(tool: Tool) -> Self {
        Self::with_style(tool.default_style())
    }

    /// Creates an annotation with an explicit style.
    pub fn with_style(style: StrokeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            page: None,
            path: StrokePath::new(),
            style,
            bounds: Rect::new(0.0, 0.0, DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT),
            raster: RasterCache::new(),
            committed: false,
            builder: StrokeBuilder::new(),
            damage: DirtyTracker::new(),
        }
    }

    /// Overrides the placeholder canvas used before commit.
    ///
    /// Useful when the host page is smaller or larger than the default
    /// 1000x1000 canvas. Has no effect after commit, which replaces the
    /// bounds with the tightened rectangle.
    pub fn with_canvas(mut self, width: f64, height: f64) -> Self {
        if !self.committed {
            self.bounds = Rect::new(0.0, 0.0, width, height);
        }
        self
    }

    /// Reassembles an annotation from decoded parts. Identity is freshly
    /// assigned; the persistence schema does not carry one.
    pub(crate) fn from_parts(
        page: Option<u32>,
        path: StrokePath,
        style: StrokeStyle,
        bounds: Rect,
        raster: RasterCache,
        committed: bool,
        builder: StrokeBuilder,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            page,
            path,
            style,
            bounds,
            raster,
            committed,
            builder,
            damage: DirtyTracker::new(),
        }
    }

    /// Stable identity assigned at creation.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Document page the annotation belongs to, if assigned.
    pub fn page(&self) -> Option<u32> {
        self.page
    }

    /// Assigns the annotation to a document page.
    pub fn set_page(&mut self, page: Option<u32>) {
        self.page = page;
    }

    /// Current stroke style.
    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    /// Current bounds: the canvas placeholder before commit, the tightened
    /// rectangle (path bounds plus the inset margin) afterwards.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// The accumulated stroke geometry.
    pub fn path(&self) -> &StrokePath {
        &self.path
    }

    /// The raster cache backing fast redraw.
    pub fn raster(&self) -> &RasterCache {
        &self.raster
    }

    /// True once the annotation has been finalized.
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Window snapshot for the persistence codec.
    pub(crate) fn builder(&self) -> &StrokeBuilder {
        &self.builder
    }

    /// Begins a stroke at `point`.
    pub fn on_pointer_down(&mut self, point: Point) {
        if self.committed {
            warn!("ignoring pointer-down on committed annotation {}", self.id);
            return;
        }
        self.path.reset(point);
        self.builder.begin(point);
        self.damage.mark_rect(self.point_region(point));
    }

    /// Feeds a pointer-move sample.
    ///
    /// Every third sample after the smoothing window first fills emits a
    /// curve segment, which is appended to the geometry, composited into the
    /// raster cache, and reported as a damage region.
    pub fn on_pointer_move(&mut self, point: Point) -> Result<(), RasterError> {
        if self.committed {
            warn!("ignoring pointer-move on committed annotation {}", self.id);
            return Ok(());
        }
        if !self.path.has_geometry() {
            // Tolerate a host that dropped the pointer-down event.
            self.on_pointer_down(point);
            return Ok(());
        }

        if let Some(segment) = self.builder.extend(point) {
            self.path.push(segment);
            let (width, height) = self.canvas_size();
            self.raster.composite(&self.path, &self.style, width, height)?;
            self.damage
                .mark_rect(segment.bounds().expanded(stroke_padding(self.style.line_width)));
        }
        Ok(())
    }

    /// Ends the stroke, flushing any buffered window tail as a final
    /// shorter segment, and requests a final repaint of the stroke.
    pub fn on_pointer_up(&mut self, _point: Point) -> Result<(), RasterError> {
        if self.committed {
            return Ok(());
        }

        if let Some(segment) = self.builder.finish() {
            self.path.push(segment);
            let (width, height) = self.canvas_size();
            self.raster.composite(&self.path, &self.style, width, height)?;
        }

        if let Some(bounds) = self.path.bounds() {
            self.damage
                .mark_rect(bounds.expanded(stroke_padding(self.style.line_width)));
        }
        Ok(())
    }

    /// Finalizes the annotation.
    ///
    /// Tightens the bounds to the path's bounding box plus the inset margin,
    /// moves the geometry into bounds-local coordinates, rebuilds the raster
    /// cache at the final size, and marks the annotation committed. The new
    /// bounds and translated geometry are swapped in only after the
    /// composite succeeds, so a failed commit keeps the previous cache and
    /// coordinates and can simply be retried.
    pub fn commit(&mut self) -> Result<(), RasterError> {
        if self.committed {
            return Ok(());
        }

        if let Some(segment) = self.builder.finish() {
            self.path.push(segment);
        }

        let tight = self
            .path
            .bounds()
            .unwrap_or_else(|| Rect::new(0.0, 0.0, 0.0, 0.0));
        let bounds = tight.expanded(COMMIT_INSET);
        let local = self
            .path
            .translated(COMMIT_INSET - tight.x, COMMIT_INSET - tight.y);
        let width = bounds.width.ceil() as i32;
        let height = bounds.height.ceil() as i32;

        self.raster.composite(&local, &self.style, width, height)?;

        self.path = local;
        self.bounds = bounds;
        self.committed = true;
        self.damage.mark_full();
        Ok(())
    }

    /// Paints the annotation: the raster cache plus any geometry tail not
    /// yet composited.
    pub fn draw(&self, ctx: &cairo::Context) {
        self.raster.render(ctx, &self.path, &self.style);
    }

    /// Applies a new style.
    ///
    /// Restyling is an explicit state transition, not a setter side effect:
    /// the raster cache is rebuilt with the new style when one exists, and
    /// the stroke's region is marked for repaint.
    pub fn apply_style(&mut self, style: StrokeStyle) -> Result<(), RasterError> {
        self.style = style;
        if self.raster.has_image() {
            let (width, height) = self.canvas_size();
            self.raster.composite(&self.path, &self.style, width, height)?;
        }
        if let Some(bounds) = self.path.bounds() {
            self.damage
                .mark_rect(bounds.expanded(stroke_padding(self.style.line_width)));
        }
        Ok(())
    }

    /// Drains the damage regions accumulated since the last call.
    ///
    /// A full-surface mark collapses to the annotation's current bounds.
    pub fn take_damage(&mut self) -> Vec<Rect> {
        self.damage.take_regions(self.bounds)
    }

    fn canvas_size(&self) -> (i32, i32) {
        (
            self.bounds.width.ceil() as i32,
            self.bounds.height.ceil() as i32,
        )
    }

    fn point_region(&self, point: Point) -> Rect {
        Rect::new(point.x, point.y, 0.0, 0.0).expanded(stroke_padding(self.style.line_width))
    }
}
