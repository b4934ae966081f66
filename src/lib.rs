//! Freehand ink annotation engine for document viewers.
//!
//! Converts a live pointer-sample stream into smooth vector strokes,
//! composites them into a persistent raster cache for cheap redraw, and
//! serializes the result so annotations survive a document being closed and
//! reopened. The host viewer owns windows, toolbars, and event delivery;
//! this crate owns the geometry, the pixels, and the records.

pub mod annotation;
pub mod codec;
pub mod config;
pub mod draw;
pub mod session;
pub mod util;

pub use annotation::{
    AnnotationSet, InkAnnotation, RasterCache, RasterError, StrokeBuilder, StrokeStyle, Tool,
};
pub use codec::{CodecError, from_record, to_record};
pub use config::Config;
pub use draw::{Color, CurveSegment, DirtyTracker, StrokePath};
pub use util::{Point, Rect};
