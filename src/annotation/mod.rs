//! Ink annotation entity and its supporting pieces.
//!
//! An [`InkAnnotation`] ties together the smoothing window
//! ([`StrokeBuilder`]), the accumulated vector geometry, the raster cache
//! ([`RasterCache`]), and the stroke style. [`AnnotationSet`] collects the
//! annotations belonging to one document.

pub mod builder;
pub mod raster;
pub mod set;
pub mod stroke;
pub mod tool;

// Re-export commonly used types at module level
pub use builder::StrokeBuilder;
pub use raster::{RasterCache, RasterError};
pub use set::AnnotationSet;
pub use stroke::{COMMIT_INSET, InkAnnotation};
pub use tool::{StrokeStyle, Tool};
