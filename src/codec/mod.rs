//! Keyed-record persistence codec for ink annotations.
//!
//! Defines the flat record schema an annotation serializes to. The record
//! itself is a `serde_json::Value` object; what storage it ends up in is the
//! caller's concern (the bundled [`session`](crate::session) store writes
//! record arrays to disk, a host application may put them anywhere else).
//!
//! Required fields: `path`, `color`, `fill`, `lineWidth`, `rect`, `points`,
//! `ctr`. Optional: `page`, `image`. Decoding fails on a missing or
//! mistyped required field; encoding always succeeds (an unencodable raster
//! cache degrades to an absent `image`, since the bitmap can be rebuilt
//! from the geometry).

use crate::annotation::builder::WINDOW_SIZE;
use crate::annotation::{InkAnnotation, RasterCache, StrokeBuilder, StrokeStyle};
use crate::draw::{Color, StrokePath};
use crate::util::{Point, Rect};
use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while decoding an annotation record.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed annotation record: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("invalid value for field `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("undecodable raster image blob: {0}")]
    Image(#[source] cairo::IoError),
}

/// Wire layout of one annotation.
#[derive(Debug, Serialize, Deserialize)]
struct AnnotationRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    page: Option<u32>,
    path: StrokePath,
    color: Color,
    fill: bool,
    #[serde(rename = "lineWidth")]
    line_width: f64,
    rect: Rect,
    /// Smoothing-window snapshot, so a mid-stroke annotation can resume.
    points: [Point; WINDOW_SIZE],
    ctr: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<Vec<u8>>,
}

/// Encodes an annotation into its keyed record.
pub fn to_record(annotation: &InkAnnotation) -> serde_json::Value {
    let style = annotation.style();
    let record = AnnotationRecord {
        page: annotation.page(),
        path: annotation.path().clone(),
        color: style.color,
        fill: style.fill,
        line_width: style.line_width,
        rect: annotation.bounds(),
        points: *annotation.builder().window(),
        ctr: annotation.builder().cursor(),
        image: annotation.raster().to_png(),
    };

    serde_json::to_value(record).unwrap_or_else(|err| {
        // Plain structs of numbers and byte arrays always serialize; keep
        // encode total regardless.
        warn!("failed to encode annotation record: {err}");
        serde_json::Value::Null
    })
}

/// Decodes a keyed record back into an annotation.
///
/// The annotation is marked committed when the record carries a raster
/// image; identity is freshly assigned, as the schema does not persist one.
pub fn from_record(value: serde_json::Value) -> Result<InkAnnotation, CodecError> {
    let record: AnnotationRecord = serde_json::from_value(value).map_err(CodecError::Malformed)?;

    if !(record.line_width > 0.0) {
        return Err(CodecError::InvalidValue {
            field: "lineWidth",
            reason: format!("must be positive, got {}", record.line_width),
        });
    }
    if record.ctr >= WINDOW_SIZE {
        return Err(CodecError::InvalidValue {
            field: "ctr",
            reason: format!("window cursor {} out of range", record.ctr),
        });
    }

    let style = StrokeStyle {
        color: record.color,
        fill: record.fill,
        line_width: record.line_width,
    };

    let committed = record.image.is_some();
    let raster = match record.image {
        Some(bytes) => {
            let surface = RasterCache::surface_from_png(&bytes).map_err(CodecError::Image)?;
            RasterCache::restored(surface, record.path.segment_count())
        }
        None => RasterCache::new(),
    };

    let builder = StrokeBuilder::restore(record.points, record.ctr);

    Ok(InkAnnotation::from_parts(
        record.page,
        record.path,
        style,
        record.rect,
        raster,
        committed,
        builder,
    ))
}
