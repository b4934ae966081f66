//! Dirty region tracking for repaint scheduling.
//!
//! Collects axis-aligned rectangles that need repainting between frames.
//! The host drains them after each pointer event to schedule redraws.

use crate::util::Rect;

/// Tracks dirty rectangles accumulated between renders.
#[derive(Debug, Default)]
pub struct DirtyTracker {
    regions: Vec<Rect>,
    force_full: bool,
}

impl DirtyTracker {
    /// Creates a new, empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the entire surface as dirty. Clears any accumulated rectangles.
    pub fn mark_full(&mut self) {
        self.force_full = true;
        self.regions.clear();
    }

    /// Adds a dirty rectangle if the tracker is not already full.
    pub fn mark_rect(&mut self, rect: Rect) {
        if !rect.is_valid() || self.force_full {
            return;
        }
        self.regions.push(rect);
    }

    /// Drains the dirty regions gathered so far.
    ///
    /// When the full surface is marked, returns a single rectangle covering
    /// `full`; otherwise returns the accumulated rectangles.
    pub fn take_regions(&mut self, full: Rect) -> Vec<Rect> {
        if self.force_full {
            self.force_full = false;
            self.regions.clear();
            if full.is_valid() {
                return vec![full];
            }
            Vec::new()
        } else {
            self.regions.drain(..).collect()
        }
    }
}
