//! Container for a document's ink annotations.

use super::stroke::InkAnnotation;
use uuid::Uuid;

/// Ordered collection of annotations for one document.
///
/// Annotations are kept in draw order (first = bottom layer). Lookup and
/// removal go through the annotation's identity; removal is how an
/// annotation's lifetime ends.
#[derive(Default)]
pub struct AnnotationSet {
    annotations: Vec<InkAnnotation>,
}

impl AnnotationSet {
    /// Creates a new empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// All annotations in draw order.
    pub fn annotations(&self) -> &[InkAnnotation] {
        &self.annotations
    }

    /// Adds an annotation on top of existing ones.
    pub fn add(&mut self, annotation: InkAnnotation) {
        self.annotations.push(annotation);
    }

    /// Attempts to add an annotation, enforcing a maximum count when
    /// `max` > 0.
    ///
    /// Returns `true` if the annotation was added, `false` if the limit
    /// would be exceeded.
    pub fn try_add(&mut self, annotation: InkAnnotation, max: usize) -> bool {
        if max == 0 || self.annotations.len() < max {
            self.annotations.push(annotation);
            true
        } else {
            false
        }
    }

    /// Looks up an annotation by identity.
    pub fn get(&self, id: Uuid) -> Option<&InkAnnotation> {
        self.annotations.iter().find(|a| a.id() == id)
    }

    /// Looks up an annotation by identity (mutable).
    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut InkAnnotation> {
        self.annotations.iter_mut().find(|a| a.id() == id)
    }

    /// Removes and returns the annotation with the given identity, if any.
    pub fn remove(&mut self, id: Uuid) -> Option<InkAnnotation> {
        let index = self.annotations.iter().position(|a| a.id() == id)?;
        Some(self.annotations.remove(index))
    }

    /// Iterates over the annotations assigned to `page`.
    pub fn for_page(&self, page: u32) -> impl Iterator<Item = &InkAnnotation> {
        self.annotations
            .iter()
            .filter(move |a| a.page() == Some(page))
    }

    /// Removes all annotations.
    pub fn clear(&mut self) {
        self.annotations.clear();
    }

    /// Number of annotations in the set.
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    /// True when the set holds no annotations.
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}
