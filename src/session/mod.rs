//! Annotation store (save/restore) support.
//!
//! Converts a document's annotation set into its serialised record form,
//! writes it to disk with locking, optional compression, and backup
//! rotation, and restores the set when the document is reopened.

mod options;
mod snapshot;
mod storage;

#[allow(unused_imports)]
pub use options::{
    CompressionMode, DEFAULT_AUTO_COMPRESS_THRESHOLD_BYTES, StoreOptions, options_from_config,
};
#[allow(unused_imports)]
pub use snapshot::{load_annotations, save_annotations};
#[allow(unused_imports)]
pub use storage::{ClearOutcome, StoreInspection, clear_store, inspect_store};

#[cfg(test)]
mod tests;
