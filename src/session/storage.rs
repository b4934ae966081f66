use super::options::StoreOptions;
use super::snapshot;
use anyhow::{Context, Result};
use log::warn;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Result of clearing on-disk annotation data.
#[derive(Debug, Clone, Copy)]
pub struct ClearOutcome {
    pub removed_annotations: bool,
    pub removed_backup: bool,
    pub removed_lock: bool,
}

/// Summary information about the current store file(s).
#[derive(Debug, Clone)]
pub struct StoreInspection {
    pub annotations_path: PathBuf,
    pub exists: bool,
    pub size_bytes: Option<u64>,
    pub modified: Option<SystemTime>,
    pub backup_path: PathBuf,
    pub backup_exists: bool,
    pub backup_size_bytes: Option<u64>,
    pub annotation_count: Option<usize>,
    pub compressed: bool,
}

/// Remove persisted annotation files (store, backup, and lock).
pub fn clear_store(options: &StoreOptions) -> Result<ClearOutcome> {
    let removed_annotations = remove_file_if_exists(&options.annotations_file_path())?;
    let removed_backup = remove_file_if_exists(&options.backup_file_path())?;
    let removed_lock = remove_file_if_exists(&options.lock_file_path())?;

    Ok(ClearOutcome {
        removed_annotations,
        removed_backup,
        removed_lock,
    })
}

/// Inspect the current store file for host reporting.
pub fn inspect_store(options: &StoreOptions) -> Result<StoreInspection> {
    use fs2::FileExt;

    let annotations_path = options.annotations_file_path();
    let metadata = fs::metadata(&annotations_path).ok();
    let exists = metadata.is_some();
    let size_bytes = metadata.as_ref().map(|m| m.len());
    let modified = metadata.as_ref().and_then(|m| m.modified().ok());

    let backup_path = options.backup_file_path();
    let backup_meta = fs::metadata(&backup_path).ok();
    let backup_exists = backup_meta.is_some();
    let backup_size_bytes = backup_meta.as_ref().map(|m| m.len());

    let mut annotation_count = None;
    let mut compressed = false;

    if exists {
        let lock_path = options.lock_file_path();
        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&lock_path)
            .with_context(|| format!("failed to open store lock file {}", lock_path.display()))?;
        lock_file
            .lock_shared()
            .with_context(|| format!("failed to acquire shared lock {}", lock_path.display()))?;

        let loaded = snapshot::load_annotations_inner(&annotations_path, options);

        lock_file.unlock().unwrap_or_else(|err| {
            warn!(
                "failed to unlock store file {}: {}",
                lock_path.display(),
                err
            )
        });

        if let Some(loaded) = loaded? {
            annotation_count = Some(loaded.set.len());
            compressed = loaded.compressed;
        }
    }

    Ok(StoreInspection {
        annotations_path,
        exists,
        size_bytes,
        modified,
        backup_path,
        backup_exists,
        backup_size_bytes,
        annotation_count,
        compressed,
    })
}

fn remove_file_if_exists(path: &Path) -> Result<bool> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("failed to remove {}", path.display()))?;
        Ok(true)
    } else {
        Ok(false)
    }
}
