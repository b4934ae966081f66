use super::options::{CompressionMode, StoreOptions};
use crate::annotation::AnnotationSet;
use crate::codec;
use anyhow::{Context, Result};
use chrono::Utc;
use flate2::{Compression, bufread::GzDecoder, write::GzEncoder};
use fs2::FileExt;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

const CURRENT_VERSION: u32 = 1;

/// On-disk envelope wrapping the annotation records.
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    last_modified: String,
    annotations: Vec<serde_json::Value>,
}

pub struct LoadedStore {
    pub set: AnnotationSet,
    pub compressed: bool,
}

/// Persist the annotation set to disk according to the configured options.
pub fn save_annotations(set: &AnnotationSet, options: &StoreOptions) -> Result<()> {
    if !options.enabled {
        debug!("Annotation store disabled; skipping save");
        return Ok(());
    }

    fs::create_dir_all(&options.base_dir).with_context(|| {
        format!(
            "failed to create store directory {}",
            options.base_dir.display()
        )
    })?;

    let lock_path = options.lock_file_path();
    let lock_file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .open(&lock_path)
        .with_context(|| format!("failed to open store lock file {}", lock_path.display()))?;
    lock_file
        .lock_exclusive()
        .with_context(|| format!("failed to lock store file {}", lock_path.display()))?;

    let result = save_annotations_inner(set, options);

    lock_file.unlock().unwrap_or_else(|err| {
        warn!(
            "failed to unlock store file {}: {}",
            lock_path.display(),
            err
        )
    });

    result
}

fn save_annotations_inner(set: &AnnotationSet, options: &StoreOptions) -> Result<()> {
    let store_path = options.annotations_file_path();
    let backup_path = options.backup_file_path();

    if set.is_empty() {
        if store_path.exists() {
            debug!(
                "Removing store file {} because the annotation set is empty",
                store_path.display()
            );
            fs::remove_file(&store_path).with_context(|| {
                format!("failed to remove empty store file {}", store_path.display())
            })?;
        }
        return Ok(());
    }

    let file_payload = StoreFile {
        version: CURRENT_VERSION,
        last_modified: Utc::now().to_rfc3339(),
        annotations: set.annotations().iter().map(codec::to_record).collect(),
    };

    let mut json_bytes =
        serde_json::to_vec_pretty(&file_payload).context("failed to serialise store payload")?;

    if json_bytes.len() as u64 > options.max_file_size_bytes {
        warn!(
            "Annotation data size {} bytes exceeds the configured limit of {} bytes; skipping save",
            json_bytes.len(),
            options.max_file_size_bytes
        );
        return Ok(());
    }

    let should_compress = match options.compression {
        CompressionMode::Off => false,
        CompressionMode::On => true,
        CompressionMode::Auto => (json_bytes.len() as u64) >= options.auto_compress_threshold_bytes,
    };

    if should_compress {
        json_bytes = compress_bytes(&json_bytes)?;
    }

    let tmp_path = temp_path(&store_path)?;
    {
        let mut tmp_file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)
            .with_context(|| {
                format!("failed to open temporary store file {}", tmp_path.display())
            })?;
        tmp_file
            .write_all(&json_bytes)
            .context("failed to write store payload")?;
        tmp_file
            .sync_all()
            .context("failed to sync temporary store file")?;
    }

    if store_path.exists() {
        if options.backup_retention > 0 {
            if backup_path.exists() {
                fs::remove_file(&backup_path).ok();
            }
            fs::rename(&store_path, &backup_path).with_context(|| {
                format!(
                    "failed to rotate previous store file {} -> {}",
                    store_path.display(),
                    backup_path.display()
                )
            })?;
        } else {
            fs::remove_file(&store_path).ok();
        }
    }

    fs::rename(&tmp_path, &store_path).with_context(|| {
        format!(
            "failed to move temporary store file {} -> {}",
            tmp_path.display(),
            store_path.display()
        )
    })?;

    info!(
        "Annotations saved to {} ({} bytes, compression={})",
        store_path.display(),
        json_bytes.len(),
        should_compress
    );

    Ok(())
}

/// Attempt to load a previously saved annotation set.
pub fn load_annotations(options: &StoreOptions) -> Result<Option<AnnotationSet>> {
    if !options.enabled {
        debug!("Annotation store disabled; skipping load");
        return Ok(None);
    }

    let store_path = options.annotations_file_path();
    if !store_path.exists() {
        debug!(
            "No store file present at {}, skipping load",
            store_path.display()
        );
        return Ok(None);
    }

    let metadata = fs::metadata(&store_path)
        .with_context(|| format!("failed to stat store file {}", store_path.display()))?;
    if metadata.len() > options.max_file_size_bytes {
        warn!(
            "Store file {} is {} bytes which exceeds the configured limit ({} bytes); refusing to load",
            store_path.display(),
            metadata.len(),
            options.max_file_size_bytes
        );
        return Ok(None);
    }

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

    let result = load_annotations_inner(&store_path, options);

    lock_file.unlock().unwrap_or_else(|err| {
        warn!(
            "failed to unlock store file {}: {}",
            lock_path.display(),
            err
        )
    });

    match result? {
        Some(loaded) => Ok(Some(loaded.set)),
        None => Ok(None),
    }
}

pub(crate) fn load_annotations_inner(
    store_path: &Path,
    options: &StoreOptions,
) -> Result<Option<LoadedStore>> {
    let mut file_bytes = Vec::new();
    {
        let mut file = File::open(store_path)
            .with_context(|| format!("failed to open store file {}", store_path.display()))?;
        file.read_to_end(&mut file_bytes)
            .context("failed to read store file")?;
    }

    let compressed = is_gzip(&file_bytes);
    let decompressed = if compressed {
        let mut decoder = GzDecoder::new(&file_bytes[..]);
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .context("failed to decompress store file")?;
        out
    } else {
        file_bytes
    };

    let store_file: StoreFile =
        serde_json::from_slice(&decompressed).context("failed to parse store json")?;

    let mut set = AnnotationSet::new();
    for record in store_file.annotations {
        let annotation = codec::from_record(record).with_context(|| {
            format!(
                "failed to decode annotation record in {}",
                store_path.display()
            )
        })?;
        if !set.try_add(annotation, options.max_annotations) {
            warn!(
                "Store file {} exceeds the annotation limit of {}; truncating",
                store_path.display(),
                options.max_annotations
            );
            break;
        }
    }

    if set.is_empty() {
        debug!(
            "Loaded store file at {} but it contained no annotations",
            store_path.display()
        );
        return Ok(None);
    }

    Ok(Some(LoadedStore { set, compressed }))
}

fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .context("failed to compress store payload")?;
    encoder
        .finish()
        .context("failed to finalise compressed store payload")
}

fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() > 2 && bytes[0] == 0x1f && bytes[1] == 0x8b
}

fn temp_path(target: &Path) -> Result<PathBuf> {
    let mut candidate = target.with_extension("json.tmp");
    let mut counter = 0u32;
    while candidate.exists() {
        counter += 1;
        candidate = target.with_extension(format!("json.tmp{}", counter));
    }
    Ok(candidate)
}
