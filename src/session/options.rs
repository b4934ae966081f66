use crate::config::{StoreCompression, StoreConfig, StoreStorageMode};
use anyhow::{Result, anyhow};
use std::path::{Path, PathBuf};

pub const DEFAULT_AUTO_COMPRESS_THRESHOLD_BYTES: u64 = 100 * 1024; // 100 KiB

/// Compression preference for annotation store files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMode {
    /// Always write plain JSON.
    Off,
    /// Always write gzip-compressed JSON.
    On,
    /// Write gzip when payload exceeds the configured threshold.
    Auto,
}

/// Runtime options derived from configuration for the annotation store.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub base_dir: PathBuf,
    pub enabled: bool,
    pub document_id: String,
    pub max_annotations: usize,
    pub max_file_size_bytes: u64,
    pub compression: CompressionMode,
    pub auto_compress_threshold_bytes: u64,
    pub backup_retention: usize,
}

impl StoreOptions {
    /// Creates a basic options struct with sensible defaults. Intended mainly for tests.
    pub fn new(base_dir: PathBuf, document_id: impl Into<String>) -> Self {
        let raw_id = document_id.into();
        Self {
            base_dir,
            enabled: true,
            document_id: sanitize_identifier(&raw_id),
            max_annotations: 10_000,
            max_file_size_bytes: 10 * 1024 * 1024,
            compression: CompressionMode::Auto,
            auto_compress_threshold_bytes: DEFAULT_AUTO_COMPRESS_THRESHOLD_BYTES,
            backup_retention: 1,
        }
    }

    pub fn annotations_file_path(&self) -> PathBuf {
        self.base_dir.join(format!("{}.json", self.file_stem()))
    }

    pub fn backup_file_path(&self) -> PathBuf {
        self.base_dir.join(format!("{}.json.bak", self.file_stem()))
    }

    pub fn lock_file_path(&self) -> PathBuf {
        self.base_dir.join(format!("{}.lock", self.file_stem()))
    }

    fn file_stem(&self) -> String {
        format!("annotations-{}", self.document_id)
    }
}

/// Build runtime store options from configuration values.
pub fn options_from_config(
    store_cfg: &StoreConfig,
    config_dir: &Path,
    document_id: &str,
) -> Result<StoreOptions> {
    let base_dir = match store_cfg.storage {
        StoreStorageMode::Auto => {
            let root = dirs::data_dir().unwrap_or_else(|| config_dir.to_path_buf());
            root.join("pagemark")
        }
        StoreStorageMode::Config => config_dir.to_path_buf(),
        StoreStorageMode::Custom => {
            let raw = store_cfg.custom_directory.as_ref().ok_or_else(|| {
                anyhow!("store.custom_directory must be set when storage = \"custom\"")
            })?;
            let expanded = expand_tilde(raw);
            if expanded.as_os_str().is_empty() {
                return Err(anyhow!("store.custom_directory resolved to an empty path"));
            }
            expanded
        }
    };

    let mut options = StoreOptions::new(base_dir, document_id);
    options.enabled = store_cfg.enabled;
    options.max_annotations = store_cfg.max_annotations;
    options.max_file_size_bytes = store_cfg
        .max_file_size_mb
        .saturating_mul(1024 * 1024)
        .max(1);
    options.auto_compress_threshold_bytes = store_cfg
        .auto_compress_threshold_kb
        .saturating_mul(1024)
        .max(1);
    options.compression = match store_cfg.compress {
        StoreCompression::Auto => CompressionMode::Auto,
        StoreCompression::On => CompressionMode::On,
        StoreCompression::Off => CompressionMode::Off,
    };
    options.backup_retention = store_cfg.backup_retention;

    Ok(options)
}

pub(crate) fn sanitize_identifier(raw: &str) -> String {
    if raw.is_empty() {
        return "default".to_string();
    }

    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
