use super::*;
use crate::annotation::{AnnotationSet, InkAnnotation, Tool};
use crate::config::{StoreCompression, StoreConfig, StoreStorageMode};
use crate::util::Point;

/// Draws and commits one short stroke assigned to `page`.
fn committed_annotation(page: u32) -> InkAnnotation {
    let mut annotation = InkAnnotation::new(Tool::Pen);
    annotation.set_page(Some(page));
    annotation.on_pointer_down(Point::new(10.0, 10.0));
    for i in 1..8 {
        annotation
            .on_pointer_move(Point::new(10.0 + i as f64 * 5.0, 10.0 + i as f64 * 2.0))
            .unwrap();
    }
    annotation.on_pointer_up(Point::new(45.0, 24.0)).unwrap();
    annotation.commit().unwrap();
    annotation
}

fn sample_set() -> AnnotationSet {
    let mut set = AnnotationSet::new();
    set.add(committed_annotation(1));
    set.add(committed_annotation(2));
    set
}

#[test]
fn save_and_load_round_trip() {
    let temp = tempfile::tempdir().unwrap();
    let options = StoreOptions::new(temp.path().to_path_buf(), "doc-1");

    let set = sample_set();
    save_annotations(&set, &options).unwrap();

    let loaded = load_annotations(&options).unwrap().expect("set present");
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded.for_page(1).count(), 1);
    assert_eq!(loaded.for_page(2).count(), 1);

    let original = &set.annotations()[0];
    let restored = &loaded.annotations()[0];
    assert_eq!(restored.style(), original.style());
    assert_eq!(restored.bounds(), original.bounds());
    assert!(restored.is_committed());
}

#[test]
fn empty_set_removes_existing_file() {
    let temp = tempfile::tempdir().unwrap();
    let options = StoreOptions::new(temp.path().to_path_buf(), "doc");

    save_annotations(&sample_set(), &options).unwrap();
    assert!(options.annotations_file_path().exists());

    save_annotations(&AnnotationSet::new(), &options).unwrap();
    assert!(!options.annotations_file_path().exists());
}

#[test]
fn disabled_store_skips_save_and_load() {
    let temp = tempfile::tempdir().unwrap();
    let mut options = StoreOptions::new(temp.path().to_path_buf(), "doc");
    options.enabled = false;

    save_annotations(&sample_set(), &options).unwrap();
    assert!(!options.annotations_file_path().exists());
    assert!(load_annotations(&options).unwrap().is_none());
}

#[test]
fn forced_compression_writes_gzip() {
    let temp = tempfile::tempdir().unwrap();
    let mut options = StoreOptions::new(temp.path().to_path_buf(), "doc");
    options.compression = CompressionMode::On;

    save_annotations(&sample_set(), &options).unwrap();

    let bytes = std::fs::read(options.annotations_file_path()).unwrap();
    assert_eq!(&bytes[..2], &[0x1f, 0x8b]);
    assert!(load_annotations(&options).unwrap().is_some());
}

#[test]
fn auto_compression_kicks_in_above_threshold() {
    let temp = tempfile::tempdir().unwrap();
    let mut options = StoreOptions::new(temp.path().to_path_buf(), "doc");
    options.auto_compress_threshold_bytes = 1;

    save_annotations(&sample_set(), &options).unwrap();

    let bytes = std::fs::read(options.annotations_file_path()).unwrap();
    assert_eq!(&bytes[..2], &[0x1f, 0x8b]);
}

#[test]
fn second_save_rotates_a_backup() {
    let temp = tempfile::tempdir().unwrap();
    let options = StoreOptions::new(temp.path().to_path_buf(), "doc");

    save_annotations(&sample_set(), &options).unwrap();
    assert!(!options.backup_file_path().exists());

    save_annotations(&sample_set(), &options).unwrap();
    assert!(options.backup_file_path().exists());
    assert!(load_annotations(&options).unwrap().is_some());
}

#[test]
fn oversized_payload_is_skipped() {
    let temp = tempfile::tempdir().unwrap();
    let mut options = StoreOptions::new(temp.path().to_path_buf(), "doc");
    options.max_file_size_bytes = 16;

    save_annotations(&sample_set(), &options).unwrap();
    assert!(!options.annotations_file_path().exists());
}

#[test]
fn malformed_record_fails_the_load() {
    let temp = tempfile::tempdir().unwrap();
    let options = StoreOptions::new(temp.path().to_path_buf(), "doc");

    let payload = serde_json::json!({
        "version": 1,
        "last_modified": "2026-01-01T00:00:00Z",
        "annotations": [{ "ctr": 0 }],
    });
    std::fs::write(
        options.annotations_file_path(),
        serde_json::to_vec(&payload).unwrap(),
    )
    .unwrap();

    assert!(load_annotations(&options).is_err());
}

#[test]
fn load_enforces_annotation_limit() {
    let temp = tempfile::tempdir().unwrap();
    let mut options = StoreOptions::new(temp.path().to_path_buf(), "doc");

    save_annotations(&sample_set(), &options).unwrap();

    options.max_annotations = 1;
    let loaded = load_annotations(&options).unwrap().expect("set present");
    assert_eq!(loaded.len(), 1);
}

#[test]
fn clear_store_removes_all_files() {
    let temp = tempfile::tempdir().unwrap();
    let options = StoreOptions::new(temp.path().to_path_buf(), "doc");

    save_annotations(&sample_set(), &options).unwrap();
    let outcome = clear_store(&options).unwrap();
    assert!(outcome.removed_annotations);
    assert!(outcome.removed_lock);
    assert!(!options.annotations_file_path().exists());
}

#[test]
fn inspect_reports_count_and_compression() {
    let temp = tempfile::tempdir().unwrap();
    let mut options = StoreOptions::new(temp.path().to_path_buf(), "doc");
    options.compression = CompressionMode::Off;

    save_annotations(&sample_set(), &options).unwrap();

    let inspection = inspect_store(&options).unwrap();
    assert!(inspection.exists);
    assert_eq!(inspection.annotation_count, Some(2));
    assert!(!inspection.compressed);
    assert!(inspection.size_bytes.unwrap() > 0);
}

#[test]
fn options_from_config_custom_storage() {
    let temp = tempfile::tempdir().unwrap();
    let custom_dir = temp.path().join("marks");

    let mut cfg = StoreConfig::default();
    cfg.storage = StoreStorageMode::Custom;
    cfg.custom_directory = Some(custom_dir.to_string_lossy().to_string());
    cfg.compress = StoreCompression::Off;
    cfg.backup_retention = 2;

    let options = options_from_config(&cfg, temp.path(), "Report 2026").unwrap();
    assert_eq!(options.base_dir, custom_dir);
    assert_eq!(options.compression, CompressionMode::Off);
    assert_eq!(options.backup_retention, 2);
    assert_eq!(
        options
            .annotations_file_path()
            .file_name()
            .unwrap()
            .to_string_lossy(),
        "annotations-Report_2026.json"
    );
}

#[test]
fn options_from_config_config_storage_uses_config_dir() {
    let temp = tempfile::tempdir().unwrap();

    let mut cfg = StoreConfig::default();
    cfg.storage = StoreStorageMode::Config;

    let options = options_from_config(&cfg, temp.path(), "doc").unwrap();
    assert_eq!(options.base_dir, temp.path());
    assert_eq!(options.max_annotations, cfg.max_annotations);
}

#[test]
fn custom_storage_without_directory_is_an_error() {
    let temp = tempfile::tempdir().unwrap();

    let mut cfg = StoreConfig::default();
    cfg.storage = StoreStorageMode::Custom;

    assert!(options_from_config(&cfg, temp.path(), "doc").is_err());
}

#[test]
fn document_ids_are_sanitized_into_file_names() {
    let options = StoreOptions::new(std::path::PathBuf::from("/tmp"), "Report: Q3/2026");
    let name = options
        .annotations_file_path()
        .file_name()
        .unwrap()
        .to_string_lossy()
        .to_string();
    assert_eq!(name, "annotations-Report__Q3_2026.json");
}
