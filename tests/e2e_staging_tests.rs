//! Staged uploads never outlive their batch.

mod common;

use common::{importer, screenshot_png, FakeCatalog, ScriptedOcrEngine, LEVEL_1};
use playlist_ocr::pipeline::{BatchError, Upload};
use playlist_ocr::text::SongPair;
use playlist_ocr::Fidelity;
use tempfile::TempDir;

fn staged_entries(root: &TempDir) -> usize {
    std::fs::read_dir(root.path()).unwrap().count()
}

#[test]
fn test_staging_removed_after_success() {
    let staging = TempDir::new().unwrap();
    let engine = ScriptedOcrEngine::new(&[(LEVEL_1, "Numb - Linkin Park")]);
    let importer = importer(engine, Fidelity::Simple, staging.path());

    let output = importer
        .process_batch(
            &[screenshot_png("shot.png", LEVEL_1)],
            &FakeCatalog::new(vec![]),
        )
        .unwrap();

    assert_eq!(output.total_extracted, 1);
    assert_eq!(staged_entries(&staging), 0);
}

#[test]
fn test_staging_removed_when_images_are_unreadable() {
    let staging = TempDir::new().unwrap();
    let engine = ScriptedOcrEngine::new(&[(LEVEL_1, "Numb - Linkin Park")]);
    let importer = importer(engine, Fidelity::Enhanced, staging.path());

    let pairs = importer
        .extract_pairs(&[
            Upload::new("corrupt.jpg", vec![0xFF, 0xD8, 0xFF, 0x00]),
            Upload::new("notes.txt", b"Numb - Linkin Park".to_vec()),
        ])
        .unwrap();

    assert!(pairs.is_empty());
    assert_eq!(staged_entries(&staging), 0);
}

#[test]
fn test_rejected_uploads_do_not_sink_the_batch() {
    let staging = TempDir::new().unwrap();
    let engine = ScriptedOcrEngine::new(&[(LEVEL_1, "Numb - Linkin Park")]);
    let importer = importer(engine, Fidelity::Enhanced, staging.path());

    let mut too_big = screenshot_png("big.png", LEVEL_1);
    too_big.bytes.resize(2 * 1024 * 1024, 0);

    let output = importer
        .process_batch(
            &[
                screenshot_png("ok.png", LEVEL_1),
                too_big,
                screenshot_png(".hidden.png", LEVEL_1),
            ],
            &FakeCatalog::new(vec![]),
        )
        .unwrap();

    assert_eq!(output.not_found, vec![SongPair::new("Numb", "Linkin Park")]);
    assert_eq!(staged_entries(&staging), 0);
}

#[test]
fn test_batch_size_limits_checked_before_staging() {
    let staging = TempDir::new().unwrap();
    let engine = ScriptedOcrEngine::new(&[(LEVEL_1, "Numb - Linkin Park")]);
    let importer = importer(engine, Fidelity::Enhanced, staging.path());

    assert!(matches!(importer.extract_pairs(&[]), Err(BatchError::NoFiles)));

    let uploads: Vec<Upload> = (0..11)
        .map(|i| screenshot_png(&format!("{}.png", i), LEVEL_1))
        .collect();
    assert!(matches!(
        importer.extract_pairs(&uploads),
        Err(BatchError::TooManyUploads(11, 10))
    ));
    assert_eq!(staged_entries(&staging), 0);
}
