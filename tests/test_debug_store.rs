use gaugeread::DebugOverlay;
use gaugeread::debug_store::DebugStore;
use image::{Rgb, RgbImage};
use time::{Duration, OffsetDateTime, macros::datetime};

fn overlay(with_annotated: bool) -> DebugOverlay {
    DebugOverlay {
        annotated: with_annotated.then(|| RgbImage::from_pixel(16, 16, Rgb([200, 10, 10]))),
        binarized: RgbImage::from_pixel(16, 16, Rgb([0, 0, 0])),
    }
}

#[test]
fn test_save_writes_both_images() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let store = DebugStore::new(dir.path().join("overlays"), Duration::hours(1))?;

    let saved = store.save_at(&overlay(true), datetime!(2026-10-16 08:30:05.123456 UTC))?;

    let annotated = saved.annotated.expect("annotated image written");
    assert!(annotated.exists());
    assert!(saved.binarized.exists());
    assert_eq!(
        saved.binarized.file_name().and_then(|n| n.to_str()),
        Some("20261016T083005_123456_debug.jpg")
    );
    assert_eq!(
        annotated.file_name().and_then(|n| n.to_str()),
        Some("20261016T083005_123456_image.jpg")
    );

    Ok(())
}

#[test]
fn test_missing_needle_writes_only_diagnostic() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let store = DebugStore::new(dir.path(), Duration::hours(1))?;

    let saved = store.save(&overlay(false))?;
    assert!(saved.annotated.is_none());
    assert!(saved.binarized.exists());
    assert_eq!(std::fs::read_dir(store.dir())?.count(), 1);

    Ok(())
}

#[test]
fn test_purge_only_removes_stale_files() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let store = DebugStore::new(dir.path(), Duration::hours(1))?;
    store.save(&overlay(true))?;

    // Freshly written files are inside the retention window
    assert_eq!(store.purge_stale()?, 0);
    assert_eq!(store.purge_older_than(OffsetDateTime::now_utc() - Duration::hours(1))?, 0);
    assert_eq!(std::fs::read_dir(store.dir())?.count(), 2);

    // Everything written before a future cutoff is stale
    let purged = store.purge_older_than(OffsetDateTime::now_utc() + Duration::hours(1))?;
    assert_eq!(purged, 2);
    assert_eq!(std::fs::read_dir(store.dir())?.count(), 0);

    Ok(())
}

#[test]
fn test_recent_lists_newest_first() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let store = DebugStore::new(dir.path(), Duration::hours(1))?;

    let older = store.save_at(&overlay(false), datetime!(2026-10-16 08:00:00 UTC))?;
    let newer = store.save_at(&overlay(false), datetime!(2026-10-16 09:00:00 UTC))?;

    assert_eq!(store.recent(1)?, vec![newer.binarized.clone()]);
    assert_eq!(store.recent(10)?, vec![newer.binarized, older.binarized]);

    Ok(())
}
