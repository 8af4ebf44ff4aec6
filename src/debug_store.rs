//! On-disk retention of debug overlays.
//!
//! Several processes may share one directory. Purging deletes a file only if
//! it is stale, and a file that disappears underneath us counts as purged.

use anyhow::Result;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use time::format_description::{self, OwnedFormatItem};
use time::{Duration, OffsetDateTime};

use crate::detection::overlay::DebugOverlay;

const TIMESTAMP_FORMAT: &str = "[year][month][day]T[hour][minute][second]_[subsecond digits:6]";

/// Paths written by [`DebugStore::save`]
#[derive(Debug, Clone)]
pub struct SavedOverlay {
    pub annotated: Option<PathBuf>,
    pub binarized: PathBuf,
}

pub struct DebugStore {
    dir: PathBuf,
    retention: Duration,
    format: OwnedFormatItem,
}

impl DebugStore {
    pub fn new(dir: impl Into<PathBuf>, retention: Duration) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        let format = format_description::parse_owned::<1>(TIMESTAMP_FORMAT)?;
        Ok(Self {
            dir,
            retention,
            format,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write both overlay images under a shared UTC timestamp
    pub fn save(&self, overlay: &DebugOverlay) -> Result<SavedOverlay> {
        self.save_at(overlay, OffsetDateTime::now_utc())
    }

    pub fn save_at(&self, overlay: &DebugOverlay, at: OffsetDateTime) -> Result<SavedOverlay> {
        let stamp = at.format(&self.format)?;

        let annotated = match &overlay.annotated {
            Some(image) => {
                let path = self.dir.join(format!("{stamp}_image.jpg"));
                image
                    .save(&path)
                    .map_err(|e| anyhow::anyhow!("Failed to save {}: {}", path.display(), e))?;
                Some(path)
            }
            None => None,
        };

        let binarized = self.dir.join(format!("{stamp}_debug.jpg"));
        overlay
            .binarized
            .save(&binarized)
            .map_err(|e| anyhow::anyhow!("Failed to save {}: {}", binarized.display(), e))?;

        log::debug!("Stored debug overlay {}", binarized.display());
        Ok(SavedOverlay {
            annotated,
            binarized,
        })
    }

    /// Delete files older than the retention window; returns how many went away
    pub fn purge_stale(&self) -> Result<usize> {
        self.purge_older_than(OffsetDateTime::now_utc() - self.retention)
    }

    pub fn purge_older_than(&self, cutoff: OffsetDateTime) -> Result<usize> {
        let mut purged = 0;

        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let modified = match entry.metadata().and_then(|m| {
                if m.is_file() {
                    m.modified().map(Some)
                } else {
                    Ok(None)
                }
            }) {
                Ok(Some(modified)) => OffsetDateTime::from(modified),
                Ok(None) => continue,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };

            if modified >= cutoff {
                continue;
            }

            match fs::remove_file(entry.path()) {
                Ok(()) => purged += 1,
                // Someone else got there first
                Err(e) if e.kind() == io::ErrorKind::NotFound => purged += 1,
                Err(e) => log::warn!("Could not purge {}: {}", entry.path().display(), e),
            }
        }

        if purged > 0 {
            log::debug!("Purged {} stale debug files from {}", purged, self.dir.display());
        }
        Ok(purged)
    }

    /// Newest stored files first
    pub fn recent(&self, limit: usize) -> Result<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file())
            .collect();
        // Timestamped names sort chronologically
        files.sort();
        files.reverse();
        files.truncate(limit);
        Ok(files)
    }
}
