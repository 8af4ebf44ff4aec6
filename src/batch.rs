use anyhow::Result;
use image::ImageReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;

use crate::detection::GaugeReader;

/// Reading for one image of a batch.
#[derive(Debug)]
pub struct BatchReading {
    pub path: PathBuf,
    /// `Ok(None)` when the image was read but no needle was found
    pub value: Result<Option<f64>>,
}

/// Decode an image from disk
pub fn load_image(path: &Path) -> Result<image::DynamicImage> {
    ImageReader::open(path)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image {}: {}", path.display(), e))
}

/// Read many images concurrently. Results come back in input order and a
/// failing image never aborts the others.
pub async fn read_all(reader: Arc<GaugeReader>, paths: Vec<PathBuf>) -> Vec<BatchReading> {
    let mut tasks = JoinSet::new();

    for (idx, path) in paths.iter().cloned().enumerate() {
        let reader = reader.clone();
        tasks.spawn_blocking(move || {
            let value = load_image(&path).and_then(|img| reader.extract_value(&img));
            (idx, value)
        });
    }

    let mut values: Vec<Option<Result<Option<f64>>>> = paths.iter().map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((idx, value)) => values[idx] = Some(value),
            Err(e) => log::warn!("Reading task failed: {}", e),
        }
    }

    paths
        .into_iter()
        .zip(values)
        .map(|(path, value)| BatchReading {
            value: value.unwrap_or_else(|| Err(anyhow::anyhow!("Reading of {} was aborted", path.display()))),
            path,
        })
        .collect()
}
