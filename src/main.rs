use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use gaugeread::batch::{self, BatchReading};
use gaugeread::debug_store::DebugStore;
use gaugeread::{GaugeReader, load_config};

#[derive(Parser)]
#[command(name = "gaugeread")]
#[command(about = "Read analog gauges from photographs")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the reading of one or more images
    Read {
        /// Gauge configuration (JSON)
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        /// Save every pipeline stage to directory (must be empty, single image only)
        #[arg(long, value_name = "DIR")]
        debug_out: Option<PathBuf>,

        /// Input images
        #[arg(value_name = "IMAGE", required = true)]
        images: Vec<PathBuf>,
    },
    /// Render and store the diagnostic overlays of an image
    Debug {
        /// Gauge configuration (JSON)
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,

        /// Directory the overlays are stored in
        #[arg(short, long, value_name = "DIR")]
        out: PathBuf,

        /// Delete stored overlays older than this many seconds
        #[arg(long, value_name = "SECS", default_value_t = 3600)]
        keep_secs: i64,

        /// Input image
        #[arg(value_name = "IMAGE")]
        image: PathBuf,
    },
}

#[derive(Serialize)]
struct ReadingReport {
    image: String,
    value: Option<f64>,
    error: Option<String>,
}

impl From<&BatchReading> for ReadingReport {
    fn from(reading: &BatchReading) -> Self {
        let (value, error) = match &reading.value {
            Ok(value) => (*value, None),
            Err(e) => (None, Some(format!("{:#}", e))),
        };
        Self {
            image: reading.path.display().to_string(),
            value,
            error,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match args.command {
        Command::Read {
            config,
            json,
            debug_out,
            images,
        } => read(config, json, debug_out, images),
        Command::Debug {
            config,
            out,
            keep_secs,
            image,
        } => debug(config, out, keep_secs, image),
    }
}

fn read(
    config: PathBuf,
    json: bool,
    debug_out: Option<PathBuf>,
    images: Vec<PathBuf>,
) -> anyhow::Result<()> {
    let config = load_config(&config)?;
    let mut reader = GaugeReader::new(&config)?;

    if let Some(dir) = debug_out {
        if images.len() != 1 {
            anyhow::bail!("--debug-out works with a single image only");
        }
        reader = reader.with_debug(dir)?;
    }

    log::debug!("Reading {} image(s)", images.len());
    let runtime = tokio::runtime::Builder::new_multi_thread().build()?;
    let readings = runtime.block_on(batch::read_all(Arc::new(reader), images));

    let reports: Vec<ReadingReport> = readings.iter().map(ReadingReport::from).collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            match (&report.value, &report.error) {
                (_, Some(error)) => println!("{}: error: {}", report.image, error),
                (Some(value), None) => println!("{}: {:.3}", report.image, value),
                (None, None) => println!("{}: none", report.image),
            }
        }
    }

    if reports.iter().any(|r| r.error.is_some()) {
        anyhow::bail!("Some images could not be read");
    }
    Ok(())
}

fn debug(config: PathBuf, out: PathBuf, keep_secs: i64, image: PathBuf) -> anyhow::Result<()> {
    let config = load_config(&config)?;
    let reader = GaugeReader::new(&config)?;
    let img = batch::load_image(&image)?;

    log::debug!("Image loaded: {}x{}", img.width(), img.height());

    let data = reader.read(&img)?;
    let overlay = gaugeread::detection::overlay_for(&data, reader.ellipse(), reader.scale())?;

    let store = DebugStore::new(out, time::Duration::seconds(keep_secs))?;
    let purged = store.purge_stale()?;
    let saved = store.save(&overlay)?;

    match data.value {
        Some(value) => println!("value: {:.3}", value),
        None => println!("value: none"),
    }
    if let Some(path) = &saved.annotated {
        println!("image: {}", path.display());
    }
    println!("debug: {}", saved.binarized.display());
    log::info!(
        "{} segments, {} candidates, {} stale overlays purged",
        data.segments.len(),
        data.candidates.len(),
        purged
    );

    Ok(())
}
