//! Motion Difference CLI
//!
//! Drives the frame pipeline from a synthetic camera and logs the motion
//! detected in each difference image.

use clap::Parser;
use motion_diff::{
    capture::{CameraError, FileConfig, FrameSource, MockCamera},
    metrics::{MetricsRegistry, MetricsSnapshot},
    session::{Analysis, FrameWorker, SessionStats, Submission},
    Rotation,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "motion-diff")]
#[command(about = "Live motion-difference pipeline over a synthetic camera")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of frames to process (overrides the config file)
    #[arg(short, long)]
    frames: Option<u32>,

    /// Run until interrupted with Ctrl-C
    #[arg(long)]
    continuous: bool,

    /// Display rotation in degrees (0, 90, 180, 270)
    #[arg(short, long, allow_hyphen_values = true)]
    rotation: Option<i32>,

    /// Frame width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Frame height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Print Prometheus metrics when done
    #[arg(long)]
    print_metrics: bool,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    info!("Motion Diff v{}", motion_diff::VERSION);
    info!("This is a demonstration using mock camera input");

    let config = match load_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    match run(&config) {
        Ok(stats) => {
            info!("Finished: {} in {}ms", stats, stats.uptime().num_milliseconds());
            if cli.print_metrics {
                print_metrics(&stats);
            }
        }
        Err(e) => {
            eprintln!("Pipeline failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn load_config(cli: &Cli) -> Result<FileConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };

    if let Some(frames) = cli.frames {
        config.output.frame_count = frames;
    }
    if cli.continuous {
        config.output.continuous = true;
    }
    if let Some(degrees) = cli.rotation {
        config.capture.rotation = Rotation::from_degrees(degrees);
    }
    if let Some(width) = cli.width {
        config.capture.width = width;
    }
    if let Some(height) = cli.height {
        config.capture.height = height;
    }

    config.validate()?;
    Ok(config)
}

fn run(config: &FileConfig) -> Result<SessionStats, Box<dyn std::error::Error>> {
    let running = Arc::new(AtomicBool::new(true));
    if config.output.continuous {
        let flag = running.clone();
        ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst))?;
        info!("Running until Ctrl-C");
    }

    let mut camera = MockCamera::new();
    camera.open(&config.capture)?;

    let sink = |analysis: Analysis| {
        let Analysis { diff, motion } = analysis;
        if motion.has_motion() {
            info!(
                "Motion: {}x{}, mean {:.2}, peak {}, {:.1}% changed",
                diff.width(),
                diff.height(),
                motion.mean,
                motion.peak,
                motion.changed_fraction * 100.0
            );
        }
    };
    let mut worker = FrameWorker::spawn(config.pipeline.clone(), sink)?;

    let frame_interval = Duration::from_secs(1) / config.capture.fps;
    let mut delivered: u64 = 0;

    while running.load(Ordering::SeqCst)
        && (config.output.continuous || delivered < config.output.frame_count as u64)
    {
        let frame = match camera.capture() {
            Ok(f) => f,
            Err(CameraError::CaptureFailed(e)) => {
                worker.reject(&e);
                continue;
            }
            Err(e) => {
                warn!("Frame capture failed: {}", e);
                break;
            }
        };
        delivered += 1;

        if worker.submit(frame)? == Submission::Dropped {
            warn!("Frame {} dropped, analyzer busy", delivered);
        }
        std::thread::sleep(frame_interval);
    }

    camera.close();
    Ok(worker.shutdown()?)
}

fn print_metrics(stats: &SessionStats) {
    let registry = match MetricsRegistry::new() {
        Ok(r) => r,
        Err(e) => {
            warn!("Metrics unavailable: {}", e);
            return;
        }
    };
    registry.update(&MetricsSnapshot::from_stats(stats, false));

    match registry.encode() {
        Ok(text) => println!("{}", text),
        Err(e) => warn!("Failed to encode metrics: {}", e),
    }
}
