use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, RgbImage};
use log::info;

use birdseye::detector::{Detector, ReplayDetector};
use birdseye::source::{FlatSource, FrameSource};
use birdseye::{Config, RenderMode, Session};

#[derive(Parser, Debug)]
#[command(
    name = "birdseye",
    about = "Render smoothed detections or a bird's-eye view from a detection replay"
)]
struct Args {
    /// TOML config with adapter/smoother/BEV calibration
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Detection replay file, one JSON array of raw detections per frame
    #[arg(long, value_name = "PATH")]
    detections: PathBuf,

    #[arg(long, value_enum, default_value_t = Mode::Annotated)]
    mode: Mode,

    /// Directory for the rendered JPEG frames
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,

    #[arg(long, default_value_t = 1920)]
    width: u32,

    #[arg(long, default_value_t = 1080)]
    height: u32,

    /// Stop after this many frames
    #[arg(long)]
    limit: Option<usize>,

    #[arg(long, default_value_t = 85)]
    jpeg_quality: u8,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    Annotated,
    Bev,
}

impl From<Mode> for RenderMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Annotated => RenderMode::Annotated,
            Mode::Bev => RenderMode::BirdsEye,
        }
    }
}

fn write_jpeg(path: &Path, frame: &RgbImage, quality: u8) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    JpegEncoder::new_with_quality(&mut writer, quality)
        .encode(
            frame.as_raw(),
            frame.width(),
            frame.height(),
            ExtendedColorType::Rgb8,
        )
        .context("encoding jpeg")?;

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            Config::load(path).with_context(|| format!("loading config {}", path.display()))?
        }
        None => Config::default(),
    };

    let mut session = Session::from_config(config).context("building session")?;
    let mut detector = ReplayDetector::open(&args.detections)
        .with_context(|| format!("opening replay {}", args.detections.display()))?;

    let frames = args.limit.unwrap_or_else(|| detector.len());
    let mut source = FlatSource::new(args.width, args.height, frames);

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let mode: RenderMode = args.mode.into();
    let mut frame_idx = 0usize;
    let mut total_detections = 0usize;

    while let Some(frame) = source.next_frame()? {
        let raw = detector.detect(&frame)?;
        let rendered = session.process_frame(&frame, &raw, mode);

        let kept = session.latest_detections().len();
        total_detections += kept;

        let path = args.out_dir.join(format!("frame_{:05}.jpg", frame_idx));
        write_jpeg(&path, &rendered, args.jpeg_quality)?;

        if frame_idx % 50 == 0 {
            info!("frame {}: {} raw, {} kept", frame_idx, raw.len(), kept);
        }

        frame_idx += 1;
    }

    info!(
        "done: {} frames rendered, {} detections kept, output in {}",
        frame_idx,
        total_detections,
        args.out_dir.display()
    );

    Ok(())
}
