use anyhow::Result;
use std::path::Path;
use tracing::info;

use hand2slide::camera::CameraSource;
use hand2slide::cli::Args;
use hand2slide::config::GestureConfig;
use hand2slide::dispatch::{DryRunInput, EnigoInput, InputSink};
use hand2slide::display::{Display, HeadlessDisplay, ViewerDisplay};
use hand2slide::frame_loop::FrameLoop;
use hand2slide::hand_model::HandDetector;
use hand2slide::presentation;
use hand2slide::progress::FrameProgress;

fn main() -> Result<()> {
    let args: Args = argh::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hand2slide=info".into()),
        )
        .init();

    info!("hand2slide v{} starting", env!("CARGO_PKG_VERSION"));

    let config = GestureConfig::from_args(&args)?;

    // Open the deck first so it is in front when gestures start firing
    if let Some(path) = &args.presentation {
        presentation::open_presentation(Path::new(path))?;
    }

    let mut detector = HandDetector::new(&args)?;
    let mut input: Box<dyn InputSink> = if args.dry_run {
        info!("dry run: gestures are logged, no input is sent");
        Box::new(DryRunInput)
    } else {
        Box::new(EnigoInput::new()?)
    };
    let mut display: Box<dyn Display> = if args.headless {
        Box::new(HeadlessDisplay)
    } else {
        Box::new(ViewerDisplay::new(args.window_scale))
    };
    let progress = if args.progress {
        Some(FrameProgress::new(&format!("camera {}", args.camera))?)
    } else {
        None
    };
    let mut camera = CameraSource::open(args.camera)?;

    info!(
        "watching for gestures (cooldown {:.1}s){}",
        config.cooldown_secs,
        if args.headless { "" } else { ", press Esc to quit" }
    );

    let stats = FrameLoop::new(
        &mut camera,
        &mut detector,
        input.as_mut(),
        display.as_mut(),
        config,
    )
    .with_annotation(!args.no_annotate)
    .with_poll_ms(args.poll_ms)
    .with_progress(progress)
    .run()?;

    info!("{} actions fired over {} frames", stats.actions(), stats.frames);
    Ok(())
}
