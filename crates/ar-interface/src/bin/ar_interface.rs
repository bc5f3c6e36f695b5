use std::path::PathBuf;
use std::process::ExitCode;

use ar_interface::backends::SimulatedBackend;
use ar_interface::{
    ArSession, DisplayTransform, FrameContext, FrameUpdate, HitTestResultType, PlaneEvent,
    SceneError, ScreenOrientation, SessionError, Settings,
};
use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use nalgebra::Point2;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(
    name = "ar-interface",
    version,
    about = "Replay scripted AR sessions through plane reconciliation and hit testing"
)]
struct Cli {
    /// Log verbosity (error, warn, info, debug, trace, off). With the
    /// `tracing` feature, `RUST_LOG` overrides it when set.
    #[arg(long, global = true, default_value = "warn")]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay every frame of a scene and print the plane events.
    Replay {
        #[arg(long)]
        scene: PathBuf,
        #[arg(long, default_value = "portrait")]
        orientation: ScreenOrientation,
        /// Session settings JSON; missing fields keep their defaults.
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Emit one JSON object per frame instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Print the background display transform for a screen orientation.
    DisplayTransform { orientation: ScreenOrientation },
    /// Replay a scene up to a frame, then hit test a screen point.
    HitTest {
        #[arg(long)]
        scene: PathBuf,
        /// Zero-based frame to stop at.
        #[arg(long)]
        frame: usize,
        #[arg(long)]
        x: f32,
        #[arg(long)]
        y: f32,
        #[arg(long, value_enum, default_value_t = KindArg::ExistingPlaneUsingExtent)]
        kind: KindArg,
        #[arg(long, default_value = "portrait")]
        orientation: ScreenOrientation,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    FeaturePoint,
    EstimatedHorizontalPlane,
    ExistingPlane,
    ExistingPlaneUsingExtent,
}

impl From<KindArg> for HitTestResultType {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::FeaturePoint => HitTestResultType::FeaturePoint,
            KindArg::EstimatedHorizontalPlane => HitTestResultType::EstimatedHorizontalPlane,
            KindArg::ExistingPlane => HitTestResultType::ExistingPlane,
            KindArg::ExistingPlaneUsingExtent => HitTestResultType::ExistingPlaneUsingExtent,
        }
    }
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("frame {frame} out of range (scene has {frames} frames)")]
    FrameOutOfRange { frame: usize, frames: usize },
}

#[derive(Serialize)]
struct FrameRecord<'a> {
    frame: usize,
    #[serde(flatten)]
    update: &'a FrameUpdate,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level);
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(feature = "tracing")]
fn init_logging(level: LevelFilter) {
    let _ = tracing_log::LogTracer::init();
    ar_interface::core::init_tracing(level, false);
}

#[cfg(not(feature = "tracing"))]
fn init_logging(level: LevelFilter) {
    let _ = ar_interface::core::init_with_level(level);
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Replay {
            scene,
            orientation,
            settings,
            json,
        } => {
            let settings = match settings {
                Some(path) => ar_interface::load_settings(path)?,
                None => Settings::default(),
            };
            replay(scene, orientation, settings, json)
        }
        Command::DisplayTransform { orientation } => {
            let t = DisplayTransform::from_orientation(orientation);
            println!("{}", serde_json::to_string(&t)?);
            Ok(())
        }
        Command::HitTest {
            scene,
            frame,
            x,
            y,
            kind,
            orientation,
        } => hit_test(scene, frame, Point2::new(x, y), kind.into(), orientation),
    }
}

fn replay(
    scene: PathBuf,
    orientation: ScreenOrientation,
    settings: Settings,
    json: bool,
) -> Result<(), CliError> {
    let backend = SimulatedBackend::load(&scene)?;
    let frames = backend.frame_count();
    let mut session = ArSession::new(backend, settings);
    session.start()?;

    let ctx = FrameContext::new(orientation);
    for frame in 0..frames {
        let update = session.update(&ctx)?;
        if json {
            println!(
                "{}",
                serde_json::to_string(&FrameRecord {
                    frame,
                    update: &update
                })?
            );
        } else {
            print_frame_text(frame, &update);
        }
    }

    let tracked = session.planes().count();
    session.stop();
    if !json {
        println!("planes tracked at end: {tracked}");
    }
    Ok(())
}

fn print_frame_text(frame: usize, update: &FrameUpdate) {
    if !update.tracking {
        println!("frame {frame}: not tracking");
        return;
    }
    println!("frame {frame}: {} plane events", update.plane_events.len());
    for event in &update.plane_events {
        let (label, plane) = match event {
            PlaneEvent::Added(p) => ("added", p),
            PlaneEvent::Updated(p) => ("updated", p),
            PlaneEvent::Removed(p) => ("removed", p),
        };
        println!(
            "  {label} {} center=({:.3}, {:.3}, {:.3}) extents=({:.3}, {:.3})",
            plane.id,
            plane.center.x,
            plane.center.y,
            plane.center.z,
            plane.extents.x,
            plane.extents.y
        );
    }
}

fn hit_test(
    scene: PathBuf,
    frame: usize,
    point: Point2<f32>,
    kind: HitTestResultType,
    orientation: ScreenOrientation,
) -> Result<(), CliError> {
    let backend = SimulatedBackend::load(&scene)?;
    let frames = backend.frame_count();
    if frame >= frames {
        return Err(CliError::FrameOutOfRange { frame, frames });
    }
    let mut session = ArSession::new(backend, Settings::default());
    session.start()?;

    let ctx = FrameContext::new(orientation);
    for _ in 0..=frame {
        session.update(&ctx)?;
    }

    let hits = session.hit_test(point, kind);
    println!("{}", serde_json::to_string_pretty(&hits)?);
    Ok(())
}
