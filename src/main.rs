//! Replays a recorded landmark stream through the head pose estimator and
//! prints the joint rotation applied on every frame.

use anyhow::{bail, Result};
use clap::Parser;
use head_pose_puppet::{
    config::{Config, EXAMPLE_CONFIG},
    constants::DEFAULT_DETECTION_INTERVAL_MS,
    replay::ReplaySource,
    session::{Detection, DetectionLoop, LandmarkSource, TrackingSession},
    Error, HeadPoseEstimator, PoseAngles, PoseEstimate,
};
use log::{info, warn};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON-lines landmark recording (one frame or `null` per line)
    #[arg(short, long)]
    input: Option<String>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Print angles in degrees instead of radians
    #[arg(long)]
    degrees: bool,

    /// Replay in real time at this many frames per second on a background detection thread
    #[arg(long)]
    fps: Option<u32>,

    /// Write an example configuration file to this path and exit
    #[arg(long)]
    write_config: Option<String>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if let Some(path) = &args.write_config {
        std::fs::write(path, EXAMPLE_CONFIG)?;
        info!("Wrote example configuration to {}", path);
        return Ok(());
    }

    let Some(input) = &args.input else {
        bail!("--input is required unless --write-config is given");
    };

    let config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path);
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    let estimator = HeadPoseEstimator::new(&config)?;
    let source = ReplaySource::open(input)?.with_indices(estimator.indices());
    let mut session = TrackingSession::new(estimator);

    println!("frame,state,pitch,yaw");
    session.start();

    match args.fps {
        Some(fps) => replay_realtime(&mut session, source, fps, args.degrees)?,
        None => replay_stepwise(&mut session, source, args.degrees)?,
    }

    session.stop();
    Ok(())
}

/// One render tick per recorded detection, in lockstep
fn replay_stepwise<S: LandmarkSource>(session: &mut TrackingSession, mut source: S, degrees: bool) -> Result<()> {
    let mut frame = 0usize;
    loop {
        match source.next_detection() {
            Ok(Detection::Face(landmarks)) => session.slot().publish(Some(landmarks)),
            Ok(Detection::NoFace) => session.slot().publish(None),
            Ok(Detection::EndOfStream) => break,
            Err(e @ Error::FrameFormat { .. }) => {
                warn!("Skipping malformed frame: {e}");
                session.slot().publish(None);
            }
            Err(e) => return Err(e.into()),
        }

        let estimate = session.tick(&mut |_: PoseAngles| {});
        print_estimate(frame, &estimate, degrees);
        frame += 1;
    }

    info!("Replayed {} frames", frame);
    Ok(())
}

/// Detection on a background thread, rendering on this one, both at `fps`
fn replay_realtime<S: LandmarkSource + 'static>(
    session: &mut TrackingSession,
    source: S,
    fps: u32,
    degrees: bool,
) -> Result<()> {
    let interval = if fps == 0 {
        Duration::from_millis(DEFAULT_DETECTION_INTERVAL_MS)
    } else {
        Duration::from_secs_f64(1.0 / f64::from(fps))
    };

    let detection = DetectionLoop::spawn(source, session.slot().clone(), interval)?;

    let mut frame = 0usize;
    while !detection.is_finished() {
        let estimate = session.tick(&mut |_: PoseAngles| {});
        print_estimate(frame, &estimate, degrees);
        frame += 1;
        std::thread::sleep(interval);
    }
    detection.stop();

    // Render whatever the source published last before it finished
    let estimate = session.tick(&mut |_: PoseAngles| {});
    print_estimate(frame, &estimate, degrees);
    frame += 1;

    info!("Rendered {} frames", frame);
    Ok(())
}

fn print_estimate(frame: usize, estimate: &PoseEstimate, degrees: bool) {
    let (pitch, yaw) = if degrees {
        estimate.angles.to_degrees()
    } else {
        (estimate.angles.pitch, estimate.angles.yaw)
    };
    println!("{frame},{},{pitch:.6},{yaw:.6}", estimate.state);
}
