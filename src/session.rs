//! Tracking session wiring the estimator between a landmark source and an
//! animated joint.
//!
//! The perception side implements [`LandmarkSource`] and runs on its own
//! thread via [`DetectionLoop`], publishing into a [`LatestFrameSlot`]. The
//! render side calls [`TrackingSession::tick`] once per animation frame with
//! a [`JointSink`] that applies the angles as an absolute local rotation.

use crate::{
    constants::DETECTION_ERROR_BACKOFF_MS,
    frame_slot::LatestFrameSlot,
    landmarks::LandmarkFrame,
    pose_estimation::{HeadPoseEstimator, PoseAngles, PoseEstimate, SmoothingState, TrackingState},
    Result,
};
use log::{debug, info, warn};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

/// Outcome of one detection cycle
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    /// Landmarks of the first detected face
    Face(LandmarkFrame),
    /// The cycle ran but found no face
    NoFace,
    /// The source has no more input
    EndOfStream,
}

/// Upstream perception stage producing one detection per cycle
pub trait LandmarkSource: Send {
    /// Run one detection cycle
    ///
    /// # Errors
    ///
    /// Returns an error if the cycle failed; the caller may retry on the next cycle
    fn next_detection(&mut self) -> Result<Detection>;
}

/// Downstream animation stage consuming one rotation per render frame
pub trait JointSink {
    /// Set the joint's local rotation, replacing the previous one
    fn apply_rotation(&mut self, angles: PoseAngles);
}

impl<F: FnMut(PoseAngles)> JointSink for F {
    fn apply_rotation(&mut self, angles: PoseAngles) {
        self(angles);
    }
}

/// Render-loop side of head tracking.
///
/// Owns the smoothing state between frames. While stopped, every tick drives
/// the joint to the neutral pose.
pub struct TrackingSession {
    estimator: HeadPoseEstimator,
    slot: LatestFrameSlot,
    angles: SmoothingState,
    state: TrackingState,
    active: bool,
}

impl TrackingSession {
    /// Create a stopped session with its own frame slot
    #[must_use]
    pub fn new(estimator: HeadPoseEstimator) -> Self {
        Self::with_slot(estimator, LatestFrameSlot::new())
    }

    /// Create a stopped session reading from an existing slot
    #[must_use]
    pub fn with_slot(estimator: HeadPoseEstimator, slot: LatestFrameSlot) -> Self {
        Self {
            estimator,
            slot,
            angles: PoseAngles::NEUTRAL,
            state: TrackingState::Neutral,
            active: false,
        }
    }

    /// Slot the perception stage should publish into
    #[must_use]
    pub fn slot(&self) -> &LatestFrameSlot {
        &self.slot
    }

    /// Begin applying detected landmarks
    pub fn start(&mut self) {
        if !self.active {
            info!("Head tracking started");
            self.active = true;
        }
    }

    /// Stop tracking and discard the last detection result
    pub fn stop(&mut self) {
        if self.active {
            info!("Head tracking stopped");
            self.active = false;
        }
        self.slot.clear();
    }

    /// Flip between started and stopped, returning whether tracking is now active
    pub fn toggle(&mut self) -> bool {
        if self.active {
            self.stop();
        } else {
            self.start();
        }
        self.active
    }

    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.active
    }

    /// Angles applied on the last tick
    #[must_use]
    pub fn angles(&self) -> PoseAngles {
        self.angles
    }

    /// Whether the last tick used landmarks or fell back to neutral
    #[must_use]
    pub fn tracking_state(&self) -> TrackingState {
        self.state
    }

    /// Run one render frame: estimate from the latest detection and drive the joint
    pub fn tick<S: JointSink + ?Sized>(&mut self, sink: &mut S) -> PoseEstimate {
        let frame = if self.active { self.slot.latest() } else { None };
        let estimate = self.estimator.step(frame.as_deref(), self.angles);

        if estimate.state != self.state {
            match estimate.state {
                TrackingState::Tracking => debug!("Face acquired"),
                TrackingState::Neutral => debug!("Face lost, returning to neutral pose"),
            }
        }

        self.angles = estimate.angles;
        self.state = estimate.state;
        sink.apply_rotation(estimate.angles);

        estimate
    }
}

/// Background thread running a [`LandmarkSource`] into a [`LatestFrameSlot`]
pub struct DetectionLoop {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl DetectionLoop {
    /// Spawn the detection thread, pausing `interval` between cycles
    ///
    /// A failed cycle pauses for at least `DETECTION_ERROR_BACKOFF_MS` so a
    /// persistently failing source cannot spin the thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned
    pub fn spawn<S>(mut source: S, slot: LatestFrameSlot, interval: Duration) -> Result<Self>
    where
        S: LandmarkSource + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);
        let error_backoff = Duration::from_millis(DETECTION_ERROR_BACKOFF_MS);

        let handle = thread::Builder::new()
            .name("landmark-detection".to_string())
            .spawn(move || {
                info!("Detection loop started");
                while !thread_stop.load(Ordering::Acquire) {
                    let pause = match source.next_detection() {
                        Ok(Detection::Face(frame)) => {
                            slot.publish(Some(frame));
                            interval
                        }
                        Ok(Detection::NoFace) => {
                            slot.publish(None);
                            interval
                        }
                        Ok(Detection::EndOfStream) => {
                            info!("Landmark source exhausted");
                            break;
                        }
                        Err(e) => {
                            warn!("Face detection error: {e}");
                            interval.max(error_backoff)
                        }
                    };
                    if !pause.is_zero() {
                        thread::sleep(pause);
                    }
                }
                info!("Detection loop stopped");
            })?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// Whether the thread has exited on its own or after [`stop`](Self::stop)
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Signal the thread to exit and wait for it
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Detection thread panicked");
            }
        }
    }
}

impl Drop for DetectionLoop {
    fn drop(&mut self) {
        self.shutdown();
    }
}
