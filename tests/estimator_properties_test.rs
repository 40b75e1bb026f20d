//! Behavioural properties of the head pose estimator


use head_pose_puppet::{
    config::Config, HeadPoseEstimator, Landmark, PoseAngles, TrackingState,
};
use proptest::prelude::*;
use std::f64::consts::PI;
use test_helpers::{assert_close, FaceFixture};

#[test]
fn test_documented_sign_fixtures() {
    let estimator = HeadPoseEstimator::default();
    let angles = estimator.estimate(Some(&FaceFixture::looking_down_right().frame()), PoseAngles::NEUTRAL);

    assert!(angles.pitch < 0.0, "nose below center must pitch negative, got {}", angles.pitch);
    assert!(angles.yaw > 0.0, "right ear closer must yaw positive, got {}", angles.yaw);
}

#[test]
fn test_nose_above_center_pitches_positive() {
    let mut face = FaceFixture::frontal();
    face.nose = Landmark::new(0.5, 0.45, 0.0);
    let estimator = HeadPoseEstimator::default();

    assert!(estimator.target_pitch(&face.frame()).unwrap() > 0.0);
}

#[test]
fn test_left_ear_closer_yaws_negative() {
    let mut face = FaceFixture::frontal();
    face.left_ear.z = -0.1;
    face.right_ear.z = 0.1;
    let estimator = HeadPoseEstimator::default();

    assert!(estimator.target_yaw(&face.frame()).unwrap() < 0.0);
}

#[test]
fn test_frontal_face_targets_zero_yaw() {
    let estimator = HeadPoseEstimator::default();
    assert_close(estimator.target_yaw(&FaceFixture::frontal().frame()).unwrap(), 0.0, 1e-12);
}

#[test]
fn test_smoothing_follows_exact_exponential_curve() {
    let estimator = HeadPoseEstimator::default();
    let frame = FaceFixture::looking_down_right().frame();
    let target_pitch = estimator.target_pitch(&frame).unwrap();
    let target_yaw = estimator.target_yaw(&frame).unwrap();

    let mut angles = PoseAngles::NEUTRAL;
    let mut last_error = (target_pitch.abs(), target_yaw.abs());

    for n in 1..=40 {
        angles = estimator.estimate(Some(&frame), angles);

        let decay = 0.85_f64.powi(n);
        assert_close((angles.pitch - target_pitch).abs(), target_pitch.abs() * decay, 1e-12);
        assert_close((angles.yaw - target_yaw).abs(), target_yaw.abs() * decay, 1e-12);

        // Monotone approach
        let error = ((angles.pitch - target_pitch).abs(), (angles.yaw - target_yaw).abs());
        assert!(error.0 < last_error.0);
        assert!(error.1 < last_error.1);
        last_error = error;
    }
}

#[test]
fn test_repeated_frame_converges_to_target() {
    let estimator = HeadPoseEstimator::default();
    let frame = FaceFixture::looking_down_right().frame();

    let mut angles = PoseAngles::NEUTRAL;
    for _ in 0..300 {
        angles = estimator.estimate(Some(&frame), angles);
    }

    assert_close(angles.pitch, estimator.target_pitch(&frame).unwrap(), 1e-9);
    assert_close(angles.yaw, estimator.target_yaw(&frame).unwrap(), 1e-9);

    // Fixed point: one more frame does not move it
    let next = estimator.estimate(Some(&frame), angles);
    assert_close(next.pitch, angles.pitch, 1e-12);
    assert_close(next.yaw, angles.yaw, 1e-12);
}

#[test]
fn test_no_detection_resets_any_state() {
    let estimator = HeadPoseEstimator::default();
    for previous in [
        PoseAngles::new(0.7, -1.0),
        PoseAngles::new(-0.2, 0.4),
        PoseAngles::new(f64::NAN, f64::INFINITY),
    ] {
        let estimate = estimator.step(None, previous);
        assert_eq!(estimate.angles, PoseAngles::NEUTRAL);
        assert_eq!(estimate.state, TrackingState::Neutral);
    }
}

#[test]
fn test_reset_is_not_smoothed() {
    let estimator = HeadPoseEstimator::default();
    let frame = FaceFixture::looking_down_right().frame();

    let mut angles = PoseAngles::NEUTRAL;
    for _ in 0..50 {
        angles = estimator.estimate(Some(&frame), angles);
    }
    assert_eq!(estimator.estimate(None, angles), PoseAngles::NEUTRAL);

    // Reacquiring starts the approach again from neutral
    let reacquired = estimator.estimate(Some(&frame), PoseAngles::NEUTRAL);
    assert_close(reacquired.pitch, 0.15 * estimator.target_pitch(&frame).unwrap(), 1e-12);
}

#[test]
fn test_zero_face_height_is_finite_and_clamped() {
    let mut face = FaceFixture::frontal();
    face.forehead = Landmark::new(0.5, 0.4, 0.0);
    face.chin = Landmark::new(0.5, 0.4, 0.0);
    let estimator = HeadPoseEstimator::default();

    let angles = estimator.try_estimate(Some(&face.frame()), PoseAngles::NEUTRAL).unwrap();
    assert!(angles.is_finite());
    assert!(angles.pitch.abs() <= PI / 4.0);
}

#[test]
fn test_custom_tuning_changes_targets() {
    let mut config = Config::default();
    config.vertical.amplification = 1.0;
    config.vertical.smoothing = 1.0;
    config.horizontal.smoothing = 1.0;
    let estimator = HeadPoseEstimator::new(&config).unwrap();
    let frame = FaceFixture::looking_down_right().frame();

    // Full smoothing factor jumps straight to the target
    let angles = estimator.estimate(Some(&frame), PoseAngles::NEUTRAL);
    assert_close(angles.pitch, -(0.2_f64 / 1.2).asin(), 1e-12);
    assert_close(angles.yaw, (0.2_f64).atan2(1.2), 1e-12);
}

#[test]
fn test_narrow_range_saturates() {
    let mut config = Config::default();
    config.vertical.range = 0.05;
    config.horizontal.range = 0.05;
    let estimator = HeadPoseEstimator::new(&config).unwrap();
    let frame = FaceFixture::looking_down_right().frame();

    assert_eq!(estimator.target_pitch(&frame).unwrap(), -0.05);
    assert_eq!(estimator.target_yaw(&frame).unwrap(), 0.05);
}

fn landmark_in(coord: std::ops::RangeInclusive<f64>, depth: std::ops::RangeInclusive<f64>) -> impl Strategy<Value = Landmark> {
    (coord.clone(), coord, depth).prop_map(|(x, y, z)| Landmark::new(x, y, z))
}

fn face_in(coord: std::ops::RangeInclusive<f64>, depth: std::ops::RangeInclusive<f64>) -> impl Strategy<Value = FaceFixture> {
    (
        landmark_in(coord.clone(), depth.clone()),
        landmark_in(coord.clone(), depth.clone()),
        landmark_in(coord.clone(), depth.clone()),
        landmark_in(coord.clone(), depth.clone()),
        landmark_in(coord, depth),
    )
        .prop_map(|(nose, forehead, chin, left_ear, right_ear)| FaceFixture {
            nose,
            forehead,
            chin,
            left_ear,
            right_ear,
        })
}

proptest! {
    #[test]
    fn prop_output_within_ranges(
        face in face_in(0.0..=1.0, -1.0..=1.0),
        previous_pitch in -10.0..10.0f64,
        previous_yaw in -10.0..10.0f64,
    ) {
        let estimator = HeadPoseEstimator::default();
        let angles = estimator.estimate(Some(&face.frame()), PoseAngles::new(previous_pitch, previous_yaw));

        prop_assert!(angles.is_finite());
        prop_assert!(angles.pitch.abs() <= PI / 4.0);
        prop_assert!(angles.yaw.abs() <= PI / 3.0);
    }

    #[test]
    fn prop_extreme_coordinates_stay_clamped(
        face in face_in(-1.0e6..=1.0e6, -1.0e6..=1.0e6),
        amplification in 0.1..10.0f64,
    ) {
        let mut config = Config::default();
        config.vertical.amplification = amplification;
        let estimator = HeadPoseEstimator::new(&config).unwrap();

        let angles = estimator.estimate(Some(&face.frame()), PoseAngles::NEUTRAL);
        prop_assert!(angles.is_finite());
        prop_assert!(angles.pitch.abs() <= PI / 4.0);
        prop_assert!(angles.yaw.abs() <= PI / 3.0);
    }

    #[test]
    fn prop_targets_within_ranges(face in face_in(0.0..=1.0, -1.0..=1.0)) {
        let estimator = HeadPoseEstimator::default();
        let frame = face.frame();

        let pitch = estimator.target_pitch(&frame).unwrap();
        let yaw = estimator.target_yaw(&frame).unwrap();
        prop_assert!(pitch.abs() <= PI / 4.0);
        prop_assert!(yaw.abs() <= PI / 3.0);
    }
}
