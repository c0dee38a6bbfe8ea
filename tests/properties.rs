//! Behavioral properties of the posture analyzer.
//!
//! Every assertion here is about the observable metrics record: which
//! fields are present, and what values they carry, for a given set of
//! landmarks.

use posturekit::geometry::{angle_between, horizontal_tilt};
use posturekit::*;

fn lm(x: f64, y: f64) -> Landmark {
    Landmark::new(x, y)
}

/// A slightly asymmetric standing posture, all sites used by any metric.
fn standing() -> PoseLandmarks {
    PoseLandmarks::new()
        .with(Site::LeftEye, lm(0.46, 0.20))
        .with(Site::RightEye, lm(0.54, 0.21))
        .with(Site::LeftEar, lm(0.43, 0.21))
        .with(Site::RightEar, lm(0.57, 0.22))
        .with(Site::LeftShoulder, lm(0.39, 0.33))
        .with(Site::RightShoulder, lm(0.61, 0.35))
        .with(Site::LeftHip, lm(0.43, 0.58))
        .with(Site::RightHip, lm(0.57, 0.57))
        .with(Site::LeftKnee, lm(0.45, 0.75))
        .with(Site::RightKnee, lm(0.56, 0.76))
        .with(Site::LeftAnkle, lm(0.44, 0.93))
        .with(Site::RightAnkle, lm(0.57, 0.92))
}

/// Sites read by at least one metric.
const USED: [Site; 12] = [
    Site::LeftEye,
    Site::RightEye,
    Site::LeftEar,
    Site::RightEar,
    Site::LeftShoulder,
    Site::RightShoulder,
    Site::LeftHip,
    Site::RightHip,
    Site::LeftKnee,
    Site::RightKnee,
    Site::LeftAnkle,
    Site::RightAnkle,
];

/// Keep only the sites whose bit is set in `mask`.
fn subset(full: &PoseLandmarks, mask: u32) -> PoseLandmarks {
    let mut view = PoseLandmarks::new();
    for (bit, &site) in USED.iter().enumerate() {
        if mask & (1 << bit) != 0 {
            view.set(site, full.get(site));
        }
    }
    view
}

fn all_views(view: PoseLandmarks) -> PostureInput {
    PostureInput::new().front(view).side(view).back(view)
}

fn bits(v: Option<f64>) -> Option<u64> {
    v.map(f64::to_bits)
}

// ============================================================
// Determinism and monotonicity
// ============================================================

#[test]
fn repeated_analysis_is_bit_identical() {
    let input = all_views(standing());
    let a = analyze(&input);
    let b = analyze(&input);
    for &metric in &Metric::ALL {
        assert_eq!(bits(a.get(metric)), bits(b.get(metric)), "{metric:?}");
    }
    assert_eq!(a, b);
}

#[test]
fn adding_a_landmark_never_removes_a_metric() {
    let full = standing();
    for mask in 0u32..(1 << USED.len()) {
        let smaller = analyze(&all_views(subset(&full, mask)));
        for (bit, &added) in USED.iter().enumerate() {
            if mask & (1 << bit) != 0 {
                continue;
            }
            let larger = analyze(&all_views(subset(&full, mask | (1 << bit))));
            for (metric, value) in smaller.present() {
                let grown = larger.get(metric);
                assert!(grown.is_some(), "{metric:?} lost after adding {added:?}");
                // Eyes take precedence over ears for head tilt.
                let preferred =
                    metric == Metric::HeadTilt && matches!(added, Site::LeftEye | Site::RightEye);
                if !preferred {
                    assert_eq!(
                        grown.map(f64::to_bits),
                        Some(value.to_bits()),
                        "{metric:?} changed after adding {added:?}"
                    );
                }
            }
        }
    }
}

// ============================================================
// Omission
// ============================================================

#[test]
fn no_views_no_metrics() {
    let m = analyze(&PostureInput::new());
    assert!(m.is_empty());
    assert_eq!(m, PostureMetrics::default());
}

#[test]
fn empty_views_no_metrics() {
    let m = analyze(&all_views(PoseLandmarks::new()));
    assert!(m.is_empty());
}

#[test]
fn lone_left_shoulder() {
    let front = PoseLandmarks::new().with(Site::LeftShoulder, lm(0.40, 0.45));
    let m = analyze(&PostureInput::new().front(front));
    assert!(m.shoulder_height_diff.is_none());
    assert!(m.pelvic_tilt_deg.is_none());
    assert!(m.trunk_lean_deg.is_none());
    assert!(m.head_tilt_deg.is_none());
    assert!(m.knee_valgus.is_none());
}

#[test]
fn left_leg_only() {
    let full = standing();
    let front = PoseLandmarks::new()
        .with(Site::LeftHip, full.left_hip.unwrap())
        .with(Site::LeftKnee, full.left_knee.unwrap())
        .with(Site::LeftAnkle, full.left_ankle.unwrap());
    let m = analyze(&PostureInput::new().front(front));
    let knees = m.knee_valgus.unwrap();
    assert!(knees.left.is_some());
    assert!(knees.right.is_none());
    assert_eq!(m.get(Metric::KneeValgusRight), None);
}

#[test]
fn nan_coordinates_never_surface() {
    let mut view = standing();
    for &site in &USED {
        view.set(site, Some(lm(f64::NAN, f64::NAN)));
    }
    let m = analyze(&all_views(view));
    assert!(m.is_empty(), "metrics from NaN input: {m:?}");
}

#[test]
fn infinite_coordinates_never_surface() {
    let front = PoseLandmarks::new()
        .with(Site::LeftShoulder, lm(0.4, f64::INFINITY))
        .with(Site::RightShoulder, lm(0.6, f64::INFINITY));
    let m = analyze(&PostureInput::new().front(front));
    assert!(m.shoulder_height_diff.is_none());
}

// ============================================================
// Reference values
// ============================================================

#[test]
fn symmetric_front_is_level() {
    let front = PoseLandmarks::new()
        .with(Site::LeftEye, lm(0.45, 0.30))
        .with(Site::RightEye, lm(0.55, 0.30))
        .with(Site::LeftShoulder, lm(0.40, 0.45))
        .with(Site::RightShoulder, lm(0.60, 0.45))
        .with(Site::LeftHip, lm(0.42, 0.65))
        .with(Site::RightHip, lm(0.58, 0.65));
    let m = analyze(&PostureInput::new().front(front));
    for metric in [
        Metric::HeadTilt,
        Metric::ShoulderHeightDiff,
        Metric::PelvicTilt,
        Metric::TrunkLean,
    ] {
        let v = m.get(metric).unwrap();
        assert!(v.abs() < 1e-9, "{metric:?} = {v}");
    }
}

#[test]
fn tilt_reference_values() {
    assert_eq!(horizontal_tilt(lm(0.0, 0.5), lm(1.0, 0.5)), 0.0);
    assert!(horizontal_tilt(lm(0.0, 0.3), lm(1.0, 0.5)) > 0.0);
    assert!(horizontal_tilt(lm(0.0, 0.5), lm(1.0, 0.3)) < 0.0);
}

#[test]
fn knee_reference_angles() {
    let straight = angle_between(lm(0.0, 0.0), lm(0.0, 1.0), lm(0.0, 2.0));
    assert!((straight - 180.0).abs() < 1e-9);
    let right = angle_between(lm(0.0, 0.0), lm(0.0, 1.0), lm(1.0, 1.0));
    assert!((right - 90.0).abs() < 1e-9);
}

#[test]
fn metrics_follow_their_view() {
    let full = standing();
    let input = PostureInput::new().side(full);
    assert_eq!(input.view(View::Side), Some(&full));
    assert!(input.view(View::Front).is_none());

    let m = analyze(&input);
    let views: Vec<View> = m.present().map(|(metric, _)| metric.view()).collect();
    assert_eq!(views, [View::Side]);
}

#[test]
fn facing_right_mirrors_forward_head() {
    let side = PoseLandmarks::new()
        .with(Site::LeftEar, lm(0.53, 0.20))
        .with(Site::LeftShoulder, lm(0.50, 0.35));
    let input = PostureInput::new().side(side);
    let left = analyze(&input).forward_head.unwrap();
    let right = Analyzer::new()
        .side_facing(ProfileFacing::Right)
        .analyze(&input)
        .forward_head
        .unwrap();
    assert!(left > 0.0);
    assert_eq!(right, -left);
}

#[test]
fn blazepose_detection_feeds_analyzer() {
    // Flat 33×3 buffer, every point at the centre except a level pair of hips.
    let mut values = [0.5f64; 99];
    values[23 * 3] = 0.42;
    values[23 * 3 + 1] = 0.65;
    values[24 * 3] = 0.58;
    values[24 * 3 + 1] = 0.65;
    let front = PoseLandmarks::from_blazepose_flat(&values).unwrap();
    let m = analyze(&PostureInput::new().front(front));
    assert_eq!(m.pelvic_tilt_deg, Some(0.0));
    // Coincident shoulders still give a zero height difference and an
    // upright trunk.
    assert_eq!(m.shoulder_height_diff, Some(0.0));
    assert_eq!(m.trunk_lean_deg, Some(0.0));
    // Knees and ankles share one point: both leg angles are degenerate.
    assert!(m.knee_valgus.is_none());
}
