//! Posture analysis across front, side, and back views.
//!
//! Each metric draws its landmarks from exactly one view. A metric is
//! reported only when every landmark it needs is present and the formula
//! yields a finite number; otherwise it is absent, never zero.
//!
//! # Example
//!
//! ```
//! use posturekit::{Landmark, PoseLandmarks, PostureInput, Site, analyze};
//!
//! let front = PoseLandmarks::new()
//!     .with(Site::LeftShoulder, Landmark::new(0.40, 0.45))
//!     .with(Site::RightShoulder, Landmark::new(0.60, 0.47));
//!
//! let metrics = analyze(&PostureInput::new().front(front));
//! assert!((metrics.shoulder_height_diff.unwrap() - 0.02).abs() < 1e-9);
//! assert!(metrics.pelvic_tilt_deg.is_none());
//! ```

use num_traits::Float;

use crate::geometry::{angle_between, horizontal_tilt, shank_deviation, trunk_lean};
use crate::landmark::{Landmark, PoseLandmarks, Site};
use crate::view::{ProfileFacing, View};

/// Landmark sets for up to three camera views.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PostureInput {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub front: Option<PoseLandmarks>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub side: Option<PoseLandmarks>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub back: Option<PoseLandmarks>,
}

impl PostureInput {
    /// Input with no views.
    pub const fn new() -> Self {
        Self {
            front: None,
            side: None,
            back: None,
        }
    }

    /// Set the front view.
    pub fn front(mut self, landmarks: PoseLandmarks) -> Self {
        self.front = Some(landmarks);
        self
    }

    /// Set the side view.
    pub fn side(mut self, landmarks: PoseLandmarks) -> Self {
        self.side = Some(landmarks);
        self
    }

    /// Set the back view.
    pub fn back(mut self, landmarks: PoseLandmarks) -> Self {
        self.back = Some(landmarks);
        self
    }

    /// Landmarks for `view`, if supplied.
    pub fn view(&self, view: View) -> Option<&PoseLandmarks> {
        match view {
            View::Front => self.front.as_ref(),
            View::Side => self.side.as_ref(),
            View::Back => self.back.as_ref(),
        }
    }
}

/// Left/right pair of an estimate that is computed per side.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Bilateral {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub left: Option<f64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub right: Option<f64>,
}

impl Bilateral {
    /// `None` when neither side was assessable.
    fn new(left: Option<f64>, right: Option<f64>) -> Option<Self> {
        if left.is_none() && right.is_none() {
            None
        } else {
            Some(Self { left, right })
        }
    }
}

/// Derived posture measurements. Absent fields were not assessable.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct PostureMetrics {
    /// Front view. Tilt of the eye line (ear line as fallback), degrees.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub head_tilt_deg: Option<f64>,
    /// Front view. `|left.y - right.y|` of the shoulders in normalized units.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub shoulder_height_diff: Option<f64>,
    /// Front view. Tilt of the hip line, degrees.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub pelvic_tilt_deg: Option<f64>,
    /// Front view. Trunk deviation from vertical, degrees.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub trunk_lean_deg: Option<f64>,
    /// Front view. Hip-knee-ankle interior angle per leg; 180° is straight.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub knee_valgus: Option<Bilateral>,
    /// Side view. Ear-to-shoulder horizontal offset, percent of image width.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub forward_head: Option<f64>,
    /// Back view. Shank deviation from vertical per leg, degrees.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub ankle_pronation_estimate: Option<Bilateral>,
}

impl PostureMetrics {
    /// Value of a single metric, if assessed.
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::HeadTilt => self.head_tilt_deg,
            Metric::ShoulderHeightDiff => self.shoulder_height_diff,
            Metric::PelvicTilt => self.pelvic_tilt_deg,
            Metric::TrunkLean => self.trunk_lean_deg,
            Metric::KneeValgusLeft => self.knee_valgus.and_then(|b| b.left),
            Metric::KneeValgusRight => self.knee_valgus.and_then(|b| b.right),
            Metric::ForwardHead => self.forward_head,
            Metric::AnklePronationLeft => self.ankle_pronation_estimate.and_then(|b| b.left),
            Metric::AnklePronationRight => self.ankle_pronation_estimate.and_then(|b| b.right),
        }
    }

    fn set(&mut self, metric: Metric, value: Option<f64>) {
        let left = |pair: Option<Bilateral>| pair.and_then(|b| b.left);
        let right = |pair: Option<Bilateral>| pair.and_then(|b| b.right);
        match metric {
            Metric::HeadTilt => self.head_tilt_deg = value,
            Metric::ShoulderHeightDiff => self.shoulder_height_diff = value,
            Metric::PelvicTilt => self.pelvic_tilt_deg = value,
            Metric::TrunkLean => self.trunk_lean_deg = value,
            Metric::KneeValgusLeft => {
                self.knee_valgus = Bilateral::new(value, right(self.knee_valgus));
            }
            Metric::KneeValgusRight => {
                self.knee_valgus = Bilateral::new(left(self.knee_valgus), value);
            }
            Metric::ForwardHead => self.forward_head = value,
            Metric::AnklePronationLeft => {
                self.ankle_pronation_estimate =
                    Bilateral::new(value, right(self.ankle_pronation_estimate));
            }
            Metric::AnklePronationRight => {
                self.ankle_pronation_estimate =
                    Bilateral::new(left(self.ankle_pronation_estimate), value);
            }
        }
    }

    /// Assessed metrics with their values, in [`Metric::ALL`] order.
    pub fn present(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL
            .iter()
            .filter_map(move |&m| self.get(m).map(|v| (m, v)))
    }

    /// Whether no metric could be assessed.
    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }
}

/// One derived measurement, with the view and landmarks it needs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Metric {
    HeadTilt,
    ShoulderHeightDiff,
    PelvicTilt,
    TrunkLean,
    KneeValgusLeft,
    KneeValgusRight,
    ForwardHead,
    AnklePronationLeft,
    AnklePronationRight,
}

impl Metric {
    /// Every metric, grouped by view.
    pub const ALL: [Self; 9] = [
        Self::HeadTilt,
        Self::ShoulderHeightDiff,
        Self::PelvicTilt,
        Self::TrunkLean,
        Self::KneeValgusLeft,
        Self::KneeValgusRight,
        Self::ForwardHead,
        Self::AnklePronationLeft,
        Self::AnklePronationRight,
    ];

    /// View this metric is measured in.
    pub const fn view(self) -> View {
        match self {
            Self::HeadTilt
            | Self::ShoulderHeightDiff
            | Self::PelvicTilt
            | Self::TrunkLean
            | Self::KneeValgusLeft
            | Self::KneeValgusRight => View::Front,
            Self::ForwardHead => View::Side,
            Self::AnklePronationLeft | Self::AnklePronationRight => View::Back,
        }
    }

    /// Alternative landmark sets, in order of preference. The metric is
    /// assessable when any one set is fully present.
    pub const fn required_sites(self) -> &'static [&'static [Site]] {
        match self {
            Self::HeadTilt => &[
                &[Site::LeftEye, Site::RightEye],
                &[Site::LeftEar, Site::RightEar],
            ],
            Self::ShoulderHeightDiff => &[&[Site::LeftShoulder, Site::RightShoulder]],
            Self::PelvicTilt => &[&[Site::LeftHip, Site::RightHip]],
            Self::TrunkLean => &[&[
                Site::LeftShoulder,
                Site::RightShoulder,
                Site::LeftHip,
                Site::RightHip,
            ]],
            Self::KneeValgusLeft => &[&[Site::LeftHip, Site::LeftKnee, Site::LeftAnkle]],
            Self::KneeValgusRight => &[&[Site::RightHip, Site::RightKnee, Site::RightAnkle]],
            Self::ForwardHead => &[&[Site::LeftEar, Site::LeftShoulder]],
            Self::AnklePronationLeft => &[&[Site::LeftKnee, Site::LeftAnkle]],
            Self::AnklePronationRight => &[&[Site::RightKnee, Site::RightAnkle]],
        }
    }

    /// Whether `landmarks` holds every site of at least one required set.
    ///
    /// Presence only: a present set may still produce a degenerate
    /// (non-finite) value, which the analyzer drops. With
    /// [`Analyzer::min_visibility`] set, the analyzer first removes
    /// low-scored landmarks, so a metric reported assessable here on the
    /// raw landmarks can still be omitted; check the gated view
    /// ([`PoseLandmarks::gated`]) to match the analyzer.
    pub fn is_assessable(self, landmarks: &PoseLandmarks) -> bool {
        self.required_sites()
            .iter()
            .any(|set| set.iter().all(|&s| landmarks.contains(s)))
    }

    /// Measure this metric from `landmarks`.
    ///
    /// Tries each required set in order of preference and reports the
    /// first one that is fully present and yields a finite value.
    /// `facing` only affects [`Metric::ForwardHead`].
    pub fn measure(self, landmarks: &PoseLandmarks, facing: ProfileFacing) -> Option<f64> {
        self.required_sites().iter().find_map(|set| {
            let mut points = [Landmark::new(0.0, 0.0); MAX_SET];
            for (slot, &site) in points.iter_mut().zip(set.iter()) {
                *slot = landmarks.get(site)?;
            }
            finite(self.formula(&points[..set.len()], facing))
        })
    }

    /// Apply the formula to one required set, landmarks in set order.
    fn formula(self, points: &[Landmark], facing: ProfileFacing) -> f64 {
        match (self, points) {
            (Self::HeadTilt | Self::PelvicTilt, &[left, right]) => horizontal_tilt(left, right),
            (Self::ShoulderHeightDiff, &[left, right]) => Float::abs(left.y - right.y),
            (Self::TrunkLean, &[ls, rs, lh, rh]) => trunk_lean(ls, rs, lh, rh),
            (Self::KneeValgusLeft | Self::KneeValgusRight, &[hip, knee, ankle]) => {
                angle_between(hip, knee, ankle)
            }
            (Self::ForwardHead, &[ear, shoulder]) => facing.sign() * (ear.x - shoulder.x) * 100.0,
            (Self::AnklePronationLeft | Self::AnklePronationRight, &[knee, ankle]) => {
                shank_deviation(knee, ankle)
            }
            // Set length disagrees with the formula: not measurable.
            _ => f64::NAN,
        }
    }
}

/// Largest required set.
const MAX_SET: usize = 4;

/// Configurable posture analyzer.
///
/// The default configuration reproduces [`analyze`]: side view assumed to
/// face image-left, no visibility gating.
///
/// ```
/// use posturekit::{Analyzer, Landmark, PoseLandmarks, PostureInput, ProfileFacing, Site};
///
/// let side = PoseLandmarks::new()
///     .with(Site::LeftEar, Landmark::new(0.55, 0.20))
///     .with(Site::LeftShoulder, Landmark::new(0.50, 0.35));
/// let input = PostureInput::new().side(side);
///
/// let facing_left = Analyzer::new().analyze(&input);
/// let facing_right = Analyzer::new()
///     .side_facing(ProfileFacing::Right)
///     .analyze(&input);
/// assert_eq!(facing_left.forward_head, facing_right.forward_head.map(|v| -v));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Analyzer {
    /// Facing of the subject in the side view.
    pub side_facing: ProfileFacing,
    /// Drop landmarks whose visibility score is below this threshold.
    pub min_visibility: Option<f64>,
}

impl Analyzer {
    /// Analyzer with default settings.
    pub const fn new() -> Self {
        Self {
            side_facing: ProfileFacing::Left,
            min_visibility: None,
        }
    }

    /// Set the side-view facing.
    pub fn side_facing(mut self, facing: ProfileFacing) -> Self {
        self.side_facing = facing;
        self
    }

    /// Treat landmarks scored below `threshold` as absent.
    pub fn min_visibility(mut self, threshold: f64) -> Self {
        self.min_visibility = Some(threshold);
        self
    }

    /// Compute every assessable metric from `input`.
    pub fn analyze(&self, input: &PostureInput) -> PostureMetrics {
        let mut metrics = PostureMetrics::default();
        for view in View::ALL {
            let Some(&landmarks) = input.view(view) else {
                continue;
            };
            let landmarks = self.prepare(landmarks);
            for metric in Metric::ALL.into_iter().filter(|m| m.view() == view) {
                metrics.set(metric, metric.measure(&landmarks, self.side_facing));
            }
        }
        metrics
    }

    fn prepare(&self, landmarks: PoseLandmarks) -> PoseLandmarks {
        match self.min_visibility {
            Some(threshold) => landmarks.gated(threshold),
            None => landmarks,
        }
    }
}

/// Compute every assessable metric with the default [`Analyzer`].
pub fn analyze(input: &PostureInput) -> PostureMetrics {
    Analyzer::new().analyze(input)
}

/// NaN and infinities are reported as absent.
fn finite(v: f64) -> Option<f64> {
    if Float::is_finite(v) { Some(v) } else { None }
}
