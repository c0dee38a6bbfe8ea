//! Landmarks, the closed site vocabulary, and per-view landmark sets.

/// A single anatomical point in normalized image coordinates.
///
/// `x` and `y` are fractions of image width and height, with `y` growing
/// downward. `z` (relative depth) and `visibility` (detector confidence)
/// are carried through for callers but unused by the posture formulas.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Landmark {
    /// Horizontal position, fraction of image width.
    pub x: f64,
    /// Vertical position, fraction of image height (downward).
    pub y: f64,
    /// Relative depth.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub z: Option<f64>,
    /// Detector confidence.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub visibility: Option<f64>,
}

impl Landmark {
    /// Create a planar landmark with no depth or visibility.
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            visibility: None,
        }
    }

    /// Set relative depth.
    pub const fn with_z(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }

    /// Set detector confidence.
    pub const fn with_visibility(mut self, visibility: f64) -> Self {
        self.visibility = Some(visibility);
        self
    }

    /// Whether both planar coordinates match exactly.
    pub fn coincides(self, other: Self) -> bool {
        self.x == other.x && self.y == other.y
    }

    /// Whether this landmark passes a minimum-visibility gate.
    ///
    /// A landmark with no visibility score always passes; the score is
    /// only consulted when the detector supplied one.
    pub fn is_visible(self, min_visibility: f64) -> bool {
        match self.visibility {
            Some(v) => v >= min_visibility,
            None => true,
        }
    }
}

/// Named anatomical site. Closed vocabulary matching the fields of
/// [`PoseLandmarks`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Site {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    LeftHeel,
    RightHeel,
    /// Seventh cervical vertebra (manually placed).
    C7,
    /// Fifth lumbar vertebra (manually placed).
    L5,
}

impl Site {
    /// Every site, in declaration order.
    pub const ALL: [Self; 21] = [
        Self::Nose,
        Self::LeftEye,
        Self::RightEye,
        Self::LeftEar,
        Self::RightEar,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
        Self::LeftHeel,
        Self::RightHeel,
        Self::C7,
        Self::L5,
    ];

    /// camelCase name used by the application's JSON.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEye => "leftEye",
            Self::RightEye => "rightEye",
            Self::LeftEar => "leftEar",
            Self::RightEar => "rightEar",
            Self::LeftShoulder => "leftShoulder",
            Self::RightShoulder => "rightShoulder",
            Self::LeftElbow => "leftElbow",
            Self::RightElbow => "rightElbow",
            Self::LeftWrist => "leftWrist",
            Self::RightWrist => "rightWrist",
            Self::LeftHip => "leftHip",
            Self::RightHip => "rightHip",
            Self::LeftKnee => "leftKnee",
            Self::RightKnee => "rightKnee",
            Self::LeftAnkle => "leftAnkle",
            Self::RightAnkle => "rightAnkle",
            Self::LeftHeel => "leftHeel",
            Self::RightHeel => "rightHeel",
            Self::C7 => "c7",
            Self::L5 => "l5",
        }
    }

    /// Index of this site in the 33-point BlazePose topology, if it has one.
    ///
    /// `C7` and `L5` are placed by hand and have no detector index.
    pub const fn blazepose_index(self) -> Option<usize> {
        match self {
            Self::Nose => Some(0),
            Self::LeftEye => Some(2),
            Self::RightEye => Some(5),
            Self::LeftEar => Some(7),
            Self::RightEar => Some(8),
            Self::LeftShoulder => Some(11),
            Self::RightShoulder => Some(12),
            Self::LeftElbow => Some(13),
            Self::RightElbow => Some(14),
            Self::LeftWrist => Some(15),
            Self::RightWrist => Some(16),
            Self::LeftHip => Some(23),
            Self::RightHip => Some(24),
            Self::LeftKnee => Some(25),
            Self::RightKnee => Some(26),
            Self::LeftAnkle => Some(27),
            Self::RightAnkle => Some(28),
            Self::LeftHeel => Some(29),
            Self::RightHeel => Some(30),
            Self::C7 | Self::L5 => None,
        }
    }
}

/// Number of points in a BlazePose detection.
pub const BLAZEPOSE_POINTS: usize = 33;

/// Landmarks observed in one camera view.
///
/// Every site is independently optional: `None` means the site was not
/// observed or not placed, never that it sits at the origin.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct PoseLandmarks {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub nose: Option<Landmark>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub left_eye: Option<Landmark>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub right_eye: Option<Landmark>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub left_ear: Option<Landmark>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub right_ear: Option<Landmark>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub left_shoulder: Option<Landmark>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub right_shoulder: Option<Landmark>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub left_elbow: Option<Landmark>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub right_elbow: Option<Landmark>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub left_wrist: Option<Landmark>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub right_wrist: Option<Landmark>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub left_hip: Option<Landmark>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub right_hip: Option<Landmark>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub left_knee: Option<Landmark>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub right_knee: Option<Landmark>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub left_ankle: Option<Landmark>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub right_ankle: Option<Landmark>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub left_heel: Option<Landmark>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub right_heel: Option<Landmark>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub c7: Option<Landmark>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub l5: Option<Landmark>,
}

impl PoseLandmarks {
    /// An empty view with no sites observed.
    pub const fn new() -> Self {
        Self {
            nose: None,
            left_eye: None,
            right_eye: None,
            left_ear: None,
            right_ear: None,
            left_shoulder: None,
            right_shoulder: None,
            left_elbow: None,
            right_elbow: None,
            left_wrist: None,
            right_wrist: None,
            left_hip: None,
            right_hip: None,
            left_knee: None,
            right_knee: None,
            left_ankle: None,
            right_ankle: None,
            left_heel: None,
            right_heel: None,
            c7: None,
            l5: None,
        }
    }

    /// Landmark at `site`, if observed.
    pub fn get(&self, site: Site) -> Option<Landmark> {
        *self.slot(site)
    }

    /// Whether `site` was observed.
    pub fn contains(&self, site: Site) -> bool {
        self.slot(site).is_some()
    }

    /// Place or clear the landmark at `site`.
    pub fn set(&mut self, site: Site, landmark: Option<Landmark>) {
        *self.slot_mut(site) = landmark;
    }

    /// Builder form of [`set`](Self::set) for a present landmark.
    pub fn with(mut self, site: Site, landmark: Landmark) -> Self {
        self.set(site, Some(landmark));
        self
    }

    /// Number of observed sites.
    pub fn len(&self) -> usize {
        Site::ALL.iter().filter(|&&s| self.contains(s)).count()
    }

    /// Whether no site was observed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Observed sites with their landmarks, in [`Site::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Site, Landmark)> + '_ {
        Site::ALL
            .iter()
            .filter_map(move |&s| self.get(s).map(|lm| (s, lm)))
    }

    /// Copy of this view with low-confidence landmarks removed.
    ///
    /// Landmarks whose `visibility` is below `min_visibility` become
    /// absent. Landmarks without a visibility score are kept.
    pub fn gated(&self, min_visibility: f64) -> Self {
        let mut out = *self;
        for &site in &Site::ALL {
            if let Some(lm) = self.get(site)
                && !lm.is_visible(min_visibility)
            {
                out.set(site, None);
            }
        }
        out
    }

    /// Map a 33-point BlazePose detection onto named sites.
    ///
    /// Indices without a named site (mouth, fingers, foot index) are
    /// ignored. `c7` and `l5` stay absent.
    pub fn from_blazepose(points: &[Landmark]) -> Result<Self, LandmarkError> {
        if points.len() != BLAZEPOSE_POINTS {
            return Err(LandmarkError::WrongPointCount {
                expected: BLAZEPOSE_POINTS,
                actual: points.len(),
            });
        }
        let mut view = Self::new();
        for &site in &Site::ALL {
            if let Some(i) = site.blazepose_index() {
                view.set(site, Some(points[i]));
            }
        }
        Ok(view)
    }

    /// Map a flat `[x0, y0, z0, x1, y1, z1, ...]` BlazePose buffer onto
    /// named sites.
    ///
    /// This is the layout a browser bridge hands over: 33 points times
    /// three coordinates.
    pub fn from_blazepose_flat(values: &[f64]) -> Result<Self, LandmarkError> {
        const STRIDE: usize = 3;
        if values.len() != BLAZEPOSE_POINTS * STRIDE {
            return Err(LandmarkError::WrongValueCount {
                expected: BLAZEPOSE_POINTS * STRIDE,
                actual: values.len(),
            });
        }
        let mut view = Self::new();
        for &site in &Site::ALL {
            if let Some(i) = site.blazepose_index() {
                let v = &values[i * STRIDE..(i + 1) * STRIDE];
                view.set(site, Some(Landmark::new(v[0], v[1]).with_z(v[2])));
            }
        }
        Ok(view)
    }

    fn slot(&self, site: Site) -> &Option<Landmark> {
        match site {
            Site::Nose => &self.nose,
            Site::LeftEye => &self.left_eye,
            Site::RightEye => &self.right_eye,
            Site::LeftEar => &self.left_ear,
            Site::RightEar => &self.right_ear,
            Site::LeftShoulder => &self.left_shoulder,
            Site::RightShoulder => &self.right_shoulder,
            Site::LeftElbow => &self.left_elbow,
            Site::RightElbow => &self.right_elbow,
            Site::LeftWrist => &self.left_wrist,
            Site::RightWrist => &self.right_wrist,
            Site::LeftHip => &self.left_hip,
            Site::RightHip => &self.right_hip,
            Site::LeftKnee => &self.left_knee,
            Site::RightKnee => &self.right_knee,
            Site::LeftAnkle => &self.left_ankle,
            Site::RightAnkle => &self.right_ankle,
            Site::LeftHeel => &self.left_heel,
            Site::RightHeel => &self.right_heel,
            Site::C7 => &self.c7,
            Site::L5 => &self.l5,
        }
    }

    fn slot_mut(&mut self, site: Site) -> &mut Option<Landmark> {
        match site {
            Site::Nose => &mut self.nose,
            Site::LeftEye => &mut self.left_eye,
            Site::RightEye => &mut self.right_eye,
            Site::LeftEar => &mut self.left_ear,
            Site::RightEar => &mut self.right_ear,
            Site::LeftShoulder => &mut self.left_shoulder,
            Site::RightShoulder => &mut self.right_shoulder,
            Site::LeftElbow => &mut self.left_elbow,
            Site::RightElbow => &mut self.right_elbow,
            Site::LeftWrist => &mut self.left_wrist,
            Site::RightWrist => &mut self.right_wrist,
            Site::LeftHip => &mut self.left_hip,
            Site::RightHip => &mut self.right_hip,
            Site::LeftKnee => &mut self.left_knee,
            Site::RightKnee => &mut self.right_knee,
            Site::LeftAnkle => &mut self.left_ankle,
            Site::RightAnkle => &mut self.right_ankle,
            Site::LeftHeel => &mut self.left_heel,
            Site::RightHeel => &mut self.right_heel,
            Site::C7 => &mut self.c7,
            Site::L5 => &mut self.l5,
        }
    }
}

impl core::fmt::Display for Site {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Landmark ingestion error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LandmarkError {
    /// Detection did not contain the expected number of points.
    WrongPointCount { expected: usize, actual: usize },
    /// Flat coordinate buffer had the wrong length.
    WrongValueCount { expected: usize, actual: usize },
}

impl core::fmt::Display for LandmarkError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self {
            Self::WrongPointCount { expected, actual } => {
                write!(f, "expected {expected} landmarks, got {actual}")
            }
            Self::WrongValueCount { expected, actual } => {
                write!(f, "expected {expected} coordinate values, got {actual}")
            }
        }
    }
}

impl core::error::Error for LandmarkError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn indexed_points() -> [Landmark; BLAZEPOSE_POINTS] {
        // Point i sits at (i/100, i/100) so indices are recoverable.
        core::array::from_fn(|i| Landmark::new(i as f64 / 100.0, i as f64 / 100.0))
    }

    #[test]
    fn get_set_round_trip_every_site() {
        let mut view = PoseLandmarks::new();
        for (i, &site) in Site::ALL.iter().enumerate() {
            view.set(site, Some(Landmark::new(i as f64, 0.0)));
        }
        for (i, &site) in Site::ALL.iter().enumerate() {
            assert_eq!(view.get(site).map(|lm| lm.x), Some(i as f64), "{site:?}");
        }
        assert_eq!(view.len(), Site::ALL.len());
    }

    #[test]
    fn empty_view() {
        let view = PoseLandmarks::default();
        assert!(view.is_empty());
        assert_eq!(view, PoseLandmarks::new());
        assert_eq!(view.iter().count(), 0);
    }

    #[test]
    fn clearing_a_site() {
        let mut view = PoseLandmarks::new().with(Site::LeftHip, Landmark::new(0.4, 0.6));
        assert!(view.contains(Site::LeftHip));
        view.set(Site::LeftHip, None);
        assert!(!view.contains(Site::LeftHip));
    }

    #[test]
    fn site_names_are_unique() {
        for (i, a) in Site::ALL.iter().enumerate() {
            for b in &Site::ALL[i + 1..] {
                assert_ne!(a.name(), b.name());
            }
        }
    }

    #[test]
    fn site_displays_its_json_name() {
        assert_eq!(Site::LeftShoulder.to_string(), "leftShoulder");
        assert_eq!(Site::C7.to_string(), "c7");
    }

    #[test]
    fn visibility_gate() {
        let view = PoseLandmarks::new()
            .with(Site::LeftEye, Landmark::new(0.4, 0.3).with_visibility(0.9))
            .with(Site::RightEye, Landmark::new(0.6, 0.3).with_visibility(0.2))
            .with(Site::Nose, Landmark::new(0.5, 0.35));
        let gated = view.gated(0.5);
        assert!(gated.contains(Site::LeftEye));
        assert!(!gated.contains(Site::RightEye));
        // No score, no gating.
        assert!(gated.contains(Site::Nose));
        // Threshold is inclusive.
        assert!(view.gated(0.9).contains(Site::LeftEye));
    }

    // ── BlazePose mapping ───────────────────────────────────────────────

    #[test]
    fn blazepose_indices_map_to_sites() {
        let view = PoseLandmarks::from_blazepose(&indexed_points()).unwrap();
        assert_eq!(view.nose.unwrap().x, 0.0);
        assert_eq!(view.left_eye.unwrap().x, 0.02);
        assert_eq!(view.right_eye.unwrap().x, 0.05);
        assert_eq!(view.left_ear.unwrap().x, 0.07);
        assert_eq!(view.right_shoulder.unwrap().x, 0.12);
        assert_eq!(view.left_hip.unwrap().x, 0.23);
        assert_eq!(view.right_knee.unwrap().x, 0.26);
        assert_eq!(view.left_ankle.unwrap().x, 0.27);
        assert_eq!(view.right_heel.unwrap().x, 0.30);
        assert!(view.c7.is_none());
        assert!(view.l5.is_none());
        assert_eq!(view.len(), 19);
    }

    #[test]
    fn blazepose_wrong_count() {
        let err = PoseLandmarks::from_blazepose(&indexed_points()[..17]).unwrap_err();
        assert_eq!(
            err,
            LandmarkError::WrongPointCount {
                expected: 33,
                actual: 17
            }
        );
    }

    #[test]
    fn blazepose_flat_buffer() {
        let mut values = [0.0f64; 99];
        // Left knee (25) at (0.41, 0.72, -0.1).
        values[75] = 0.41;
        values[76] = 0.72;
        values[77] = -0.1;
        let view = PoseLandmarks::from_blazepose_flat(&values).unwrap();
        let knee = view.left_knee.unwrap();
        assert_eq!((knee.x, knee.y, knee.z), (0.41, 0.72, Some(-0.1)));
    }

    #[test]
    fn blazepose_flat_wrong_length() {
        let err = PoseLandmarks::from_blazepose_flat(&[0.0; 98]).unwrap_err();
        assert_eq!(
            err,
            LandmarkError::WrongValueCount {
                expected: 99,
                actual: 98
            }
        );
    }

    #[cfg(feature = "std")]
    #[test]
    fn error_display() {
        let err = LandmarkError::WrongPointCount {
            expected: 33,
            actual: 0,
        };
        assert_eq!(err.to_string(), "expected 33 landmarks, got 0");
    }
}
