//! Camera views and the facing direction of the side view.

/// Photographic angle a landmark set was captured from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum View {
    /// Anterior (frontal plane, subject facing the camera).
    Front,
    /// Lateral profile (sagittal plane).
    Side,
    /// Posterior (frontal plane, subject facing away).
    Back,
}

impl View {
    /// All views, in analysis order.
    pub const ALL: [Self; 3] = [Self::Front, Self::Side, Self::Back];
}

/// Which way the subject faces in a side-view photograph.
///
/// Forward-head offset is measured along image `x`, so its sign depends on
/// the subject's facing. `Left` means the subject's face points toward the
/// image-left edge.
///
/// ```text
///     Left:   ◄ ear ·  shoulder      Right:   shoulder  · ear ►
///              (ear.x < shoulder.x)             (ear.x > shoulder.x)
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum ProfileFacing {
    /// Face toward image-left. Offsets are reported as `ear.x - shoulder.x`.
    #[default]
    Left,
    /// Face toward image-right. Offsets are mirrored.
    Right,
}

impl ProfileFacing {
    /// Multiplier applied to the raw `ear.x - shoulder.x` offset.
    pub const fn sign(self) -> f64 {
        match self {
            Self::Left => 1.0,
            Self::Right => -1.0,
        }
    }
}
