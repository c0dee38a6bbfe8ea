//! Planar geometry primitives over normalized image coordinates.
//!
//! Image `y` grows downward. Every function returns degrees and never
//! panics; degenerate input surfaces as NaN, never as a plausible zero.
//!
//! ```text
//!     (0,0) ──────────► x
//!       │    L ●━━━━━━━● R      horizontal_tilt(L, R) = 0°
//!       │
//!       │    L ●━━━┓
//!       │          ┗━━━● R      horizontal_tilt(L, R) > 0° (R lower)
//!       ▼
//!       y
//! ```

use num_traits::Float;

use crate::landmark::Landmark;

/// Interior angle at vertex `b` formed by the rays `b→a` and `b→c`, in `[0, 180]`.
///
/// Symmetric under swapping `a` and `c`. Returns NaN when `b` coincides
/// with `a` or `c`, since the ray direction is undefined there.
///
/// ```
/// use posturekit::{Landmark, geometry::angle_between};
///
/// let hip = Landmark::new(0.0, 0.0);
/// let knee = Landmark::new(0.0, 1.0);
/// let ankle = Landmark::new(1.0, 1.0);
/// assert!((angle_between(hip, knee, ankle) - 90.0).abs() < 1e-9);
/// ```
pub fn angle_between(a: Landmark, b: Landmark, c: Landmark) -> f64 {
    if a.coincides(b) || c.coincides(b) {
        return f64::NAN;
    }
    let ray_c = Float::atan2(c.y - b.y, c.x - b.x);
    let ray_a = Float::atan2(a.y - b.y, a.x - b.x);
    let angle = Float::to_degrees(Float::abs(ray_c - ray_a));
    if angle > 180.0 { 360.0 - angle } else { angle }
}

/// Signed angle of the line `left → right` against the horizontal axis.
///
/// Positive when `right` sits lower in the image than `left`. NaN when the
/// two points coincide.
pub fn horizontal_tilt(left: Landmark, right: Landmark) -> f64 {
    if left.coincides(right) {
        return f64::NAN;
    }
    Float::to_degrees(Float::atan2(right.y - left.y, right.x - left.x))
}

/// Midpoint of two landmarks in the image plane.
///
/// Depth and visibility are not carried over.
pub fn midpoint(a: Landmark, b: Landmark) -> Landmark {
    Landmark::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Signed deviation of the hip-midpoint → shoulder-midpoint segment from
/// true vertical.
///
/// Zero for an upright trunk. Positive when the shoulders sit to the
/// image-right of the hips. NaN when the two midpoints coincide.
pub fn trunk_lean(
    left_shoulder: Landmark,
    right_shoulder: Landmark,
    left_hip: Landmark,
    right_hip: Landmark,
) -> f64 {
    let shoulders = midpoint(left_shoulder, right_shoulder);
    let hips = midpoint(left_hip, right_hip);
    if shoulders.coincides(hips) {
        return f64::NAN;
    }
    let dx = shoulders.x - hips.x;
    let dy = shoulders.y - hips.y;
    // -dy: image y points down, vertical "up" is negative y.
    Float::to_degrees(Float::atan2(dx, -dy))
}

/// Signed deviation of the knee → ankle segment from the downward vertical.
///
/// Zero for a plumb shank. Positive when the ankle sits to the image-right
/// of the knee. NaN when knee and ankle coincide.
pub fn shank_deviation(knee: Landmark, ankle: Landmark) -> f64 {
    if knee.coincides(ankle) {
        return f64::NAN;
    }
    Float::to_degrees(Float::atan2(ankle.x - knee.x, ankle.y - knee.y))
}
