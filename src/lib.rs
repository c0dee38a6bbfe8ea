//! Postural biomechanics metrics from named 2D body landmarks.
//!
//! Pure geometry — no landmark detection, no rendering, no allocations,
//! `no_std` compatible. Callers supply landmarks for up to three camera
//! views and receive a flat set of optional measurements.
//!
//! # Modules
//!
//! - [`geometry`] — Angle, tilt, and lean primitives over normalized image coordinates
//! - [`landmark`] — Landmarks, the closed site vocabulary, BlazePose mapping
//! - [`view`] — Camera views and side-view facing
//! - [`posture`] — Metric catalogue and the posture analyzer
//!
//! # Example
//!
//! ```
//! use posturekit::{Landmark, PoseLandmarks, PostureInput, Site, analyze};
//!
//! let front = PoseLandmarks::new()
//!     .with(Site::LeftHip, Landmark::new(0.42, 0.65))
//!     .with(Site::RightHip, Landmark::new(0.58, 0.67))
//!     .with(Site::LeftKnee, Landmark::new(0.43, 0.80))
//!     .with(Site::LeftAnkle, Landmark::new(0.42, 0.95));
//!
//! let metrics = analyze(&PostureInput::new().front(front));
//!
//! // Right hip sits lower: positive pelvic tilt.
//! assert!(metrics.pelvic_tilt_deg.unwrap() > 0.0);
//! // Only the left leg was placed.
//! let knees = metrics.knee_valgus.unwrap();
//! assert!(knees.left.is_some());
//! assert!(knees.right.is_none());
//! // No side view, no forward-head offset.
//! assert!(metrics.forward_head.is_none());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

pub mod geometry;
pub mod landmark;
pub mod posture;
pub mod view;

pub use landmark::{BLAZEPOSE_POINTS, Landmark, LandmarkError, PoseLandmarks, Site};
pub use posture::{Analyzer, Bilateral, Metric, PostureInput, PostureMetrics, analyze};
pub use view::{ProfileFacing, View};
