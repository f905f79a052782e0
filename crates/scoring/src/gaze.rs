//! Gaze / attention estimate from face mesh proportions.
//!
//! When the head pitches down the nose tip projects closer to the chin and
//! further from the forehead (and the reverse when looking up). The signed
//! difference of the two spans, scaled by 100, is compared against a
//! configured band.

use medfocus_common::config::FocusSettings;
use medfocus_landmark_model::indices::face;
use medfocus_landmark_model::landmark::Landmark;

use crate::geometry::distance;

/// Scale applied to the span difference so the band reads in whole units.
pub const GAZE_SCALE: f64 = 100.0;

/// `(|nose - forehead| - |nose - chin|) * 100`, or `None` if a landmark
/// is missing or not finite.
pub fn gaze_offset(face_landmarks: &[Landmark]) -> Option<f64> {
    let nose = face_landmarks.get(face::NOSE_TIP)?;
    let forehead = face_landmarks.get(face::FOREHEAD)?;
    let chin = face_landmarks.get(face::CHIN)?;
    if !(nose.is_finite() && forehead.is_finite() && chin.is_finite()) {
        return None;
    }
    Some((distance(nose, forehead) - distance(nose, chin)) * GAZE_SCALE)
}

/// Whether the offset falls outside `[gaze_min, gaze_max]`.
pub fn is_not_looking(offset: f64, settings: &FocusSettings) -> bool {
    offset < settings.gaze_min || offset > settings.gaze_max
}
