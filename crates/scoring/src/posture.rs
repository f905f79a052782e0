//! Posture classification from body pose landmarks.
//!
//! The head (pose nose) is compared with the midpoint of the shoulders:
//! the tilt is the angle between the shoulder-to-head vector and the
//! vertical through the shoulder midpoint. Optionally, slouching also
//! requires the head to have sunk toward the shoulder line.

use medfocus_common::config::FocusSettings;
use medfocus_landmark_model::indices::pose;
use medfocus_landmark_model::landmark::Landmark;

use crate::geometry::{angle_between, midpoint};

/// Posture measurements for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostureReading {
    /// Head tilt from vertical in degrees.
    pub angle_deg: f64,
    /// Height of the head above the shoulder line (normalized; positive
    /// means above, since image `y` grows downward).
    pub head_rise: f64,
}

/// Measure posture, or `None` if the pose is incomplete or degenerate.
pub fn read_posture(pose_landmarks: &[Landmark]) -> Option<PostureReading> {
    let head = pose_landmarks.get(pose::NOSE)?;
    let left = pose_landmarks.get(pose::LEFT_SHOULDER)?;
    let right = pose_landmarks.get(pose::RIGHT_SHOULDER)?;
    if !(head.is_finite() && left.is_finite() && right.is_finite()) {
        return None;
    }

    let mid = midpoint(left, right);
    // vertical reference one unit above the shoulder midpoint
    let angle_deg = angle_between(head, mid.x, mid.y, mid.x, mid.y - 1.0)?;

    Some(PostureReading {
        angle_deg,
        head_rise: mid.y - head.y,
    })
}

/// Whether the reading counts as slouching under `settings`.
pub fn is_slouching(reading: &PostureReading, settings: &FocusSettings) -> bool {
    if reading.angle_deg <= settings.posture_angle_threshold {
        return false;
    }
    match settings.posture_head_rise_min {
        Some(min_rise) => reading.head_rise < min_rise,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose_with_head(x: f64, y: f64) -> Vec<Landmark> {
        let mut landmarks = vec![Landmark::new(0.5, 0.5); pose::POSE_LEN];
        landmarks[pose::LEFT_SHOULDER] = Landmark::new(0.65, 0.7);
        landmarks[pose::RIGHT_SHOULDER] = Landmark::new(0.35, 0.7);
        landmarks[pose::NOSE] = Landmark::new(x, y);
        landmarks
    }

    #[test]
    fn test_upright_posture() {
        let reading = read_posture(&pose_with_head(0.5, 0.4)).unwrap();
        assert!(reading.angle_deg.abs() < 1e-9);
        assert!((reading.head_rise - 0.3).abs() < 1e-9);
        assert!(!is_slouching(&reading, &FocusSettings::default()));
    }

    #[test]
    fn test_tilt_needs_sunken_head_when_band_set() {
        let settings = FocusSettings::default();

        // 45 degree lean, head still well above the shoulders
        let leaning_high = read_posture(&pose_with_head(0.8, 0.4)).unwrap();
        assert!((leaning_high.angle_deg - 45.0).abs() < 1e-9);
        assert!(!is_slouching(&leaning_high, &settings));

        // same lean, head sunk close to the shoulder line
        let leaning_low = read_posture(&pose_with_head(0.6, 0.62)).unwrap();
        assert!(leaning_low.angle_deg > settings.posture_angle_threshold);
        assert!(is_slouching(&leaning_low, &settings));
    }

    #[test]
    fn test_angle_only_mode() {
        let settings = FocusSettings {
            posture_head_rise_min: None,
            ..FocusSettings::default()
        };
        let leaning_high = read_posture(&pose_with_head(0.8, 0.4)).unwrap();
        assert!(is_slouching(&leaning_high, &settings));
    }

    #[test]
    fn test_degenerate_pose() {
        // head exactly on the shoulder midpoint
        assert_eq!(read_posture(&pose_with_head(0.5, 0.7)), None);
        // too few landmarks
        assert_eq!(read_posture(&[Landmark::new(0.5, 0.4)]), None);
    }
}
