//! Geometry helpers over normalized landmarks.
//!
//! All functions are pure. Anything that would divide by zero or feed a
//! non-finite value downstream returns `None`, which callers treat as a
//! neutral signal for the frame.

use medfocus_landmark_model::landmark::Landmark;

/// Below this length a vector is treated as degenerate.
const MIN_NORM: f64 = 1e-12;

/// Euclidean distance between two landmarks in the image plane.
pub fn distance(a: &Landmark, b: &Landmark) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Arithmetic mean of two landmarks.
pub fn midpoint(a: &Landmark, b: &Landmark) -> Landmark {
    Landmark::with_depth((a.x + b.x) / 2.0, (a.y + b.y) / 2.0, (a.z + b.z) / 2.0)
}

/// Eye aspect ratio for the six eye landmarks selected by `indices`.
///
/// `EAR = (|p2 - p6| + |p3 - p5|) / (2 * |p1 - p4|)`. Lower means more
/// closed. Returns `None` when an index is missing, a point is not finite,
/// or the horizontal span collapses.
pub fn calculate_ear(landmarks: &[Landmark], indices: &[usize; 6]) -> Option<f64> {
    let mut points = [Landmark::default(); 6];
    for (slot, &idx) in points.iter_mut().zip(indices) {
        let lm = landmarks.get(idx)?;
        if !lm.is_finite() {
            return None;
        }
        *slot = *lm;
    }
    let [p1, p2, p3, p4, p5, p6] = points;

    let horizontal = distance(&p1, &p4);
    if horizontal < MIN_NORM {
        return None;
    }
    let vertical = distance(&p2, &p6) + distance(&p3, &p5);
    Some(vertical / (2.0 * horizontal))
}

/// Angle in degrees between `p1 - mid` and `(x, y) - mid`.
///
/// Returns `None` if either vector has zero length or an input is not
/// finite. The cosine is clamped so rounding never pushes `acos` out of
/// its domain.
pub fn angle_between(p1: &Landmark, mid_x: f64, mid_y: f64, x: f64, y: f64) -> Option<f64> {
    let (v1x, v1y) = (p1.x - mid_x, p1.y - mid_y);
    let (v2x, v2y) = (x - mid_x, y - mid_y);

    let mag1 = (v1x * v1x + v1y * v1y).sqrt();
    let mag2 = (v2x * v2x + v2y * v2y).sqrt();
    if !(mag1.is_finite() && mag2.is_finite()) || mag1 < MIN_NORM || mag2 < MIN_NORM {
        return None;
    }

    let cos = ((v1x * v2x + v1y * v2y) / (mag1 * mag2)).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}
