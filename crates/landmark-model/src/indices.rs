//! Anatomical landmark index conventions.
//!
//! The detector reports landmarks as flat arrays whose indices follow a
//! fixed convention: a 468-point face mesh and a 33-point body pose.

/// Face mesh indices.
pub mod face {
    /// Number of points in the face mesh (without iris refinement).
    pub const MESH_LEN: usize = 468;

    /// Left eye, ordered `[p1, p2, p3, p4, p5, p6]` for the eye aspect ratio:
    /// outer corner, two upper lid points, inner corner, two lower lid points.
    pub const LEFT_EYE: [usize; 6] = [33, 160, 158, 133, 153, 144];

    /// Right eye, same ordering as [`LEFT_EYE`].
    pub const RIGHT_EYE: [usize; 6] = [362, 385, 387, 263, 373, 380];

    pub const NOSE_TIP: usize = 1;
    pub const FOREHEAD: usize = 10;
    pub const CHIN: usize = 152;
}

/// Body pose indices.
pub mod pose {
    /// Number of points in the body pose.
    pub const POSE_LEN: usize = 33;

    pub const NOSE: usize = 0;
    pub const LEFT_SHOULDER: usize = 11;
    pub const RIGHT_SHOULDER: usize = 12;
}
