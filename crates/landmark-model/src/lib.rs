//! MedFocus Landmark Model
//!
//! Defines the core data contracts shared by the focus tracker:
//! - **Landmarks:** Normalized points produced by the external detector
//! - **Frames:** Timestamped face/pose landmark sets, one per video frame
//! - **Indices:** The fixed anatomical index conventions the scorer reads
//! - **Reports:** Persisted end-of-session summaries
//!
//! All coordinates are normalized to `[0.0, 1.0]` relative to the camera
//! frame, with `y` growing downward.

pub mod frame;
pub mod indices;
pub mod landmark;
pub mod report;

pub use frame::*;
pub use landmark::*;
pub use report::*;
