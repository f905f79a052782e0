//! MedFocus Scoring Core
//!
//! Turns per-frame detector landmarks into a continuously updated focus
//! score and discrete alert conditions:
//! - **Geometry:** Distances, eye aspect ratio, midpoints, and angles
//! - **Signals:** Blink rate, gaze offset, and posture classification
//! - **Scorer:** Penalty accumulation and bounded score updates
//! - **Alerts:** Dual-threshold alerting with re-arm on recovery
//!
//! This crate is pure computation: no I/O, no camera, no clock. Every
//! timestamp comes from the frames themselves.

pub mod alerts;
pub mod blink;
pub mod gaze;
pub mod geometry;
pub mod history;
pub mod posture;
pub mod scorer;

pub use alerts::{AlertEvent, AlertLevel, AlertMonitor};
pub use history::{SessionHistory, SessionSummary};
pub use scorer::{FocusScorer, FrameResult};
