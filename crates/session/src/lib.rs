//! MedFocus Focus Session
//!
//! Runs a focus tracking session: acquires the camera, feeds frames to the
//! landmark detector, scores them, and raises alerts. When the session
//! ends the camera is released and a report is produced.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                FocusSession                  │
//! │  ┌──────────┐   ┌──────────┐   ┌──────────┐  │
//! │  │ Camera   │──▶│ Landmark │──▶│ Focus    │  │
//! │  │ Source   │   │ Detector │   │ Scorer   │  │
//! │  └──────────┘   └──────────┘   └────┬─────┘  │
//! │                                     │        │
//! │         ┌───────────────┬───────────┤        │
//! │         ▼               ▼           ▼        │
//! │   FrameResult     AlertSinks    results.jsonl│
//! │   (broadcast)                                │
//! └──────────────────────────────────────────────┘
//! ```

pub mod alerts;
pub mod backend;
pub mod session;
pub mod writer;

pub use alerts::{AlertSink, ChannelAlertSink, TracingAlertSink};
pub use session::*;
