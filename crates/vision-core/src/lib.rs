//! MedFocus vision core contracts.
//!
//! This crate contains the contracts for the two external collaborators of
//! the focus tracker, so session code never couples to a concrete camera
//! stack or inference library:
//! - a [`CameraSource`] that owns the video stream, and
//! - a [`LandmarkDetector`] that turns video frames into face/pose landmarks.

use medfocus_common::error::MedfocusResult;
use medfocus_landmark_model::frame::LandmarkFrame;
use serde::{Deserialize, Serialize};

/// Information about an opened camera stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CameraInfo {
    /// Device name/identifier.
    pub name: String,
    /// Resolution in pixels.
    pub width: u32,
    pub height: u32,
    /// Nominal frame rate in Hz.
    pub frame_rate_hz: u32,
}

impl CameraInfo {
    /// Width divided by height (1.0 for degenerate sizes).
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f64 / self.height as f64
    }
}

/// Availability of the camera from the session's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CameraStatus {
    /// No stream acquired yet, or the stream was released.
    #[default]
    Closed,
    /// Stream acquired and delivering frames.
    Open,
    /// The user refused camera access.
    Denied,
    /// The host has no camera API.
    Unsupported,
}

/// One decoded video frame handed from the camera to the detector.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFrame {
    /// Monotonic presentation timestamp in milliseconds.
    pub timestamp_ms: f64,
    /// Frame counter since the stream was opened.
    pub sequence: u64,
    pub width: u32,
    pub height: u32,
    /// Raw pixel payload. Empty for sources that carry no image data.
    pub data: Vec<u8>,
}

/// A camera that exclusively owns one video stream.
pub trait CameraSource: Send {
    /// Acquire the stream. Fails with a permission or unsupported error
    /// when the camera cannot be used; callers must not retry automatically.
    fn open(&mut self) -> MedfocusResult<CameraInfo>;

    /// Next decoded frame, or `None` when no new frame is available.
    fn next_frame(&mut self) -> MedfocusResult<Option<VideoFrame>>;

    /// Stop every track of the stream and release the device.
    fn stop_all_tracks(&mut self);

    /// Whether the stream is currently held.
    fn is_open(&self) -> bool;

    /// Source name for logging.
    fn name(&self) -> &str;
}

/// Face/pose landmark detector.
pub trait LandmarkDetector: Send {
    /// Whether the model is loaded. Frames arriving before this returns
    /// true are skipped, not treated as errors.
    fn is_ready(&self) -> bool;

    /// Run detection on a frame. Timestamps passed in must be monotonic.
    fn detect(&mut self, frame: &VideoFrame) -> MedfocusResult<LandmarkFrame>;

    /// Detector name for logging.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_ratio_handles_zero_height() {
        let info = CameraInfo {
            name: "cam".to_string(),
            width: 1280,
            height: 720,
            frame_rate_hz: 30,
        };
        assert!((info.aspect_ratio() - 16.0 / 9.0).abs() < 1e-9);

        let degenerate = CameraInfo { height: 0, ..info };
        assert_eq!(degenerate.aspect_ratio(), 1.0);
    }

    #[test]
    fn camera_status_serializes_snake_case() {
        let json = serde_json::to_string(&CameraStatus::Unsupported).unwrap();
        assert_eq!(json, "\"unsupported\"");
        assert_eq!(CameraStatus::default(), CameraStatus::Closed);
    }
}
