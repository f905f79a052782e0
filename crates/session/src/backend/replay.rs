//! Replay of recorded landmark streams.
//!
//! [`ReplayCamera`] emits one placeholder video frame per recorded
//! landmark frame; [`ReplayDetector`] answers each video frame with the
//! landmarks recorded for its sequence number.

use std::path::Path;
use std::sync::Arc;

use medfocus_common::error::{MedfocusError, MedfocusResult};
use medfocus_landmark_model::frame::{parse_frames, parse_header, FrameStreamHeader, LandmarkFrame};
use medfocus_vision_core::{CameraInfo, CameraSource, LandmarkDetector, VideoFrame};

/// Camera that plays back recorded frame timestamps.
pub struct ReplayCamera {
    name: String,
    frames: Arc<Vec<LandmarkFrame>>,
    frame_rate_hz: u32,
    cursor: usize,
    open: bool,
}

impl ReplayCamera {
    pub fn new(name: impl Into<String>, frames: Arc<Vec<LandmarkFrame>>, frame_rate_hz: u32) -> Self {
        Self {
            name: name.into(),
            frames,
            frame_rate_hz,
            cursor: 0,
            open: false,
        }
    }

    /// Frames not yet delivered.
    pub fn remaining(&self) -> usize {
        self.frames.len().saturating_sub(self.cursor)
    }
}

impl CameraSource for ReplayCamera {
    fn open(&mut self) -> MedfocusResult<CameraInfo> {
        self.cursor = 0;
        self.open = true;
        tracing::debug!(name = %self.name, frames = self.frames.len(), "Replay camera opened");
        Ok(CameraInfo {
            name: self.name.clone(),
            width: 0,
            height: 0,
            frame_rate_hz: self.frame_rate_hz,
        })
    }

    fn next_frame(&mut self) -> MedfocusResult<Option<VideoFrame>> {
        if !self.open {
            return Err(MedfocusError::session("Replay camera is not open"));
        }
        let Some(frame) = self.frames.get(self.cursor) else {
            // end of recording: release like a camera that was unplugged
            self.open = false;
            return Ok(None);
        };
        let video = VideoFrame {
            timestamp_ms: frame.timestamp_ms,
            sequence: self.cursor as u64,
            width: 0,
            height: 0,
            data: Vec::new(),
        };
        self.cursor += 1;
        Ok(Some(video))
    }

    fn stop_all_tracks(&mut self) {
        self.open = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Detector that looks up recorded landmarks by frame sequence.
pub struct ReplayDetector {
    frames: Arc<Vec<LandmarkFrame>>,
}

impl ReplayDetector {
    pub fn new(frames: Arc<Vec<LandmarkFrame>>) -> Self {
        Self { frames }
    }
}

impl LandmarkDetector for ReplayDetector {
    fn is_ready(&self) -> bool {
        true
    }

    fn detect(&mut self, frame: &VideoFrame) -> MedfocusResult<LandmarkFrame> {
        self.frames
            .get(frame.sequence as usize)
            .cloned()
            .ok_or_else(|| {
                MedfocusError::session(format!("No recorded landmarks for frame {}", frame.sequence))
            })
    }

    fn name(&self) -> &str {
        "replay"
    }
}

/// Load a recorded landmark stream and build a camera/detector pair for it.
///
/// The frame rate comes from the stream header when present, otherwise
/// `default_frame_rate_hz`.
pub fn load_replay(
    path: impl AsRef<Path>,
    default_frame_rate_hz: u32,
) -> MedfocusResult<(ReplayCamera, ReplayDetector, Option<FrameStreamHeader>)> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(MedfocusError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path)?;
    let header = parse_header(&content).transpose()?;
    let frames = Arc::new(parse_frames(&content)?);

    let frame_rate_hz = header
        .as_ref()
        .map(|h| h.frame_rate_hz)
        .filter(|&hz| hz > 0)
        .unwrap_or(default_frame_rate_hz);

    tracing::info!(
        path = %path.display(),
        frames = frames.len(),
        frame_rate_hz,
        "Loaded landmark recording"
    );

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "replay".to_string());

    Ok((
        ReplayCamera::new(name, frames.clone(), frame_rate_hz),
        ReplayDetector::new(frames),
        header,
    ))
}
