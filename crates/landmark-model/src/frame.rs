//! Detector frame types and the landmark frame stream.
//!
//! Recorded detector output is stored as JSONL: an optional header line
//! prefixed with `# `, then one frame object per line. Timestamps are
//! monotonic milliseconds since the stream started.

use serde::{Deserialize, Serialize};

use crate::landmark::Landmark;

/// Monotonic timestamp in milliseconds since stream start.
pub type TimestampMs = f64;

/// Landmarks the external detector produced for one video frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Monotonic milliseconds since stream start.
    #[serde(rename = "t")]
    pub timestamp_ms: TimestampMs,

    /// Zero or more detected faces, each a full face mesh.
    #[serde(default)]
    pub faces: Vec<Vec<Landmark>>,

    /// Zero or more detected bodies, each a full pose.
    #[serde(default)]
    pub poses: Vec<Vec<Landmark>>,
}

/// Metadata written as the first line of a frame stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameStreamHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Wall-clock time at stream start (RFC 3339).
    pub epoch_wall: String,

    /// Detector or device that produced the stream.
    #[serde(default)]
    pub source: String,

    /// Nominal frame rate (Hz).
    #[serde(default)]
    pub frame_rate_hz: u32,
}

impl FrameStreamHeader {
    pub fn new(source: impl Into<String>, frame_rate_hz: u32) -> Self {
        Self {
            schema_version: "1.0".to_string(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
            source: source.into(),
            frame_rate_hz,
        }
    }
}

impl LandmarkFrame {
    /// An empty frame: nothing detected.
    pub fn empty(timestamp_ms: TimestampMs) -> Self {
        Self {
            timestamp_ms,
            faces: Vec::new(),
            poses: Vec::new(),
        }
    }

    /// Add a detected face.
    pub fn with_face(mut self, face: Vec<Landmark>) -> Self {
        self.faces.push(face);
        self
    }

    /// Add a detected pose.
    pub fn with_pose(mut self, pose: Vec<Landmark>) -> Self {
        self.poses.push(pose);
        self
    }

    /// The first detected face, if any landmarks were reported for it.
    pub fn primary_face(&self) -> Option<&[Landmark]> {
        self.faces
            .first()
            .map(Vec::as_slice)
            .filter(|face| !face.is_empty())
    }

    /// The first detected pose, if any landmarks were reported for it.
    pub fn primary_pose(&self) -> Option<&[Landmark]> {
        self.poses
            .first()
            .map(Vec::as_slice)
            .filter(|pose| !pose.is_empty())
    }

    /// Number of pose landmarks in the primary pose (0 when none).
    pub fn pose_landmark_count(&self) -> usize {
        self.primary_pose().map_or(0, <[Landmark]>::len)
    }

    /// Timestamp as fractional seconds since stream start.
    pub fn timestamp_secs(&self) -> f64 {
        self.timestamp_ms / 1000.0
    }
}

/// Parse frames from JSONL content (one JSON object per line).
///
/// Blank lines and `#` header/comment lines are skipped.
pub fn parse_frames(jsonl: &str) -> Result<Vec<LandmarkFrame>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Parse the `# `-prefixed header line, if the stream has one.
///
/// Only a first line of the form `# {...}` is a header. Any other `#` line
/// is a plain comment and yields `None`.
pub fn parse_header(jsonl: &str) -> Option<Result<FrameStreamHeader, serde_json::Error>> {
    let first = jsonl.lines().map(str::trim).find(|line| !line.is_empty())?;
    let header = first.strip_prefix('#')?.trim();
    if !header.starts_with('{') {
        return None;
    }
    Some(serde_json::from_str(header))
}

/// Serialize frames to JSONL format.
pub fn serialize_frames(frames: &[LandmarkFrame]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for frame in frames {
        output.push_str(&serde_json::to_string(frame)?);
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose(len: usize) -> Vec<Landmark> {
        (0..len).map(|i| Landmark::new(i as f64 / 100.0, 0.5)).collect()
    }

    #[test]
    fn test_frame_json_format() {
        let frame = LandmarkFrame::empty(1234.5).with_pose(vec![Landmark::new(0.5, 0.3)]);
        let json = serde_json::to_string(&frame).unwrap();
        assert!(json.contains("\"t\":1234.5"));
        assert!(json.contains("\"poses\":[[{\"x\":0.5,\"y\":0.3,\"z\":0.0}]]"));
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let frame: LandmarkFrame = serde_json::from_str(r#"{"t":16.0}"#).unwrap();
        assert_eq!(frame, LandmarkFrame::empty(16.0));
        assert_eq!(frame.pose_landmark_count(), 0);
        assert!(frame.primary_face().is_none());
    }

    #[test]
    fn test_primary_selection_ignores_empty_sets() {
        let frame = LandmarkFrame::empty(0.0).with_pose(Vec::new());
        assert!(frame.primary_pose().is_none());

        let frame = LandmarkFrame::empty(0.0).with_pose(pose(33)).with_pose(pose(5));
        assert_eq!(frame.pose_landmark_count(), 33);
    }

    #[test]
    fn test_jsonl_roundtrip_with_header() {
        let frames = vec![
            LandmarkFrame::empty(0.0).with_pose(pose(33)),
            LandmarkFrame::empty(33.3),
            LandmarkFrame::empty(66.6).with_face(vec![Landmark::new(0.4, 0.4)]),
        ];
        let header = FrameStreamHeader::new("test", 30);
        let jsonl = format!(
            "# {}\n{}",
            serde_json::to_string(&header).unwrap(),
            serialize_frames(&frames).unwrap()
        );

        let parsed_header = parse_header(&jsonl).unwrap().unwrap();
        assert_eq!(parsed_header.source, "test");
        assert_eq!(parsed_header.frame_rate_hz, 30);

        let parsed = parse_frames(&jsonl).unwrap();
        assert_eq!(parsed, frames);
    }

    #[test]
    fn test_stream_without_header() {
        let jsonl = "{\"t\":0.0}\n\n{\"t\":33.0}\n";
        assert!(parse_header(jsonl).is_none());
        assert_eq!(parse_frames(jsonl).unwrap().len(), 2);
    }

    #[test]
    fn test_leading_comment_is_not_a_header() {
        let jsonl = "# recorded at the clinic desk\n{\"t\":0.0}\n";
        assert!(parse_header(jsonl).is_none());
        assert_eq!(parse_frames(jsonl).unwrap().len(), 1);

        assert!(parse_header("# {not json\n").unwrap().is_err());
    }

    #[test]
    fn test_timestamp_secs() {
        let frame = LandmarkFrame::empty(1500.0);
        assert!((frame.timestamp_secs() - 1.5).abs() < 1e-9);
    }
}
