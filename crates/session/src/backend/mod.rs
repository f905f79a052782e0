//! Camera/detector backends.
//!
//! Live capture and inference are provided by the host application through
//! the `medfocus-vision-core` traits. The replay backend bundled here plays
//! a recorded landmark stream through the same session code path.

pub mod replay;

pub use replay::{load_replay, ReplayCamera, ReplayDetector};
