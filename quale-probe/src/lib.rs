//! Media probing for quale.
//!
//! Wraps `ffprobe` to obtain the two inputs the quality model consumes:
//! per-stream metadata (bitrate, framerate, resolution, codec, duration)
//! and, for the refined model variant, per-frame packet sizes with picture
//! types. Both run as synchronous subprocess calls that either return a
//! fully-populated structure or fail hard; nothing is silently defaulted.

mod error;
mod ffprobe;

pub use error::{ProbeError, Result};
pub use ffprobe::FfprobeProber;

use quale_core::{FrameStat, ProbeMetadata};
use std::path::Path;

/// Source of probe data for a video file.
///
/// The production implementation shells out to ffprobe; tests substitute
/// counting or canned probes to drive the pipeline without media files.
pub trait MediaProbe {
    /// Probe stream-level metadata for the first video stream.
    ///
    /// Fails if the file is unreadable or carries no video stream.
    fn probe(&self, path: &Path) -> Result<ProbeMetadata>;

    /// Extract per-frame picture type and packet size in decode order.
    ///
    /// An empty list is a valid-but-degenerate result; rejecting it is the
    /// feature extractor's job, not the prober's.
    fn frame_stats(&self, path: &Path) -> Result<Vec<FrameStat>>;
}
