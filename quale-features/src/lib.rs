//! Feature extraction for the quale video quality estimator.
//!
//! Turns probed stream metadata (and, for the refined model variant,
//! per-frame packet-size sequences) into one flat [`FeatureRecord`] per
//! video, and provides an on-disk cache so repeated predictions of the
//! same file skip the expensive frame probe.

mod cache;
mod error;
mod extract;
mod record;
pub mod stats;

pub use cache::FeatureCache;
pub use error::{FeatureError, Result};
pub use extract::{extract, extract_with_frames, FALLBACK_FRAMERATE};
pub use record::{FeatureRecord, FrameSizeFeatures, SizeStats};
