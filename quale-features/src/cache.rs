//! On-disk feature cache.
//!
//! Caches one serialized [`FeatureRecord`] per video so the expensive
//! frame probe runs once. Entries are keyed by a content fingerprint
//! (path, size, mtime) rather than the bare basename, so a changed file
//! never silently reuses a stale record. Contract: read if present, else
//! compute and write; no TTL; manual deletion is the only invalidation.
//!
//! Concurrent predictions of the same video may both miss and both write.
//! That is wasteful but not corrupting: records are deterministic for
//! identical input and the last writer wins.

use crate::error::Result;
use crate::record::FeatureRecord;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing::{debug, info};

/// Cache manager for feature records.
pub struct FeatureCache {
    cache_dir: PathBuf,
}

impl FeatureCache {
    /// Create a cache rooted at `cache_dir`, creating it if needed.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Result<Self> {
        let cache_dir = cache_dir.into();
        if !cache_dir.exists() {
            fs::create_dir_all(&cache_dir)?;
            info!("created feature cache directory {:?}", cache_dir);
        }
        Ok(Self { cache_dir })
    }

    /// Get the cache directory.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Content fingerprint for a video file: SHA-256 over its absolute
    /// path, byte size and modification time.
    pub fn fingerprint(video: &Path) -> Result<String> {
        let meta = fs::metadata(video)?;
        let mtime = meta
            .modified()?
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);

        let mut hasher = Sha256::new();
        hasher.update(video.as_os_str().as_encoded_bytes());
        hasher.update(meta.len().to_le_bytes());
        hasher.update(mtime.to_le_bytes());
        let digest = hasher.finalize();

        use std::fmt::Write as _;
        let mut hex = String::with_capacity(16);
        for byte in &digest[..8] {
            let _ = write!(hex, "{byte:02x}");
        }
        Ok(hex)
    }

    /// Expected cache path for a video (may not exist yet).
    pub fn entry_path(&self, video: &Path) -> Result<PathBuf> {
        let stem = video
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video".to_string());
        let fingerprint = Self::fingerprint(video)?;
        Ok(self.cache_dir.join(format!("{stem}.{fingerprint}.json")))
    }

    /// Load a cached record if present.
    pub fn load(&self, video: &Path) -> Result<Option<FeatureRecord>> {
        let path = self.entry_path(video)?;
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)?;
        let record = serde_json::from_str(&json)?;
        debug!("feature cache hit for {:?}", video);
        Ok(Some(record))
    }

    /// Store a record, returning the entry path.
    pub fn store(&self, video: &Path, record: &FeatureRecord) -> Result<PathBuf> {
        let path = self.entry_path(video)?;
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&path, json)?;
        debug!("cached features for {:?} at {:?}", video, path);
        Ok(path)
    }

    /// Read-if-present, else compute-and-write.
    pub fn get_or_compute<F>(&self, video: &Path, compute: F) -> quale_core::Result<FeatureRecord>
    where
        F: FnOnce() -> quale_core::Result<FeatureRecord>,
    {
        if let Some(record) = self.load(video)? {
            return Ok(record);
        }
        let record = compute()?;
        self.store(video, &record)?;
        Ok(record)
    }

    /// Remove the cache entry for a video, if any.
    pub fn remove(&self, video: &Path) -> Result<()> {
        let path = self.entry_path(video)?;
        if path.exists() {
            fs::remove_file(&path)?;
            debug!("removed cache entry {:?}", path);
        }
        Ok(())
    }

    /// Clear the entire cache directory.
    pub fn clear_all(&self) -> Result<()> {
        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir)?;
            fs::create_dir_all(&self.cache_dir)?;
            info!("cleared feature cache {:?}", self.cache_dir);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quale_core::VideoCodec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    fn record() -> FeatureRecord {
        FeatureRecord {
            bitrate: 5000.0,
            framerate: 30.0,
            resolution: 8_294_400,
            codec: VideoCodec::H264,
            duration: 10.0,
            frame_sizes: None,
        }
    }

    #[test]
    fn test_store_and_load_roundtrip() {
        let cache_dir = tempdir().unwrap();
        let video_dir = tempdir().unwrap();
        let video = video_dir.path().join("clip.mp4");
        fs::write(&video, b"fake video bytes").unwrap();

        let cache = FeatureCache::new(cache_dir.path()).unwrap();
        assert!(cache.load(&video).unwrap().is_none());

        cache.store(&video, &record()).unwrap();
        let loaded = cache.load(&video).unwrap().unwrap();
        assert_eq!(loaded, record());
    }

    #[test]
    fn test_get_or_compute_invokes_compute_once() {
        let cache_dir = tempdir().unwrap();
        let video_dir = tempdir().unwrap();
        let video = video_dir.path().join("clip.mp4");
        fs::write(&video, b"fake video bytes").unwrap();

        let cache = FeatureCache::new(cache_dir.path()).unwrap();
        let calls = AtomicUsize::new(0);

        let first = cache
            .get_or_compute(&video, || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(record())
            })
            .unwrap();
        let second = cache
            .get_or_compute(&video, || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(record())
            })
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_fingerprint_changes_with_content_size() {
        let video_dir = tempdir().unwrap();
        let video = video_dir.path().join("clip.mp4");

        fs::write(&video, b"v1").unwrap();
        let fp1 = FeatureCache::fingerprint(&video).unwrap();

        fs::write(&video, b"version two, longer").unwrap();
        let fp2 = FeatureCache::fingerprint(&video).unwrap();

        assert_ne!(fp1, fp2);
    }

    #[test]
    fn test_remove_and_clear() {
        let cache_dir = tempdir().unwrap();
        let video_dir = tempdir().unwrap();
        let video = video_dir.path().join("clip.mp4");
        fs::write(&video, b"fake").unwrap();

        let cache = FeatureCache::new(cache_dir.path()).unwrap();
        cache.store(&video, &record()).unwrap();
        assert!(cache.load(&video).unwrap().is_some());

        cache.remove(&video).unwrap();
        assert!(cache.load(&video).unwrap().is_none());

        cache.store(&video, &record()).unwrap();
        cache.clear_all().unwrap();
        assert!(cache.load(&video).unwrap().is_none());
    }
}
