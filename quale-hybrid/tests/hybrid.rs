//! Hybrid round-trip scenarios with mocked collaborators.

use quale_core::{DeviceType, ProbeMetadata, Resolution, VideoCodec};
use quale_hybrid::{
    EncodeSettings, HybridOptions, HybridPredictor, HybridStrategy, VideoEncoder,
};
use quale_model::{DeviceProfile, ModelCoefficients, ModelVariant, Predictor};
use quale_probe::{MediaProbe, ProbeError};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::tempdir;

/// Encoder that just drops a marker file where the artifact would be.
struct FakeEncoder {
    encodes: AtomicUsize,
}

impl FakeEncoder {
    fn new() -> Self {
        Self {
            encodes: AtomicUsize::new(0),
        }
    }
}

impl VideoEncoder for FakeEncoder {
    fn encode(
        &self,
        source: &Path,
        settings: &EncodeSettings,
        out_dir: &Path,
    ) -> quale_hybrid::Result<PathBuf> {
        self.encodes.fetch_add(1, Ordering::SeqCst);
        std::fs::create_dir_all(out_dir)?;
        let stem = source.file_stem().unwrap().to_string_lossy();
        let out = out_dir.join(format!("{stem}_settings_{}.mkv", settings.key()?));
        std::fs::write(&out, b"re-encoded")?;
        Ok(out)
    }
}

/// Probe returning fixed metadata for whatever the probe encode is.
struct FakeProbe {
    codec: VideoCodec,
}

impl MediaProbe for FakeProbe {
    fn probe(&self, _path: &Path) -> quale_probe::Result<ProbeMetadata> {
        Ok(ProbeMetadata {
            bitrate: 100.0 * 1024.0,
            avg_frame_rate: Some(30.0),
            width: 1024,
            height: 576,
            codec: self.codec.clone(),
            duration: 8.0,
        })
    }

    fn frame_stats(&self, path: &Path) -> quale_probe::Result<Vec<quale_core::FrameStat>> {
        Err(ProbeError::MissingVideoStream(path.to_path_buf()))
    }
}

fn predictor() -> Predictor {
    Predictor::new(
        ModelVariant::Coarse,
        DeviceProfile::new(DeviceType::Pc, Resolution::new(3840, 2160)),
        ModelCoefficients::builtin(),
    )
}

fn options(strategy: HybridStrategy, source_codec: VideoCodec, dir: PathBuf) -> HybridOptions {
    HybridOptions {
        source_codec: Some(source_codec),
        strategy,
        bitrate: "100k".to_string(),
        width: 1024,
        height: 576,
        framerate: 30.0,
        reencode_dir: dir,
        keep_reencodes: false,
    }
}

#[test]
fn hevc_strategy_applies_source_codec_correction() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("clip.mp4");
    std::fs::write(&source, b"source").unwrap();

    let probe = FakeProbe {
        codec: VideoCodec::Hevc,
    };

    // What the plain pipeline would report for the probe encode.
    let uncorrected = predictor()
        .predict_file(&source, &probe, None)
        .unwrap()
        .per_sequence;

    let hybrid = HybridPredictor::new(
        FakeEncoder::new(),
        predictor(),
        options(
            HybridStrategy::Hevc,
            VideoCodec::Vp9,
            dir.path().join("re"),
        ),
    );
    let result = hybrid.predict_file(&source, &probe, None).unwrap();

    let expected = 0.85302496 * uncorrected + 0.69794354;
    assert!((result.per_sequence - expected).abs() < 1e-9);

    // Per-second values scale by the same uniform factor.
    let ratio = result.per_sequence / uncorrected;
    for second in &result.per_second {
        assert!((second / uncorrected - ratio).abs() < 1e-9);
    }
}

#[test]
fn same_codec_strategy_reports_uncorrected_scores() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("clip.mp4");
    std::fs::write(&source, b"source").unwrap();

    let probe = FakeProbe {
        codec: VideoCodec::H264,
    };
    let uncorrected = predictor()
        .predict_file(&source, &probe, None)
        .unwrap()
        .per_sequence;

    let hybrid = HybridPredictor::new(
        FakeEncoder::new(),
        predictor(),
        options(
            HybridStrategy::SameCodec,
            VideoCodec::H264,
            dir.path().join("re"),
        ),
    );
    let result = hybrid.predict_file(&source, &probe, None).unwrap();
    assert_eq!(result.per_sequence, uncorrected);
}

#[test]
fn same_codec_strategy_requires_declared_codec() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("clip.mp4");
    std::fs::write(&source, b"source").unwrap();

    let mut opts = options(
        HybridStrategy::SameCodec,
        VideoCodec::H264,
        dir.path().join("re"),
    );
    opts.source_codec = None;

    let hybrid = HybridPredictor::new(FakeEncoder::new(), predictor(), opts);
    let err = hybrid
        .predict_file(
            &source,
            &FakeProbe {
                codec: VideoCodec::H264,
            },
            None,
        )
        .unwrap_err();
    assert!(err.is_invalid_input());
}

#[test]
fn reencode_artifact_is_removed_unless_kept() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("clip.mp4");
    std::fs::write(&source, b"source").unwrap();
    let re_dir = dir.path().join("re");

    let probe = FakeProbe {
        codec: VideoCodec::Hevc,
    };

    let hybrid = HybridPredictor::new(
        FakeEncoder::new(),
        predictor(),
        options(HybridStrategy::Hevc, VideoCodec::H264, re_dir.clone()),
    );
    hybrid.predict_file(&source, &probe, None).unwrap();
    let leftovers: Vec<_> = std::fs::read_dir(&re_dir).unwrap().collect();
    assert!(leftovers.is_empty());

    let mut opts = options(HybridStrategy::Hevc, VideoCodec::H264, re_dir.clone());
    opts.keep_reencodes = true;
    let hybrid = HybridPredictor::new(FakeEncoder::new(), predictor(), opts);
    hybrid.predict_file(&source, &probe, None).unwrap();
    let leftovers: Vec<_> = std::fs::read_dir(&re_dir).unwrap().collect();
    assert_eq!(leftovers.len(), 1);
}
