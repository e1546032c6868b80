//! Prediction pipeline benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use quale_core::{DeviceType, ProbeMetadata, Resolution, VideoCodec};
use quale_model::{scale, DeviceProfile, ModelCoefficients, ModelVariant, Predictor};

fn metadata(codec: VideoCodec, bitrate_kbps: f64) -> ProbeMetadata {
    ProbeMetadata {
        bitrate: bitrate_kbps * 1024.0,
        avg_frame_rate: Some(30.0),
        width: 3840,
        height: 2160,
        codec,
        duration: 60.0,
    }
}

fn bench_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("predict");

    let predictor = Predictor::new(
        ModelVariant::Coarse,
        DeviceProfile::new(DeviceType::Pc, Resolution::new(3840, 2160)),
        ModelCoefficients::builtin(),
    );

    for codec in VideoCodec::SUPPORTED {
        let meta = metadata(codec.clone(), 5000.0);
        group.bench_with_input(
            BenchmarkId::from_parameter(codec.name().to_string()),
            &meta,
            |b, meta| b.iter(|| predictor.predict(black_box(meta), None)),
        );
    }

    group.finish();
}

fn bench_scale_round_trip(c: &mut Criterion) {
    c.bench_function("scale/round_trip", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for i in 0..100 {
                let mos = 1.0 + 4.0 * i as f64 / 99.0;
                acc += scale::mos_from_r(scale::r_from_mos(black_box(mos)));
            }
            acc
        })
    });
}

criterion_group!(benches, bench_predict, bench_scale_round_trip);
criterion_main!(benches);
